use tracing::{debug, info, warn};

use formats::config::MapConfig;
use formats::view_state;
use foundation::bounds::ProjectedBounds;
use foundation::ids::{ListenerId, OverlayIds};
use foundation::math::ZoomContext;
use foundation::position::{MAX_PLANE, Position};
use foundation::region::Region;
use foundation::view::ViewState;
use runtime::event_bus::{EventKind, MapEvent};
use runtime::store::{ObserverId, ViewStore};

use crate::hover::{CursorReadout, HoverCell};
use crate::panel::{PanelDisplay, SelectionPanel};
use crate::pointer::PointerHandler;
use crate::selection::SelectionTool;
use crate::surface::MapSurface;

const WORLD_SUBSCRIPTIONS: [EventKind; 3] = [EventKind::Move, EventKind::Zoom, EventKind::MouseMove];

/// The interactive map: surface, view state, selection tool and panel.
///
/// Every input goes through a `&mut self` method and runs to completion
/// before the next one starts. Failures are logged and reported as `false`.
pub struct MapWorld<S: MapSurface> {
    surface: S,
    config: MapConfig,
    store: ViewStore,
    ids: OverlayIds,
    selection: Option<SelectionTool>,
    panel: SelectionPanel,
    hover: HoverCell,
    listeners: Vec<ListenerId>,
    tile_plane: Option<i32>,
}

impl<S: MapSurface> MapWorld<S> {
    pub fn new(surface: S, config: MapConfig) -> Self {
        let mut ids = OverlayIds::new();
        let hover = HoverCell::new(&mut ids);
        Self {
            surface,
            store: ViewStore::new(config.default_view()),
            config,
            ids,
            selection: None,
            panel: SelectionPanel::new(),
            hover,
            listeners: Vec::new(),
            tile_plane: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn view(&self) -> ViewState {
        self.store.get()
    }

    pub fn observe_view(&mut self, observer: impl FnMut(&ViewState) + 'static) -> ObserverId {
        self.store.observe(observer)
    }

    pub fn unobserve_view(&mut self, id: ObserverId) -> bool {
        self.store.unobserve(id)
    }

    pub fn selection(&self) -> Option<&SelectionTool> {
        self.selection.as_ref()
    }

    pub fn panel(&self) -> &SelectionPanel {
        &self.panel
    }

    pub fn panel_display(&self) -> PanelDisplay {
        self.panel.display()
    }

    /// Decodes `query`, positions the surface and starts listening for
    /// viewport and cursor events.
    pub fn load(&mut self, query: &str) -> ViewState {
        let view = view_state::decode_with_defaults(query, self.config.default_view());
        if self.listeners.is_empty() {
            self.listeners = WORLD_SUBSCRIPTIONS
                .iter()
                .map(|k| self.surface.subscribe(*k))
                .collect();
        }
        let view = self.apply_view(view);
        info!(
            x = view.center.x,
            y = view.center.y,
            plane = view.plane,
            zoom = view.zoom,
            "map loaded"
        );
        view
    }

    /// Removes everything the world registered on the surface.
    pub fn teardown(&mut self) {
        if let Some(tool) = self.selection.as_mut() {
            tool.detach(&mut self.surface);
        }
        self.hover.clear(&mut self.surface);
        for id in self.listeners.drain(..) {
            self.surface.unsubscribe(id);
        }
        debug!("map torn down");
    }

    /// Returns `true` if some component acted on the event.
    pub fn handle_event(&mut self, event: MapEvent) -> bool {
        match event {
            MapEvent::Move | MapEvent::Zoom => self.sync_view_from_surface(),
            MapEvent::MouseMove(point) => {
                let view = self.store.get();
                self.hover
                    .on_mouse_move(&mut self.surface, point, view.zoom_context(), view.plane)
            }
            MapEvent::PointerDown(e) => {
                let Some(tool) = self.selection.as_mut().filter(|t| t.is_attached()) else {
                    return false;
                };
                if e.shift && e.target.is_none() && !tool.drag_state().is_dragging() {
                    return match tool.start_at(&mut self.surface, e.point, &mut self.panel) {
                        Ok(()) => true,
                        Err(err) => {
                            debug!(%err, "selection gesture ignored");
                            false
                        }
                    };
                }
                tool.on_pointer_down(&mut self.surface, e, &mut self.panel)
            }
            MapEvent::PointerMove(e) => match self.selection.as_mut() {
                Some(tool) => tool.on_pointer_move(&mut self.surface, e, &mut self.panel),
                None => false,
            },
            MapEvent::PointerUp(e) => match self.selection.as_mut() {
                Some(tool) => tool.on_pointer_up(&mut self.surface, e, &mut self.panel),
                None => false,
            },
        }
    }

    fn sync_view_from_surface(&mut self) -> bool {
        let point = self.surface.viewport_center();
        if !point.is_finite() {
            warn!("surface has no viewport centre; view left unchanged");
            return false;
        }
        let zoom = self.surface.current_zoom();
        let plane = self.store.get().plane;
        let center = Position::from_projected(point, ZoomContext::new(zoom), plane);
        self.store.publish(ViewState::new(center, zoom));
        true
    }

    fn apply_view(&mut self, view: ViewState) -> ViewState {
        let view = ViewState::new(view.center, self.config.clamp_zoom(view.zoom));
        self.switch_tiles(view.plane);
        self.surface
            .set_viewport(view.center.to_projected(view.zoom_context()), view.zoom);
        self.store.publish(view);
        view
    }

    fn switch_tiles(&mut self, plane: i32) {
        if self.tile_plane != Some(plane) {
            self.surface.set_tile_plane(plane);
            self.tile_plane = Some(plane);
        }
    }

    /// Shows tiles for `plane` (clamped to the valid planes) and keeps the
    /// current centre.
    pub fn set_plane(&mut self, plane: i64) -> ViewState {
        let plane = plane.clamp(0, i64::from(MAX_PLANE)) as i32;
        let view = self.store.get().with_plane(plane);
        self.switch_tiles(plane);
        self.store.publish(view);
        debug!(plane, "plane changed");
        view
    }

    /// Recentres on a user-typed position; out-of-world input is clamped.
    pub fn go_to_position(&mut self, x: i64, y: i64, plane: i64) -> ViewState {
        let zoom = self.store.get().zoom;
        self.apply_view(ViewState::new(Position::clamped(x, y, plane), zoom))
    }

    /// Recentres on the middle of region `id`. Invalid ids leave the view
    /// untouched.
    pub fn go_to_region(&mut self, id: i64) -> bool {
        let region = i32::try_from(id)
            .map_err(|_| foundation::error::GridError::InvalidRegion(id))
            .and_then(Region::from_id);
        match region {
            Ok(region) => {
                let current = self.store.get();
                let center = region.centre_position().with_plane(current.plane);
                self.apply_view(ViewState::new(center, current.zoom));
                true
            }
            Err(err) => {
                warn!(%err, "region lookup ignored");
                false
            }
        }
    }

    pub fn cursor_readout(&self) -> Option<CursorReadout> {
        self.hover.readout()
    }

    /// Cell at container pixel `(x_px, y_px)` on the current plane.
    pub fn cell_at_screen(&self, x_px: f64, y_px: f64) -> Option<CursorReadout> {
        let point = self.surface.projected_point_from_screen(x_px, y_px);
        if !point.is_finite() {
            return None;
        }
        let view = self.store.get();
        let pos = Position::from_projected(point, view.zoom_context(), view.plane);
        Some(CursorReadout::for_position(pos))
    }

    /// Rectangle shown when the tool opens for the first time: a square of
    /// the configured size around the centre cell. Edges land on grid lines.
    fn default_selection_bounds(&self) -> ProjectedBounds {
        let center = self.store.get().center;
        let half = self.config.selection_size / 2.0;
        let (x, y) = (f64::from(center.x), f64::from(center.y));
        ProjectedBounds::from_edges(x - half, y - half, x + half, y + half)
    }

    /// Attaches the selection tool, creating it on first use. A re-shown tool
    /// keeps its last bounds.
    pub fn show_selection(&mut self) -> bool {
        if self.selection.is_none() {
            match SelectionTool::new(self.default_selection_bounds(), &mut self.ids) {
                Ok(tool) => self.selection = Some(tool),
                Err(err) => {
                    warn!(%err, "selection tool not created");
                    return false;
                }
            }
        }
        match self.selection.as_mut() {
            Some(tool) => {
                tool.attach(&mut self.surface, &mut self.panel);
                true
            }
            None => false,
        }
    }

    pub fn hide_selection(&mut self) {
        if let Some(tool) = self.selection.as_mut() {
            tool.detach(&mut self.surface);
        }
    }

    /// Applies a panel edit to the selection. Rejected edits change nothing.
    pub fn edit_selection_field(&mut self, field: &str, raw: &str) -> bool {
        let Some(tool) = self.selection.as_mut().filter(|t| t.is_attached()) else {
            debug!(field, "selection edit without a visible selection");
            return false;
        };
        let requested = match self.panel.on_named_field_changed(field, raw) {
            Ok(bounds) => bounds,
            Err(err) => {
                warn!(%err, "selection edit rejected");
                return false;
            }
        };
        match tool.request_bounds(&mut self.surface, requested, &mut self.panel) {
            Ok(()) => true,
            Err(err) => {
                warn!(%err, "selection edit rejected");
                false
            }
        }
    }
}

impl<S: MapSurface + std::fmt::Debug> std::fmt::Debug for MapWorld<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapWorld")
            .field("surface", &self.surface)
            .field("view", &self.store.get())
            .field("selection", &self.selection)
            .field("panel", &self.panel)
            .finish_non_exhaustive()
    }
}
