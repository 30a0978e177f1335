use tracing::{debug, trace};

use foundation::bounds::{Corner, ProjectedBounds};
use foundation::ids::{ListenerId, OverlayId, OverlayIds};
use foundation::math::ProjectedPoint;
use runtime::event_bus::{EventKind, PointerEvent};

use crate::error::SelectionError;
use crate::pointer::PointerHandler;
use crate::surface::{MapSurface, OverlayShape, RectStyle};

/// Receives every bounds snapshot the selection tool produces.
pub trait SelectionOwner {
    fn selection_changed(&mut self, bounds: ProjectedBounds);
}

/// Corner handle of the selection rectangle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VertexHandle {
    pub corner: Corner,
    pub point: ProjectedPoint,
    pub overlay: OverlayId,
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// A corner follows the pointer; `anchor` is the fixed opposite corner.
    DraggingVertex { corner: Corner, anchor: ProjectedPoint },
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::DraggingVertex { .. })
    }
}

const SUBSCRIPTIONS: [EventKind; 3] = [
    EventKind::PointerDown,
    EventKind::PointerMove,
    EventKind::PointerUp,
];

/// Rectangle selection with four draggable corner handles.
///
/// The tool owns the selection bounds. Every change goes through
/// [`SelectionTool::set_bounds`], which re-renders once and notifies the
/// owner once.
#[derive(Debug)]
pub struct SelectionTool {
    bounds: ProjectedBounds,
    rect: OverlayId,
    vertex_overlays: [OverlayId; 4],
    drag: DragState,
    listeners: Vec<ListenerId>,
    attached: bool,
}

impl SelectionTool {
    pub fn new(bounds: ProjectedBounds, ids: &mut OverlayIds) -> Result<Self, SelectionError> {
        if !bounds.is_finite() {
            return Err(SelectionError::NonFinite);
        }
        Ok(Self {
            bounds,
            rect: ids.next_id(),
            vertex_overlays: std::array::from_fn(|_| ids.next_id()),
            drag: DragState::Idle,
            listeners: Vec::new(),
            attached: false,
        })
    }

    pub fn bounds(&self) -> ProjectedBounds {
        self.bounds
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn rect_overlay(&self) -> OverlayId {
        self.rect
    }

    /// Handles in SW, NW, NE, SE order.
    pub fn vertices(&self) -> [VertexHandle; 4] {
        Corner::ALL.map(|corner| VertexHandle {
            corner,
            point: self.bounds.corner(corner),
            overlay: self.vertex_overlays[corner.index()],
        })
    }

    pub fn vertex_for_overlay(&self, overlay: OverlayId) -> Option<Corner> {
        Corner::ALL
            .into_iter()
            .find(|c| self.vertex_overlays[c.index()] == overlay)
    }

    pub fn overlay_ids(&self) -> impl Iterator<Item = OverlayId> + '_ {
        std::iter::once(self.rect).chain(self.vertex_overlays.iter().copied())
    }

    /// Draws the tool, subscribes to pointer input and reports the current
    /// bounds to `owner`. No-op if already attached.
    pub fn attach(&mut self, surface: &mut dyn MapSurface, owner: &mut dyn SelectionOwner) {
        if self.attached {
            return;
        }
        self.listeners = SUBSCRIPTIONS.iter().map(|k| surface.subscribe(*k)).collect();
        self.attached = true;
        debug!(
            west = self.bounds.west(),
            south = self.bounds.south(),
            east = self.bounds.east(),
            north = self.bounds.north(),
            "selection tool attached"
        );
        self.set_bounds(surface, self.bounds, owner);
    }

    /// Removes every overlay and listener the tool registered.
    pub fn detach(&mut self, surface: &mut dyn MapSurface) {
        if !self.attached {
            return;
        }
        for id in self.overlay_ids().collect::<Vec<_>>() {
            surface.remove_overlay(id);
        }
        for id in self.listeners.drain(..) {
            surface.unsubscribe(id);
        }
        self.drag = DragState::Idle;
        self.attached = false;
        debug!("selection tool detached");
    }

    /// Creation gesture: collapses the rectangle onto `point` and starts
    /// dragging its north-east corner from there.
    pub fn start_at(
        &mut self,
        surface: &mut dyn MapSurface,
        point: ProjectedPoint,
        owner: &mut dyn SelectionOwner,
    ) -> Result<(), SelectionError> {
        self.check_editable()?;
        if !point.is_finite() {
            return Err(SelectionError::NonFinite);
        }
        self.drag = DragState::DraggingVertex {
            corner: Corner::NorthEast,
            anchor: point,
        };
        debug!(lat = point.lat, lng = point.lng, "selection drag started");
        self.set_bounds(surface, ProjectedBounds::point(point), owner);
        Ok(())
    }

    /// Replaces the bounds from outside a drag (panel edits).
    pub fn request_bounds(
        &mut self,
        surface: &mut dyn MapSurface,
        bounds: ProjectedBounds,
        owner: &mut dyn SelectionOwner,
    ) -> Result<(), SelectionError> {
        self.check_editable()?;
        if !bounds.is_finite() {
            return Err(SelectionError::NonFinite);
        }
        self.set_bounds(surface, bounds, owner);
        Ok(())
    }

    fn check_editable(&self) -> Result<(), SelectionError> {
        if !self.attached {
            return Err(SelectionError::Detached);
        }
        if self.drag.is_dragging() {
            return Err(SelectionError::DragInProgress);
        }
        Ok(())
    }

    fn set_bounds(
        &mut self,
        surface: &mut dyn MapSurface,
        bounds: ProjectedBounds,
        owner: &mut dyn SelectionOwner,
    ) {
        self.bounds = bounds;
        self.render(surface);
        owner.selection_changed(bounds);
    }

    fn finish_drag(&mut self, owner: &mut dyn SelectionOwner) {
        self.drag = DragState::Idle;
        debug!(area = self.bounds.area(), "selection drag finished");
        owner.selection_changed(self.bounds);
    }
}

impl PointerHandler for SelectionTool {
    type Owner = dyn SelectionOwner;

    fn on_pointer_down(
        &mut self,
        _surface: &mut dyn MapSurface,
        event: PointerEvent,
        owner: &mut Self::Owner,
    ) -> bool {
        if !self.attached {
            return false;
        }
        match self.drag {
            // A second press ends a click-to-place gesture.
            DragState::DraggingVertex { .. } => {
                self.finish_drag(owner);
                true
            }
            DragState::Idle => {
                let Some(corner) = event.target.and_then(|t| self.vertex_for_overlay(t)) else {
                    return false;
                };
                let anchor = self.bounds.corner(corner.opposite());
                self.drag = DragState::DraggingVertex { corner, anchor };
                debug!(?corner, "selection vertex grabbed");
                true
            }
        }
    }

    fn on_pointer_move(
        &mut self,
        surface: &mut dyn MapSurface,
        event: PointerEvent,
        owner: &mut Self::Owner,
    ) -> bool {
        let DragState::DraggingVertex { anchor, .. } = self.drag else {
            return false;
        };
        if !event.point.is_finite() {
            return false;
        }
        let bounds = ProjectedBounds::from_corners(anchor, event.point);
        trace!(lat = event.point.lat, lng = event.point.lng, "selection drag step");
        self.set_bounds(surface, bounds, owner);
        true
    }

    fn on_pointer_up(
        &mut self,
        _surface: &mut dyn MapSurface,
        _event: PointerEvent,
        owner: &mut Self::Owner,
    ) -> bool {
        if !self.drag.is_dragging() {
            return false;
        }
        self.finish_drag(owner);
        true
    }

    fn render(&self, surface: &mut dyn MapSurface) {
        surface.add_overlay(
            self.rect,
            &OverlayShape::Rectangle {
                bounds: self.bounds,
                style: RectStyle::Selection,
            },
        );
        for v in self.vertices() {
            surface.add_overlay(
                v.overlay,
                &OverlayShape::Vertex {
                    point: v.point,
                    corner: v.corner,
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::fake::{Call, FakeSurface};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[derive(Default)]
    struct Recorder(Vec<ProjectedBounds>);

    impl SelectionOwner for Recorder {
        fn selection_changed(&mut self, bounds: ProjectedBounds) {
            self.0.push(bounds);
        }
    }

    fn pt(x: f64, y: f64) -> ProjectedPoint {
        ProjectedPoint::new(y, x)
    }

    fn attached_tool(surface: &mut FakeSurface, owner: &mut Recorder) -> SelectionTool {
        let mut ids = OverlayIds::new();
        let mut tool =
            SelectionTool::new(ProjectedBounds::from_edges(0.0, 0.0, 10.0, 10.0), &mut ids)
                .unwrap();
        tool.attach(surface, owner);
        surface.take_calls();
        owner.0.clear();
        tool
    }

    #[test]
    fn attach_draws_subscribes_and_notifies() {
        let mut surface = FakeSurface::new();
        let mut owner = Recorder::default();
        let mut ids = OverlayIds::new();
        let bounds = ProjectedBounds::from_edges(0.0, 0.0, 10.0, 10.0);
        let mut tool = SelectionTool::new(bounds, &mut ids).unwrap();

        tool.attach(&mut surface, &mut owner);
        tool.attach(&mut surface, &mut owner);

        assert_eq!(surface.overlays.len(), 5);
        assert_eq!(surface.listeners.len(), 3);
        assert_eq!(owner.0, vec![bounds]);
        assert_eq!(
            surface.overlays.get(&tool.rect_overlay()),
            Some(&OverlayShape::Rectangle {
                bounds,
                style: RectStyle::Selection
            })
        );
    }

    #[test]
    fn creation_drag_produces_expected_bounds() {
        let mut surface = FakeSurface::new();
        let mut owner = Recorder::default();
        let mut tool = attached_tool(&mut surface, &mut owner);

        tool.start_at(&mut surface, pt(3200.0, 3200.0), &mut owner)
            .unwrap();
        assert!(tool.bounds().is_degenerate());
        tool.on_pointer_move(&mut surface, PointerEvent::at(pt(3210.0, 3190.0)), &mut owner);
        tool.on_pointer_up(&mut surface, PointerEvent::at(pt(3210.0, 3190.0)), &mut owner);

        let b = tool.bounds();
        assert_eq!((b.west(), b.east()), (3200.0, 3210.0));
        assert_eq!((b.south(), b.north()), (3190.0, 3200.0));
        assert_eq!(b.area(), 100.0);
        assert_eq!(tool.drag_state(), DragState::Idle);
        // start, move, terminal
        assert_eq!(owner.0.len(), 3);
        assert_eq!(owner.0.last(), Some(&b));
    }

    #[test]
    fn vertex_drag_anchors_opposite_corner_and_can_cross_it() {
        let mut surface = FakeSurface::new();
        let mut owner = Recorder::default();
        let mut tool = attached_tool(&mut surface, &mut owner);
        let ne = tool.vertices()[Corner::NorthEast.index()];

        assert!(tool.on_pointer_down(
            &mut surface,
            PointerEvent::on(ne.point, ne.overlay),
            &mut owner
        ));
        assert_eq!(
            tool.drag_state(),
            DragState::DraggingVertex {
                corner: Corner::NorthEast,
                anchor: pt(0.0, 0.0)
            }
        );
        assert!(owner.0.is_empty());

        tool.on_pointer_move(&mut surface, PointerEvent::at(pt(-5.0, -3.0)), &mut owner);
        assert_eq!(tool.bounds(), ProjectedBounds::from_edges(-5.0, -3.0, 0.0, 0.0));
    }

    #[test]
    fn pointer_down_off_handles_is_ignored() {
        let mut surface = FakeSurface::new();
        let mut owner = Recorder::default();
        let mut tool = attached_tool(&mut surface, &mut owner);

        assert!(!tool.on_pointer_down(&mut surface, PointerEvent::at(pt(5.0, 5.0)), &mut owner));
        assert!(!tool.on_pointer_move(&mut surface, PointerEvent::at(pt(7.0, 7.0)), &mut owner));
        assert!(!tool.on_pointer_up(&mut surface, PointerEvent::at(pt(7.0, 7.0)), &mut owner));
        assert_eq!(tool.drag_state(), DragState::Idle);
        assert!(surface.calls.is_empty());
        assert!(owner.0.is_empty());
    }

    #[test]
    fn each_change_renders_once_and_notifies_once() {
        let mut surface = FakeSurface::new();
        let mut owner = Recorder::default();
        let mut tool = attached_tool(&mut surface, &mut owner);
        let rect = tool.rect_overlay();

        tool.start_at(&mut surface, pt(1.0, 1.0), &mut owner).unwrap();
        for i in 2..6 {
            let f = f64::from(i);
            tool.on_pointer_move(&mut surface, PointerEvent::at(pt(f, f)), &mut owner);
        }

        assert_eq!(surface.count(|c| *c == Call::AddOverlay(rect)), 5);
        assert_eq!(owner.0.len(), 5);
    }

    #[test]
    fn panel_edit_rejected_while_dragging() {
        let mut surface = FakeSurface::new();
        let mut owner = Recorder::default();
        let mut tool = attached_tool(&mut surface, &mut owner);
        tool.start_at(&mut surface, pt(1.0, 1.0), &mut owner).unwrap();
        let before = tool.bounds();
        surface.take_calls();
        owner.0.clear();

        let err = tool.request_bounds(
            &mut surface,
            ProjectedBounds::from_edges(0.0, 0.0, 50.0, 50.0),
            &mut owner,
        );
        assert_eq!(err, Err(SelectionError::DragInProgress));
        assert_eq!(
            tool.start_at(&mut surface, pt(9.0, 9.0), &mut owner),
            Err(SelectionError::DragInProgress)
        );
        assert_eq!(tool.bounds(), before);
        assert!(surface.calls.is_empty());
        assert!(owner.0.is_empty());
    }

    #[test]
    fn request_bounds_while_idle_applies_without_dragging() {
        let mut surface = FakeSurface::new();
        let mut owner = Recorder::default();
        let mut tool = attached_tool(&mut surface, &mut owner);
        let b = ProjectedBounds::from_edges(3.0, 4.0, 8.0, 6.0);

        tool.request_bounds(&mut surface, b, &mut owner).unwrap();

        assert_eq!(tool.bounds(), b);
        assert_eq!(tool.drag_state(), DragState::Idle);
        assert_eq!(owner.0, vec![b]);
        assert_eq!(
            tool.vertices().map(|v| v.point),
            [pt(3.0, 4.0), pt(3.0, 6.0), pt(8.0, 6.0), pt(8.0, 4.0)]
        );
    }

    #[test]
    fn non_finite_and_detached_edits_are_rejected() {
        let mut surface = FakeSurface::new();
        let mut owner = Recorder::default();
        let mut tool = attached_tool(&mut surface, &mut owner);
        let unbounded = ProjectedBounds::from_edges(f64::NEG_INFINITY, 0.0, 1.0, 1.0);
        assert_eq!(
            tool.request_bounds(&mut surface, unbounded, &mut owner),
            Err(SelectionError::NonFinite)
        );

        tool.detach(&mut surface);
        assert_eq!(
            tool.request_bounds(&mut surface, ProjectedBounds::from_edges(0.0, 0.0, 1.0, 1.0), &mut owner),
            Err(SelectionError::Detached)
        );
        assert!(owner.0.is_empty());
    }

    #[test]
    fn detach_removes_everything_it_added() {
        let mut surface = FakeSurface::new();
        let mut owner = Recorder::default();
        let mut tool = attached_tool(&mut surface, &mut owner);
        tool.start_at(&mut surface, pt(1.0, 1.0), &mut owner).unwrap();

        tool.detach(&mut surface);
        tool.detach(&mut surface);

        assert!(surface.overlays.is_empty());
        assert!(surface.listeners.is_empty());
        assert_eq!(surface.count(|c| matches!(c, Call::RemoveOverlay(_))), 5);
        assert_eq!(surface.count(|c| matches!(c, Call::Unsubscribe(_))), 3);
        assert!(!tool.is_attached());
        assert_eq!(tool.drag_state(), DragState::Idle);
    }

    #[test]
    fn second_press_ends_click_to_place_gesture() {
        let mut surface = FakeSurface::new();
        let mut owner = Recorder::default();
        let mut tool = attached_tool(&mut surface, &mut owner);
        tool.start_at(&mut surface, pt(0.0, 0.0), &mut owner).unwrap();
        tool.on_pointer_move(&mut surface, PointerEvent::at(pt(4.0, 4.0)), &mut owner);

        assert!(tool.on_pointer_down(&mut surface, PointerEvent::at(pt(4.0, 4.0)), &mut owner));
        assert_eq!(tool.drag_state(), DragState::Idle);
        assert_eq!(tool.bounds().area(), 16.0);
    }

    proptest! {
        #[test]
        fn drag_keeps_edges_ordered(
            start in (-1e4f64..1e4, -1e4f64..1e4),
            steps in prop::collection::vec((-1e4f64..1e4, -1e4f64..1e4), 1..20),
        ) {
            let mut surface = FakeSurface::new();
            let mut owner = Recorder::default();
            let mut tool = attached_tool(&mut surface, &mut owner);
            tool.start_at(&mut surface, pt(start.0, start.1), &mut owner).unwrap();
            for (x, y) in steps {
                tool.on_pointer_move(&mut surface, PointerEvent::at(pt(x, y)), &mut owner);
                let b = tool.bounds();
                prop_assert!(b.west() <= b.east());
                prop_assert!(b.south() <= b.north());
                prop_assert!(b.contains(pt(start.0, start.1)));
                prop_assert!(b.contains(pt(x, y)));
            }
        }
    }
}
