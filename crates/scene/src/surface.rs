use serde::Serialize;

use foundation::bounds::{Corner, ProjectedBounds};
use foundation::ids::{ListenerId, OverlayId};
use foundation::math::ProjectedPoint;
use runtime::event_bus::EventKind;

/// Styling role of a rectangle overlay; the surface maps it to colours.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RectStyle {
    Selection,
    HoverCell,
}

/// Something drawn on top of the tiles, in projected coordinates.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverlayShape {
    Rectangle {
        bounds: ProjectedBounds,
        style: RectStyle,
    },
    /// Draggable corner handle of the selection rectangle.
    Vertex { point: ProjectedPoint, corner: Corner },
}

/// The map widget everything is drawn on.
///
/// Implemented by the browser glue over Leaflet and by a recording fake in
/// tests. The core calls nothing else on the surface.
pub trait MapSurface {
    fn projected_point_from_screen(&self, x_px: f64, y_px: f64) -> ProjectedPoint;
    fn current_zoom(&self) -> i32;
    fn viewport_center(&self) -> ProjectedPoint;
    fn set_viewport(&mut self, center: ProjectedPoint, zoom: i32);

    /// Adds the overlay, replacing any overlay already registered under `id`.
    fn add_overlay(&mut self, id: OverlayId, shape: &OverlayShape);
    fn remove_overlay(&mut self, id: OverlayId);

    fn subscribe(&mut self, kind: EventKind) -> ListenerId;
    fn unsubscribe(&mut self, id: ListenerId);

    fn set_tile_plane(&mut self, plane: i32);
}
