use serde::Serialize;
use tracing::trace;

use foundation::ids::{OverlayId, OverlayIds};
use foundation::math::{ProjectedPoint, ZoomContext};
use foundation::position::Position;
use foundation::region::Region;

use crate::surface::{MapSurface, OverlayShape, RectStyle};

/// Cell under the cursor, with its region coordinates when it is in the world.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct CursorReadout {
    pub position: Position,
    pub region_id: Option<i32>,
    pub region_base: Option<Position>,
    pub local: Option<(i32, i32)>,
}

impl CursorReadout {
    pub fn for_position(position: Position) -> Self {
        match Region::from_position(position) {
            Ok(region) => Self {
                position,
                region_id: Some(region.id()),
                region_base: Some(region.origin_position().with_plane(position.plane)),
                local: Some(region.local_offset(position)),
            },
            Err(_) => Self {
                position,
                region_id: None,
                region_base: None,
                local: None,
            },
        }
    }
}

/// Highlights the cell under the cursor.
#[derive(Debug)]
pub struct HoverCell {
    overlay: OverlayId,
    current: Option<Position>,
}

impl HoverCell {
    pub fn new(ids: &mut OverlayIds) -> Self {
        Self {
            overlay: ids.next_id(),
            current: None,
        }
    }

    pub fn position(&self) -> Option<Position> {
        self.current
    }

    pub fn overlay(&self) -> OverlayId {
        self.overlay
    }

    /// Moves the highlight to the cell containing `point`.
    ///
    /// Returns `true` if the hovered cell changed.
    pub fn on_mouse_move(
        &mut self,
        surface: &mut dyn MapSurface,
        point: ProjectedPoint,
        ctx: ZoomContext,
        plane: i32,
    ) -> bool {
        if !point.is_finite() {
            return false;
        }
        let pos = Position::from_projected(point, ctx, plane);
        if self.current == Some(pos) {
            return false;
        }
        if self.current.is_some() {
            surface.remove_overlay(self.overlay);
        }
        surface.add_overlay(
            self.overlay,
            &OverlayShape::Rectangle {
                bounds: pos.cell_bounds(ctx),
                style: RectStyle::HoverCell,
            },
        );
        trace!(x = pos.x, y = pos.y, plane = pos.plane, "hover cell moved");
        self.current = Some(pos);
        true
    }

    pub fn clear(&mut self, surface: &mut dyn MapSurface) {
        if self.current.take().is_some() {
            surface.remove_overlay(self.overlay);
        }
    }

    pub fn readout(&self) -> Option<CursorReadout> {
        self.current.map(CursorReadout::for_position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::fake::{Call, FakeSurface};
    use pretty_assertions::assert_eq;

    #[test]
    fn readout_reports_region_and_local_offset() {
        let r = CursorReadout::for_position(Position::new(3210, 3263, 1));
        assert_eq!(r.region_id, Some(12850));
        assert_eq!(r.region_base, Some(Position::new(3200, 3200, 1)));
        assert_eq!(r.local, Some((10, 63)));

        let outside = CursorReadout::for_position(Position::new(-1, 5, 0));
        assert_eq!(outside.region_id, None);
        assert_eq!(outside.local, None);
    }

    #[test]
    fn overlay_is_replaced_only_when_cell_changes() {
        let mut ids = OverlayIds::new();
        let mut hover = HoverCell::new(&mut ids);
        let mut surface = FakeSurface::new();
        let ctx = ZoomContext::new(0);
        let id = hover.overlay();

        assert!(hover.on_mouse_move(&mut surface, ProjectedPoint::new(10.2, 20.7), ctx, 0));
        assert!(!hover.on_mouse_move(&mut surface, ProjectedPoint::new(10.9, 20.1), ctx, 0));
        assert!(hover.on_mouse_move(&mut surface, ProjectedPoint::new(11.0, 20.1), ctx, 0));

        assert_eq!(
            surface.take_calls(),
            vec![Call::AddOverlay(id), Call::RemoveOverlay(id), Call::AddOverlay(id)]
        );
        assert_eq!(hover.position(), Some(Position::new(20, 11, 0)));
        match surface.overlays.get(&id) {
            Some(OverlayShape::Rectangle { bounds, style }) => {
                assert_eq!(*style, RectStyle::HoverCell);
                assert_eq!((bounds.west(), bounds.south()), (20.0, 11.0));
                assert_eq!((bounds.east(), bounds.north()), (21.0, 12.0));
            }
            other => panic!("unexpected overlay {other:?}"),
        }

        hover.clear(&mut surface);
        hover.clear(&mut surface);
        assert!(surface.overlays.is_empty());
        assert_eq!(hover.readout(), None);
    }

    #[test]
    fn plane_change_counts_as_a_new_cell() {
        let mut ids = OverlayIds::new();
        let mut hover = HoverCell::new(&mut ids);
        let mut surface = FakeSurface::new();
        let ctx = ZoomContext::new(2);
        let p = ProjectedPoint::new(5.5, 5.5);

        assert!(hover.on_mouse_move(&mut surface, p, ctx, 0));
        assert!(hover.on_mouse_move(&mut surface, p, ctx, 1));
        assert_eq!(hover.readout().map(|r| r.position.plane), Some(1));
    }
}
