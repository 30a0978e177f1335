//! Conversion of raw surface callbacks into [`MapEvent`]s.

use foundation::ids::OverlayId;
use foundation::math::ProjectedPoint;
use runtime::event_bus::{EventKind, MapEvent, PointerEvent};

/// Builds an event from the primitive arguments the Leaflet shim passes.
///
/// `target` is the overlay id under the pointer, or a negative number for
/// none. Unknown kinds and non-finite coordinates on pointer events yield
/// `None`.
pub fn event_from_parts(kind: &str, lat: f64, lng: f64, target: f64, shift: bool) -> Option<MapEvent> {
    let kind = EventKind::parse(kind)?;
    let point = ProjectedPoint::new(lat, lng);
    let pointer = PointerEvent {
        point,
        target: (target.is_finite() && target >= 0.0).then(|| OverlayId::new(target as u64)),
        shift,
    };
    match kind {
        EventKind::Move => Some(MapEvent::Move),
        EventKind::Zoom => Some(MapEvent::Zoom),
        _ if !point.is_finite() => None,
        EventKind::MouseMove => Some(MapEvent::MouseMove(point)),
        EventKind::PointerDown => Some(MapEvent::PointerDown(pointer)),
        EventKind::PointerMove => Some(MapEvent::PointerMove(pointer)),
        EventKind::PointerUp => Some(MapEvent::PointerUp(pointer)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn viewport_events_ignore_coordinates() {
        assert_eq!(
            event_from_parts("move", f64::NAN, f64::NAN, -1.0, false),
            Some(MapEvent::Move)
        );
        assert_eq!(
            event_from_parts("zoom", 0.0, 0.0, -1.0, false),
            Some(MapEvent::Zoom)
        );
    }

    #[test]
    fn pointer_events_carry_target_and_shift() {
        assert_eq!(
            event_from_parts("pointerdown", 3200.0, 3210.0, 7.0, true),
            Some(MapEvent::PointerDown(PointerEvent {
                point: ProjectedPoint::new(3200.0, 3210.0),
                target: Some(OverlayId::new(7)),
                shift: true,
            }))
        );
        assert_eq!(
            event_from_parts("mouseup", 1.0, 2.0, -1.0, false),
            Some(MapEvent::PointerUp(PointerEvent::at(ProjectedPoint::new(1.0, 2.0))))
        );
        assert_eq!(
            event_from_parts("mousemove", 1.0, 2.0, -1.0, false),
            Some(MapEvent::MouseMove(ProjectedPoint::new(1.0, 2.0)))
        );
    }

    #[test]
    fn garbage_is_dropped() {
        assert_eq!(event_from_parts("click", 1.0, 1.0, -1.0, false), None);
        assert_eq!(
            event_from_parts("pointermove", f64::INFINITY, 1.0, -1.0, false),
            None
        );
    }
}
