use std::collections::BTreeMap;

use foundation::ids::{ListenerId, OverlayId};
use foundation::math::ProjectedPoint;

/// Event kinds the rendering surface can deliver.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    Move,
    Zoom,
    MouseMove,
    PointerDown,
    PointerMove,
    PointerUp,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Move => "move",
            EventKind::Zoom => "zoom",
            EventKind::MouseMove => "mousemove",
            EventKind::PointerDown => "pointerdown",
            EventKind::PointerMove => "pointermove",
            EventKind::PointerUp => "pointerup",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "move" => Some(EventKind::Move),
            "zoom" => Some(EventKind::Zoom),
            "mousemove" => Some(EventKind::MouseMove),
            "pointerdown" | "mousedown" => Some(EventKind::PointerDown),
            "pointermove" => Some(EventKind::PointerMove),
            "pointerup" | "mouseup" => Some(EventKind::PointerUp),
            _ => None,
        }
    }
}

/// Pointer input already converted to projected space by the surface.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerEvent {
    pub point: ProjectedPoint,
    /// Overlay under the pointer, if the surface hit one.
    pub target: Option<OverlayId>,
    pub shift: bool,
}

impl PointerEvent {
    pub fn at(point: ProjectedPoint) -> Self {
        Self {
            point,
            target: None,
            shift: false,
        }
    }

    pub fn on(point: ProjectedPoint, target: OverlayId) -> Self {
        Self {
            point,
            target: Some(target),
            shift: false,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MapEvent {
    Move,
    Zoom,
    MouseMove(ProjectedPoint),
    PointerDown(PointerEvent),
    PointerMove(PointerEvent),
    PointerUp(PointerEvent),
}

impl MapEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            MapEvent::Move => EventKind::Move,
            MapEvent::Zoom => EventKind::Zoom,
            MapEvent::MouseMove(_) => EventKind::MouseMove,
            MapEvent::PointerDown(_) => EventKind::PointerDown,
            MapEvent::PointerMove(_) => EventKind::PointerMove,
            MapEvent::PointerUp(_) => EventKind::PointerUp,
        }
    }
}

/// Subscription registry backing a surface's event API.
///
/// Ids are never reused, so a stale id can't remove somebody else's listener.
#[derive(Debug, Default)]
pub struct Listeners {
    next_id: u64,
    active: BTreeMap<ListenerId, EventKind>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, kind: EventKind) -> ListenerId {
        let id = ListenerId::new(self.next_id);
        self.next_id += 1;
        self.active.insert(id, kind);
        id
    }

    /// Returns `true` if the listener was active.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.active.remove(&id).is_some()
    }

    pub fn is_subscribed(&self, kind: EventKind) -> bool {
        self.active.values().any(|k| *k == kind)
    }

    /// Listeners for `kind`, in registration order.
    pub fn listeners_for(&self, kind: EventKind) -> impl Iterator<Item = ListenerId> + '_ {
        self.active
            .iter()
            .filter(move |(_, k)| **k == kind)
            .map(|(id, _)| *id)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
