/// Identifies an overlay object registered with the rendering surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OverlayId(u64);

impl OverlayId {
    pub fn new(n: u64) -> Self {
        OverlayId(n)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Identifies one event subscription on the rendering surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    pub fn new(n: u64) -> Self {
        ListenerId(n)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Monotonic overlay id source. Ids are never reused.
#[derive(Debug, Default)]
pub struct OverlayIds {
    next: u64,
}

impl OverlayIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> OverlayId {
        let id = OverlayId(self.next);
        self.next += 1;
        id
    }
}
