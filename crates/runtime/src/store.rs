use foundation::view::ViewState;
use tracing::trace;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverId(u64);

type Observer = Box<dyn FnMut(&ViewState)>;

/// Observable holder of the live [`ViewState`].
///
/// Observers run synchronously, in registration order, on every publish.
pub struct ViewStore {
    state: ViewState,
    next_id: u64,
    observers: Vec<(ObserverId, Observer)>,
}

impl ViewStore {
    pub fn new(initial: ViewState) -> Self {
        Self {
            state: initial,
            next_id: 0,
            observers: Vec::new(),
        }
    }

    pub fn get(&self) -> ViewState {
        self.state
    }

    /// Replaces the state and notifies every observer, even if unchanged.
    pub fn publish(&mut self, state: ViewState) {
        trace!(
            x = state.center.x,
            y = state.center.y,
            plane = state.plane,
            zoom = state.zoom,
            "view published"
        );
        self.state = state;
        for (_, observer) in &mut self.observers {
            observer(&self.state);
        }
    }

    pub fn update(&mut self, f: impl FnOnce(ViewState) -> ViewState) {
        let next = f(self.state);
        self.publish(next);
    }

    pub fn observe(&mut self, observer: impl FnMut(&ViewState) + 'static) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unobserve(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(oid, _)| *oid != id);
        self.observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

impl Default for ViewStore {
    fn default() -> Self {
        Self::new(ViewState::default())
    }
}

impl std::fmt::Debug for ViewStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewStore")
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::ViewStore;
    use foundation::position::Position;
    use foundation::view::ViewState;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn observers_see_every_publish_in_order() {
        let seen: Rc<RefCell<Vec<(u8, i32)>>> = Rc::default();
        let mut store = ViewStore::default();

        let s1 = Rc::clone(&seen);
        store.observe(move |v| s1.borrow_mut().push((1, v.zoom)));
        let s2 = Rc::clone(&seen);
        store.observe(move |v| s2.borrow_mut().push((2, v.zoom)));

        store.publish(ViewState::new(Position::new(1, 1, 0), 3));
        store.publish(ViewState::new(Position::new(1, 1, 0), 3));

        assert_eq!(*seen.borrow(), vec![(1, 3), (2, 3), (1, 3), (2, 3)]);
    }

    #[test]
    fn unobserve_stops_notifications() {
        let count = Rc::new(RefCell::new(0));
        let mut store = ViewStore::default();
        let c = Rc::clone(&count);
        let id = store.observe(move |_| *c.borrow_mut() += 1);

        store.update(|v| v.with_plane(2));
        assert!(store.unobserve(id));
        assert!(!store.unobserve(id));
        store.update(|v| v.with_plane(3));

        assert_eq!(*count.borrow(), 1);
        assert_eq!(store.get().plane, 3);
        assert_eq!(store.observer_count(), 0);
    }
}
