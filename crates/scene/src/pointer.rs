use runtime::event_bus::PointerEvent;

use crate::surface::MapSurface;

/// Interactive overlay driven by pointer input.
///
/// Handlers are composed into the world and receive the events their
/// subscriptions asked for. `Owner` is whoever gets told about changes.
pub trait PointerHandler {
    type Owner: ?Sized;

    /// Returns `true` if the handler consumed the event.
    fn on_pointer_down(
        &mut self,
        surface: &mut dyn MapSurface,
        event: PointerEvent,
        owner: &mut Self::Owner,
    ) -> bool;

    fn on_pointer_move(
        &mut self,
        surface: &mut dyn MapSurface,
        event: PointerEvent,
        owner: &mut Self::Owner,
    ) -> bool;

    fn on_pointer_up(
        &mut self,
        surface: &mut dyn MapSurface,
        event: PointerEvent,
        owner: &mut Self::Owner,
    ) -> bool;

    fn render(&self, surface: &mut dyn MapSurface);
}
