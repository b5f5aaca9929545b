//! Behavior facets widgets compose with their [`Component`](crate::component::Component)
//!
//! A facet owns the dispatchers of one behavior and is parameterized by the
//! widget type that appears as event sender.

use std::cell::Cell;
use std::fmt;

use tracing::debug;

use crate::event::{Event, EventDispatcher, NoArgs};

/// Something the user can click
pub struct Clickable<S: ?Sized> {
    on_click: EventDispatcher<S, NoArgs>,
}

impl<S: ?Sized> Clickable<S> {
    pub fn new() -> Self {
        Self {
            on_click: EventDispatcher::new("on_click"),
        }
    }

    /// Fire `on_click`
    pub fn click(&self, sender: &S) {
        self.on_click.dispatch(sender, &());
    }

    pub fn on_click(&self) -> Event<S, NoArgs> {
        self.on_click.event()
    }
}

impl<S: ?Sized> Default for Clickable<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ?Sized> fmt::Debug for Clickable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clickable").finish_non_exhaustive()
    }
}

/// Two-state switch, `off` initially
///
/// Real transitions fire `on_toggle` followed by `on_toggle_on` or
/// `on_toggle_off`. Setting the current state again fires nothing.
pub struct Toggle<S: ?Sized> {
    on: Cell<bool>,
    on_toggle: EventDispatcher<S, NoArgs>,
    on_toggle_on: EventDispatcher<S, NoArgs>,
    on_toggle_off: EventDispatcher<S, NoArgs>,
}

impl<S: ?Sized> Toggle<S> {
    pub fn new() -> Self {
        Self {
            on: Cell::new(false),
            on_toggle: EventDispatcher::new("on_toggle"),
            on_toggle_on: EventDispatcher::new("on_toggle_on"),
            on_toggle_off: EventDispatcher::new("on_toggle_off"),
        }
    }

    pub fn is_on(&self) -> bool {
        self.on.get()
    }

    pub fn is_off(&self) -> bool {
        !self.is_on()
    }

    /// Switch to `target` without firing; returns whether the state changed
    pub fn transition(&self, target: bool) -> bool {
        self.on.replace(target) != target
    }

    /// Switch to `target`, firing the toggle events on a real transition
    pub fn fire(&self, sender: &S, target: bool) -> bool {
        if !self.transition(target) {
            return false;
        }
        debug!(on = target, "Toggled");
        self.on_toggle.dispatch(sender, &());
        if target {
            self.on_toggle_on.dispatch(sender, &());
        } else {
            self.on_toggle_off.dispatch(sender, &());
        }
        true
    }

    pub fn switch_on(&self, sender: &S) -> bool {
        self.fire(sender, true)
    }

    pub fn switch_off(&self, sender: &S) -> bool {
        self.fire(sender, false)
    }

    /// Flip the state
    pub fn toggle(&self, sender: &S) {
        self.fire(sender, self.is_off());
    }

    /// Fire only the generic `on_toggle` event
    pub fn notify_toggle(&self, sender: &S) {
        self.on_toggle.dispatch(sender, &());
    }

    /// Fired on every transition
    pub fn on_toggle(&self) -> Event<S, NoArgs> {
        self.on_toggle.event()
    }

    pub fn on_toggle_on(&self) -> Event<S, NoArgs> {
        self.on_toggle_on.event()
    }

    pub fn on_toggle_off(&self) -> Event<S, NoArgs> {
        self.on_toggle_off.event()
    }
}

impl<S: ?Sized> Default for Toggle<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ?Sized> fmt::Debug for Toggle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toggle").field("on", &self.is_on()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::EventRecorder;

    fn record(toggle: &Toggle<str>) -> EventRecorder<&'static str> {
        let recorder = EventRecorder::new();
        recorder.record_with(&toggle.on_toggle(), |_, _| "toggle");
        recorder.record_with(&toggle.on_toggle_on(), |_, _| "on");
        recorder.record_with(&toggle.on_toggle_off(), |_, _| "off");
        recorder
    }

    #[test]
    fn test_toggle_sequence() {
        let toggle: Toggle<str> = Toggle::new();
        let recorder = record(&toggle);
        assert!(toggle.is_off());

        toggle.toggle("b");
        assert!(toggle.is_on());
        assert_eq!(recorder.drain(), vec!["toggle", "on"]);

        toggle.toggle("b");
        assert!(toggle.is_off());
        assert_eq!(recorder.drain(), vec!["toggle", "off"]);
    }

    #[test]
    fn test_switching_to_current_state_fires_nothing() {
        let toggle: Toggle<str> = Toggle::new();
        let recorder = record(&toggle);

        assert!(!toggle.switch_off("b"));
        assert!(toggle.switch_on("b"));
        assert!(!toggle.switch_on("b"));

        assert_eq!(recorder.drain(), vec!["toggle", "on"]);
    }

    #[test]
    fn test_transition_is_silent() {
        let toggle: Toggle<str> = Toggle::new();
        let recorder = record(&toggle);

        assert!(toggle.transition(true));
        assert!(!toggle.transition(true));
        assert!(toggle.is_on());
        assert!(!recorder.has_recorded());

        toggle.notify_toggle("b");
        assert_eq!(recorder.drain(), vec!["toggle"]);
    }

    #[test]
    fn test_click() {
        let clickable: Clickable<str> = Clickable::new();
        let recorder = EventRecorder::new();
        recorder.record_with(&clickable.on_click(), |sender, _| sender.to_string());

        clickable.click("button");
        assert_eq!(recorder.drain(), vec!["button"]);
    }
}
