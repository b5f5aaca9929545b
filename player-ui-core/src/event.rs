//! Typed publish/subscribe events
//!
//! Every observable thing in player-ui is exposed through a pair of types over
//! one listener registry:
//!
//! - [`EventDispatcher`] is kept private by the owner and is the only way to
//!   fire the event.
//! - [`Event`] is handed out to everybody else and can only subscribe and
//!   unsubscribe.
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use player_ui_core::event::{EventDispatcher, NoArgs};
//!
//! let dispatcher: EventDispatcher<str, NoArgs> = EventDispatcher::new("on_ping");
//! let hits = Rc::new(Cell::new(0));
//!
//! let counter = hits.clone();
//! let listener = dispatcher.event().subscribe_fn(move |_, _| counter.set(counter.get() + 1));
//!
//! dispatcher.dispatch("sender", &());
//! dispatcher.event().unsubscribe(&listener);
//! dispatcher.dispatch("sender", &());
//!
//! assert_eq!(hits.get(), 1);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

use crate::diagnostics::{self, ListenerFailure};

/// Argument type for events that carry no payload
pub type NoArgs = ();

/// A registered event callback, identified by its `Rc` allocation
pub type Listener<S, A> = Rc<dyn Fn(&S, &A)>;

type Registry<S, A> = Rc<RefCell<Vec<Listener<S, A>>>>;

/// Wrap a closure as a [`Listener`]
pub fn listener<S: ?Sized, A>(f: impl Fn(&S, &A) + 'static) -> Listener<S, A> {
    Rc::new(f)
}

/// Owner-side half of an event: the only handle that can dispatch.
///
/// Subscribing the same listener twice registers it twice and it is then
/// invoked twice per dispatch.
pub struct EventDispatcher<S: ?Sized, A> {
    name: &'static str,
    listeners: Registry<S, A>,
}

impl<S: ?Sized, A> EventDispatcher<S, A> {
    /// Create a dispatcher; `name` identifies the event in diagnostics
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            listeners: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Name of the event
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Register a listener
    pub fn subscribe(&self, listener: Listener<S, A>) {
        self.listeners.borrow_mut().push(listener);
    }

    /// Remove the first registration of `listener`
    ///
    /// Returns `false` if the listener was not registered.
    pub fn unsubscribe(&self, listener: &Listener<S, A>) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        match listeners.iter().position(|l| Rc::ptr_eq(l, listener)) {
            Some(index) => {
                listeners.remove(index);
                true
            }
            None => false,
        }
    }

    /// Number of registrations
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Invoke every listener registered at call time, in subscription order
    ///
    /// Listeners run against a snapshot of the registry, so they may subscribe
    /// or unsubscribe (themselves included) while the event is delivered. A
    /// panicking listener is reported through [`diagnostics`] and does not
    /// stop delivery to the listeners after it.
    pub fn dispatch(&self, sender: &S, args: &A) {
        let snapshot: Vec<Listener<S, A>> = self.listeners.borrow().clone();
        for (index, listener) in snapshot.iter().enumerate() {
            let result = catch_unwind(AssertUnwindSafe(|| listener(sender, args)));
            if let Err(payload) = result {
                diagnostics::report(ListenerFailure {
                    event: self.name,
                    index,
                    message: diagnostics::panic_message(payload.as_ref()),
                });
            }
        }
    }

    /// Subscribe-only handle for handing out to other components
    pub fn event(&self) -> Event<S, A> {
        Event {
            name: self.name,
            listeners: self.listeners.clone(),
        }
    }
}

impl<S: ?Sized, A> fmt::Debug for EventDispatcher<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("name", &self.name)
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Subscriber-side half of an event
pub struct Event<S: ?Sized, A> {
    name: &'static str,
    listeners: Registry<S, A>,
}

impl<S: ?Sized, A> Event<S, A> {
    /// Name of the event
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Register a listener
    pub fn subscribe(&self, listener: Listener<S, A>) {
        self.listeners.borrow_mut().push(listener);
    }

    /// Register a closure and return the listener for later removal
    pub fn subscribe_fn(&self, f: impl Fn(&S, &A) + 'static) -> Listener<S, A>
    where
        S: 'static,
        A: 'static,
    {
        let listener = listener(f);
        self.subscribe(listener.clone());
        listener
    }

    /// Remove the first registration of `listener`
    pub fn unsubscribe(&self, listener: &Listener<S, A>) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        match listeners.iter().position(|l| Rc::ptr_eq(l, listener)) {
            Some(index) => {
                listeners.remove(index);
                true
            }
            None => false,
        }
    }
}

impl<S: ?Sized, A> Clone for Event<S, A> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            listeners: self.listeners.clone(),
        }
    }
}

impl<S: ?Sized, A> fmt::Debug for Event<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    type Log = Rc<RefCell<Vec<String>>>;

    fn logging(log: &Log, tag: &'static str) -> Listener<str, u32> {
        let log = log.clone();
        listener(move |sender: &str, args: &u32| {
            log.borrow_mut().push(format!("{tag}:{sender}:{args}"));
        })
    }

    #[test]
    fn test_dispatch_in_subscription_order() {
        let dispatcher: EventDispatcher<str, u32> = EventDispatcher::new("test");
        let log: Log = Rc::default();

        dispatcher.subscribe(logging(&log, "a"));
        dispatcher.subscribe(logging(&log, "b"));
        dispatcher.dispatch("s", &7);

        assert_eq!(*log.borrow(), vec!["a:s:7", "b:s:7"]);
    }

    #[test]
    fn test_double_subscribe_delivers_twice() {
        let dispatcher: EventDispatcher<str, u32> = EventDispatcher::new("test");
        let log: Log = Rc::default();
        let listener = logging(&log, "a");

        dispatcher.subscribe(listener.clone());
        dispatcher.subscribe(listener.clone());
        dispatcher.dispatch("s", &1);
        assert_eq!(log.borrow().len(), 2);

        // Only the first registration goes away
        assert!(dispatcher.unsubscribe(&listener));
        dispatcher.dispatch("s", &2);
        assert_eq!(log.borrow().len(), 3);
        assert_eq!(dispatcher.listener_count(), 1);
    }

    #[test]
    fn test_unsubscribe_absent_is_noop() {
        let dispatcher: EventDispatcher<str, u32> = EventDispatcher::new("test");
        let log: Log = Rc::default();
        let listener = logging(&log, "a");

        assert!(!dispatcher.unsubscribe(&listener));
        assert_eq!(dispatcher.listener_count(), 0);
    }

    #[test]
    fn test_event_handle_shares_registry() {
        let dispatcher: EventDispatcher<str, u32> = EventDispatcher::new("on_value");
        let event = dispatcher.event();
        let log: Log = Rc::default();

        let inner = log.clone();
        let listener = event.subscribe_fn(move |_, v| inner.borrow_mut().push(v.to_string()));
        assert_eq!(event.name(), "on_value");

        dispatcher.dispatch("s", &3);
        event.unsubscribe(&listener);
        dispatcher.dispatch("s", &4);

        assert_eq!(*log.borrow(), vec!["3"]);
    }

    #[test]
    fn test_only_events_dispatched_while_subscribed() {
        let dispatcher: EventDispatcher<str, u32> = EventDispatcher::new("test");
        let log: Log = Rc::default();
        let listener = logging(&log, "a");

        dispatcher.dispatch("s", &1);
        dispatcher.subscribe(listener.clone());
        dispatcher.dispatch("s", &2);
        dispatcher.unsubscribe(&listener);
        dispatcher.dispatch("s", &3);

        assert_eq!(*log.borrow(), vec!["a:s:2"]);
    }

    #[test]
    fn test_unsubscribe_during_dispatch_uses_snapshot() {
        let dispatcher: Rc<EventDispatcher<str, u32>> = Rc::new(EventDispatcher::new("test"));
        let log: Log = Rc::default();
        let second = logging(&log, "second");

        // First listener removes the second one while the event is in flight
        let remover = {
            let dispatcher = dispatcher.clone();
            let second = second.clone();
            let log = log.clone();
            listener(move |_: &str, args: &u32| {
                log.borrow_mut().push(format!("first:{args}"));
                dispatcher.unsubscribe(&second);
            })
        };

        dispatcher.subscribe(remover);
        dispatcher.subscribe(second);

        dispatcher.dispatch("s", &1);
        dispatcher.dispatch("s", &2);

        assert_eq!(*log.borrow(), vec!["first:1", "second:s:1", "first:2"]);
    }

    #[test]
    fn test_self_unsubscribe_completes_current_invocation() {
        let dispatcher: Rc<EventDispatcher<str, u32>> = Rc::new(EventDispatcher::new("test"));
        let calls = Rc::new(Cell::new(0));
        let slot: Rc<RefCell<Option<Listener<str, u32>>>> = Rc::default();

        let me: Listener<str, u32> = {
            let dispatcher = dispatcher.clone();
            let calls = calls.clone();
            let slot = slot.clone();
            listener(move |_, _| {
                if let Some(me) = slot.borrow().as_ref() {
                    dispatcher.unsubscribe(me);
                }
                calls.set(calls.get() + 1);
            })
        };
        *slot.borrow_mut() = Some(me.clone());
        dispatcher.subscribe(me);

        dispatcher.dispatch("s", &1);
        dispatcher.dispatch("s", &2);

        assert_eq!(calls.get(), 1);
        assert_eq!(dispatcher.listener_count(), 0);
        slot.borrow_mut().take();
    }

    #[test]
    fn test_subscribe_during_dispatch_waits_for_next_dispatch() {
        let dispatcher: Rc<EventDispatcher<str, u32>> = Rc::new(EventDispatcher::new("test"));
        let log: Log = Rc::default();
        let late = logging(&log, "late");

        let adder: Listener<str, u32> = {
            let dispatcher = dispatcher.clone();
            let late = late.clone();
            let added = Cell::new(false);
            listener(move |_, _| {
                if !added.replace(true) {
                    dispatcher.subscribe(late.clone());
                }
            })
        };
        dispatcher.subscribe(adder);

        dispatcher.dispatch("s", &1);
        assert!(log.borrow().is_empty());
        dispatcher.dispatch("s", &2);
        assert_eq!(*log.borrow(), vec!["late:s:2"]);
    }

    #[test]
    fn test_failing_listener_does_not_abort_dispatch() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        diagnostics::set_failure_sink(tx);

        let dispatcher: EventDispatcher<str, u32> = EventDispatcher::new("on_fail");
        let log: Log = Rc::default();

        dispatcher.subscribe(listener(|_, _| panic!("listener exploded")));
        dispatcher.subscribe(logging(&log, "after"));
        dispatcher.dispatch("s", &5);

        assert_eq!(*log.borrow(), vec!["after:s:5"]);
        let failure = rx.try_recv().unwrap();
        assert_eq!(failure.event, "on_fail");
        assert_eq!(failure.index, 0);
        assert_eq!(failure.message, "listener exploded");

        diagnostics::clear_failure_sink();
    }
}
