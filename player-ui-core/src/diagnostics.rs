//! Diagnostic channel for listener failures
//!
//! A listener that panics while an event is being dispatched is isolated: the
//! remaining listeners still receive the event. The failure itself is always
//! logged through `tracing`, and additionally sent to the failure sink of the
//! current thread when the host installed one.
//!
//! ```ignore
//! let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
//! player_ui_core::diagnostics::set_failure_sink(tx);
//!
//! // ... dispatch events ...
//!
//! while let Ok(failure) = rx.try_recv() {
//!     eprintln!("{failure}");
//! }
//! ```

use std::any::Any;
use std::cell::RefCell;
use std::fmt;

use tokio::sync::mpsc;

/// A listener that panicked during dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerFailure {
    /// Name of the event being dispatched
    pub event: &'static str,
    /// Position of the listener in the dispatch snapshot
    pub index: usize,
    /// Panic payload rendered as text
    pub message: String,
}

impl fmt::Display for ListenerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "listener #{} of event '{}' failed: {}",
            self.index, self.event, self.message
        )
    }
}

thread_local! {
    static FAILURE_SINK: RefCell<Option<mpsc::UnboundedSender<ListenerFailure>>> =
        const { RefCell::new(None) };
}

/// Install the failure sink for the current thread, returning the previous one
pub fn set_failure_sink(
    tx: mpsc::UnboundedSender<ListenerFailure>,
) -> Option<mpsc::UnboundedSender<ListenerFailure>> {
    FAILURE_SINK.with(|sink| sink.borrow_mut().replace(tx))
}

/// Remove the failure sink of the current thread
pub fn clear_failure_sink() -> Option<mpsc::UnboundedSender<ListenerFailure>> {
    FAILURE_SINK.with(|sink| sink.borrow_mut().take())
}

/// Report a listener failure
pub fn report(failure: ListenerFailure) {
    tracing::error!(
        event = failure.event,
        listener = failure.index,
        message = %failure.message,
        "Event listener failed"
    );

    let sink = FAILURE_SINK.with(|sink| sink.borrow().clone());
    if let Some(tx) = sink {
        if tx.send(failure).is_err() {
            // Receiver is gone
            clear_failure_sink();
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
