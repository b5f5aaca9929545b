//! Test utilities for player-ui widgets
//!
//! - [`MockPlayer`]: in-memory engine that records commands and lets tests
//!   fire engine events
//! - [`EventRecorder`]: subscribes to events and records what they carried
//! - Assertion macros for verifying recorded values
//!
//! # Example
//!
//! ```ignore
//! use player_ui::testing::{EventRecorder, MockPlayer, PlayerCommand};
//!
//! let player = Rc::new(MockPlayer::new());
//! let recorder = EventRecorder::new();
//! recorder.record(&select_box.on_item_selected());
//!
//! player.load_source(tracks, Some("en"));
//! select_box.element().trigger("change", DomEvent::with_value("de"));
//!
//! assert_eq!(player.drain_commands(), vec![PlayerCommand::SetAudio("de".into())]);
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use tokio::sync::mpsc;

use crate::event::{Event, Listener};
use crate::player::{AudioTrack, Player, PlayerEvent, PlayerEventHandler, PlayerEventType};

/// Records values produced by event listeners.
///
/// Values travel through an unbounded channel and are collected with
/// [`drain`](EventRecorder::drain), in the order the events fired.
pub struct EventRecorder<T> {
    tx: mpsc::UnboundedSender<T>,
    rx: RefCell<mpsc::UnboundedReceiver<T>>,
}

impl<T: 'static> EventRecorder<T> {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: RefCell::new(rx),
        }
    }

    /// Subscribe to `event`, recording `map(sender, args)` for every dispatch
    pub fn record_with<S, A>(
        &self,
        event: &Event<S, A>,
        map: impl Fn(&S, &A) -> T + 'static,
    ) -> Listener<S, A>
    where
        S: ?Sized + 'static,
        A: 'static,
    {
        let tx = self.tx.clone();
        event.subscribe_fn(move |sender, args| {
            let _ = tx.send(map(sender, args));
        })
    }

    /// Drain everything recorded so far
    pub fn drain(&self) -> Vec<T> {
        let mut rx = self.rx.borrow_mut();
        let mut values = Vec::new();
        while let Ok(value) = rx.try_recv() {
            values.push(value);
        }
        values
    }

    /// Check whether anything was recorded (drains the recorder)
    pub fn has_recorded(&self) -> bool {
        !self.drain().is_empty()
    }
}

impl<A: Clone + 'static> EventRecorder<A> {
    /// Subscribe to `event`, recording the event arguments
    pub fn record<S: ?Sized + 'static>(&self, event: &Event<S, A>) -> Listener<S, A> {
        self.record_with(event, |_, args: &A| args.clone())
    }
}

impl<T: 'static> Default for EventRecorder<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A command a widget sent to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCommand {
    SetAudio(String),
}

/// In-memory engine for tests.
///
/// Behaves like a real engine where it matters to widgets: queries return
/// nothing until a source is loaded, and `set_audio` to a different existing
/// track fires `AudioChanged`.
pub struct MockPlayer {
    ready: Cell<bool>,
    audio_tracks: RefCell<Vec<AudioTrack>>,
    current_audio: RefCell<Option<String>>,
    handlers: RefCell<HashMap<PlayerEventType, Vec<PlayerEventHandler>>>,
    tx: mpsc::UnboundedSender<PlayerCommand>,
    rx: RefCell<mpsc::UnboundedReceiver<PlayerCommand>>,
}

impl MockPlayer {
    /// Create an engine without a source
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            ready: Cell::new(false),
            audio_tracks: RefCell::new(Vec::new()),
            current_audio: RefCell::new(None),
            handlers: RefCell::new(HashMap::new()),
            tx,
            rx: RefCell::new(rx),
        }
    }

    /// Load a source with the given tracks and fire `SourceLoaded` + `Ready`
    pub fn load_source(&self, tracks: Vec<AudioTrack>, current: Option<&str>) {
        *self.audio_tracks.borrow_mut() = tracks;
        *self.current_audio.borrow_mut() = current.map(str::to_string);
        self.fire(PlayerEvent::SourceLoaded);
        self.ready.set(true);
        self.fire(PlayerEvent::Ready);
    }

    /// Drop the source and fire `SourceUnloaded`
    pub fn unload(&self) {
        self.ready.set(false);
        self.audio_tracks.borrow_mut().clear();
        self.current_audio.borrow_mut().take();
        self.fire(PlayerEvent::SourceUnloaded);
    }

    /// Engine-side track switch (not requested by a widget)
    pub fn switch_audio(&self, track_id: &str) {
        let track = self.find_track(track_id);
        if let Some(track) = track {
            *self.current_audio.borrow_mut() = Some(track.id.clone());
            self.fire(PlayerEvent::AudioChanged { track });
        }
    }

    pub fn add_audio(&self, track: AudioTrack) {
        self.audio_tracks.borrow_mut().push(track.clone());
        self.fire(PlayerEvent::AudioAdded { track });
    }

    pub fn remove_audio(&self, track_id: &str) {
        let removed = {
            let mut tracks = self.audio_tracks.borrow_mut();
            let index = tracks.iter().position(|t| t.id == track_id);
            index.map(|i| tracks.remove(i))
        };
        if let Some(track) = removed {
            let mut current = self.current_audio.borrow_mut();
            if current.as_deref() == Some(track_id) {
                current.take();
            }
            drop(current);
            self.fire(PlayerEvent::AudioRemoved { track });
        }
    }

    /// Deliver an event to the registered handlers
    pub fn fire(&self, event: PlayerEvent) {
        let handlers: Vec<PlayerEventHandler> = self
            .handlers
            .borrow()
            .get(&event.event_type())
            .cloned()
            .unwrap_or_default();
        for handler in handlers {
            handler(&event);
        }
    }

    /// Number of handlers registered for an event
    pub fn handler_count(&self, event: PlayerEventType) -> usize {
        self.handlers.borrow().get(&event).map_or(0, Vec::len)
    }

    /// Drain all commands sent by widgets so far
    pub fn drain_commands(&self) -> Vec<PlayerCommand> {
        let mut rx = self.rx.borrow_mut();
        let mut commands = Vec::new();
        while let Ok(command) = rx.try_recv() {
            commands.push(command);
        }
        commands
    }

    fn find_track(&self, track_id: &str) -> Option<AudioTrack> {
        self.audio_tracks
            .borrow()
            .iter()
            .find(|t| t.id == track_id)
            .cloned()
    }
}

impl Default for MockPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Player for MockPlayer {
    fn is_ready(&self) -> bool {
        self.ready.get()
    }

    fn available_audio(&self) -> Vec<AudioTrack> {
        if !self.ready.get() {
            return Vec::new();
        }
        self.audio_tracks.borrow().clone()
    }

    fn audio(&self) -> Option<AudioTrack> {
        let current = self.current_audio.borrow().clone()?;
        self.find_track(&current)
    }

    fn set_audio(&self, track_id: &str) {
        let _ = self.tx.send(PlayerCommand::SetAudio(track_id.to_string()));
        let unchanged = self.current_audio.borrow().as_deref() == Some(track_id);
        if !unchanged {
            self.switch_audio(track_id);
        }
    }

    fn add_event_handler(&self, event: PlayerEventType, handler: PlayerEventHandler) {
        self.handlers
            .borrow_mut()
            .entry(event)
            .or_default()
            .push(handler);
    }

    fn remove_event_handler(&self, event: PlayerEventType, handler: &PlayerEventHandler) {
        if let Some(handlers) = self.handlers.borrow_mut().get_mut(&event) {
            if let Some(index) = handlers.iter().position(|h| Rc::ptr_eq(h, handler)) {
                handlers.remove(index);
            }
        }
    }
}

/// Assert that a value matching a pattern was recorded.
///
/// # Example
///
/// ```ignore
/// use player_ui::assert_emitted;
///
/// let selections = recorder.drain();
/// assert_emitted!(selections, ItemSelection { from_user: true, .. });
/// ```
#[macro_export]
macro_rules! assert_emitted {
    ($values:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            $values.iter().any(|v| matches!(v, $pattern $(if $guard)?)),
            "Expected a value matching `{}` to be emitted, but got: {:?}",
            stringify!($pattern),
            $values
        );
    };
}

/// Assert that no value matching a pattern was recorded.
///
/// # Example
///
/// ```ignore
/// use player_ui::assert_not_emitted;
///
/// let commands = player.drain_commands();
/// assert_not_emitted!(commands, PlayerCommand::SetAudio(_));
/// ```
#[macro_export]
macro_rules! assert_not_emitted {
    ($values:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            !$values.iter().any(|v| matches!(v, $pattern $(if $guard)?)),
            "Expected no value matching `{}` to be emitted, but it was: {:?}",
            stringify!($pattern),
            $values
        );
    };
}

/// Count how many recorded values match a pattern.
///
/// # Example
///
/// ```ignore
/// use player_ui::count_emitted;
///
/// let commands = player.drain_commands();
/// assert_eq!(count_emitted!(commands, PlayerCommand::SetAudio(_)), 1);
/// ```
#[macro_export]
macro_rules! count_emitted {
    ($values:expr, $pattern:pat $(if $guard:expr)?) => {
        $values.iter().filter(|v| matches!(v, $pattern $(if $guard)?)).count()
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventDispatcher;

    #[test]
    fn test_recorder_keeps_order() {
        let dispatcher: EventDispatcher<str, u32> = EventDispatcher::new("test");
        let recorder = EventRecorder::new();
        recorder.record(&dispatcher.event());

        dispatcher.dispatch("s", &1);
        dispatcher.dispatch("s", &2);

        assert_eq!(recorder.drain(), vec![1, 2]);
        assert!(recorder.drain().is_empty());
    }

    #[test]
    fn test_recorder_listener_can_be_removed() {
        let dispatcher: EventDispatcher<str, u32> = EventDispatcher::new("test");
        let recorder = EventRecorder::new();
        let listener = recorder.record_with(&dispatcher.event(), |sender, v| format!("{sender}{v}"));

        dispatcher.dispatch("a", &1);
        dispatcher.event().unsubscribe(&listener);
        dispatcher.dispatch("b", &2);

        assert_eq!(recorder.drain(), vec!["a1"]);
    }

    #[test]
    fn test_mock_player_not_ready_until_loaded() {
        let player = MockPlayer::new();
        assert!(!player.is_ready());
        assert!(player.available_audio().is_empty());

        player.load_source(
            vec![AudioTrack::new("en", "English"), AudioTrack::new("de", "German")],
            Some("en"),
        );
        assert!(player.is_ready());
        assert_eq!(player.available_audio().len(), 2);
        assert_eq!(player.audio().map(|t| t.id), Some("en".to_string()));

        player.unload();
        assert!(player.audio().is_none());
        assert!(player.available_audio().is_empty());
    }

    #[test]
    fn test_mock_player_set_audio_fires_change() {
        let player = MockPlayer::new();
        player.load_source(
            vec![AudioTrack::new("en", "English"), AudioTrack::new("de", "German")],
            Some("en"),
        );

        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = changes.clone();
        let handler: PlayerEventHandler = Rc::new(move |event: &PlayerEvent| {
            if let PlayerEvent::AudioChanged { track } = event {
                sink.borrow_mut().push(track.id.clone());
            }
        });
        player.add_event_handler(PlayerEventType::AudioChanged, handler.clone());

        player.set_audio("de");
        player.set_audio("de");
        assert_eq!(*changes.borrow(), vec!["de"]);
        assert_eq!(
            player.drain_commands(),
            vec![
                PlayerCommand::SetAudio("de".into()),
                PlayerCommand::SetAudio("de".into())
            ]
        );

        player.remove_event_handler(PlayerEventType::AudioChanged, &handler);
        assert_eq!(player.handler_count(PlayerEventType::AudioChanged), 0);
    }

    #[test]
    fn test_mock_player_remove_current_track() {
        let player = MockPlayer::new();
        player.load_source(vec![AudioTrack::new("en", "English")], Some("en"));
        player.remove_audio("en");
        assert!(player.audio().is_none());
        assert!(player.available_audio().is_empty());
    }

    #[test]
    fn test_assert_macros() {
        let commands = vec![
            PlayerCommand::SetAudio("en".into()),
            PlayerCommand::SetAudio("de".into()),
        ];

        assert_emitted!(commands, PlayerCommand::SetAudio(id) if id == "de");
        assert_not_emitted!(commands, PlayerCommand::SetAudio(id) if id == "fr");
        assert_eq!(count_emitted!(commands, PlayerCommand::SetAudio(_)), 2);
    }
}
