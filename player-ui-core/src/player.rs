//! Boundary to the external playback engine
//!
//! Widgets talk to the engine only through the [`Player`] trait: queries
//! return snapshots, commands request a change, and named events notify about
//! changes. Calls and event delivery are synchronous from the widgets' point
//! of view; the engine decides when (and whether) a command results in an
//! event.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// An audio track offered by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioTrack {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

impl AudioTrack {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            lang: None,
        }
    }
}

/// Event names handlers can register for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerEventType {
    /// A source finished loading and the engine accepts queries
    Ready,
    /// A new source started loading
    SourceLoaded,
    /// The current source went away
    SourceUnloaded,
    /// The active audio track changed
    AudioChanged,
    /// An audio track became available
    AudioAdded,
    /// An audio track stopped being available
    AudioRemoved,
}

/// Event payload delivered to handlers
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    Ready,
    SourceLoaded,
    SourceUnloaded,
    AudioChanged { track: AudioTrack },
    AudioAdded { track: AudioTrack },
    AudioRemoved { track: AudioTrack },
}

impl PlayerEvent {
    /// Get the event type for this event
    pub fn event_type(&self) -> PlayerEventType {
        match self {
            PlayerEvent::Ready => PlayerEventType::Ready,
            PlayerEvent::SourceLoaded => PlayerEventType::SourceLoaded,
            PlayerEvent::SourceUnloaded => PlayerEventType::SourceUnloaded,
            PlayerEvent::AudioChanged { .. } => PlayerEventType::AudioChanged,
            PlayerEvent::AudioAdded { .. } => PlayerEventType::AudioAdded,
            PlayerEvent::AudioRemoved { .. } => PlayerEventType::AudioRemoved,
        }
    }
}

/// Callback registered with the engine; identified by its `Rc` allocation
pub type PlayerEventHandler = Rc<dyn Fn(&PlayerEvent)>;

/// The playback engine as seen by widgets
pub trait Player {
    /// Whether a source is loaded and queries return meaningful data
    fn is_ready(&self) -> bool;

    /// Audio tracks of the current source (empty when not ready)
    fn available_audio(&self) -> Vec<AudioTrack>;

    /// Currently active audio track
    fn audio(&self) -> Option<AudioTrack>;

    /// Request switching the audio track
    fn set_audio(&self, track_id: &str);

    fn add_event_handler(&self, event: PlayerEventType, handler: PlayerEventHandler);

    /// Remove the first registration of `handler` for `event`
    fn remove_event_handler(&self, event: PlayerEventType, handler: &PlayerEventHandler);
}

/// Shared handle to the engine passed to `configure`
pub type PlayerHandle = Rc<dyn Player>;
