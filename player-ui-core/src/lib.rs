//! Core traits and types for player-ui
//!
//! This crate provides the component, event and selection framework that every
//! player-ui widget is built from. Widgets reflect the state of an external
//! playback engine and forward user intent back to it.
//!
//! # Core Concepts
//!
//! - **Event**: typed publish/subscribe; only the owner can dispatch
//! - **Component**: identity, merged configuration, lazily rendered element,
//!   observable `shown` and `active` state
//! - **Container**: a component owning ordered children and aggregating their
//!   state
//! - **ListSelector**: single selection over an ordered key/label list
//! - **Player**: the engine boundary widgets talk to
//!
//! # Basic Example
//!
//! ```
//! use std::rc::Rc;
//! use player_ui_core::prelude::*;
//!
//! let button = Rc::new(Component::new(ComponentConfig::with_id("play")).unwrap());
//! let bar = Container::new(ContainerConfig::with_components(vec![button.clone() as ComponentRef])).unwrap();
//!
//! let player: PlayerHandle = Rc::new(MockPlayer::new());
//! let root: ComponentRef = Rc::new(bar);
//! let element = UiContext::default().attach(&root, &player);
//!
//! assert_eq!(element.children().len(), 1);
//! assert!(button.is_configured());
//! ```
//!
//! # Threading
//!
//! Everything here is single-threaded: handles are `Rc` based and events are
//! delivered synchronously on the calling thread.

extern crate self as player_ui_core;

pub mod component;
pub mod config;
pub mod container;
pub mod context;
pub mod diagnostics;
pub mod dom;
pub mod error;
pub mod event;
pub mod facet;
pub mod list_selector;
pub mod player;
pub mod testing;

// Component exports
pub use component::{ActivityControl, Component, ComponentId, ComponentRef, ComponentTag, UiComponent};
pub use container::{ChildState, ChildStateChange, Container, ContainerConfig, LAST_CLASS};
pub use facet::{Clickable, Toggle};
pub use list_selector::{ItemSelection, ListItem, ListSelector, ListSelectorConfig};

// Configuration exports
pub use config::{merged, ComponentConfig, Merge, DEFAULT_CSS_PREFIX};
pub use context::{Platform, UiConfig, UiContext};

// Event exports
pub use diagnostics::ListenerFailure;
pub use event::{listener, Event, EventDispatcher, Listener, NoArgs};

// Boundary exports
pub use dom::{DomEvent, Element};
pub use player::{AudioTrack, Player, PlayerEvent, PlayerEventHandler, PlayerEventType, PlayerHandle};

// Error exports
pub use error::{ConfigurationError, NotFoundError, UiError};

// Testing exports
pub use testing::{EventRecorder, MockPlayer, PlayerCommand};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::component::{
        ActivityControl, Component, ComponentId, ComponentRef, ComponentTag, UiComponent,
    };
    pub use crate::config::{merged, ComponentConfig, Merge};
    pub use crate::container::{ChildStateChange, Container, ContainerConfig};
    pub use crate::context::{UiConfig, UiContext};
    pub use crate::dom::{DomEvent, Element};
    pub use crate::error::{ConfigurationError, NotFoundError, UiError};
    pub use crate::event::{listener, Event, EventDispatcher, Listener, NoArgs};
    pub use crate::facet::{Clickable, Toggle};
    pub use crate::list_selector::{ItemSelection, ListItem, ListSelector, ListSelectorConfig};
    pub use crate::player::{AudioTrack, Player, PlayerEvent, PlayerEventType, PlayerHandle};
    pub use crate::testing::{EventRecorder, MockPlayer};
}
