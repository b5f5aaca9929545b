//! player-ui: composable control-surface widgets for media players
//!
//! Widgets reflect the state of an external playback engine and forward user
//! intent back to it. State flows one way: engine events update the widgets,
//! user actions become engine commands, and the engine's echo never turns into
//! a second command.
//!
//! # Example
//! ```
//! use std::rc::Rc;
//! use player_ui::prelude::*;
//!
//! let mock = Rc::new(MockPlayer::new());
//! let player: PlayerHandle = mock.clone();
//!
//! let audio = Rc::new(AudioTrackSelectBox::new(ListSelectorConfig::default()).unwrap());
//! let item = Rc::new(SettingsPanelItem::new("Audio", audio.clone(), Default::default()).unwrap());
//! let page = SettingsPanelPage::new(SettingsPanelPageConfig::with_components(vec![
//!     item.clone() as ComponentRef,
//! ]))
//! .unwrap();
//!
//! let root: ComponentRef = Rc::new(page);
//! UiContext::default().attach(&root, &player);
//!
//! mock.load_source(
//!     vec![AudioTrack::new("en", "English"), AudioTrack::new("de", "German")],
//!     Some("en"),
//! );
//! assert!(item.component().is_shown());
//! assert_eq!(audio.select_box().selected().as_deref(), Some("en"));
//! ```

// Re-export everything from core, including the `Merge` derive
pub use player_ui_core::*;

// Re-export the widgets
pub use player_ui_components::*;

/// Prelude for convenient imports
pub mod prelude {
    // Framework
    pub use player_ui_core::prelude::*;

    // Widgets
    pub use player_ui_components::prelude::*;
}
