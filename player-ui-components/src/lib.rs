//! Pre-built player control widgets for player-ui
//!
//! Every widget here is a cheap `Clone` handle around shared state, implements
//! [`UiComponent`](player_ui_core::UiComponent) and exposes typed events whose
//! sender is the widget itself.
//!
//! # Components
//!
//! - [`Button`] - Clickable button with a text span
//! - [`ToggleButton`] - Button with on/off state
//! - [`Label`] - Text label, optionally bound to an input
//! - [`SelectBox`] - Drop-down over a list of key/label items
//! - [`AudioTrackSelectBox`] - Select box mirroring the player's audio tracks
//! - [`SettingsPanelItem`] - Label plus setting, shown only when there is a choice
//! - [`SettingsPanelPage`] - Page of settings items with focus handling
//! - [`SeekBarLabel`] - Time and thumbnail preview for the seek bar
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use player_ui_components::prelude::*;
//! use player_ui_core::{ListSelectorConfig, MockPlayer, PlayerHandle, UiComponent, UiContext};
//!
//! let audio = Rc::new(AudioTrackSelectBox::new(ListSelectorConfig::default()).unwrap());
//! let item = SettingsPanelItem::new("Audio", audio, SettingsPanelItemConfig::default()).unwrap();
//!
//! let player: PlayerHandle = Rc::new(MockPlayer::new());
//! item.configure(&player, &UiContext::default());
//!
//! // No tracks yet, so there is nothing to choose from
//! assert!(item.component().is_hidden());
//! ```

mod audio_track_select_box;
mod button;
mod label;
mod seek_bar_label;
mod select_box;
mod settings_panel_item;
mod settings_panel_page;
mod toggle_button;

pub use audio_track_select_box::AudioTrackSelectBox;
pub use button::{Button, ButtonConfig};
pub use label::{Label, LabelConfig};
pub use seek_bar_label::{SeekBarLabel, SeekBarLabelConfig, Thumbnail};
pub use select_box::SelectBox;
pub use settings_panel_item::{SettingsPanelItem, SettingsPanelItemConfig};
pub use settings_panel_page::{AutoFocusOn, SettingsPanelPage, SettingsPanelPageConfig};
pub use toggle_button::ToggleButton;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        AudioTrackSelectBox, AutoFocusOn, Button, ButtonConfig, Label, LabelConfig, SeekBarLabel,
        SeekBarLabelConfig, SelectBox, SettingsPanelItem, SettingsPanelItemConfig,
        SettingsPanelPage, SettingsPanelPageConfig, Thumbnail, ToggleButton,
    };
}
