//! Host context shared by every component of a tree

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::component::ComponentRef;
use crate::dom::Element;
use crate::error::UiError;
use crate::player::PlayerHandle;

/// Platform traits that change widget behavior
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Platform {
    pub ios: bool,
    pub mac_intel: bool,
    pub touch_supported: bool,
}

impl Platform {
    /// Whether focusing a select box opens it (iOS, and iPadOS posing as macOS)
    pub fn opens_select_on_focus(&self) -> bool {
        self.ios || (self.mac_intel && self.touch_supported)
    }
}

/// Host-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UiConfig {
    pub platform: Platform,
    /// Never move focus automatically
    pub disable_auto_focus: bool,
}

impl UiConfig {
    pub fn from_json(json: &str) -> Result<Self, UiError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Context handed to [`UiComponent::configure`](crate::component::UiComponent::configure)
///
/// Cheap to clone; clones share the same configuration.
#[derive(Debug, Clone, Default)]
pub struct UiContext {
    config: Rc<UiConfig>,
}

impl UiContext {
    pub fn new(config: UiConfig) -> Self {
        Self {
            config: Rc::new(config),
        }
    }

    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    /// Whether components may move focus on their own
    pub fn auto_focus_enabled(&self) -> bool {
        !self.config.disable_auto_focus && !self.config.platform.opens_select_on_focus()
    }

    /// Configure a component tree against `player` and return its root element
    pub fn attach(&self, root: &ComponentRef, player: &PlayerHandle) -> Element {
        root.configure(player, self);
        let element = root.element();
        tracing::debug!(component = %root.component().id(), "Attached component tree");
        element
    }
}
