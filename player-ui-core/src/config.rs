//! Declarative component configuration and merging
//!
//! A component's configuration is assembled from up to three layers: what the
//! caller passed, the defaults of the component kind, and the configuration of
//! the base the kind is built on. Layers are merged left to right with
//! [`merged`]:
//!
//! - scalar fields (`Option<T>`) keep the first value that is present
//! - list fields (`Vec<T>`) are concatenated, caller first
//!
//! ```
//! use player_ui_core::config::{merged, ComponentConfig};
//!
//! let overrides = ComponentConfig {
//!     css_class: Some("b".into()),
//!     css_classes: vec!["y".into()],
//!     ..Default::default()
//! };
//! let defaults = ComponentConfig {
//!     css_class: Some("a".into()),
//!     css_classes: vec!["x".into()],
//!     ..Default::default()
//! };
//!
//! let config = merged(overrides, defaults, ComponentConfig::defaults());
//! assert_eq!(config.css_class.as_deref(), Some("b"));
//! assert_eq!(config.css_classes, vec!["y".to_string(), "x".to_string()]);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, UiError};

pub use player_ui_macros::Merge;

/// Default prefix for runtime css classes (`ui-last`, `ui-hidden`, ...)
pub const DEFAULT_CSS_PREFIX: &str = "ui";

/// Layered configuration merging
///
/// Use `#[derive(Merge)]` on configuration records; every field is merged
/// with its own `Merge` impl unless marked `#[merge(skip)]`.
pub trait Merge {
    /// Fill `self` from `other` without overwriting what `self` already has
    fn merge(&mut self, other: Self);
}

impl<T> Merge for Option<T> {
    fn merge(&mut self, other: Self) {
        if self.is_none() {
            *self = other;
        }
    }
}

impl<T> Merge for Vec<T> {
    fn merge(&mut self, other: Self) {
        self.extend(other);
    }
}

/// Merge caller overrides, kind defaults and base configuration, in that order
pub fn merged<C: Merge>(overrides: C, defaults: C, base: C) -> C {
    let mut config = overrides;
    config.merge(defaults);
    config.merge(base);
    config
}

/// Configuration shared by every component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Merge)]
#[serde(default, rename_all = "camelCase")]
pub struct ComponentConfig {
    /// Element id; generated when absent
    pub id: Option<String>,
    /// Prefix for runtime marker classes
    pub css_prefix: Option<String>,
    /// Main css class of the component kind
    pub css_class: Option<String>,
    /// Additional css classes
    pub css_classes: Vec<String>,
    /// Start hidden
    pub hidden: Option<bool>,
    /// ARIA role of the rendered element
    pub role: Option<String>,
    /// ARIA label of the rendered element
    pub aria_label: Option<String>,
}

impl ComponentConfig {
    /// Defaults every component falls back to
    pub fn defaults() -> Self {
        Self {
            css_prefix: Some(DEFAULT_CSS_PREFIX.to_string()),
            css_class: Some("ui-component".to_string()),
            hidden: Some(false),
            ..Default::default()
        }
    }

    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self, UiError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Shorthand for a config that only carries extra css classes
    pub fn with_classes<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            css_classes: classes.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Shorthand for a config with a fixed id
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Check the merged configuration
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if let Some(id) = &self.id {
            if id.is_empty() || id.chars().any(char::is_whitespace) {
                return Err(ConfigurationError::InvalidId(id.clone()));
            }
        }
        if let Some(prefix) = &self.css_prefix {
            if prefix.is_empty() {
                return Err(ConfigurationError::EmptyCssPrefix);
            }
        }
        for class in self.css_class.iter().chain(self.css_classes.iter()) {
            if class.is_empty() || class.chars().any(char::is_whitespace) {
                return Err(ConfigurationError::InvalidCssClass(class.clone()));
            }
        }
        Ok(())
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden.unwrap_or(false)
    }

    pub fn css_prefix(&self) -> &str {
        self.css_prefix.as_deref().unwrap_or(DEFAULT_CSS_PREFIX)
    }
}
