//! Error types for component construction and state transitions

use std::fmt;

/// A merged configuration that cannot be used to build a component.
///
/// Raised at construction time; components are never created from an
/// invalid configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The configuration source could not be parsed
    Malformed(String),
    /// A component id is empty or contains whitespace
    InvalidId(String),
    /// A CSS class token is empty or contains whitespace
    InvalidCssClass(String),
    /// The CSS prefix is empty
    EmptyCssPrefix,
    /// Two children of one container share an id
    DuplicateComponent(String),
    /// A component was added to a container while still owned by another
    AlreadyParented {
        component: String,
        parent: String,
    },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(reason) => write!(f, "malformed configuration: {reason}"),
            Self::InvalidId(id) => write!(f, "invalid component id {id:?}"),
            Self::InvalidCssClass(class) => write!(f, "invalid css class {class:?}"),
            Self::EmptyCssPrefix => f.write_str("css prefix must not be empty"),
            Self::DuplicateComponent(id) => {
                write!(f, "component {id:?} appears twice in one container")
            }
            Self::AlreadyParented { component, parent } => write!(
                f,
                "component {component:?} is already owned by container {parent:?}"
            ),
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// A key that does not exist in the collection it was looked up in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotFoundError {
    /// What kind of thing was looked up ("item", "component")
    pub kind: &'static str,
    /// The key that was not found
    pub key: String,
}

impl NotFoundError {
    pub fn item(key: impl Into<String>) -> Self {
        Self {
            kind: "item",
            key: key.into(),
        }
    }

    pub fn component(key: impl Into<String>) -> Self {
        Self {
            kind: "component",
            key: key.into(),
        }
    }
}

impl fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?} not found", self.kind, self.key)
    }
}

impl std::error::Error for NotFoundError {}

/// Errors surfaced by player-ui operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiError {
    Configuration(ConfigurationError),
    NotFound(NotFoundError),
}

impl UiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl fmt::Display for UiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(err) => err.fmt(f),
            Self::NotFound(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for UiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Configuration(err) => Some(err),
            Self::NotFound(err) => Some(err),
        }
    }
}

impl From<ConfigurationError> for UiError {
    fn from(err: ConfigurationError) -> Self {
        Self::Configuration(err)
    }
}

impl From<NotFoundError> for UiError {
    fn from(err: NotFoundError) -> Self {
        Self::NotFound(err)
    }
}

impl From<serde_json::Error> for UiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Configuration(ConfigurationError::Malformed(err.to_string()))
    }
}
