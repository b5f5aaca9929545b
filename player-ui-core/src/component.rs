//! Component base and lifecycle
//!
//! A [`Component`] is the state every widget shares: identity, merged
//! configuration, the lazily created visual handle and the two observable
//! booleans `shown` and `active`. Widgets own a `Component` and implement
//! [`UiComponent`] to describe how they render and how they wire themselves to
//! the player.
//!
//! # Lifecycle
//!
//! 1. Construction merges and validates the configuration.
//! 2. [`UiComponent::configure`] runs the widget's `on_configure` once.
//! 3. [`UiComponent::element`] renders the element on first access and passes
//!    it through the attach step, which applies id, classes, ARIA attributes
//!    and the hidden state in one place for every component.
//!
//! # Example
//!
//! ```
//! use player_ui_core::component::{Component, UiComponent};
//! use player_ui_core::config::ComponentConfig;
//!
//! let component = Component::new(ComponentConfig {
//!     hidden: Some(true),
//!     ..Default::default()
//! })
//! .unwrap();
//!
//! let element = component.element();
//! assert!(element.has_class("ui-hidden"));
//!
//! component.show();
//! assert!(!element.has_class("ui-hidden"));
//! ```

use std::cell::{Cell, OnceCell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;

use crate::config::{ComponentConfig, Merge};
use crate::context::UiContext;
use crate::dom::{Element, HIDDEN_CLASS};
use crate::error::UiError;
use crate::event::{Event, EventDispatcher, NoArgs};
use crate::player::PlayerHandle;

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// Unique identifier of a component
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(String);

impl ComponentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh `ui-id-N` id
    pub fn generate() -> Self {
        Self(format!("ui-id-{}", NEXT_ID.fetch_add(1, Ordering::Relaxed)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Role of a component inside its container
///
/// Containers filter their children by tag instead of inspecting types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentTag {
    Generic,
    Button,
    Label,
    Selector,
    SettingsItem,
    Container,
}

struct ComponentEvents {
    on_shown: EventDispatcher<Component, NoArgs>,
    on_hidden: EventDispatcher<Component, NoArgs>,
    on_shown_changed: EventDispatcher<Component, bool>,
    on_active_changed: EventDispatcher<Component, bool>,
}

struct ComponentInner {
    id: ComponentId,
    config: ComponentConfig,
    shown: Cell<bool>,
    active: Cell<bool>,
    configured: Cell<bool>,
    parent: RefCell<Option<ComponentId>>,
    /// Classes added at runtime (markers, state classes)
    classes: RefCell<Vec<String>>,
    element: OnceCell<Element>,
    events: ComponentEvents,
}

/// Shared state of every widget
///
/// `Component` is a cheap handle; clones refer to the same component.
#[derive(Clone)]
pub struct Component {
    inner: Rc<ComponentInner>,
}

impl Component {
    /// Create a component from a configuration
    ///
    /// The configuration is completed with [`ComponentConfig::defaults`] and
    /// validated. A component configured as hidden starts hidden.
    pub fn new(config: ComponentConfig) -> Result<Self, UiError> {
        let mut config = config;
        config.merge(ComponentConfig::defaults());
        config.validate()?;

        let id = config
            .id
            .clone()
            .map(ComponentId::new)
            .unwrap_or_else(ComponentId::generate);
        let shown = !config.is_hidden();
        let mut classes = Vec::new();
        if !shown {
            classes.push(format!("{}-{}", config.css_prefix(), HIDDEN_CLASS));
        }

        Ok(Self {
            inner: Rc::new(ComponentInner {
                id,
                config,
                shown: Cell::new(shown),
                active: Cell::new(false),
                configured: Cell::new(false),
                parent: RefCell::new(None),
                classes: RefCell::new(classes),
                element: OnceCell::new(),
                events: ComponentEvents {
                    on_shown: EventDispatcher::new("on_shown"),
                    on_hidden: EventDispatcher::new("on_hidden"),
                    on_shown_changed: EventDispatcher::new("on_shown_changed"),
                    on_active_changed: EventDispatcher::new("on_active_changed"),
                },
            }),
        })
    }

    /// Create a component together with the capability to change its active state
    pub fn with_activity(config: ComponentConfig) -> Result<(Self, ActivityControl), UiError> {
        let component = Self::new(config)?;
        let control = ActivityControl {
            component: component.clone(),
        };
        Ok((component, control))
    }

    pub fn id(&self) -> &ComponentId {
        &self.inner.id
    }

    pub fn config(&self) -> &ComponentConfig {
        &self.inner.config
    }

    /// Configured css classes: main class first, then the extra classes
    pub fn css_classes(&self) -> Vec<String> {
        let config = &self.inner.config;
        config
            .css_class
            .iter()
            .chain(config.css_classes.iter())
            .cloned()
            .collect()
    }

    /// Prefix a runtime class name (`last` -> `ui-last`)
    pub fn prefix_css(&self, name: &str) -> String {
        format!("{}-{}", self.inner.config.css_prefix(), name)
    }

    pub fn is_shown(&self) -> bool {
        self.inner.shown.get()
    }

    pub fn is_hidden(&self) -> bool {
        !self.is_shown()
    }

    /// Show the component; fires `on_shown` and `on_shown_changed` on transition
    pub fn show(&self) {
        if self.inner.shown.replace(true) {
            return;
        }
        self.remove_class(&self.prefix_css(HIDDEN_CLASS));
        debug!(component = %self.id(), "Component shown");
        self.inner.events.on_shown.dispatch(self, &());
        self.inner.events.on_shown_changed.dispatch(self, &true);
    }

    /// Hide the component; fires `on_hidden` and `on_shown_changed` on transition
    pub fn hide(&self) {
        if !self.inner.shown.replace(false) {
            return;
        }
        self.add_class(self.prefix_css(HIDDEN_CLASS));
        debug!(component = %self.id(), "Component hidden");
        self.inner.events.on_hidden.dispatch(self, &());
        self.inner.events.on_shown_changed.dispatch(self, &false);
    }

    pub fn is_active(&self) -> bool {
        self.inner.active.get()
    }

    fn set_active(&self, active: bool) -> bool {
        if self.inner.active.replace(active) == active {
            return false;
        }
        debug!(component = %self.id(), active, "Component active state changed");
        self.inner.events.on_active_changed.dispatch(self, &active);
        true
    }

    /// Add a runtime class, mirrored to the element once it exists
    pub fn add_class(&self, class: impl Into<String>) {
        let class = class.into();
        {
            let mut classes = self.inner.classes.borrow_mut();
            if classes.contains(&class) {
                return;
            }
            classes.push(class.clone());
        }
        if let Some(element) = self.inner.element.get() {
            element.add_class(class);
        }
    }

    pub fn remove_class(&self, class: &str) {
        self.inner.classes.borrow_mut().retain(|c| c != class);
        if let Some(element) = self.inner.element.get() {
            element.remove_class(class);
        }
    }

    /// Whether a runtime class is set
    pub fn has_class(&self, class: &str) -> bool {
        self.inner.classes.borrow().iter().any(|c| c == class)
    }

    /// The element, if it has been rendered already
    pub fn element_if_created(&self) -> Option<Element> {
        self.inner.element.get().cloned()
    }

    /// Return the element, rendering it with `render` on first access
    pub fn element_or_init(&self, render: impl FnOnce() -> Element) -> Element {
        if let Some(element) = self.inner.element.get() {
            return element.clone();
        }
        let element = render();
        self.attach(&element);
        match self.inner.element.set(element.clone()) {
            Ok(()) => element,
            // Rendered re-entrantly; keep the element that won
            Err(_) => self.inner.element.get().cloned().unwrap_or(element),
        }
    }

    /// Attach step every rendered element goes through
    fn attach(&self, element: &Element) {
        let config = &self.inner.config;
        element.set_attr("id", self.id().as_str());
        for class in self.css_classes() {
            element.add_class(class);
        }
        if let Some(role) = &config.role {
            element.set_attr("role", role.clone());
        }
        if let Some(label) = &config.aria_label {
            element.set_attr("aria-label", label.clone());
        }
        for class in self.inner.classes.borrow().iter() {
            element.add_class(class.clone());
        }
        debug!(component = %self.id(), shown = self.is_shown(), "Component attached");
    }

    /// Mark the component configured; `false` if it already was
    pub fn begin_configure(&self) -> bool {
        !self.inner.configured.replace(true)
    }

    pub fn is_configured(&self) -> bool {
        self.inner.configured.get()
    }

    /// Allow the next `configure` to run again, after the widget detached
    pub fn end_configure(&self) {
        if self.inner.configured.replace(false) {
            debug!(component = %self.id(), "Component detached");
        }
    }

    /// Id of the owning container
    pub fn parent(&self) -> Option<ComponentId> {
        self.inner.parent.borrow().clone()
    }

    pub(crate) fn set_parent(&self, parent: Option<ComponentId>) {
        *self.inner.parent.borrow_mut() = parent;
    }

    pub fn ptr_eq(&self, other: &Component) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Fired when the component becomes visible
    pub fn on_shown(&self) -> Event<Component, NoArgs> {
        self.inner.events.on_shown.event()
    }

    /// Fired when the component becomes invisible
    pub fn on_hidden(&self) -> Event<Component, NoArgs> {
        self.inner.events.on_hidden.event()
    }

    /// Fired on every visibility transition with the new state
    pub fn on_shown_changed(&self) -> Event<Component, bool> {
        self.inner.events.on_shown_changed.event()
    }

    /// Fired on every active transition with the new state
    pub fn on_active_changed(&self) -> Event<Component, bool> {
        self.inner.events.on_active_changed.event()
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.inner.id)
            .field("shown", &self.is_shown())
            .field("active", &self.is_active())
            .finish()
    }
}

/// Capability to change a component's active state
///
/// Only the widget that created the component holds one; everybody else can
/// observe `active` but not change it.
pub struct ActivityControl {
    component: Component,
}

impl ActivityControl {
    /// Set the active state; returns whether it changed
    pub fn set_active(&self, active: bool) -> bool {
        self.component.set_active(active)
    }

    pub fn component(&self) -> &Component {
        &self.component
    }
}

impl fmt::Debug for ActivityControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivityControl")
            .field("component", self.component.id())
            .finish()
    }
}

/// A renderable, configurable widget
///
/// Implementors provide `component`, `to_element` and optionally
/// `on_configure`; `configure` and `element` carry the shared lifecycle.
pub trait UiComponent {
    /// The shared component state
    fn component(&self) -> &Component;

    /// Role of this widget inside containers
    fn tag(&self) -> ComponentTag {
        ComponentTag::Generic
    }

    /// Build the element from the current configuration
    ///
    /// Called at most once per component; id, classes and hidden state are
    /// applied afterwards by the attach step.
    fn to_element(&self) -> Element;

    /// Wire the widget to the player and its own events
    #[allow(unused_variables)]
    fn on_configure(&self, player: &PlayerHandle, ui: &UiContext) {}

    /// Configure the widget; repeated calls are ignored
    fn configure(&self, player: &PlayerHandle, ui: &UiContext) {
        let component = self.component();
        if component.begin_configure() {
            debug!(component = %component.id(), "Configuring component");
            self.on_configure(player, ui);
        } else {
            debug!(component = %component.id(), "Component already configured");
        }
    }

    /// The rendered element, created on first access
    fn element(&self) -> Element {
        self.component().element_or_init(|| self.to_element())
    }
}

/// Shared handle to any widget, as stored by containers
pub type ComponentRef = Rc<dyn UiComponent>;

impl UiComponent for Component {
    fn component(&self) -> &Component {
        self
    }

    fn to_element(&self) -> Element {
        Element::new("div")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{EventRecorder, MockPlayer};

    #[test]
    fn test_generated_and_explicit_ids() {
        let a = Component::new(ComponentConfig::default()).unwrap();
        let b = Component::new(ComponentConfig::default()).unwrap();
        assert_ne!(a.id(), b.id());
        assert!(a.id().as_str().starts_with("ui-id-"));

        let c = Component::new(ComponentConfig::with_id("seek")).unwrap();
        assert_eq!(c.id().as_str(), "seek");
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let err = Component::new(ComponentConfig::with_id("")).unwrap_err();
        assert!(matches!(err, UiError::Configuration(_)));
    }

    #[test]
    fn test_defaults_fill_config() {
        let component = Component::new(ComponentConfig::with_classes(["extra"])).unwrap();
        assert_eq!(component.css_classes(), vec!["ui-component", "extra"]);
        assert_eq!(component.prefix_css("last"), "ui-last");
    }

    #[test]
    fn test_show_hide_fire_only_on_transition() {
        let component = Component::new(ComponentConfig::default()).unwrap();
        let recorder = EventRecorder::new();
        recorder.record_with(&component.on_shown(), |_, _| "shown");
        recorder.record_with(&component.on_hidden(), |_, _| "hidden");
        recorder.record_with(&component.on_shown_changed(), |_, shown| {
            if *shown {
                "changed:true"
            } else {
                "changed:false"
            }
        });

        component.show();
        component.hide();
        component.hide();
        component.show();

        assert_eq!(
            recorder.drain(),
            vec!["hidden", "changed:false", "shown", "changed:true"]
        );
    }

    #[test]
    fn test_active_changes_only_through_control() {
        let (component, control) = Component::with_activity(ComponentConfig::default()).unwrap();
        let recorder = EventRecorder::new();
        recorder.record(&component.on_active_changed());

        assert!(!component.is_active());
        assert!(control.set_active(true));
        assert!(!control.set_active(true));
        assert!(control.set_active(false));

        assert_eq!(recorder.drain(), vec![true, false]);
    }

    #[test]
    fn test_hidden_config_applied_on_attach() {
        let component = Component::new(ComponentConfig {
            hidden: Some(true),
            role: Some("menu".into()),
            ..Default::default()
        })
        .unwrap();
        assert!(component.is_hidden());

        let element = component.element();
        assert!(element.has_class("ui-hidden"));
        assert!(element.has_class("ui-component"));
        assert_eq!(element.attr("role").as_deref(), Some("menu"));
        assert_eq!(element.attr("id").as_deref(), Some(component.id().as_str()));
    }

    #[test]
    fn test_element_created_once() {
        let component = Component::new(ComponentConfig::default()).unwrap();
        assert!(component.element_if_created().is_none());
        let first = component.element();
        let second = component.element();
        assert!(first.ptr_eq(&second));
    }

    #[test]
    fn test_runtime_classes_mirror_to_element() {
        let component = Component::new(ComponentConfig::default()).unwrap();
        component.add_class("ui-last");
        let element = component.element();
        assert!(element.has_class("ui-last"));

        component.remove_class("ui-last");
        assert!(!element.has_class("ui-last"));
        assert!(!component.has_class("ui-last"));
    }

    #[test]
    fn test_configure_runs_once() {
        let component = Component::new(ComponentConfig::default()).unwrap();
        let player: PlayerHandle = Rc::new(MockPlayer::new());
        let ui = UiContext::default();

        assert!(!component.is_configured());
        component.configure(&player, &ui);
        assert!(component.is_configured());
        assert!(!component.begin_configure());

        component.end_configure();
        assert!(!component.is_configured());
        component.configure(&player, &ui);
        assert!(component.is_configured());
    }
}
