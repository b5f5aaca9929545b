//! Components that own an ordered list of child components
//!
//! A [`Container`] configures its children, renders them in order and watches
//! their `active` and `shown` state. Every child change is re-fired as
//! [`on_child_state_changed`](Container::on_child_state_changed) after the
//! container has recomputed its aggregate state, so listeners always see the
//! fully updated child.
//!
//! Concrete containers wrap a `Container`, implement [`UiComponent`]
//! themselves and call [`Container::on_configure`] from their own
//! `on_configure`.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::component::{
    ActivityControl, Component, ComponentId, ComponentRef, ComponentTag, UiComponent,
};
use crate::config::{ComponentConfig, Merge};
use crate::context::UiContext;
use crate::dom::Element;
use crate::error::{ConfigurationError, UiError};
use crate::event::{Event, EventDispatcher, Listener, NoArgs};
use crate::player::PlayerHandle;

/// Marker class of the last shown child (behind the child's css prefix)
pub const LAST_CLASS: &str = "last";

/// Configuration of a container
#[derive(Clone, Default, Serialize, Deserialize, Merge)]
#[serde(default, rename_all = "camelCase")]
pub struct ContainerConfig {
    #[serde(flatten)]
    pub component: ComponentConfig,
    /// Initial children, in render order
    #[serde(skip)]
    pub components: Vec<ComponentRef>,
    /// Keep the `last` marker on the last shown child
    pub mark_last_shown: Option<bool>,
}

impl ContainerConfig {
    pub fn defaults() -> Self {
        Self {
            component: ComponentConfig {
                css_class: Some("ui-container".to_string()),
                ..Default::default()
            },
            components: Vec::new(),
            mark_last_shown: Some(false),
        }
    }

    pub fn with_components(components: Vec<ComponentRef>) -> Self {
        Self {
            components,
            ..Default::default()
        }
    }
}

impl fmt::Debug for ContainerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<&ComponentId> = self.components.iter().map(|c| c.component().id()).collect();
        f.debug_struct("ContainerConfig")
            .field("component", &self.component)
            .field("components", &ids)
            .field("mark_last_shown", &self.mark_last_shown)
            .finish()
    }
}

/// Which child state changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildState {
    Active,
    Shown,
}

/// Payload of [`Container::on_child_state_changed`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildStateChange {
    pub child: ComponentId,
    pub state: ChildState,
    /// New value of the state
    pub value: bool,
}

struct ChildSubscriptions {
    active: Listener<Component, bool>,
    shown: Listener<Component, bool>,
}

struct ChildEntry {
    child: ComponentRef,
    subscriptions: Option<ChildSubscriptions>,
}

struct ContainerEvents {
    on_components_changed: EventDispatcher<Container, NoArgs>,
    on_child_state_changed: EventDispatcher<Container, ChildStateChange>,
}

struct ContainerInner {
    component: Component,
    mark_last_shown: bool,
    children: RefCell<Vec<ChildEntry>>,
    /// Player and context from `on_configure`, used for late-added children
    wiring: RefCell<Option<(PlayerHandle, UiContext)>>,
    events: ContainerEvents,
}

/// A component with ordered children
///
/// `Container` is a cheap handle; clones refer to the same container.
#[derive(Clone)]
pub struct Container {
    inner: Rc<ContainerInner>,
}

impl Container {
    /// Create a container and take ownership of the configured children
    pub fn new(config: ContainerConfig) -> Result<Self, UiError> {
        Self::with_activity(config).map(|(container, _)| container)
    }

    /// Create a container together with the capability to change its active state
    pub fn with_activity(config: ContainerConfig) -> Result<(Self, ActivityControl), UiError> {
        let mut config = config;
        config.merge(ContainerConfig::defaults());

        let (component, control) = Component::with_activity(config.component)?;
        let container = Self {
            inner: Rc::new(ContainerInner {
                component,
                mark_last_shown: config.mark_last_shown.unwrap_or(false),
                children: RefCell::new(Vec::new()),
                wiring: RefCell::new(None),
                events: ContainerEvents {
                    on_components_changed: EventDispatcher::new("on_components_changed"),
                    on_child_state_changed: EventDispatcher::new("on_child_state_changed"),
                },
            }),
        };
        for child in config.components {
            if let Err(err) = container.adopt(child, None) {
                container.disown_all();
                return Err(err);
            }
        }
        Ok((container, control))
    }

    /// Add a child at `index` (appended when `None` or past the end)
    ///
    /// A child added after the container was configured is configured and
    /// observed right away.
    pub fn add_component(&self, child: ComponentRef, index: Option<usize>) -> Result<(), UiError> {
        let index = self.adopt(child.clone(), index)?;

        if let Some(element) = self.inner.component.element_if_created() {
            element.insert_child(index, child.element());
        }
        let wiring = self.inner.wiring.borrow().clone();
        if let Some((player, ui)) = wiring {
            child.configure(&player, &ui);
            self.observe(&child);
            self.recompute();
        }

        debug!(
            container = %self.inner.component.id(),
            child = %child.component().id(),
            index,
            "Component added"
        );
        self.inner.events.on_components_changed.dispatch(self, &());
        Ok(())
    }

    /// Remove a child; returns `false` if it is not a child of this container
    pub fn remove_component(&self, child: &ComponentRef) -> bool {
        let entry = {
            let mut children = self.inner.children.borrow_mut();
            let position = children
                .iter()
                .position(|e| e.child.component().ptr_eq(child.component()));
            match position {
                Some(index) => children.remove(index),
                None => return false,
            }
        };

        let component = entry.child.component();
        if let Some(subscriptions) = entry.subscriptions {
            component.on_active_changed().unsubscribe(&subscriptions.active);
            component.on_shown_changed().unsubscribe(&subscriptions.shown);
        }
        component.set_parent(None);
        if let (Some(element), Some(child_element)) = (
            self.inner.component.element_if_created(),
            component.element_if_created(),
        ) {
            element.remove_child(&child_element);
        }
        if self.inner.mark_last_shown {
            component.remove_class(&component.prefix_css(LAST_CLASS));
        }

        debug!(
            container = %self.inner.component.id(),
            child = %component.id(),
            "Component removed"
        );
        self.recompute();
        self.inner.events.on_components_changed.dispatch(self, &());
        true
    }

    /// Children in render order
    pub fn components(&self) -> Vec<ComponentRef> {
        self.inner
            .children
            .borrow()
            .iter()
            .map(|e| e.child.clone())
            .collect()
    }

    /// Children carrying `tag`, in render order
    pub fn components_with_tag(&self, tag: ComponentTag) -> Vec<ComponentRef> {
        self.inner
            .children
            .borrow()
            .iter()
            .filter(|e| e.child.tag() == tag)
            .map(|e| e.child.clone())
            .collect()
    }

    /// Find a child by id
    pub fn component_by_id(&self, id: &ComponentId) -> Option<ComponentRef> {
        self.inner
            .children
            .borrow()
            .iter()
            .find(|e| e.child.component().id() == id)
            .map(|e| e.child.clone())
    }

    /// Whether any child is active
    pub fn has_active_components(&self) -> bool {
        self.inner
            .children
            .borrow()
            .iter()
            .any(|e| e.child.component().is_active())
    }

    /// The last shown child
    pub fn last_shown(&self) -> Option<ComponentRef> {
        self.inner
            .children
            .borrow()
            .iter()
            .rev()
            .find(|e| e.child.component().is_shown())
            .map(|e| e.child.clone())
    }

    /// Move the `last` marker to the last shown of `candidates`
    ///
    /// The marker is cleared from every candidate first, so at most one
    /// candidate carries it afterwards.
    pub fn refresh_last_shown(&self, candidates: &[ComponentRef]) {
        let mut last = None;
        for candidate in candidates {
            let component = candidate.component();
            component.remove_class(&component.prefix_css(LAST_CLASS));
            if component.is_shown() {
                last = Some(component);
            }
        }
        if let Some(component) = last {
            component.add_class(component.prefix_css(LAST_CLASS));
        }
    }

    pub fn component(&self) -> &Component {
        &self.inner.component
    }

    /// Fired after a child was added or removed
    pub fn on_components_changed(&self) -> Event<Container, NoArgs> {
        self.inner.events.on_components_changed.event()
    }

    /// Fired after a child's `active` or `shown` state changed
    pub fn on_child_state_changed(&self) -> Event<Container, ChildStateChange> {
        self.inner.events.on_child_state_changed.event()
    }

    /// Configure every child, then start observing them
    pub fn on_configure(&self, player: &PlayerHandle, ui: &UiContext) {
        *self.inner.wiring.borrow_mut() = Some((player.clone(), ui.clone()));

        let children = self.components();
        for child in &children {
            child.configure(player, ui);
        }
        for child in &children {
            self.observe(child);
        }
        self.recompute();
    }

    /// Render the container element with every child element in order
    pub fn to_element(&self) -> Element {
        let element = Element::new("div");
        for child in self.components() {
            element.append(child.element());
        }
        element
    }

    fn ptr_eq(&self, other: &Container) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Register `child` as ours and return its index
    fn adopt(&self, child: ComponentRef, index: Option<usize>) -> Result<usize, UiError> {
        let component = child.component();
        if let Some(parent) = component.parent() {
            return Err(ConfigurationError::AlreadyParented {
                component: component.id().to_string(),
                parent: parent.to_string(),
            }
            .into());
        }

        let mut children = self.inner.children.borrow_mut();
        if children.iter().any(|e| e.child.component().id() == component.id()) {
            return Err(ConfigurationError::DuplicateComponent(component.id().to_string()).into());
        }
        component.set_parent(Some(self.inner.component.id().clone()));

        let index = index.unwrap_or(children.len()).min(children.len());
        children.insert(
            index,
            ChildEntry {
                child,
                subscriptions: None,
            },
        );
        Ok(index)
    }

    /// Release every child adopted so far; used when construction fails
    fn disown_all(&self) {
        let children = std::mem::take(&mut *self.inner.children.borrow_mut());
        for entry in children {
            entry.child.component().set_parent(None);
        }
    }

    fn observe(&self, child: &ComponentRef) {
        let mut children = self.inner.children.borrow_mut();
        let Some(entry) = children
            .iter_mut()
            .find(|e| e.child.component().ptr_eq(child.component()))
        else {
            return;
        };
        if entry.subscriptions.is_some() {
            return;
        }

        let component = child.component();
        let active = component
            .on_active_changed()
            .subscribe_fn(self.child_listener(ChildState::Active));
        let shown = component
            .on_shown_changed()
            .subscribe_fn(self.child_listener(ChildState::Shown));
        entry.subscriptions = Some(ChildSubscriptions { active, shown });
    }

    fn child_listener(&self, state: ChildState) -> impl Fn(&Component, &bool) + 'static {
        let weak: Weak<ContainerInner> = Rc::downgrade(&self.inner);
        move |child, value| {
            if let Some(inner) = weak.upgrade() {
                Container { inner }.child_state_changed(ChildStateChange {
                    child: child.id().clone(),
                    state,
                    value: *value,
                });
            }
        }
    }

    fn child_state_changed(&self, change: ChildStateChange) {
        debug!(
            container = %self.inner.component.id(),
            child = %change.child,
            state = ?change.state,
            value = change.value,
            "Child state changed"
        );
        self.recompute();
        self.inner.events.on_child_state_changed.dispatch(self, &change);
    }

    fn recompute(&self) {
        if self.inner.mark_last_shown {
            let children = self.components();
            self.refresh_last_shown(&children);
        }
    }
}

impl PartialEq for Container {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("component", &self.inner.component)
            .field("children", &self.inner.children.borrow().len())
            .finish()
    }
}

impl UiComponent for Container {
    fn component(&self) -> &Component {
        &self.inner.component
    }

    fn tag(&self) -> ComponentTag {
        ComponentTag::Container
    }

    fn to_element(&self) -> Element {
        Container::to_element(self)
    }

    fn on_configure(&self, player: &PlayerHandle, ui: &UiContext) {
        Container::on_configure(self, player, ui);
    }
}
