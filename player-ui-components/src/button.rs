//! Clickable button component

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use player_ui_core::config::{ComponentConfig, Merge};
use player_ui_core::{
    listener, Clickable, Component, ComponentTag, Element, Event, NoArgs, UiComponent, UiError,
};
use serde::{Deserialize, Serialize};

/// Configuration for [`Button`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Merge)]
#[serde(default, rename_all = "camelCase")]
pub struct ButtonConfig {
    #[serde(flatten)]
    pub component: ComponentConfig,
    /// Text of the button label
    pub text: Option<String>,
}

impl ButtonConfig {
    pub fn defaults() -> Self {
        Self {
            component: ComponentConfig {
                css_class: Some("ui-button".to_string()),
                ..Default::default()
            },
            text: None,
        }
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }
}

struct ButtonInner {
    component: Component,
    text: RefCell<String>,
    clickable: Clickable<Button>,
}

/// A button with a text label
///
/// Renders `<button type="button"><span class="label">text</span></button>`
/// and fires `on_click` when the element is clicked.
#[derive(Clone)]
pub struct Button {
    inner: Rc<ButtonInner>,
}

impl Button {
    pub fn new(config: ButtonConfig) -> Result<Self, UiError> {
        let mut config = config;
        config.merge(ButtonConfig::defaults());

        Ok(Self {
            inner: Rc::new(ButtonInner {
                component: Component::new(config.component)?,
                text: RefCell::new(config.text.unwrap_or_default()),
                clickable: Clickable::new(),
            }),
        })
    }

    pub fn text(&self) -> String {
        self.inner.text.borrow().clone()
    }

    pub fn set_text(&self, text: impl Into<String>) {
        let text = text.into();
        if let Some(label) = self
            .inner
            .component
            .element_if_created()
            .and_then(|element| element.find("span").into_iter().next())
        {
            label.set_text(text.clone());
        }
        *self.inner.text.borrow_mut() = text;
    }

    /// Fire `on_click` as if the user clicked the button
    pub fn click(&self) {
        self.inner.clickable.click(self);
    }

    pub fn on_click(&self) -> Event<Button, NoArgs> {
        self.inner.clickable.on_click()
    }

    /// Build the button element without wiring the click handler
    pub(crate) fn render(&self) -> Element {
        let label = Element::new("span")
            .with_class("label")
            .with_text(self.text());
        Element::new("button")
            .with_attr("type", "button")
            .with_child(label)
    }
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("component", &self.inner.component)
            .field("text", &self.inner.text.borrow())
            .finish()
    }
}

impl UiComponent for Button {
    fn component(&self) -> &Component {
        &self.inner.component
    }

    fn tag(&self) -> ComponentTag {
        ComponentTag::Button
    }

    fn to_element(&self) -> Element {
        let element = self.render();
        let weak = Rc::downgrade(&self.inner);
        element.on(
            "click",
            listener(move |_, _| {
                if let Some(inner) = weak.upgrade() {
                    Button { inner }.click();
                }
            }),
        );
        element
    }
}
