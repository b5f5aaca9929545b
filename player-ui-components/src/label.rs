//! Text label component

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use player_ui_core::config::{ComponentConfig, Merge};
use player_ui_core::{
    listener, Clickable, Component, ComponentTag, Element, Event, EventDispatcher, NoArgs,
    UiComponent, UiError,
};
use serde::{Deserialize, Serialize};

/// Configuration for [`Label`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Merge)]
#[serde(default, rename_all = "camelCase")]
pub struct LabelConfig {
    #[serde(flatten)]
    pub component: ComponentConfig,
    pub text: Option<String>,
    /// Id of the element this label describes; renders a `<label>` when set
    #[serde(rename = "for")]
    pub for_id: Option<String>,
}

impl LabelConfig {
    pub fn defaults() -> Self {
        Self {
            component: ComponentConfig {
                css_class: Some("ui-label".to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }
}

struct LabelInner {
    component: Component,
    text: RefCell<String>,
    for_id: Option<String>,
    clickable: Clickable<Label>,
    on_text_changed: EventDispatcher<Label, String>,
}

/// A piece of text
#[derive(Clone)]
pub struct Label {
    inner: Rc<LabelInner>,
}

impl Label {
    pub fn new(config: LabelConfig) -> Result<Self, UiError> {
        let mut config = config;
        config.merge(LabelConfig::defaults());

        Ok(Self {
            inner: Rc::new(LabelInner {
                component: Component::new(config.component)?,
                text: RefCell::new(config.text.unwrap_or_default()),
                for_id: config.for_id,
                clickable: Clickable::new(),
                on_text_changed: EventDispatcher::new("on_text_changed"),
            }),
        })
    }

    pub fn text(&self) -> String {
        self.inner.text.borrow().clone()
    }

    /// Replace the text; fires `on_text_changed` if it differs
    pub fn set_text(&self, text: impl Into<String>) {
        let text = text.into();
        if *self.inner.text.borrow() == text {
            return;
        }
        *self.inner.text.borrow_mut() = text.clone();
        if let Some(element) = self.inner.component.element_if_created() {
            element.set_text(text.clone());
        }
        self.inner.on_text_changed.dispatch(self, &text);
    }

    pub fn click(&self) {
        self.inner.clickable.click(self);
    }

    pub fn on_click(&self) -> Event<Label, NoArgs> {
        self.inner.clickable.on_click()
    }

    pub fn on_text_changed(&self) -> Event<Label, String> {
        self.inner.on_text_changed.event()
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Label")
            .field("component", &self.inner.component)
            .field("text", &self.inner.text.borrow())
            .finish()
    }
}

impl UiComponent for Label {
    fn component(&self) -> &Component {
        &self.inner.component
    }

    fn tag(&self) -> ComponentTag {
        ComponentTag::Label
    }

    fn to_element(&self) -> Element {
        let element = match &self.inner.for_id {
            Some(target) => Element::new("label").with_attr("for", target.clone()),
            None => Element::new("span"),
        }
        .with_text(self.text());

        let weak = Rc::downgrade(&self.inner);
        element.on(
            "click",
            listener(move |_, _| {
                if let Some(inner) = weak.upgrade() {
                    Label { inner }.click();
                }
            }),
        );
        element
    }
}
