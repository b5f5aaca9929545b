//! Button with an on/off state

use std::fmt;
use std::rc::Rc;

use player_ui_core::config::merged;
use player_ui_core::{
    listener, Component, ComponentConfig, ComponentTag, Element, Event, NoArgs, Toggle,
    UiComponent, UiError,
};

use crate::button::{Button, ButtonConfig};

const CLASS_ON: &str = "on";
const CLASS_OFF: &str = "off";

struct ToggleInner {
    button: Button,
    toggle: Toggle<ToggleButton>,
}

/// A button that can be switched between "on" and "off"
///
/// The state starts "off" and only changes through [`on`](ToggleButton::on),
/// [`off`](ToggleButton::off) and [`toggle`](ToggleButton::toggle). A user
/// click does not change the state; it fires `on_click` followed by
/// `on_toggle`, leaving it to the owner to decide what the click means.
#[derive(Clone)]
pub struct ToggleButton {
    inner: Rc<ToggleInner>,
}

impl ToggleButton {
    pub fn defaults() -> ButtonConfig {
        ButtonConfig {
            component: ComponentConfig {
                css_class: Some("ui-togglebutton".to_string()),
                ..Default::default()
            },
            text: None,
        }
    }

    pub fn new(config: ButtonConfig) -> Result<Self, UiError> {
        let button = Button::new(merged(
            config,
            Self::defaults(),
            ButtonConfig::defaults(),
        ))?;
        let component = button.component();
        component.add_class(component.prefix_css(CLASS_OFF));

        Ok(Self {
            inner: Rc::new(ToggleInner {
                button,
                toggle: Toggle::new(),
            }),
        })
    }

    pub fn is_on(&self) -> bool {
        self.inner.toggle.is_on()
    }

    pub fn is_off(&self) -> bool {
        self.inner.toggle.is_off()
    }

    /// Switch to "on"; does nothing if already on
    pub fn on(&self) {
        self.switch(true);
    }

    /// Switch to "off"; does nothing if already off
    pub fn off(&self) {
        self.switch(false);
    }

    pub fn toggle(&self) {
        self.switch(self.is_off());
    }

    /// Handle a user click: `on_click`, then `on_toggle`
    pub fn click(&self) {
        self.inner.button.click();
        self.inner.toggle.notify_toggle(self);
    }

    pub fn button(&self) -> &Button {
        &self.inner.button
    }

    pub fn set_text(&self, text: impl Into<String>) {
        self.inner.button.set_text(text);
    }

    pub fn on_click(&self) -> Event<Button, NoArgs> {
        self.inner.button.on_click()
    }

    /// Fired on every state transition and on user clicks
    pub fn on_toggle(&self) -> Event<ToggleButton, NoArgs> {
        self.inner.toggle.on_toggle()
    }

    pub fn on_toggle_on(&self) -> Event<ToggleButton, NoArgs> {
        self.inner.toggle.on_toggle_on()
    }

    pub fn on_toggle_off(&self) -> Event<ToggleButton, NoArgs> {
        self.inner.toggle.on_toggle_off()
    }

    fn switch(&self, target: bool) {
        if self.is_on() == target {
            return;
        }
        let component = self.inner.button.component();
        let (add, remove) = if target {
            (CLASS_ON, CLASS_OFF)
        } else {
            (CLASS_OFF, CLASS_ON)
        };
        component.remove_class(&component.prefix_css(remove));
        component.add_class(component.prefix_css(add));
        self.inner.toggle.fire(self, target);
    }
}

impl fmt::Debug for ToggleButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToggleButton")
            .field("button", &self.inner.button)
            .field("on", &self.is_on())
            .finish()
    }
}

impl UiComponent for ToggleButton {
    fn component(&self) -> &Component {
        self.inner.button.component()
    }

    fn tag(&self) -> ComponentTag {
        ComponentTag::Button
    }

    fn to_element(&self) -> Element {
        let element = self.inner.button.render();
        let weak = Rc::downgrade(&self.inner);
        element.on(
            "click",
            listener(move |_, _| {
                if let Some(inner) = weak.upgrade() {
                    ToggleButton { inner }.click();
                }
            }),
        );
        element
    }
}
