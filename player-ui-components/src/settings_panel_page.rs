//! Page of settings items

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use player_ui_core::config::merged;
use player_ui_core::{
    ChildState, ChildStateChange, Component, ComponentConfig, ComponentRef, ComponentTag,
    Container, ContainerConfig, Element, Event, EventDispatcher, Merge, NoArgs, PlayerHandle,
    UiComponent, UiContext, UiError, DEFAULT_CSS_PREFIX,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

const CLASS_FOCUS_ON_LABEL: &str = "focus-on-label";

/// What a page focuses when it becomes active
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AutoFocusOn {
    /// The first input of the first active item
    #[default]
    ActiveItems,
    /// The first visible label
    Label,
}

/// Configuration for [`SettingsPanelPage`]
#[derive(Debug, Clone, Default, Serialize, Deserialize, Merge)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsPanelPageConfig {
    #[serde(flatten)]
    pub container: ContainerConfig,
    pub auto_focus_on: Option<AutoFocusOn>,
}

impl SettingsPanelPageConfig {
    pub fn defaults() -> Self {
        Self {
            container: ContainerConfig {
                component: ComponentConfig {
                    css_class: Some("ui-settings-panel-page".to_string()),
                    role: Some("menu".to_string()),
                    ..Default::default()
                },
                ..Default::default()
            },
            auto_focus_on: Some(AutoFocusOn::ActiveItems),
        }
    }

    pub fn with_components(components: Vec<ComponentRef>) -> Self {
        Self {
            container: ContainerConfig::with_components(components),
            ..Default::default()
        }
    }
}

struct PageEvents {
    on_settings_state_changed: EventDispatcher<SettingsPanelPage, NoArgs>,
    on_active: EventDispatcher<SettingsPanelPage, NoArgs>,
    on_inactive: EventDispatcher<SettingsPanelPage, NoArgs>,
}

struct PageInner {
    container: Container,
    auto_focus_on: AutoFocusOn,
    ui: RefCell<UiContext>,
    events: PageEvents,
}

/// A container of [`SettingsPanelItem`](crate::SettingsPanelItem)s
///
/// Keeps the `last` marker on the last shown item and reports whenever an
/// item becomes available or unavailable.
#[derive(Clone)]
pub struct SettingsPanelPage {
    inner: Rc<PageInner>,
}

impl SettingsPanelPage {
    pub fn new(config: SettingsPanelPageConfig) -> Result<Self, UiError> {
        let mut config = merged(
            config,
            SettingsPanelPageConfig::defaults(),
            SettingsPanelPageConfig::default(),
        );
        let auto_focus_on = config.auto_focus_on.unwrap_or_default();
        if auto_focus_on == AutoFocusOn::Label {
            let component = &mut config.container.component;
            let prefix = component.css_prefix.as_deref().unwrap_or(DEFAULT_CSS_PREFIX);
            let class = format!("{prefix}-{CLASS_FOCUS_ON_LABEL}");
            component.css_classes.push(class);
        }

        Ok(Self {
            inner: Rc::new(PageInner {
                container: Container::new(config.container)?,
                auto_focus_on,
                ui: RefCell::new(UiContext::default()),
                events: PageEvents {
                    on_settings_state_changed: EventDispatcher::new("on_settings_state_changed"),
                    on_active: EventDispatcher::new("on_active"),
                    on_inactive: EventDispatcher::new("on_inactive"),
                },
            }),
        })
    }

    pub fn container(&self) -> &Container {
        &self.inner.container
    }

    pub fn auto_focus_on(&self) -> AutoFocusOn {
        self.inner.auto_focus_on
    }

    /// The settings items of this page, in order
    pub fn items(&self) -> Vec<ComponentRef> {
        self.inner
            .container
            .components_with_tag(ComponentTag::SettingsItem)
    }

    /// Whether any item is active
    pub fn has_active_settings(&self) -> bool {
        self.items().iter().any(|item| item.component().is_active())
    }

    /// The page became the visible page: fire `on_active` and move focus
    pub fn on_active_event(&self) {
        self.inner.events.on_active.dispatch(self, &());

        let ui = self.inner.ui.borrow().clone();
        let focused = match self.inner.auto_focus_on {
            AutoFocusOn::Label if !ui.config().disable_auto_focus => self.focus_first_label(),
            // Focusing a select box opens it on some platforms
            AutoFocusOn::ActiveItems if ui.auto_focus_enabled() => self.focus_first_active_item(),
            _ => None,
        };
        if let Some(element) = focused {
            debug!(page = %self.component().id(), focused = ?element.attr("id"), "Moved focus");
        }
    }

    /// The page stopped being the visible page
    pub fn on_inactive_event(&self) {
        self.inner.events.on_inactive.dispatch(self, &());
    }

    /// Fired after an item became active or inactive
    pub fn on_settings_state_changed(&self) -> Event<SettingsPanelPage, NoArgs> {
        self.inner.events.on_settings_state_changed.event()
    }

    pub fn on_active(&self) -> Event<SettingsPanelPage, NoArgs> {
        self.inner.events.on_active.event()
    }

    pub fn on_inactive(&self) -> Event<SettingsPanelPage, NoArgs> {
        self.inner.events.on_inactive.event()
    }

    fn focus_first_label(&self) -> Option<Element> {
        self.items()
            .iter()
            .filter(|item| item.component().is_shown())
            .flat_map(|item| item.element().find("label"))
            .find(Element::is_displayed)
            .inspect(Element::focus)
    }

    fn focus_first_active_item(&self) -> Option<Element> {
        self.items()
            .into_iter()
            .find(|item| item.component().is_active())
            .and_then(|item| item.element().focus_to_first_input())
    }

    fn refresh_last_item(&self) {
        let items = self.items();
        self.inner.container.refresh_last_shown(&items);
    }

    fn settings_state_changed(&self) {
        self.refresh_last_item();
        self.inner
            .events
            .on_settings_state_changed
            .dispatch(self, &());
    }

    fn child_listener(&self) -> impl Fn(&Container, &ChildStateChange) + 'static {
        let weak: Weak<PageInner> = Rc::downgrade(&self.inner);
        move |container, change| {
            let is_item = container
                .component_by_id(&change.child)
                .is_some_and(|child| child.tag() == ComponentTag::SettingsItem);
            let (true, Some(inner)) = (is_item, weak.upgrade()) else {
                return;
            };
            let page = SettingsPanelPage { inner };
            match change.state {
                ChildState::Active => page.settings_state_changed(),
                ChildState::Shown => page.refresh_last_item(),
            }
        }
    }
}

impl fmt::Debug for SettingsPanelPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsPanelPage")
            .field("container", &self.inner.container)
            .field("auto_focus_on", &self.inner.auto_focus_on)
            .finish()
    }
}

impl UiComponent for SettingsPanelPage {
    fn component(&self) -> &Component {
        self.inner.container.component()
    }

    fn tag(&self) -> ComponentTag {
        ComponentTag::Container
    }

    fn to_element(&self) -> Element {
        self.inner.container.to_element()
    }

    fn on_configure(&self, player: &PlayerHandle, ui: &UiContext) {
        *self.inner.ui.borrow_mut() = ui.clone();
        self.inner.container.on_configure(player, ui);
        self.inner
            .container
            .on_child_state_changed()
            .subscribe_fn(self.child_listener());

        self.refresh_last_item();
    }
}
