//! Labelled setting row of a settings panel

use std::fmt;
use std::rc::{Rc, Weak};

use player_ui_core::config::merged;
use player_ui_core::{
    ActivityControl, Component, ComponentConfig, ComponentRef, ComponentTag, Container,
    ContainerConfig, Element, ListItem, Merge, NoArgs, PlayerHandle, UiComponent, UiContext,
    UiError,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::label::{Label, LabelConfig};
use crate::select_box::SelectBox;

/// Configuration for [`SettingsPanelItem`]
#[derive(Debug, Clone, Default, Serialize, Deserialize, Merge)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsPanelItemConfig {
    #[serde(flatten)]
    pub container: ContainerConfig,
    /// Fewest items the setting needs before the row is shown
    pub min_items: Option<usize>,
}

impl SettingsPanelItemConfig {
    pub fn defaults() -> Self {
        Self {
            container: ContainerConfig {
                component: ComponentConfig {
                    css_class: Some("ui-settings-panel-item".to_string()),
                    role: Some("menuitem".to_string()),
                    ..Default::default()
                },
                ..Default::default()
            },
            min_items: Some(2),
        }
    }
}

struct ItemInner {
    container: Container,
    control: ActivityControl,
    label: Label,
    select_box: SelectBox,
    min_items: usize,
}

/// A label plus the select box of one setting
///
/// The row is shown and active only while the setting offers a real choice,
/// i.e. at least `min_items` items (two by default).
#[derive(Clone)]
pub struct SettingsPanelItem {
    inner: Rc<ItemInner>,
}

impl SettingsPanelItem {
    pub fn new<W>(
        label: impl Into<String>,
        setting: Rc<W>,
        config: SettingsPanelItemConfig,
    ) -> Result<Self, UiError>
    where
        W: UiComponent + AsRef<SelectBox> + 'static,
    {
        let select_box = (*setting).as_ref().clone();
        let label = Label::new(LabelConfig {
            text: Some(label.into()),
            for_id: Some(select_box.component().id().to_string()),
            ..Default::default()
        })?;

        let mut defaults = SettingsPanelItemConfig::defaults();
        let setting: ComponentRef = setting;
        defaults.container.components = vec![Rc::new(label.clone()) as ComponentRef, setting];
        let config = merged(config, defaults, SettingsPanelItemConfig::default());

        let (container, control) = Container::with_activity(config.container)?;
        let item = Self {
            inner: Rc::new(ItemInner {
                container,
                control,
                label,
                select_box,
                min_items: config.min_items.unwrap_or(2),
            }),
        };

        let select_box = &item.inner.select_box;
        select_box
            .on_items_changed()
            .subscribe_fn(item.updater::<NoArgs>());
        select_box
            .on_item_added()
            .subscribe_fn(item.updater::<ListItem>());
        select_box
            .on_item_removed()
            .subscribe_fn(item.updater::<ListItem>());
        item.update_state();
        Ok(item)
    }

    pub fn label(&self) -> &Label {
        &self.inner.label
    }

    pub fn select_box(&self) -> &SelectBox {
        &self.inner.select_box
    }

    pub fn container(&self) -> &Container {
        &self.inner.container
    }

    /// Show and activate the row if the setting has enough items
    fn update_state(&self) {
        let available = self.inner.select_box.item_count() >= self.inner.min_items;
        let component = self.inner.container.component();
        if available {
            component.show();
        } else {
            component.hide();
        }
        if self.inner.control.set_active(available) {
            debug!(component = %component.id(), active = available, "Settings item availability changed");
        }
    }

    fn updater<A: 'static>(&self) -> impl Fn(&SelectBox, &A) + 'static {
        let weak: Weak<ItemInner> = Rc::downgrade(&self.inner);
        move |_, _| {
            if let Some(inner) = weak.upgrade() {
                SettingsPanelItem { inner }.update_state();
            }
        }
    }
}

impl fmt::Debug for SettingsPanelItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsPanelItem")
            .field("container", &self.inner.container)
            .field("label", &self.inner.label.text())
            .finish()
    }
}

impl UiComponent for SettingsPanelItem {
    fn component(&self) -> &Component {
        self.inner.container.component()
    }

    fn tag(&self) -> ComponentTag {
        ComponentTag::SettingsItem
    }

    fn to_element(&self) -> Element {
        self.inner.container.to_element()
    }

    fn on_configure(&self, player: &PlayerHandle, ui: &UiContext) {
        self.inner.container.on_configure(player, ui);
    }
}
