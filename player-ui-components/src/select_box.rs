//! Drop-down selection component

use std::fmt;
use std::rc::{Rc, Weak};

use player_ui_core::config::merged;
use player_ui_core::{
    listener, Component, ComponentConfig, ComponentTag, DomEvent, Element, Event, ItemSelection,
    ListItem, ListSelector, ListSelectorConfig, NoArgs, UiComponent, UiError,
};
use tracing::warn;

struct SelectBoxInner {
    component: Component,
    selector: ListSelector<SelectBox>,
}

/// A `<select>` element with one `<option>` per item
///
/// Options are re-rendered whenever the items or the selection change. A user
/// `change` on the element selects the chosen value with `from_user = true`.
#[derive(Clone)]
pub struct SelectBox {
    inner: Rc<SelectBoxInner>,
}

impl SelectBox {
    pub fn defaults() -> ListSelectorConfig {
        ListSelectorConfig {
            component: ComponentConfig {
                css_class: Some("ui-selectbox".to_string()),
                ..Default::default()
            },
            items: Vec::new(),
        }
    }

    pub fn new(config: ListSelectorConfig) -> Result<Self, UiError> {
        let config = merged(config, Self::defaults(), ListSelectorConfig::default());
        let select_box = Self {
            inner: Rc::new(SelectBoxInner {
                component: Component::new(config.component)?,
                selector: ListSelector::new(config.items),
            }),
        };

        let selector = &select_box.inner.selector;
        selector
            .on_items_changed()
            .subscribe_fn(select_box.refresher::<NoArgs>());
        selector
            .on_item_added()
            .subscribe_fn(select_box.refresher::<ListItem>());
        selector
            .on_item_removed()
            .subscribe_fn(select_box.refresher::<ListItem>());
        selector
            .on_item_selected()
            .subscribe_fn(select_box.refresher::<ItemSelection>());
        Ok(select_box)
    }

    pub fn set_items(&self, items: Vec<ListItem>) {
        self.inner.selector.set_items(self, items);
    }

    pub fn add_item(&self, key: impl Into<String>, label: impl Into<String>) {
        self.inner.selector.add_item(self, key, label);
    }

    pub fn remove_item(&self, key: &str) -> Result<(), UiError> {
        self.inner.selector.remove_item(self, key)
    }

    pub fn clear_items(&self) {
        self.inner.selector.clear_items(self);
    }

    /// Select an existing item; unknown keys return `NotFound`
    pub fn select_item(&self, key: &str, from_user: bool) -> Result<(), UiError> {
        self.inner.selector.select_item(self, key, from_user)
    }

    /// Drop the selection without firing `on_item_selected`
    pub fn clear_selection(&self) {
        if self.inner.selector.clear_selection() {
            if let Some(element) = self.inner.component.element_if_created() {
                self.render_options(&element);
            }
        }
    }

    pub fn selected(&self) -> Option<String> {
        self.inner.selector.selected()
    }

    pub fn items(&self) -> Vec<ListItem> {
        self.inner.selector.items()
    }

    pub fn item_count(&self) -> usize {
        self.inner.selector.item_count()
    }

    pub fn has_item(&self, key: &str) -> bool {
        self.inner.selector.has_item(key)
    }

    pub fn label(&self, key: &str) -> Option<String> {
        self.inner.selector.label(key)
    }

    pub fn on_items_changed(&self) -> Event<SelectBox, NoArgs> {
        self.inner.selector.on_items_changed()
    }

    pub fn on_item_added(&self) -> Event<SelectBox, ListItem> {
        self.inner.selector.on_item_added()
    }

    pub fn on_item_removed(&self) -> Event<SelectBox, ListItem> {
        self.inner.selector.on_item_removed()
    }

    pub fn on_item_selected(&self) -> Event<SelectBox, ItemSelection> {
        self.inner.selector.on_item_selected()
    }

    fn refresher<A: 'static>(&self) -> impl Fn(&SelectBox, &A) + 'static {
        let weak: Weak<SelectBoxInner> = Rc::downgrade(&self.inner);
        move |_, _| {
            if let Some(inner) = weak.upgrade() {
                let select_box = SelectBox { inner };
                if let Some(element) = select_box.inner.component.element_if_created() {
                    select_box.render_options(&element);
                }
            }
        }
    }

    fn render_options(&self, element: &Element) {
        let selected = self.selected();
        element.empty();
        for item in self.items() {
            let option = Element::new("option")
                .with_attr("value", item.key.clone())
                .with_text(item.label);
            if selected.as_deref() == Some(item.key.as_str()) {
                option.set_attr("selected", "selected");
            }
            element.append(option);
        }
        element.set_value(selected.unwrap_or_default());
    }

    fn user_changed(&self, args: &DomEvent) {
        let Some(value) = args.value.clone() else {
            return;
        };
        if let Err(err) = self.select_item(&value, true) {
            warn!(component = %self.inner.component.id(), %err, "Ignoring change to unknown option");
        }
    }
}

impl AsRef<SelectBox> for SelectBox {
    fn as_ref(&self) -> &SelectBox {
        self
    }
}

impl fmt::Debug for SelectBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectBox")
            .field("component", &self.inner.component)
            .field("selector", &self.inner.selector)
            .finish()
    }
}

impl UiComponent for SelectBox {
    fn component(&self) -> &Component {
        &self.inner.component
    }

    fn tag(&self) -> ComponentTag {
        ComponentTag::Selector
    }

    fn to_element(&self) -> Element {
        let element = Element::new("select");
        self.render_options(&element);

        let weak = Rc::downgrade(&self.inner);
        element.on(
            "change",
            listener(move |_, args: &DomEvent| {
                if let Some(inner) = weak.upgrade() {
                    SelectBox { inner }.user_changed(args);
                }
            }),
        );
        element
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use player_ui_core::EventRecorder;

    fn languages() -> Vec<ListItem> {
        vec![
            ListItem::new("en", "English"),
            ListItem::new("de", "German"),
            ListItem::new("fr", "French"),
        ]
    }

    fn option_values(element: &Element) -> Vec<String> {
        element
            .find("option")
            .iter()
            .filter_map(|o| o.attr("value"))
            .collect()
    }

    fn selected_option(element: &Element) -> Option<String> {
        element
            .find("option")
            .iter()
            .find(|o| o.attr("selected").is_some())
            .and_then(|o| o.attr("value"))
    }

    #[test]
    fn test_renders_options() {
        let select_box = SelectBox::new(ListSelectorConfig {
            items: languages(),
            ..Default::default()
        })
        .unwrap();
        let element = select_box.element();

        assert_eq!(element.tag(), "select");
        assert!(element.has_class("ui-selectbox"));
        assert_eq!(option_values(&element), vec!["en", "de", "fr"]);
        assert_eq!(element.find("option")[1].text().as_deref(), Some("German"));
    }

    #[test]
    fn test_options_follow_item_changes() {
        let select_box = SelectBox::new(ListSelectorConfig::default()).unwrap();
        let element = select_box.element();

        select_box.set_items(languages());
        select_box.add_item("it", "Italian");
        select_box.remove_item("de").unwrap();
        assert_eq!(option_values(&element), vec!["en", "fr", "it"]);

        select_box.clear_items();
        assert!(option_values(&element).is_empty());
    }

    #[test]
    fn test_programmatic_selection_marks_option() {
        let select_box = SelectBox::new(ListSelectorConfig {
            items: languages(),
            ..Default::default()
        })
        .unwrap();
        let element = select_box.element();

        select_box.select_item("fr", false).unwrap();
        assert_eq!(selected_option(&element).as_deref(), Some("fr"));
        assert_eq!(element.value().as_deref(), Some("fr"));
    }

    #[test]
    fn test_user_change_selects_from_user() {
        let select_box = SelectBox::new(ListSelectorConfig {
            items: languages(),
            ..Default::default()
        })
        .unwrap();
        let recorder = EventRecorder::new();
        recorder.record(&select_box.on_item_selected());

        select_box
            .element()
            .trigger("change", DomEvent::with_value("de"));

        assert_eq!(
            recorder.drain(),
            vec![ItemSelection {
                key: "de".into(),
                from_user: true
            }]
        );
        assert_eq!(select_box.selected().as_deref(), Some("de"));
    }

    #[test]
    fn test_unknown_user_value_is_ignored() {
        let select_box = SelectBox::new(ListSelectorConfig {
            items: languages(),
            ..Default::default()
        })
        .unwrap();
        select_box.select_item("en", false).unwrap();

        select_box
            .element()
            .trigger("change", DomEvent::with_value("xx"));

        assert_eq!(select_box.selected().as_deref(), Some("en"));
        assert!(select_box.select_item("xx", true).unwrap_err().is_not_found());
    }
}
