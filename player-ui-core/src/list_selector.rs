//! Single selection over an ordered list of items
//!
//! [`ListSelector`] is the state machine behind every "pick one of N" widget.
//! It keeps an insertion ordered key/label list and at most one selected key,
//! which always refers to an existing item.
//!
//! The `from_user` flag of [`ItemSelection`] tells listeners whether the
//! selection came from user interaction or from a programmatic update. Widgets
//! that forward selections to the player only do so for user selections, so a
//! selection made in reaction to a player event never loops back.

use std::cell::RefCell;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ComponentConfig, Merge};
use crate::error::{NotFoundError, UiError};
use crate::event::{Event, EventDispatcher, NoArgs};

/// A selectable entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    pub key: String,
    pub label: String,
}

impl ListItem {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// Payload of [`ListSelector::on_item_selected`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSelection {
    pub key: String,
    /// The selection came from user interaction
    pub from_user: bool,
}

/// Configuration of list selecting widgets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Merge)]
#[serde(default, rename_all = "camelCase")]
pub struct ListSelectorConfig {
    #[serde(flatten)]
    pub component: ComponentConfig,
    /// Initial items
    pub items: Vec<ListItem>,
}

struct SelectorEvents<S: ?Sized> {
    on_items_changed: EventDispatcher<S, NoArgs>,
    on_item_added: EventDispatcher<S, ListItem>,
    on_item_removed: EventDispatcher<S, ListItem>,
    on_item_selected: EventDispatcher<S, ItemSelection>,
}

/// Selection facet; `S` is the widget passed as event sender
pub struct ListSelector<S: ?Sized> {
    items: RefCell<Vec<ListItem>>,
    selected: RefCell<Option<String>>,
    events: SelectorEvents<S>,
}

impl<S: ?Sized> ListSelector<S> {
    pub fn new(items: Vec<ListItem>) -> Self {
        Self {
            items: RefCell::new(dedup(items)),
            selected: RefCell::new(None),
            events: SelectorEvents {
                on_items_changed: EventDispatcher::new("on_items_changed"),
                on_item_added: EventDispatcher::new("on_item_added"),
                on_item_removed: EventDispatcher::new("on_item_removed"),
                on_item_selected: EventDispatcher::new("on_item_selected"),
            },
        }
    }

    /// Replace all items
    ///
    /// The selection survives only if its key is still present. Duplicate
    /// keys keep the first position and the last label.
    pub fn set_items(&self, sender: &S, items: Vec<ListItem>) {
        let items = dedup(items);
        {
            let mut selected = self.selected.borrow_mut();
            let keep = selected
                .as_ref()
                .is_some_and(|key| items.iter().any(|i| &i.key == key));
            if !keep {
                selected.take();
            }
        }
        debug!(count = items.len(), "Items replaced");
        *self.items.borrow_mut() = items;
        self.events.on_items_changed.dispatch(sender, &());
    }

    /// Insert an item, or relabel it if the key exists
    pub fn add_item(&self, sender: &S, key: impl Into<String>, label: impl Into<String>) {
        let item = ListItem::new(key, label);
        {
            let mut items = self.items.borrow_mut();
            match items.iter_mut().find(|i| i.key == item.key) {
                Some(existing) => existing.label = item.label.clone(),
                None => items.push(item.clone()),
            }
        }
        debug!(key = %item.key, "Item added");
        self.events.on_item_added.dispatch(sender, &item);
    }

    /// Remove an item; removing the selected item clears the selection
    pub fn remove_item(&self, sender: &S, key: &str) -> Result<(), UiError> {
        let item = {
            let mut items = self.items.borrow_mut();
            let index = items
                .iter()
                .position(|i| i.key == key)
                .ok_or_else(|| NotFoundError::item(key))?;
            items.remove(index)
        };
        {
            let mut selected = self.selected.borrow_mut();
            if selected.as_deref() == Some(key) {
                selected.take();
            }
        }
        debug!(key, "Item removed");
        self.events.on_item_removed.dispatch(sender, &item);
        Ok(())
    }

    /// Remove every item, firing `on_item_removed` for each
    pub fn clear_items(&self, sender: &S) {
        let removed = std::mem::take(&mut *self.items.borrow_mut());
        self.selected.borrow_mut().take();
        for item in &removed {
            self.events.on_item_removed.dispatch(sender, item);
        }
    }

    /// Select an existing item
    ///
    /// Selecting the already selected key does nothing and fires nothing.
    pub fn select_item(&self, sender: &S, key: &str, from_user: bool) -> Result<(), UiError> {
        if !self.has_item(key) {
            return Err(NotFoundError::item(key).into());
        }
        if self.selected.borrow().as_deref() == Some(key) {
            return Ok(());
        }
        *self.selected.borrow_mut() = Some(key.to_string());
        debug!(key, from_user, "Item selected");
        self.events.on_item_selected.dispatch(
            sender,
            &ItemSelection {
                key: key.to_string(),
                from_user,
            },
        );
        Ok(())
    }

    /// Drop the selection without firing; returns whether there was one
    pub fn clear_selection(&self) -> bool {
        let cleared = self.selected.borrow_mut().take();
        if let Some(key) = &cleared {
            debug!(key = %key, "Selection cleared");
        }
        cleared.is_some()
    }

    /// The selected key
    pub fn selected(&self) -> Option<String> {
        self.selected.borrow().clone()
    }

    /// Items in insertion order
    pub fn items(&self) -> Vec<ListItem> {
        self.items.borrow().clone()
    }

    pub fn item_count(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn has_item(&self, key: &str) -> bool {
        self.items.borrow().iter().any(|i| i.key == key)
    }

    /// Label of an item
    pub fn label(&self, key: &str) -> Option<String> {
        self.items
            .borrow()
            .iter()
            .find(|i| i.key == key)
            .map(|i| i.label.clone())
    }

    /// Fired after `set_items`
    pub fn on_items_changed(&self) -> Event<S, NoArgs> {
        self.events.on_items_changed.event()
    }

    pub fn on_item_added(&self) -> Event<S, ListItem> {
        self.events.on_item_added.event()
    }

    pub fn on_item_removed(&self) -> Event<S, ListItem> {
        self.events.on_item_removed.event()
    }

    /// Fired when the selected key changes
    pub fn on_item_selected(&self) -> Event<S, ItemSelection> {
        self.events.on_item_selected.event()
    }
}

impl<S: ?Sized> fmt::Debug for ListSelector<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListSelector")
            .field("items", &self.items.borrow())
            .field("selected", &self.selected.borrow())
            .finish()
    }
}

fn dedup(items: Vec<ListItem>) -> Vec<ListItem> {
    let mut unique: Vec<ListItem> = Vec::with_capacity(items.len());
    for item in items {
        match unique.iter_mut().find(|i| i.key == item.key) {
            Some(existing) => existing.label = item.label,
            None => unique.push(item),
        }
    }
    unique
}
