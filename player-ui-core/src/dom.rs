//! Retained element tree used as the visual handle of components
//!
//! Components render into [`Element`]s: a tag, an attribute map, a class list,
//! inline styles, text content and children. A host substrate mirrors this
//! tree into whatever it actually draws with, and feeds user interaction back
//! through [`Element::trigger`].

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Write as _};
use std::rc::Rc;

use crate::event::{EventDispatcher, Listener};

/// Tags that can receive input focus
const FOCUSABLE_TAGS: &[&str] = &["input", "select", "button", "textarea"];

/// Class a hidden element carries, optionally behind a prefix (`ui-hidden`)
pub const HIDDEN_CLASS: &str = "hidden";

/// Payload of a user interaction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomEvent {
    /// Value of the element at interaction time (for `change`)
    pub value: Option<String>,
}

impl DomEvent {
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }
}

type DomDispatcher = Rc<EventDispatcher<Element, DomEvent>>;

#[derive(Default)]
struct ElementData {
    tag: String,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    styles: BTreeMap<String, String>,
    text: Option<String>,
    value: Option<String>,
    focused: bool,
    children: Vec<Element>,
    handlers: HashMap<String, DomDispatcher>,
}

/// A node of the rendered tree
///
/// `Element` is a shared handle; clones refer to the same node.
#[derive(Clone)]
pub struct Element {
    data: Rc<RefCell<ElementData>>,
}

impl Element {
    /// Create a detached element
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            data: Rc::new(RefCell::new(ElementData {
                tag: tag.into(),
                ..Default::default()
            })),
        }
    }

    pub fn with_attr(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_class(self, class: impl Into<String>) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_classes<I, S>(self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for class in classes {
            self.add_class(class);
        }
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    pub fn with_child(self, child: Element) -> Self {
        self.append(child);
        self
    }

    pub fn tag(&self) -> String {
        self.data.borrow().tag.clone()
    }

    pub fn attr(&self, name: &str) -> Option<String> {
        self.data.borrow().attributes.get(name).cloned()
    }

    pub fn set_attr(&self, name: impl Into<String>, value: impl Into<String>) {
        self.data
            .borrow_mut()
            .attributes
            .insert(name.into(), value.into());
    }

    pub fn remove_attr(&self, name: &str) -> Option<String> {
        self.data.borrow_mut().attributes.remove(name)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.data.borrow().classes.iter().any(|c| c == class)
    }

    /// Add a class; adding a present class does nothing
    pub fn add_class(&self, class: impl Into<String>) {
        let class = class.into();
        let mut data = self.data.borrow_mut();
        if !data.classes.contains(&class) {
            data.classes.push(class);
        }
    }

    pub fn remove_class(&self, class: &str) {
        self.data.borrow_mut().classes.retain(|c| c != class);
    }

    pub fn classes(&self) -> Vec<String> {
        self.data.borrow().classes.clone()
    }

    pub fn css(&self, property: &str) -> Option<String> {
        self.data.borrow().styles.get(property).cloned()
    }

    /// Set inline style properties
    pub fn set_css<K, V>(&self, properties: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut data = self.data.borrow_mut();
        for (key, value) in properties {
            data.styles.insert(key.into(), value.into());
        }
    }

    /// Replace the content with text, dropping all children
    pub fn set_text(&self, text: impl Into<String>) {
        let mut data = self.data.borrow_mut();
        data.children.clear();
        data.text = Some(text.into());
    }

    pub fn text(&self) -> Option<String> {
        self.data.borrow().text.clone()
    }

    pub fn value(&self) -> Option<String> {
        self.data.borrow().value.clone()
    }

    pub fn set_value(&self, value: impl Into<String>) {
        self.data.borrow_mut().value = Some(value.into());
    }

    pub fn append(&self, child: Element) {
        let mut data = self.data.borrow_mut();
        data.text = None;
        data.children.push(child);
    }

    /// Insert a child at `index`, clamped to the number of children
    pub fn insert_child(&self, index: usize, child: Element) {
        let mut data = self.data.borrow_mut();
        let index = index.min(data.children.len());
        data.text = None;
        data.children.insert(index, child);
    }

    /// Detach `child`; returns `false` if it was not a direct child
    pub fn remove_child(&self, child: &Element) -> bool {
        let mut data = self.data.borrow_mut();
        let before = data.children.len();
        data.children.retain(|c| !c.ptr_eq(child));
        data.children.len() != before
    }

    /// Remove all children and text
    pub fn empty(&self) {
        let mut data = self.data.borrow_mut();
        data.children.clear();
        data.text = None;
    }

    pub fn children(&self) -> Vec<Element> {
        self.data.borrow().children.clone()
    }

    /// All descendants with the given tag, in document order
    pub fn find(&self, tag: &str) -> Vec<Element> {
        let mut found = Vec::new();
        self.collect(&mut |e: &Element| e.data.borrow().tag == tag, &mut found);
        found
    }

    fn collect(&self, predicate: &mut dyn FnMut(&Element) -> bool, out: &mut Vec<Element>) {
        for child in self.children() {
            if predicate(&child) {
                out.push(child.clone());
            }
            child.collect(predicate, out);
        }
    }

    /// Whether the element itself is not marked hidden
    pub fn is_displayed(&self) -> bool {
        let hidden_suffix = format!("-{HIDDEN_CLASS}");
        let hidden = self
            .data
            .borrow()
            .classes
            .iter()
            .any(|c| c == HIDDEN_CLASS || c.ends_with(&hidden_suffix));
        !hidden && self.css("display").as_deref() != Some("none")
    }

    pub fn focus(&self) {
        self.data.borrow_mut().focused = true;
    }

    pub fn blur(&self) {
        self.data.borrow_mut().focused = false;
    }

    pub fn is_focused(&self) -> bool {
        self.data.borrow().focused
    }

    /// Focus the first focusable descendant (or the element itself)
    ///
    /// Returns the focused element.
    pub fn focus_to_first_input(&self) -> Option<Element> {
        let target = if FOCUSABLE_TAGS.contains(&self.tag().as_str()) {
            Some(self.clone())
        } else {
            let mut found = Vec::new();
            self.collect(
                &mut |e: &Element| FOCUSABLE_TAGS.contains(&e.data.borrow().tag.as_str()),
                &mut found,
            );
            found.into_iter().next()
        }?;
        target.focus();
        Some(target)
    }

    /// Register a handler for a user interaction (`click`, `change`, ...)
    pub fn on(&self, event: &str, listener: Listener<Element, DomEvent>) {
        let dispatcher = self
            .data
            .borrow_mut()
            .handlers
            .entry(event.to_string())
            .or_insert_with(|| Rc::new(EventDispatcher::new("dom")))
            .clone();
        dispatcher.subscribe(listener);
    }

    pub fn off(&self, event: &str, listener: &Listener<Element, DomEvent>) -> bool {
        let dispatcher = self.data.borrow().handlers.get(event).cloned();
        dispatcher.is_some_and(|d| d.unsubscribe(listener))
    }

    /// Deliver a user interaction to the registered handlers
    ///
    /// A `change` carrying a value updates the element value first.
    pub fn trigger(&self, event: &str, args: DomEvent) {
        if let Some(value) = &args.value {
            self.set_value(value.clone());
        }
        let dispatcher = self.data.borrow().handlers.get(event).cloned();
        if let Some(dispatcher) = dispatcher {
            dispatcher.dispatch(self, &args);
        }
    }

    pub fn ptr_eq(&self, other: &Element) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    /// Serialize the tree as HTML
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let data = self.data.borrow();
        let _ = write!(out, "<{}", data.tag);
        for (name, value) in &data.attributes {
            let _ = write!(out, " {}=\"{}\"", name, escape(value));
        }
        if !data.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape(&data.classes.join(" ")));
        }
        if !data.styles.is_empty() {
            let style: Vec<String> = data
                .styles
                .iter()
                .map(|(k, v)| format!("{k}: {v}"))
                .collect();
            let _ = write!(out, " style=\"{}\"", escape(&style.join("; ")));
        }
        out.push('>');
        if let Some(text) = &data.text {
            out.push_str(&escape(text));
        }
        for child in &data.children {
            child.write_html(out);
        }
        let _ = write!(out, "</{}>", data.tag);
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.data.borrow();
        f.debug_struct("Element")
            .field("tag", &data.tag)
            .field("attributes", &data.attributes)
            .field("classes", &data.classes)
            .field("children", &data.children.len())
            .finish()
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
