//! Time and thumbnail preview shown above the seek bar

use std::fmt;
use std::rc::Rc;

use player_ui_core::config::merged;
use player_ui_core::{
    Component, ComponentConfig, ComponentRef, ComponentTag, Container, ContainerConfig, Element,
    Merge, PlayerHandle, UiComponent, UiContext, UiError,
};
use serde::{Deserialize, Serialize};

use crate::label::{Label, LabelConfig};

/// Configuration for [`SeekBarLabel`]
#[derive(Debug, Clone, Default, Serialize, Deserialize, Merge)]
#[serde(default, rename_all = "camelCase")]
pub struct SeekBarLabelConfig {
    #[serde(flatten)]
    pub container: ContainerConfig,
}

/// A region of a sprite sheet to preview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

struct SeekBarLabelInner {
    container: Container,
    label: Label,
    thumbnail: Rc<Component>,
}

/// Thumbnail plus time label; hidden until the seek bar shows it
#[derive(Clone)]
pub struct SeekBarLabel {
    inner: Rc<SeekBarLabelInner>,
}

impl SeekBarLabel {
    pub fn new(config: SeekBarLabelConfig) -> Result<Self, UiError> {
        let label = Label::new(LabelConfig {
            component: ComponentConfig::with_classes(["label"]),
            ..Default::default()
        })?;
        let thumbnail = Rc::new(Component::new(ComponentConfig::with_classes(["thumbnail"]))?);

        let defaults = SeekBarLabelConfig {
            container: ContainerConfig {
                component: ComponentConfig {
                    css_class: Some("ui-seekbar-label".to_string()),
                    hidden: Some(true),
                    ..Default::default()
                },
                components: vec![thumbnail.clone() as ComponentRef, Rc::new(label.clone())],
                ..Default::default()
            },
        };
        let config = merged(config, defaults, SeekBarLabelConfig::default());

        Ok(Self {
            inner: Rc::new(SeekBarLabelInner {
                container: Container::new(config.container)?,
                label,
                thumbnail,
            }),
        })
    }

    pub fn label(&self) -> &Label {
        &self.inner.label
    }

    pub fn set_text(&self, text: impl Into<String>) {
        self.inner.label.set_text(text);
    }

    /// Show a playback position as `HH:MM:SS`
    pub fn set_time(&self, seconds: f64) {
        self.set_text(format_time(seconds));
    }

    /// Show a thumbnail, or hide the thumbnail area with `None`
    pub fn set_thumbnail(&self, thumbnail: Option<&Thumbnail>) {
        let element = self.inner.thumbnail.element();
        match thumbnail {
            None => element.set_css([("background-image", "none"), ("display", "none")]),
            Some(thumbnail) => element.set_css([
                ("display", "inherit".to_string()),
                ("background-image", format!("url({})", thumbnail.url)),
                ("width", format!("{}px", thumbnail.w)),
                ("height", format!("{}px", thumbnail.h)),
                (
                    "background-position",
                    format!("{}px {}px", thumbnail.x, thumbnail.y),
                ),
            ]),
        }
    }
}

fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total / 60) % 60,
        total % 60
    )
}

impl fmt::Debug for SeekBarLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeekBarLabel")
            .field("container", &self.inner.container)
            .field("text", &self.inner.label.text())
            .finish()
    }
}

impl UiComponent for SeekBarLabel {
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
        self.inner.container.on_configure(player, ui);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_by_default() {
        let label = SeekBarLabel::new(SeekBarLabelConfig::default()).unwrap();
        assert!(label.component().is_hidden());

        let element = label.element();
        assert!(element.has_class("ui-seekbar-label"));
        assert!(element.has_class("ui-hidden"));
        assert!(!element.is_displayed());

        label.component().show();
        assert!(element.is_displayed());
    }

    #[test]
    fn test_renders_thumbnail_then_label() {
        let label = SeekBarLabel::new(SeekBarLabelConfig::default()).unwrap();
        let children = label.element().children();
        assert_eq!(children.len(), 2);
        assert!(children[0].has_class("thumbnail"));
        assert!(children[1].has_class("label"));
    }

    #[test]
    fn test_clones_share_state() {
        let label = SeekBarLabel::new(SeekBarLabelConfig::default()).unwrap();
        let handle = label.clone();
        handle.set_time(90.0);
        assert_eq!(label.label().text(), "00:01:30");
        assert!(handle.component().ptr_eq(label.component()));
    }

    #[test]
    fn test_set_time() {
        let label = SeekBarLabel::new(SeekBarLabelConfig::default()).unwrap();
        label.set_time(3725.9);
        assert_eq!(label.label().text(), "01:02:05");

        label.set_time(-4.0);
        assert_eq!(label.label().text(), "00:00:00");
    }

    #[test]
    fn test_set_thumbnail() {
        let label = SeekBarLabel::new(SeekBarLabelConfig::default()).unwrap();
        let thumbnail_element = label.element().children()[0].clone();

        label.set_thumbnail(Some(&Thumbnail {
            url: "sprite.jpg".into(),
            x: -160,
            y: 0,
            w: 160,
            h: 90,
        }));
        assert_eq!(thumbnail_element.css("display").as_deref(), Some("inherit"));
        assert_eq!(
            thumbnail_element.css("background-image").as_deref(),
            Some("url(sprite.jpg)")
        );
        assert_eq!(
            thumbnail_element.css("background-position").as_deref(),
            Some("-160px 0px")
        );

        label.set_thumbnail(None);
        assert_eq!(thumbnail_element.css("display").as_deref(), Some("none"));
    }

    #[test]
    fn test_caller_classes_come_first() {
        let label = SeekBarLabel::new(SeekBarLabelConfig {
            container: ContainerConfig {
                component: ComponentConfig::with_classes(["compact"]),
                ..Default::default()
            },
        })
        .unwrap();
        assert_eq!(
            label.component().css_classes(),
            vec!["ui-seekbar-label", "compact"]
        );
    }
}
