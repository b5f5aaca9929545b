//! Select box listing the audio tracks of the player

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use player_ui_core::config::merged;
use player_ui_core::{
    Component, ComponentConfig, ComponentTag, Element, ItemSelection, ListItem, ListSelectorConfig,
    Listener, Player, PlayerEvent, PlayerEventHandler, PlayerEventType, PlayerHandle, UiComponent,
    UiContext, UiError,
};
use tracing::{debug, warn};

use crate::select_box::SelectBox;

struct Registration {
    player: PlayerHandle,
    handlers: Vec<(PlayerEventType, PlayerEventHandler)>,
    selection: Listener<SelectBox, ItemSelection>,
}

struct AudioInner {
    select_box: SelectBox,
    registration: RefCell<Option<Registration>>,
}

/// Lets the user pick the audio track
///
/// The list mirrors `available_audio` of the player and follows track
/// additions, removals and switches. Only selections made by the user are sent
/// back to the player; selections that mirror a player event are not.
#[derive(Clone)]
pub struct AudioTrackSelectBox {
    inner: Rc<AudioInner>,
}

impl AudioTrackSelectBox {
    pub fn defaults() -> ListSelectorConfig {
        ListSelectorConfig {
            component: ComponentConfig {
                css_classes: vec!["ui-audiotrackselectbox".to_string()],
                aria_label: Some("Audio track".to_string()),
                ..Default::default()
            },
            items: Vec::new(),
        }
    }

    pub fn new(config: ListSelectorConfig) -> Result<Self, UiError> {
        let select_box = SelectBox::new(merged(
            config,
            Self::defaults(),
            SelectBox::defaults(),
        ))?;
        Ok(Self {
            inner: Rc::new(AudioInner {
                select_box,
                registration: RefCell::new(None),
            }),
        })
    }

    pub fn select_box(&self) -> &SelectBox {
        &self.inner.select_box
    }

    /// Detach from the player wired by `configure`
    ///
    /// Player handlers and the selection forwarding are removed, and the box
    /// can be configured again against another player.
    pub fn release(&self) {
        let Some(registration) = self.inner.registration.borrow_mut().take() else {
            return;
        };
        for (event, handler) in &registration.handlers {
            registration.player.remove_event_handler(*event, handler);
        }
        self.inner
            .select_box
            .on_item_selected()
            .unsubscribe(&registration.selection);
        self.component().end_configure();
        debug!(component = %self.component().id(), "Audio track handlers released");
    }

    /// Replace the items with the player's tracks and select the current one
    fn refresh(&self, player: &dyn Player) {
        let items = player
            .available_audio()
            .into_iter()
            .map(|track| ListItem::new(track.id, track.label))
            .collect();
        let current = player.audio();
        if current.is_none() {
            self.inner.select_box.clear_selection();
        }
        self.inner.select_box.set_items(items);

        if let Some(current) = current {
            self.select_from_player(&current.id);
        }
    }

    fn select_from_player(&self, key: &str) {
        if let Err(err) = self.inner.select_box.select_item(key, false) {
            warn!(component = %self.component().id(), %err, "Player selected an unlisted audio track");
        }
    }

    fn handle(&self, player: &dyn Player, event: &PlayerEvent) {
        match event {
            PlayerEvent::Ready | PlayerEvent::SourceUnloaded => self.refresh(player),
            PlayerEvent::AudioAdded { track } => {
                self.inner.select_box.add_item(track.id.clone(), track.label.clone());
            }
            PlayerEvent::AudioRemoved { track } => {
                if let Err(err) = self.inner.select_box.remove_item(&track.id) {
                    warn!(component = %self.component().id(), %err, "Player removed an unlisted audio track");
                }
            }
            PlayerEvent::AudioChanged { track } => self.select_from_player(&track.id),
            PlayerEvent::SourceLoaded => {}
        }
    }

    fn handler(&self, player: &PlayerHandle) -> PlayerEventHandler {
        let weak: Weak<AudioInner> = Rc::downgrade(&self.inner);
        let player: Weak<dyn Player> = Rc::downgrade(player);
        Rc::new(move |event: &PlayerEvent| {
            if let (Some(inner), Some(player)) = (weak.upgrade(), player.upgrade()) {
                AudioTrackSelectBox { inner }.handle(player.as_ref(), event);
            }
        })
    }
}

impl AsRef<SelectBox> for AudioTrackSelectBox {
    fn as_ref(&self) -> &SelectBox {
        &self.inner.select_box
    }
}

impl fmt::Debug for AudioTrackSelectBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioTrackSelectBox")
            .field("select_box", &self.inner.select_box)
            .finish()
    }
}

impl UiComponent for AudioTrackSelectBox {
    fn component(&self) -> &Component {
        self.inner.select_box.component()
    }

    fn tag(&self) -> ComponentTag {
        ComponentTag::Selector
    }

    fn to_element(&self) -> Element {
        self.inner.select_box.to_element()
    }

    fn on_configure(&self, player: &PlayerHandle, _ui: &UiContext) {
        let command_target = Rc::downgrade(player);
        let selection = self
            .inner
            .select_box
            .on_item_selected()
            .subscribe_fn(move |_, selection: &ItemSelection| {
                if !selection.from_user {
                    return;
                }
                if let Some(player) = command_target.upgrade() {
                    player.set_audio(&selection.key);
                }
            });

        let handlers: Vec<(PlayerEventType, PlayerEventHandler)> = [
            PlayerEventType::Ready,
            PlayerEventType::SourceUnloaded,
            PlayerEventType::AudioAdded,
            PlayerEventType::AudioRemoved,
            PlayerEventType::AudioChanged,
        ]
        .into_iter()
        .map(|event| (event, self.handler(player)))
        .collect();
        for (event, handler) in &handlers {
            player.add_event_handler(*event, handler.clone());
        }
        *self.inner.registration.borrow_mut() = Some(Registration {
            player: player.clone(),
            handlers,
            selection,
        });

        // Unready players report no tracks; the list fills on `Ready`
        self.refresh(player.as_ref());
    }
}
