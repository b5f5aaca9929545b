//! End-to-end tests: audio track selection inside a settings panel

use std::rc::Rc;

use player_ui::prelude::*;
use player_ui::{assert_emitted, assert_not_emitted, count_emitted, PlayerCommand};

struct Fixture {
    player: Rc<MockPlayer>,
    audio: Rc<AudioTrackSelectBox>,
    item: Rc<SettingsPanelItem>,
    page: SettingsPanelPage,
}

fn languages() -> Vec<AudioTrack> {
    vec![
        AudioTrack::new("en", "English"),
        AudioTrack::new("de", "German"),
        AudioTrack::new("fr", "French"),
    ]
}

fn fixture() -> Fixture {
    let player = Rc::new(MockPlayer::new());
    let audio = Rc::new(AudioTrackSelectBox::new(ListSelectorConfig::default()).unwrap());
    let item = Rc::new(
        SettingsPanelItem::new("Audio", audio.clone(), SettingsPanelItemConfig::default()).unwrap(),
    );
    let page = SettingsPanelPage::new(SettingsPanelPageConfig::with_components(vec![
        item.clone() as ComponentRef,
    ]))
    .unwrap();

    let handle: PlayerHandle = player.clone();
    let root: ComponentRef = Rc::new(page.clone());
    UiContext::default().attach(&root, &handle);

    Fixture {
        player,
        audio,
        item,
        page,
    }
}

#[test]
fn test_item_appears_once_tracks_load() {
    let f = fixture();
    assert!(f.item.component().is_hidden());
    assert!(!f.page.has_active_settings());

    let recorder = EventRecorder::new();
    recorder.record(&f.page.on_settings_state_changed());

    f.player.load_source(languages(), Some("en"));

    assert!(f.item.component().is_shown());
    assert!(f.page.has_active_settings());
    assert!(f.item.component().has_class("ui-last"));
    assert_eq!(recorder.drain().len(), 1);
}

#[test]
fn test_user_choice_reaches_player_exactly_once() {
    let f = fixture();
    f.player.load_source(languages(), Some("en"));

    let recorder = EventRecorder::new();
    recorder.record(&f.audio.select_box().on_item_selected());

    f.audio
        .element()
        .trigger("change", DomEvent::with_value("de"));

    // The engine echoes AudioChanged; the echo must not produce a second command
    let commands = f.player.drain_commands();
    assert_eq!(count_emitted!(commands, PlayerCommand::SetAudio(_)), 1);
    assert_eq!(f.player.audio().map(|t| t.id).as_deref(), Some("de"));

    let selections = recorder.drain();
    assert_eq!(
        selections,
        vec![ItemSelection {
            key: "de".into(),
            from_user: true
        }]
    );
}

#[test]
fn test_engine_switch_updates_selection_silently() {
    let f = fixture();
    f.player.load_source(languages(), Some("en"));

    let recorder = EventRecorder::new();
    recorder.record(&f.audio.select_box().on_item_selected());

    f.player.switch_audio("fr");

    let selections = recorder.drain();
    assert_emitted!(selections, ItemSelection { key, from_user: false } if key == "fr");

    let commands = f.player.drain_commands();
    assert_not_emitted!(commands, PlayerCommand::SetAudio(_));

    let selected: Vec<_> = f
        .audio
        .element()
        .find("option")
        .into_iter()
        .filter(|o| o.attr("selected").is_some())
        .filter_map(|o| o.attr("value"))
        .collect();
    assert_eq!(selected, vec!["fr"]);
}

#[test]
fn test_item_hides_when_choice_disappears() {
    let f = fixture();
    f.player.load_source(languages(), Some("en"));

    f.player.remove_audio("de");
    assert!(f.item.component().is_shown());

    f.player.remove_audio("fr");
    assert!(f.item.component().is_hidden());
    assert!(!f.item.component().has_class("ui-last"));
    assert!(!f.page.has_active_settings());

    f.player.unload();
    assert_eq!(f.audio.select_box().item_count(), 0);
}

#[test]
fn test_release_stops_mirroring() {
    let f = fixture();
    f.audio.release();

    f.player.load_source(languages(), Some("en"));
    assert_eq!(f.audio.select_box().item_count(), 0);
    assert!(f.item.component().is_hidden());
}
