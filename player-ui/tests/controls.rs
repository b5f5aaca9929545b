//! Tests for the standalone controls wired into a control bar

use std::rc::Rc;

use player_ui::prelude::*;

#[derive(Debug, Clone, PartialEq)]
enum Seen {
    Click,
    Toggle,
    On,
    Off,
}

fn record_toggle(button: &ToggleButton, recorder: &EventRecorder<Seen>) {
    recorder.record_with(&button.on_click(), |_, _| Seen::Click);
    recorder.record_with(&button.on_toggle(), |_, _| Seen::Toggle);
    recorder.record_with(&button.on_toggle_on(), |_, _| Seen::On);
    recorder.record_with(&button.on_toggle_off(), |_, _| Seen::Off);
}

#[test]
fn test_toggle_button_programmatic_transitions() {
    let button = ToggleButton::new(ButtonConfig::with_text("CC")).unwrap();
    let recorder = EventRecorder::new();
    record_toggle(&button, &recorder);

    button.on();
    button.on();
    button.off();
    button.toggle();

    assert!(button.is_on());
    assert_eq!(
        recorder.drain(),
        vec![Seen::Toggle, Seen::On, Seen::Toggle, Seen::Off, Seen::Toggle, Seen::On]
    );
}

#[test]
fn test_toggle_button_user_click_in_control_bar() {
    let button = Rc::new(ToggleButton::new(ButtonConfig::with_text("CC")).unwrap());
    let bar = Container::new(ContainerConfig::with_components(vec![
        button.clone() as ComponentRef,
    ]))
    .unwrap();

    let player: PlayerHandle = Rc::new(MockPlayer::new());
    let root: ComponentRef = Rc::new(bar);
    let element = UiContext::default().attach(&root, &player);

    let recorder = EventRecorder::new();
    record_toggle(&button, &recorder);

    element.children()[0].trigger("click", DomEvent::default());

    assert_eq!(recorder.drain(), vec![Seen::Click, Seen::Toggle]);
    assert!(button.is_off());
}

#[test]
fn test_seek_bar_label_preview() {
    let label = Rc::new(SeekBarLabel::new(SeekBarLabelConfig::default()).unwrap());
    let player: PlayerHandle = Rc::new(MockPlayer::new());
    let root: ComponentRef = label.clone();
    let element = UiContext::default().attach(&root, &player);
    assert!(!element.is_displayed());

    label.component().show();
    label.set_time(59.5);
    label.set_thumbnail(Some(&Thumbnail {
        url: "sprite.jpg".into(),
        x: 0,
        y: -90,
        w: 160,
        h: 90,
    }));

    assert!(element.is_displayed());
    assert_eq!(label.label().text(), "00:00:59");
    let thumbnail = element.children()[0].clone();
    assert_eq!(thumbnail.css("width").as_deref(), Some("160px"));
    assert_eq!(thumbnail.css("background-position").as_deref(), Some("0px -90px"));
}

#[test]
fn test_label_text_change_event() {
    let label = Label::new(LabelConfig::with_text("Quality")).unwrap();
    let recorder = EventRecorder::new();
    recorder.record(&label.on_text_changed());

    label.set_text("Quality");
    label.set_text("Audio");

    assert_eq!(recorder.drain(), vec!["Audio".to_string()]);
    assert_eq!(label.element().text().as_deref(), Some("Audio"));
}
