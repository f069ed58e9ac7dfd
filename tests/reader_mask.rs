//! The ignore mask hides held buttons across a state change.

use human_amplifier::core::ButtonReader;
use human_amplifier::input::ScriptedSampler;

#[test]
fn masked_button_reads_released_until_physically_released() {
    let (sampler, lines) = ScriptedSampler::new(4);
    let mut reader = ButtonReader::new(sampler).unwrap();

    lines.press(2);
    assert!(reader.read().was_pressed(2));

    reader.ignore_pressed_until_released();
    for _ in 0..5 {
        let snapshot = reader.read();
        assert!(!snapshot.is_pressed(2));
        assert!(!snapshot.was_changed(2));
    }

    // The frame that sees the line low clears the mask without an edge.
    lines.release(2);
    let snapshot = reader.read();
    assert!(!snapshot.is_pressed(2));
    assert!(!snapshot.was_changed(2));
    assert!(!reader.is_ignored(2));

    // From here on the raw state comes through again.
    lines.press(2);
    assert!(reader.read().was_pressed(2));
}

#[test]
fn mask_only_covers_buttons_held_when_it_was_set() {
    let (sampler, lines) = ScriptedSampler::new(3);
    let mut reader = ButtonReader::new(sampler).unwrap();

    lines.press(0);
    reader.read();
    reader.ignore_pressed_until_released();

    lines.press(1);
    let snapshot = reader.read();
    assert!(!snapshot.is_pressed(0));
    assert!(snapshot.was_pressed(1));
    assert_eq!(snapshot.pressed_count(), 1);
}

#[test]
fn failed_setup_is_fatal() {
    let (sampler, _) = ScriptedSampler::new(3);
    assert!(ButtonReader::new(sampler.failing()).is_err());
}
