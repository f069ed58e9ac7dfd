//! Invariants of the input and volume building blocks.

use proptest::prelude::*;

use human_amplifier::core::{amplify_volume, ButtonSnapshot, SequenceTracker};
use human_amplifier::types::button_char;

fn line_pair() -> impl Strategy<Value = (Vec<bool>, Vec<bool>)> {
    (1usize..=36).prop_flat_map(|n| {
        (
            proptest::collection::vec(any::<bool>(), n),
            proptest::collection::vec(any::<bool>(), n),
        )
    })
}

proptest! {
    #[test]
    fn snapshot_derives_changes_and_count((current, previous) in line_pair()) {
        let snapshot = ButtonSnapshot::new(current.clone(), previous.clone());
        for i in 0..current.len() {
            prop_assert_eq!(snapshot.changed()[i], current[i] != previous[i]);
            prop_assert_eq!(snapshot.was_pressed(i), current[i] && !previous[i]);
            prop_assert_eq!(snapshot.was_released(i), !current[i] && previous[i]);
        }
        prop_assert_eq!(snapshot.pressed_count(), current.iter().filter(|&&c| c).count());
    }

    #[test]
    fn tracker_keeps_the_most_recent_presses(
        max_length in 1usize..12,
        presses in proptest::collection::vec(0usize..10, 0..40),
    ) {
        let mut tracker = SequenceTracker::new(max_length);
        let mut expected = String::new();
        for (t, &button) in presses.iter().enumerate() {
            let mut current = vec![false; 10];
            current[button] = true;
            tracker.update(&ButtonSnapshot::new(current, vec![false; 10]), t as u64);
            expected.push(button_char(button).unwrap());
            prop_assert!(tracker.len() <= max_length);
        }
        let keep = expected.len().saturating_sub(max_length);
        prop_assert_eq!(tracker.sequence(), &expected[keep..]);
    }

    #[test]
    fn amplify_volume_rises_with_every_press(total in 1usize..40) {
        let mut last = 0.0f32;
        for pressed in 0..=total {
            let volume = amplify_volume(pressed, total);
            prop_assert!(volume > last);
            if pressed > 0 && pressed < total {
                prop_assert!(volume > 0.0 && volume < 1.0);
            }
            last = volume;
        }
        prop_assert!((amplify_volume(total, total) - 1.0).abs() < 1e-6);
    }
}

#[test]
fn tracker_overflow_by_one_drops_the_oldest_press() {
    let mut tracker = SequenceTracker::new(3);
    for (t, ch) in "1234".chars().enumerate() {
        tracker.push(ch, t as u64);
    }
    assert_eq!(tracker.sequence(), "234");
}

#[test]
fn amplify_volume_reference_points() {
    assert!((amplify_volume(0, 10) - (2.0f32 / 12.0).powi(2)).abs() < 1e-6);
    assert!((amplify_volume(0, 10) - 0.0278).abs() < 1e-4);
    assert_eq!(amplify_volume(10, 10), 1.0);
}
