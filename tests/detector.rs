//! Mode gesture matching.

use human_amplifier::core::SequenceDetector;

fn triple_seven() -> SequenceDetector {
    SequenceDetector::new(vec![7, 7, 7], 1500)
}

#[test]
fn three_presses_within_the_window_match_once() {
    let mut detector = triple_seven();
    assert!(!detector.observe(7, 0));
    assert!(!detector.observe(7, 1400));
    assert!(detector.observe(7, 2900));
    // The buffer was reset by the match.
    assert!(!detector.observe(7, 3000));
    assert!(!detector.observe(7, 3100));
    assert!(detector.observe(7, 3200));
}

#[test]
fn a_slow_gap_starts_over() {
    let mut detector = triple_seven();
    detector.observe(7, 0);
    detector.observe(7, 1000);
    assert!(!detector.observe(7, 2501));
    assert!(!detector.observe(7, 2600));
    assert!(detector.observe(7, 2700));
}

#[test]
fn another_button_in_between_resets() {
    let mut detector = triple_seven();
    detector.observe(7, 0);
    detector.observe(7, 100);
    assert!(!detector.observe(3, 200));
    assert!(!detector.observe(7, 300));
    assert!(!detector.observe(7, 400));
    assert!(detector.observe(7, 500));
}

#[test]
fn interleaved_presses_never_match() {
    let mut detector = triple_seven();
    for (t, button) in [7, 1, 7, 1, 7, 1, 7].into_iter().enumerate() {
        assert!(!detector.observe(button, t as u64 * 100));
    }
}
