//! Rolling log of button presses.
//!
//! Every rising edge appends the button's character (see
//! [`button_char`](crate::types::button_char)); the log keeps only the most
//! recent `max_length` characters. Used by idle for the code-mode gesture and
//! by code mode to read the entered digits back.

use crate::snapshot::ButtonSnapshot;
use crate::types::{button_char, SEQUENCE_MAX_LENGTH};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceTracker {
    sequence: String,
    max_length: usize,
    first_char_ms: Option<u64>,
}

impl SequenceTracker {
    pub fn new(max_length: usize) -> Self {
        Self {
            sequence: String::with_capacity(max_length + 1),
            max_length: max_length.max(1),
            first_char_ms: None,
        }
    }

    /// Append every press edge of `snapshot` in index order.
    ///
    /// Returns the number of characters appended.
    pub fn update(&mut self, snapshot: &ButtonSnapshot, now_ms: u64) -> usize {
        let mut appended = 0;
        for button in snapshot.press_edges() {
            if let Some(ch) = button_char(button) {
                self.push(ch, now_ms);
                appended += 1;
            }
        }
        appended
    }

    pub fn push(&mut self, ch: char, now_ms: u64) {
        if self.sequence.is_empty() {
            self.first_char_ms = Some(now_ms);
        }
        self.sequence.push(ch);
        while self.sequence.len() > self.max_length {
            self.sequence.remove(0);
        }
    }

    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// An empty pattern always matches.
    pub fn ends_with(&self, pattern: &str) -> bool {
        self.sequence.ends_with(pattern)
    }

    /// The last `n` characters, or the whole log when shorter.
    pub fn last_n(&self, n: usize) -> &str {
        // All characters are ASCII, so byte offsets are char boundaries.
        let start = self.sequence.len().saturating_sub(n);
        &self.sequence[start..]
    }

    pub fn first_char_ms(&self) -> Option<u64> {
        self.first_char_ms
    }

    pub fn elapsed_since_first(&self, now_ms: u64) -> Option<u64> {
        self.first_char_ms.map(|t| now_ms.saturating_sub(t))
    }

    /// True when the log is older than `timeout_ms` and nothing is held.
    pub fn is_timed_out(&self, now_ms: u64, timeout_ms: u64, pressed_count: usize) -> bool {
        pressed_count == 0
            && self
                .elapsed_since_first(now_ms)
                .is_some_and(|elapsed| elapsed > timeout_ms)
    }

    pub fn reset(&mut self) {
        self.sequence.clear();
        self.first_char_ms = None;
    }
}

impl Default for SequenceTracker {
    fn default() -> Self {
        Self::new(SEQUENCE_MAX_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(n: usize, button: usize) -> ButtonSnapshot {
        let mut current = vec![false; n];
        current[button] = true;
        ButtonSnapshot::new(current, vec![false; n])
    }

    #[test]
    fn records_first_char_time_only_when_empty() {
        let mut tracker = SequenceTracker::new(5);
        assert_eq!(tracker.first_char_ms(), None);
        tracker.update(&press(10, 3), 100);
        tracker.update(&press(10, 1), 250);
        assert_eq!(tracker.sequence(), "31");
        assert_eq!(tracker.first_char_ms(), Some(100));
    }

    #[test]
    fn simultaneous_presses_append_in_index_order() {
        let mut tracker = SequenceTracker::new(5);
        let snap = ButtonSnapshot::new(vec![false, true, false, true], vec![false; 4]);
        assert_eq!(tracker.update(&snap, 0), 2);
        assert_eq!(tracker.sequence(), "13");
    }

    #[test]
    fn trims_from_the_front() {
        let mut tracker = SequenceTracker::new(3);
        for (t, b) in [1, 2, 3, 4].into_iter().enumerate() {
            tracker.update(&press(10, b), t as u64);
        }
        assert_eq!(tracker.sequence(), "234");
        assert_eq!(tracker.len(), 3);
    }

    #[test]
    fn high_buttons_map_to_letters() {
        let mut tracker = SequenceTracker::new(5);
        tracker.update(&press(12, 11), 0);
        assert_eq!(tracker.sequence(), "B");
    }

    #[test]
    fn suffix_queries() {
        let mut tracker = SequenceTracker::new(10);
        for b in [7, 7, 7] {
            tracker.push(char::from(b'0' + b), 0);
        }
        assert!(tracker.ends_with("77"));
        assert!(tracker.ends_with(""));
        assert!(!tracker.ends_with("1777"));
        assert_eq!(tracker.last_n(2), "77");
        assert_eq!(tracker.last_n(9), "777");
    }

    #[test]
    fn times_out_only_while_released() {
        let mut tracker = SequenceTracker::new(5);
        tracker.push('1', 1000);
        assert!(!tracker.is_timed_out(2500, 1500, 0));
        assert!(tracker.is_timed_out(2501, 1500, 0));
        assert!(!tracker.is_timed_out(9000, 1500, 1));

        tracker.reset();
        assert!(tracker.is_empty());
        assert_eq!(tracker.first_char_ms(), None);
        assert!(!tracker.is_timed_out(99_999, 1500, 0));
    }
}
