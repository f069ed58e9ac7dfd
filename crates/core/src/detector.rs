//! Fixed-pattern gesture detector.
//!
//! Matches a short list of button presses (e.g. `[7, 7, 7]`) where every gap
//! between consecutive presses is at most `max_delay_ms`. A longer gap clears
//! the buffer before the new press is recorded.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct SequenceDetector {
    pattern: Vec<usize>,
    buffer: VecDeque<usize>,
    last_event_ms: Option<u64>,
    max_delay_ms: u64,
}

impl SequenceDetector {
    pub fn new(pattern: Vec<usize>, max_delay_ms: u64) -> Self {
        Self {
            buffer: VecDeque::with_capacity(pattern.len()),
            pattern,
            last_event_ms: None,
            max_delay_ms,
        }
    }

    /// `count` presses of a single button.
    pub fn repeated(button: usize, count: usize, max_delay_ms: u64) -> Self {
        Self::new(vec![button; count], max_delay_ms)
    }

    pub fn pattern(&self) -> &[usize] {
        &self.pattern
    }

    /// Record a press. Returns `true` exactly once per completed pattern.
    pub fn add_event(&mut self, button: usize, now_ms: u64) -> bool {
        if self.pattern.is_empty() {
            return false;
        }
        if let Some(last) = self.last_event_ms {
            if now_ms.saturating_sub(last) > self.max_delay_ms {
                self.buffer.clear();
            }
        }

        self.buffer.push_back(button);
        self.last_event_ms = Some(now_ms);
        while self.buffer.len() > self.pattern.len() {
            self.buffer.pop_front();
        }

        if self.buffer.iter().eq(self.pattern.iter()) {
            self.reset();
            return true;
        }
        false
    }

    /// Record a press of any button: buttons outside the pattern reset it.
    pub fn observe(&mut self, button: usize, now_ms: u64) -> bool {
        if self.pattern.contains(&button) {
            self.add_event(button, now_ms)
        } else {
            self.reset();
            false
        }
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
        self.last_event_ms = None;
    }

    /// Fraction of the pattern matched by the buffer's tail.
    pub fn progress(&self) -> f32 {
        let n = self.pattern.len();
        if n == 0 {
            return 0.0;
        }
        let buf: Vec<usize> = self.buffer.iter().copied().collect();
        let matched = (1..=buf.len().min(n))
            .rev()
            .find(|&k| buf[buf.len() - k..] == self.pattern[..k])
            .unwrap_or(0);
        matched as f32 / n as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triple_press_matches_once_then_resets() {
        let mut det = SequenceDetector::repeated(7, 3, 1500);
        assert!(!det.add_event(7, 0));
        assert!(!det.add_event(7, 400));
        assert!(det.add_event(7, 800));
        assert_eq!(det.progress(), 0.0);
        assert!(!det.add_event(7, 900));
    }

    #[test]
    fn long_gap_clears_buffer() {
        let mut det = SequenceDetector::repeated(7, 3, 1500);
        det.add_event(7, 0);
        det.add_event(7, 1000);
        assert!(!det.add_event(7, 2501));
        assert!(!det.add_event(7, 2600));
        assert!(det.add_event(7, 2700));
    }

    #[test]
    fn gap_exactly_at_limit_is_kept() {
        let mut det = SequenceDetector::repeated(7, 3, 1500);
        det.add_event(7, 0);
        det.add_event(7, 1500);
        assert!(det.add_event(7, 3000));
    }

    #[test]
    fn other_button_resets() {
        let mut det = SequenceDetector::repeated(7, 3, 1500);
        det.observe(7, 0);
        det.observe(7, 100);
        assert!(!det.observe(3, 200));
        assert!(!det.observe(7, 300));
        assert!(!det.observe(7, 400));
        assert!(det.observe(7, 500));
    }

    #[test]
    fn progress_tracks_matching_suffix() {
        let mut det = SequenceDetector::new(vec![1, 2, 3], 1000);
        det.add_event(1, 0);
        assert!((det.progress() - 1.0 / 3.0).abs() < 1e-6);
        det.add_event(2, 10);
        assert!((det.progress() - 2.0 / 3.0).abs() < 1e-6);
        det.add_event(1, 20);
        assert!((det.progress() - 1.0 / 3.0).abs() < 1e-6);
    }
}
