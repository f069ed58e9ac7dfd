//! Rate limiting for work that should not run every frame.

/// Opens at most once per interval.
///
/// The first call always opens.
///
/// ```
/// use amplifier_engine::IntervalGate;
///
/// let mut gate = IntervalGate::new(60_000);
/// assert!(gate.ready(0));
/// assert!(!gate.ready(59_999));
/// assert!(gate.ready(60_000));
/// ```
#[derive(Debug, Clone)]
pub struct IntervalGate {
    interval_ms: u64,
    last_ms: Option<u64>,
}

impl IntervalGate {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_ms: None,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Whether the gate opens at `now_ms`. Opening restarts the interval.
    pub fn ready(&mut self, now_ms: u64) -> bool {
        let due = self
            .last_ms
            .map_or(true, |last| now_ms.saturating_sub(last) >= self.interval_ms);
        if due {
            self.last_ms = Some(now_ms);
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_interval_opens_every_time() {
        let mut gate = IntervalGate::new(0);
        assert!(gate.ready(5));
        assert!(gate.ready(5));
    }

    #[test]
    fn interval_restarts_from_the_opening_call() {
        let mut gate = IntervalGate::new(100);
        assert!(gate.ready(10));
        assert!(!gate.ready(100));
        assert!(gate.ready(110));
        assert!(!gate.ready(209));
        assert!(gate.ready(250));
    }
}
