//! Cooperative stop request shared between the frame loop and whoever
//! wants it to end (Ctrl-C handler, keyboard quit key, tests).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    flag: Arc<AtomicBool>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing flag, e.g. the one a keyboard sampler sets on `q`.
    pub fn from_flag(flag: Arc<AtomicBool>) -> Self {
        Self { flag }
    }

    pub fn request(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// The flag the frame loop polls.
    pub fn flag(&self) -> &AtomicBool {
        &self.flag
    }

    pub fn shared_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_request() {
        let signal = ShutdownSignal::new();
        let other = signal.clone();
        assert!(!other.is_requested());
        signal.request();
        assert!(other.is_requested());
        assert!(other.flag().load(Ordering::SeqCst));
    }

    #[test]
    fn wraps_an_external_flag() {
        let flag = Arc::new(AtomicBool::new(false));
        let signal = ShutdownSignal::from_flag(Arc::clone(&flag));
        flag.store(true, Ordering::SeqCst);
        assert!(signal.is_requested());
    }
}
