//! Scripted button sampler for tests, benches and headless runs.

use std::sync::{Arc, Mutex};

use crate::core::{ButtonSampler, HardwareError};

/// Shared handle used to drive a [`ScriptedSampler`] from outside the reader.
#[derive(Debug, Clone)]
pub struct ScriptHandle {
    lines: Arc<Mutex<Vec<bool>>>,
}

impl ScriptHandle {
    /// Set one line. Out-of-range pins are ignored.
    pub fn set(&self, pin: usize, high: bool) {
        if let Ok(mut lines) = self.lines.lock() {
            if let Some(line) = lines.get_mut(pin) {
                *line = high;
            }
        }
    }

    /// Hold exactly `pins`; release everything else.
    pub fn hold_only(&self, pins: &[usize]) {
        if let Ok(mut lines) = self.lines.lock() {
            for (i, line) in lines.iter_mut().enumerate() {
                *line = pins.contains(&i);
            }
        }
    }

    pub fn press(&self, pin: usize) {
        self.set(pin, true);
    }

    pub fn release(&self, pin: usize) {
        self.set(pin, false);
    }

    pub fn release_all(&self) {
        self.hold_only(&[]);
    }

    pub fn lines(&self) -> Vec<bool> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

pub struct ScriptedSampler {
    lines: Arc<Mutex<Vec<bool>>>,
    fail_setup: bool,
    torn_down: bool,
}

impl ScriptedSampler {
    pub fn new(buttons: usize) -> (Self, ScriptHandle) {
        let lines = Arc::new(Mutex::new(vec![false; buttons]));
        let handle = ScriptHandle {
            lines: Arc::clone(&lines),
        };
        (
            Self {
                lines,
                fail_setup: false,
                torn_down: false,
            },
            handle,
        )
    }

    /// Make `setup` fail, as missing hardware would.
    pub fn failing(mut self) -> Self {
        self.fail_setup = true;
        self
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

impl ButtonSampler for ScriptedSampler {
    fn setup(&mut self) -> Result<(), HardwareError> {
        if self.fail_setup {
            return Err(HardwareError::Unavailable("scripted failure".into()));
        }
        Ok(())
    }

    fn pin_count(&self) -> usize {
        self.lines.lock().map(|l| l.len()).unwrap_or(0)
    }

    fn read(&mut self, pin: usize) -> bool {
        self.lines
            .lock()
            .map(|l| l.get(pin).copied().unwrap_or(false))
            .unwrap_or(false)
    }

    fn teardown(&mut self) {
        self.torn_down = true;
    }
}
