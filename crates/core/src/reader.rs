//! Button edge reader with an "ignore until released" mask.
//!
//! The reader samples every line once per frame, hides masked lines, and
//! compares against the previous *reported* vector so that masking never
//! produces phantom edges.

use tracing::{debug, info};

use crate::sampler::{ButtonSampler, HardwareError};
use crate::snapshot::ButtonSnapshot;

pub struct ButtonReader<S: ButtonSampler> {
    sampler: S,
    previous: Vec<bool>,
    ignore: Vec<bool>,
}

impl<S: ButtonSampler> ButtonReader<S> {
    /// Set up the sampler. Failure here is fatal for the caller.
    pub fn new(mut sampler: S) -> Result<Self, HardwareError> {
        sampler.setup()?;
        let count = sampler.pin_count();
        if count == 0 {
            return Err(HardwareError::NoLines);
        }
        info!(buttons = count, "button reader ready");
        Ok(Self {
            sampler,
            previous: vec![false; count],
            ignore: vec![false; count],
        })
    }

    pub fn button_count(&self) -> usize {
        self.previous.len()
    }

    pub fn sampler(&self) -> &S {
        &self.sampler
    }

    pub fn sampler_mut(&mut self) -> &mut S {
        &mut self.sampler
    }

    pub fn is_ignored(&self, button: usize) -> bool {
        self.ignore.get(button).copied().unwrap_or(false)
    }

    /// Sample one frame.
    pub fn read(&mut self) -> ButtonSnapshot {
        let raw = self.sample_raw();
        let mut filtered = raw.clone();

        for (i, high) in raw.iter().enumerate() {
            if !self.ignore[i] {
                continue;
            }
            if !high {
                self.ignore[i] = false;
                debug!(button = i, "ignore mask cleared");
            }
            filtered[i] = false;
        }

        let previous = std::mem::replace(&mut self.previous, filtered.clone());
        let snapshot = ButtonSnapshot::new(filtered, previous);

        for button in snapshot.press_edges() {
            info!(button, "button pressed");
        }
        for button in snapshot.release_edges() {
            debug!(button, "button released");
        }

        snapshot
    }

    /// Mask every line that is physically high right now.
    ///
    /// Masked lines read as released until they are seen low. Their previous
    /// state is forced low as well so no release edge follows.
    pub fn ignore_pressed_until_released(&mut self) {
        let raw = self.sample_raw();
        let mut masked = 0usize;
        for (i, high) in raw.into_iter().enumerate() {
            if high {
                self.ignore[i] = true;
                self.previous[i] = false;
                masked += 1;
            }
        }
        if masked > 0 {
            debug!(masked, "ignoring held buttons until released");
        }
    }

    pub fn teardown(&mut self) {
        self.sampler.teardown();
        info!("button reader released");
    }

    fn sample_raw(&mut self) -> Vec<bool> {
        self.sampler.poll();
        (0..self.previous.len())
            .map(|pin| self.sampler.read(pin))
            .collect()
    }
}
