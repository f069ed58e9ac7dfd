//! Raw button line sampling.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HardwareError {
    #[error("button hardware unavailable: {0}")]
    Unavailable(String),
    #[error("sampler reports no button lines")]
    NoLines,
}

/// Source of raw, undebounced button levels.
///
/// `read` returns `true` while a line is held. Implementations may be GPIO,
/// keyboard or scripted; the reader treats them all the same.
pub trait ButtonSampler {
    fn setup(&mut self) -> Result<(), HardwareError>;

    fn pin_count(&self) -> usize;

    fn read(&mut self, pin: usize) -> bool;

    fn teardown(&mut self);

    /// Called once before the lines of a frame are read.
    fn poll(&mut self) {}
}
