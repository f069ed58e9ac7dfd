//! LED strip contract and an in-memory implementation.
//!
//! A strip is a fixed-length row of [`Pixel`]s with an explicit `flush` that
//! pushes the working buffer to whatever is displaying it. Writes never flush
//! implicitly.

use std::ops::Range;

use thiserror::Error;

use crate::pixel::Pixel;

/// Index of a strip inside the installation's strip bank.
pub type StripId = usize;

/// Where an assignment lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Position {
    Index(usize),
    Range(Range<usize>),
}

/// What an assignment writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colors<'a> {
    /// One color broadcast to every position.
    Solid(Pixel),
    /// One color per position; length must match the range exactly.
    Each(&'a [Pixel]),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StripError {
    #[error("invalid assignment: {0}")]
    InvalidAssignment(String),
    #[error("index {index} out of range for strip of {len} pixels")]
    OutOfRange { index: usize, len: usize },
    #[error("strip driver failure: {0}")]
    Driver(String),
}

/// Addressable color strip.
pub trait LedStrip {
    fn pixel_count(&self) -> usize;

    fn get(&self, index: usize) -> Result<Pixel, StripError>;

    fn assign(&mut self, position: Position, colors: Colors<'_>) -> Result<(), StripError>;

    /// Push the working buffer out. Synchronous; may take several milliseconds on hardware.
    fn flush(&mut self) -> Result<(), StripError>;

    fn set(&mut self, index: usize, color: Pixel) -> Result<(), StripError> {
        self.assign(Position::Index(index), Colors::Solid(color))
    }

    fn set_range(&mut self, range: Range<usize>, color: Pixel) -> Result<(), StripError> {
        self.assign(Position::Range(range), Colors::Solid(color))
    }

    fn fill(&mut self, color: Pixel) -> Result<(), StripError> {
        let len = self.pixel_count();
        self.assign(Position::Range(0..len), Colors::Solid(color))
    }
}

/// Validate an assignment against `buf` and apply it.
///
/// Shared by every buffer-backed strip so they all enforce the same contract.
pub fn apply_assignment(
    buf: &mut [Pixel],
    position: Position,
    colors: Colors<'_>,
) -> Result<(), StripError> {
    let len = buf.len();
    match position {
        Position::Index(index) => {
            let Colors::Solid(color) = colors else {
                return Err(StripError::InvalidAssignment(format!(
                    "cannot assign a color sequence to single index {index}"
                )));
            };
            let slot = buf
                .get_mut(index)
                .ok_or(StripError::OutOfRange { index, len })?;
            *slot = color;
        }
        Position::Range(range) => {
            if range.start > range.end {
                return Err(StripError::InvalidAssignment(format!(
                    "reversed range {}..{}",
                    range.start, range.end
                )));
            }
            if range.end > len {
                return Err(StripError::OutOfRange {
                    index: range.end - 1,
                    len,
                });
            }
            let target = &mut buf[range];
            match colors {
                Colors::Solid(color) => target.fill(color),
                Colors::Each(seq) => {
                    if seq.len() != target.len() {
                        return Err(StripError::InvalidAssignment(format!(
                            "sequence of {} colors for range of {}",
                            seq.len(),
                            target.len()
                        )));
                    }
                    target.copy_from_slice(seq);
                }
            }
        }
    }
    Ok(())
}

/// Strip backed by a plain vector. Used headless and in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: Vec<Pixel>,
    flushes: u64,
}

impl PixelBuffer {
    pub fn new(len: usize) -> Self {
        Self {
            pixels: vec![Pixel::BLACK; len],
            flushes: 0,
        }
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Number of times `flush` has been called.
    pub fn flush_count(&self) -> u64 {
        self.flushes
    }

    pub fn is_dark(&self) -> bool {
        self.pixels.iter().all(|p| p.is_black())
    }
}

impl LedStrip for PixelBuffer {
    fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    fn get(&self, index: usize) -> Result<Pixel, StripError> {
        self.pixels.get(index).copied().ok_or(StripError::OutOfRange {
            index,
            len: self.pixels.len(),
        })
    }

    fn assign(&mut self, position: Position, colors: Colors<'_>) -> Result<(), StripError> {
        apply_assignment(&mut self.pixels, position, colors)
    }

    fn flush(&mut self) -> Result<(), StripError> {
        self.flushes += 1;
        Ok(())
    }
}
