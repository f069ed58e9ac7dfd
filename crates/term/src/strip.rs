//! LED strips backed by memory and shown in the terminal preview.

use std::sync::{Arc, Mutex};

use crate::types::{apply_assignment, Colors, LedStrip, Pixel, Position, StripError};

/// A strip whose flushes land in a shared front buffer.
///
/// Animations draw into the back buffer; `flush` publishes it. The preview
/// reads the front buffer through a [`StripView`], so it only ever sees whole
/// frames.
pub struct PreviewStrip {
    back: Vec<Pixel>,
    front: Arc<Mutex<Vec<Pixel>>>,
    flushes: u64,
}

impl PreviewStrip {
    pub fn new(pixel_count: usize) -> Self {
        Self {
            back: vec![Pixel::BLACK; pixel_count],
            front: Arc::new(Mutex::new(vec![Pixel::BLACK; pixel_count])),
            flushes: 0,
        }
    }

    pub fn view(&self) -> StripView {
        StripView {
            front: Arc::clone(&self.front),
        }
    }

    pub fn flush_count(&self) -> u64 {
        self.flushes
    }
}

impl LedStrip for PreviewStrip {
    fn pixel_count(&self) -> usize {
        self.back.len()
    }

    fn get(&self, index: usize) -> Result<Pixel, StripError> {
        self.back.get(index).copied().ok_or(StripError::OutOfRange {
            index,
            len: self.back.len(),
        })
    }

    fn assign(&mut self, position: Position, colors: Colors<'_>) -> Result<(), StripError> {
        apply_assignment(&mut self.back, position, colors)
    }

    fn flush(&mut self) -> Result<(), StripError> {
        let mut front = self
            .front
            .lock()
            .map_err(|_| StripError::Driver("preview buffer poisoned".into()))?;
        front.copy_from_slice(&self.back);
        self.flushes += 1;
        Ok(())
    }
}

/// Read side of a [`PreviewStrip`].
#[derive(Debug, Clone)]
pub struct StripView {
    front: Arc<Mutex<Vec<Pixel>>>,
}

impl StripView {
    /// Copy the last flushed frame into `out`.
    pub fn copy_into(&self, out: &mut Vec<Pixel>) {
        out.clear();
        if let Ok(front) = self.front.lock() {
            out.extend_from_slice(&front);
        }
    }

    pub fn pixels(&self) -> Vec<Pixel> {
        let mut out = Vec::new();
        self.copy_into(&mut out);
        out
    }
}
