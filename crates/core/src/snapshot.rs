//! Immutable per-frame button snapshot with edge detection.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("button state length mismatch: current has {current}, previous has {previous}")]
    LengthMismatch { current: usize, previous: usize },
}

/// One frame of button state.
///
/// All derived values are computed once at construction and never change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonSnapshot {
    current: Vec<bool>,
    previous: Vec<bool>,
    changed: Vec<bool>,
    pressed_count: usize,
    any_changed: bool,
}

impl ButtonSnapshot {
    pub fn try_new(current: Vec<bool>, previous: Vec<bool>) -> Result<Self, SnapshotError> {
        if current.len() != previous.len() {
            return Err(SnapshotError::LengthMismatch {
                current: current.len(),
                previous: previous.len(),
            });
        }

        let changed: Vec<bool> = current
            .iter()
            .zip(&previous)
            .map(|(c, p)| c != p)
            .collect();
        let pressed_count = current.iter().filter(|&&c| c).count();
        let any_changed = changed.iter().any(|&c| c);

        Ok(Self {
            current,
            previous,
            changed,
            pressed_count,
            any_changed,
        })
    }

    /// Build a snapshot from vectors the caller guarantees have equal length.
    ///
    /// # Panics
    ///
    /// Panics on a length mismatch; that is a programming error, not input.
    pub fn new(current: Vec<bool>, previous: Vec<bool>) -> Self {
        match Self::try_new(current, previous) {
            Ok(snapshot) => snapshot,
            Err(err) => panic!("{err}"),
        }
    }

    /// All buttons up, no edges.
    pub fn released(len: usize) -> Self {
        Self::new(vec![false; len], vec![false; len])
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    pub fn current(&self) -> &[bool] {
        &self.current
    }

    pub fn previous(&self) -> &[bool] {
        &self.previous
    }

    pub fn changed(&self) -> &[bool] {
        &self.changed
    }

    /// Out-of-range indices read as not pressed.
    pub fn is_pressed(&self, button: usize) -> bool {
        self.current.get(button).copied().unwrap_or(false)
    }

    pub fn previous_state(&self, button: usize) -> bool {
        self.previous.get(button).copied().unwrap_or(false)
    }

    pub fn was_changed(&self, button: usize) -> bool {
        self.changed.get(button).copied().unwrap_or(false)
    }

    /// Rising edge this frame.
    pub fn was_pressed(&self, button: usize) -> bool {
        self.was_changed(button) && self.is_pressed(button)
    }

    /// Falling edge this frame.
    pub fn was_released(&self, button: usize) -> bool {
        self.was_changed(button) && !self.is_pressed(button)
    }

    pub fn pressed_count(&self) -> usize {
        self.pressed_count
    }

    pub fn any_changed(&self) -> bool {
        self.any_changed
    }

    pub fn all_pressed(&self) -> bool {
        !self.is_empty() && self.pressed_count == self.len()
    }

    pub fn pressed_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.current
            .iter()
            .enumerate()
            .filter_map(|(i, &c)| c.then_some(i))
    }

    /// Buttons with a rising edge, in index order.
    pub fn press_edges(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len()).filter(|&i| self.was_pressed(i))
    }

    /// Buttons with a falling edge, in index order.
    pub fn release_edges(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len()).filter(|&i| self.was_released(i))
    }
}
