//! Time-gated strip animations.
//!
//! Every animation is bound to one strip and follows the same contract:
//!
//! - [`Animation::should_advance`] is true once its [`Cadence`] has elapsed
//! - [`Animation::advance`] moves internal phase only and never touches a strip
//! - [`Animation::render`] writes pixels derived from phase; rendering twice
//!   without an advance writes the same pixels
//!
//! A state exposes its animations as ordered layers. Each frame
//! [`advance_and_render`] advances whatever is due, then re-renders every layer
//! of each strip that had at least one advance, so overlays always land on top
//! of a fresh base. Strips nobody advanced are left untouched and are not
//! flushed.
//!
//! # Catalog
//!
//! | Module | Animations |
//! |--------|------------|
//! | [`fill`] | [`RainbowFill`], [`Breathing`] |
//! | [`snake`] | [`SnakeTrail`] |
//! | [`segments`] | [`AmplifySegments`], [`CodeEntry`], [`CodeRevealSegments`] |
//! | [`pyramid`] | [`HeightFill`], [`HeightWipe`], [`PartyPyramid`], [`CodePyramid`], [`CodeRevealPyramid`] |
//! | [`particles`] | [`Particles`] |
//! | [`party`] | [`PartyWave`], [`ReductionOverlay`] |
//! | [`pattern`] | [`PhasedPattern`], [`ReleasedBlink`] |

pub mod fill;
pub mod particles;
pub mod party;
pub mod pattern;
pub mod pyramid;
pub mod segments;
pub mod snake;

use std::ops::Range;

use crate::rng::SimpleRng;
use crate::types::{LedStrip, StripError, StripId};

pub use fill::{Breathing, RainbowFill};
pub use particles::Particles;
pub use party::{PartyWave, ReductionOverlay};
pub use pattern::{Phase, PhasePlan, PhasedPattern, ReleasedBlink};
pub use pyramid::{CodePyramid, CodeRevealPyramid, HeightFill, HeightWipe, PartyPyramid};
pub use segments::{AmplifySegments, CodeEntry, CodeRevealSegments};
pub use snake::SnakeTrail;

/// Minimum interval between advances.
///
/// A fresh cadence is due immediately so a new state paints on its first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    interval_ms: u64,
    last_ms: Option<u64>,
}

impl Cadence {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_ms: None,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn set_interval(&mut self, interval_ms: u64) {
        self.interval_ms = interval_ms;
    }

    pub fn is_due(&self, now_ms: u64) -> bool {
        match self.last_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.interval_ms,
        }
    }

    /// Mark an advance at `now_ms` and return the time since the previous one.
    pub fn fire(&mut self, now_ms: u64) -> u64 {
        let dt = self
            .last_ms
            .map_or(self.interval_ms, |last| now_ms.saturating_sub(last));
        self.last_ms = Some(now_ms);
        dt
    }
}

pub trait Animation {
    fn name(&self) -> &'static str;

    fn strip(&self) -> StripId;

    fn cadence(&self) -> &Cadence;

    fn cadence_mut(&mut self) -> &mut Cadence;

    /// Move phase forward by `dt_ms`. Must not touch any strip.
    fn advance(&mut self, dt_ms: u64, rng: &mut SimpleRng);

    /// Paint the current phase.
    fn render(&self, strip: &mut dyn LedStrip) -> Result<(), StripError>;

    fn should_advance(&self, now_ms: u64) -> bool {
        self.cadence().is_due(now_ms)
    }

    /// Advance if due. Returns whether it advanced.
    fn tick(&mut self, now_ms: u64, rng: &mut SimpleRng) -> bool {
        if !self.should_advance(now_ms) {
            return false;
        }
        let dt = self.cadence_mut().fire(now_ms);
        self.advance(dt, rng);
        true
    }
}

/// Upper bound on layers a single state exposes.
pub const MAX_LAYERS: usize = 8;

/// Advance due layers and repaint their strips.
///
/// Returns one flag per strip: `true` when it was repainted and needs a flush.
/// Layers bound to a strip that does not exist are skipped.
pub fn advance_and_render(
    layers: &mut [&mut dyn Animation],
    strips: &mut [Box<dyn LedStrip>],
    now_ms: u64,
    rng: &mut SimpleRng,
) -> Result<Vec<bool>, StripError> {
    let mut dirty = vec![false; strips.len()];

    for layer in layers.iter_mut() {
        let id = layer.strip();
        if id < strips.len() && layer.tick(now_ms, rng) {
            dirty[id] = true;
        }
    }

    for layer in layers.iter() {
        let id = layer.strip();
        if dirty.get(id).copied().unwrap_or(false) {
            layer.render(strips[id].as_mut())?;
        }
    }

    Ok(dirty)
}

/// Pixel range owned by `button` when `len` pixels are split evenly.
pub fn segment_range(button: usize, leds_per_button: usize, len: usize) -> Range<usize> {
    let start = (button * leds_per_button).min(len);
    let end = (start + leds_per_button).min(len);
    start..end
}

/// Clamp `range` into `0..len`.
pub fn clamp_range(range: Range<usize>, len: usize) -> Range<usize> {
    let end = range.end.min(len);
    range.start.min(end)..end
}
