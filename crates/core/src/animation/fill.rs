//! Whole-strip fills.

use std::ops::Range;

use super::{clamp_range, Animation, Cadence};
use crate::color::hue;
use crate::rng::SimpleRng;
use crate::types::{LedStrip, Pixel, StripError, StripId};

/// Hue-rotating rainbow over a pixel range.
#[derive(Debug, Clone)]
pub struct RainbowFill {
    strip: StripId,
    cadence: Cadence,
    range: Range<usize>,
    hue_offset: f32,
    hue_shift: f32,
    hue_spread: f32,
}

impl RainbowFill {
    pub fn new(strip: StripId, range: Range<usize>) -> Self {
        Self {
            strip,
            cadence: Cadence::new(50),
            range,
            hue_offset: 0.0,
            hue_shift: 8.0,
            hue_spread: 360.0 / 30.0,
        }
    }

    pub fn with_cadence_ms(mut self, ms: u64) -> Self {
        self.cadence = Cadence::new(ms);
        self
    }

    /// Degrees added per advance.
    pub fn with_hue_shift(mut self, degrees: f32) -> Self {
        self.hue_shift = degrees;
        self
    }

    /// Degrees between neighbouring pixels.
    pub fn with_hue_spread(mut self, degrees: f32) -> Self {
        self.hue_spread = degrees;
        self
    }

    pub fn hue_offset(&self) -> f32 {
        self.hue_offset
    }

    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Color of pixel `index`, or `None` outside the range.
    pub fn color_at(&self, index: usize) -> Option<Pixel> {
        self.range.contains(&index).then(|| {
            let k = index - self.range.start;
            hue(self.hue_offset + k as f32 * self.hue_spread)
        })
    }
}

impl Animation for RainbowFill {
    fn name(&self) -> &'static str {
        "rainbow_fill"
    }

    fn strip(&self) -> StripId {
        self.strip
    }

    fn cadence(&self) -> &Cadence {
        &self.cadence
    }

    fn cadence_mut(&mut self) -> &mut Cadence {
        &mut self.cadence
    }

    fn advance(&mut self, _dt_ms: u64, _rng: &mut SimpleRng) {
        self.hue_offset = (self.hue_offset + self.hue_shift) % 360.0;
    }

    fn render(&self, strip: &mut dyn LedStrip) -> Result<(), StripError> {
        for i in clamp_range(self.range.clone(), strip.pixel_count()) {
            if let Some(color) = self.color_at(i) {
                strip.set(i, color)?;
            }
        }
        Ok(())
    }
}

/// Slow sine "breathing" of one color between two brightness levels.
#[derive(Debug, Clone)]
pub struct Breathing {
    strip: StripId,
    cadence: Cadence,
    color: Pixel,
    min: f32,
    max: f32,
    phase: f32,
}

impl Breathing {
    /// Phase step per advance, in radians.
    const PHASE_STEP: f32 = 0.1;

    pub fn new(strip: StripId, color: Pixel, min: f32, max: f32) -> Self {
        Self {
            strip,
            cadence: Cadence::new(100),
            color,
            min,
            max,
            phase: 0.0,
        }
    }

    pub fn brightness(&self) -> f32 {
        self.min + (self.max - self.min) * (0.5 + 0.5 * self.phase.sin())
    }
}

impl Animation for Breathing {
    fn name(&self) -> &'static str {
        "breathing"
    }

    fn strip(&self) -> StripId {
        self.strip
    }

    fn cadence(&self) -> &Cadence {
        &self.cadence
    }

    fn cadence_mut(&mut self) -> &mut Cadence {
        &mut self.cadence
    }

    fn advance(&mut self, _dt_ms: u64, _rng: &mut SimpleRng) {
        self.phase += Self::PHASE_STEP;
        if self.phase >= std::f32::consts::TAU {
            self.phase -= std::f32::consts::TAU;
        }
    }

    fn render(&self, strip: &mut dyn LedStrip) -> Result<(), StripError> {
        strip.fill(self.color.scale(self.brightness()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PixelBuffer;

    #[test]
    fn rainbow_render_is_idempotent() {
        let mut anim = RainbowFill::new(0, 0..10);
        let mut rng = SimpleRng::new(1);
        anim.advance(50, &mut rng);
        let mut a = PixelBuffer::new(10);
        let mut b = PixelBuffer::new(10);
        anim.render(&mut a).unwrap();
        anim.render(&mut b).unwrap();
        anim.render(&mut b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rainbow_range_is_clamped_to_strip() {
        let anim = RainbowFill::new(0, 5..50);
        let mut strip = PixelBuffer::new(8);
        anim.render(&mut strip).unwrap();
        assert!(strip.get(4).unwrap().is_black());
        assert!(!strip.get(7).unwrap().is_black());
    }

    #[test]
    fn rainbow_hue_wraps() {
        let mut anim = RainbowFill::new(0, 0..1).with_hue_shift(200.0);
        let mut rng = SimpleRng::new(1);
        anim.advance(0, &mut rng);
        anim.advance(0, &mut rng);
        assert!((anim.hue_offset() - 40.0).abs() < 1e-3);
    }

    #[test]
    fn breathing_stays_within_bounds() {
        let mut anim = Breathing::new(0, Pixel::WHITE, 0.1, 0.6);
        let mut rng = SimpleRng::new(1);
        for _ in 0..200 {
            anim.advance(100, &mut rng);
            let b = anim.brightness();
            assert!((0.1 - 1e-6..=0.6 + 1e-6).contains(&b));
        }
    }
}
