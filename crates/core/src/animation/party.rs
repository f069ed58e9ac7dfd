//! Button-strip visuals for the party state.

use super::{segment_range, Animation, Cadence};
use crate::color::PARTY_PALETTE;
use crate::rng::SimpleRng;
use crate::types::{LedStrip, Pixel, StripError, StripId};

/// Color bands pushed outward from the middle of the strip.
///
/// The push speed is re-rolled between 10 and 20 ms per pixel once every full
/// palette cycle.
#[derive(Debug, Clone)]
pub struct PartyWave {
    strip: StripId,
    cadence: Cadence,
    pixel_count: usize,
    band_width: usize,
    offset: usize,
    advances: usize,
}

impl PartyWave {
    const MIN_SPEED_MS: i32 = 10;
    const MAX_SPEED_MS: i32 = 20;

    pub fn new(strip: StripId, pixel_count: usize) -> Self {
        Self {
            strip,
            cadence: Cadence::new(15),
            pixel_count,
            band_width: 25,
            offset: 0,
            advances: 0,
        }
    }

    pub fn with_band_width(mut self, width: usize) -> Self {
        self.band_width = width.max(1);
        self
    }

    fn cycle(&self) -> usize {
        self.band_width * PARTY_PALETTE.len()
    }

    /// Distance of `pixel` from the nearer of the two middle pixels.
    fn distance(&self, pixel: usize) -> usize {
        let lo = self.pixel_count.saturating_sub(1) / 2;
        let hi = self.pixel_count / 2;
        if pixel < lo {
            lo - pixel
        } else if pixel > hi {
            pixel - hi
        } else {
            0
        }
    }

    pub fn color_at(&self, pixel: usize) -> Pixel {
        let cycle = self.cycle();
        let phase = (self.distance(pixel) + cycle - self.offset % cycle) % cycle;
        PARTY_PALETTE[phase / self.band_width]
    }
}

impl Animation for PartyWave {
    fn name(&self) -> &'static str {
        "party_wave"
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

    fn advance(&mut self, _dt_ms: u64, rng: &mut SimpleRng) {
        self.offset = (self.offset + 1) % self.cycle();
        self.advances += 1;
        if self.advances % self.cycle() == 0 {
            let ms = rng.range_inclusive(Self::MIN_SPEED_MS, Self::MAX_SPEED_MS);
            self.cadence.set_interval(ms as u64);
        }
    }

    fn render(&self, strip: &mut dyn LedStrip) -> Result<(), StripError> {
        for i in 0..strip.pixel_count().min(self.pixel_count) {
            strip.set(i, self.color_at(i))?;
        }
        Ok(())
    }
}

/// Red pushed outward from the two center segments while the party is being
/// wound down. Added on top of the base layer.
#[derive(Debug, Clone)]
pub struct ReductionOverlay {
    strip: StripId,
    cadence: Cadence,
    leds_per_button: usize,
    centers: (usize, usize),
    held: (bool, bool),
    spreads: (usize, usize),
}

impl ReductionOverlay {
    pub fn new(strip: StripId, pixel_count: usize, buttons: usize, centers: (usize, usize)) -> Self {
        Self {
            strip,
            cadence: Cadence::new(50),
            leds_per_button: pixel_count / buttons.max(1),
            centers,
            held: (false, false),
            spreads: (0, 0),
        }
    }

    pub fn set(&mut self, held: (bool, bool), spreads: (usize, usize)) {
        self.held = held;
        self.spreads = spreads;
    }

    fn paint_red(strip: &mut dyn LedStrip, range: std::ops::Range<usize>) -> Result<(), StripError> {
        for i in range {
            strip.set(i, strip.get(i)?.lighten(Pixel::RED))?;
        }
        Ok(())
    }
}

impl Animation for ReductionOverlay {
    fn name(&self) -> &'static str {
        "reduction_overlay"
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

    fn advance(&mut self, _dt_ms: u64, _rng: &mut SimpleRng) {}

    fn render(&self, strip: &mut dyn LedStrip) -> Result<(), StripError> {
        let len = strip.pixel_count();
        let (a, b) = self.centers;
        if self.held.0 {
            let seg = segment_range(a, self.leds_per_button, len);
            let end = (seg.end + self.spreads.0).min(len);
            Self::paint_red(strip, seg.start..end)?;
        }
        if self.held.1 {
            let seg = segment_range(b, self.leds_per_button, len);
            let start = seg.start.saturating_sub(self.spreads.1);
            Self::paint_red(strip, start..seg.end)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PixelBuffer;

    #[test]
    fn wave_is_symmetric_around_middle() {
        let wave = PartyWave::new(0, 300);
        assert_eq!(wave.color_at(149), PARTY_PALETTE[0]);
        assert_eq!(wave.color_at(150), PARTY_PALETTE[0]);
        assert_eq!(wave.color_at(149 - 30), wave.color_at(150 + 30));
        assert_eq!(wave.color_at(150 + 25), PARTY_PALETTE[1]);
    }

    #[test]
    fn wave_moves_outward() {
        let mut wave = PartyWave::new(0, 300);
        let mut rng = SimpleRng::new(3);
        let before = wave.color_at(150 + 25);
        wave.advance(15, &mut rng);
        // The band that sat one pixel closer to the middle is now here.
        assert_eq!(wave.color_at(150 + 25), PARTY_PALETTE[0]);
        assert_ne!(before, wave.color_at(150 + 25));
    }

    #[test]
    fn wave_speed_is_rerolled_each_cycle() {
        let mut wave = PartyWave::new(0, 300);
        let mut rng = SimpleRng::new(3);
        for _ in 0..100 {
            wave.advance(15, &mut rng);
        }
        let ms = wave.cadence().interval_ms();
        assert!((10..=20).contains(&ms));
    }

    #[test]
    fn overlay_spreads_away_from_centers() {
        let mut overlay = ReductionOverlay::new(0, 100, 10, (5, 4));
        overlay.set((true, true), (3, 2));
        let mut strip = PixelBuffer::new(100);
        overlay.render(&mut strip).unwrap();
        assert_eq!(strip.get(50).unwrap(), Pixel::RED);
        assert_eq!(strip.get(62).unwrap(), Pixel::RED);
        assert!(strip.get(63).unwrap().is_black());
        assert_eq!(strip.get(38).unwrap(), Pixel::RED);
        assert!(strip.get(37).unwrap().is_black());
    }

    #[test]
    fn released_center_shows_nothing() {
        let mut overlay = ReductionOverlay::new(0, 100, 10, (5, 4));
        overlay.set((false, true), (0, 0));
        let mut strip = PixelBuffer::new(100);
        overlay.render(&mut strip).unwrap();
        assert!(strip.get(55).unwrap().is_black());
        assert_eq!(strip.get(45).unwrap(), Pixel::RED);
    }

    #[test]
    fn rendering_twice_over_a_base_is_stable() {
        let mut overlay = ReductionOverlay::new(0, 100, 10, (5, 4));
        overlay.set((true, true), (3, 2));
        let mut strip = PixelBuffer::new(100);
        strip.fill(Pixel::new(0, 0, 40)).unwrap();
        overlay.render(&mut strip).unwrap();
        let once = strip.pixels().to_vec();
        overlay.render(&mut strip).unwrap();
        assert_eq!(strip.pixels(), &once[..]);
        assert_eq!(strip.get(50).unwrap(), Pixel::new(255, 0, 40));
    }
}
