//! Animations for the pyramid strip, addressed by height through a [`HeightMap`].

use std::sync::Arc;

use super::{Animation, Cadence};
use crate::color::{code_digit_color, code_gradient, hue, PARTY_PALETTE};
use crate::height::HeightMap;
use crate::rng::SimpleRng;
use crate::types::{LedStrip, Pixel, StripError, StripId, HEIGHT_BUCKETS};

fn paint_between(
    strip: &mut dyn LedStrip,
    map: &HeightMap,
    from: usize,
    to: usize,
    color: Pixel,
) -> Result<(), StripError> {
    let len = strip.pixel_count();
    for pixel in map.pixels_between(from, to) {
        if pixel < len {
            strip.set(pixel, color)?;
        }
    }
    Ok(())
}

/// White fill whose height follows the share of pressed buttons, with a
/// little noise so it never looks frozen.
#[derive(Debug, Clone)]
pub struct HeightFill {
    strip: StripId,
    cadence: Cadence,
    map: Arc<HeightMap>,
    buttons: usize,
    pressed: usize,
    level: usize,
}

impl HeightFill {
    const NOISE: i32 = 2;

    pub fn new(strip: StripId, map: Arc<HeightMap>, buttons: usize) -> Self {
        Self {
            strip,
            cadence: Cadence::new(50),
            map,
            buttons: buttons.max(1),
            pressed: 0,
            level: 0,
        }
    }

    pub fn set_pressed_count(&mut self, pressed: usize) {
        self.pressed = pressed.min(self.buttons);
    }

    pub fn level(&self) -> usize {
        self.level
    }
}

impl Animation for HeightFill {
    fn name(&self) -> &'static str {
        "height_fill"
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
        let target = (self.pressed * HEIGHT_BUCKETS / self.buttons) as i32;
        let noise = if self.pressed == 0 {
            0
        } else {
            rng.range_inclusive(-Self::NOISE, Self::NOISE)
        };
        self.level = (target + noise).clamp(0, HEIGHT_BUCKETS as i32) as usize;
    }

    fn render(&self, strip: &mut dyn LedStrip) -> Result<(), StripError> {
        strip.fill(Pixel::BLACK)?;
        paint_between(strip, &self.map, 0, self.level, Pixel::WHITE)
    }
}

/// Bottom-to-top color wipes, each in a hue further along the wheel.
#[derive(Debug, Clone)]
pub struct HeightWipe {
    strip: StripId,
    cadence: Cadence,
    map: Arc<HeightMap>,
    hue: f32,
    previous_hue: f32,
    height: usize,
}

impl HeightWipe {
    const HUE_STEP: f32 = 46.0;
    const SPEED: usize = 4;

    pub fn new(strip: StripId, map: Arc<HeightMap>) -> Self {
        Self {
            strip,
            cadence: Cadence::new(30),
            map,
            hue: 0.0,
            previous_hue: 360.0 - Self::HUE_STEP,
            height: 0,
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn hue(&self) -> f32 {
        self.hue
    }

    fn step(&mut self) {
        self.height += Self::SPEED;
        if self.height >= HEIGHT_BUCKETS {
            self.height = 0;
            self.previous_hue = self.hue;
            self.hue = (self.hue + Self::HUE_STEP) % 360.0;
        }
    }

    fn paint(&self, strip: &mut dyn LedStrip) -> Result<(), StripError> {
        paint_between(strip, &self.map, 0, self.height, hue(self.hue))?;
        paint_between(strip, &self.map, self.height, HEIGHT_BUCKETS, hue(self.previous_hue))
    }
}

impl Animation for HeightWipe {
    fn name(&self) -> &'static str {
        "height_wipe"
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
        self.step();
    }

    fn render(&self, strip: &mut dyn LedStrip) -> Result<(), StripError> {
        self.paint(strip)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PyramidMode {
    Intro,
    Rainbow,
    Wipe,
    Bands,
}

/// Party pyramid: a white blink intro, then rainbow, wipe and palette-band
/// modes in rotation. A red level pushed down from the top overrides all of
/// them while the party is being wound down.
#[derive(Debug, Clone)]
pub struct PartyPyramid {
    strip: StripId,
    cadence: Cadence,
    map: Arc<HeightMap>,
    mode: PyramidMode,
    mode_elapsed_ms: u64,
    hue_offset: f32,
    wipe: HeightWipe,
    red_level: f32,
}

impl PartyPyramid {
    const INTRO_MS: u64 = 1200;
    const INTRO_BLINK_MS: u64 = 150;
    const MODE_MS: u64 = 10_000;

    pub fn new(strip: StripId, map: Arc<HeightMap>) -> Self {
        let wipe = HeightWipe::new(strip, Arc::clone(&map));
        Self {
            strip,
            cadence: Cadence::new(30),
            map,
            mode: PyramidMode::Intro,
            mode_elapsed_ms: 0,
            hue_offset: 0.0,
            wipe,
            red_level: 0.0,
        }
    }

    pub fn mode(&self) -> PyramidMode {
        self.mode
    }

    /// Share of the pyramid, from the top, painted red. `0.0..=1.0`.
    pub fn set_red_level(&mut self, level: f32) {
        self.red_level = level.clamp(0.0, 1.0);
    }

    pub fn red_level(&self) -> f32 {
        self.red_level
    }

    fn next_mode(&self) -> PyramidMode {
        match self.mode {
            PyramidMode::Intro | PyramidMode::Bands => PyramidMode::Rainbow,
            PyramidMode::Rainbow => PyramidMode::Wipe,
            PyramidMode::Wipe => PyramidMode::Bands,
        }
    }
}

impl Animation for PartyPyramid {
    fn name(&self) -> &'static str {
        "party_pyramid"
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

    fn advance(&mut self, dt_ms: u64, rng: &mut SimpleRng) {
        self.mode_elapsed_ms += dt_ms;
        let limit = match self.mode {
            PyramidMode::Intro => Self::INTRO_MS,
            _ => Self::MODE_MS,
        };
        if self.mode_elapsed_ms >= limit {
            self.mode = self.next_mode();
            self.mode_elapsed_ms = 0;
        }
        self.hue_offset = (self.hue_offset + 3.0) % 360.0;
        if self.mode == PyramidMode::Wipe {
            self.wipe.advance(dt_ms, rng);
        }
    }

    fn render(&self, strip: &mut dyn LedStrip) -> Result<(), StripError> {
        match self.mode {
            PyramidMode::Intro => {
                let on = (self.mode_elapsed_ms / Self::INTRO_BLINK_MS) % 2 == 0;
                strip.fill(if on { Pixel::WHITE } else { Pixel::BLACK })?;
            }
            PyramidMode::Rainbow => {
                strip.fill(Pixel::BLACK)?;
                for h in 0..HEIGHT_BUCKETS {
                    let color = hue(self.hue_offset + h as f32 * 3.6);
                    paint_between(strip, &self.map, h, h + 1, color)?;
                }
            }
            PyramidMode::Wipe => {
                strip.fill(Pixel::BLACK)?;
                self.wipe.paint(strip)?;
            }
            PyramidMode::Bands => {
                strip.fill(Pixel::BLACK)?;
                let shift = (self.hue_offset / 3.0) as usize;
                for h in 0..HEIGHT_BUCKETS {
                    let band = ((h + shift) / 25) % PARTY_PALETTE.len();
                    paint_between(strip, &self.map, h, h + 1, PARTY_PALETTE[band])?;
                }
            }
        }

        if self.red_level > 0.0 {
            let depth = (self.red_level * HEIGHT_BUCKETS as f32).round() as usize;
            paint_between(strip, &self.map, HEIGHT_BUCKETS - depth.min(HEIGHT_BUCKETS), HEIGHT_BUCKETS, Pixel::RED)?;
        }
        Ok(())
    }
}

/// Code entry on the pyramid: a gradient rises one step per entered digit and
/// a white scan line sweeps upward.
#[derive(Debug, Clone)]
pub struct CodePyramid {
    strip: StripId,
    cadence: Cadence,
    map: Arc<HeightMap>,
    code_length: usize,
    digits: usize,
    scan: usize,
}

impl CodePyramid {
    const SCAN_STEP: usize = 5;

    pub fn new(strip: StripId, map: Arc<HeightMap>, code_length: usize) -> Self {
        Self {
            strip,
            cadence: Cadence::new(50),
            map,
            code_length: code_length.max(1),
            digits: 0,
            scan: 0,
        }
    }

    pub fn set_digits(&mut self, digits: usize) {
        self.digits = digits.min(self.code_length);
    }

    fn filled_height(&self) -> usize {
        self.digits * HEIGHT_BUCKETS / self.code_length
    }
}

impl Animation for CodePyramid {
    fn name(&self) -> &'static str {
        "code_pyramid"
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
        self.scan = (self.scan + Self::SCAN_STEP) % HEIGHT_BUCKETS;
    }

    fn render(&self, strip: &mut dyn LedStrip) -> Result<(), StripError> {
        strip.fill(Pixel::BLACK)?;
        for h in 0..self.filled_height() {
            let color = code_gradient(h as f32 / HEIGHT_BUCKETS as f32);
            paint_between(strip, &self.map, h, h + 1, color)?;
        }
        paint_between(strip, &self.map, self.scan, self.scan + 1, Pixel::WHITE.scale(0.5))
    }
}

/// Code accepted: green rising from the bottom, then holding.
#[derive(Debug, Clone)]
pub struct CodeRevealPyramid {
    strip: StripId,
    cadence: Cadence,
    map: Arc<HeightMap>,
    height: usize,
}

impl CodeRevealPyramid {
    const SPEED: usize = 5;

    pub fn new(strip: StripId, map: Arc<HeightMap>) -> Self {
        Self {
            strip,
            cadence: Cadence::new(20),
            map,
            height: 0,
        }
    }

    pub fn is_full(&self) -> bool {
        self.height >= HEIGHT_BUCKETS
    }
}

impl Animation for CodeRevealPyramid {
    fn name(&self) -> &'static str {
        "code_reveal_pyramid"
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
        self.height = (self.height + Self::SPEED).min(HEIGHT_BUCKETS);
    }

    fn render(&self, strip: &mut dyn LedStrip) -> Result<(), StripError> {
        strip.fill(Pixel::BLACK)?;
        for h in 0..self.height {
            paint_between(strip, &self.map, h, h + 1, code_digit_color(h / 20))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PixelBuffer;

    fn linear(n: usize) -> Arc<HeightMap> {
        Arc::new(HeightMap::linear(n))
    }

    #[test]
    fn height_fill_tracks_pressed_share() {
        let mut anim = HeightFill::new(1, linear(100), 10);
        let mut rng = SimpleRng::new(5);
        anim.set_pressed_count(5);
        for _ in 0..20 {
            anim.advance(50, &mut rng);
            assert!((48..=52).contains(&anim.level()));
        }
        anim.set_pressed_count(0);
        anim.advance(50, &mut rng);
        assert_eq!(anim.level(), 0);

        let mut strip = PixelBuffer::new(100);
        anim.render(&mut strip).unwrap();
        assert!(strip.is_dark());
    }

    #[test]
    fn height_fill_full_is_clamped() {
        let mut anim = HeightFill::new(1, linear(100), 10);
        let mut rng = SimpleRng::new(5);
        anim.set_pressed_count(12);
        anim.advance(50, &mut rng);
        assert!(anim.level() <= HEIGHT_BUCKETS);
        assert!(anim.level() >= 98);
    }

    #[test]
    fn wipe_changes_hue_per_pass() {
        let mut wipe = HeightWipe::new(1, linear(100));
        let mut rng = SimpleRng::new(5);
        for _ in 0..25 {
            wipe.advance(30, &mut rng);
        }
        assert_eq!(wipe.height(), 0);
        assert!((wipe.hue() - 46.0).abs() < 1e-3);

        wipe.advance(30, &mut rng);
        let mut strip = PixelBuffer::new(100);
        wipe.render(&mut strip).unwrap();
        assert_eq!(strip.get(0).unwrap(), hue(46.0));
        assert_eq!(strip.get(99).unwrap(), hue(0.0));
    }

    #[test]
    fn party_pyramid_leaves_intro() {
        let mut anim = PartyPyramid::new(1, linear(100));
        let mut rng = SimpleRng::new(5);
        assert_eq!(anim.mode(), PyramidMode::Intro);
        anim.advance(1200, &mut rng);
        assert_eq!(anim.mode(), PyramidMode::Rainbow);
        anim.advance(10_000, &mut rng);
        assert_eq!(anim.mode(), PyramidMode::Wipe);
    }

    #[test]
    fn red_override_paints_from_top() {
        let mut anim = PartyPyramid::new(1, linear(100));
        anim.set_red_level(0.25);
        let mut strip = PixelBuffer::new(100);
        anim.render(&mut strip).unwrap();
        assert_eq!(strip.get(99).unwrap(), Pixel::RED);
        assert_eq!(strip.get(75).unwrap(), Pixel::RED);
        assert_ne!(strip.get(74).unwrap(), Pixel::RED);
    }

    #[test]
    fn code_pyramid_rises_with_digits() {
        let mut anim = CodePyramid::new(1, linear(100), 5);
        anim.set_digits(2);
        let mut strip = PixelBuffer::new(100);
        anim.render(&mut strip).unwrap();
        assert!(!strip.get(39).unwrap().is_black());
        assert!(strip.get(60).unwrap().is_black());
    }

    #[test]
    fn reveal_pyramid_fills_up() {
        let mut anim = CodeRevealPyramid::new(1, linear(100));
        let mut rng = SimpleRng::new(5);
        for _ in 0..20 {
            anim.advance(20, &mut rng);
        }
        assert!(anim.is_full());
        let mut strip = PixelBuffer::new(100);
        anim.render(&mut strip).unwrap();
        assert_eq!(strip.get(99).unwrap(), code_digit_color(4));
    }
}
