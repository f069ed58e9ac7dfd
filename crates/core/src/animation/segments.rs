//! Per-button segment animations on the button strip.
//!
//! The button strip is split evenly: button `i` owns pixels
//! `i * leds_per_button .. (i + 1) * leds_per_button`.

use super::{segment_range, Animation, Cadence, RainbowFill};
use crate::color::{beat8, code_digit_color, code_gradient, ORANGE_RED};
use crate::rng::SimpleRng;
use crate::types::{button_index, LedStrip, Pixel, StripError, StripId};

/// A [`RainbowFill`] per pressed segment, restarted on every press; released
/// segments fade out, and the center of every released segment blinks
/// orange-red as a "press me" hint.
#[derive(Debug, Clone)]
pub struct AmplifySegments {
    strip: StripId,
    cadence: Cadence,
    leds_per_button: usize,
    pressed: Vec<bool>,
    rainbows: Vec<Option<RainbowFill>>,
    buffer: Vec<Pixel>,
    elapsed_ms: u64,
}

impl AmplifySegments {
    const HUE_SHIFT: f32 = 10.0;
    const HUE_SPREAD: f32 = 6.7;
    const FADE: u8 = 60;
    const HINT_BPM: u32 = 40;
    const HINT_THRESHOLD: u8 = 224;

    pub fn new(strip: StripId, pixel_count: usize, buttons: usize) -> Self {
        Self {
            strip,
            cadence: Cadence::new(100),
            leds_per_button: pixel_count / buttons.max(1),
            pressed: vec![false; buttons],
            rainbows: vec![None; buttons],
            buffer: vec![Pixel::BLACK; pixel_count],
            elapsed_ms: 0,
        }
    }

    pub fn set_pressed(&mut self, pressed: &[bool]) {
        let len = self.buffer.len();
        for (button, &down) in pressed.iter().enumerate().take(self.pressed.len()) {
            self.pressed[button] = down;
            let rainbow = &mut self.rainbows[button];
            match (down, rainbow.is_some()) {
                (true, false) => {
                    let range = segment_range(button, self.leds_per_button, len);
                    *rainbow = Some(
                        RainbowFill::new(self.strip, range)
                            .with_hue_shift(Self::HUE_SHIFT)
                            .with_hue_spread(Self::HUE_SPREAD),
                    );
                }
                (false, true) => *rainbow = None,
                _ => {}
            }
        }
    }

    /// The rainbow running on `button`'s segment, if it is held.
    pub fn rainbow(&self, button: usize) -> Option<&RainbowFill> {
        self.rainbows.get(button).and_then(Option::as_ref)
    }

    fn center_pixel(&self, button: usize) -> usize {
        let len = self.buffer.len();
        let per = len as f32 / self.pressed.len().max(1) as f32;
        let center = (per * (button as f32 + 0.5) - 1.0).max(0.0) as usize;
        center.min(len.saturating_sub(1))
    }
}

impl Animation for AmplifySegments {
    fn name(&self) -> &'static str {
        "amplify_segments"
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
        self.elapsed_ms += dt_ms;

        for p in &mut self.buffer {
            *p = p.fade(Self::FADE);
        }

        let len = self.buffer.len();
        for rainbow in self.rainbows.iter_mut().flatten() {
            rainbow.advance(dt_ms, rng);
            for i in rainbow.range() {
                if let Some(color) = rainbow.color_at(i) {
                    self.buffer[i] = color;
                }
            }
        }

        let hint_on = beat8(Self::HINT_BPM, self.elapsed_ms) >= Self::HINT_THRESHOLD;
        for button in 0..self.pressed.len() {
            if self.pressed[button] || len == 0 {
                continue;
            }
            let center = self.center_pixel(button);
            self.buffer[center] = if hint_on { ORANGE_RED } else { Pixel::BLACK };
        }
    }

    fn render(&self, strip: &mut dyn LedStrip) -> Result<(), StripError> {
        let n = strip.pixel_count().min(self.buffer.len());
        for (i, &p) in self.buffer[..n].iter().enumerate() {
            strip.set(i, p)?;
        }
        Ok(())
    }
}

/// Code entry: a blue gradient sweeps across the strip, then every entered
/// digit lights its button's segment green (hue shifting per digit).
#[derive(Debug, Clone)]
pub struct CodeEntry {
    strip: StripId,
    cadence: Cadence,
    pixel_count: usize,
    leds_per_button: usize,
    revealed: usize,
    digits: Vec<usize>,
}

impl CodeEntry {
    const PIXELS_PER_ADVANCE: usize = 8;

    pub fn new(strip: StripId, pixel_count: usize, buttons: usize) -> Self {
        Self {
            strip,
            cadence: Cadence::new(20),
            pixel_count,
            leds_per_button: pixel_count / buttons.max(1),
            revealed: 0,
            digits: Vec::new(),
        }
    }

    /// Entered code so far, as button characters.
    pub fn set_digits(&mut self, code: &str) {
        self.digits = code.chars().filter_map(button_index).collect();
    }

    pub fn digits(&self) -> &[usize] {
        &self.digits
    }
}

impl Animation for CodeEntry {
    fn name(&self) -> &'static str {
        "code_entry"
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
        self.revealed = (self.revealed + Self::PIXELS_PER_ADVANCE).min(self.pixel_count);
    }

    fn render(&self, strip: &mut dyn LedStrip) -> Result<(), StripError> {
        let len = strip.pixel_count().min(self.pixel_count);
        let span = len.saturating_sub(1).max(1) as f32;
        for i in 0..len {
            let color = if i < self.revealed {
                code_gradient(i as f32 / span)
            } else {
                Pixel::BLACK
            };
            strip.set(i, color)?;
        }
        for (k, &button) in self.digits.iter().enumerate() {
            let range = segment_range(button, self.leds_per_button, len);
            strip.set_range(range, code_digit_color(k))?;
        }
        Ok(())
    }
}

/// Code reveal: digit segments light one by one, then blink together.
#[derive(Debug, Clone)]
pub struct CodeRevealSegments {
    strip: StripId,
    cadence: Cadence,
    leds_per_button: usize,
    digits: Vec<usize>,
    revealed: usize,
    blink_ticks: u32,
    lit: bool,
}

impl CodeRevealSegments {
    pub fn new(strip: StripId, pixel_count: usize, buttons: usize, code: &str) -> Self {
        Self {
            strip,
            cadence: Cadence::new(200),
            leds_per_button: pixel_count / buttons.max(1),
            digits: code.chars().filter_map(button_index).collect(),
            revealed: 0,
            blink_ticks: 0,
            lit: true,
        }
    }

    pub fn is_fully_revealed(&self) -> bool {
        self.revealed >= self.digits.len()
    }
}

impl Animation for CodeRevealSegments {
    fn name(&self) -> &'static str {
        "code_reveal_segments"
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
        if !self.is_fully_revealed() {
            self.revealed += 1;
            return;
        }
        // Blink at half the fill rate.
        self.blink_ticks += 1;
        if self.blink_ticks % 2 == 0 {
            self.lit = !self.lit;
        }
    }

    fn render(&self, strip: &mut dyn LedStrip) -> Result<(), StripError> {
        strip.fill(Pixel::BLACK)?;
        if !self.lit {
            return Ok(());
        }
        let len = strip.pixel_count();
        for (k, &button) in self.digits.iter().take(self.revealed).enumerate() {
            let range = segment_range(button, self.leds_per_button, len);
            strip.set_range(range, code_digit_color(k))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PixelBuffer;

    #[test]
    fn amplify_lights_only_pressed_segments() {
        let mut anim = AmplifySegments::new(0, 100, 10);
        let mut pressed = vec![false; 10];
        pressed[2] = true;
        anim.set_pressed(&pressed);
        anim.advance(100, &mut SimpleRng::new(1));

        let mut strip = PixelBuffer::new(100);
        anim.render(&mut strip).unwrap();
        assert!((20..30).all(|i| !strip.get(i).unwrap().is_black()));
        assert!(strip.get(0).unwrap().is_black());
        assert!(strip.get(45).unwrap().is_black());
    }

    #[test]
    fn amplify_rainbow_restarts_on_each_press() {
        let mut anim = AmplifySegments::new(0, 100, 10);
        let mut rng = SimpleRng::new(1);
        let mut pressed = vec![false; 10];
        pressed[3] = true;
        anim.set_pressed(&pressed);
        assert_eq!(anim.rainbow(3).map(|r| r.range()), Some(30..40));
        anim.advance(100, &mut rng);
        anim.advance(100, &mut rng);
        assert!(anim.rainbow(3).unwrap().hue_offset() > 0.0);

        // Held through another update: same rainbow keeps running.
        anim.set_pressed(&pressed);
        assert!(anim.rainbow(3).unwrap().hue_offset() > 0.0);

        anim.set_pressed(&[false; 10]);
        assert!(anim.rainbow(3).is_none());
        anim.set_pressed(&pressed);
        assert_eq!(anim.rainbow(3).unwrap().hue_offset(), 0.0);
    }

    #[test]
    fn amplify_released_segment_fades() {
        let mut anim = AmplifySegments::new(0, 100, 10);
        let mut rng = SimpleRng::new(1);
        let mut pressed = vec![false; 10];
        pressed[0] = true;
        anim.set_pressed(&pressed);
        anim.advance(100, &mut rng);
        anim.set_pressed(&[false; 10]);
        for _ in 0..40 {
            anim.advance(100, &mut rng);
        }
        let mut strip = PixelBuffer::new(100);
        anim.render(&mut strip).unwrap();
        // Only hint pixels may remain lit.
        assert!(strip.get(0).unwrap().is_black());
        assert!(strip.get(9).unwrap().is_black());
    }

    #[test]
    fn code_entry_paints_digits_over_gradient() {
        let mut anim = CodeEntry::new(0, 100, 10);
        let mut rng = SimpleRng::new(1);
        for _ in 0..20 {
            anim.advance(20, &mut rng);
        }
        anim.set_digits("31");
        assert_eq!(anim.digits(), &[3, 1]);

        let mut strip = PixelBuffer::new(100);
        anim.render(&mut strip).unwrap();
        assert_eq!(strip.get(35).unwrap(), code_digit_color(0));
        assert_eq!(strip.get(15).unwrap(), code_digit_color(1));
        assert_eq!(strip.get(99).unwrap(), code_gradient(1.0));
    }

    #[test]
    fn reveal_fills_then_blinks() {
        let mut anim = CodeRevealSegments::new(0, 100, 10, "314");
        let mut rng = SimpleRng::new(1);
        let mut strip = PixelBuffer::new(100);

        anim.advance(200, &mut rng);
        anim.render(&mut strip).unwrap();
        assert!(!strip.get(30).unwrap().is_black());
        assert!(strip.get(10).unwrap().is_black());

        anim.advance(200, &mut rng);
        anim.advance(200, &mut rng);
        assert!(anim.is_fully_revealed());

        anim.advance(200, &mut rng);
        anim.advance(200, &mut rng);
        anim.render(&mut strip).unwrap();
        assert!(strip.is_dark());
    }
}
