//! Bouncing snake with a fading trail.

use super::{Animation, Cadence};
use crate::color::hue;
use crate::rng::SimpleRng;
use crate::types::{LedStrip, Pixel, StripError, StripId};

/// A two-pixel head that bounces end to end, shifting hue as it goes and
/// leaving a tail that fades a little on every advance.
#[derive(Debug, Clone)]
pub struct SnakeTrail {
    strip: StripId,
    cadence: Cadence,
    trail: Vec<Pixel>,
    head: usize,
    forward: bool,
    hue: f32,
    hue_shift: f32,
    fade: u8,
}

impl SnakeTrail {
    const STEP: usize = 2;

    pub fn new(strip: StripId, pixel_count: usize) -> Self {
        Self {
            strip,
            cadence: Cadence::new(25),
            trail: vec![Pixel::BLACK; pixel_count],
            head: 0,
            forward: true,
            hue: 0.0,
            hue_shift: 10.0,
            fade: 60,
        }
    }

    pub fn with_cadence_ms(mut self, ms: u64) -> Self {
        self.cadence = Cadence::new(ms);
        self
    }

    pub fn with_hue_shift(mut self, degrees: f32) -> Self {
        self.hue_shift = degrees;
        self
    }

    pub fn with_fade(mut self, amount: u8) -> Self {
        self.fade = amount;
        self
    }

    pub fn head(&self) -> usize {
        self.head
    }
}

impl Animation for SnakeTrail {
    fn name(&self) -> &'static str {
        "snake_trail"
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
        let len = self.trail.len();
        if len == 0 {
            return;
        }

        for p in &mut self.trail {
            *p = p.fade(self.fade);
        }

        let color = hue(self.hue);
        for i in self.head..(self.head + Self::STEP).min(len) {
            self.trail[i] = color;
        }
        self.hue = (self.hue + self.hue_shift) % 360.0;

        if self.forward {
            self.head = (self.head + Self::STEP).min(len - 1);
        } else {
            self.head = self.head.saturating_sub(Self::STEP);
        }
        if self.head >= len - 1 {
            self.forward = false;
        } else if self.head == 0 {
            self.forward = true;
        }
    }

    fn render(&self, strip: &mut dyn LedStrip) -> Result<(), StripError> {
        let n = strip.pixel_count().min(self.trail.len());
        for (i, &p) in self.trail[..n].iter().enumerate() {
            strip.set(i, p)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PixelBuffer;

    #[test]
    fn head_bounces_between_ends() {
        let mut snake = SnakeTrail::new(0, 10);
        let mut rng = SimpleRng::new(1);
        let mut max_head = 0;
        for _ in 0..5 {
            snake.advance(25, &mut rng);
            max_head = max_head.max(snake.head());
        }
        assert_eq!(max_head, 9);
        snake.advance(25, &mut rng);
        assert!(snake.head() < 9);
    }

    #[test]
    fn tail_fades_behind_head() {
        let mut snake = SnakeTrail::new(0, 20);
        let mut rng = SimpleRng::new(1);
        snake.advance(25, &mut rng);
        snake.advance(25, &mut rng);
        let mut strip = PixelBuffer::new(20);
        snake.render(&mut strip).unwrap();
        let first = strip.get(0).unwrap();
        let newest = strip.get(2).unwrap();
        assert!(!first.is_black());
        assert!(first.r() < 255);
        assert_eq!(newest.g().max(newest.r()).max(newest.b()), 255);
    }
}
