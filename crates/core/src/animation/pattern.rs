//! Timed color patterns used for failure feedback.

use std::ops::Range;

use super::{clamp_range, segment_range, Animation, Cadence};
use crate::color::{code_digit_color, FAIL_RED_BRIGHT, FAIL_RED_DARK, FAIL_RED_MEDIUM};
use crate::rng::SimpleRng;
use crate::types::{LedStrip, Pixel, StripError, StripId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase {
    pub color: Pixel,
    pub duration_ms: u64,
}

impl Phase {
    pub const fn new(color: Pixel, duration_ms: u64) -> Self {
        Self { color, duration_ms }
    }
}

/// Ordered phases. A plan that does not repeat holds its last color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhasePlan {
    phases: Vec<Phase>,
    repeat: bool,
}

impl PhasePlan {
    pub fn new(phases: Vec<Phase>) -> Self {
        Self {
            phases,
            repeat: false,
        }
    }

    pub fn repeating(mut self) -> Self {
        self.repeat = true;
        self
    }

    /// Bright, off, medium, off, dark.
    pub fn failure() -> Self {
        Self::new(vec![
            Phase::new(FAIL_RED_BRIGHT, 250),
            Phase::new(Pixel::BLACK, 250),
            Phase::new(FAIL_RED_MEDIUM, 250),
            Phase::new(Pixel::BLACK, 250),
            Phase::new(FAIL_RED_DARK, 1300),
        ])
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn total_ms(&self) -> u64 {
        self.phases.iter().map(|p| p.duration_ms).sum()
    }

    pub fn is_finished(&self, elapsed_ms: u64) -> bool {
        !self.repeat && elapsed_ms >= self.total_ms()
    }

    pub fn color_at(&self, elapsed_ms: u64) -> Pixel {
        let Some(last) = self.phases.last() else {
            return Pixel::BLACK;
        };
        let total = self.total_ms();
        let mut t = if self.repeat && total > 0 {
            elapsed_ms % total
        } else {
            elapsed_ms
        };
        for phase in &self.phases {
            if t < phase.duration_ms {
                return phase.color;
            }
            t -= phase.duration_ms;
        }
        last.color
    }
}

/// Plays a [`PhasePlan`] over a range of one strip.
#[derive(Debug, Clone)]
pub struct PhasedPattern {
    strip: StripId,
    cadence: Cadence,
    plan: PhasePlan,
    range: Option<Range<usize>>,
    elapsed_ms: u64,
    started: bool,
}

impl PhasedPattern {
    /// Whole strip.
    pub fn new(strip: StripId, plan: PhasePlan) -> Self {
        Self {
            strip,
            cadence: Cadence::new(50),
            plan,
            range: None,
            elapsed_ms: 0,
            started: false,
        }
    }

    pub fn with_range(mut self, range: Range<usize>) -> Self {
        self.range = Some(range);
        self
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn is_finished(&self) -> bool {
        self.plan.is_finished(self.elapsed_ms)
    }

    pub fn current_color(&self) -> Pixel {
        self.plan.color_at(self.elapsed_ms)
    }
}

impl Animation for PhasedPattern {
    fn name(&self) -> &'static str {
        "phased_pattern"
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

    fn advance(&mut self, dt_ms: u64, _rng: &mut SimpleRng) {
        // The first advance shows phase zero.
        if self.started {
            self.elapsed_ms += dt_ms;
        }
        self.started = true;
    }

    fn render(&self, strip: &mut dyn LedStrip) -> Result<(), StripError> {
        let len = strip.pixel_count();
        let range = self
            .range
            .clone()
            .map_or(0..len, |r| clamp_range(r, len));
        strip.set_range(range, self.current_color())
    }
}

/// Code entry aborted by a release: the digits entered so far stay lit and the
/// released button's segment runs the failure plan.
#[derive(Debug, Clone)]
pub struct ReleasedBlink {
    strip: StripId,
    cadence: Cadence,
    leds_per_button: usize,
    digits: Vec<usize>,
    released: usize,
    plan: PhasePlan,
    elapsed_ms: u64,
    started: bool,
}

impl ReleasedBlink {
    pub fn new(
        strip: StripId,
        pixel_count: usize,
        buttons: usize,
        digits: Vec<usize>,
        released: usize,
    ) -> Self {
        Self {
            strip,
            cadence: Cadence::new(50),
            leds_per_button: pixel_count / buttons.max(1),
            digits,
            released,
            plan: PhasePlan::failure(),
            elapsed_ms: 0,
            started: false,
        }
    }

    pub fn released(&self) -> usize {
        self.released
    }
}

impl Animation for ReleasedBlink {
    fn name(&self) -> &'static str {
        "released_blink"
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

    fn advance(&mut self, dt_ms: u64, _rng: &mut SimpleRng) {
        if self.started {
            self.elapsed_ms += dt_ms;
        }
        self.started = true;
    }

    fn render(&self, strip: &mut dyn LedStrip) -> Result<(), StripError> {
        let len = strip.pixel_count();
        strip.fill(Pixel::BLACK)?;
        for (k, &button) in self.digits.iter().enumerate() {
            strip.set_range(segment_range(button, self.leds_per_button, len), code_digit_color(k))?;
        }
        let range = segment_range(self.released, self.leds_per_button, len);
        strip.set_range(range, self.plan.color_at(self.elapsed_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PixelBuffer;

    #[test]
    fn failure_plan_phases() {
        let plan = PhasePlan::failure();
        assert_eq!(plan.total_ms(), 2300);
        assert_eq!(plan.color_at(0), FAIL_RED_BRIGHT);
        assert_eq!(plan.color_at(300), Pixel::BLACK);
        assert_eq!(plan.color_at(600), FAIL_RED_MEDIUM);
        assert_eq!(plan.color_at(1100), FAIL_RED_DARK);
        assert_eq!(plan.color_at(10_000), FAIL_RED_DARK);
        assert!(plan.is_finished(2300));
    }

    #[test]
    fn repeating_plan_wraps() {
        let plan = PhasePlan::new(vec![
            Phase::new(Pixel::RED, 100),
            Phase::new(Pixel::BLUE, 100),
        ])
        .repeating();
        assert_eq!(plan.color_at(250), Pixel::RED);
        assert_eq!(plan.color_at(350), Pixel::BLUE);
        assert!(!plan.is_finished(10_000));
    }

    #[test]
    fn empty_plan_is_black() {
        assert_eq!(PhasePlan::new(Vec::new()).color_at(5), Pixel::BLACK);
    }

    #[test]
    fn pattern_starts_on_first_phase() {
        let mut anim = PhasedPattern::new(0, PhasePlan::failure()).with_range(2..4);
        let mut rng = SimpleRng::new(1);
        anim.advance(50, &mut rng);
        let mut strip = PixelBuffer::new(6);
        anim.render(&mut strip).unwrap();
        assert_eq!(strip.get(2).unwrap(), FAIL_RED_BRIGHT);
        assert!(strip.get(0).unwrap().is_black());

        for _ in 0..6 {
            anim.advance(50, &mut rng);
        }
        anim.render(&mut strip).unwrap();
        assert_eq!(strip.get(3).unwrap(), Pixel::BLACK);
    }

    #[test]
    fn released_segment_blinks_over_digits() {
        let mut anim = ReleasedBlink::new(0, 100, 10, vec![3, 1], 3);
        let mut rng = SimpleRng::new(1);
        anim.advance(50, &mut rng);
        let mut strip = PixelBuffer::new(100);
        anim.render(&mut strip).unwrap();
        assert_eq!(strip.get(30).unwrap(), FAIL_RED_BRIGHT);
        assert_eq!(strip.get(10).unwrap(), code_digit_color(1));
        assert!(strip.get(50).unwrap().is_black());
    }
}
