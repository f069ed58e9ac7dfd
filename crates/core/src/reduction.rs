//! Party "reduction": two center buttons push red outward until the party ends.
//!
//! Button `A = n/2` spreads toward higher indices and `B = (n-1)/2` toward lower
//! ones (for odd `n` they are the same button, spreading both ways). Each held
//! center grows its spread by one pixel per step. Holding any other button on a
//! side blocks that side, and releasing a center drops its spread to zero.

use crate::snapshot::ButtonSnapshot;
use crate::types::SPREAD_STEP_MS;
use crate::volume::reduction_volume;

/// What one reduction step produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReductionStep {
    /// New music volume, only when it changed.
    pub volume: Option<f32>,
    /// The combined spread reached its limit.
    pub complete: bool,
}

#[derive(Debug, Clone)]
pub struct Reduction {
    buttons: usize,
    a: usize,
    b: usize,
    max_spread: usize,
    step_ms: u64,
    a_spread: usize,
    b_spread: usize,
    a_acc_ms: u64,
    b_acc_ms: u64,
    a_held: bool,
    b_held: bool,
    volume: f32,
}

impl Reduction {
    pub fn new(buttons: usize, leds_per_button: usize) -> Self {
        Self::with_step(buttons, leds_per_button, SPREAD_STEP_MS)
    }

    pub fn with_step(buttons: usize, leds_per_button: usize, step_ms: u64) -> Self {
        let a = buttons / 2;
        let b = buttons.saturating_sub(1) / 2;
        let max_spread = buttons.saturating_sub(1 + a) * leds_per_button;
        Self {
            buttons,
            a,
            b,
            max_spread,
            step_ms: step_ms.max(1),
            a_spread: 0,
            b_spread: 0,
            a_acc_ms: 0,
            b_acc_ms: 0,
            a_held: false,
            b_held: false,
            volume: 1.0,
        }
    }

    /// Center buttons `(A, B)`.
    pub fn centers(&self) -> (usize, usize) {
        (self.a, self.b)
    }

    pub fn max_spread(&self) -> usize {
        self.max_spread
    }

    pub fn spreads(&self) -> (usize, usize) {
        (self.a_spread, self.b_spread)
    }

    pub fn held(&self) -> (bool, bool) {
        (self.a_held, self.b_held)
    }

    pub fn total_spread(&self) -> usize {
        self.a_spread + self.b_spread
    }

    pub fn update(&mut self, snapshot: &ButtonSnapshot, dt_ms: u64) -> ReductionStep {
        self.a_held = snapshot.is_pressed(self.a);
        self.b_held = snapshot.is_pressed(self.b);

        let a_blocked = (self.a + 1..self.buttons).any(|i| snapshot.is_pressed(i));
        let b_blocked = (0..self.b).any(|i| snapshot.is_pressed(i));

        Self::grow(
            self.a_held,
            a_blocked,
            dt_ms,
            self.step_ms,
            self.max_spread,
            &mut self.a_spread,
            &mut self.a_acc_ms,
        );
        Self::grow(
            self.b_held,
            b_blocked,
            dt_ms,
            self.step_ms,
            self.max_spread,
            &mut self.b_spread,
            &mut self.b_acc_ms,
        );

        let total = self.total_spread();
        let mut volume = None;
        if self.a_held && self.b_held {
            // Throttled: only every tenth pixel of spread moves the volume.
            if total % 10 == 0 {
                let v = reduction_volume(total, self.max_spread);
                if v != self.volume {
                    self.volume = v;
                    volume = Some(v);
                }
            }
        } else if self.volume != 1.0 {
            self.volume = 1.0;
            volume = Some(1.0);
        }

        ReductionStep {
            volume,
            complete: self.max_spread > 0 && total >= 2 * self.max_spread,
        }
    }

    fn grow(
        held: bool,
        blocked: bool,
        dt_ms: u64,
        step_ms: u64,
        max_spread: usize,
        spread: &mut usize,
        acc_ms: &mut u64,
    ) {
        if !held {
            *spread = 0;
            *acc_ms = 0;
            return;
        }
        if blocked {
            *acc_ms = 0;
            return;
        }
        *acc_ms += dt_ms;
        while *acc_ms >= step_ms {
            *acc_ms -= step_ms;
            *spread = (*spread + 1).min(max_spread);
        }
    }
}
