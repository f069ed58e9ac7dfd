//! Hold classification for party buttons.
//!
//! Works like delayed auto-repeat on a keyboard: a press fires at once, a
//! longer hold starts a periodic repeat, and a very long hold charges up a
//! level that is spent on release.
//!
//! | Hold time | Event |
//! |-----------|-------|
//! | press | `Dot` |
//! | 0.3 s - 2.0 s | `Stream` every 150 ms |
//! | >= 2.0 s | `Charging` every frame, level 0 at 2 s to 1 at 5 s |
//! | release while charging | `Explosion(level)` |
//! | release while streaming | `Burst` |

use arrayvec::ArrayVec;

use crate::snapshot::ButtonSnapshot;
use crate::types::{
    HOLD_CHARGE_DELAY_MS, HOLD_CHARGE_SPAN_MS, HOLD_STREAM_DELAY_MS, HOLD_STREAM_INTERVAL_MS,
};

/// Upper bound on events produced by one [`HoldClassifier::update`].
pub const MAX_HOLD_EVENTS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoldEvent {
    Dot { button: usize },
    Stream { button: usize },
    Charging { button: usize, level: f32 },
    Explosion { button: usize, level: f32 },
    Burst { button: usize },
}

impl HoldEvent {
    pub fn button(&self) -> usize {
        match *self {
            HoldEvent::Dot { button }
            | HoldEvent::Stream { button }
            | HoldEvent::Charging { button, .. }
            | HoldEvent::Explosion { button, .. }
            | HoldEvent::Burst { button } => button,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldTimings {
    pub stream_delay_ms: u64,
    pub stream_interval_ms: u64,
    pub charge_delay_ms: u64,
    pub charge_span_ms: u64,
}

impl Default for HoldTimings {
    fn default() -> Self {
        Self {
            stream_delay_ms: HOLD_STREAM_DELAY_MS,
            stream_interval_ms: HOLD_STREAM_INTERVAL_MS,
            charge_delay_ms: HOLD_CHARGE_DELAY_MS,
            charge_span_ms: HOLD_CHARGE_SPAN_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Tap,
    Streaming,
    Charging,
}

#[derive(Debug, Clone, Copy)]
struct Hold {
    pressed_ms: u64,
    stream_accumulator: u64,
    last_ms: u64,
    stage: Stage,
}

#[derive(Debug, Clone)]
pub struct HoldClassifier {
    tracked: Vec<bool>,
    holds: Vec<Option<Hold>>,
    timings: HoldTimings,
}

impl HoldClassifier {
    /// Classify every button except those in `excluded`.
    pub fn new(buttons: usize, excluded: &[usize]) -> Self {
        Self::with_timings(buttons, excluded, HoldTimings::default())
    }

    pub fn with_timings(buttons: usize, excluded: &[usize], timings: HoldTimings) -> Self {
        let tracked = (0..buttons).map(|b| !excluded.contains(&b)).collect();
        Self {
            tracked,
            holds: vec![None; buttons],
            timings,
        }
    }

    pub fn is_tracked(&self, button: usize) -> bool {
        self.tracked.get(button).copied().unwrap_or(false)
    }

    /// Current charge level of a held button, if it is charging.
    pub fn charge_level(&self, button: usize, now_ms: u64) -> Option<f32> {
        let hold = self.holds.get(button).copied().flatten()?;
        (hold.stage == Stage::Charging).then(|| self.level(now_ms.saturating_sub(hold.pressed_ms)))
    }

    pub fn update(
        &mut self,
        snapshot: &ButtonSnapshot,
        now_ms: u64,
    ) -> ArrayVec<HoldEvent, MAX_HOLD_EVENTS> {
        let mut events = ArrayVec::<HoldEvent, MAX_HOLD_EVENTS>::new();

        for button in 0..self.holds.len() {
            if !self.tracked[button] {
                continue;
            }

            if snapshot.was_pressed(button) {
                self.holds[button] = Some(Hold {
                    pressed_ms: now_ms,
                    stream_accumulator: 0,
                    last_ms: now_ms,
                    stage: Stage::Tap,
                });
                let _ = events.try_push(HoldEvent::Dot { button });
                continue;
            }

            if !snapshot.is_pressed(button) {
                if let Some(hold) = self.holds[button].take() {
                    let held = now_ms.saturating_sub(hold.pressed_ms);
                    let event = match hold.stage {
                        Stage::Charging => Some(HoldEvent::Explosion {
                            button,
                            level: self.level(held),
                        }),
                        Stage::Streaming => Some(HoldEvent::Burst { button }),
                        Stage::Tap => None,
                    };
                    if let Some(event) = event {
                        let _ = events.try_push(event);
                    }
                }
                continue;
            }

            let Some(mut hold) = self.holds[button] else {
                continue;
            };
            let held = now_ms.saturating_sub(hold.pressed_ms);
            let elapsed = now_ms.saturating_sub(hold.last_ms);
            hold.last_ms = now_ms;

            if held >= self.timings.charge_delay_ms {
                hold.stage = Stage::Charging;
                let _ = events.try_push(HoldEvent::Charging {
                    button,
                    level: self.level(held),
                });
            } else if held >= self.timings.stream_delay_ms {
                if hold.stage == Stage::Tap {
                    hold.stage = Stage::Streaming;
                    hold.stream_accumulator = 0;
                    let _ = events.try_push(HoldEvent::Stream { button });
                } else {
                    hold.stream_accumulator += elapsed;
                    if hold.stream_accumulator >= self.timings.stream_interval_ms {
                        hold.stream_accumulator -= self.timings.stream_interval_ms;
                        let _ = events.try_push(HoldEvent::Stream { button });
                    }
                }
            }

            self.holds[button] = Some(hold);
        }

        events
    }

    fn level(&self, held_ms: u64) -> f32 {
        let over = held_ms.saturating_sub(self.timings.charge_delay_ms);
        (over as f32 / self.timings.charge_span_ms.max(1) as f32).min(1.0)
    }
}
