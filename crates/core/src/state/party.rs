use tracing::{debug, info};

use super::{GameState, Layers, Settings, StateContext, StripLayout, Transition};
use crate::animation::{Particles, PartyPyramid, PartyWave, ReductionOverlay};
use crate::hold::{HoldClassifier, HoldEvent};
use crate::reduction::Reduction;
use crate::snapshot::ButtonSnapshot;
use crate::types::{Effect, BUTTON_STRIP, PYRAMID_STRIP};

/// Full volume. Held buttons throw particles; after the grace period the two
/// center buttons can wind the party down.
pub struct PartyState {
    wave: PartyWave,
    particles: Particles,
    overlay: ReductionOverlay,
    pyramid: PartyPyramid,
    holds: HoldClassifier,
    reduction: Reduction,
    entered_ms: u64,
    last_ms: u64,
    reducing: bool,
}

impl PartyState {
    pub fn new(settings: &Settings, layout: &StripLayout) -> Self {
        let buttons = settings.buttons;
        let pixels = layout.button_pixels();
        let reduction = Reduction::with_step(
            buttons,
            layout.leds_per_button(buttons),
            settings.spread_step_ms,
        );
        let (a, b) = reduction.centers();
        Self {
            wave: PartyWave::new(BUTTON_STRIP, pixels),
            particles: Particles::new(BUTTON_STRIP, pixels, buttons),
            overlay: ReductionOverlay::new(BUTTON_STRIP, pixels, buttons, (a, b)),
            pyramid: PartyPyramid::new(PYRAMID_STRIP, layout.pyramid_map()),
            holds: HoldClassifier::with_timings(buttons, &[a, b], settings.hold),
            reduction,
            entered_ms: 0,
            last_ms: 0,
            reducing: false,
        }
    }

    pub fn is_reducing(&self) -> bool {
        self.reducing
    }

    pub fn reduction(&self) -> &Reduction {
        &self.reduction
    }

    pub(super) fn enter(&mut self, ctx: &mut StateContext<'_>) {
        ctx.audio.set_volume(1.0);
        self.entered_ms = ctx.now_ms;
        self.last_ms = ctx.now_ms;
    }

    pub(super) fn update(
        &mut self,
        snapshot: &ButtonSnapshot,
        ctx: &mut StateContext<'_>,
    ) -> Transition {
        let dt = ctx.now_ms.saturating_sub(self.last_ms);
        self.last_ms = ctx.now_ms;

        if !ctx.audio.is_playing() {
            debug!("track finished");
            return Transition::To(GameState::idle(ctx.settings, ctx.layout));
        }

        for event in self.holds.update(snapshot, ctx.now_ms) {
            self.particles.trigger(&event, ctx.rng);
            if let HoldEvent::Explosion { button, level } = event {
                debug!(button, level, "explosion");
                let _ = ctx.audio.play_effect(Effect::Boom, ctx.settings.effect_volume);
            }
        }

        if !self.reducing {
            if ctx.now_ms.saturating_sub(self.entered_ms) < ctx.settings.party_grace_ms {
                return Transition::Stay;
            }
            debug!("reduction enabled");
            self.reducing = true;
        }

        let step = self.reduction.update(snapshot, dt);
        if let Some(volume) = step.volume {
            ctx.audio.set_volume(volume);
        }
        self.overlay.set(self.reduction.held(), self.reduction.spreads());
        let max = self.reduction.max_spread();
        if max > 0 {
            self.pyramid
                .set_red_level(self.reduction.total_spread() as f32 / (2 * max) as f32);
        }

        if step.complete {
            info!("party wound down");
            let _ = ctx.audio.play_effect(Effect::Applause, ctx.settings.effect_volume);
            ctx.audio.stop();
            return Transition::To(GameState::idle(ctx.settings, ctx.layout));
        }
        Transition::Stay
    }

    pub(super) fn layers(&mut self) -> Layers<'_> {
        let mut layers = Layers::new();
        layers.push(&mut self.wave);
        layers.push(&mut self.overlay);
        layers.push(&mut self.particles);
        layers.push(&mut self.pyramid);
        layers
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;

    fn entered(h: &mut Harness) -> GameState {
        h.audio.playing = true;
        let mut state = GameState::party(&h.settings, &h.layout);
        state.enter(&ButtonSnapshot::released(10), &mut h.ctx());
        state
    }

    fn party(state: &GameState) -> &PartyState {
        match state {
            GameState::Party(p) => p,
            other => panic!("not party: {other:?}"),
        }
    }

    #[test]
    fn enter_sets_full_volume() {
        let mut h = Harness::new();
        let _state = entered(&mut h);
        assert_eq!(h.audio.volume, 1.0);
    }

    #[test]
    fn track_end_returns_to_idle() {
        let mut h = Harness::new();
        let mut state = entered(&mut h);
        h.audio.playing = false;
        h.now_ms = 20;
        assert!(!h.step(&mut state, &ButtonSnapshot::released(10)).is_stay());
    }

    #[test]
    fn long_hold_then_release_explodes() {
        let mut h = Harness::new();
        let mut state = entered(&mut h);
        h.step(&mut state, &press(10, &[0]));
        let mut t = 0;
        while t < 2500 {
            t += 20;
            h.now_ms = t;
            assert!(h.step(&mut state, &frame(10, &[0], &[0])).is_stay());
        }
        h.now_ms += 20;
        h.step(&mut state, &frame(10, &[0], &[]));
        assert_eq!(h.audio.effects, vec![Effect::Boom]);
    }

    #[test]
    fn centers_do_nothing_during_grace() {
        let mut h = Harness::new();
        let mut state = entered(&mut h);
        let centers = [4, 5];
        h.step(&mut state, &press(10, &centers));
        for k in 1..=100 {
            h.now_ms = k * 20;
            h.step(&mut state, &frame(10, &centers, &centers));
        }
        assert!(!party(&state).is_reducing());
        assert_eq!(party(&state).reduction().total_spread(), 0);
    }

    #[test]
    fn holding_centers_after_grace_ends_party() {
        let mut h = Harness::new();
        let mut state = entered(&mut h);
        let centers = [4, 5];
        h.now_ms = h.settings.party_grace_ms - 20;
        assert!(h.step(&mut state, &ButtonSnapshot::released(10)).is_stay());
        h.now_ms += 20;
        h.step(&mut state, &press(10, &centers));

        let mut ended = false;
        for _ in 0..2000 {
            h.now_ms += 20;
            if let Transition::To(next) = h.step(&mut state, &frame(10, &centers, &centers)) {
                assert_eq!(next.name(), "idle");
                ended = true;
                break;
            }
        }
        assert!(ended);
        assert_eq!(h.audio.effects.last(), Some(&Effect::Applause));
        assert!(!h.audio.playing);
        assert!(h.audio.volume < 1.0);
    }
}
