use tracing::{debug, info};

use super::{GameState, Layers, Settings, StateContext, StripLayout, Transition};
use crate::animation::{AmplifySegments, HeightFill};
use crate::snapshot::ButtonSnapshot;
use crate::types::{Effect, BUTTON_STRIP, PYRAMID_STRIP};
use crate::volume::amplify_volume;

/// Music plays louder the more buttons are held.
pub struct AmplifyState {
    segments: AmplifySegments,
    fill: HeightFill,
}

impl AmplifyState {
    pub fn new(settings: &Settings, layout: &StripLayout) -> Self {
        Self {
            segments: AmplifySegments::new(BUTTON_STRIP, layout.button_pixels(), settings.buttons),
            fill: HeightFill::new(PYRAMID_STRIP, layout.pyramid_map(), settings.buttons),
        }
    }

    pub(super) fn enter(&mut self, snapshot: &ButtonSnapshot, ctx: &mut StateContext<'_>) {
        ctx.audio.start();
        self.follow(snapshot, ctx);
    }

    pub(super) fn update(
        &mut self,
        snapshot: &ButtonSnapshot,
        ctx: &mut StateContext<'_>,
    ) -> Transition {
        if snapshot.all_pressed() {
            info!("all buttons pressed");
            // The handle is dropped; the cue keeps playing into party.
            let _ = ctx.audio.play_effect(Effect::Win, ctx.settings.effect_volume);
            return Transition::To(GameState::party(ctx.settings, ctx.layout));
        }
        if !ctx.audio.is_playing() {
            debug!("track finished");
            return Transition::To(GameState::idle(ctx.settings, ctx.layout));
        }
        if snapshot.pressed_count() == 0 {
            return Transition::To(GameState::idle(ctx.settings, ctx.layout));
        }
        if snapshot.any_changed() {
            self.follow(snapshot, ctx);
        }
        Transition::Stay
    }

    fn follow(&mut self, snapshot: &ButtonSnapshot, ctx: &mut StateContext<'_>) {
        let pressed = snapshot.pressed_count();
        let volume = amplify_volume(pressed, ctx.settings.buttons);
        debug!(pressed, volume, "amplify");
        ctx.audio.set_volume(volume);
        self.segments.set_pressed(snapshot.current());
        self.fill.set_pressed_count(pressed);
    }

    pub(super) fn layers(&mut self) -> Layers<'_> {
        let mut layers = Layers::new();
        layers.push(&mut self.segments);
        layers.push(&mut self.fill);
        layers
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;

    fn entered(h: &mut Harness, held: &[usize]) -> GameState {
        let mut state = GameState::amplify(&h.settings, &h.layout);
        state.enter(&press(10, held), &mut h.ctx());
        state
    }

    #[test]
    fn enter_starts_track_at_pressed_volume() {
        let mut h = Harness::new();
        let _state = entered(&mut h, &[1]);
        assert!(h.audio.playing);
        assert!((h.audio.volume - amplify_volume(1, 10)).abs() < 1e-6);
    }

    #[test]
    fn volume_follows_presses() {
        let mut h = Harness::new();
        let mut state = entered(&mut h, &[1]);
        assert!(h.step(&mut state, &frame(10, &[1], &[1, 2, 3])).is_stay());
        assert!((h.audio.volume - amplify_volume(3, 10)).abs() < 1e-6);
    }

    #[test]
    fn all_pressed_plays_win_once_and_parties() {
        let mut h = Harness::new();
        let mut state = entered(&mut h, &[0]);
        let all: Vec<usize> = (0..10).collect();
        match h.step(&mut state, &frame(10, &[0], &all)) {
            Transition::To(next) => assert_eq!(next.name(), "party"),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(h.audio.effects, vec![Effect::Win]);
    }

    #[test]
    fn release_all_returns_to_idle() {
        let mut h = Harness::new();
        let mut state = entered(&mut h, &[5]);
        match h.step(&mut state, &frame(10, &[5], &[])) {
            Transition::To(next) => assert_eq!(next.name(), "idle"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn track_end_returns_to_idle() {
        let mut h = Harness::new();
        let mut state = entered(&mut h, &[5]);
        h.audio.playing = false;
        match h.step(&mut state, &frame(10, &[5], &[5])) {
            Transition::To(next) => assert_eq!(next.name(), "idle"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
