use tracing::{info, warn};

use super::{GameState, Layers, Settings, StateContext, StripLayout, Transition};
use crate::animation::{CodeRevealPyramid, CodeRevealSegments};
use crate::audio::EffectChannel;
use crate::types::{Effect, BUTTON_STRIP, PYRAMID_STRIP};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealStage {
    /// Confirmation cue playing.
    Confirm,
    /// Count-in cue playing.
    CountIn,
}

/// A valid code was entered: two cues, then the code's track.
///
/// A cue whose channel never stops being busy keeps the state here.
pub struct CodeRevealState {
    code: String,
    segments: CodeRevealSegments,
    pyramid: CodeRevealPyramid,
    stage: RevealStage,
    channel: Option<Box<dyn EffectChannel>>,
}

impl CodeRevealState {
    pub fn new(settings: &Settings, layout: &StripLayout, code: String) -> Self {
        Self {
            segments: CodeRevealSegments::new(
                BUTTON_STRIP,
                layout.button_pixels(),
                settings.buttons,
                &code,
            ),
            pyramid: CodeRevealPyramid::new(PYRAMID_STRIP, layout.pyramid_map()),
            code,
            stage: RevealStage::Confirm,
            channel: None,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn stage(&self) -> RevealStage {
        self.stage
    }

    pub(super) fn enter(&mut self, ctx: &mut StateContext<'_>) {
        ctx.audio.stop();
        self.channel = Some(ctx.audio.play_effect(Effect::Amazing, ctx.settings.effect_volume));
    }

    pub(super) fn update(&mut self, ctx: &mut StateContext<'_>) -> Transition {
        if self.channel.as_ref().is_some_and(|c| c.is_busy()) {
            return Transition::Stay;
        }
        match self.stage {
            RevealStage::Confirm => {
                self.stage = RevealStage::CountIn;
                self.channel =
                    Some(ctx.audio.play_effect(Effect::OneTwoThree, ctx.settings.effect_volume));
                Transition::Stay
            }
            RevealStage::CountIn => {
                self.channel = None;
                match ctx.audio.resolve_code_to_track(&self.code) {
                    Some(track) if ctx.audio.play_track(&track) => {
                        info!(code = %self.code, track = %track.id, "code track started");
                        Transition::To(GameState::party(ctx.settings, ctx.layout))
                    }
                    Some(track) => {
                        warn!(track = %track.id, "code track failed to start");
                        Transition::To(GameState::idle(ctx.settings, ctx.layout))
                    }
                    None => {
                        warn!(code = %self.code, "no track for code");
                        Transition::To(GameState::idle(ctx.settings, ctx.layout))
                    }
                }
            }
        }
    }

    pub(super) fn release_channels(&mut self) {
        self.channel = None;
    }

    pub(super) fn layers(&mut self) -> Layers<'_> {
        let mut layers = Layers::new();
        layers.push(&mut self.segments);
        layers.push(&mut self.pyramid);
        layers
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;

    fn entered(h: &mut Harness, code: &str) -> GameState {
        let mut state = GameState::code_reveal(&h.settings, &h.layout, code.to_owned());
        state.enter(&crate::snapshot::ButtonSnapshot::released(10), &mut h.ctx());
        state
    }

    fn tick(h: &mut Harness, state: &mut GameState) -> Transition {
        h.now_ms += 20;
        let mut ctx = h.ctx();
        state.update(&crate::snapshot::ButtonSnapshot::released(10), &mut ctx)
    }

    #[test]
    fn waits_for_both_cues_then_parties() {
        let mut h = Harness::new();
        h.audio.valid_codes.push("31415".into());
        h.audio.playing = true;
        h.audio.busy.set(true);
        let mut state = entered(&mut h, "31415");
        assert!(!h.audio.playing);
        assert_eq!(h.audio.effects, vec![Effect::Amazing]);

        assert!(tick(&mut h, &mut state).is_stay());
        h.audio.busy.set(false);
        assert!(tick(&mut h, &mut state).is_stay());
        assert_eq!(h.audio.effects, vec![Effect::Amazing, Effect::OneTwoThree]);

        h.audio.busy.set(true);
        assert!(tick(&mut h, &mut state).is_stay());
        h.audio.busy.set(false);
        match tick(&mut h, &mut state) {
            Transition::To(next) => assert_eq!(next.name(), "party"),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(h.audio.played_tracks, vec!["31415.mp3".to_owned()]);
    }

    #[test]
    fn unresolvable_code_goes_idle() {
        let mut h = Harness::new();
        let mut state = entered(&mut h, "99999");
        assert!(tick(&mut h, &mut state).is_stay());
        match tick(&mut h, &mut state) {
            Transition::To(next) => assert_eq!(next.name(), "idle"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
