use super::{FailureReason, GameState, Layers, Settings, StateContext, StripLayout, Transition};
use crate::animation::{Animation, PhasePlan, PhasedPattern, ReleasedBlink};
use crate::audio::EffectChannel;
use crate::types::{BUTTON_STRIP, PYRAMID_STRIP};

enum ButtonVisual {
    Pattern(PhasedPattern),
    Released(ReleasedBlink),
}

/// Code entry failed: red pattern plus the reason's cue, then back to idle.
pub struct CodeFailState {
    reason: FailureReason,
    buttons: ButtonVisual,
    pyramid: PhasedPattern,
    channel: Option<Box<dyn EffectChannel>>,
}

impl CodeFailState {
    pub fn new(
        settings: &Settings,
        layout: &StripLayout,
        reason: FailureReason,
        digits: Vec<usize>,
    ) -> Self {
        let buttons = match reason {
            FailureReason::ButtonReleased { button } => ButtonVisual::Released(ReleasedBlink::new(
                BUTTON_STRIP,
                layout.button_pixels(),
                settings.buttons,
                digits,
                button,
            )),
            _ => ButtonVisual::Pattern(PhasedPattern::new(BUTTON_STRIP, PhasePlan::failure())),
        };
        Self {
            reason,
            buttons,
            pyramid: PhasedPattern::new(PYRAMID_STRIP, PhasePlan::failure()),
            channel: None,
        }
    }

    pub fn reason(&self) -> FailureReason {
        self.reason
    }

    pub(super) fn enter(&mut self, ctx: &mut StateContext<'_>) {
        ctx.audio.stop();
        self.channel = Some(
            ctx.audio
                .play_effect(self.reason.effect(), ctx.settings.effect_volume),
        );
    }

    pub(super) fn update(&mut self, ctx: &mut StateContext<'_>) -> Transition {
        if self.channel.as_ref().is_some_and(|c| c.is_busy()) {
            return Transition::Stay;
        }
        Transition::To(GameState::idle(ctx.settings, ctx.layout))
    }

    pub(super) fn release_channels(&mut self) {
        self.channel = None;
    }

    pub(super) fn layers(&mut self) -> Layers<'_> {
        let mut layers = Layers::new();
        let buttons: &mut dyn Animation = match &mut self.buttons {
            ButtonVisual::Pattern(p) => p,
            ButtonVisual::Released(r) => r,
        };
        layers.push(buttons);
        layers.push(&mut self.pyramid);
        layers
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use crate::snapshot::ButtonSnapshot;
    use crate::types::Effect;

    #[test]
    fn plays_reason_cue_then_idles() {
        let mut h = Harness::new();
        h.audio.playing = true;
        h.audio.busy.set(true);
        let mut state = GameState::code_fail(
            &h.settings,
            &h.layout,
            FailureReason::ButtonReleased { button: 3 },
            vec![3, 1],
        );
        state.enter(&ButtonSnapshot::released(10), &mut h.ctx());
        assert!(!h.audio.playing);
        assert_eq!(h.audio.effects, vec![Effect::Fail2]);

        assert!(h.step(&mut state, &ButtonSnapshot::released(10)).is_stay());
        h.audio.busy.set(false);
        match h.step(&mut state, &ButtonSnapshot::released(10)) {
            Transition::To(next) => assert_eq!(next.name(), "idle"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn released_visual_only_for_released_reason() {
        let h = Harness::new();
        let mut released = CodeFailState::new(
            &h.settings,
            &h.layout,
            FailureReason::ButtonReleased { button: 2 },
            vec![2],
        );
        let mut invalid =
            CodeFailState::new(&h.settings, &h.layout, FailureReason::InvalidCode, vec![]);
        assert_eq!(released.layers()[0].name(), "released_blink");
        assert_eq!(invalid.layers()[0].name(), "phased_pattern");
    }
}
