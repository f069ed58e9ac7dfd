use tracing::{debug, info};

use super::{FailureReason, GameState, Layers, Settings, StateContext, StripLayout, Transition};
use crate::animation::{CodeEntry, CodePyramid};
use crate::audio::EffectChannel;
use crate::snapshot::ButtonSnapshot;
use crate::types::{button_index, Effect, BUTTON_STRIP, PYRAMID_STRIP};

/// Entering a code. Every button pressed while composing must stay down until
/// the code is complete.
pub struct CodeModeState {
    entry: CodeEntry,
    pyramid: CodePyramid,
    composing: Vec<bool>,
    digits: usize,
    cue: Option<Box<dyn EffectChannel>>,
}

impl CodeModeState {
    pub fn new(settings: &Settings, layout: &StripLayout) -> Self {
        Self {
            entry: CodeEntry::new(BUTTON_STRIP, layout.button_pixels(), settings.buttons),
            pyramid: CodePyramid::new(PYRAMID_STRIP, layout.pyramid_map(), settings.code_length),
            composing: vec![false; settings.buttons],
            digits: 0,
            cue: None,
        }
    }

    pub fn digits(&self) -> usize {
        self.digits
    }

    pub(super) fn enter(&mut self, ctx: &mut StateContext<'_>) {
        ctx.tracker.reset();
        self.cue = Some(ctx.audio.play_effect(Effect::Code, ctx.settings.effect_volume));
        ctx.audio.start_special_track();
    }

    pub(super) fn update(
        &mut self,
        snapshot: &ButtonSnapshot,
        ctx: &mut StateContext<'_>,
    ) -> Transition {
        if let Some(button) = snapshot
            .release_edges()
            .find(|&b| self.composing.get(b).copied().unwrap_or(false))
        {
            let digits = self.entered(ctx);
            return self.fail(ctx, FailureReason::ButtonReleased { button }, digits);
        }

        let mut accepted = false;
        for button in snapshot.press_edges() {
            if let Some(slot) = self.composing.get_mut(button) {
                *slot = true;
            }
            self.digits += 1;
            accepted = true;
            let _ = ctx.audio.play_effect(Effect::CodeDigit, ctx.settings.effect_volume);
        }
        if accepted {
            let entered = ctx.tracker.last_n(self.digits).to_owned();
            debug!(code = %entered, "code digit");
            self.entry.set_digits(&entered);
            self.pyramid.set_digits(self.digits);
        }

        let length = ctx.settings.code_length;
        if self.digits >= length {
            let code = ctx.tracker.last_n(length).to_owned();
            if ctx.audio.is_code_valid(&code) {
                info!(%code, "code accepted");
                return Transition::To(GameState::code_reveal(ctx.settings, ctx.layout, code));
            }
            info!(%code, "code rejected");
            let digits = self.entered(ctx);
            return self.fail(ctx, FailureReason::InvalidCode, digits);
        }

        if !ctx.audio.is_playing() {
            let digits = self.entered(ctx);
            return self.fail(ctx, FailureReason::TrackEnded, digits);
        }
        Transition::Stay
    }

    /// Buttons of the digits entered so far, oldest first.
    fn entered(&self, ctx: &StateContext<'_>) -> Vec<usize> {
        ctx.tracker
            .last_n(self.digits)
            .chars()
            .filter_map(button_index)
            .collect()
    }

    fn fail(
        &self,
        ctx: &StateContext<'_>,
        reason: FailureReason,
        digits: Vec<usize>,
    ) -> Transition {
        info!(%reason, "code entry failed");
        Transition::To(GameState::code_fail(ctx.settings, ctx.layout, reason, digits))
    }

    pub(super) fn release_channels(&mut self) {
        self.cue = None;
    }

    pub(super) fn layers(&mut self) -> Layers<'_> {
        let mut layers = Layers::new();
        layers.push(&mut self.entry);
        layers.push(&mut self.pyramid);
        layers
    }
}
