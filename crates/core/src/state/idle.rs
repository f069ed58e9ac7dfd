use tracing::debug;

use super::{GameState, Layers, Settings, StateContext, StripLayout, Transition};
use crate::animation::{Breathing, SnakeTrail};
use crate::color::DIM_BLUE;
use crate::snapshot::ButtonSnapshot;
use crate::types::{button_char, BUTTON_STRIP, PYRAMID_STRIP};

/// Waiting for someone to touch a button.
pub struct IdleState {
    snake: SnakeTrail,
    breathing: Breathing,
    gesture: String,
}

impl IdleState {
    pub fn new(settings: &Settings, layout: &StripLayout) -> Self {
        let gesture: String = button_char(settings.mode_button)
            .map(|c| std::iter::repeat(c).take(settings.gesture_presses).collect())
            .unwrap_or_default();
        Self {
            snake: SnakeTrail::new(BUTTON_STRIP, layout.button_pixels()),
            breathing: Breathing::new(PYRAMID_STRIP, DIM_BLUE, 0.1, 0.6),
            gesture,
        }
    }

    pub(super) fn enter(&mut self, ctx: &mut StateContext<'_>) {
        ctx.audio.load_next_track();
    }

    pub(super) fn update(
        &mut self,
        snapshot: &ButtonSnapshot,
        ctx: &mut StateContext<'_>,
    ) -> Transition {
        if !self.gesture.is_empty() && ctx.tracker.sequence() == self.gesture {
            debug!(sequence = %self.gesture, "mode gesture");
            ctx.tracker.reset();
            return Transition::To(GameState::code_mode(ctx.settings, ctx.layout));
        }
        if snapshot.pressed_count() > 0 {
            return Transition::To(GameState::amplify(ctx.settings, ctx.layout));
        }
        Transition::Stay
    }

    pub(super) fn layers(&mut self) -> Layers<'_> {
        let mut layers = Layers::new();
        layers.push(&mut self.snake);
        layers.push(&mut self.breathing);
        layers
    }
}
