//! The installation's state machine.
//!
//! Exactly one [`GameState`] is live. The manager feeds it one
//! [`ButtonSnapshot`] per frame through [`GameState::update`], which answers
//! with a [`Transition`]. On a transition the manager runs the old state's
//! [`GameState::exit`], drops it, and runs the new state's
//! [`GameState::enter`]. States never hold a reference back to the manager;
//! everything they touch arrives in a [`StateContext`].
//!
//! | State | Leaves for |
//! |-------|------------|
//! | Idle | Amplify on any press, CodeMode on the mode gesture |
//! | Amplify | Party when all buttons are down, Idle when none are or the track ends |
//! | Party | Idle when the track ends or the reduction completes |
//! | CodeMode | CodeReveal on a valid code, CodeFail otherwise |
//! | CodeReveal | Party once the cues finish and the track starts, Idle if it cannot |
//! | CodeFail | Idle once the failure cue finishes |

mod amplify;
mod code;
mod fail;
mod idle;
mod party;
mod reveal;

use std::fmt;
use std::sync::Arc;

use arrayvec::ArrayVec;

use crate::animation::{Animation, MAX_LAYERS};
use crate::audio::Audio;
use crate::height::HeightMap;
use crate::hold::HoldTimings;
use crate::rng::SimpleRng;
use crate::sequence::SequenceTracker;
use crate::snapshot::ButtonSnapshot;
use crate::types::{
    Effect, StripId, BUTTON_COUNT, BUTTON_STRIP, CODE_LENGTH, MODE_BUTTON, PARTY_GRACE_MS,
    PYRAMID_STRIP, SEQUENCE_TIMEOUT_MS, SPREAD_STEP_MS,
};

pub use amplify::AmplifyState;
pub use code::CodeModeState;
pub use fail::CodeFailState;
pub use idle::IdleState;
pub use party::PartyState;
pub use reveal::{CodeRevealState, RevealStage};

/// Behaviour knobs shared by every state.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub buttons: usize,
    /// Button whose triple press enters code mode.
    pub mode_button: usize,
    /// Presses of the mode button that make up the gesture.
    pub gesture_presses: usize,
    pub code_length: usize,
    pub sequence_timeout_ms: u64,
    /// Time in party before the reduction can start.
    pub party_grace_ms: u64,
    pub spread_step_ms: u64,
    pub hold: HoldTimings,
    pub effect_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            buttons: BUTTON_COUNT,
            mode_button: MODE_BUTTON,
            gesture_presses: 3,
            code_length: CODE_LENGTH,
            sequence_timeout_ms: SEQUENCE_TIMEOUT_MS,
            party_grace_ms: PARTY_GRACE_MS,
            spread_step_ms: SPREAD_STEP_MS,
            hold: HoldTimings::default(),
            effect_volume: 1.0,
        }
    }
}

/// Pixel counts of the attached strips plus the pyramid's height layout.
#[derive(Debug, Clone, PartialEq)]
pub struct StripLayout {
    pub pixel_counts: Vec<usize>,
    pub height_map: Option<Arc<HeightMap>>,
}

impl StripLayout {
    pub fn new(pixel_counts: Vec<usize>) -> Self {
        Self {
            pixel_counts,
            height_map: None,
        }
    }

    pub fn with_height_map(mut self, map: HeightMap) -> Self {
        self.height_map = Some(Arc::new(map));
        self
    }

    /// Zero for a strip that is not attached.
    pub fn pixel_count(&self, strip: StripId) -> usize {
        self.pixel_counts.get(strip).copied().unwrap_or(0)
    }

    pub fn button_pixels(&self) -> usize {
        self.pixel_count(BUTTON_STRIP)
    }

    pub fn pyramid_pixels(&self) -> usize {
        self.pixel_count(PYRAMID_STRIP)
    }

    /// The configured map, or a bottom-to-top linear one.
    pub fn pyramid_map(&self) -> Arc<HeightMap> {
        match &self.height_map {
            Some(map) => Arc::clone(map),
            None => Arc::new(HeightMap::linear(self.pyramid_pixels())),
        }
    }

    pub fn leds_per_button(&self, buttons: usize) -> usize {
        self.button_pixels() / buttons.max(1)
    }
}

/// Everything a state may touch during one call.
pub struct StateContext<'a> {
    pub audio: &'a mut dyn Audio,
    pub tracker: &'a mut SequenceTracker,
    pub settings: &'a Settings,
    pub layout: &'a StripLayout,
    pub rng: &'a mut SimpleRng,
    pub now_ms: u64,
}

pub enum Transition {
    Stay,
    To(GameState),
}

impl Transition {
    pub fn is_stay(&self) -> bool {
        matches!(self, Transition::Stay)
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Stay => f.write_str("Stay"),
            Transition::To(state) => write!(f, "To({})", state.name()),
        }
    }
}

/// Whether buttons still held across a transition are masked until released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitPolicy {
    MaskHeldButtons,
    KeepInputs,
}

impl ExitPolicy {
    pub fn masks(self) -> bool {
        self == ExitPolicy::MaskHeldButtons
    }
}

/// Why code entry failed. Each reason has its own cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    InvalidCode,
    ButtonReleased { button: usize },
    TrackEnded,
}

impl FailureReason {
    pub fn effect(&self) -> Effect {
        match self {
            FailureReason::InvalidCode => Effect::Fail1,
            FailureReason::ButtonReleased { .. } => Effect::Fail2,
            FailureReason::TrackEnded => Effect::Fail3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::InvalidCode => "invalid code",
            FailureReason::ButtonReleased { .. } => "button released",
            FailureReason::TrackEnded => "track ended",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::ButtonReleased { button } => write!(f, "button released ({button})"),
            other => f.write_str(other.as_str()),
        }
    }
}

pub type Layers<'a> = ArrayVec<&'a mut dyn Animation, MAX_LAYERS>;

pub enum GameState {
    Idle(IdleState),
    Amplify(AmplifyState),
    Party(PartyState),
    CodeMode(CodeModeState),
    CodeReveal(CodeRevealState),
    CodeFail(CodeFailState),
}

impl GameState {
    pub fn idle(settings: &Settings, layout: &StripLayout) -> Self {
        GameState::Idle(IdleState::new(settings, layout))
    }

    pub fn amplify(settings: &Settings, layout: &StripLayout) -> Self {
        GameState::Amplify(AmplifyState::new(settings, layout))
    }

    pub fn party(settings: &Settings, layout: &StripLayout) -> Self {
        GameState::Party(PartyState::new(settings, layout))
    }

    pub fn code_mode(settings: &Settings, layout: &StripLayout) -> Self {
        GameState::CodeMode(CodeModeState::new(settings, layout))
    }

    pub fn code_reveal(settings: &Settings, layout: &StripLayout, code: String) -> Self {
        GameState::CodeReveal(CodeRevealState::new(settings, layout, code))
    }

    pub fn code_fail(
        settings: &Settings,
        layout: &StripLayout,
        reason: FailureReason,
        digits: Vec<usize>,
    ) -> Self {
        GameState::CodeFail(CodeFailState::new(settings, layout, reason, digits))
    }

    pub fn name(&self) -> &'static str {
        match self {
            GameState::Idle(_) => "idle",
            GameState::Amplify(_) => "amplify",
            GameState::Party(_) => "party",
            GameState::CodeMode(_) => "code_mode",
            GameState::CodeReveal(_) => "code_reveal",
            GameState::CodeFail(_) => "code_fail",
        }
    }

    pub fn failure_reason(&self) -> Option<FailureReason> {
        match self {
            GameState::CodeFail(s) => Some(s.reason()),
            _ => None,
        }
    }

    pub fn enter(&mut self, snapshot: &ButtonSnapshot, ctx: &mut StateContext<'_>) {
        match self {
            GameState::Idle(s) => s.enter(ctx),
            GameState::Amplify(s) => s.enter(snapshot, ctx),
            GameState::Party(s) => s.enter(ctx),
            GameState::CodeMode(s) => s.enter(ctx),
            GameState::CodeReveal(s) => s.enter(ctx),
            GameState::CodeFail(s) => s.enter(ctx),
        }
    }

    pub fn update(&mut self, snapshot: &ButtonSnapshot, ctx: &mut StateContext<'_>) -> Transition {
        match self {
            GameState::Idle(s) => s.update(snapshot, ctx),
            GameState::Amplify(s) => s.update(snapshot, ctx),
            GameState::Party(s) => s.update(snapshot, ctx),
            GameState::CodeMode(s) => s.update(snapshot, ctx),
            GameState::CodeReveal(s) => s.update(ctx),
            GameState::CodeFail(s) => s.update(ctx),
        }
    }

    /// Release audio handles. Animations go with the state itself.
    pub fn exit(&mut self, next: &GameState, _ctx: &mut StateContext<'_>) -> ExitPolicy {
        match self {
            // The button that left idle is the first one amplify should hear.
            GameState::Idle(_) if matches!(next, GameState::Amplify(_)) => ExitPolicy::KeepInputs,
            GameState::Idle(_) | GameState::Amplify(_) | GameState::Party(_) => {
                ExitPolicy::MaskHeldButtons
            }
            GameState::CodeMode(s) => {
                s.release_channels();
                ExitPolicy::MaskHeldButtons
            }
            GameState::CodeReveal(s) => {
                s.release_channels();
                ExitPolicy::MaskHeldButtons
            }
            GameState::CodeFail(s) => {
                s.release_channels();
                ExitPolicy::MaskHeldButtons
            }
        }
    }

    /// Animations in paint order, base layers first.
    pub fn layers(&mut self) -> Layers<'_> {
        match self {
            GameState::Idle(s) => s.layers(),
            GameState::Amplify(s) => s.layers(),
            GameState::Party(s) => s.layers(),
            GameState::CodeMode(s) => s.layers(),
            GameState::CodeReveal(s) => s.layers(),
            GameState::CodeFail(s) => s.layers(),
        }
    }
}

impl fmt::Debug for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[test]
    fn failure_reasons_have_distinct_cues() {
        let reasons = [
            FailureReason::InvalidCode,
            FailureReason::ButtonReleased { button: 3 },
            FailureReason::TrackEnded,
        ];
        let mut effects: Vec<Effect> = reasons.iter().map(FailureReason::effect).collect();
        effects.dedup();
        assert_eq!(effects.len(), 3);
        assert_eq!(reasons[1].as_str(), "button released");
        assert_eq!(reasons[1].to_string(), "button released (3)");
    }

    #[test]
    fn idle_to_amplify_keeps_inputs() {
        let mut h = Harness::new();
        let mut idle = GameState::idle(&h.settings, &h.layout);
        let amplify = GameState::amplify(&h.settings, &h.layout);
        let party = GameState::party(&h.settings, &h.layout);
        let mut ctx = h.ctx();
        assert_eq!(idle.exit(&amplify, &mut ctx), ExitPolicy::KeepInputs);
        assert_eq!(idle.exit(&party, &mut ctx), ExitPolicy::MaskHeldButtons);
    }

    #[test]
    fn every_state_paints_both_strips() {
        let h = Harness::new();
        let s = &h.settings;
        let l = &h.layout;
        let mut states = vec![
            GameState::idle(s, l),
            GameState::amplify(s, l),
            GameState::party(s, l),
            GameState::code_mode(s, l),
            GameState::code_reveal(s, l, "31415".into()),
            GameState::code_fail(s, l, FailureReason::InvalidCode, vec![]),
            GameState::code_fail(s, l, FailureReason::ButtonReleased { button: 2 }, vec![2]),
        ];
        for state in &mut states {
            let name = state.name();
            let strips: Vec<StripId> = state.layers().iter().map(|a| a.strip()).collect();
            assert!(strips.contains(&BUTTON_STRIP), "{name} misses the button strip");
            assert!(strips.contains(&PYRAMID_STRIP), "{name} misses the pyramid");
        }
    }

    #[test]
    fn layout_falls_back_to_linear_map() {
        let layout = StripLayout::new(vec![300, 120]);
        assert_eq!(layout.pyramid_map().pixel_count(), 120);
        assert_eq!(layout.leds_per_button(10), 30);
        assert_eq!(StripLayout::new(vec![300]).pyramid_pixels(), 0);
    }
}
