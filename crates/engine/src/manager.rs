//! The frame loop.
//!
//! [`GameManager`] owns every collaborator and the single live
//! [`GameState`]. One call to [`GameManager::step`] is one frame:
//!
//! 1. refresh the audio schedule (at most once per interval)
//! 2. sample the buttons through the edge reader
//! 3. update the sequence tracker and the mode gesture detector
//! 4. let the state update, and run exit/enter on a transition
//! 5. advance due animations and flush the strips they repainted
//!
//! [`GameManager::run`] repeats that at the configured frame period until
//! asked to stop, then clears the strips and releases the hardware.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info};

use crate::config::{AppConfig, ConfigError};
use crate::core::{
    advance_and_render, Audio, ButtonReader, ButtonSampler, ButtonSnapshot, Clock, GameState,
    SequenceDetector, SequenceTracker, Settings, SimpleRng, StateContext, StripLayout, Transition,
};
use crate::gate::IntervalGate;
use crate::types::{LedStrip, Pixel, StripError, StripId, SEQUENCE_MAX_LENGTH};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("reader has {actual} buttons, config expects {expected}")]
    ButtonCount { expected: usize, actual: usize },
    #[error("strip {index} has {actual} pixels, config expects {expected}")]
    StripSize {
        index: usize,
        expected: usize,
        actual: usize,
    },
    #[error("{actual} strips attached, config describes {expected}")]
    StripCount { expected: usize, actual: usize },
    #[error("strip error: {0}")]
    Strip(#[from] StripError),
}

/// What happened during one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameReport {
    pub frame: u64,
    /// Name of the state live at the end of the frame.
    pub state: &'static str,
    pub transitioned: bool,
    pub flushed: Vec<StripId>,
    /// Buttons as the states saw them.
    pub pressed: Vec<bool>,
}

macro_rules! context {
    ($m:expr, $now:expr) => {
        StateContext {
            audio: &mut $m.audio,
            tracker: &mut $m.tracker,
            settings: &$m.settings,
            layout: &$m.layout,
            rng: &mut $m.rng,
            now_ms: $now,
        }
    };
}

pub struct GameManager<S: ButtonSampler, A: Audio, C: Clock> {
    reader: ButtonReader<S>,
    strips: Vec<Box<dyn LedStrip>>,
    audio: A,
    clock: C,
    settings: Settings,
    layout: StripLayout,
    tracker: SequenceTracker,
    detector: SequenceDetector,
    state: GameState,
    rng: SimpleRng,
    schedule: IntervalGate,
    frame_period: Duration,
    frames: u64,
    stopped: bool,
}

impl<S: ButtonSampler, A: Audio, C: Clock> GameManager<S, A, C> {
    /// Check the collaborators against `config` and enter Idle.
    pub fn new(
        config: &AppConfig,
        reader: ButtonReader<S>,
        strips: Vec<Box<dyn LedStrip>>,
        audio: A,
        clock: C,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        if reader.button_count() != config.button_count() {
            return Err(EngineError::ButtonCount {
                expected: config.button_count(),
                actual: reader.button_count(),
            });
        }
        if strips.len() != config.strips.len() {
            return Err(EngineError::StripCount {
                expected: config.strips.len(),
                actual: strips.len(),
            });
        }
        for (index, (strip, expected)) in strips.iter().zip(&config.strips).enumerate() {
            if strip.pixel_count() != expected.pixels {
                return Err(EngineError::StripSize {
                    index,
                    expected: expected.pixels,
                    actual: strip.pixel_count(),
                });
            }
        }

        let settings = config.settings();
        let layout = config.layout();
        let detector = SequenceDetector::repeated(
            settings.mode_button,
            config.gesture.presses,
            settings.sequence_timeout_ms,
        );
        let state = GameState::idle(&settings, &layout);
        let buttons = settings.buttons;

        let mut manager = Self {
            reader,
            strips,
            audio,
            clock,
            settings,
            layout,
            tracker: SequenceTracker::new(SEQUENCE_MAX_LENGTH),
            detector,
            state,
            rng: SimpleRng::new(config.seed),
            schedule: IntervalGate::new(config.timing.schedule_interval_ms),
            frame_period: Duration::from_millis(config.timing.frame_ms),
            frames: 0,
            stopped: false,
        };

        let now = manager.clock.now_ms();
        let idle = ButtonSnapshot::released(buttons);
        manager.state.enter(&idle, &mut context!(manager, now));
        info!(
            buttons,
            strips = manager.strips.len(),
            frame_ms = config.timing.frame_ms,
            "game manager ready"
        );
        Ok(manager)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_name(&self) -> &'static str {
        self.state.name()
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn reader(&self) -> &ButtonReader<S> {
        &self.reader
    }

    pub fn tracker(&self) -> &SequenceTracker {
        &self.tracker
    }

    pub fn detector(&self) -> &SequenceDetector {
        &self.detector
    }

    pub fn strips(&self) -> &[Box<dyn LedStrip>] {
        &self.strips
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn frame_period(&self) -> Duration {
        self.frame_period
    }

    /// One frame. Never sleeps.
    pub fn step(&mut self) -> Result<FrameReport, EngineError> {
        let now = self.clock.now_ms();
        if self.schedule.ready(now) {
            self.audio.update_schedule(self.clock.wall_time());
        }

        let snapshot = self.reader.read();
        let presses = self.tracker.update(&snapshot, now);
        let mut gesture = false;
        for button in snapshot.press_edges() {
            gesture |= self.detector.observe(button, now);
        }
        if presses > 0 {
            debug!(
                sequence = self.tracker.sequence(),
                gesture = self.detector.progress(),
                "button sequence"
            );
        }
        if self.tracker.is_timed_out(
            now,
            self.settings.sequence_timeout_ms,
            snapshot.pressed_count(),
        ) {
            debug!(sequence = self.tracker.sequence(), "sequence timed out");
            self.tracker.reset();
        }

        let transitioned = if gesture {
            info!(button = self.settings.mode_button, "mode gesture");
            self.tracker.reset();
            let next = GameState::code_mode(&self.settings, &self.layout);
            self.transition(next, &snapshot, now);
            true
        } else {
            let outcome = self.state.update(&snapshot, &mut context!(self, now));
            match outcome {
                Transition::Stay => false,
                Transition::To(next) => {
                    self.transition(next, &snapshot, now);
                    true
                }
            }
        };

        let dirty = {
            let mut layers = self.state.layers();
            advance_and_render(&mut layers, &mut self.strips, now, &mut self.rng)?
        };
        let mut flushed = Vec::new();
        for (id, strip) in self.strips.iter_mut().enumerate() {
            if dirty.get(id).copied().unwrap_or(false) {
                strip.flush()?;
                flushed.push(id);
            }
        }

        self.frames += 1;
        Ok(FrameReport {
            frame: self.frames,
            state: self.state.name(),
            transitioned,
            flushed,
            pressed: snapshot.current().to_vec(),
        })
    }

    fn transition(&mut self, mut next: GameState, snapshot: &ButtonSnapshot, now: u64) {
        let policy = self.state.exit(&next, &mut context!(self, now));
        std::mem::swap(&mut self.state, &mut next);
        let previous = next;
        if policy.masks() {
            self.reader.ignore_pressed_until_released();
        }
        self.state.enter(snapshot, &mut context!(self, now));
        info!(
            from = previous.name(),
            to = self.state.name(),
            reason = ?self.state.failure_reason(),
            "state transition"
        );
    }

    /// Frames at the configured period until `stop` is set, then [`shutdown`].
    ///
    /// [`shutdown`]: Self::shutdown
    pub fn run(&mut self, stop: &AtomicBool) -> Result<(), EngineError> {
        self.run_with(stop, |_| Ok::<(), EngineError>(()))
    }

    /// Like [`run`](Self::run), calling `on_frame` after every frame.
    ///
    /// An error from a frame or from `on_frame` ends the loop; the strips are
    /// still cleared on the way out.
    pub fn run_with<F, E>(&mut self, stop: &AtomicBool, mut on_frame: F) -> Result<(), E>
    where
        F: FnMut(&FrameReport) -> Result<(), E>,
        E: From<EngineError>,
    {
        info!(frame_ms = self.frame_period.as_millis() as u64, "frame loop started");
        let result = loop {
            if stop.load(Ordering::SeqCst) {
                break Ok(());
            }
            let started = Instant::now();
            let report = match self.step() {
                Ok(report) => report,
                Err(err) => break Err(E::from(err)),
            };
            if let Err(err) = on_frame(&report) {
                break Err(err);
            }
            if let Some(rest) = self.frame_period.checked_sub(started.elapsed()) {
                std::thread::sleep(rest);
            }
        };
        let cleared = self.shutdown().map_err(E::from);
        result.and(cleared)
    }

    /// Stop the music, blank and flush every strip, release the buttons.
    ///
    /// Later calls do nothing.
    pub fn shutdown(&mut self) -> Result<(), EngineError> {
        if self.stopped {
            return Ok(());
        }
        self.stopped = true;
        self.audio.stop();
        for strip in &mut self.strips {
            strip.fill(Pixel::BLACK)?;
            strip.flush()?;
        }
        self.reader.teardown();
        info!(frames = self.frames, "game manager stopped");
        Ok(())
    }
}
