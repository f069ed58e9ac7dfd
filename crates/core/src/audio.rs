//! Audio collaborator contract.
//!
//! The engine never decodes or schedules audio itself; it drives whatever
//! implements [`Audio`] and only reads back booleans and track identifiers.

use chrono::NaiveDateTime;

use crate::types::Effect;

/// Opaque reference to a playable track.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackRef {
    pub id: String,
}

impl TrackRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Handle to a playing sound effect. Dropping it does not stop the sound.
pub trait EffectChannel {
    fn is_busy(&self) -> bool;
}

pub trait Audio {
    /// Pick and preload the next music track.
    fn load_next_track(&mut self);

    /// Start the preloaded track.
    fn start(&mut self);

    fn stop(&mut self);

    fn is_playing(&self) -> bool;

    /// Music volume in `0.0..=1.0`.
    fn set_volume(&mut self, volume: f32);

    fn play_effect(&mut self, effect: Effect, volume: f32) -> Box<dyn EffectChannel>;

    /// Start the music that accompanies code entry.
    fn start_special_track(&mut self);

    fn is_code_valid(&self, code: &str) -> bool;

    fn resolve_code_to_track(&self, code: &str) -> Option<TrackRef>;

    /// Stop whatever plays and start `track` at full volume.
    fn play_track(&mut self, track: &TrackRef) -> bool;

    /// Refresh time-of-day driven song selection. `now` is local wall time.
    fn update_schedule(&mut self, now: NaiveDateTime);
}
