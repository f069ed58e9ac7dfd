//! Simulated audio for development machines and tests.
//!
//! Nothing is decoded or played. A "track" is a timer of fixed length started
//! against the injected [`Clock`], and an effect channel is busy until its
//! simulated length has passed. Every call is appended to an [`AudioJournal`]
//! so tests can assert on what the engine asked for.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::core::{Audio, Clock, EffectChannel, SimpleRng, TrackRef};
use crate::registry::TrackRegistry;
use crate::types::Effect;

/// Simulated track length.
pub const DEFAULT_TRACK_MS: u64 = 120_000;

/// Rough lengths of the real effect recordings.
pub fn default_effect_ms(effect: Effect) -> u64 {
    match effect {
        Effect::Win => 3_000,
        Effect::Code => 1_500,
        Effect::CodeDigit => 300,
        Effect::OneTwoThree => 2_500,
        Effect::Quiet => 500,
        Effect::Boom => 1_200,
        Effect::Applause => 4_000,
        Effect::Amazing => 2_000,
        Effect::Fail1 | Effect::Fail2 | Effect::Fail3 | Effect::Fail4 => 1_500,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AudioEvent {
    Loaded(String),
    Started(String),
    Stopped,
    Volume(f32),
    Effect(Effect, f32),
    SpecialTrack(String),
    TrackPlayed(String),
    Collections(Vec<String>),
}

/// Shared, append-only log of audio calls.
#[derive(Debug, Clone, Default)]
pub struct AudioJournal {
    events: Arc<Mutex<Vec<AudioEvent>>>,
}

impl AudioJournal {
    fn push(&self, event: AudioEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    pub fn events(&self) -> Vec<AudioEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn effects(&self) -> Vec<Effect> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                AudioEvent::Effect(effect, _) => Some(effect),
                _ => None,
            })
            .collect()
    }

    pub fn count_effect(&self, effect: Effect) -> usize {
        self.effects().into_iter().filter(|&e| e == effect).count()
    }

    pub fn last_volume(&self) -> Option<f32> {
        self.events().into_iter().rev().find_map(|e| match e {
            AudioEvent::Volume(v) => Some(v),
            _ => None,
        })
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

struct MockChannel<C> {
    clock: C,
    ends_ms: u64,
}

impl<C: Clock> EffectChannel for MockChannel<C> {
    fn is_busy(&self) -> bool {
        self.clock.now_ms() < self.ends_ms
    }
}

pub struct MockAudio<C: Clock + Clone + 'static> {
    clock: C,
    registry: Option<TrackRegistry>,
    rng: SimpleRng,
    journal: AudioJournal,
    track_ms: u64,
    effect_ms: HashMap<Effect, u64>,
    collections: BTreeSet<String>,
    basket: Vec<String>,
    loaded: Option<String>,
    playing: Option<(String, u64)>,
    volume: f32,
}

impl<C: Clock + Clone + 'static> MockAudio<C> {
    /// Audio with no registry: every code is invalid and tracks are anonymous.
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            registry: None,
            rng: SimpleRng::new(1),
            journal: AudioJournal::default(),
            track_ms: DEFAULT_TRACK_MS,
            effect_ms: Effect::ALL
                .iter()
                .map(|&e| (e, default_effect_ms(e)))
                .collect(),
            collections: BTreeSet::new(),
            basket: Vec::new(),
            loaded: None,
            playing: None,
            volume: 1.0,
        }
    }

    pub fn with_registry(mut self, registry: TrackRegistry) -> Self {
        self.registry = Some(registry);
        let now = self.clock.wall_time();
        self.refresh_collections(now);
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.rng = SimpleRng::new(seed);
        self
    }

    pub fn with_track_ms(mut self, track_ms: u64) -> Self {
        self.track_ms = track_ms;
        self
    }

    pub fn with_effect_ms(mut self, effect: Effect, ms: u64) -> Self {
        self.effect_ms.insert(effect, ms);
        self
    }

    /// Give every effect the same length.
    pub fn with_uniform_effect_ms(mut self, ms: u64) -> Self {
        for value in self.effect_ms.values_mut() {
            *value = ms;
        }
        self
    }

    pub fn journal(&self) -> AudioJournal {
        self.journal.clone()
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn current_track(&self) -> Option<&str> {
        self.playing.as_ref().map(|(name, _)| name.as_str())
    }

    pub fn collections(&self) -> &BTreeSet<String> {
        &self.collections
    }

    fn begin(&mut self, name: String) {
        self.playing = Some((name, self.clock.now_ms()));
    }

    fn refresh_collections(&mut self, now: NaiveDateTime) {
        let Some(registry) = &self.registry else {
            return;
        };
        let next = registry.collections_at(now);
        if next == self.collections {
            return;
        }
        self.basket = registry.basket(&next);
        info!(
            collections = ?next,
            songs = self.basket.len(),
            "collections updated"
        );
        self.journal
            .push(AudioEvent::Collections(next.iter().cloned().collect()));
        self.collections = next;
    }
}

impl<C: Clock + Clone + 'static> Audio for MockAudio<C> {
    fn load_next_track(&mut self) {
        let next = match self.rng.pick(&self.basket) {
            Some(track) => track.clone(),
            None => "mock-track".to_string(),
        };
        debug!(track = %next, "track loaded");
        self.journal.push(AudioEvent::Loaded(next.clone()));
        self.loaded = Some(next);
    }

    fn start(&mut self) {
        let Some(track) = self.loaded.clone() else {
            warn!("start requested with no track loaded");
            return;
        };
        info!(track = %track, "playback started");
        self.journal.push(AudioEvent::Started(track.clone()));
        self.begin(track);
    }

    fn stop(&mut self) {
        if self.playing.take().is_some() {
            debug!("playback stopped");
        }
        self.journal.push(AudioEvent::Stopped);
    }

    fn is_playing(&self) -> bool {
        match &self.playing {
            Some((_, started)) => self.clock.now_ms().saturating_sub(*started) < self.track_ms,
            None => false,
        }
    }

    fn set_volume(&mut self, volume: f32) {
        let volume = volume.clamp(0.0, 1.0);
        if (volume - self.volume).abs() > f32::EPSILON {
            self.journal.push(AudioEvent::Volume(volume));
        }
        self.volume = volume;
    }

    fn play_effect(&mut self, effect: Effect, volume: f32) -> Box<dyn EffectChannel> {
        let length = self
            .effect_ms
            .get(&effect)
            .copied()
            .unwrap_or_else(|| default_effect_ms(effect));
        debug!(effect = effect.as_str(), volume, "effect");
        self.journal.push(AudioEvent::Effect(effect, volume));
        Box::new(MockChannel {
            clock: self.clock.clone(),
            ends_ms: self.clock.now_ms().saturating_add(length),
        })
    }

    fn start_special_track(&mut self) {
        let name = self
            .registry
            .as_ref()
            .and_then(TrackRegistry::special_track)
            .unwrap_or("special-track")
            .to_string();
        info!(track = %name, "special track started");
        self.journal.push(AudioEvent::SpecialTrack(name.clone()));
        self.volume = 1.0;
        self.begin(name);
    }

    fn is_code_valid(&self, code: &str) -> bool {
        self.registry
            .as_ref()
            .is_some_and(|registry| registry.is_code_valid(code))
    }

    fn resolve_code_to_track(&self, code: &str) -> Option<TrackRef> {
        self.registry
            .as_ref()?
            .track_for_code(code)
            .map(TrackRef::new)
    }

    fn play_track(&mut self, track: &TrackRef) -> bool {
        info!(track = %track.id, "playing track by code");
        self.journal.push(AudioEvent::TrackPlayed(track.id.clone()));
        self.volume = 1.0;
        self.begin(track.id.clone());
        true
    }

    fn update_schedule(&mut self, now: NaiveDateTime) {
        self.refresh_collections(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ManualClock;

    const REGISTRY: &str = r#"{
        "special_track": "code_mode.mp3",
        "tracks": [
            { "path": "day/a.mp3", "collection": "day", "code": "31415" },
            { "path": "night/b.mp3", "collection": "night" }
        ],
        "daily": [
            { "at": "06:00", "collections": ["day"] },
            { "at": "20:00", "collections": ["night"] }
        ]
    }"#;

    fn registry() -> TrackRegistry {
        TrackRegistry::from_json(REGISTRY, 5).unwrap()
    }

    fn hours(h: u64) -> u64 {
        h * 3_600_000
    }

    #[test]
    fn track_plays_for_its_simulated_length() {
        let clock = ManualClock::new(0);
        let mut audio = MockAudio::new(clock.clone()).with_track_ms(1_000);
        assert!(!audio.is_playing());
        audio.load_next_track();
        audio.start();
        assert!(audio.is_playing());
        clock.advance(999);
        assert!(audio.is_playing());
        clock.advance(1);
        assert!(!audio.is_playing());
    }

    #[test]
    fn effect_channel_is_busy_until_its_length_passes() {
        let clock = ManualClock::new(0);
        let mut audio = MockAudio::new(clock.clone()).with_effect_ms(Effect::Win, 500);
        let channel = audio.play_effect(Effect::Win, 0.8);
        assert!(channel.is_busy());
        clock.advance(500);
        assert!(!channel.is_busy());
        assert_eq!(audio.journal().count_effect(Effect::Win), 1);
    }

    #[test]
    fn codes_resolve_through_the_registry() {
        let audio = MockAudio::new(ManualClock::new(hours(7))).with_registry(registry());
        assert!(audio.is_code_valid("31415"));
        assert!(!audio.is_code_valid("00000"));
        assert_eq!(
            audio.resolve_code_to_track("31415"),
            Some(TrackRef::new("day/a.mp3"))
        );
        assert_eq!(audio.resolve_code_to_track("27182"), None);

        let bare = MockAudio::new(ManualClock::new(0));
        assert!(!bare.is_code_valid("31415"));
    }

    #[test]
    fn schedule_switches_the_basket() {
        let clock = ManualClock::new(hours(7));
        let mut audio = MockAudio::new(clock.clone()).with_registry(registry());
        audio.load_next_track();
        audio.start();
        assert_eq!(audio.current_track(), Some("day/a.mp3"));

        clock.set(hours(21));
        audio.update_schedule(clock.wall_time());
        assert!(audio.collections().contains("night"));
        audio.load_next_track();
        audio.start();
        assert_eq!(audio.current_track(), Some("night/b.mp3"));
    }

    #[test]
    fn journal_records_volume_changes_only() {
        let mut audio = MockAudio::new(ManualClock::new(0));
        let journal = audio.journal();
        audio.set_volume(1.0);
        audio.set_volume(0.25);
        audio.set_volume(0.25);
        audio.set_volume(3.0);
        assert_eq!(journal.last_volume(), Some(1.0));
        let volumes = journal
            .events()
            .into_iter()
            .filter(|e| matches!(e, AudioEvent::Volume(_)))
            .count();
        assert_eq!(volumes, 2);
    }

    #[test]
    fn special_and_code_tracks_restart_playback() {
        let clock = ManualClock::new(hours(7));
        let mut audio = MockAudio::new(clock.clone()).with_registry(registry());
        audio.start_special_track();
        assert_eq!(audio.current_track(), Some("code_mode.mp3"));
        audio.stop();
        assert!(!audio.is_playing());
        assert!(audio.play_track(&TrackRef::new("day/a.mp3")));
        assert!(audio.is_playing());
        assert_eq!(audio.volume(), 1.0);
    }
}
