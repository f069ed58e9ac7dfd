//! Audio side of the installation.
//!
//! - [`registry`]: song codes, collections and the time-of-day schedule
//! - [`catalog`]: startup checks that every sound file is in place
//! - [`mock`]: a clock-driven [`Audio`](amplifier_core::Audio) that plays nothing
//!
//! # Example
//!
//! ```
//! use amplifier_audio::{MockAudio, TrackRegistry};
//! use amplifier_core::{Audio, ManualClock};
//!
//! let registry = TrackRegistry::from_json(
//!     r#"{ "tracks": [{ "path": "a.mp3", "collection": "all", "code": "31415" }] }"#,
//!     5,
//! )
//! .unwrap();
//! let mut audio = MockAudio::new(ManualClock::new(0)).with_registry(registry);
//! assert!(audio.is_code_valid("31415"));
//!
//! audio.load_next_track();
//! audio.start();
//! assert!(audio.is_playing());
//! ```

pub mod catalog;
pub mod mock;
pub mod registry;

pub use amplifier_core as core;
pub use amplifier_types as types;

pub use catalog::{AssetError, EffectCatalog};
pub use mock::{default_effect_ms, AudioEvent, AudioJournal, MockAudio, DEFAULT_TRACK_MS};
pub use registry::{
    is_well_formed_code, DailyEntry, RegistryError, RegistryFile, SpecialEntry, TrackEntry,
    TrackRegistry,
};
