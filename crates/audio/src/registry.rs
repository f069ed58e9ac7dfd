//! Song registry: which tracks exist, which codes open them, and which
//! collections are on rotation at a given time of day.
//!
//! The registry is a JSON file next to the sounds:
//!
//! ```json
//! {
//!   "special_track": "code_mode.mp3",
//!   "tracks": [
//!     { "path": "morning/sunrise.mp3", "collection": "morning", "code": "31415" },
//!     { "path": "spanish/fiesta.mp3", "collection": "spanish" }
//!   ],
//!   "daily": [
//!     { "at": "06:00", "collections": ["morning"] },
//!     { "at": "12:00", "collections": ["morning", "spanish"] }
//!   ],
//!   "special": [
//!     { "start": "2026-12-24T18:00:00", "end": "2026-12-26T23:59:59", "collections": ["spanish"] }
//!   ]
//! }
//! ```
//!
//! All times are local wall-clock times.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("cannot read registry {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed registry: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("daily entry {index} has invalid time {value:?} (expected HH:MM)")]
    BadTime { index: usize, value: String },
    #[error("daily entry {index} does not start after the one before it")]
    ScheduleOrder { index: usize },
    #[error("special entry {index} ends before it starts")]
    SpecialRange { index: usize },
    #[error("schedule references unknown collection {0:?}")]
    UnknownCollection(String),
    #[error("registry lists no tracks")]
    NoTracks,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackEntry {
    /// Path relative to the sounds directory.
    pub path: String,
    pub collection: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyEntry {
    /// `HH:MM`, local time.
    pub at: String,
    pub collections: Vec<String>,
}

/// One-off override, inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialEntry {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub collections: Vec<String>,
}

/// The registry file as written on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_track: Option<String>,
    #[serde(default)]
    pub tracks: Vec<TrackEntry>,
    #[serde(default)]
    pub daily: Vec<DailyEntry>,
    #[serde(default)]
    pub special: Vec<SpecialEntry>,
}

/// Validated registry.
#[derive(Debug, Clone)]
pub struct TrackRegistry {
    code_length: usize,
    special_track: Option<String>,
    codes: BTreeMap<String, String>,
    collections: BTreeMap<String, Vec<String>>,
    daily: Vec<(NaiveTime, BTreeSet<String>)>,
    special: Vec<SpecialEntry>,
}

/// `code_length` ASCII digits, not starting with `0`.
///
/// ```
/// use amplifier_audio::is_well_formed_code;
///
/// assert!(is_well_formed_code("31415", 5));
/// assert!(!is_well_formed_code("01415", 5));
/// assert!(!is_well_formed_code("3141", 5));
/// assert!(!is_well_formed_code("3141a", 5));
/// ```
pub fn is_well_formed_code(code: &str, code_length: usize) -> bool {
    code.len() == code_length
        && code.bytes().all(|b| b.is_ascii_digit())
        && !code.starts_with('0')
}

impl TrackRegistry {
    pub fn load(path: &Path, code_length: usize) -> Result<Self, RegistryError> {
        let text = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self::from_json(&text, code_length)?;
        info!(
            path = %path.display(),
            codes = registry.code_count(),
            collections = registry.collections.len(),
            "track registry loaded"
        );
        Ok(registry)
    }

    pub fn from_json(text: &str, code_length: usize) -> Result<Self, RegistryError> {
        let file: RegistryFile = serde_json::from_str(text)?;
        Self::from_file(file, code_length)
    }

    /// Validate a parsed file.
    ///
    /// Malformed and duplicate codes are logged and skipped; the track itself
    /// stays in its collection. Schedule mistakes are errors.
    pub fn from_file(file: RegistryFile, code_length: usize) -> Result<Self, RegistryError> {
        if file.tracks.is_empty() {
            return Err(RegistryError::NoTracks);
        }

        let mut codes: BTreeMap<String, String> = BTreeMap::new();
        let mut collections: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for track in file.tracks {
            if let Some(code) = track.code.as_deref() {
                if !is_well_formed_code(code, code_length) {
                    warn!(code, path = %track.path, "ignoring malformed code");
                } else if let Some(existing) = codes.get(code) {
                    warn!(code, path = %track.path, existing = %existing, "duplicate code");
                } else {
                    codes.insert(code.to_string(), track.path.clone());
                }
            }
            collections
                .entry(track.collection)
                .or_default()
                .push(track.path);
        }

        let known = |name: &String| -> Result<(), RegistryError> {
            if collections.contains_key(name) {
                Ok(())
            } else {
                Err(RegistryError::UnknownCollection(name.clone()))
            }
        };

        let mut daily: Vec<(NaiveTime, BTreeSet<String>)> = Vec::with_capacity(file.daily.len());
        for (index, entry) in file.daily.into_iter().enumerate() {
            let at = NaiveTime::parse_from_str(entry.at.trim(), "%H:%M").map_err(|_| {
                RegistryError::BadTime {
                    index,
                    value: entry.at.clone(),
                }
            })?;
            if let Some(&(prev, _)) = daily.last() {
                if at <= prev {
                    return Err(RegistryError::ScheduleOrder { index });
                }
            }
            entry.collections.iter().try_for_each(known)?;
            daily.push((at, entry.collections.into_iter().collect()));
        }

        for (index, entry) in file.special.iter().enumerate() {
            if entry.start >= entry.end {
                return Err(RegistryError::SpecialRange { index });
            }
            entry.collections.iter().try_for_each(known)?;
        }

        Ok(Self {
            code_length,
            special_track: file.special_track,
            codes,
            collections,
            daily,
            special: file.special,
        })
    }

    pub fn code_length(&self) -> usize {
        self.code_length
    }

    pub fn code_count(&self) -> usize {
        self.codes.len()
    }

    pub fn track_for_code(&self, code: &str) -> Option<&str> {
        self.codes.get(code).map(String::as_str)
    }

    pub fn is_code_valid(&self, code: &str) -> bool {
        is_well_formed_code(code, self.code_length) && self.codes.contains_key(code)
    }

    /// Music played while a code is being entered.
    pub fn special_track(&self) -> Option<&str> {
        self.special_track.as_deref()
    }

    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    /// Every file the registry refers to, relative to the sounds directory.
    pub fn track_paths(&self) -> impl Iterator<Item = &str> {
        self.collections
            .values()
            .flatten()
            .map(String::as_str)
            .chain(self.special_track.as_deref())
    }

    /// Collections on rotation at `now`.
    ///
    /// A special entry covering `now` wins. Otherwise the latest daily entry
    /// at or before the time of day applies; before the first entry, the first
    /// entry applies. With no daily schedule every collection plays.
    pub fn collections_at(&self, now: NaiveDateTime) -> BTreeSet<String> {
        if let Some(entry) = self
            .special
            .iter()
            .find(|e| e.start <= now && now <= e.end)
        {
            return entry.collections.iter().cloned().collect();
        }

        let time = now.time();
        let active = self
            .daily
            .iter()
            .take_while(|(at, _)| *at <= time)
            .last()
            .or_else(|| self.daily.first());
        match active {
            Some((_, set)) => set.clone(),
            None => self.collections.keys().cloned().collect(),
        }
    }

    /// Tracks of the given collections, in registry order.
    pub fn basket(&self, collections: &BTreeSet<String>) -> Vec<String> {
        collections
            .iter()
            .filter_map(|name| self.collections.get(name))
            .flatten()
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    const SAMPLE: &str = r#"{
        "special_track": "code_mode.mp3",
        "tracks": [
            { "path": "morning/a.mp3", "collection": "morning", "code": "31415" },
            { "path": "morning/b.mp3", "collection": "morning", "code": "01234" },
            { "path": "spanish/c.mp3", "collection": "spanish", "code": "31415" },
            { "path": "spanish/d.mp3", "collection": "spanish", "code": "27182" }
        ],
        "daily": [
            { "at": "06:00", "collections": ["morning"] },
            { "at": "18:30", "collections": ["spanish"] }
        ],
        "special": [
            { "start": "2026-12-24T18:00:00", "end": "2026-12-24T19:00:00", "collections": ["morning", "spanish"] }
        ]
    }"#;

    fn at(day: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 12, day)
            .and_then(|d| d.and_hms_opt(h, m, s))
            .unwrap()
    }

    fn day_minute(h: u32, m: u32) -> NaiveDateTime {
        // Clear of the special window.
        at(1, h, m, 0)
    }

    #[test]
    fn malformed_and_duplicate_codes_are_skipped() {
        let registry = TrackRegistry::from_json(SAMPLE, 5).unwrap();
        assert_eq!(registry.code_count(), 2);
        assert_eq!(registry.track_for_code("31415"), Some("morning/a.mp3"));
        assert!(registry.is_code_valid("27182"));
        assert!(!registry.is_code_valid("01234"));
        assert!(!registry.is_code_valid("00000"));
        assert_eq!(registry.special_track(), Some("code_mode.mp3"));
    }

    #[test]
    fn daily_schedule_picks_latest_entry_at_or_before_now() {
        let registry = TrackRegistry::from_json(SAMPLE, 5).unwrap();
        let morning: BTreeSet<String> = ["morning".to_string()].into();
        let spanish: BTreeSet<String> = ["spanish".to_string()].into();
        assert_eq!(registry.collections_at(day_minute(6, 0)), morning);
        assert_eq!(registry.collections_at(day_minute(18, 29)), morning);
        assert_eq!(registry.collections_at(day_minute(18, 30)), spanish);
        // Before the first entry of the day the first entry still applies.
        assert_eq!(registry.collections_at(day_minute(2, 0)), morning);
    }

    #[test]
    fn special_window_overrides_daily() {
        let registry = TrackRegistry::from_json(SAMPLE, 5).unwrap();
        let both = registry.collections_at(at(24, 18, 0, 0));
        assert_eq!(both.len(), 2);
        assert_eq!(registry.collections_at(at(24, 19, 0, 0)).len(), 2);
        assert_eq!(registry.collections_at(at(24, 19, 0, 1)).len(), 1);
        // Same time of day, different date: the daily schedule applies.
        assert_eq!(registry.collections_at(at(23, 18, 30, 0)).len(), 1);
        assert_eq!(registry.basket(&both).len(), 4);
    }

    #[test]
    fn no_daily_schedule_plays_everything() {
        let text = r#"{ "tracks": [
            { "path": "a.mp3", "collection": "x" },
            { "path": "b.mp3", "collection": "y" }
        ] }"#;
        let registry = TrackRegistry::from_json(text, 5).unwrap();
        assert_eq!(registry.collections_at(at(1, 0, 0, 0)).len(), 2);
        assert_eq!(registry.track_paths().count(), 2);
    }

    #[test]
    fn schedule_mistakes_are_errors() {
        let unordered = r#"{ "tracks": [{ "path": "a.mp3", "collection": "x" }],
            "daily": [{ "at": "10:00", "collections": ["x"] }, { "at": "09:00", "collections": ["x"] }] }"#;
        assert!(matches!(
            TrackRegistry::from_json(unordered, 5),
            Err(RegistryError::ScheduleOrder { index: 1 })
        ));

        let bad_time = r#"{ "tracks": [{ "path": "a.mp3", "collection": "x" }],
            "daily": [{ "at": "25:00", "collections": ["x"] }] }"#;
        assert!(matches!(
            TrackRegistry::from_json(bad_time, 5),
            Err(RegistryError::BadTime { index: 0, .. })
        ));

        let unknown = r#"{ "tracks": [{ "path": "a.mp3", "collection": "x" }],
            "daily": [{ "at": "10:00", "collections": ["nope"] }] }"#;
        assert!(matches!(
            TrackRegistry::from_json(unknown, 5),
            Err(RegistryError::UnknownCollection(name)) if name == "nope"
        ));

        let backwards = r#"{ "tracks": [{ "path": "a.mp3", "collection": "x" }],
            "special": [{ "start": "2026-01-02T00:00:00", "end": "2026-01-01T00:00:00", "collections": ["x"] }] }"#;
        assert!(matches!(
            TrackRegistry::from_json(backwards, 5),
            Err(RegistryError::SpecialRange { index: 0 })
        ));

        assert!(matches!(
            TrackRegistry::from_json("{}", 5),
            Err(RegistryError::NoTracks)
        ));
    }

    #[test]
    fn daily_time_must_be_hours_and_minutes() {
        let seconds = r#"{ "tracks": [{ "path": "a.mp3", "collection": "x" }],
            "daily": [{ "at": "7:5:00", "collections": ["x"] }] }"#;
        assert!(matches!(
            TrackRegistry::from_json(seconds, 5),
            Err(RegistryError::BadTime { index: 0, .. })
        ));

        let registry = TrackRegistry::from_json(SAMPLE, 5).unwrap();
        let evening = registry.collections_at(day_minute(23, 59));
        assert!(evening.contains("spanish"));
    }
}
