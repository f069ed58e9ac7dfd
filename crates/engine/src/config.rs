//! Installation configuration.
//!
//! Loaded from JSON. Every field has a default, so a config file only needs
//! the keys it changes. [`AppConfig::validate`] runs before anything touches
//! hardware; a config that fails it never starts the engine.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{HeightMap, HoldTimings, Settings, StripLayout};
use crate::types::{
    button_char, CODE_LENGTH, FRAME_MS, HOLD_CHARGE_DELAY_MS, HOLD_CHARGE_SPAN_MS,
    HOLD_STREAM_DELAY_MS, HOLD_STREAM_INTERVAL_MS, MODE_BUTTON, PARTY_GRACE_MS,
    SCHEDULE_INTERVAL_MS, SEQUENCE_MAX_LENGTH, SEQUENCE_TIMEOUT_MS, SPREAD_STEP_MS,
    STRIP_PIXELS,
};

/// Usable GPIO lines on the controller board.
pub const GPIO_PINS: std::ops::RangeInclusive<u8> = 2..=27;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("at least one button pin must be configured")]
    NoButtons,
    #[error("{0} buttons configured, at most 36 are addressable")]
    TooManyButtons(usize),
    #[error("at least one LED strip must be configured")]
    NoStrips,
    #[error("frame duration must be positive")]
    ZeroFrame,
    #[error("GPIO pin {0} out of valid range (2-27)")]
    PinOutOfRange(u8),
    #[error("GPIO pin {0} assigned more than once")]
    DuplicatePin(u8),
    #[error("GPIO pin {0} used by both a button and a strip")]
    PinConflict(u8),
    #[error("strip {0} has no pixels")]
    EmptyStrip(usize),
    #[error("strip {index} brightness {value} is outside 0-255")]
    Brightness { index: usize, value: u16 },
    #[error("strip roles: {0}")]
    StripRoles(&'static str),
    #[error("strip {index} height layout covers {actual} pixels, strip has {expected}")]
    LayoutMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },
    #[error("button strip has {pixels} pixels, fewer than the {buttons} buttons")]
    TooFewPixels { pixels: usize, buttons: usize },
    #[error("mode button {button} does not exist ({buttons} buttons)")]
    ModeButton { button: usize, buttons: usize },
    #[error("mode gesture needs 1 to {max} presses, got {value}")]
    GesturePresses { value: usize, max: usize },
    #[error("code length must be 1 to {max} digits, got {value}")]
    CodeLength { value: usize, max: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonsConfig {
    /// One GPIO line per button, in button order.
    pub pins: Vec<u8>,
}

impl Default for ButtonsConfig {
    fn default() -> Self {
        Self {
            pins: vec![4, 5, 6, 16, 17, 20, 22, 23, 24, 25],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StripRole {
    /// The linear strip under the buttons.
    Buttons,
    Pyramid,
}

/// How the pixels of a strip map to height.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HeightLayout {
    #[default]
    Linear,
    /// Rows of pixels, bottom row first.
    Rows { rows: Vec<usize> },
    /// Explicit pixel lists per height bucket, bottom first.
    Buckets { buckets: Vec<Vec<usize>> },
}

impl HeightLayout {
    fn covered(&self, pixels: usize) -> usize {
        match self {
            HeightLayout::Linear => pixels,
            HeightLayout::Rows { rows } => rows.iter().sum(),
            HeightLayout::Buckets { .. } => pixels,
        }
    }

    pub fn height_map(&self, pixels: usize) -> HeightMap {
        match self {
            HeightLayout::Linear => HeightMap::linear(pixels),
            HeightLayout::Rows { rows } => HeightMap::pyramid(rows),
            HeightLayout::Buckets { buckets } => HeightMap::from_buckets(buckets.clone(), pixels),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StripConfig {
    pub pin: u8,
    pub pixels: usize,
    #[serde(default = "default_brightness")]
    pub brightness: u16,
    pub role: StripRole,
    #[serde(default)]
    pub layout: HeightLayout,
}

fn default_brightness() -> u16 {
    26
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub frame_ms: u64,
    pub sequence_timeout_ms: u64,
    /// Minimum gap between audio schedule refreshes.
    pub schedule_interval_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            frame_ms: FRAME_MS,
            sequence_timeout_ms: SEQUENCE_TIMEOUT_MS,
            schedule_interval_ms: SCHEDULE_INTERVAL_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub mode_button: usize,
    pub presses: usize,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            mode_button: MODE_BUTTON,
            presses: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeConfig {
    pub length: usize,
}

impl Default for CodeConfig {
    fn default() -> Self {
        Self {
            length: CODE_LENGTH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoldConfig {
    pub stream_delay_ms: u64,
    pub stream_interval_ms: u64,
    pub charge_delay_ms: u64,
    pub charge_span_ms: u64,
}

impl Default for HoldConfig {
    fn default() -> Self {
        Self {
            stream_delay_ms: HOLD_STREAM_DELAY_MS,
            stream_interval_ms: HOLD_STREAM_INTERVAL_MS,
            charge_delay_ms: HOLD_CHARGE_DELAY_MS,
            charge_span_ms: HOLD_CHARGE_SPAN_MS,
        }
    }
}

impl From<HoldConfig> for HoldTimings {
    fn from(c: HoldConfig) -> Self {
        Self {
            stream_delay_ms: c.stream_delay_ms,
            stream_interval_ms: c.stream_interval_ms,
            charge_delay_ms: c.charge_delay_ms,
            charge_span_ms: c.charge_span_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartyConfig {
    /// Party time before the reduction gesture unlocks.
    pub grace_ms: u64,
    pub spread_step_ms: u64,
    pub hold: HoldConfig,
}

impl Default for PartyConfig {
    fn default() -> Self {
        Self {
            grace_ms: PARTY_GRACE_MS,
            spread_step_ms: SPREAD_STEP_MS,
            hold: HoldConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub sounds_dir: PathBuf,
    /// Track registry; without one every code is rejected.
    pub registry: Option<PathBuf>,
    /// Simulated track length for the mock backend.
    pub track_ms: u64,
    /// Fail startup when a sound file is missing.
    pub verify_assets: bool,
    pub effect_volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sounds_dir: PathBuf::from("sounds"),
            registry: None,
            track_ms: 120_000,
            verify_assets: false,
            effect_volume: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub buttons: ButtonsConfig,
    pub strips: Vec<StripConfig>,
    pub timing: TimingConfig,
    pub gesture: GestureConfig,
    pub code: CodeConfig,
    pub party: PartyConfig,
    pub audio: AudioConfig,
    /// Seed for animation noise and track shuffling.
    pub seed: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            buttons: ButtonsConfig::default(),
            strips: vec![
                StripConfig {
                    pin: 18,
                    pixels: STRIP_PIXELS,
                    brightness: default_brightness(),
                    role: StripRole::Buttons,
                    layout: HeightLayout::Linear,
                },
                StripConfig {
                    pin: 21,
                    pixels: STRIP_PIXELS,
                    brightness: default_brightness(),
                    role: StripRole::Pyramid,
                    layout: HeightLayout::Linear,
                },
            ],
            timing: TimingConfig::default(),
            gesture: GestureConfig::default(),
            code: CodeConfig::default(),
            party: PartyConfig::default(),
            audio: AudioConfig::default(),
            seed: 1,
        }
    }
}

impl AppConfig {
    /// Read, parse and validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn button_count(&self) -> usize {
        self.buttons.pins.len()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let buttons = self.button_count();
        if buttons == 0 {
            return Err(ConfigError::NoButtons);
        }
        if button_char(buttons - 1).is_none() {
            return Err(ConfigError::TooManyButtons(buttons));
        }
        if self.strips.is_empty() {
            return Err(ConfigError::NoStrips);
        }
        if self.timing.frame_ms == 0 {
            return Err(ConfigError::ZeroFrame);
        }

        let mut button_pins = HashSet::new();
        for &pin in &self.buttons.pins {
            if !GPIO_PINS.contains(&pin) {
                return Err(ConfigError::PinOutOfRange(pin));
            }
            if !button_pins.insert(pin) {
                return Err(ConfigError::DuplicatePin(pin));
            }
        }
        let mut strip_pins = HashSet::new();
        for strip in &self.strips {
            if !GPIO_PINS.contains(&strip.pin) {
                return Err(ConfigError::PinOutOfRange(strip.pin));
            }
            if button_pins.contains(&strip.pin) {
                return Err(ConfigError::PinConflict(strip.pin));
            }
            if !strip_pins.insert(strip.pin) {
                return Err(ConfigError::DuplicatePin(strip.pin));
            }
        }

        for (index, strip) in self.strips.iter().enumerate() {
            if strip.pixels == 0 {
                return Err(ConfigError::EmptyStrip(index));
            }
            if strip.brightness > 255 {
                return Err(ConfigError::Brightness {
                    index,
                    value: strip.brightness,
                });
            }
            let covered = strip.layout.covered(strip.pixels);
            if covered != strip.pixels {
                return Err(ConfigError::LayoutMismatch {
                    index,
                    expected: strip.pixels,
                    actual: covered,
                });
            }
        }

        // Strip 0 sits under the buttons, strip 1 (if any) is the pyramid.
        if self.strips[0].role != StripRole::Buttons {
            return Err(ConfigError::StripRoles("the first strip must be the button strip"));
        }
        if self.strips.len() > 2 {
            return Err(ConfigError::StripRoles("at most two strips are supported"));
        }
        if self.strips.get(1).is_some_and(|s| s.role != StripRole::Pyramid) {
            return Err(ConfigError::StripRoles("the second strip must be the pyramid"));
        }
        if self.strips[0].pixels < buttons {
            return Err(ConfigError::TooFewPixels {
                pixels: self.strips[0].pixels,
                buttons,
            });
        }

        if self.gesture.mode_button >= buttons {
            return Err(ConfigError::ModeButton {
                button: self.gesture.mode_button,
                buttons,
            });
        }
        // Both are read back from the press tracker, which keeps SEQUENCE_MAX_LENGTH presses.
        let max = SEQUENCE_MAX_LENGTH;
        if !(1..=max).contains(&self.gesture.presses) {
            return Err(ConfigError::GesturePresses {
                value: self.gesture.presses,
                max,
            });
        }
        if !(1..=max).contains(&self.code.length) {
            return Err(ConfigError::CodeLength {
                value: self.code.length,
                max,
            });
        }
        Ok(())
    }

    /// Behaviour knobs handed to the states.
    pub fn settings(&self) -> Settings {
        Settings {
            buttons: self.button_count(),
            mode_button: self.gesture.mode_button,
            gesture_presses: self.gesture.presses,
            code_length: self.code.length,
            sequence_timeout_ms: self.timing.sequence_timeout_ms,
            party_grace_ms: self.party.grace_ms,
            spread_step_ms: self.party.spread_step_ms,
            hold: self.party.hold.into(),
            effect_volume: self.audio.effect_volume.clamp(0.0, 1.0),
        }
    }

    pub fn layout(&self) -> StripLayout {
        let layout = StripLayout::new(self.strips.iter().map(|s| s.pixels).collect());
        match self.strips.iter().find(|s| s.role == StripRole::Pyramid) {
            Some(pyramid) => layout.with_height_map(pyramid.layout.height_map(pyramid.pixels)),
            None => layout,
        }
    }
}
