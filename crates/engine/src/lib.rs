//! Wiring and the frame loop.
//!
//! - [`config`]: the JSON installation config and its validation
//! - [`manager`]: [`GameManager`], which owns the collaborators and runs frames
//! - [`gate`]: once-per-interval work such as the audio schedule refresh
//! - [`shutdown`]: the stop flag shared with signal handlers

pub mod config;
pub mod gate;
pub mod manager;
pub mod shutdown;

pub use amplifier_core as core;
pub use amplifier_types as types;

pub use config::{
    AppConfig, AudioConfig, ButtonsConfig, CodeConfig, ConfigError, GestureConfig, HeightLayout,
    HoldConfig, PartyConfig, StripConfig, StripRole, TimingConfig,
};
pub use gate::IntervalGate;
pub use manager::{EngineError, FrameReport, GameManager};
pub use shutdown::ShutdownSignal;
