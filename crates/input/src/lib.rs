//! Button samplers that stand in for the GPIO lines.
//!
//! This crate is independent of any UI framework. It provides two
//! [`ButtonSampler`](crate::core::ButtonSampler) implementations:
//!
//! - [`KeyboardSampler`]: `crossterm` key presses toggle buttons, for running
//!   the installation at a desk
//! - [`ScriptedSampler`]: lines set programmatically through a
//!   [`ScriptHandle`], for tests, benches and headless soak runs

pub mod keyboard;
pub mod map;
pub mod scripted;

pub use amplifier_core as core;
pub use amplifier_types as types;

pub use keyboard::KeyboardSampler;
pub use map::{key_to_button, should_quit};
pub use scripted::{ScriptHandle, ScriptedSampler};
