//! Interactive control core - pure, deterministic, and testable
//!
//! This crate holds the installation's behaviour: reading button edges,
//! recognising press sequences, the six-state machine, and the animations each
//! state paints. It performs no I/O of its own. Strips, button lines and audio
//! arrive through traits, time arrives as plain milliseconds, and animation
//! noise comes from a seeded [`SimpleRng`], so the same inputs always produce
//! the same frames.
//!
//! # Module Structure
//!
//! - [`snapshot`]: per-frame button state with edge detection
//! - [`sampler`] / [`reader`]: raw line sampling and the ignore-until-released mask
//! - [`sequence`] / [`detector`]: rolling press log and fixed-gesture matcher
//! - [`clock`] / [`rng`]: injected time and deterministic noise
//! - [`color`] / [`height`]: palette, HSV and pyramid height buckets
//! - [`animation`]: time-gated renderers bound to one strip each
//! - [`hold`] / [`reduction`] / [`volume`]: party and amplify mechanics
//! - [`audio`]: the contract the audio collaborator fulfils
//! - [`state`]: the state machine itself
//!
//! # Frame Order
//!
//! 1. Sample buttons into a [`ButtonSnapshot`]
//! 2. Feed press edges to the [`SequenceTracker`] and [`SequenceDetector`]
//! 3. Let the live [`GameState`] update and maybe request a transition
//! 4. On transition: exit, mask held buttons, enter
//! 5. Advance due animations, repaint and flush only the strips that moved
//!
//! # Example
//!
//! ```
//! use amplifier_core::{ButtonSnapshot, SequenceTracker};
//!
//! let snapshot = ButtonSnapshot::new(
//!     vec![false, true, false],
//!     vec![false, false, false],
//! );
//! assert_eq!(snapshot.pressed_count(), 1);
//! assert!(snapshot.was_pressed(1));
//!
//! let mut tracker = SequenceTracker::new(4);
//! tracker.update(&snapshot, 0);
//! assert_eq!(tracker.sequence(), "1");
//! ```

pub mod animation;
pub mod audio;
pub mod clock;
pub mod color;
pub mod detector;
pub mod height;
pub mod hold;
pub mod reader;
pub mod reduction;
pub mod rng;
pub mod sampler;
pub mod sequence;
pub mod snapshot;
pub mod state;
pub mod volume;

pub use amplifier_types as types;

pub use animation::{advance_and_render, Animation, Cadence};
pub use audio::{Audio, EffectChannel, TrackRef};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use detector::SequenceDetector;
pub use height::HeightMap;
pub use hold::{HoldClassifier, HoldEvent, HoldTimings};
pub use reader::ButtonReader;
pub use reduction::{Reduction, ReductionStep};
pub use rng::SimpleRng;
pub use sampler::{ButtonSampler, HardwareError};
pub use sequence::SequenceTracker;
pub use snapshot::{ButtonSnapshot, SnapshotError};
pub use state::{
    ExitPolicy, FailureReason, GameState, Settings, StateContext, StripLayout, Transition,
};
pub use volume::{amplify_volume, reduction_volume};
