//! Human Amplifier (workspace facade crate).
//!
//! Re-exports the member crates under one name so the binary, integration
//! tests and benches can write `human_amplifier::core::...` and friends.
//! The implementation lives in dedicated crates under `crates/`.

pub use amplifier_audio as audio;
pub use amplifier_core as core;
pub use amplifier_engine as engine;
pub use amplifier_input as input;
pub use amplifier_term as term;
pub use amplifier_types as types;
