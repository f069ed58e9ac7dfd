//! Terminal preview of the LED strips.
//!
//! Without hardware attached, strips are [`PreviewStrip`]s held in memory.
//! Each frame the binary copies their flushed pixels into a [`FrameBuffer`]
//! through [`StripPreview`] and hands it to [`TerminalRenderer`], which only
//! rewrites the cells that changed.

pub mod fb;
pub mod preview;
pub mod renderer;
pub mod strip;

pub use amplifier_types as types;

pub use fb::{Cell, FrameBuffer};
pub use preview::{downsample, PreviewStatus, StripPreview};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
pub use strip::{PreviewStrip, StripView};
