//! Shared types and constants for the installation.
//!
//! Everything here is plain data with no I/O, so it can be used by the core
//! state machine, the terminal preview, the audio layer and tests alike.
//!
//! # Installation Layout
//!
//! The production installation is a row of ten buttons above one linear LED
//! strip (each button owns an equal segment of it) and a pyramid-shaped strip
//! whose pixels are addressed by height rather than by index:
//!
//! - **Buttons**: 10 (indexed 0-9, shown as characters `'0'..='9'`)
//! - **Button strip**: 300 pixels, 30 per button
//! - **Pyramid strip**: 300 pixels, mapped to 100 height buckets
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `FRAME_MS` | 20 | Target frame period |
//! | `SEQUENCE_TIMEOUT_MS` | 1500 | Gesture window and tracker reset timeout |
//! | `SCHEDULE_INTERVAL_MS` | 60000 | Minimum gap between audio schedule refreshes |
//! | `PARTY_GRACE_MS` | 15000 | Party time before reduction unlocks |
//! | `SPREAD_STEP_MS` | 50 | One pixel of reduction spread per step |
//! | `HOLD_STREAM_DELAY_MS` | 300 | Hold time before stream events begin |
//! | `HOLD_STREAM_INTERVAL_MS` | 150 | Period of stream events |
//! | `HOLD_CHARGE_DELAY_MS` | 2000 | Hold time before charging begins |
//! | `HOLD_CHARGE_SPAN_MS` | 3000 | Time for the charge level to go from 0 to 1 |
//!
//! # Examples
//!
//! ```
//! use amplifier_types::{button_char, button_index, Effect, Pixel};
//!
//! assert_eq!(button_char(3), Some('3'));
//! assert_eq!(button_char(11), Some('B'));
//! assert_eq!(button_index('B'), Some(11));
//!
//! let red = Pixel::new(255, 0, 0);
//! assert_eq!(red.r(), 255);
//! assert_eq!(red.g(), 0);
//!
//! assert_eq!("win".parse(), Ok(Effect::Win));
//! assert_eq!(Effect::Win.file_name(), "win.mp3");
//! ```

pub mod effect;
pub mod pixel;
pub mod strip;

pub use effect::{Effect, UnknownEffect};
pub use pixel::Pixel;
pub use strip::{apply_assignment, Colors, LedStrip, PixelBuffer, Position, StripError, StripId};

/// Number of buttons on the production installation.
pub const BUTTON_COUNT: usize = 10;

/// Pixels on each production strip.
pub const STRIP_PIXELS: usize = 300;

/// Strip index of the linear strip under the buttons.
pub const BUTTON_STRIP: StripId = 0;

/// Strip index of the pyramid strip, when one is installed.
pub const PYRAMID_STRIP: StripId = 1;

/// Number of height buckets a pyramid strip is divided into.
pub const HEIGHT_BUCKETS: usize = 100;

/// Target frame period (20ms = 50 frames per second).
pub const FRAME_MS: u64 = 20;

/// Gesture window and tracker reset timeout.
pub const SEQUENCE_TIMEOUT_MS: u64 = 1500;

/// Audio schedule refresh interval (once per minute).
pub const SCHEDULE_INTERVAL_MS: u64 = 60_000;

/// Party time before the reduction feature unlocks.
pub const PARTY_GRACE_MS: u64 = 15_000;

/// Reduction spread advances one pixel per step.
pub const SPREAD_STEP_MS: u64 = 50;

/// Hold time before a held button starts streaming.
pub const HOLD_STREAM_DELAY_MS: u64 = 300;

/// Period between stream events.
pub const HOLD_STREAM_INTERVAL_MS: u64 = 150;

/// Hold time before a held button starts charging.
pub const HOLD_CHARGE_DELAY_MS: u64 = 2000;

/// Time for a charge to ramp from empty to full.
pub const HOLD_CHARGE_SPAN_MS: u64 = 3000;

/// Button pressed three times in a row to enter code mode.
pub const MODE_BUTTON: usize = 7;

/// Digits in a production song code.
pub const CODE_LENGTH: usize = 5;

/// Characters kept by the sequence tracker.
pub const SEQUENCE_MAX_LENGTH: usize = 10;

/// Character shown for a button index.
///
/// Indices 0-9 are digits, 10 and above continue with `'A'`, `'B'`, ...
/// Returns `None` past `'Z'`.
pub fn button_char(index: usize) -> Option<char> {
    match index {
        0..=9 => char::from_digit(index as u32, 10),
        10..=35 => char::from_u32('A' as u32 + (index as u32 - 10)),
        _ => None,
    }
}

/// Inverse of [`button_char`].
pub fn button_index(ch: char) -> Option<usize> {
    match ch {
        '0'..='9' => ch.to_digit(10).map(|d| d as usize),
        'A'..='Z' => Some(ch as usize - 'A' as usize + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_timing_defaults() {
        assert_eq!(FRAME_MS, 20);
        assert_eq!(SEQUENCE_TIMEOUT_MS, 1500);
        assert_eq!(PARTY_GRACE_MS, 15_000);
        assert_eq!(SPREAD_STEP_MS, 50);
        assert_eq!(HOLD_STREAM_DELAY_MS, 300);
        assert_eq!(HOLD_STREAM_INTERVAL_MS, 150);
        assert_eq!(HOLD_CHARGE_DELAY_MS, 2000);
        assert_eq!(HOLD_CHARGE_SPAN_MS, 3000);
    }

    #[test]
    fn button_chars_cover_digits_then_letters() {
        assert_eq!(button_char(0), Some('0'));
        assert_eq!(button_char(9), Some('9'));
        assert_eq!(button_char(10), Some('A'));
        assert_eq!(button_char(35), Some('Z'));
        assert_eq!(button_char(36), None);
    }

    #[test]
    fn button_index_inverts_button_char() {
        for i in 0..36 {
            let ch = button_char(i).unwrap();
            assert_eq!(button_index(ch), Some(i));
        }
        assert_eq!(button_index('a'), None);
        assert_eq!(button_index('#'), None);
    }
}
