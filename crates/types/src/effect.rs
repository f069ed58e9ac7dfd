//! Sound effect identifiers.

use std::str::FromStr;

use thiserror::Error;

/// Short sound cues played over (or instead of) the music track.
///
/// - **Win**: every button pressed, party starts
/// - **Code** / **CodeDigit**: code mode entry and each accepted digit
/// - **OneTwoThree**, **Amazing**: code reveal cues
/// - **Quiet**: reserved for a muted confirmation
/// - **Boom**: a charged hold released in party
/// - **Applause**: party ended by the reduction gesture
/// - **Fail1..Fail4**: failure cues, one per failure reason
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    Win,
    Code,
    CodeDigit,
    OneTwoThree,
    Quiet,
    Boom,
    Applause,
    Amazing,
    Fail1,
    Fail2,
    Fail3,
    Fail4,
}

impl Effect {
    pub const ALL: [Effect; 12] = [
        Effect::Win,
        Effect::Code,
        Effect::CodeDigit,
        Effect::OneTwoThree,
        Effect::Quiet,
        Effect::Boom,
        Effect::Applause,
        Effect::Amazing,
        Effect::Fail1,
        Effect::Fail2,
        Effect::Fail3,
        Effect::Fail4,
    ];

    /// Asset file name inside the sounds directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            Effect::Win => "win.mp3",
            Effect::Code => "code.mp3",
            Effect::CodeDigit => "codeDigit.mp3",
            Effect::OneTwoThree => "one_two_three.mp3",
            Effect::Quiet => "quite.mp3",
            Effect::Boom => "boom.mp3",
            Effect::Applause => "applauseLoud.mp3",
            Effect::Amazing => "amazingLoud.mp3",
            Effect::Fail1 => "fail1.mp3",
            Effect::Fail2 => "fail2.mp3",
            Effect::Fail3 => "fail3.mp3",
            Effect::Fail4 => "fail4.mp3",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Effect::Win => "win",
            Effect::Code => "code",
            Effect::CodeDigit => "code_digit",
            Effect::OneTwoThree => "one_two_three",
            Effect::Quiet => "quiet",
            Effect::Boom => "boom",
            Effect::Applause => "applause",
            Effect::Amazing => "amazing",
            Effect::Fail1 => "fail1",
            Effect::Fail2 => "fail2",
            Effect::Fail3 => "fail3",
            Effect::Fail4 => "fail4",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sound effect {0:?}")]
pub struct UnknownEffect(pub String);

/// Parse from a snake_case name (case-insensitive).
///
/// ```
/// use amplifier_types::Effect;
///
/// assert_eq!("one_two_three".parse(), Ok(Effect::OneTwoThree));
/// assert_eq!("FAIL2".parse(), Ok(Effect::Fail2));
/// assert!("unknown".parse::<Effect>().is_err());
/// ```
impl FromStr for Effect {
    type Err = UnknownEffect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Effect::ALL
            .into_iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownEffect(s.to_string()))
    }
}
