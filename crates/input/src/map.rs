//! Key mapping from terminal events to buttons.

use crate::types::button_index;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map a key to the button it toggles.
///
/// Digits map to buttons 0-9 and letters continue from 10 (`a`/`A` is 10).
/// Quit keys never map to a button.
pub fn key_to_button(key: KeyEvent) -> Option<usize> {
    if should_quit(key) {
        return None;
    }
    match key.code {
        KeyCode::Char(ch) if ch.is_ascii_alphanumeric() => button_index(ch.to_ascii_uppercase()),
        _ => None,
    }
}

/// Check if key should stop the installation.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn test_digit_keys() {
        assert_eq!(key_to_button(KeyEvent::from(KeyCode::Char('0'))), Some(0));
        assert_eq!(key_to_button(KeyEvent::from(KeyCode::Char('7'))), Some(7));
        assert_eq!(key_to_button(KeyEvent::from(KeyCode::Char('9'))), Some(9));
    }

    #[test]
    fn test_letter_keys() {
        assert_eq!(key_to_button(KeyEvent::from(KeyCode::Char('a'))), Some(10));
        assert_eq!(key_to_button(KeyEvent::from(KeyCode::Char('B'))), Some(11));
    }

    #[test]
    fn test_unmapped_keys() {
        assert_eq!(key_to_button(KeyEvent::from(KeyCode::Left)), None);
        assert_eq!(key_to_button(KeyEvent::from(KeyCode::Char(' '))), None);
        assert_eq!(key_to_button(KeyEvent::from(KeyCode::Char('q'))), None);
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::from(KeyCode::Esc)));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('c'))));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('x'))));
    }
}
