//! Keyboard-driven button sampler for development without hardware.
//!
//! Terminals rarely report key releases, so each key press toggles its button:
//! press `3` once to hold button 3 down, again to let it go.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use crossterm::terminal;
use tracing::{debug, info, warn};

use crate::core::{ButtonSampler, HardwareError};
use crate::map::{key_to_button, should_quit};

pub struct KeyboardSampler {
    held: Vec<bool>,
    quit: Arc<AtomicBool>,
    raw_mode: bool,
    raw_enabled: bool,
}

impl KeyboardSampler {
    pub fn new(buttons: usize, quit: Arc<AtomicBool>) -> Self {
        Self {
            held: vec![false; buttons],
            quit,
            raw_mode: true,
            raw_enabled: false,
        }
    }

    /// Leave raw mode to someone else (the terminal preview enables it).
    pub fn without_raw_mode(mut self) -> Self {
        self.raw_mode = false;
        self
    }

    pub fn held(&self) -> &[bool] {
        &self.held
    }

    /// Apply one key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if should_quit(key) {
            info!("quit requested from keyboard");
            self.quit.store(true, Ordering::SeqCst);
            return;
        }
        match key_to_button(key) {
            Some(button) if button < self.held.len() => {
                self.held[button] = !self.held[button];
                debug!(button, held = self.held[button], "key toggled button");
            }
            _ => debug!(code = ?key.code, "ignored key"),
        }
    }
}

impl ButtonSampler for KeyboardSampler {
    fn setup(&mut self) -> Result<(), HardwareError> {
        if self.raw_mode {
            terminal::enable_raw_mode()
                .map_err(|e| HardwareError::Unavailable(format!("raw mode: {e}")))?;
            self.raw_enabled = true;
        }
        info!(buttons = self.held.len(), "keyboard sampler ready");
        Ok(())
    }

    fn pin_count(&self) -> usize {
        self.held.len()
    }

    fn read(&mut self, pin: usize) -> bool {
        self.held.get(pin).copied().unwrap_or(false)
    }

    fn teardown(&mut self) {
        if self.raw_enabled {
            if let Err(e) = terminal::disable_raw_mode() {
                warn!(error = %e, "failed to leave raw mode");
            }
            self.raw_enabled = false;
        }
        self.held.fill(false);
    }

    /// Drain pending terminal events without blocking.
    fn poll(&mut self) {
        loop {
            match event::poll(Duration::ZERO) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    warn!(error = %e, "keyboard poll failed");
                    break;
                }
            }
            match event::read() {
                Ok(Event::Key(key)) => self.handle_key(key),
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "keyboard read failed");
                    break;
                }
            }
        }
    }
}
