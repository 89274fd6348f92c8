// Layerkeys Print Injector
// Dry-run output: one `press <token>` / `release <token>` line per action

use std::io::Write;

use super::state::PressedKeyState;
use super::{InjectionError, KeyAction, KeyInjector};
use crate::token::KeyToken;

/// Injector that writes each action as a text line instead of typing it
pub struct PrintInjector<W: Write> {
    writer: W,
    held: PressedKeyState,
}

impl<W: Write> PrintInjector<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            held: PressedKeyState::new(),
        }
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_action(&mut self, key_action: KeyAction) -> Result<(), InjectionError> {
        writeln!(self.writer, "{}", key_action)
            .and_then(|_| self.writer.flush())
            .map_err(|e| InjectionError::WriteError(e.to_string()))?;
        if key_action.action.is_pressed() {
            self.held.add(key_action.token);
        } else {
            self.held.remove(key_action.token);
        }
        Ok(())
    }
}

impl<W: Write> KeyInjector for PrintInjector<W> {
    fn press(&mut self, token: KeyToken) -> Result<(), InjectionError> {
        self.write_action(KeyAction::press(token))
    }

    fn release(&mut self, token: KeyToken) -> Result<(), InjectionError> {
        self.write_action(KeyAction::release(token))
    }

    /// Release held tokens newest first.
    ///
    /// A token stays held until its release line is written, so a later call
    /// retries whatever failed. Returns the first write error.
    fn release_all(&mut self) -> Result<(), InjectionError> {
        let mut first_error = None;
        for token in self.held.get_all().into_iter().rev() {
            if let Err(e) = self.write_action(KeyAction::release(token)) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
