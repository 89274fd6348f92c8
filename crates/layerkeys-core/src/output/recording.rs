// Layerkeys Recording Injector
// Captures key actions in memory instead of touching the host

use parking_lot::Mutex;
use std::sync::Arc;

use super::state::PressedKeyState;
use super::{InjectionError, KeyAction, KeyInjector};
use crate::token::KeyToken;

#[derive(Debug, Default)]
struct Recording {
    actions: Vec<KeyAction>,
    held: PressedKeyState,
    fail_on: Option<KeyToken>,
}

/// Injector that records every action it accepts.
///
/// Clones share one log, so a test can hand a clone to the engine and keep
/// another to inspect what was emitted.
#[derive(Debug, Clone, Default)]
pub struct RecordingInjector {
    inner: Arc<Mutex<Recording>>,
}

impl RecordingInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an injector that rejects every press and release of `token`
    pub fn failing_on(token: impl Into<KeyToken>) -> Self {
        let injector = Self::new();
        injector.set_fail_on(Some(token.into()));
        injector
    }

    /// Change which token (if any) is rejected
    pub fn set_fail_on(&self, token: Option<KeyToken>) {
        self.inner.lock().fail_on = token;
    }

    /// All accepted actions in order
    pub fn actions(&self) -> Vec<KeyAction> {
        self.inner.lock().actions.clone()
    }

    /// Take the accepted actions, leaving the log empty
    pub fn take_actions(&self) -> Vec<KeyAction> {
        std::mem::take(&mut self.inner.lock().actions)
    }

    /// Tokens currently held down, oldest first
    pub fn held(&self) -> Vec<KeyToken> {
        self.inner.lock().held.get_all()
    }

    fn record(&self, key_action: KeyAction) -> Result<(), InjectionError> {
        let mut recording = self.inner.lock();
        if recording.fail_on == Some(key_action.token) {
            return Err(InjectionError::Rejected(key_action.token));
        }
        if key_action.action.is_pressed() {
            recording.held.add(key_action.token);
        } else {
            recording.held.remove(key_action.token);
        }
        recording.actions.push(key_action);
        Ok(())
    }
}

impl KeyInjector for RecordingInjector {
    fn press(&mut self, token: KeyToken) -> Result<(), InjectionError> {
        self.record(KeyAction::press(token))
    }

    fn release(&mut self, token: KeyToken) -> Result<(), InjectionError> {
        self.record(KeyAction::release(token))
    }

    fn release_all(&mut self) -> Result<(), InjectionError> {
        let mut recording = self.inner.lock();
        let held = recording.held.drain_lifo();
        recording
            .actions
            .extend(held.into_iter().map(KeyAction::release));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Modifier;

    #[test]
    fn test_clones_share_log() {
        let recorder = RecordingInjector::new();
        let mut handle = recorder.clone();
        handle.press(KeyToken::Char('a')).unwrap();

        assert_eq!(recorder.actions(), vec![KeyAction::press('a')]);
        assert_eq!(recorder.held(), vec![KeyToken::Char('a')]);
    }

    #[test]
    fn test_failing_token_is_not_recorded() {
        let mut recorder = RecordingInjector::failing_on('1');
        assert!(matches!(
            recorder.press(KeyToken::Char('1')),
            Err(InjectionError::Rejected(KeyToken::Char('1')))
        ));
        assert!(recorder.actions().is_empty());
        assert!(recorder.held().is_empty());

        recorder.set_fail_on(None);
        recorder.press(KeyToken::Char('1')).unwrap();
        assert_eq!(recorder.held(), vec![KeyToken::Char('1')]);
    }

    #[test]
    fn test_release_all_is_lifo() {
        let mut recorder = RecordingInjector::new();
        recorder.press(KeyToken::Modifier(Modifier::Shift)).unwrap();
        recorder.press(KeyToken::Char('1')).unwrap();
        recorder.take_actions();

        recorder.release_all().unwrap();
        assert_eq!(
            recorder.actions(),
            vec![KeyAction::release('1'), KeyAction::release(Modifier::Shift)]
        );
        assert!(recorder.held().is_empty());
    }
}
