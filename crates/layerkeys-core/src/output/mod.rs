// Layerkeys Output Layer
// Key injection capability and its backends

mod print;
mod recording;
mod state;

#[cfg(feature = "uinput")]
mod uinput;

use std::fmt;

use crate::token::KeyToken;
use crate::Action;

pub use print::PrintInjector;
pub use recording::RecordingInjector;
pub use state::PressedKeyState;

#[cfg(feature = "uinput")]
pub use uinput::VirtualKeyboard;

/// Error types for key injection
#[derive(Debug, thiserror::Error)]
pub enum InjectionError {
    #[error("Failed to create virtual device: {0}")]
    DeviceCreation(String),

    #[error("Failed to write event: {0}")]
    WriteError(String),

    #[error("Key token '{0}' cannot be typed on this output")]
    UnsupportedToken(KeyToken),

    #[error("Output rejected key token '{0}'")]
    Rejected(KeyToken),
}

/// A single press or release delivered to an injector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyAction {
    pub action: Action,
    pub token: KeyToken,
}

impl KeyAction {
    pub fn press(token: impl Into<KeyToken>) -> Self {
        Self {
            action: Action::Press,
            token: token.into(),
        }
    }

    pub fn release(token: impl Into<KeyToken>) -> Self {
        Self {
            action: Action::Release,
            token: token.into(),
        }
    }
}

impl fmt::Display for KeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.action, self.token)
    }
}

/// Capability to press and release keys on the host
pub trait KeyInjector {
    fn press(&mut self, token: KeyToken) -> Result<(), InjectionError>;

    fn release(&mut self, token: KeyToken) -> Result<(), InjectionError>;

    /// Release everything this injector still holds (shutdown)
    fn release_all(&mut self) -> Result<(), InjectionError> {
        Ok(())
    }

    /// Deliver one key action
    fn send(&mut self, key_action: KeyAction) -> Result<(), InjectionError> {
        match key_action.action {
            Action::Press => self.press(key_action.token),
            Action::Release => self.release(key_action.token),
        }
    }
}

impl<T: KeyInjector + ?Sized> KeyInjector for &mut T {
    fn press(&mut self, token: KeyToken) -> Result<(), InjectionError> {
        (**self).press(token)
    }

    fn release(&mut self, token: KeyToken) -> Result<(), InjectionError> {
        (**self).release(token)
    }

    fn release_all(&mut self) -> Result<(), InjectionError> {
        (**self).release_all()
    }
}

impl<T: KeyInjector + ?Sized> KeyInjector for Box<T> {
    fn press(&mut self, token: KeyToken) -> Result<(), InjectionError> {
        (**self).press(token)
    }

    fn release(&mut self, token: KeyToken) -> Result<(), InjectionError> {
        (**self).release(token)
    }

    fn release_all(&mut self) -> Result<(), InjectionError> {
        (**self).release_all()
    }
}
