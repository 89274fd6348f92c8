// Layerkeys uinput Output Layer
// Virtual keyboard device that types key tokens on Linux

use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
use evdev::{AttributeSet, EventType, InputEvent};
use std::time::Duration;

use super::state::PressedKeyState;
use super::{InjectionError, KeyInjector};
use crate::key::{token_key, Key};
use crate::token::{KeyToken, Modifier};
use crate::Action;

/// Name of the virtual device as it appears in `/proc/bus/input/devices`
pub const VIRTUAL_DEVICE_NAME: &str = "Layerkeys (virtual) Keyboard";

/// Virtual uinput keyboard for key output
pub struct VirtualKeyboard {
    device: VirtualDevice,
    held: PressedKeyState,
    key_pre_delay_ms: u64,
    key_post_delay_ms: u64,
}

impl VirtualKeyboard {
    /// Create a new virtual uinput device
    pub fn new() -> Result<Self, InjectionError> {
        let mut keys = AttributeSet::new();
        // Add all standard keyboard keys (0-255)
        for code in 0..256u16 {
            keys.insert(evdev::Key::new(code));
        }

        let device = VirtualDeviceBuilder::new()
            .map_err(|e: std::io::Error| InjectionError::DeviceCreation(e.to_string()))?
            .name(VIRTUAL_DEVICE_NAME)
            .with_keys(&keys)
            .map_err(|e: std::io::Error| InjectionError::DeviceCreation(e.to_string()))?
            .build()
            .map_err(|e: std::io::Error| InjectionError::DeviceCreation(e.to_string()))?;

        log::debug!("Created virtual device '{}'", VIRTUAL_DEVICE_NAME);

        Ok(Self {
            device,
            held: PressedKeyState::new(),
            key_pre_delay_ms: 0,
            key_post_delay_ms: 0,
        })
    }

    /// Configure output throttle delays in milliseconds.
    pub fn set_throttle_delays(&mut self, key_pre_delay_ms: u64, key_post_delay_ms: u64) {
        self.key_pre_delay_ms = key_pre_delay_ms;
        self.key_post_delay_ms = key_post_delay_ms;
    }

    /// Write a single key event to the virtual device
    fn write_key_event(&mut self, key: Key, action: Action) -> Result<(), InjectionError> {
        let value = match action {
            Action::Press => 1,
            Action::Release => 0,
        };

        if self.key_pre_delay_ms > 0 {
            std::thread::sleep(Duration::from_millis(self.key_pre_delay_ms));
        }

        let key_event = InputEvent::new(EventType::KEY, key.code(), value);
        // SYN event is required for the kernel to process the key event
        let syn_event = InputEvent::new(EventType::SYNCHRONIZATION, 0, 0);
        self.device
            .emit(&[key_event, syn_event])
            .map_err(|e: std::io::Error| InjectionError::WriteError(e.to_string()))?;

        if self.key_post_delay_ms > 0 {
            std::thread::sleep(Duration::from_millis(self.key_post_delay_ms));
        }
        Ok(())
    }

    fn resolve(token: KeyToken) -> Result<(Key, bool), InjectionError> {
        token_key(token).ok_or(InjectionError::UnsupportedToken(token))
    }
}

impl KeyInjector for VirtualKeyboard {
    fn press(&mut self, token: KeyToken) -> Result<(), InjectionError> {
        let (key, needs_shift) = Self::resolve(token)?;
        let shift_held = self.held.is_pressed(KeyToken::Modifier(Modifier::Shift));

        if !needs_shift || shift_held {
            self.write_key_event(key, Action::Press)?;
            self.held.add(token);
            return Ok(());
        }

        // Shifted characters hold Shift only around the key press itself
        self.write_key_event(Key::LEFT_SHIFT, Action::Press)?;
        let pressed = self.write_key_event(key, Action::Press);
        if pressed.is_ok() {
            self.held.add(token);
        }
        let shift_released = self.write_key_event(Key::LEFT_SHIFT, Action::Release);
        if shift_released.is_err() {
            // Still down; release_all picks it up
            self.held.add(KeyToken::Modifier(Modifier::Shift));
        }
        pressed.and(shift_released)
    }

    fn release(&mut self, token: KeyToken) -> Result<(), InjectionError> {
        let (key, _) = Self::resolve(token)?;
        self.write_key_event(key, Action::Release)?;
        self.held.remove(token);
        Ok(())
    }

    /// Release held tokens newest first, keeping any that fail for a retry
    fn release_all(&mut self) -> Result<(), InjectionError> {
        let mut first_error = None;
        for token in self.held.get_all().into_iter().rev() {
            if let Err(e) = self.release(token) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl Drop for VirtualKeyboard {
    fn drop(&mut self) {
        if let Err(e) = self.release_all() {
            log::warn!("Failed to release held keys on shutdown: {}", e);
        }
    }
}
