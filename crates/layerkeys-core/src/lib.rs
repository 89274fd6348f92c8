// Layerkeys Core Library
// Layer selection and key sequence dispatch for button controllers

pub mod action;
pub mod command;
pub mod config;
pub mod dispatch;
pub mod event;
pub mod key;
pub mod layer;
pub mod output;
pub mod token;

pub use action::Action;
pub use command::{is_layer_selector, parse_command, Button, ButtonEvent};
pub use config::{Config, ConfigError};
pub use dispatch::{DispatchEngine, DispatchError, SelectionMode};
pub use event::{run_event_loop, EventLoopError, EventLoopResult, LineSource, RunSummary};
pub use key::Key;
pub use layer::{Layer, LayerTable};
pub use output::{
    InjectionError, KeyAction, KeyInjector, PressedKeyState, PrintInjector, RecordingInjector,
};
pub use token::{format_sequence, parse_sequence, KeySequence, KeyToken, Modifier, TokenParseError};

#[cfg(feature = "uinput")]
pub use output::VirtualKeyboard;
