// Layerkeys Command Protocol
// Parses `PRESS <id>` / `RELEASE <id>` lines and classifies button ids

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use crate::Action;

/// Prefix of the reserved layer-selector namespace (`m1`, `m2`, ...)
pub const LAYER_SELECTOR_PREFIX: char = 'm';

/// A classified button id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button<'a> {
    /// `m<n>` with `n >= 1`; holds the 0-based layer ordinal `n - 1`
    LayerSelector(usize),
    /// Any other button id
    Key(&'a str),
}

impl<'a> Button<'a> {
    /// Classify a button id.
    ///
    /// Only `m` followed by a decimal number of at least 1 selects a layer;
    /// ids such as `m0`, `mx` or `mute` are ordinary key buttons.
    pub fn classify(id: &'a str) -> Self {
        id.strip_prefix(LAYER_SELECTOR_PREFIX)
            .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse::<usize>().ok())
            .filter(|n| *n >= 1)
            .map(|n| Button::LayerSelector(n - 1))
            .unwrap_or(Button::Key(id))
    }

    pub fn is_layer_selector(&self) -> bool {
        matches!(self, Button::LayerSelector(_))
    }
}

/// Check whether a button id falls in the layer-selector namespace
pub fn is_layer_selector(id: &str) -> bool {
    Button::classify(id).is_layer_selector()
}

/// A button going down or up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonEvent {
    pub button: String,
    pub action: Action,
}

impl ButtonEvent {
    pub fn new(button: impl Into<String>, action: Action) -> Self {
        Self {
            button: button.into(),
            action,
        }
    }

    pub fn press(button: impl Into<String>) -> Self {
        Self::new(button, Action::Press)
    }

    pub fn release(button: impl Into<String>) -> Self {
        Self::new(button, Action::Release)
    }

    /// Classify this event's button id
    pub fn classify(&self) -> Button<'_> {
        Button::classify(&self.button)
    }
}

impl fmt::Display for ButtonEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.action.verb(), self.button)
    }
}

fn command_regex() -> &'static Regex {
    static COMMAND: OnceLock<Regex> = OnceLock::new();
    COMMAND.get_or_init(|| {
        Regex::new(r"^\s*(PRESS|RELEASE)\s+(\S+)\s*$").expect("command pattern is valid")
    })
}

/// Parse one protocol line into a button event.
///
/// Returns `None` for anything that is not exactly a verb followed by one id,
/// or for a line that carries undecodable bytes (U+FFFD); the caller reports
/// the line as malformed.
pub fn parse_command(line: &str) -> Option<ButtonEvent> {
    if line.contains(char::REPLACEMENT_CHARACTER) {
        return None;
    }
    let captures = command_regex().captures(line)?;
    let action = captures[1].parse::<Action>().ok()?;
    Some(ButtonEvent::new(&captures[2], action))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_press_release() {
        assert_eq!(parse_command("PRESS w1"), Some(ButtonEvent::press("w1")));
        assert_eq!(parse_command("RELEASE b3"), Some(ButtonEvent::release("b3")));
    }

    #[test]
    fn test_parse_tolerates_whitespace() {
        assert_eq!(parse_command("PRESS w1\r"), Some(ButtonEvent::press("w1")));
        assert_eq!(parse_command("  RELEASE   m2  "), Some(ButtonEvent::release("m2")));
        assert_eq!(parse_command("PRESS\tw1"), Some(ButtonEvent::press("w1")));
    }

    #[test]
    fn test_parse_malformed() {
        assert_eq!(parse_command("FOO bar"), None);
        assert_eq!(parse_command("PRESS"), None);
        assert_eq!(parse_command("PRESS "), None);
        assert_eq!(parse_command("PRESSw1"), None);
        assert_eq!(parse_command("PRESS w1 w2"), None);
        assert_eq!(parse_command("press w1"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("PRESS \u{FFFD}"), None);
    }

    #[test]
    fn test_classify_layer_selectors() {
        assert_eq!(Button::classify("m1"), Button::LayerSelector(0));
        assert_eq!(Button::classify("m5"), Button::LayerSelector(4));
        assert_eq!(Button::classify("m12"), Button::LayerSelector(11));
    }

    #[test]
    fn test_classify_key_buttons() {
        assert_eq!(Button::classify("w1"), Button::Key("w1"));
        assert_eq!(Button::classify("m"), Button::Key("m"));
        assert_eq!(Button::classify("m0"), Button::Key("m0"));
        assert_eq!(Button::classify("mute"), Button::Key("mute"));
        assert_eq!(Button::classify("m+1"), Button::Key("m+1"));
        assert!(!is_layer_selector("b1"));
        assert!(is_layer_selector("m3"));
    }

    #[test]
    fn test_event_display() {
        assert_eq!(ButtonEvent::press("w1").to_string(), "PRESS w1");
        assert_eq!(ButtonEvent::release("m2").to_string(), "RELEASE m2");
    }
}
