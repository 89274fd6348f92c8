// Layerkeys Action
// Direction of a button event or of an emitted key action

use std::fmt;
use std::str::FromStr;

/// Represents the action state of a button or key event.
///
/// The input protocol spells these as the verbs `PRESS` and `RELEASE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Release,
    Press,
}

impl Action {
    /// Returns true if this is a PRESS event
    pub fn is_pressed(self) -> bool {
        matches!(self, Action::Press)
    }

    /// Protocol verb for this action
    pub fn verb(self) -> &'static str {
        match self {
            Action::Press => "PRESS",
            Action::Release => "RELEASE",
        }
    }
}

impl FromStr for Action {
    type Err = String;

    /// Parse a protocol verb. Verbs are case-sensitive, as sent by the pad driver.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PRESS" => Ok(Action::Press),
            "RELEASE" => Ok(Action::Release),
            other => Err(format!("Unknown verb: {}", other)),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Release => write!(f, "release"),
            Action::Press => write!(f, "press"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_properties() {
        assert!(Action::Press.is_pressed());
        assert!(!Action::Release.is_pressed());
    }

    #[test]
    fn test_action_from_verb() {
        assert_eq!("PRESS".parse::<Action>(), Ok(Action::Press));
        assert_eq!("RELEASE".parse::<Action>(), Ok(Action::Release));
        assert!("press".parse::<Action>().is_err());
        assert!("FOO".parse::<Action>().is_err());
    }

    #[test]
    fn test_action_verb_and_display() {
        assert_eq!(Action::Press.verb(), "PRESS");
        assert_eq!(Action::Release.to_string(), "release");
    }
}
