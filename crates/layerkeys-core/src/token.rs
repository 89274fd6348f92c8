// Layerkeys Key Tokens
// Tagged keystroke units: literal characters and named modifiers

use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

/// A named modifier key, such as Shift or Ctrl
///
/// Parsing is case-insensitive and accepts the common aliases
/// (`control`, `option`, `super`, `win`, `cmd`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Modifier {
    #[strum(to_string = "shift")]
    Shift,
    #[strum(to_string = "ctrl", serialize = "control")]
    Ctrl,
    #[strum(to_string = "alt", serialize = "option")]
    Alt,
    #[strum(to_string = "altgr")]
    AltGr,
    #[strum(to_string = "meta", serialize = "super", serialize = "win", serialize = "cmd")]
    Meta,
}

impl Modifier {
    /// Canonical lowercase name
    pub fn name(self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One unit of a keystroke sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyToken {
    /// A literal printable character, typed as-is
    Char(char),
    /// A named modifier key
    Modifier(Modifier),
}

impl From<char> for KeyToken {
    fn from(c: char) -> Self {
        KeyToken::Char(c)
    }
}

impl From<Modifier> for KeyToken {
    fn from(modifier: Modifier) -> Self {
        KeyToken::Modifier(modifier)
    }
}

impl fmt::Display for KeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyToken::Char(c) => write!(f, "{}", c),
            KeyToken::Modifier(m) => write!(f, "{}", m),
        }
    }
}

/// Errors that can occur when parsing a key token
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenParseError {
    #[error("empty key token")]
    Empty,

    #[error("'{0}' is not a printable character")]
    NotPrintable(String),

    #[error("unknown modifier '{0}'")]
    UnknownModifier(String),
}

impl FromStr for KeyToken {
    type Err = TokenParseError;

    /// A single character is a literal; anything longer must name a modifier.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Err(TokenParseError::Empty),
            (Some(c), None) => {
                if c.is_control() {
                    Err(TokenParseError::NotPrintable(c.escape_default().to_string()))
                } else {
                    Ok(KeyToken::Char(c))
                }
            }
            _ => Modifier::from_str(s)
                .map(KeyToken::Modifier)
                .map_err(|_| TokenParseError::UnknownModifier(s.to_string())),
        }
    }
}

/// Ordered keystroke sequence bound to one button in one layer
///
/// Sequences are short (a modifier plus a literal in practice), so they live inline.
pub type KeySequence = SmallVec<[KeyToken; 4]>;

/// Parse a list of token strings into a key sequence
pub fn parse_sequence<S: AsRef<str>>(tokens: &[S]) -> Result<KeySequence, TokenParseError> {
    tokens.iter().map(|t| t.as_ref().parse()).collect()
}

/// Render a sequence the way it is written in config, e.g. `shift+1`
pub fn format_sequence(sequence: &[KeyToken]) -> String {
    sequence
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join("+")
}
