// Layerkeys Key Codes
// Linux input-event-codes.h key codes for the characters a layer can type

use std::fmt;

use crate::token::{KeyToken, Modifier};

/// Represents a single keyboard key code.
///
/// This is a newtype wrapper around u16 for type safety.
/// The numeric values match Linux input-event-codes.h definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Key(pub u16);

impl Key {
    pub const LEFT_CTRL: Key = Key(29);
    pub const LEFT_SHIFT: Key = Key(42);
    pub const LEFT_ALT: Key = Key(56);
    pub const RIGHT_ALT: Key = Key(100);
    pub const LEFT_META: Key = Key(125);

    /// Get the raw numeric code value
    pub fn code(self) -> u16 {
        self.0
    }
}

impl From<u16> for Key {
    fn from(code: u16) -> Self {
        Key(code)
    }
}

impl From<Key> for u16 {
    fn from(key: Key) -> Self {
        key.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KEY({})", self.0)
    }
}

/// Key code a modifier is injected as (always the left-hand key, AltGr aside)
pub fn modifier_key(modifier: Modifier) -> Key {
    match modifier {
        Modifier::Shift => Key::LEFT_SHIFT,
        Modifier::Ctrl => Key::LEFT_CTRL,
        Modifier::Alt => Key::LEFT_ALT,
        Modifier::AltGr => Key::RIGHT_ALT,
        Modifier::Meta => Key::LEFT_META,
    }
}

/// Unshifted US-layout character to key code
fn base_char_key(c: char) -> Option<Key> {
    const LETTERS: &[(char, u16)] = &[
        ('q', 16), ('w', 17), ('e', 18), ('r', 19), ('t', 20),
        ('y', 21), ('u', 22), ('i', 23), ('o', 24), ('p', 25),
        ('a', 30), ('s', 31), ('d', 32), ('f', 33), ('g', 34),
        ('h', 35), ('j', 36), ('k', 37), ('l', 38),
        ('z', 44), ('x', 45), ('c', 46), ('v', 47), ('b', 48),
        ('n', 49), ('m', 50),
    ];

    let code = match c {
        '1'..='9' => c as u16 - '1' as u16 + 2,
        '0' => 11,
        '-' => 12,
        '=' => 13,
        '[' => 26,
        ']' => 27,
        ';' => 39,
        '\'' => 40,
        '`' => 41,
        '\\' => 43,
        ',' => 51,
        '.' => 52,
        '/' => 53,
        ' ' => 57,
        _ => return LETTERS.iter().find(|(l, _)| *l == c).map(|(_, code)| Key(*code)),
    };
    Some(Key(code))
}

/// Character to key code plus whether Shift must be held to type it
pub fn char_key(c: char) -> Option<(Key, bool)> {
    if let Some(key) = base_char_key(c) {
        return Some((key, false));
    }
    if c.is_ascii_uppercase() {
        return base_char_key(c.to_ascii_lowercase()).map(|k| (k, true));
    }

    let base = match c {
        '!' => '1',
        '@' => '2',
        '#' => '3',
        '$' => '4',
        '%' => '5',
        '^' => '6',
        '&' => '7',
        '*' => '8',
        '(' => '9',
        ')' => '0',
        '_' => '-',
        '+' => '=',
        '{' => '[',
        '}' => ']',
        ':' => ';',
        '"' => '\'',
        '~' => '`',
        '|' => '\\',
        '<' => ',',
        '>' => '.',
        '?' => '/',
        _ => return None,
    };
    base_char_key(base).map(|k| (k, true))
}

/// Resolve a key token to the key code that types it
pub fn token_key(token: KeyToken) -> Option<(Key, bool)> {
    match token {
        KeyToken::Char(c) => char_key(c),
        KeyToken::Modifier(m) => Some((modifier_key(m), false)),
    }
}
