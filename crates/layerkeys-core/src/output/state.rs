// Layerkeys Pressed Token State
// Insertion-ordered set of held key tokens

use indexmap::IndexSet;

use crate::token::KeyToken;

/// Tracks held key tokens in the order they were pressed
#[derive(Debug, Clone, Default)]
pub struct PressedKeyState {
    pressed: IndexSet<KeyToken>,
}

impl PressedKeyState {
    /// Create a new empty pressed key state
    pub fn new() -> Self {
        Self {
            pressed: IndexSet::new(),
        }
    }

    /// Add a token to the pressed state
    pub fn add(&mut self, token: KeyToken) {
        self.pressed.insert(token);
    }

    /// Remove a token from the pressed state, keeping the order of the rest
    pub fn remove(&mut self, token: KeyToken) {
        self.pressed.shift_remove(&token);
    }

    /// Check if a token is currently pressed
    pub fn is_pressed(&self, token: KeyToken) -> bool {
        self.pressed.contains(&token)
    }

    /// Get all pressed tokens, oldest first
    pub fn get_all(&self) -> Vec<KeyToken> {
        self.pressed.iter().copied().collect()
    }

    /// Remove and return every pressed token, most recent first
    pub fn drain_lifo(&mut self) -> Vec<KeyToken> {
        let mut tokens: Vec<KeyToken> = self.pressed.drain(..).collect();
        tokens.reverse();
        tokens
    }

    pub fn len(&self) -> usize {
        self.pressed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pressed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Modifier;

    const SHIFT: KeyToken = KeyToken::Modifier(Modifier::Shift);

    #[test]
    fn test_state_add_remove() {
        let mut state = PressedKeyState::new();
        let token = KeyToken::Char('a');

        assert!(!state.is_pressed(token));
        state.add(token);
        assert!(state.is_pressed(token));
        state.remove(token);
        assert!(!state.is_pressed(token));
    }

    #[test]
    fn test_state_duplicate_add() {
        let mut state = PressedKeyState::new();
        state.add(SHIFT);
        state.add(SHIFT);

        assert_eq!(state.len(), 1);
        assert!(state.is_pressed(SHIFT));
    }

    #[test]
    fn test_state_remove_nonexistent() {
        let mut state = PressedKeyState::new();
        state.remove(KeyToken::Char('a'));
        assert!(state.is_empty());
    }

    #[test]
    fn test_state_order() {
        let mut state = PressedKeyState::new();
        state.add(SHIFT);
        state.add(KeyToken::Char('1'));
        state.add(KeyToken::Char('u'));
        state.remove(KeyToken::Char('1'));

        assert_eq!(state.get_all(), vec![SHIFT, KeyToken::Char('u')]);
        assert_eq!(state.drain_lifo(), vec![KeyToken::Char('u'), SHIFT]);
        assert!(state.is_empty());
    }
}
