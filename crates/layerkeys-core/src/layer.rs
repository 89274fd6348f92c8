// Layerkeys Layer Table
// Ordered collection of named button -> keystroke mappings

use indexmap::IndexMap;

use crate::token::{KeySequence, KeyToken, Modifier};

/// One layer of mappings from button ids to key sequences
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    name: String,
    mappings: IndexMap<String, KeySequence>,
}

impl Layer {
    /// Create an empty layer
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mappings: IndexMap::new(),
        }
    }

    /// Create a layer from existing mappings
    pub fn with_mappings(name: impl Into<String>, mappings: IndexMap<String, KeySequence>) -> Self {
        Self {
            name: name.into(),
            mappings,
        }
    }

    /// Bind a button id to a key sequence, replacing any previous binding
    pub fn insert(&mut self, button: impl Into<String>, sequence: KeySequence) {
        self.mappings.insert(button.into(), sequence);
    }

    /// Get the name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the mappings in insertion order
    pub fn mappings(&self) -> &IndexMap<String, KeySequence> {
        &self.mappings
    }

    /// Look up the key sequence for a button id
    pub fn get(&self, button: &str) -> Option<&[KeyToken]> {
        self.mappings.get(button).map(|seq| seq.as_slice())
    }

    /// Check if a button id is bound in this layer
    pub fn contains(&self, button: &str) -> bool {
        self.mappings.contains_key(button)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

/// Immutable, ordered table of layers addressed by 0-based ordinal
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayerTable {
    layers: Vec<Layer>,
}

impl LayerTable {
    pub fn new(layers: Vec<Layer>) -> Self {
        Self { layers }
    }

    /// Resolve a button id against one layer.
    ///
    /// Misses when the ordinal is out of range or the button is unbound there.
    pub fn resolve(&self, layer: usize, button: &str) -> Option<&[KeyToken]> {
        self.layers.get(layer).and_then(|l| l.get(button))
    }

    /// Get a layer by ordinal
    pub fn get(&self, layer: usize) -> Option<&Layer> {
        self.layers.get(layer)
    }

    pub fn contains_layer(&self, layer: usize) -> bool {
        layer < self.layers.len()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    /// Ordinal of the middle layer, used as the default selection
    pub fn middle_index(&self) -> usize {
        self.layers.len() / 2
    }

    /// The five built-in piano layers.
    ///
    /// White keys `w1..w7` type a character; black keys `b1..b5` type the
    /// character of the white key to their left with Shift held.
    pub fn builtin() -> Self {
        const ROWS: [[char; 7]; 5] = [
            ['1', '2', '3', '4', '5', '6', '7'],
            ['8', '9', '0', 'q', 'w', 'e', 'r'],
            ['t', 'y', 'u', 'i', 'o', 'p', 'a'],
            ['s', 'd', 'f', 'g', 'h', 'j', 'k'],
            ['l', 'z', 'x', 'c', 'v', 'b', 'n'],
        ];
        // White key each black key is shifted from (1-based)
        const BLACK_OF_WHITE: [usize; 5] = [1, 2, 4, 5, 6];

        let layers = ROWS
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let mut layer = Layer::new(format!("keymap {}", index + 1));
                for (white, c) in row.iter().enumerate() {
                    layer.insert(format!("w{}", white + 1), smallvec::smallvec![KeyToken::Char(*c)]);
                    if let Some(black) = BLACK_OF_WHITE.iter().position(|w| *w == white + 1) {
                        layer.insert(
                            format!("b{}", black + 1),
                            smallvec::smallvec![KeyToken::Modifier(Modifier::Shift), KeyToken::Char(*c)],
                        );
                    }
                }
                layer
            })
            .collect();

        Self::new(layers)
    }
}
