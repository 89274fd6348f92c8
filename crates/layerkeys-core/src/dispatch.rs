// Layerkeys Dispatch Engine
// Layer-selection state machine and key-combination dispatcher
//
// The engine owns which layers are active and whether the next selector press
// replaces or extends that set. Key events are resolved against every active
// layer in ascending ordinal order; sequences are pressed front to back and
// released back to front so modifiers wrap the literal they apply to.

use std::collections::BTreeSet;

use crate::command::{Button, ButtonEvent};
use crate::layer::LayerTable;
use crate::output::{InjectionError, KeyInjector};
use crate::token::KeyToken;
use crate::Action;

/// Non-fatal conditions reported while dispatching
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Invalid input: {0:?}")]
    MalformedCommand(String),

    #[error("Unknown button id '{button}' in layer {}", .layer + 1)]
    UnknownButtonId { layer: usize, button: String },

    #[error("Layer not supported: {}", .0 + 1)]
    UnsupportedLayer(usize),

    #[error("Key injection failed: {0}")]
    InjectionFailure(#[from] InjectionError),
}

/// Selection mode: replace the active set on the next selector press, or add to it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Overwrite,
    Accumulate,
}

/// Layer-selection state machine plus key dispatcher
#[derive(Debug, Clone)]
pub struct DispatchEngine {
    table: LayerTable,
    default_layer: usize,
    active_layers: BTreeSet<usize>,
    overwrite_next: bool,
}

impl DispatchEngine {
    /// Create an engine with the table's middle layer active
    pub fn new(table: LayerTable) -> Self {
        let default_layer = table.middle_index();
        Self::with_default_layer(table, default_layer)
    }

    /// Create an engine with an explicit 0-based default layer.
    ///
    /// The ordinal is not checked against the table; an out-of-range default
    /// is reported per key event like any other unsupported layer.
    pub fn with_default_layer(table: LayerTable, default_layer: usize) -> Self {
        Self {
            table,
            default_layer,
            active_layers: BTreeSet::from([default_layer]),
            overwrite_next: true,
        }
    }

    pub fn table(&self) -> &LayerTable {
        &self.table
    }

    pub fn default_layer(&self) -> usize {
        self.default_layer
    }

    /// Active layer ordinals in ascending order
    pub fn active_layers(&self) -> Vec<usize> {
        self.active_layers.iter().copied().collect()
    }

    pub fn is_active(&self, layer: usize) -> bool {
        self.active_layers.contains(&layer)
    }

    pub fn selection_mode(&self) -> SelectionMode {
        if self.overwrite_next {
            SelectionMode::Overwrite
        } else {
            SelectionMode::Accumulate
        }
    }

    /// Return to the initial state: default layer only, overwrite mode
    pub fn reset(&mut self) {
        self.active_layers = BTreeSet::from([self.default_layer]);
        self.overwrite_next = true;
    }

    /// Process one button event to completion.
    ///
    /// Returns every non-fatal condition met on the way; each is also logged.
    pub fn process_event<I>(&mut self, event: &ButtonEvent, injector: &mut I) -> Vec<DispatchError>
    where
        I: KeyInjector + ?Sized,
    {
        let diagnostics = match event.classify() {
            Button::LayerSelector(layer) => {
                self.select_layer(layer, event.action);
                Vec::new()
            }
            Button::Key(button) => self.dispatch_key(button, event.action, injector),
        };

        for diagnostic in &diagnostics {
            log::warn!("{}", diagnostic);
        }
        diagnostics
    }

    /// Apply a layer-selector press or release
    fn select_layer(&mut self, layer: usize, action: Action) {
        match action {
            Action::Press => {
                if self.overwrite_next {
                    self.active_layers.clear();
                    self.active_layers.insert(layer);
                    self.overwrite_next = false;
                } else {
                    self.active_layers.insert(layer);
                }
                log::info!("Selected layer {}", layer + 1);
            }
            Action::Release => {
                if self.active_layers.len() > 1 {
                    // Releasing a selector that is not active is tolerated
                    self.active_layers.remove(&layer);
                } else {
                    self.overwrite_next = true;
                }
            }
        }
        log::debug!(
            "Active layers {:?}, mode {:?}",
            self.active_layers,
            self.selection_mode()
        );
    }

    /// Resolve a key button against every active layer and emit its keystrokes
    fn dispatch_key<I>(&self, button: &str, action: Action, injector: &mut I) -> Vec<DispatchError>
    where
        I: KeyInjector + ?Sized,
    {
        let mut diagnostics = Vec::new();

        for &layer in &self.active_layers {
            if !self.table.contains_layer(layer) {
                diagnostics.push(DispatchError::UnsupportedLayer(layer));
                continue;
            }
            let Some(sequence) = self.table.resolve(layer, button) else {
                diagnostics.push(DispatchError::UnknownButtonId {
                    layer,
                    button: button.to_string(),
                });
                continue;
            };

            log::debug!("{} {} -> layer {} {:?}", action.verb(), button, layer + 1, sequence);

            let result = match action {
                Action::Press => press_sequence(sequence, injector),
                Action::Release => release_sequence(sequence, injector),
            };
            diagnostics.extend(result.into_iter().map(DispatchError::from));
        }

        diagnostics
    }
}

/// Press tokens front to back.
///
/// If a press fails, the tokens already pressed are released again in reverse
/// so no modifier is left held.
fn press_sequence<I>(sequence: &[KeyToken], injector: &mut I) -> Vec<InjectionError>
where
    I: KeyInjector + ?Sized,
{
    for (index, &token) in sequence.iter().enumerate() {
        if let Err(e) = injector.press(token) {
            let mut errors = vec![e];
            errors.extend(release_sequence(&sequence[..index], injector));
            return errors;
        }
    }
    Vec::new()
}

/// Release tokens back to front, carrying on past failures
fn release_sequence<I>(sequence: &[KeyToken], injector: &mut I) -> Vec<InjectionError>
where
    I: KeyInjector + ?Sized,
{
    sequence
        .iter()
        .rev()
        .filter_map(|&token| injector.release(token).err())
        .collect()
}
