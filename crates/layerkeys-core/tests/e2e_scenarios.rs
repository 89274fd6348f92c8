// Layerkeys End-to-End Test Scenarios
//
// These tests feed protocol text through the event loop the way the binary
// does and check the key actions that come out. No hardware is required.
//
// Run with: cargo test --test e2e_scenarios

use std::io::Cursor;

use indexmap::IndexMap;
use layerkeys_core::{
    parse_sequence, run_event_loop, DispatchEngine, KeyAction, KeyToken, Layer, LayerTable,
    LineSource, Modifier, PrintInjector, RecordingInjector, RunSummary, SelectionMode,
};

// =========================================================================
// Test Helpers
// =========================================================================

fn layer(name: &str, mappings: &[(&str, &[&str])]) -> Layer {
    let mappings: IndexMap<_, _> = mappings
        .iter()
        .map(|&(button, tokens)| (button.to_string(), parse_sequence(tokens).unwrap()))
        .collect();
    Layer::with_mappings(name, mappings)
}

/// Five layers where only layer 0 and layer 2 map `w1`
fn sparse_table() -> LayerTable {
    LayerTable::new(vec![
        layer("digits", &[("w1", &["1"]), ("b1", &["shift", "1"])]),
        layer("empty", &[]),
        layer("letters", &[("w1", &["u"])]),
        layer("no w1", &[("w2", &["x"])]),
        layer("last", &[("w1", &["z"])]),
    ])
}

/// Run a session and return the summary plus everything the injector saw
fn session(engine: &mut DispatchEngine, input: &str) -> (RunSummary, Vec<KeyAction>) {
    let mut injector = RecordingInjector::new();
    let summary =
        run_event_loop(LineSource::new(Cursor::new(input.to_string())), engine, &mut injector)
            .unwrap();
    (summary, injector.take_actions())
}

fn shift() -> KeyToken {
    KeyToken::Modifier(Modifier::Shift)
}

// =========================================================================
// Scenarios
// =========================================================================

#[test]
fn test_tap_key_on_default_layer() {
    let mut engine = DispatchEngine::with_default_layer(sparse_table(), 2);
    let (summary, actions) = session(&mut engine, "PRESS w1\nRELEASE w1\n");

    assert_eq!(actions, vec![KeyAction::press('u'), KeyAction::release('u')]);
    assert_eq!(summary.diagnostics, 0);
}

#[test]
fn test_combined_layers_report_misses_in_order() {
    let mut engine = DispatchEngine::with_default_layer(sparse_table(), 0);
    let (summary, actions) = session(&mut engine, "PRESS m1\nPRESS m4\nPRESS w1\n");

    assert_eq!(engine.active_layers(), vec![0, 3]);
    // w1 is still held at end of input, so the loop releases it
    assert_eq!(actions, vec![KeyAction::press('1'), KeyAction::release('1')]);
    assert_eq!(summary.diagnostics, 1);
}

#[test]
fn test_selector_press_switches_layer_without_output() {
    let mut engine = DispatchEngine::with_default_layer(sparse_table(), 0);
    let (summary, actions) = session(&mut engine, "PRESS m5\n");

    assert_eq!(engine.active_layers(), vec![4]);
    assert_eq!(engine.selection_mode(), SelectionMode::Accumulate);
    assert!(actions.is_empty());
    assert_eq!(summary.diagnostics, 0);
}

#[test]
fn test_tapping_selectors_switches_one_layer_at_a_time() {
    let mut engine = DispatchEngine::with_default_layer(sparse_table(), 0);
    let input = "PRESS m3\nRELEASE m3\nPRESS m5\nRELEASE m5\nPRESS w1\nRELEASE w1\n";
    let (_, actions) = session(&mut engine, input);

    assert_eq!(engine.active_layers(), vec![4]);
    assert_eq!(engine.selection_mode(), SelectionMode::Overwrite);
    assert_eq!(actions, vec![KeyAction::press('z'), KeyAction::release('z')]);
}

#[test]
fn test_chord_of_selectors_then_single_tap() {
    let mut engine = DispatchEngine::with_default_layer(sparse_table(), 1);
    let input = "\
PRESS m1
PRESS m3
PRESS w1
RELEASE w1
RELEASE m3
RELEASE m1
PRESS m5
";
    let (summary, actions) = session(&mut engine, input);

    assert_eq!(
        actions,
        vec![
            KeyAction::press('1'),
            KeyAction::press('u'),
            KeyAction::release('1'),
            KeyAction::release('u'),
        ]
    );
    assert_eq!(summary.diagnostics, 0);
    assert_eq!(engine.active_layers(), vec![4]);
}

#[test]
fn test_shifted_sequence_wraps_literal() {
    let mut engine = DispatchEngine::with_default_layer(sparse_table(), 0);
    let (_, actions) = session(&mut engine, "PRESS b1\nRELEASE b1\n");

    assert_eq!(
        actions,
        vec![
            KeyAction::press(shift()),
            KeyAction::press('1'),
            KeyAction::release('1'),
            KeyAction::release(shift()),
        ]
    );
}

#[test]
fn test_unknown_button_emits_nothing() {
    let mut engine = DispatchEngine::with_default_layer(sparse_table(), 1);
    let (summary, actions) = session(&mut engine, "PRESS m2\nPRESS m4\nPRESS w9\n");

    assert!(actions.is_empty());
    // One miss for each of layers 1 and 3
    assert_eq!(summary.diagnostics, 2);
}

#[test]
fn test_malformed_lines_leave_state_alone() {
    let mut engine = DispatchEngine::with_default_layer(sparse_table(), 2);
    let (summary, actions) = session(&mut engine, "FOO bar\npress w1\nPRESS\n\nPRESS w1 extra\n");

    assert!(actions.is_empty());
    assert_eq!(
        summary,
        RunSummary {
            lines: 5,
            events: 0,
            diagnostics: 5,
        }
    );
    assert_eq!(engine.active_layers(), vec![2]);
    assert_eq!(engine.selection_mode(), SelectionMode::Overwrite);
}

#[test]
fn test_selector_beyond_table_is_reported_on_key_events() {
    let mut engine = DispatchEngine::with_default_layer(sparse_table(), 0);
    let (summary, actions) = session(&mut engine, "PRESS m9\nPRESS w1\nRELEASE w1\n");

    assert_eq!(engine.active_layers(), vec![8]);
    assert!(actions.is_empty());
    assert_eq!(summary.diagnostics, 2);
}

#[test]
fn test_non_selector_m_buttons_are_keys() {
    let table = LayerTable::new(vec![layer("media", &[("mute", &["m"]), ("m0", &["0"])])]);
    let mut engine = DispatchEngine::new(table);
    let (_, actions) = session(&mut engine, "PRESS mute\nRELEASE mute\nPRESS m0\nRELEASE m0\n");

    assert_eq!(
        actions,
        vec![
            KeyAction::press('m'),
            KeyAction::release('m'),
            KeyAction::press('0'),
            KeyAction::release('0'),
        ]
    );
    assert_eq!(engine.active_layers(), vec![0]);
}

#[test]
fn test_dry_run_output_stream() {
    let mut engine = DispatchEngine::new(LayerTable::builtin());
    let mut printer = PrintInjector::new(Vec::new());
    let input = "PRESS m1\nRELEASE m1\nPRESS b1\nRELEASE b1\nPRESS w3\n";

    run_event_loop(LineSource::new(Cursor::new(input)), &mut engine, &mut printer).unwrap();

    let text = String::from_utf8(printer.into_inner()).unwrap();
    assert_eq!(
        text,
        "press shift\npress 1\nrelease 1\nrelease shift\npress 3\nrelease 3\n"
    );
}
