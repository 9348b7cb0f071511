use super::grammar::{row_layout, Slot, CELL_SEPARATOR, HEADER, TRAILER};
use super::StructuredMacro;
use crate::action::Action;
use tracing::{debug, warn};

/// Serialize a structured macro into its flat action list
///
/// Text actions are emitted only for non-empty values ("0" counts as a
/// value); key actions are always emitted. The interval of the last price
/// row is never part of the output.
pub fn encode(structured: &StructuredMacro) -> Vec<Action> {
    let rows = structured.price_modifiers.len();
    if rows == 0 {
        warn!("Encoding a structured macro without price modifier rows; it will not decode");
    }

    let mut actions = Vec::new();
    emit_slots(&mut actions, HEADER, |field| structured.field(field));

    for (index, row) in structured.price_modifiers.iter().enumerate() {
        for field in row_layout(index, rows) {
            push_text(&mut actions, row.get(*field));
            actions.push(Action::key(CELL_SEPARATOR));
        }
    }

    emit_slots(&mut actions, TRAILER, |field| structured.field(field));

    debug!(
        "Encoded structured macro: {} rows -> {} actions",
        rows,
        actions.len()
    );
    actions
}

fn emit_slots<'a, F: Copy>(
    actions: &mut Vec<Action>,
    slots: &[Slot<F>],
    value_of: impl Fn(F) -> &'a str,
) {
    for slot in slots {
        match *slot {
            Slot::Text(field) => push_text(actions, value_of(field)),
            Slot::Key(name) => actions.push(Action::key(name)),
        }
    }
}

fn push_text(actions: &mut Vec<Action>, value: &str) {
    if !value.is_empty() {
        actions.push(Action::text(value));
    }
}
