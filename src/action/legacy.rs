use super::{Action, CTRL_TAB, DOWN, ENTER, LEFT, RIGHT, SHIFT_TAB, TAB, UP};

// Marker strings used by macro files written before actions were tagged
const MARKERS: &[(&str, &str)] = &[
    ("{TAB}", TAB),
    ("{ENTER}", ENTER),
    ("{SHIFT_TAB}", SHIFT_TAB),
    ("{CTRL_TAB}", CTRL_TAB),
    ("{UP}", UP),
    ("{DOWN}", DOWN),
    ("{LEFT}", LEFT),
    ("{RIGHT}", RIGHT),
];

/// Convert a single legacy marker string into an action
///
/// Known key markers become `Key`; anything else is literal text.
pub fn convert_marker(raw: &str) -> Action {
    MARKERS
        .iter()
        .find(|(marker, _)| *marker == raw)
        .map(|(_, key)| Action::key(*key))
        .unwrap_or_else(|| Action::text(raw))
}

/// Convert a legacy marker list into actions, preserving order
pub fn convert_legacy<S: AsRef<str>>(raw: &[S]) -> Vec<Action> {
    raw.iter().map(|r| convert_marker(r.as_ref())).collect()
}
