use super::grammar::{
    row_layout, rows_for_cells, Slot, CELL_SEPARATOR, HEADER, TABLE_END, TRAILER,
};
use super::{PriceModifierRow, StructuredMacro};
use crate::action::Action;
use thiserror::Error;
use tracing::debug;

/// Why an action list is not a structured macro
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Expected {expected} at position {position}, found {found}")]
    UnexpectedAction {
        position: usize,
        expected: String,
        found: String,
    },
    #[error("Sequence ended where {expected} was expected")]
    UnexpectedEnd { expected: String },
    #[error("Price table has {cells} cells, which is not a whole number of rows")]
    MalformedTable { cells: usize },
    #[error("{remaining} trailing action(s) starting at position {position}")]
    TrailingActions { position: usize, remaining: usize },
}

/// Read-only cursor over the caller's action list
struct Cursor<'a> {
    actions: &'a [Action],
    position: usize,
}

impl<'a> Cursor<'a> {
    fn new(actions: &'a [Action]) -> Self {
        Self {
            actions,
            position: 0,
        }
    }

    fn peek(&self) -> Option<&'a Action> {
        self.actions.get(self.position)
    }

    fn remaining(&self) -> usize {
        self.actions.len() - self.position
    }

    /// Consume `Key(name)` or fail
    fn expect_key(&mut self, name: &str) -> Result<(), DecodeError> {
        match self.peek() {
            Some(action) if action.is_key(name) => {
                self.position += 1;
                Ok(())
            }
            Some(action) => Err(DecodeError::UnexpectedAction {
                position: self.position,
                expected: format!("Key({})", name),
                found: action.to_string(),
            }),
            None => Err(DecodeError::UnexpectedEnd {
                expected: format!("Key({})", name),
            }),
        }
    }

    /// Consume a `Text` if one is next; an absent text reads as ""
    fn take_text(&mut self) -> String {
        match self.peek().and_then(Action::as_text) {
            Some(value) => {
                self.position += 1;
                value.to_string()
            }
            None => String::new(),
        }
    }

    fn run<F: Copy>(
        &mut self,
        slots: &[Slot<F>],
        mut store: impl FnMut(F, String),
    ) -> Result<(), DecodeError> {
        for slot in slots {
            match *slot {
                Slot::Text(field) => store(field, self.take_text()),
                Slot::Key(name) => self.expect_key(name)?,
            }
        }
        Ok(())
    }

    /// Read `Text? Key(tab)` cells until the `Key(enter)` lookahead
    fn table_cells(&mut self) -> Result<Vec<String>, DecodeError> {
        let mut cells = Vec::new();
        loop {
            match self.peek() {
                Some(action) if action.is_key(TABLE_END) => return Ok(cells),
                Some(_) => {}
                None => {
                    return Err(DecodeError::UnexpectedEnd {
                        expected: format!("Key({})", TABLE_END),
                    })
                }
            }
            let value = self.take_text();
            self.expect_key(CELL_SEPARATOR)?;
            cells.push(value);
        }
    }
}

/// Match an action list against the structured template
///
/// Never mutates `actions`. Any deviation from the template, including
/// actions left over after the trailer, is an error.
pub fn try_decode(actions: &[Action]) -> Result<StructuredMacro, DecodeError> {
    let mut cursor = Cursor::new(actions);
    let mut structured = StructuredMacro::default();

    cursor.run(HEADER, |field, value| *structured.field_mut(field) = value)?;

    let cells = cursor.table_cells()?;
    let rows = rows_for_cells(cells.len()).ok_or(DecodeError::MalformedTable {
        cells: cells.len(),
    })?;
    let mut cells = cells.into_iter();
    for index in 0..rows {
        let mut row = PriceModifierRow::default();
        for field in row_layout(index, rows) {
            *row.get_mut(*field) = cells.next().unwrap_or_default();
        }
        structured.price_modifiers.push(row);
    }

    cursor.run(TRAILER, |field, value| *structured.field_mut(field) = value)?;

    if cursor.remaining() > 0 {
        return Err(DecodeError::TrailingActions {
            position: cursor.position,
            remaining: cursor.remaining(),
        });
    }

    Ok(structured)
}

/// Decode an action list, or `None` if it is not a structured macro
///
/// `None` is the ordinary answer for hand-built macros; callers fall back to
/// freeform editing.
pub fn decode(actions: &[Action]) -> Option<StructuredMacro> {
    match try_decode(actions) {
        Ok(structured) => Some(structured),
        Err(e) => {
            debug!("Not a structured macro: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structured::encode;

    fn sample() -> StructuredMacro {
        StructuredMacro {
            result_file: "out.csv".to_string(),
            currency_pair: "EUR".to_string(),
            max_stock: "100".to_string(),
            price_group_csv: "grp1".to_string(),
            per_sku_name: "sku".to_string(),
            merge_on_column: "id".to_string(),
            price_modifiers: vec![
                PriceModifierRow {
                    interval: "10".to_string(),
                    multiplier: "1.2".to_string(),
                    added: "0".to_string(),
                    ship: "5".to_string(),
                },
                PriceModifierRow {
                    interval: String::new(),
                    multiplier: "1.5".to_string(),
                    added: "2".to_string(),
                    ship: "7".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_sample_sequence() {
        let t = Action::text;
        let k = Action::key;
        let expected = vec![
            t("out.csv"),
            k("tab"),
            t("EUR"),
            k("tab"),
            k("tab"),
            k("tab"),
            t("100"),
            k("tab"),
            t("grp1"),
            k("tab"),
            k("tab"),
            // row 0
            t("10"),
            k("tab"),
            t("1.2"),
            k("tab"),
            t("0"),
            k("tab"),
            t("5"),
            k("tab"),
            // row 1 (last, no interval)
            t("1.5"),
            k("tab"),
            t("2"),
            k("tab"),
            t("7"),
            k("tab"),
            // trailer
            k("enter"),
            k("shift+tab"),
            k("shift+tab"),
            t("sku"),
            k("tab"),
            t("id"),
        ];
        let actions = encode(&sample());
        assert_eq!(actions.len(), 31);
        assert_eq!(actions, expected);
        assert_eq!(decode(&expected), Some(sample()));
    }

    #[test]
    fn test_decode_does_not_mutate_input() {
        let actions = encode(&sample());
        let before = actions.clone();
        let _ = decode(&actions);
        assert_eq!(actions, before);
    }

    #[test]
    fn test_single_stray_text_rejected() {
        let err = try_decode(&[Action::text("hello")]).unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnexpectedEnd {
                expected: "Key(tab)".to_string()
            }
        );
        assert_eq!(decode(&[]), None);
    }

    #[test]
    fn test_header_tab_count_off_by_one() {
        let mut missing = encode(&sample());
        // drop one of the three tabs after currency_pair
        missing.remove(3);
        assert_eq!(decode(&missing), None);

        let mut extra = encode(&sample());
        extra.insert(3, Action::key("tab"));
        assert_eq!(decode(&extra), None);
    }

    #[test]
    fn test_trailing_key_rejected() {
        let mut actions = encode(&sample());
        actions.push(Action::key("tab"));
        let err = try_decode(&actions).unwrap_err();
        assert_eq!(
            err,
            DecodeError::TrailingActions {
                position: 31,
                remaining: 1
            }
        );
    }

    #[test]
    fn test_wrong_key_reports_position() {
        let mut actions = encode(&sample());
        actions[1] = Action::key("enter");
        let err = try_decode(&actions).unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnexpectedAction {
                position: 1,
                expected: "Key(tab)".to_string(),
                found: "Key(enter)".to_string(),
            }
        );
    }

    #[test]
    fn test_truncated_table_rejected() {
        let actions = encode(&sample());
        // cut inside the price table
        assert_eq!(decode(&actions[..15]), None);
        // cut right before the trailer
        assert!(matches!(
            try_decode(&actions[..25]),
            Err(DecodeError::UnexpectedEnd { .. })
        ));
    }

    #[test]
    fn test_partial_row_rejected() {
        let mut actions = encode(&sample());
        // drop the whole ship cell of the last row: 6 cells instead of 7
        actions.drain(23..25);
        assert_eq!(
            try_decode(&actions).unwrap_err(),
            DecodeError::MalformedTable { cells: 6 }
        );
    }

    #[test]
    fn test_empty_table_rejected() {
        let m = StructuredMacro::default();
        let actions = encode(&m);
        assert_eq!(
            try_decode(&actions).unwrap_err(),
            DecodeError::MalformedTable { cells: 0 }
        );
    }

    #[test]
    fn test_two_texts_in_one_cell_rejected() {
        let mut actions = encode(&sample());
        actions.insert(12, Action::text("extra"));
        assert_eq!(decode(&actions), None);
    }

    #[test]
    fn test_image_action_is_not_structured() {
        let mut actions = encode(&sample());
        actions[0] = Action::ClickImage {
            value: "button.png".to_string(),
            confidence: 0.9,
        };
        assert_eq!(decode(&actions), None);
    }

    #[test]
    fn test_empty_text_action_reads_as_absent() {
        let mut actions = encode(&StructuredMacro {
            price_modifiers: vec![PriceModifierRow::default()],
            ..Default::default()
        });
        actions.insert(0, Action::text(""));
        let decoded = decode(&actions).unwrap();
        assert_eq!(decoded.result_file, "");
        assert_eq!(
            decoded,
            StructuredMacro {
                price_modifiers: vec![PriceModifierRow::default()],
                ..Default::default()
            }
        );
    }

    fn filled_row(i: usize) -> PriceModifierRow {
        PriceModifierRow {
            interval: format!("{}", (i + 1) * 10),
            multiplier: format!("1.{}", i),
            added: i.to_string(),
            ship: "4.99".to_string(),
        }
    }

    #[test]
    fn test_all_empty_fields_round_trip() {
        for rows in [1, 2, 5] {
            let m = StructuredMacro::blank(rows);
            let actions = encode(&m);
            assert!(actions.iter().all(|a| matches!(a, Action::Key { .. })));
            assert_eq!(decode(&actions), Some(m));
        }
    }

    #[test]
    fn test_single_row_round_trip() {
        let mut m = sample();
        m.price_modifiers = vec![PriceModifierRow {
            interval: String::new(),
            multiplier: "2".to_string(),
            added: "1".to_string(),
            ship: "9".to_string(),
        }];
        assert_eq!(decode(&encode(&m)), Some(m));
    }

    #[test]
    fn test_five_row_round_trip() {
        let mut m = sample();
        m.price_modifiers = (0..5).map(filled_row).collect();
        m.clear_top_interval();
        let actions = encode(&m);
        // header 11, four tier rows of 8, top row 6, trailer 6
        assert_eq!(actions.len(), 55);
        assert_eq!(decode(&actions), Some(m));
    }

    #[test]
    fn test_more_rows_than_reference_form() {
        let mut m = sample();
        m.price_modifiers = (0..9).map(filled_row).collect();
        m.clear_top_interval();
        assert_eq!(decode(&encode(&m)), Some(m));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn value() -> impl Strategy<Value = String> {
            prop_oneof![
                Just(String::new()),
                Just("0".to_string()),
                "\\PC{1,8}",
            ]
        }

        fn row() -> impl Strategy<Value = PriceModifierRow> {
            (value(), value(), value(), value()).prop_map(|(interval, multiplier, added, ship)| {
                PriceModifierRow {
                    interval,
                    multiplier,
                    added,
                    ship,
                }
            })
        }

        fn structured() -> impl Strategy<Value = StructuredMacro> {
            (
                (value(), value(), value()),
                (value(), value(), value()),
                prop::collection::vec(row(), 1..8),
            )
                .prop_map(
                    |(
                        (result_file, currency_pair, max_stock),
                        (price_group_csv, per_sku_name, merge_on_column),
                        price_modifiers,
                    )| {
                        let mut m = StructuredMacro {
                            result_file,
                            currency_pair,
                            max_stock,
                            price_group_csv,
                            per_sku_name,
                            merge_on_column,
                            price_modifiers,
                        };
                        m.clear_top_interval();
                        m
                    },
                )
        }

        // Encoding then decoding reproduces the macro for any row count
        proptest! {
            #[test]
            fn test_round_trip(m in structured()) {
                let actions = encode(&m);
                prop_assert_eq!(decode(&actions), Some(m));
            }

            #[test]
            fn test_trailing_action_rejected(m in structured(), extra in value()) {
                let mut actions = encode(&m);
                actions.push(Action::key("tab"));
                prop_assert!(decode(&actions).is_none());

                let mut actions = encode(&m);
                actions.push(Action::key("enter"));
                actions.push(Action::text(extra));
                prop_assert!(decode(&actions).is_none());
            }
        }
    }
}
