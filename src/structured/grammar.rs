//! Action template shared by the encoder and the decoder
//!
//! ```text
//! Header     := result_file? tab currency_pair? tab tab tab
//!               max_stock? tab price_group_csv? tab tab
//! Row(i<N-1) := interval? tab multiplier? tab added? tab ship? tab
//! Row(N-1)   := multiplier? tab added? tab ship? tab
//! Trailer    := enter shift+tab shift+tab per_sku_name? tab merge_on_column?
//! Macro      := Header Row(0) .. Row(N-1) Trailer
//! ```
//!
//! The table body only ever contains `Text` and `Key(tab)`. The first
//! `Key(enter)` after the header therefore ends the table, and the trailer
//! must start with it.

use super::{MacroField, RowField};
use crate::action::{ENTER, SHIFT_TAB, TAB};

/// One position in a fixed part of the template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot<F> {
    /// Optional text captured into a field
    Text(F),
    /// Required key
    Key(&'static str),
}

pub const HEADER: &[Slot<MacroField>] = &[
    Slot::Text(MacroField::ResultFile),
    Slot::Key(TAB),
    Slot::Text(MacroField::CurrencyPair),
    Slot::Key(TAB),
    Slot::Key(TAB),
    Slot::Key(TAB),
    Slot::Text(MacroField::MaxStock),
    Slot::Key(TAB),
    Slot::Text(MacroField::PriceGroupCsv),
    Slot::Key(TAB),
    Slot::Key(TAB),
];

pub const TRAILER: &[Slot<MacroField>] = &[
    Slot::Key(TABLE_END),
    Slot::Key(SHIFT_TAB),
    Slot::Key(SHIFT_TAB),
    Slot::Text(MacroField::PerSkuName),
    Slot::Key(TAB),
    Slot::Text(MacroField::MergeOnColumn),
];

/// Every table cell is an optional text followed by this key
pub const CELL_SEPARATOR: &str = TAB;

/// Lookahead that ends the table
pub const TABLE_END: &str = ENTER;

/// Cell layout of every row except the last
pub const TIER_ROW: &[RowField] = &[
    RowField::Interval,
    RowField::Multiplier,
    RowField::Added,
    RowField::Ship,
];

/// Cell layout of the last row
pub const TOP_ROW: &[RowField] = &[RowField::Multiplier, RowField::Added, RowField::Ship];

/// Layout of row `index` in a table of `rows` rows
pub fn row_layout(index: usize, rows: usize) -> &'static [RowField] {
    if index + 1 == rows {
        TOP_ROW
    } else {
        TIER_ROW
    }
}

/// Number of table cells a table of `rows` rows occupies
pub fn cells_for_rows(rows: usize) -> usize {
    match rows {
        0 => 0,
        n => (n - 1) * TIER_ROW.len() + TOP_ROW.len(),
    }
}

/// Inverse of [`cells_for_rows`] for tables with at least one row
pub fn rows_for_cells(cells: usize) -> Option<usize> {
    let tiers = cells.checked_sub(TOP_ROW.len())?;
    if tiers % TIER_ROW.len() != 0 {
        return None;
    }
    Some(tiers / TIER_ROW.len() + 1)
}
