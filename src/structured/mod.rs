//! Structured macros
//!
//! A structured macro is the form-shaped view of one specific action
//! template: a handful of named text fields plus a price-tier table. The
//! [`grammar`] tables describe where each field lands in the flat action list;
//! [`encode`] and [`decode`] both walk those same tables.

pub mod decoder;
pub mod encoder;
pub mod form;
pub mod grammar;
pub mod view;

pub use decoder::{decode, try_decode, DecodeError};
pub use encoder::encode;
pub use view::MacroView;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Named scalar fields of a structured macro
///
/// Every field is optional text; an empty string means the field is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuredMacro {
    pub result_file: String,
    pub currency_pair: String,
    pub max_stock: String,
    pub price_group_csv: String,
    pub per_sku_name: String,
    pub merge_on_column: String,
    /// Price tiers in order; the last row is "above all previous thresholds"
    pub price_modifiers: Vec<PriceModifierRow>,
}

/// One price tier
///
/// `interval` is the upper bound of the tier. It is only encoded for rows
/// before the last one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceModifierRow {
    pub interval: String,
    pub multiplier: String,
    pub added: String,
    pub ship: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Unknown field: {0}")]
    Unknown(String),
    #[error("Price modifier row {index} is out of range ({rows} rows)")]
    RowOutOfRange { index: usize, rows: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MacroField {
    ResultFile,
    CurrencyPair,
    MaxStock,
    PriceGroupCsv,
    PerSkuName,
    MergeOnColumn,
}

impl MacroField {
    pub const ALL: [MacroField; 6] = [
        MacroField::ResultFile,
        MacroField::CurrencyPair,
        MacroField::MaxStock,
        MacroField::PriceGroupCsv,
        MacroField::PerSkuName,
        MacroField::MergeOnColumn,
    ];

    /// Name the editor binds to
    pub fn name(self) -> &'static str {
        match self {
            MacroField::ResultFile => "result_file",
            MacroField::CurrencyPair => "currency_pair",
            MacroField::MaxStock => "max_stock",
            MacroField::PriceGroupCsv => "price_group_csv",
            MacroField::PerSkuName => "per_sku_name",
            MacroField::MergeOnColumn => "merge_on_column",
        }
    }
}

impl FromStr for MacroField {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MacroField::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| FieldError::Unknown(s.to_string()))
    }
}

impl fmt::Display for MacroField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowField {
    Interval,
    Multiplier,
    Added,
    Ship,
}

impl RowField {
    pub const ALL: [RowField; 4] = [
        RowField::Interval,
        RowField::Multiplier,
        RowField::Added,
        RowField::Ship,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RowField::Interval => "interval",
            RowField::Multiplier => "multiplier",
            RowField::Added => "added",
            RowField::Ship => "ship",
        }
    }
}

impl FromStr for RowField {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RowField::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| FieldError::Unknown(s.to_string()))
    }
}

impl fmt::Display for RowField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl StructuredMacro {
    pub fn field(&self, field: MacroField) -> &str {
        match field {
            MacroField::ResultFile => &self.result_file,
            MacroField::CurrencyPair => &self.currency_pair,
            MacroField::MaxStock => &self.max_stock,
            MacroField::PriceGroupCsv => &self.price_group_csv,
            MacroField::PerSkuName => &self.per_sku_name,
            MacroField::MergeOnColumn => &self.merge_on_column,
        }
    }

    pub fn field_mut(&mut self, field: MacroField) -> &mut String {
        match field {
            MacroField::ResultFile => &mut self.result_file,
            MacroField::CurrencyPair => &mut self.currency_pair,
            MacroField::MaxStock => &mut self.max_stock,
            MacroField::PriceGroupCsv => &mut self.price_group_csv,
            MacroField::PerSkuName => &mut self.per_sku_name,
            MacroField::MergeOnColumn => &mut self.merge_on_column,
        }
    }
}

impl PriceModifierRow {
    pub fn get(&self, field: RowField) -> &str {
        match field {
            RowField::Interval => &self.interval,
            RowField::Multiplier => &self.multiplier,
            RowField::Added => &self.added,
            RowField::Ship => &self.ship,
        }
    }

    pub fn get_mut(&mut self, field: RowField) -> &mut String {
        match field {
            RowField::Interval => &mut self.interval,
            RowField::Multiplier => &mut self.multiplier,
            RowField::Added => &mut self.added,
            RowField::Ship => &mut self.ship,
        }
    }

    pub fn is_empty(&self) -> bool {
        RowField::ALL.into_iter().all(|field| self.get(field).is_empty())
    }
}
