//! Editing helpers used by the structured-macro form

use super::{FieldError, MacroField, PriceModifierRow, RowField, StructuredMacro};

/// Rows offered by the standard form: four bounded tiers and the top tier
pub const REFERENCE_ROWS: usize = 5;

impl StructuredMacro {
    /// Empty macro with `rows` blank price rows
    pub fn blank(rows: usize) -> Self {
        Self {
            price_modifiers: vec![PriceModifierRow::default(); rows],
            ..Default::default()
        }
    }

    pub fn reference_layout() -> Self {
        Self::blank(REFERENCE_ROWS)
    }

    /// Store a form value, trimming surrounding whitespace
    pub fn set_field(&mut self, field: MacroField, value: &str) {
        *self.field_mut(field) = value.trim().to_string();
    }

    pub fn row_field(&self, index: usize, field: RowField) -> Result<&str, FieldError> {
        self.price_modifiers
            .get(index)
            .map(|row| row.get(field))
            .ok_or(FieldError::RowOutOfRange {
                index,
                rows: self.price_modifiers.len(),
            })
    }

    /// Store a form value into a price row, trimming surrounding whitespace
    pub fn set_row_field(
        &mut self,
        index: usize,
        field: RowField,
        value: &str,
    ) -> Result<(), FieldError> {
        let rows = self.price_modifiers.len();
        let row = self
            .price_modifiers
            .get_mut(index)
            .ok_or(FieldError::RowOutOfRange { index, rows })?;
        *row.get_mut(field) = value.trim().to_string();
        Ok(())
    }

    /// Set a field by its editor name, e.g. `currency_pair` or `2.multiplier`
    pub fn set_by_name(&mut self, name: &str, value: &str) -> Result<(), FieldError> {
        match name.split_once('.') {
            Some((index, field)) => {
                let index: usize = index
                    .parse()
                    .map_err(|_| FieldError::Unknown(name.to_string()))?;
                self.set_row_field(index, field.parse()?, value)
            }
            None => {
                self.set_field(name.parse()?, value);
                Ok(())
            }
        }
    }

    /// Trim surrounding whitespace from every field and row cell
    ///
    /// Whitespace-only values become empty and are therefore not encoded.
    pub fn trim_fields(&mut self) {
        for field in MacroField::ALL {
            trim_in_place(self.field_mut(field));
        }
        for row in &mut self.price_modifiers {
            for field in RowField::ALL {
                trim_in_place(row.get_mut(field));
            }
        }
    }

    /// Clear the interval of the last row, which the template cannot carry
    pub fn clear_top_interval(&mut self) {
        if let Some(last) = self.price_modifiers.last_mut() {
            last.interval.clear();
        }
    }
}

fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}
