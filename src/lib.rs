//! Structured keyboard macros for back-office price forms
//!
//! A macro is a flat list of key presses and text entries. Macros that
//! follow the price form template can be decoded into named fields and a
//! price modifier table, edited, and encoded back.

pub mod action;
pub mod config;
pub mod library;
pub mod sequence;
pub mod structured;

// Public API
pub use action::Action;
pub use config::{Config, PlaybackConfig};
pub use library::{Hotkey, LibraryError, MacroEntry, MacroLibrary};
pub use sequence::{PlanStep, PlaybackPlan};
pub use structured::{
    decode, encode, try_decode, DecodeError, MacroView, PriceModifierRow, StructuredMacro,
};
