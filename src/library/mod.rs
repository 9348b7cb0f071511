//! Named macro collection and its persistence
//!
//! This module provides:
//! - The in-memory library keyed by macro name
//! - Hotkey representation as stored next to each macro
//! - Loading and saving the CSV macro file, including older formats

pub mod hotkey;
pub mod storage;

pub use hotkey::{Hotkey, NO_HOTKEY};
pub use storage::{LoadReport, MacroFormat};

use crate::action::{Action, ActionError};
use crate::structured::{encode, FieldError, MacroView, StructuredMacro};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

/// Prefix of names given to copied macros, as written by older versions too
pub const COPY_PREFIX: &str = "Kopia";

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Macro name must not be empty")]
    EmptyName,
    #[error("Macro '{0}' already exists")]
    AlreadyExists(String),
    #[error("Macro '{0}' not found")]
    NotFound(String),
    #[error("No macros selected")]
    NothingSelected,
    #[error("Invalid hotkey: {0}")]
    InvalidHotkey(String),
    #[error("Macro '{name}' has no action at position {index} ({len} actions)")]
    ActionOutOfRange {
        name: String,
        index: usize,
        len: usize,
    },
    #[error("Macro '{0}' is not a structured macro")]
    NotStructured(String),
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error("Failed to access macro file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed macro file {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Invalid action list for macro '{name}': {source}")]
    Json {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// One stored macro
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MacroEntry {
    pub hotkey: Option<Hotkey>,
    pub actions: Vec<Action>,
}

impl MacroEntry {
    pub fn new(actions: Vec<Action>) -> Self {
        Self {
            hotkey: None,
            actions,
        }
    }

    pub fn with_hotkey(mut self, hotkey: Option<Hotkey>) -> Self {
        self.hotkey = hotkey;
        self
    }

    pub fn validate(&self) -> Result<(), ActionError> {
        self.actions.iter().try_for_each(Action::validate)
    }

    /// Structured or freeform view of the actions
    pub fn view(&self) -> MacroView {
        MacroView::from_actions(&self.actions)
    }
}

/// Macros ordered by name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacroLibrary {
    macros: BTreeMap<String, MacroEntry>,
}

impl MacroLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Result<&MacroEntry, LibraryError> {
        self.macros
            .get(name)
            .ok_or_else(|| LibraryError::NotFound(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.macros.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MacroEntry)> {
        self.macros.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Add or replace a macro
    ///
    /// The name is trimmed. An existing macro is only replaced when
    /// `overwrite` is set. Every action must pass [`Action::validate`].
    pub fn insert(
        &mut self,
        name: &str,
        entry: MacroEntry,
        overwrite: bool,
    ) -> Result<(), LibraryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LibraryError::EmptyName);
        }
        if !overwrite && self.macros.contains_key(name) {
            return Err(LibraryError::AlreadyExists(name.to_string()));
        }
        entry.validate()?;
        debug!("Storing macro '{}' ({} actions)", name, entry.actions.len());
        self.macros.insert(name.to_string(), entry);
        Ok(())
    }

    /// Encode a structured macro and store it under `name`, keeping its hotkey
    pub fn save_structured(
        &mut self,
        name: &str,
        structured: &StructuredMacro,
        overwrite: bool,
    ) -> Result<(), LibraryError> {
        let hotkey = self.macros.get(name.trim()).and_then(|entry| entry.hotkey);
        let entry = MacroEntry::new(encode(structured)).with_hotkey(hotkey);
        self.insert(name, entry, overwrite)
    }

    pub fn remove(&mut self, name: &str) -> Result<MacroEntry, LibraryError> {
        let entry = self
            .macros
            .remove(name)
            .ok_or_else(|| LibraryError::NotFound(name.to_string()))?;
        info!("Deleted macro '{}'", name);
        Ok(entry)
    }

    pub fn rename(&mut self, old: &str, new: &str, overwrite: bool) -> Result<(), LibraryError> {
        let new = new.trim();
        if new.is_empty() {
            return Err(LibraryError::EmptyName);
        }
        if old == new {
            return self.get(old).map(|_| ());
        }
        if !self.macros.contains_key(old) {
            return Err(LibraryError::NotFound(old.to_string()));
        }
        if !overwrite && self.macros.contains_key(new) {
            return Err(LibraryError::AlreadyExists(new.to_string()));
        }
        let entry = self.remove(old)?;
        self.macros.insert(new.to_string(), entry);
        info!("Renamed macro '{}' to '{}'", old, new);
        Ok(())
    }

    fn entry_mut(&mut self, name: &str) -> Result<&mut MacroEntry, LibraryError> {
        self.macros
            .get_mut(name)
            .ok_or_else(|| LibraryError::NotFound(name.to_string()))
    }

    /// Set or clear the hotkey of a macro, returning the previous one
    pub fn set_hotkey(
        &mut self,
        name: &str,
        hotkey: Option<Hotkey>,
    ) -> Result<Option<Hotkey>, LibraryError> {
        let entry = self.entry_mut(name)?;
        let previous = std::mem::replace(&mut entry.hotkey, hotkey);
        info!(
            "Hotkey of macro '{}' set to {}",
            name,
            Hotkey::to_stored(hotkey.as_ref())
        );
        Ok(previous)
    }

    /// Insert an action before position `index`; `index == len` appends
    pub fn insert_action(
        &mut self,
        name: &str,
        index: usize,
        action: Action,
    ) -> Result<(), LibraryError> {
        action.validate()?;
        let entry = self.entry_mut(name)?;
        let len = entry.actions.len();
        if index > len {
            return Err(LibraryError::ActionOutOfRange {
                name: name.to_string(),
                index,
                len,
            });
        }
        debug!("Inserting {} into '{}' at {}", action, name, index);
        entry.actions.insert(index, action);
        Ok(())
    }

    /// Replace the action at `index`, returning the old one
    pub fn replace_action(
        &mut self,
        name: &str,
        index: usize,
        action: Action,
    ) -> Result<Action, LibraryError> {
        action.validate()?;
        let slot = self.action_mut(name, index)?;
        debug!("Replacing {} in '{}' at {} with {}", slot, name, index, action);
        Ok(std::mem::replace(slot, action))
    }

    pub fn remove_action(&mut self, name: &str, index: usize) -> Result<Action, LibraryError> {
        self.action_mut(name, index)?;
        let removed = self.entry_mut(name)?.actions.remove(index);
        debug!("Removed {} from '{}' at {}", removed, name, index);
        Ok(removed)
    }

    fn action_mut(&mut self, name: &str, index: usize) -> Result<&mut Action, LibraryError> {
        let entry = self.entry_mut(name)?;
        let len = entry.actions.len();
        entry
            .actions
            .get_mut(index)
            .ok_or_else(|| LibraryError::ActionOutOfRange {
                name: name.to_string(),
                index,
                len,
            })
    }

    /// Change one form field of a structured macro, e.g. `currency_pair`
    /// or `2.multiplier`, and re-encode it
    pub fn set_structured_field(
        &mut self,
        name: &str,
        field: &str,
        value: &str,
    ) -> Result<(), LibraryError> {
        let entry = self.entry_mut(name)?;
        let MacroView::Structured(mut structured) = entry.view() else {
            return Err(LibraryError::NotStructured(name.to_string()));
        };
        structured.set_by_name(field, value)?;
        entry.actions = encode(&structured);
        info!("Set {} of structured macro '{}'", field, name);
        Ok(())
    }

    /// Copy a macro under the first free `Kopia` name; the copy has no hotkey
    pub fn duplicate(&mut self, name: &str) -> Result<String, LibraryError> {
        let actions = self.get(name)?.actions.clone();

        let mut copy_name = format!("{} {}", COPY_PREFIX, name);
        let mut counter = 2;
        while self.macros.contains_key(&copy_name) {
            copy_name = format!("{} {} ({})", COPY_PREFIX, name, counter);
            counter += 1;
        }

        self.macros
            .insert(copy_name.clone(), MacroEntry::new(actions));
        info!("Copied macro '{}' to '{}'", name, copy_name);
        Ok(copy_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(text: &str) -> MacroEntry {
        MacroEntry::new(vec![Action::text(text), Action::key("enter")])
    }

    #[test]
    fn test_insert_and_get() {
        let mut library = MacroLibrary::new();
        library.insert(" prices ", entry("a"), false).unwrap();
        assert!(library.contains("prices"));
        assert_eq!(library.get("prices").unwrap(), &entry("a"));
        assert!(matches!(
            library.get("missing"),
            Err(LibraryError::NotFound(_))
        ));
    }

    #[test]
    fn test_insert_requires_overwrite() {
        let mut library = MacroLibrary::new();
        library.insert("prices", entry("a"), false).unwrap();
        let err = library.insert("prices", entry("b"), false).unwrap_err();
        assert!(matches!(err, LibraryError::AlreadyExists(ref n) if n == "prices"));
        library.insert("prices", entry("b"), true).unwrap();
        assert_eq!(library.get("prices").unwrap(), &entry("b"));
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut library = MacroLibrary::new();
        assert!(matches!(
            library.insert("   ", entry("a"), false),
            Err(LibraryError::EmptyName)
        ));
    }

    #[test]
    fn test_names_are_sorted() {
        let mut library = MacroLibrary::new();
        for name in ["zeta", "alpha", "mid"] {
            library.insert(name, entry(name), false).unwrap();
        }
        let names: Vec<&str> = library.names().collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_rename() {
        let mut library = MacroLibrary::new();
        library.insert("old", entry("a"), false).unwrap();
        library.insert("taken", entry("b"), false).unwrap();

        assert!(matches!(
            library.rename("old", "taken", false),
            Err(LibraryError::AlreadyExists(_))
        ));
        library.rename("old", "new", false).unwrap();
        assert!(!library.contains("old"));
        assert_eq!(library.get("new").unwrap(), &entry("a"));

        library.rename("new", "taken", true).unwrap();
        assert_eq!(library.len(), 1);
        assert_eq!(library.get("taken").unwrap(), &entry("a"));

        assert!(matches!(
            library.rename("ghost", "x", false),
            Err(LibraryError::NotFound(_))
        ));
    }

    #[test]
    fn test_duplicate_naming() {
        let mut library = MacroLibrary::new();
        let original = entry("a").with_hotkey(Some(Hotkey::new(4).unwrap()));
        library.insert("prices", original, false).unwrap();

        assert_eq!(library.duplicate("prices").unwrap(), "Kopia prices");
        assert_eq!(library.duplicate("prices").unwrap(), "Kopia prices (2)");
        assert_eq!(library.duplicate("prices").unwrap(), "Kopia prices (3)");

        let copy = library.get("Kopia prices").unwrap();
        assert_eq!(copy.hotkey, None);
        assert_eq!(copy.actions, entry("a").actions);
    }

    #[test]
    fn test_save_structured_keeps_hotkey() {
        let mut library = MacroLibrary::new();
        let hotkey = Some(Hotkey::new(2).unwrap());
        library
            .insert("feed", entry("x").with_hotkey(hotkey), false)
            .unwrap();

        let mut structured = StructuredMacro::reference_layout();
        structured.result_file = "out.csv".to_string();
        library.save_structured("feed", &structured, true).unwrap();

        let stored = library.get("feed").unwrap();
        assert_eq!(stored.hotkey, hotkey);
        assert_eq!(stored.view(), MacroView::Structured(structured));
    }

    #[test]
    fn test_remove() {
        let mut library = MacroLibrary::new();
        library.insert("a", entry("a"), false).unwrap();
        assert_eq!(library.remove("a").unwrap(), entry("a"));
        assert!(library.is_empty());
        assert!(library.remove("a").is_err());
    }

    #[test]
    fn test_set_hotkey() {
        let mut library = MacroLibrary::new();
        library.insert("a", entry("a"), false).unwrap();

        let f5: Hotkey = "Ctrl+F5".parse().unwrap();
        assert_eq!(library.set_hotkey("a", Some(f5)).unwrap(), None);
        assert_eq!(library.get("a").unwrap().hotkey, Some(f5));
        assert_eq!(library.set_hotkey("a", None).unwrap(), Some(f5));
        assert_eq!(library.get("a").unwrap().hotkey, None);
        assert!(matches!(
            library.set_hotkey("ghost", None),
            Err(LibraryError::NotFound(_))
        ));
    }

    #[test]
    fn test_insert_action_positions() {
        let mut library = MacroLibrary::new();
        library.insert("m", MacroEntry::default(), false).unwrap();

        library.insert_action("m", 0, Action::text("b")).unwrap();
        library.insert_action("m", 0, Action::text("a")).unwrap();
        library.insert_action("m", 2, Action::key("enter")).unwrap();
        assert_eq!(
            library.get("m").unwrap().actions,
            vec![Action::text("a"), Action::text("b"), Action::key("enter")]
        );

        let err = library.insert_action("m", 4, Action::text("x")).unwrap_err();
        assert!(matches!(
            err,
            LibraryError::ActionOutOfRange { index: 4, len: 3, .. }
        ));
    }

    #[test]
    fn test_replace_and_remove_action() {
        let mut library = MacroLibrary::new();
        library.insert("m", entry("a"), false).unwrap();

        let old = library.replace_action("m", 0, Action::text("z")).unwrap();
        assert_eq!(old, Action::text("a"));
        let removed = library.remove_action("m", 1).unwrap();
        assert_eq!(removed, Action::key("enter"));
        assert_eq!(library.get("m").unwrap().actions, vec![Action::text("z")]);

        assert!(library.remove_action("m", 1).is_err());
        assert!(library.replace_action("m", 5, Action::text("q")).is_err());
        assert!(matches!(
            library.remove_action("ghost", 0),
            Err(LibraryError::NotFound(_))
        ));
    }

    #[test]
    fn test_image_confidence_is_validated() {
        let mut library = MacroLibrary::new();
        library.insert("m", MacroEntry::default(), false).unwrap();
        let image = |confidence| Action::ClickImage {
            value: "ok.png".to_string(),
            confidence,
        };

        let err = library.insert_action("m", 0, image(1.2)).unwrap_err();
        assert!(matches!(
            err,
            LibraryError::Action(ActionError::InvalidConfidence(_))
        ));
        assert!(library
            .insert("bad", MacroEntry::new(vec![image(-0.5)]), false)
            .is_err());
        assert!(!library.contains("bad"));

        library.insert_action("m", 0, image(0.9)).unwrap();
        assert_eq!(library.get("m").unwrap().actions.len(), 1);
    }

    #[test]
    fn test_set_structured_field() {
        let mut library = MacroLibrary::new();
        let hotkey = Some(Hotkey::new(3).unwrap());
        library
            .save_structured("feed", &StructuredMacro::reference_layout(), false)
            .unwrap();
        library.set_hotkey("feed", hotkey).unwrap();

        library
            .set_structured_field("feed", "currency_pair", " EUR ")
            .unwrap();
        library
            .set_structured_field("feed", "0.multiplier", "1.4")
            .unwrap();

        let stored = library.get("feed").unwrap();
        assert_eq!(stored.hotkey, hotkey);
        let MacroView::Structured(structured) = stored.view() else {
            panic!("Expected structured view");
        };
        assert_eq!(structured.currency_pair, "EUR");
        assert_eq!(structured.price_modifiers[0].multiplier, "1.4");

        assert!(matches!(
            library.set_structured_field("feed", "vat", "23"),
            Err(LibraryError::Field(_))
        ));
        library.insert("plain", entry("x"), false).unwrap();
        assert!(matches!(
            library.set_structured_field("plain", "currency_pair", "EUR"),
            Err(LibraryError::NotStructured(_))
        ));
    }
}
