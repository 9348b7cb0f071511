//! Macro file persistence
//!
//! The macro file is a CSV with one macro per row: name, hotkey and the
//! action list as a JSON array. Two older layouts are still read:
//! - the same columns with a JSON array of marker strings (`"{TAB}"`, ...)
//! - no hotkey/actions columns at all: the name followed by one marker per column
//!
//! Saving always writes the current layout.

use super::{Hotkey, LibraryError, MacroEntry, MacroLibrary};
use crate::action::{convert_legacy, Action};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

pub const NAME_COLUMN: &str = "nazwa_makra";
pub const HOTKEY_COLUMN: &str = "hotkey";
pub const ACTIONS_COLUMN: &str = "akcje";

/// Layout a macro file was read in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroFormat {
    Current,
    /// Current columns, but at least one action list held marker strings
    LegacyMarkers,
    /// Name followed by marker columns
    LegacyColumns,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub format: MacroFormat,
    /// The file did not exist and was created empty
    pub created: bool,
    /// Rows whose action list could not be read; the next save drops them
    pub skipped: Vec<String>,
}

impl LoadReport {
    /// Whether the next save rewrites the file in the current layout
    pub fn needs_upgrade(&self) -> bool {
        self.format != MacroFormat::Current
    }
}

/// Load the macro file, creating an empty one if it does not exist
pub fn load(path: &Path) -> Result<(MacroLibrary, LoadReport), LibraryError> {
    if !path.exists() {
        info!(
            "Macro file not found, creating empty file: {}",
            path.display()
        );
        let library = MacroLibrary::new();
        save(path, &library)?;
        let report = LoadReport {
            format: MacroFormat::Current,
            created: true,
            skipped: Vec::new(),
        };
        return Ok((library, report));
    }

    debug!("Loading macros from: {}", path.display());
    let csv_error = |source: csv::Error| LibraryError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;
    let headers = reader.headers().map_err(csv_error)?.clone();
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);

    let mut library = MacroLibrary::new();
    let mut skipped = Vec::new();
    if headers.is_empty() {
        debug!("Macro file is empty: {}", path.display());
        let report = LoadReport {
            format: MacroFormat::Current,
            created: false,
            skipped: Vec::new(),
        };
        return Ok((library, report));
    }

    let format = match (column(HOTKEY_COLUMN), column(ACTIONS_COLUMN)) {
        (Some(hotkey_idx), Some(actions_idx)) => {
            let name_idx = column(NAME_COLUMN).unwrap_or(0);
            let mut format = MacroFormat::Current;

            for record in reader.records() {
                let record = record.map_err(csv_error)?;
                let name = record.get(name_idx).unwrap_or_default().trim();
                if name.is_empty() {
                    continue;
                }

                let hotkey = parse_hotkey(name, record.get(hotkey_idx).unwrap_or_default());
                let loaded = parse_actions(name, record.get(actions_idx).unwrap_or("[]"))
                    .and_then(|(actions, legacy)| {
                        let entry = MacroEntry::new(actions).with_hotkey(hotkey);
                        library.insert(name, entry, true).map(|_| legacy)
                    });
                match loaded {
                    Ok(true) => format = MacroFormat::LegacyMarkers,
                    Ok(false) => {}
                    Err(e) => {
                        warn!("Skipping macro '{}': {}", name, e);
                        skipped.push(name.to_string());
                    }
                }
            }
            format
        }
        _ => {
            for record in reader.records() {
                let record = record.map_err(csv_error)?;
                let mut fields = record.iter().map(str::trim);
                let name = match fields.next() {
                    Some(name) if !name.is_empty() => name.to_string(),
                    _ => continue,
                };
                let markers: Vec<&str> = fields.collect();
                library.insert(&name, MacroEntry::new(convert_legacy(&markers)), true)?;
            }
            MacroFormat::LegacyColumns
        }
    };

    if format != MacroFormat::Current {
        info!(
            "Macro file {} uses an older format; it will be upgraded on the next save",
            path.display()
        );
    }
    info!("Loaded {} macros from: {}", library.len(), path.display());

    Ok((
        library,
        LoadReport {
            format,
            created: false,
            skipped,
        },
    ))
}

/// Write the library in the current layout, sorted by name
pub fn save(path: &Path, library: &MacroLibrary) -> Result<(), LibraryError> {
    let io_error = |source: std::io::Error| LibraryError::Io {
        path: path.to_path_buf(),
        source,
    };
    let csv_error = |source: csv::Error| LibraryError::Csv {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
    }

    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    writer
        .write_record([NAME_COLUMN, HOTKEY_COLUMN, ACTIONS_COLUMN])
        .map_err(csv_error)?;

    for (name, entry) in library.iter() {
        let actions = serde_json::to_string(&entry.actions).map_err(|source| {
            LibraryError::Json {
                name: name.to_string(),
                source,
            }
        })?;
        let hotkey = Hotkey::to_stored(entry.hotkey.as_ref());
        writer
            .write_record([name, hotkey.as_str(), actions.as_str()])
            .map_err(csv_error)?;
    }

    writer.flush().map_err(io_error)?;
    info!("Saved {} macros to: {}", library.len(), path.display());
    Ok(())
}

fn parse_hotkey(name: &str, raw: &str) -> Option<Hotkey> {
    match Hotkey::parse_stored(raw) {
        Ok(hotkey) => hotkey,
        Err(e) => {
            warn!("Ignoring hotkey of macro '{}': {}", name, e);
            None
        }
    }
}

/// Parse an action list; the flag is set when it held legacy marker strings
fn parse_actions(name: &str, raw: &str) -> Result<(Vec<Action>, bool), LibraryError> {
    let raw = if raw.trim().is_empty() { "[]" } else { raw };
    match serde_json::from_str::<Vec<Action>>(raw) {
        Ok(actions) => Ok((actions, false)),
        Err(source) => match serde_json::from_str::<Vec<String>>(raw) {
            Ok(markers) => {
                debug!("Converting marker strings of macro '{}'", name);
                Ok((convert_legacy(&markers), true))
            }
            Err(_) => Err(LibraryError::Json {
                name: name.to_string(),
                source,
            }),
        },
    }
}
