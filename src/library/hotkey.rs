use super::LibraryError;
use std::fmt;
use std::str::FromStr;

/// Stored in place of a hotkey when a macro has none
pub const NO_HOTKEY: &str = "Brak";

/// Individual shortcut of a macro: optional modifiers plus F1-F12
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hotkey {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    /// Function key number, 1..=12
    pub function_key: u8,
}

impl Hotkey {
    pub fn new(function_key: u8) -> Result<Self, LibraryError> {
        if !(1..=12).contains(&function_key) {
            return Err(LibraryError::InvalidHotkey(format!("F{}", function_key)));
        }
        Ok(Self {
            ctrl: false,
            alt: false,
            shift: false,
            function_key,
        })
    }

    /// Parse the stored form; `Brak` or an empty string mean no hotkey
    pub fn parse_stored(s: &str) -> Result<Option<Self>, LibraryError> {
        let s = s.trim();
        if s.is_empty() || s == NO_HOTKEY {
            return Ok(None);
        }
        s.parse().map(Some)
    }

    /// Stored form of an optional hotkey
    pub fn to_stored(hotkey: Option<&Hotkey>) -> String {
        hotkey
            .map(Hotkey::to_string)
            .unwrap_or_else(|| NO_HOTKEY.to_string())
    }
}

impl FromStr for Hotkey {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LibraryError::InvalidHotkey(s.to_string());
        let mut hotkey = Hotkey {
            ctrl: false,
            alt: false,
            shift: false,
            function_key: 0,
        };

        for part in s.split('+').map(str::trim) {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" => hotkey.ctrl = true,
                "alt" => hotkey.alt = true,
                "shift" => hotkey.shift = true,
                other => {
                    if hotkey.function_key != 0 {
                        return Err(invalid());
                    }
                    let number = other
                        .strip_prefix('f')
                        .and_then(|n| n.parse::<u8>().ok())
                        .filter(|n| (1..=12).contains(n))
                        .ok_or_else(invalid)?;
                    hotkey.function_key = number;
                }
            }
        }

        if hotkey.function_key == 0 {
            return Err(invalid());
        }
        Ok(hotkey)
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("Ctrl+")?;
        }
        if self.alt {
            f.write_str("Alt+")?;
        }
        if self.shift {
            f.write_str("Shift+")?;
        }
        write!(f, "F{}", self.function_key)
    }
}
