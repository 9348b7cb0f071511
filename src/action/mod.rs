//! Primitive playback actions
//!
//! A macro is an ordered list of these. The playback engine replays them
//! verbatim; everything in this crate only builds, reads and stores them.

pub mod legacy;

pub use legacy::convert_legacy;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const TAB: &str = "tab";
pub const ENTER: &str = "enter";
pub const SHIFT_TAB: &str = "shift+tab";
pub const CTRL_TAB: &str = "ctrl+tab";
pub const UP: &str = "up";
pub const DOWN: &str = "down";
pub const LEFT: &str = "left";
pub const RIGHT: &str = "right";

/// One step of a macro, stored as `{"type": ..., "value": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Named key or chord, e.g. `tab` or `shift+tab`
    Key { value: String },
    /// Literal text to type (may be empty)
    Text { value: String },
    /// Click the centre of an image found on screen
    ClickImage {
        value: String,
        #[serde(default = "default_confidence")]
        confidence: f64,
    },
    /// Scroll until an image is found, then click it
    ScrollClick {
        value: String,
        #[serde(default = "default_confidence")]
        confidence: f64,
    },
}

fn default_confidence() -> f64 {
    0.8
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActionError {
    #[error("Confidence {0} is outside 0.0..=1.0")]
    InvalidConfidence(f64),
    #[error("Key action needs a key name")]
    EmptyKey,
    #[error("Image action needs an image path")]
    EmptyImagePath,
    #[error("Unknown action '{0}'; expected key:, text:, click_image: or scroll_click:")]
    UnknownKind(String),
}

impl Action {
    pub fn key(name: impl Into<String>) -> Self {
        Action::Key { value: name.into() }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Action::Text {
            value: value.into(),
        }
    }

    /// True if this is exactly `Key(name)`
    pub fn is_key(&self, name: &str) -> bool {
        matches!(self, Action::Key { value } if value == name)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Action::Text { value } => Some(value),
            _ => None,
        }
    }

    /// Short kind label used in logs and listings
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Key { .. } => "key",
            Action::Text { .. } => "text",
            Action::ClickImage { .. } => "click_image",
            Action::ScrollClick { .. } => "scroll_click",
        }
    }

    pub fn confidence(&self) -> Option<f64> {
        match self {
            Action::ClickImage { confidence, .. } | Action::ScrollClick { confidence, .. } => {
                Some(*confidence)
            }
            _ => None,
        }
    }

    /// Check the action can be played back
    pub fn validate(&self) -> Result<(), ActionError> {
        match self {
            Action::Key { value } if value.trim().is_empty() => Err(ActionError::EmptyKey),
            Action::ClickImage { value, confidence } | Action::ScrollClick { value, confidence } => {
                if value.trim().is_empty() {
                    return Err(ActionError::EmptyImagePath);
                }
                if !(0.0..=1.0).contains(confidence) {
                    return Err(ActionError::InvalidConfidence(*confidence));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// Parses the `kind:value` form, e.g. `key:shift+tab`, `text:EUR` or
/// `click_image:button.png@0.9`. Image actions without `@confidence` use 0.8.
impl FromStr for Action {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, value) = s
            .split_once(':')
            .ok_or_else(|| ActionError::UnknownKind(s.to_string()))?;

        let image = |value: &str| match value.rsplit_once('@') {
            Some((path, confidence)) => match confidence.trim().parse::<f64>() {
                Ok(confidence) => (path.to_string(), confidence),
                Err(_) => (value.to_string(), default_confidence()),
            },
            None => (value.to_string(), default_confidence()),
        };

        let action = match kind.trim() {
            "key" => Action::key(value.trim().to_ascii_lowercase()),
            "text" => Action::text(value),
            "click_image" => {
                let (value, confidence) = image(value);
                Action::ClickImage { value, confidence }
            }
            "scroll_click" => {
                let (value, confidence) = image(value);
                Action::ScrollClick { value, confidence }
            }
            other => return Err(ActionError::UnknownKind(other.to_string())),
        };
        action.validate()?;
        Ok(action)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Key { value } => write!(f, "Key({})", value),
            Action::Text { value } => write!(f, "Text({:?})", value),
            Action::ClickImage { value, confidence } => {
                write!(f, "ClickImage({}, {})", value, confidence)
            }
            Action::ScrollClick { value, confidence } => {
                write!(f, "ScrollClick({}, {})", value, confidence)
            }
        }
    }
}
