//! Tokenizer configuration
//!
//! The delimiter, ignore byte and case shift are plain values that can be
//! changed between any two fed bytes. They can also be loaded from a JSON
//! document, e.g. one stored in flash next to the firmware.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tokenizer::TokenizerError;

/// Quote character. Toggles quoted mode and is never stored.
pub const QUOTE: u8 = b'"';

/// Case conversion applied to every stored byte
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftMode {
    /// Store bytes unchanged
    #[default]
    None,
    /// Convert ASCII letters to lowercase
    Lower,
    /// Convert ASCII letters to uppercase
    Upper,
}

impl ShiftMode {
    /// Apply the shift to a single byte. Non-ASCII bytes pass through.
    #[inline]
    pub fn apply(self, byte: u8) -> u8 {
        match self {
            ShiftMode::None => byte,
            ShiftMode::Lower => byte.to_ascii_lowercase(),
            ShiftMode::Upper => byte.to_ascii_uppercase(),
        }
    }
}

/// Numeric shift codes used on the wire by serial consoles:
/// 0 = none, 1 = lower, 2 = upper.
impl TryFrom<u8> for ShiftMode {
    type Error = TokenizerError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ShiftMode::None),
            1 => Ok(ShiftMode::Lower),
            2 => Ok(ShiftMode::Upper),
            other => Err(TokenizerError::InvalidShift(other)),
        }
    }
}

/// Delimiter-mode configuration of a tokenizer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizerConfig {
    /// Byte that ends a token
    #[serde(default = "default_delimiter")]
    pub delimiter: u8,

    /// Byte dropped outside quotes (`None` disables filtering)
    #[serde(default)]
    pub ignore: Option<u8>,

    /// Case conversion for stored bytes
    #[serde(default)]
    pub shift: ShiftMode,
}

fn default_delimiter() -> u8 {
    b'\n'
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            ignore: None,
            shift: ShiftMode::None,
        }
    }
}

impl TokenizerConfig {
    /// Parse configuration from JSON bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config_str =
            std::str::from_utf8(bytes).map_err(|e| ConfigError::InvalidUtf8(e.to_string()))?;

        serde_json::from_str(config_str).map_err(|e| ConfigError::InvalidJson(e.to_string()))
    }

    /// Check whether `byte` is filtered by the ignore setting
    #[inline]
    pub fn is_ignored(&self, byte: u8) -> bool {
        self.ignore == Some(byte)
    }
}

/// Configuration parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid UTF-8: {0}")]
    InvalidUtf8(String),
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
}
