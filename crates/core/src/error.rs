// crates/core/src/error.rs
use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a file was left out of the count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The file is not valid UTF-8.
    DecodeError,
    /// Brackets do not pair up after normalization.
    MalformedBrackets,
}

impl SkipReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DecodeError => "decode_error",
            Self::MalformedBrackets => "malformed_brackets",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural failure reported by the flattening engine.
///
/// Positions are byte indices into the normalized text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlattenError {
    #[error("unexpected '{found}' at {position}: no bracket is open")]
    UnexpectedClose { found: char, position: usize },

    #[error("'{found}' at {position} does not close '{open}' opened at {opened_at}")]
    Mismatched {
        open: char,
        found: char,
        position: usize,
        opened_at: usize,
    },

    #[error("{pending} bracket(s) left open at end of input, innermost '{open}' at {opened_at}")]
    Unclosed {
        open: char,
        opened_at: usize,
        pending: usize,
    },
}

impl From<&FlattenError> for SkipReason {
    fn from(_: &FlattenError) -> Self {
        Self::MalformedBrackets
    }
}

impl From<FlattenError> for SkipReason {
    fn from(err: FlattenError) -> Self {
        Self::from(&err)
    }
}
