//! Error types for score-sheet parsing and history lookup.

use thiserror::Error;

/// Errors raised while turning score sheets into game records and tables.
#[derive(Debug, Error)]
pub enum WondersError {
    /// A sheet could not be interpreted as a game (missing rows, bad cells,
    /// ambiguous player names). No partial record is produced.
    #[error("malformed sheet '{sheet}': {reason}")]
    MalformedInput { sheet: String, reason: String },

    /// `GameCollection::lookup` was given a key that is neither "victors",
    /// a civ-side label nor a player name.
    #[error("no history found for '{key}'")]
    NotFound { key: String },

    #[error("failed to read workbook: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse sheet CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl WondersError {
    pub(crate) fn malformed(sheet: &str, reason: impl Into<String>) -> Self {
        WondersError::MalformedInput {
            sheet: sheet.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WondersError>;
