/*!
 * Error types for the samiconv crate.
 *
 * Parse-level failures abort the whole conversion and carry enough context
 * (cue index, byte offset) to locate the fault in the source markup.
 * Everything after a successful parse is infallible by construction.
 */

use thiserror::Error;

/// Errors that abort parsing of a SAMI document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SamiError {
    /// Missing or unmatched head/body structure, or a body without any sync tag
    #[error("Structural parse error at byte {offset}: {message}")]
    StructuralParse {
        /// What is missing or unmatched
        message: String,
        /// Byte offset in the input where the problem was detected
        offset: usize,
    },

    /// A sync tag whose `start` attribute is missing or not an integer
    #[error("Malformed cue #{cue_index} at byte {offset}: {message}")]
    MalformedCue {
        /// Zero-based index of the cue in document order
        cue_index: usize,
        /// Byte offset of the cue's sync tag in the input
        offset: usize,
        /// Description of the timing problem
        message: String,
    },
}

impl SamiError {
    pub(crate) fn structural(message: impl Into<String>, offset: usize) -> Self {
        Self::StructuralParse {
            message: message.into(),
            offset,
        }
    }
}

/// Errors raised when reading a textual time code
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeCodeError {
    #[error("Invalid time code: {0}")]
    Invalid(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Error from SAMI parsing
    #[error("SAMI error: {0}")]
    Sami(#[from] SamiError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
