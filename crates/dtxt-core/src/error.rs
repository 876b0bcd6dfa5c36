//! Error types for DTXT decoding and encoding.

use thiserror::Error;

/// The single error type for every DTXT codec failure.
///
/// Variants distinguish the failure conditions for diagnostics; all of them are
/// terminal for the call that produced them. Decoding failures carry the byte
/// offset into the source text where the problem was detected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// A character that starts no token.
    #[error("Unexpected character {ch:?} at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    /// A backtick string with no closing backtick.
    #[error("Unterminated string starting at offset {offset}")]
    UnterminatedString { offset: usize },

    /// A token that cannot start a value.
    #[error("Unexpected token in value position at offset {offset}: {found}")]
    UnexpectedToken { found: String, offset: usize },

    /// A member of an object did not start with a key.
    #[error("Expected key at offset {offset}, got {found}")]
    ExpectedKey { found: String, offset: usize },

    /// Required punctuation is missing.
    #[error("Expected {expected} at offset {offset}, got {found}")]
    Expected {
        expected: &'static str,
        found: String,
        offset: usize,
    },

    /// The document does not start with an object.
    #[error("Root value must be an object, got {found} at offset {offset}")]
    RootNotObject { found: String, offset: usize },

    /// The same key appears twice in one object.
    #[error("Duplicate key: {key} at offset {offset}")]
    DuplicateKey { key: String, offset: usize },

    /// Tokens remain after the root object was closed.
    #[error("Trailing data after root object at offset {offset}: {found}")]
    TrailingData { found: String, offset: usize },

    /// A numeric literal whose value cannot be represented (e.g. `1e999`).
    #[error("Number out of range: {lexeme} at offset {offset}")]
    NumberOutOfRange { lexeme: String, offset: usize },

    /// A constructor whose payload does not fit its type.
    #[error("Invalid {constructor} payload: {payload:?} at offset {offset}")]
    InvalidPayload {
        constructor: &'static str,
        payload: String,
        offset: usize,
    },

    /// A constructor name outside the closed `D` / `BN` / `B` table.
    #[error("Unknown constructor: {name} at offset {offset}")]
    UnknownConstructor { name: String, offset: usize },

    /// Objects and arrays nest deeper than the configured limit.
    #[error("Nesting depth exceeds limit of {limit} at offset {offset}")]
    NestingTooDeep { limit: usize, offset: usize },

    /// The source text is longer than the configured limit.
    #[error("Input of {len} bytes exceeds limit of {limit} bytes")]
    InputTooLarge { len: usize, limit: usize },

    /// A value the text format cannot express (encoding path).
    #[error("Unsupported value for serialization: {0}")]
    Unsupported(String),
}

impl FormatError {
    /// Byte offset into the decoded text, for errors that have one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            FormatError::UnexpectedChar { offset, .. }
            | FormatError::UnterminatedString { offset }
            | FormatError::UnexpectedToken { offset, .. }
            | FormatError::ExpectedKey { offset, .. }
            | FormatError::Expected { offset, .. }
            | FormatError::RootNotObject { offset, .. }
            | FormatError::DuplicateKey { offset, .. }
            | FormatError::TrailingData { offset, .. }
            | FormatError::NumberOutOfRange { offset, .. }
            | FormatError::InvalidPayload { offset, .. }
            | FormatError::UnknownConstructor { offset, .. }
            | FormatError::NestingTooDeep { offset, .. } => Some(*offset),
            FormatError::InputTooLarge { .. } | FormatError::Unsupported(_) => None,
        }
    }
}

/// Convenience alias used throughout dtxt-core.
pub type Result<T> = std::result::Result<T, FormatError>;
