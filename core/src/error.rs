//! Error types for ticket code operations.

use std::fmt;
use thiserror::Error;

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

/// A logical field of a ticket record, used to report range violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Grade component of the affiliation (thousands digit).
    Grade,
    /// Class component of the affiliation (hundreds digit).
    Class,
    /// Number component of the affiliation (last two digits).
    Number,
    /// Ticket-holder relationship category.
    Relationship,
    /// Ticket type.
    TicketType,
    /// Performance id.
    Performance,
    /// Schedule (session/round) id.
    Schedule,
    /// Sequence number within a group.
    Serial,
}

impl Field {
    /// Field name as used in error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grade => "affiliation.grade",
            Self::Class => "affiliation.class",
            Self::Number => "affiliation.number",
            Self::Relationship => "relationship",
            Self::TicketType => "type",
            Self::Performance => "performance",
            Self::Schedule => "schedule",
            Self::Serial => "serial",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error taxonomy for the ticket codec.
///
/// Decoding and signature verification never return these: a malformed or
/// forged code is reported as `None`/`false` so callers cannot learn why it
/// was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    // ═══════════════════════════════════════════════════════════
    // Validation Errors
    // ═══════════════════════════════════════════════════════════

    /// A record field does not fit its declared range.
    #[error("{field} out of range: {value} (valid range {min}..={max})")]
    FieldOutOfRange {
        /// Offending field
        field: Field,
        /// Value that was supplied
        value: u32,
        /// Smallest accepted value
        min: u32,
        /// Largest accepted value
        max: u32,
    },

    // ═══════════════════════════════════════════════════════════
    // Configuration Errors
    // ═══════════════════════════════════════════════════════════

    /// Configuration value is missing or malformed.
    #[error("Invalid configuration for {key}: {reason}")]
    InvalidConfig {
        /// Configuration key (usually the environment variable name)
        key: &'static str,
        /// What is wrong with it
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════
    // Credential Errors
    // ═══════════════════════════════════════════════════════════

    /// Bearer credential is not of the form `<code>.<signature>`.
    #[error("Malformed ticket credential")]
    MalformedCredential,

    /// Signature text is not URL-safe base64 of a 64-byte signature.
    #[error("Invalid signature encoding")]
    InvalidSignatureEncoding,

    // ═══════════════════════════════════════════════════════════
    // System Errors
    // ═══════════════════════════════════════════════════════════

    /// Serialization of a signed payload failed.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl CodecError {
    /// Shorthand for building an [`CodecError::InvalidConfig`].
    pub(crate) fn config(key: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            key,
            reason: reason.into(),
        }
    }

    /// Returns `true` if this error was caused by an out-of-range record.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ticket_codec_core::{CodecError, Field};
    /// let err = CodecError::FieldOutOfRange { field: Field::Serial, value: 16, min: 0, max: 15 };
    /// assert!(err.is_validation_error());
    /// assert!(!CodecError::MalformedCredential.is_validation_error());
    /// ```
    #[must_use]
    pub const fn is_validation_error(&self) -> bool {
        matches!(self, Self::FieldOutOfRange { .. })
    }

    /// Returns `true` if this error is a startup/configuration failure.
    ///
    /// Configuration errors are fatal: the service must not issue or accept
    /// tickets until they are fixed.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_out_of_range_message_names_field_and_range() {
        let err = CodecError::FieldOutOfRange {
            field: Field::Schedule,
            value: 64,
            min: 0,
            max: 63,
        };
        assert_eq!(
            err.to_string(),
            "schedule out of range: 64 (valid range 0..=63)"
        );
    }

    #[test]
    fn test_error_categories() {
        let config = CodecError::config("BASE58_ALPHABET", "must be 58 symbols");
        assert!(config.is_config_error());
        assert!(!config.is_validation_error());
        assert!(!CodecError::InvalidSignatureEncoding.is_config_error());
    }
}
