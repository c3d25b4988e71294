use crate::temporal::TemporalKind;
use thiserror::Error as ThisError;

///
/// CodecError
///
/// Failures local to a single encode/decode call. All variants identify
/// the offending key; none are retried internally because the operations
/// are deterministic and a retry would reproduce the identical error.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum CodecError {
    /// A field name contains the reserved path separator, so its
    /// flattened key could not be reversed unambiguously.
    #[error("field segment '{segment}' in '{key}' contains reserved separator '{separator}'")]
    KeyCollision {
        key: String,
        segment: String,
        separator: &'static str,
    },

    /// Flattened keys imply an inconsistent structure: the same prefix is
    /// used both as a scalar leaf and as a composite root.
    #[error("flattened key '{key}' is used both as a scalar and as an object prefix")]
    ShapeMismatch { key: String },

    /// The root of an entity graph is a bare scalar leaf. A leaf at the
    /// root has no field name to key a column by, so it cannot be
    /// flattened.
    #[error("entity graph root is a scalar leaf, not a composite")]
    ScalarRoot,

    /// Text matched none of the variant's primary or fallback patterns.
    #[error("cannot parse '{text}' as {kind} for key '{key}'")]
    UnparsableTemporal {
        key: String,
        kind: TemporalKind,
        text: String,
    },

    /// A caller-supplied temporal validator rejected a value before it
    /// was formatted or stored.
    #[error("{kind} value at key '{key}' failed validation: {message}")]
    ValidationFailed {
        key: String,
        kind: TemporalKind,
        message: String,
    },
}

impl CodecError {
    /// The flattened key the error refers to; empty for errors that occur
    /// before any key exists, such as [`CodecError::ScalarRoot`].
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::KeyCollision { key, .. }
            | Self::ShapeMismatch { key }
            | Self::UnparsableTemporal { key, .. }
            | Self::ValidationFailed { key, .. } => key,
            Self::ScalarRoot => "",
        }
    }
}

///
/// TemporalError
///
/// Pattern-engine failure, contextualized with the flattened key at the
/// mapper/facade boundary.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum TemporalError {
    #[error("no pattern matched '{text}' for {kind}")]
    Unparsable { kind: TemporalKind, text: String },

    #[error("validator rejected {kind} value: {message}")]
    Validation { kind: TemporalKind, message: String },
}

impl TemporalError {
    pub fn with_key(self, key: &str) -> CodecError {
        match self {
            Self::Unparsable { kind, text } => CodecError::UnparsableTemporal {
                key: key.to_string(),
                kind,
                text,
            },
            Self::Validation { kind, message } => CodecError::ValidationFailed {
                key: key.to_string(),
                kind,
                message,
            },
        }
    }
}

///
/// TESTS
///
