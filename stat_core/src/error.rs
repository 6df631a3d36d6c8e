//! Error types for stat operations.

use std::fmt;

/// Errors returned by definitions, instance data and containers.
///
/// Match on the variant (or [`StatError::kind`]), never on the message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatError {
    /// An identifier does not resolve in the relevant registry.
    #[error("undefined value: {0}")]
    UndefinedValue(String),

    /// An explicit `add` targeted a definition that already has data.
    #[error("duplicate value: {0}")]
    DuplicateValue(String),

    /// Supplied numbers break `min <= current <= max` or overflow.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Serialized text is missing markers or has corrupt fields.
    #[error("malformed serialization: {0}")]
    MalformedSerialization(String),
}

/// Stable classification of a [`StatError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UndefinedValue,
    DuplicateValue,
    InvalidData,
    MalformedSerialization,
}

impl StatError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StatError::UndefinedValue(_) => ErrorKind::UndefinedValue,
            StatError::DuplicateValue(_) => ErrorKind::DuplicateValue,
            StatError::InvalidData(_) => ErrorKind::InvalidData,
            StatError::MalformedSerialization(_) => ErrorKind::MalformedSerialization,
        }
    }

    /// The human readable detail, without the kind prefix
    pub fn detail(&self) -> &str {
        match self {
            StatError::UndefinedValue(s)
            | StatError::DuplicateValue(s)
            | StatError::InvalidData(s)
            | StatError::MalformedSerialization(s) => s,
        }
    }

    pub(crate) fn malformed(detail: impl Into<String>) -> Self {
        StatError::MalformedSerialization(detail.into())
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::UndefinedValue => write!(f, "UndefinedValue"),
            ErrorKind::DuplicateValue => write!(f, "DuplicateValue"),
            ErrorKind::InvalidData => write!(f, "InvalidData"),
            ErrorKind::MalformedSerialization => write!(f, "MalformedSerialization"),
        }
    }
}

/// Convenience result type for stat operations.
pub type StatResult<T> = Result<T, StatError>;
