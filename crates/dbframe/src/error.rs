//! Error types for dbframe

use thiserror::Error;

/// Result type alias for dbframe operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for reading, binding and executing
#[derive(Debug, Error)]
pub enum OrmError {
    /// A required column is absent from the row, or holds NULL
    #[error("Missing field '{column}'{suffix}", suffix = null_suffix(.null))]
    MissingField { column: String, null: bool },

    /// Column present but not convertible to the requested type
    #[error("Conversion error on column '{column}': {message}")]
    Conversion { column: String, message: String },

    /// The identifying key of a row could not be read
    #[error("Key read failed: {0}")]
    KeyRead(#[source] Box<OrmError>),

    /// Reader, dataset or binder wiring is wrong; never a data problem
    #[error("Misconfigured: {0}")]
    Misconfigured(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Query execution error
    #[cfg(feature = "postgres")]
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

fn null_suffix(null: &bool) -> &'static str {
    if *null { " (NULL)" } else { "" }
}

impl OrmError {
    /// Create an error for a column that is not part of the row
    pub fn missing(column: impl Into<String>) -> Self {
        Self::MissingField {
            column: column.into(),
            null: false,
        }
    }

    /// Create an error for a required column that holds NULL
    pub fn null(column: impl Into<String>) -> Self {
        Self::MissingField {
            column: column.into(),
            null: true,
        }
    }

    /// Create a conversion error for a specific column
    pub fn conversion(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Conversion {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Wrap the failure of a key reader
    pub fn key_read(source: OrmError) -> Self {
        Self::KeyRead(Box::new(source))
    }

    /// Create a misconfiguration error
    pub fn misconfigured(message: impl Into<String>) -> Self {
        Self::Misconfigured(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this is a missing or NULL field error
    pub fn is_missing_field(&self) -> bool {
        matches!(self, Self::MissingField { .. })
    }

    /// Check if this is a conversion error
    pub fn is_conversion(&self) -> bool {
        matches!(self, Self::Conversion { .. })
    }

    /// Check if this is a key read error
    pub fn is_key_read(&self) -> bool {
        matches!(self, Self::KeyRead(_))
    }

    /// Check if this is a misconfiguration error
    pub fn is_misconfigured(&self) -> bool {
        matches!(self, Self::Misconfigured(_))
    }

    /// Whether the error describes a bad row rather than bad wiring.
    ///
    /// Row-level errors may be skipped by the executor; everything else ends the pass.
    pub fn is_row_level(&self) -> bool {
        match self {
            Self::MissingField { .. } | Self::Conversion { .. } | Self::Validation(_) => true,
            Self::KeyRead(inner) => inner.is_row_level(),
            _ => false,
        }
    }
}
