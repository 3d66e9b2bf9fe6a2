use thiserror::Error;

/// Unified error type for `mixlogit` operations.
#[derive(Debug, Error)]
pub enum DcmError {
    /// Raised when provided tables or vectors have incompatible dimensions.
    #[error("dimension mismatch in {context}: expected {expected} but found {found}")]
    DimensionMismatch {
        /// Human-readable context describing the operation.
        context: &'static str,
        /// The required dimension, often implied by another table.
        expected: usize,
        /// The dimension that was actually supplied.
        found: usize,
    },

    /// Raised when the per-person alternative counts do not add up to the
    /// number of attribute rows.
    #[error(
        "cumulative number of discrete choices ({cumulative}) does not equal the number of attribute vectors ({attribute_rows})"
    )]
    InconsistentAlternativeTotal {
        /// Sum of all per-person alternative counts.
        cumulative: usize,
        /// Number of rows in the attribute table.
        attribute_rows: usize,
    },

    /// Raised when a count or decision entry is not a usable non-negative integer.
    #[error("entry {index} of the {table} table must be a positive integer, found {value}")]
    InvalidCount {
        /// Which raw table held the entry.
        table: &'static str,
        /// Person (entry) index within that table.
        index: usize,
        /// The value as supplied.
        value: f64,
    },

    /// Raised when a recorded decision does not refer to one of the person's alternatives.
    #[error("person {person} chose alternative {choice} (1-based) but only has {alternatives}")]
    ChoiceOutOfRange {
        /// Person whose decision is invalid.
        person: usize,
        /// The 1-based decision as supplied.
        choice: f64,
        /// Size of that person's choice set.
        alternatives: usize,
    },

    /// Raised when a table holds no people at all.
    #[error("the {table} table must contain at least one entry")]
    EmptyTable {
        /// Which raw table is empty.
        table: &'static str,
    },

    /// Raised by a [`Distribution`](crate::distribution::Distribution) that cannot
    /// be configured for the requested attribute layout.
    #[error("distribution initialization failed: {reason}")]
    InvalidDistribution {
        /// Explanation supplied by the distribution.
        reason: String,
    },

    /// Raised when a configuration value is unusable.
    #[error("option `{name}` has invalid value {value}")]
    InvalidOption {
        /// Name of the offending option.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Raised when a required component has not been provided to a builder.
    #[error("{component} must be provided before building the table")]
    MissingComponent {
        /// The builder component that was not set.
        component: &'static str,
    },

    /// I/O failure while saving or loading a table.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed table file.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DcmError {
    /// Helper to format a [`DimensionMismatch`](DcmError::DimensionMismatch) error.
    pub fn dimension_mismatch(context: &'static str, expected: usize, found: usize) -> Self {
        Self::DimensionMismatch {
            context,
            expected,
            found,
        }
    }

    /// Helper for bubbling up missing component errors from builders.
    pub fn missing_component(component: &'static str) -> Self {
        Self::MissingComponent { component }
    }

    /// Helper for distributions rejecting an attribute layout.
    pub fn invalid_distribution(reason: impl Into<String>) -> Self {
        Self::InvalidDistribution {
            reason: reason.into(),
        }
    }
}

/// Type alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, DcmError>;
