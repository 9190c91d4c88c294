//! Error handling logic

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LftError>;

/// Error types raised by the force, encoding, evolution and measurement stages.
///
/// All variants describe programmer or configuration mistakes rather than
/// transient conditions, so they are surfaced to the caller immediately and
/// never retried internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LftError {
    /// Invalid configuration value, e.g. a rule weight outside `[0, 1]`.
    #[error("Configuration Error: {message}")]
    Configuration {
        /// Configuration failure message
        message: String,
    },

    /// A quantum-state operation was requested while quantum processing is disabled.
    #[error("Disabled Feature: {message}")]
    DisabledFeature {
        /// DisabledFeature failure message
        message: String,
    },

    /// Operator/state or state/state shapes do not agree.
    #[error("Dimension Mismatch: expected {expected}, found {found} ({context})")]
    DimensionMismatch {
        /// Dimension the operation required
        expected: usize,
        /// Dimension actually supplied
        found: usize,
        /// Which operation detected the mismatch
        context: String,
    },

    /// Input that makes the arithmetic undefined: log of zero, division by a
    /// zero norm, an empty category set, or a non-finite intermediate.
    #[error("Degenerate Input: {message}")]
    DegenerateInput {
        /// DegenerateInput failure message
        message: String,
    },

    /// The requested register would exceed the dense simulation limit.
    #[error("Qubit Limit Exceeded: {requested} qubits requested, maximum is {max}")]
    QubitLimitExceeded {
        /// Number of qubits requested
        requested: usize,
        /// Configured maximum
        max: usize,
    },
}

impl LftError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        LftError::Configuration { message: message.into() }
    }

    pub(crate) fn degenerate(message: impl Into<String>) -> Self {
        LftError::DegenerateInput { message: message.into() }
    }

    pub(crate) fn dimension(expected: usize, found: usize, context: impl Into<String>) -> Self {
        LftError::DimensionMismatch { expected, found, context: context.into() }
    }
}
