// src/core/mod.rs

//! Core data structures and types

// Declare modules within core
pub mod error;
pub mod force;
pub mod rules;
pub mod state;
pub mod operator;

// Re-export public types for convenient access via `lft::core::TypeName`
pub use error::{LftError, Result};
pub use force::LogicForce;
pub use rules::{LogicRule, RuleSet, pattern_matches};
pub use state::{QuantumState, dimension_for};
pub use operator::Operator;

pub mod constants;
pub use constants::lft_constants::{MAX_QUBITS, NORM_TOLERANCE}; // Re-export
