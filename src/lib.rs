// src/lib.rs

//! `lft` - Logic Force Theory pipeline
//!
//! Free text is matched against weighted rule categories to produce a
//! logical force, the force is encoded as a complex state vector over a small
//! simulated register, evolved with force-derived operators, and measured
//! into a named decision. Labelled examples calibrate the rule weights.
//!
//! This is deterministic complex-vector arithmetic, not a quantum simulator
//! for real hardware. Registers are capped at [`MAX_QUBITS`] because the
//! density-matrix path is dense in `2^n x 2^n`.

pub mod core;
pub mod config;
pub mod force;
pub mod encoding;
pub mod operations;
pub mod simulation;
pub mod measurement;
pub mod decision;
pub mod validation;

// Re-export the most common types for easier top-level use
pub use crate::core::{LftError, LogicForce, LogicRule, MAX_QUBITS, Operator, QuantumState, Result, RuleSet};
pub use config::LftConfig;
pub use force::{ForceCalculator, ForceMode, ForceValue, LogicForceProcessor, LogicForceResult, ScalarForceProcessor};
pub use encoding::StateEncoder;
pub use operations::OperatorBuilder;
pub use simulation::{ProcessorSession, StateEvolver};
pub use measurement::{Decision, Measurer};
pub use decision::{Calibrator, PipelineResult, QuantumDecisionSystem};
pub use validation::{check_finite, check_normalization, validate_state};

// Example 1: Scalar force and its encoding
// A single greeting match out of two categories gives force 0.5, which is
// encoded into index 0 and index floor(0.5 * 15) = 7 of a 4-qubit register.
/// ```
/// use lft::{RuleSet, ScalarForceProcessor};
///
/// let rules = RuleSet::from_patterns(vec![
///     ("greeting", vec!["hello", "hi"]),
///     ("command", vec!["create", "update"]),
/// ]);
/// let processor = ScalarForceProcessor::new(4).unwrap();
///
/// let force = processor.calculate_force("hello world", &rules);
/// assert!((force - 0.5).abs() < 1e-9);
///
/// let state = processor.generate_quantum_state(force).unwrap();
/// assert_eq!(state.dim(), 16);
/// let nonzero: Vec<usize> = (0..16).filter(|&i| state.vector()[i].norm() > 1e-12).collect();
/// assert_eq!(nonzero, vec![0, 7]);
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item

// Example 2: Full pipeline and calibration
// Text without any rule match stays in the ground state, which the measurer
// assigns to the first category.
/// ```
/// use lft::{LftConfig, QuantumDecisionSystem};
///
/// let mut system = QuantumDecisionSystem::from_patterns(
///     vec![("greeting", vec!["hello", "hi"]), ("command", vec!["create", "update"])],
///     LftConfig::default(),
/// ).unwrap();
///
/// let result = system.process("random text").unwrap();
/// assert_eq!(result.decision, "greeting");
/// assert!((result.state.norm_sqr() - 1.0).abs() < 1e-9);
///
/// // Every "command" label is mispredicted, so its weight drops to zero.
/// system.calibrate(vec![("random text", "command")]).unwrap();
/// assert_eq!(system.rules().get("command").unwrap().weight(), 0.0);
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item
