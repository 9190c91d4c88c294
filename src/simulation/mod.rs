// src/simulation/mod.rs

//! Session-scoped state evolution.
//!
//! A [`ProcessorSession`] owns one register and its current state vector.
//! Each session is driven by a single caller; sessions are cheap to clone
//! when a snapshot is needed and can be reset to the ground state at any time.

mod evolver;

pub use evolver::StateEvolver;

use crate::config::LftConfig;
use crate::core::{LftError, LogicForce, Operator, QuantumState, Result};
use crate::measurement::{Decision, Measurer};
use crate::operations::OperatorBuilder;
use crate::validation::validate_state;
use tracing::debug;

/// The mutable register of one processing session.
#[derive(Debug, Clone)]
pub struct ProcessorSession {
    num_qubits: usize,
    state: QuantumState,
    max_depth: usize,
    depth: usize,
    error_threshold: f64,
    builder: OperatorBuilder,
    evolver: StateEvolver,
    measurer: Measurer,
}

impl ProcessorSession {
    /// Session over `num_qubits`, starting in |0…0>, with default settings.
    pub fn new(num_qubits: usize) -> Result<Self> {
        Self::with_config(&LftConfig::default().with_qubits(num_qubits))
    }

    pub fn with_config(config: &LftConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            num_qubits: config.num_qubits,
            state: QuantumState::zero_state(config.num_qubits)?,
            max_depth: config.max_depth,
            depth: 0,
            error_threshold: config.error_threshold,
            builder: OperatorBuilder::new(),
            evolver: StateEvolver::new(),
            measurer: Measurer::new(),
        })
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Current state vector.
    pub fn state(&self) -> &QuantumState {
        &self.state
    }

    /// Norm drift tolerated on an evolved state.
    pub fn error_threshold(&self) -> f64 {
        self.error_threshold
    }

    /// Operations applied since the last reset.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Replaces the held state; the dimension must match the register.
    pub fn load_state(&mut self, state: QuantumState) -> Result<()> {
        let expected = 1usize << self.num_qubits;
        if state.dim() != expected {
            return Err(LftError::dimension(expected, state.dim(), "session state load"));
        }
        self.state = state;
        Ok(())
    }

    /// Back to |0…0> with a zero operation count.
    pub fn reset(&mut self) -> Result<()> {
        self.state = QuantumState::zero_state(self.num_qubits)?;
        self.depth = 0;
        Ok(())
    }

    /// Applies `force` as an operator on `target_qubits`, or on the qubits
    /// chosen by [`default_targets`](Self::default_targets) when `None`.
    pub fn apply_logic_operation(&mut self, force: &LogicForce, target_qubits: Option<&[usize]>) -> Result<()> {
        let targets = match target_qubits {
            Some(t) => t.to_vec(),
            None => self.default_targets(force)?,
        };
        let mut distinct = targets.clone();
        distinct.sort_unstable();
        distinct.dedup();
        let operator = self.builder.build(force, distinct.len())?;
        self.apply_operator(&operator, &distinct)
    }

    /// Evolves the held state through `operator` embedded on `targets`.
    ///
    /// The held state is only replaced when the evolution succeeds.
    pub fn apply_operator(&mut self, operator: &Operator, targets: &[usize]) -> Result<()> {
        if self.depth >= self.max_depth {
            return Err(LftError::configuration(format!(
                "session reached its maximum depth of {} operations; reset it first",
                self.max_depth
            )));
        }
        let evolved = self.evolver.apply(operator, targets, &self.state)?;
        validate_state(&evolved, Some(self.error_threshold))?;
        self.state = evolved;
        self.depth += 1;
        debug!(depth = self.depth, "session state updated");
        Ok(())
    }

    /// Qubits `0..min(num_qubits, floor(-log2(uncertainty)))`.
    ///
    /// Zero uncertainty is the limit of that formula and selects the whole
    /// register.
    pub fn default_targets(&self, force: &LogicForce) -> Result<Vec<usize>> {
        let u = force.uncertainty;
        if u.is_nan() || u < 0.0 {
            return Err(LftError::degenerate(format!("uncertainty {} is not a valid ratio", u)));
        }
        let count = if u == 0.0 {
            self.num_qubits
        } else {
            let raw = (-u.log2()).floor();
            if raw < 1.0 { 0 } else { (raw as usize).min(self.num_qubits) }
        };
        Ok((0..count).collect())
    }

    /// Measures the held state against weighted actions.
    pub fn make_decision(&self, actions: &[(String, f64)]) -> Result<Decision> {
        self.measurer.measure(&self.state, actions)
    }
}
