// src/operations/mod.rs

//! Builds the operators that carry a `LogicForce` into a state.
//!
//! A force becomes a single-qubit rotation `R(θ, φ)` with `θ = magnitude·π`
//! and `φ = direction`, tensored across the targeted qubits, then damped
//! toward the identity in proportion to the force's incoherence. The result
//! is embedded in the full register with identity on every untouched qubit.

use crate::core::constants::lft_constants::{MAX_QUBITS, PI};
use crate::core::{LftError, LogicForce, Operator, Result, dimension_for};
use crate::encoding::check_force;
use num_complex::Complex;
use tracing::debug;

/// Stateless operator factory.
#[derive(Debug, Clone, Copy, Default)]
pub struct OperatorBuilder;

impl OperatorBuilder {
    pub fn new() -> Self {
        Self
    }

    /// `R(θ, φ) = [[cos(θ/2), -e^{-iφ} sin(θ/2)], [e^{iφ} sin(θ/2), cos(θ/2)]]`
    pub fn rotation(theta: f64, phi: f64) -> Operator {
        let (sin, cos) = (theta / 2.0).sin_cos();
        let mut op = Operator::zeros(2);
        op.set(0, 0, Complex::new(cos, 0.0));
        op.set(0, 1, -Complex::from_polar(sin, -phi));
        op.set(1, 0, Complex::from_polar(sin, phi));
        op.set(1, 1, Complex::new(cos, 0.0));
        op
    }

    /// Operator for `num_target_qubits` qubits: `R^{⊗k}` damped as
    /// `(1-γ)·R^{⊗k} + γ·I` with `γ = 1 - coherence`.
    ///
    /// Damping is applied after tensoring. Zero targets give the 1x1 identity.
    pub fn build(&self, force: &LogicForce, num_target_qubits: usize) -> Result<Operator> {
        check_force(force)?;
        if num_target_qubits > MAX_QUBITS {
            return Err(LftError::QubitLimitExceeded { requested: num_target_qubits, max: MAX_QUBITS });
        }
        if num_target_qubits == 0 {
            return Ok(Operator::identity(1));
        }

        let rotation = Self::rotation(force.magnitude * PI, force.direction);
        let mut tensored = rotation.clone();
        for _ in 1..num_target_qubits {
            tensored = tensored.kron(&rotation);
        }

        let gamma = 1.0 - force.coherence;
        let damped = tensored.blend(1.0 - gamma, &Operator::identity(tensored.dim()), gamma)?;
        debug!(num_target_qubits, gamma, dim = damped.dim(), "built logic operator");
        Ok(damped)
    }

    /// Embeds an operator acting on `targets` into a `num_qubits` register.
    ///
    /// Qubit 0 is the most significant bit of a basis index. The result equals
    /// the Kronecker composition over register positions in ascending order,
    /// identity for untouched qubits and `operator` for the targeted block,
    /// whose own sub-index follows the targets in ascending order.
    pub fn embed(&self, operator: &Operator, targets: &[usize], num_qubits: usize) -> Result<Operator> {
        let dim = dimension_for(num_qubits)?;
        let mut targets = targets.to_vec();
        targets.sort_unstable();
        targets.dedup();

        if let Some(&bad) = targets.iter().find(|&&q| q >= num_qubits) {
            return Err(LftError::dimension(num_qubits, bad + 1, "target qubit outside the register"));
        }
        let block_dim = 1usize << targets.len();
        if operator.dim() != block_dim {
            return Err(LftError::dimension(block_dim, operator.dim(), "operator embedding"));
        }
        if targets.is_empty() {
            return Ok(Operator::identity(dim));
        }

        let contiguous = targets.windows(2).all(|w| w[1] == w[0] + 1);
        if contiguous {
            let before = Operator::identity(1 << targets[0]);
            let after = Operator::identity(1 << (num_qubits - 1 - targets[targets.len() - 1]));
            return Ok(before.kron(operator).kron(&after));
        }
        Ok(scatter(operator, &targets, num_qubits))
    }
}

/// Places `operator` on non-adjacent `targets` (sorted, in range) by index
/// arithmetic; the Kronecker composition cannot interleave a multi-qubit block.
fn scatter(operator: &Operator, targets: &[usize], num_qubits: usize) -> Operator {
    let dim = 1usize << num_qubits;
    let k = targets.len();
    let positions: Vec<usize> = targets.iter().map(|&q| num_qubits - 1 - q).collect();
    let target_mask = positions.iter().fold(0usize, |m, &p| m | (1 << p));

    let sub_index = |index: usize| positions.iter().fold(0usize, |acc, &p| (acc << 1) | ((index >> p) & 1));
    let spread = |sub: usize| {
        positions
            .iter()
            .enumerate()
            .fold(0usize, |acc, (j, &p)| acc | (((sub >> (k - 1 - j)) & 1) << p))
    };

    let mut full = Operator::zeros(dim);
    for row in 0..dim {
        let rest = row & !target_mask;
        let sub_row = sub_index(row);
        for sub_col in 0..(1usize << k) {
            full.set(row, rest | spread(sub_col), operator.get(sub_row, sub_col));
        }
    }
    full
}
