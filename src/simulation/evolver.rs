// src/simulation/evolver.rs
use crate::core::constants::lft_constants::AMPLITUDE_TOLERANCE;
use crate::core::{LftError, LogicForce, Operator, QuantumState, Result};
use crate::encoding::coherence_check;
use crate::operations::OperatorBuilder;
use crate::validation::check_finite;
use num_complex::Complex;
use tracing::debug;

/// Applies operators and forces to states.
///
/// The operator path goes through the density matrix: `ρ = |ψ><ψ|` is
/// evolved as `ρ' = U ρ U†` and a pure representative is recovered as the
/// dominant eigenvector of `ρ'`. That projection is lossy on purpose, it
/// folds any mixedness introduced by damping back into a pure state for the
/// next operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct StateEvolver {
    builder: OperatorBuilder,
}

impl StateEvolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Embeds `operator` on `target_qubits` and evolves `state` through it.
    pub fn apply(&self, operator: &Operator, target_qubits: &[usize], state: &QuantumState) -> Result<QuantumState> {
        check_finite(state)?;
        let full = self.builder.embed(operator, target_qubits, state.num_qubits())?;

        let rho = Operator::outer(state);
        let evolved = full.matmul(&rho)?.matmul(&full.adjoint())?;

        let trace = evolved.trace().re;
        if !trace.is_finite() || trace < AMPLITUDE_TOLERANCE {
            return Err(LftError::degenerate(format!(
                "evolved density matrix has trace {}, the operator annihilated the state",
                trace
            )));
        }
        let recovered = dominant_eigenvector(&evolved)?;
        debug!(dim = recovered.dim(), trace, targets = ?target_qubits, "evolved state");
        Ok(recovered)
    }

    /// Blend path: `magnitude · force_state + (1 - magnitude) · target_state`,
    /// renormalized. Both states must share a dimension.
    pub fn blend(&self, force_state: &QuantumState, target_state: &QuantumState, force: &LogicForce) -> Result<QuantumState> {
        let alpha = force.magnitude;
        let mixed = force_state.scale_add(alpha, target_state, 1.0 - alpha)?;
        coherence_check(mixed.vector())
    }
}

/// Eigenvector of the largest eigenvalue of a Hermitian matrix, normalized
/// and with its global phase fixed.
fn dominant_eigenvector(rho: &Operator) -> Result<QuantumState> {
    let eigen = rho.matrix().clone().symmetric_eigen();

    let mut best = 0;
    for (i, value) in eigen.eigenvalues.iter().enumerate() {
        if *value > eigen.eigenvalues[best] {
            best = i;
        }
    }
    let column: Vec<Complex<f64>> = eigen.eigenvectors.column(best).iter().copied().collect();
    coherence_check(&fix_global_phase(column)?)
}

/// Rotates the vector so its first largest-magnitude component is real and
/// positive. Eigen solvers return vectors up to an arbitrary phase.
fn fix_global_phase(mut v: Vec<Complex<f64>>) -> Result<Vec<Complex<f64>>> {
    let max = v.iter().map(|c| c.norm()).fold(0.0, f64::max);
    if !(max > AMPLITUDE_TOLERANCE) {
        return Err(LftError::degenerate("eigenvector has no significant component"));
    }
    let pivot = v.iter().position(|c| c.norm() >= max - 1e-9).unwrap_or(0);
    let rotation = v[pivot].conj() / v[pivot].norm();
    v.iter_mut().for_each(|c| *c *= rotation);
    Ok(v)
}
