// src/encoding/mod.rs

//! Encodes forces as normalized complex state vectors.

use crate::core::constants::lft_constants::{MAX_QUBITS, NORM_TOLERANCE};
use crate::core::{LftError, LogicForce, QuantumState, Result, dimension_for};
use crate::validation::{check_finite, validate_state};
use num_complex::Complex;
use num_traits::Zero;
use tracing::{debug, warn};

/// Maps scalar and vector forces onto state vectors.
///
/// Scalar forces are encoded into the encoder's fixed register; vector
/// forces choose their own register width from their uncertainty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateEncoder {
    num_qubits: usize,
}

impl StateEncoder {
    /// Encoder for a `num_qubits` register.
    pub fn new(num_qubits: usize) -> Result<Self> {
        dimension_for(num_qubits)?;
        Ok(Self { num_qubits })
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Scalar encoding: `sqrt(force)` at index `floor(force * (dim - 1))`
    /// and `sqrt(1 - force)` added at index 0, then renormalized.
    pub fn encode_scalar(&self, force: f64) -> Result<QuantumState> {
        if !force.is_finite() || !(0.0..=1.0).contains(&force) {
            return Err(LftError::degenerate(format!("scalar force {} is outside [0, 1]", force)));
        }
        let dim = dimension_for(self.num_qubits)?;
        let mut amplitudes = vec![Complex::zero(); dim];
        let primary = (force * (dim - 1) as f64).floor() as usize;
        amplitudes[primary] = Complex::new(force.sqrt(), 0.0);
        amplitudes[0] += Complex::new((1.0 - force).sqrt(), 0.0);

        let state = coherence_check(&amplitudes)?;
        validate_state(&state, None)?;
        debug!(force, primary, dim, "scalar encoding");
        Ok(state)
    }

    /// Vector encoding over `2^required_qubits(uncertainty)` outcomes with
    /// equal amplitudes and a phase ramp from 0 to `direction`.
    ///
    /// Every outcome carries `sqrt(magnitude * coherence)` before
    /// renormalization, so the normalized modulus is `1/sqrt(dim)` whatever
    /// the product, including zero.
    pub fn encode_force(&self, force: &LogicForce) -> Result<QuantumState> {
        check_force(force)?;
        let qubits = required_qubits(force.uncertainty)?;
        let dim = dimension_for(qubits)?;

        let amplitude = 1.0 / (dim as f64).sqrt();
        let amplitudes: Vec<Complex<f64>> = (0..dim)
            .map(|i| {
                let phase = if dim > 1 {
                    force.direction * i as f64 / (dim - 1) as f64
                } else {
                    force.direction
                };
                Complex::from_polar(amplitude, phase)
            })
            .collect();

        let state = coherence_check(&amplitudes)?;
        validate_state(&state, None)?;
        debug!(qubits, dim, strength = force.magnitude * force.coherence, "vector encoding");
        Ok(state)
    }
}

/// Rejects forces with a NaN or infinite component.
pub fn check_force(force: &LogicForce) -> Result<()> {
    let fields = [
        ("magnitude", force.magnitude),
        ("coherence", force.coherence),
        ("direction", force.direction),
        ("uncertainty", force.uncertainty),
    ];
    match fields.iter().find(|(_, value)| !value.is_finite()) {
        Some((name, value)) => Err(LftError::degenerate(format!("force {} is not finite: {}", name, value))),
        None => Ok(()),
    }
}

/// `max(1, ceil(-log2(uncertainty)))`.
///
/// Zero uncertainty would need infinitely many qubits and is rejected.
pub fn required_qubits(uncertainty: f64) -> Result<usize> {
    if !uncertainty.is_finite() || uncertainty <= 0.0 {
        return Err(LftError::degenerate(format!(
            "uncertainty {} has no finite qubit count (log2 of zero)",
            uncertainty
        )));
    }
    let raw = (-uncertainty.log2()).ceil();
    let qubits = if raw < 1.0 { 1 } else { raw as usize };
    if qubits > MAX_QUBITS {
        return Err(LftError::QubitLimitExceeded { requested: qubits, max: MAX_QUBITS });
    }
    Ok(qubits)
}

/// Rescales amplitudes by `1/sqrt(norm)` when `Σ|c|²` has drifted from 1.
///
/// Idempotent: an already normalized vector is returned unchanged.
pub fn coherence_check(amplitudes: &[Complex<f64>]) -> Result<QuantumState> {
    if amplitudes.is_empty() || !amplitudes.len().is_power_of_two() {
        return Err(LftError::degenerate(format!(
            "state length {} is not a power of two",
            amplitudes.len()
        )));
    }
    let state = QuantumState::unnormalized(amplitudes.to_vec());
    check_finite(&state)?;
    let norm_sq = state.norm_sqr();
    if (norm_sq - 1.0).abs() <= NORM_TOLERANCE {
        return Ok(state);
    }
    if norm_sq > NORM_TOLERANCE {
        // Underflow to an empty state is expected; only drift on a live state is notable.
        warn!(norm_sq, "state norm drifted, rescaling");
    }
    state.normalized()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_1_SQRT_2, PI};

    const TOLERANCE: f64 = 1e-9;

    fn assert_normalized(state: &QuantumState) {
        assert!((state.norm_sqr() - 1.0).abs() < TOLERANCE, "norm was {}", state.norm_sqr());
    }

    #[test]
    fn test_scalar_encoding_half_force() -> Result<()> {
        let state = StateEncoder::new(4)?.encode_scalar(0.5)?;
        assert_eq!(state.dim(), 16);
        let nonzero: Vec<usize> = (0..16).filter(|&i| state.vector()[i].norm() > 1e-12).collect();
        assert_eq!(nonzero, vec![0, 7]);
        assert!((state.vector()[0].norm() - FRAC_1_SQRT_2).abs() < TOLERANCE);
        assert!((state.vector()[7].norm() - FRAC_1_SQRT_2).abs() < TOLERANCE);
        assert_normalized(&state);
        Ok(())
    }

    #[test]
    fn test_scalar_encoding_extremes() -> Result<()> {
        let encoder = StateEncoder::new(2)?;
        let none = encoder.encode_scalar(0.0)?;
        assert_eq!(none.vector()[0], Complex::new(1.0, 0.0));
        assert!(none.vector()[1..].iter().all(|c| c.is_zero()));

        let full = encoder.encode_scalar(1.0)?;
        assert!((full.vector()[3].re - 1.0).abs() < TOLERANCE);
        assert!(full.vector()[0].norm() < TOLERANCE);

        // Small force lands on index 0 too: both contributions share the slot.
        let small = encoder.encode_scalar(0.2)?;
        assert!((small.vector()[0].re - 1.0).abs() < TOLERANCE);

        assert!(matches!(encoder.encode_scalar(1.2), Err(LftError::DegenerateInput { .. })));
        assert!(matches!(encoder.encode_scalar(f64::NAN), Err(LftError::DegenerateInput { .. })));
        Ok(())
    }

    #[test]
    fn test_required_qubits() -> Result<()> {
        assert_eq!(required_qubits(1.0)?, 1);
        assert_eq!(required_qubits(0.5)?, 1);
        assert_eq!(required_qubits(0.3)?, 2);
        assert_eq!(required_qubits(0.25)?, 2);
        assert!(matches!(required_qubits(0.0), Err(LftError::DegenerateInput { .. })));
        assert!(matches!(required_qubits(1e-6), Err(LftError::QubitLimitExceeded { .. })));
        Ok(())
    }

    #[test]
    fn test_vector_encoding_zero_force_is_uniform() -> Result<()> {
        let state = StateEncoder::new(4)?.encode_force(&LogicForce::zero())?;
        assert_eq!(state.dim(), 2);
        for c in state.vector() {
            assert!((c.re - FRAC_1_SQRT_2).abs() < TOLERANCE);
            assert!(c.im.abs() < TOLERANCE);
        }
        Ok(())
    }

    #[test]
    fn test_vector_encoding_phase_ramp() -> Result<()> {
        let force = LogicForce::new(0.8, 0.5, PI, 0.25);
        let state = StateEncoder::new(4)?.encode_force(&force)?;
        assert_eq!(state.dim(), 4);
        assert_normalized(&state);
        for (i, c) in state.vector().iter().enumerate() {
            assert!((c.norm() - 0.5).abs() < TOLERANCE);
            let expected = Complex::from_polar(0.5, PI * i as f64 / 3.0);
            assert!((c - expected).norm() < TOLERANCE, "index {}", i);
        }
        Ok(())
    }

    #[test]
    fn test_vector_encoding_rejects_zero_uncertainty() -> Result<()> {
        let force = LogicForce::new(1.0, 1.0, 0.0, 0.0);
        let result = StateEncoder::new(4)?.encode_force(&force);
        assert!(matches!(result, Err(LftError::DegenerateInput { .. })));
        Ok(())
    }

    #[test]
    fn test_vector_encoding_tiny_strength_is_uniform() -> Result<()> {
        // Rounding leaves a residue of one ulp where coherence should be zero.
        let encoder = StateEncoder::new(4)?;
        let residue = encoder.encode_force(&LogicForce::new(1.0, f64::EPSILON, 0.0, 0.25))?;
        let exact = encoder.encode_force(&LogicForce::new(1.0, 0.0, 0.0, 0.25))?;
        assert_eq!(residue.dim(), 4);
        assert_normalized(&residue);
        assert_eq!(residue, exact);
        Ok(())
    }

    #[test]
    fn test_vector_encoding_rejects_non_finite_fields() -> Result<()> {
        let encoder = StateEncoder::new(4)?;
        for force in [
            LogicForce::new(f64::NAN, 1.0, 0.0, 0.5),
            LogicForce::new(1.0, f64::NAN, 0.0, 0.5),
            LogicForce::new(1.0, 1.0, f64::INFINITY, 0.5),
        ] {
            assert!(matches!(encoder.encode_force(&force), Err(LftError::DegenerateInput { .. })), "{:?}", force);
        }
        Ok(())
    }

    #[test]
    fn test_coherence_check_is_idempotent() -> Result<()> {
        let raw = vec![Complex::new(0.5, 0.0); 4].into_iter().map(|c| c * 2.0).collect::<Vec<_>>();
        let once = coherence_check(&raw)?;
        let twice = coherence_check(once.vector())?;
        assert_normalized(&once);
        assert_eq!(once, twice);

        assert!(matches!(coherence_check(&[Complex::zero(); 4]), Err(LftError::DegenerateInput { .. })));
        assert!(matches!(
            coherence_check(&[Complex::new(f64::INFINITY, 0.0), Complex::zero()]),
            Err(LftError::DegenerateInput { .. })
        ));
        Ok(())
    }
}
