// src/core/state.rs

use super::constants::lft_constants::{AMPLITUDE_TOLERANCE, MAX_QUBITS};
use super::error::{LftError, Result};
use num_complex::Complex;
use num_traits::Zero;
use std::fmt;

/// Dense complex state vector over `2^n` basis outcomes.
///
/// Every public operation that hands a state back to a caller keeps
/// `Σ|c_i|² = 1` within [`NORM_TOLERANCE`](super::constants::lft_constants::NORM_TOLERANCE).
/// Intermediate, unnormalized vectors only exist inside the crate.
#[derive(Debug, Clone, PartialEq)] // Avoid Eq for floating-point complex numbers
pub struct QuantumState {
    amplitudes: Vec<Complex<f64>>,
}

impl QuantumState {
    /// The ground state |0…0> of a `num_qubits` register.
    pub fn zero_state(num_qubits: usize) -> Result<Self> {
        let dim = dimension_for(num_qubits)?;
        let mut amplitudes = vec![Complex::zero(); dim];
        amplitudes[0] = Complex::new(1.0, 0.0);
        Ok(Self { amplitudes })
    }

    /// Builds a normalized state from raw amplitudes.
    ///
    /// The length must be a power of two. The vector is rescaled to unit norm;
    /// a zero or non-finite norm is rejected.
    pub fn from_amplitudes(amplitudes: Vec<Complex<f64>>) -> Result<Self> {
        if amplitudes.is_empty() || !amplitudes.len().is_power_of_two() {
            return Err(LftError::degenerate(format!(
                "state length {} is not a power of two",
                amplitudes.len()
            )));
        }
        Self::unnormalized(amplitudes).normalized()
    }

    /// Wraps a vector without touching its norm. Callers inside the crate
    /// must normalize before returning it.
    pub(crate) fn unnormalized(amplitudes: Vec<Complex<f64>>) -> Self {
        Self { amplitudes }
    }

    /// Provides read-only access to the amplitudes.
    pub fn vector(&self) -> &[Complex<f64>] {
        &self.amplitudes
    }

    /// Number of basis outcomes.
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// Register width, `log2(dim)`.
    pub fn num_qubits(&self) -> usize {
        self.amplitudes.len().trailing_zeros() as usize
    }

    /// `Σ|c_i|²`
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|c| c.norm_sqr()).sum()
    }

    /// Returns a copy rescaled to unit norm.
    pub fn normalized(&self) -> Result<Self> {
        let norm_sq = self.norm_sqr();
        if !norm_sq.is_finite() || norm_sq < AMPLITUDE_TOLERANCE {
            return Err(LftError::degenerate(format!(
                "cannot normalize state with squared norm {}",
                norm_sq
            )));
        }
        let scale = 1.0 / norm_sq.sqrt();
        Ok(Self {
            amplitudes: self.amplitudes.iter().map(|c| c * scale).collect(),
        })
    }

    /// Inner product `<self|other>`, conjugate-linear in `self`.
    pub fn inner(&self, other: &QuantumState) -> Result<Complex<f64>> {
        if self.dim() != other.dim() {
            return Err(LftError::dimension(self.dim(), other.dim(), "inner product"));
        }
        Ok(self
            .amplitudes
            .iter()
            .zip(other.amplitudes.iter())
            .map(|(a, b)| a.conj() * b)
            .sum())
    }

    /// Tensor product `|self> ⊗ |other>`; `self` occupies the high-order bits.
    pub fn kron(&self, other: &QuantumState) -> Result<Self> {
        dimension_for(self.num_qubits() + other.num_qubits())?;
        let mut amplitudes = Vec::with_capacity(self.dim() * other.dim());
        for a in &self.amplitudes {
            for b in &other.amplitudes {
                amplitudes.push(a * b);
            }
        }
        Ok(Self { amplitudes })
    }

    /// Outcome probabilities `|c_i|²`.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|c| c.norm_sqr()).collect()
    }

    /// `alpha * self + beta * other`, left unnormalized.
    pub(crate) fn scale_add(&self, alpha: f64, other: &QuantumState, beta: f64) -> Result<Self> {
        if self.dim() != other.dim() {
            return Err(LftError::dimension(self.dim(), other.dim(), "state blend"));
        }
        Ok(Self {
            amplitudes: self
                .amplitudes
                .iter()
                .zip(other.amplitudes.iter())
                .map(|(a, b)| a * alpha + b * beta)
                .collect(),
        })
    }
}

impl fmt::Display for QuantumState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State[")?;
        for (i, c) in self.amplitudes.iter().enumerate() {
            write!(f, "{}{:.4}", if i > 0 { ", " } else { "" }, c)?;
        }
        write!(f, "]")
    }
}

/// `2^num_qubits`, guarded by [`MAX_QUBITS`].
pub fn dimension_for(num_qubits: usize) -> Result<usize> {
    if num_qubits > MAX_QUBITS {
        return Err(LftError::QubitLimitExceeded { requested: num_qubits, max: MAX_QUBITS });
    }
    Ok(1usize << num_qubits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_1_SQRT_2;

    #[test]
    fn test_zero_state_is_ground() -> Result<()> {
        let state = QuantumState::zero_state(3)?;
        assert_eq!(state.dim(), 8);
        assert_eq!(state.num_qubits(), 3);
        assert_eq!(state.vector()[0], Complex::new(1.0, 0.0));
        assert!((state.norm_sqr() - 1.0).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn test_from_amplitudes_normalizes() -> Result<()> {
        let state = QuantumState::from_amplitudes(vec![Complex::new(3.0, 0.0), Complex::new(0.0, 4.0)])?;
        assert!((state.vector()[0].re - 0.6).abs() < 1e-12);
        assert!((state.vector()[1].im - 0.8).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn test_from_amplitudes_rejects_zero_and_odd_lengths() {
        let zero = QuantumState::from_amplitudes(vec![Complex::zero(); 4]);
        assert!(matches!(zero, Err(LftError::DegenerateInput { .. })));
        let odd = QuantumState::from_amplitudes(vec![Complex::new(1.0, 0.0); 3]);
        assert!(matches!(odd, Err(LftError::DegenerateInput { .. })));
    }

    #[test]
    fn test_inner_and_kron() -> Result<()> {
        let plus = QuantumState::from_amplitudes(vec![Complex::new(1.0, 0.0), Complex::new(1.0, 0.0)])?;
        let zero = QuantumState::zero_state(1)?;
        let overlap = zero.inner(&plus)?;
        assert!((overlap.re - FRAC_1_SQRT_2).abs() < 1e-12);

        // |0> ⊗ |+> = (|00> + |01>)/√2
        let joint = zero.kron(&plus)?;
        assert_eq!(joint.dim(), 4);
        assert!((joint.vector()[1].re - FRAC_1_SQRT_2).abs() < 1e-12);
        assert!(joint.vector()[2].norm() < 1e-12);

        let mismatch = zero.inner(&joint);
        assert!(matches!(mismatch, Err(LftError::DimensionMismatch { expected: 2, found: 4, .. })));
        Ok(())
    }

    #[test]
    fn test_register_limit() {
        let err = QuantumState::zero_state(MAX_QUBITS + 1).unwrap_err();
        assert_eq!(err, LftError::QubitLimitExceeded { requested: MAX_QUBITS + 1, max: MAX_QUBITS });
    }
}
