// src/core/operator.rs

use super::error::{LftError, Result};
use super::state::QuantumState;
use nalgebra::{DMatrix, DVector};
use num_complex::Complex;
use std::fmt;

/// Dense complex square matrix acting on a `QuantumState`.
///
/// Operators are built fresh for each force application and are not
/// required to be unitary: decoherence damping blends a rotation with the
/// identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    matrix: DMatrix<Complex<f64>>,
}

impl Operator {
    /// `dim x dim` identity.
    pub fn identity(dim: usize) -> Self {
        Self { matrix: DMatrix::identity(dim, dim) }
    }

    /// Builds an operator from rows; every row must have as many entries as
    /// there are rows.
    pub fn from_rows(rows: Vec<Vec<Complex<f64>>>) -> Result<Self> {
        let dim = rows.len();
        if let Some(row) = rows.iter().find(|row| row.len() != dim) {
            return Err(LftError::dimension(dim, row.len(), "operator row length"));
        }
        Ok(Self { matrix: DMatrix::from_row_iterator(dim, dim, rows.into_iter().flatten()) })
    }

    /// Zero matrix, filled in place by builders inside the crate.
    pub(crate) fn zeros(dim: usize) -> Self {
        Self { matrix: DMatrix::zeros(dim, dim) }
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, value: Complex<f64>) {
        self.matrix[(row, col)] = value;
    }

    /// Outer product `|ψ><ψ|`, the density matrix of a pure state.
    pub fn outer(state: &QuantumState) -> Self {
        let v = DVector::from_column_slice(state.vector());
        Self { matrix: &v * v.adjoint() }
    }

    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    /// Entry at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Complex<f64> {
        self.matrix[(row, col)]
    }

    /// The underlying matrix.
    pub fn matrix(&self) -> &DMatrix<Complex<f64>> {
        &self.matrix
    }

    /// Kronecker product `self ⊗ other`.
    pub fn kron(&self, other: &Operator) -> Self {
        Self { matrix: self.matrix.kronecker(&other.matrix) }
    }

    /// Matrix product `self · other`.
    pub fn matmul(&self, other: &Operator) -> Result<Self> {
        if self.dim() != other.dim() {
            return Err(LftError::dimension(self.dim(), other.dim(), "operator product"));
        }
        Ok(Self { matrix: &self.matrix * &other.matrix })
    }

    /// Conjugate transpose.
    pub fn adjoint(&self) -> Self {
        Self { matrix: self.matrix.adjoint() }
    }

    /// `alpha * self + beta * other`.
    pub fn blend(&self, alpha: f64, other: &Operator, beta: f64) -> Result<Self> {
        if self.dim() != other.dim() {
            return Err(LftError::dimension(self.dim(), other.dim(), "operator blend"));
        }
        let alpha = Complex::new(alpha, 0.0);
        let beta = Complex::new(beta, 0.0);
        Ok(Self { matrix: &self.matrix * alpha + &other.matrix * beta })
    }

    /// Matrix-vector product; the result is not renormalized.
    pub fn apply(&self, state: &QuantumState) -> Result<QuantumState> {
        if self.dim() != state.dim() {
            return Err(LftError::dimension(self.dim(), state.dim(), "operator application"));
        }
        let out = &self.matrix * DVector::from_column_slice(state.vector());
        Ok(QuantumState::unnormalized(out.iter().copied().collect()))
    }

    /// Sum of diagonal entries.
    pub fn trace(&self) -> Complex<f64> {
        self.matrix.trace()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.matrix.row_iter() {
            write!(f, "[")?;
            for (c, value) in row.iter().enumerate() {
                write!(f, "{}{:.4}", if c > 0 { ", " } else { "" }, value)?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64, im: f64) -> Complex<f64> {
        Complex::new(re, im)
    }

    fn flip() -> Operator {
        Operator::from_rows(vec![vec![c(0.0, 0.0), c(1.0, 0.0)], vec![c(1.0, 0.0), c(0.0, 0.0)]]).unwrap()
    }

    #[test]
    fn test_kron_is_ordered() {
        // X ⊗ I maps |00> -> |10>, I ⊗ X maps |00> -> |01>
        let x = flip();
        let i = Operator::identity(2);
        let xi = x.kron(&i);
        let ix = i.kron(&x);
        assert_eq!(xi.get(2, 0), c(1.0, 0.0));
        assert_eq!(ix.get(1, 0), c(1.0, 0.0));
        assert_ne!(xi, ix);
    }

    #[test]
    fn test_adjoint_and_matmul() -> Result<()> {
        let y = Operator::from_rows(vec![vec![c(0.0, 0.0), c(0.0, -1.0)], vec![c(0.0, 1.0), c(0.0, 0.0)]])?;
        let product = y.matmul(&y.adjoint())?;
        assert_eq!(product, Operator::identity(2));
        Ok(())
    }

    #[test]
    fn test_outer_has_unit_trace() -> Result<()> {
        let state = QuantumState::from_amplitudes(vec![c(1.0, 0.0), c(0.0, 1.0)])?;
        let rho = Operator::outer(&state);
        assert!((rho.trace() - c(1.0, 0.0)).norm() < 1e-12);
        // Hermitian
        assert_eq!(rho, rho.adjoint());
        Ok(())
    }

    #[test]
    fn test_blend_then_apply() -> Result<()> {
        // (X + I) / 2 maps |0> to (|0> + |1>) / 2 before renormalization
        let half = flip().blend(0.5, &Operator::identity(2), 0.5)?;
        let out = half.apply(&QuantumState::zero_state(1)?)?;
        assert_eq!(out.vector(), &[c(0.5, 0.0), c(0.5, 0.0)]);
        assert!(half.apply(&QuantumState::zero_state(2)?).is_err());
        Ok(())
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let ragged = Operator::from_rows(vec![vec![c(1.0, 0.0)], vec![c(0.0, 0.0), c(1.0, 0.0)]]);
        assert!(matches!(ragged, Err(LftError::DimensionMismatch { .. })));
    }
}
