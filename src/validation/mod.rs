// src/validation/mod.rs

//! Provides functions to validate `QuantumState` values between pipeline stages.

use crate::core::constants::lft_constants::NORM_TOLERANCE;
use crate::core::{LftError, QuantumState, Result};

/// Checks if the state vector is normalized (sum of squared amplitudes ≈ 1.0).
///
/// # Arguments
/// * `state` - The `QuantumState` to check.
/// * `tolerance` - Allowed deviation from 1.0. Defaults to 1e-9.
///
/// # Returns
/// * `Ok(())` if normalized within tolerance.
/// * `Err(LftError::DegenerateInput)` if normalization fails.
pub fn check_normalization(state: &QuantumState, tolerance: Option<f64>) -> Result<()> {
    let effective_tolerance = tolerance.unwrap_or(NORM_TOLERANCE);
    let norm_sq = state.norm_sqr();
    if (norm_sq - 1.0).abs() > effective_tolerance {
        Err(LftError::degenerate(format!(
            "State vector normalization failed. Sum(|c_i|^2) = {} (Deviation > {})",
            norm_sq, effective_tolerance
        )))
    } else {
        Ok(())
    }
}

/// Rejects states holding NaN or infinite amplitudes.
pub fn check_finite(state: &QuantumState) -> Result<()> {
    match state.vector().iter().position(|c| !c.re.is_finite() || !c.im.is_finite()) {
        Some(index) => Err(LftError::degenerate(format!(
            "non-finite amplitude {} at index {}",
            state.vector()[index], index
        ))),
        None => Ok(()),
    }
}

/// Runs every state check: finiteness, then normalization.
///
/// # Arguments
/// * `state` - The `QuantumState` to validate.
/// * `norm_tolerance` - Optional allowed deviation from 1.0 for normalization.
pub fn validate_state(state: &QuantumState, norm_tolerance: Option<f64>) -> Result<()> {
    check_finite(state)?;
    check_normalization(state, norm_tolerance)?;
    Ok(())
}
