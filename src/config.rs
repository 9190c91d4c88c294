// src/config.rs

//! Processor configuration.

use crate::core::{LftError, MAX_QUBITS, Result};
use serde::{Deserialize, Serialize};

/// Settings shared by the force processors, sessions and the decision system.
///
/// Missing fields take their defaults when parsed from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LftConfig {
    /// Register width of a processing session.
    pub num_qubits: usize,
    /// Force at or above this is reported as significant.
    pub force_threshold: f64,
    /// Coherence at or above this is reported as coherent.
    pub coherence_threshold: f64,
    /// When false, every quantum-state operation fails with `DisabledFeature`.
    pub quantum_enabled: bool,
    /// Norm drift tolerated on an evolved session state before it is rejected.
    pub error_threshold: f64,
    /// Operations a session may apply between resets.
    pub max_depth: usize,
}

impl Default for LftConfig {
    fn default() -> Self {
        Self {
            num_qubits: 4,
            force_threshold: 0.7,
            coherence_threshold: 0.7,
            quantum_enabled: true,
            error_threshold: 0.01,
            max_depth: 10,
        }
    }
}

impl LftConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LftConfig = serde_json::from_str(json)
            .map_err(|e| LftError::configuration(format!("invalid configuration JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Same settings with a different register width.
    pub fn with_qubits(mut self, num_qubits: usize) -> Self {
        self.num_qubits = num_qubits;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_qubits == 0 {
            return Err(LftError::configuration("num_qubits must be at least 1"));
        }
        if self.num_qubits > MAX_QUBITS {
            return Err(LftError::QubitLimitExceeded { requested: self.num_qubits, max: MAX_QUBITS });
        }
        for (name, value) in [
            ("force_threshold", self.force_threshold),
            ("coherence_threshold", self.coherence_threshold),
            ("error_threshold", self.error_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(LftError::configuration(format!(
                    "{} must be between 0 and 1, got {}",
                    name, value
                )));
            }
        }
        if self.max_depth == 0 {
            return Err(LftError::configuration("max_depth must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = LftConfig::default();
        assert_eq!(config.num_qubits, 4);
        assert_eq!(config.force_threshold, 0.7);
        assert!(config.quantum_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_takes_defaults() -> Result<()> {
        let config = LftConfig::from_json(r#"{ "num_qubits": 3, "quantum_enabled": false }"#)?;
        assert_eq!(config.num_qubits, 3);
        assert!(!config.quantum_enabled);
        assert_eq!(config.max_depth, 10);
        Ok(())
    }

    #[test]
    fn test_invalid_json_values() {
        let too_wide = LftConfig::from_json(r#"{ "num_qubits": 40 }"#);
        assert!(matches!(too_wide, Err(LftError::QubitLimitExceeded { requested: 40, .. })));

        let bad_threshold = LftConfig::from_json(r#"{ "force_threshold": 1.5 }"#);
        assert!(matches!(bad_threshold, Err(LftError::Configuration { .. })));

        let malformed = LftConfig::from_json("{ num_qubits: }");
        assert!(matches!(malformed, Err(LftError::Configuration { .. })));
    }
}
