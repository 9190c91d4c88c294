// src/force/processor.rs

use super::ForceCalculator;
use crate::config::LftConfig;
use crate::core::{LftError, LogicForce, QuantumState, Result, RuleSet};
use crate::encoding::{StateEncoder, coherence_check};
use crate::simulation::StateEvolver;
use num_complex::Complex;
use tracing::debug;

/// Vector-mode processor owning its rules.
///
/// Quantum-state operations honour `quantum_enabled` from the configuration.
#[derive(Debug, Clone)]
pub struct LogicForceProcessor {
    config: LftConfig,
    rules: RuleSet,
    calculator: ForceCalculator,
    encoder: StateEncoder,
    evolver: StateEvolver,
}

impl LogicForceProcessor {
    pub fn new(config: LftConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            encoder: StateEncoder::new(config.num_qubits)?,
            config,
            rules: RuleSet::new(),
            calculator: ForceCalculator::new(),
            evolver: StateEvolver::new(),
        })
    }

    pub fn config(&self) -> &LftConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn rules_mut(&mut self) -> &mut RuleSet {
        &mut self.rules
    }

    /// Adds a rule; weights outside `[0, 1]` are rejected.
    pub fn add_rule(&mut self, id: &str, patterns: &[&str], weight: f64, context: Option<&str>) -> Result<()> {
        self.rules.add_rule(
            id,
            patterns.iter().map(|p| p.to_string()).collect(),
            weight,
            context.map(str::to_string),
        )
    }

    pub fn calculate_force(&self, text: &str, context: Option<&str>) -> LogicForce {
        self.calculator.vector_force(text, &self.rules, context)
    }

    /// Vector encoding of `force`.
    pub fn to_quantum_state(&self, force: &LogicForce) -> Result<QuantumState> {
        self.ensure_enabled()?;
        self.encoder.encode_force(force)
    }

    /// Blends the encoding of `force` into `target`.
    pub fn apply_force(&self, target: &QuantumState, force: &LogicForce) -> Result<QuantumState> {
        self.ensure_enabled()?;
        let force_state = self.encoder.encode_force(force)?;
        self.evolver.blend(&force_state, target, force)
    }

    /// Whether `force` clears both configured thresholds.
    pub fn is_actionable(&self, force: &LogicForce) -> bool {
        force.is_significant(self.config.force_threshold) && force.is_coherent(self.config.coherence_threshold)
    }

    fn ensure_enabled(&self) -> Result<()> {
        if !self.config.quantum_enabled {
            return Err(LftError::DisabledFeature {
                message: "Quantum processing is disabled".to_string(),
            });
        }
        Ok(())
    }
}

/// Outcome of [`ScalarForceProcessor::process`].
#[derive(Debug, Clone, PartialEq)]
pub struct LogicForceResult {
    pub force: f64,
    /// `1 - H_bits(|state|²) / num_qubits`
    pub confidence: f64,
    pub state: QuantumState,
    /// `force >= force_threshold`
    pub significant: bool,
}

/// Scalar-mode processor over a fixed register; rules are supplied per call.
#[derive(Debug, Clone)]
pub struct ScalarForceProcessor {
    num_qubits: usize,
    force_threshold: f64,
    calculator: ForceCalculator,
    encoder: StateEncoder,
}

impl ScalarForceProcessor {
    pub fn new(num_qubits: usize) -> Result<Self> {
        Self::with_config(&LftConfig::default().with_qubits(num_qubits))
    }

    pub fn with_config(config: &LftConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            num_qubits: config.num_qubits,
            force_threshold: config.force_threshold,
            calculator: ForceCalculator::new(),
            encoder: StateEncoder::new(config.num_qubits)?,
        })
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// `2^num_qubits`
    pub fn state_space(&self) -> usize {
        1 << self.num_qubits
    }

    pub fn force_threshold(&self) -> f64 {
        self.force_threshold
    }

    pub fn calculate_force(&self, text: &str, rules: &RuleSet) -> f64 {
        self.calculator.scalar_force(text, rules)
    }

    pub fn generate_quantum_state(&self, force: f64) -> Result<QuantumState> {
        self.encoder.encode_scalar(force)
    }

    /// Rescales raw amplitudes to unit norm when they have drifted.
    pub fn apply_coherence_check(&self, amplitudes: &[Complex<f64>]) -> Result<QuantumState> {
        coherence_check(amplitudes)
    }

    pub fn process(&self, text: &str, rules: &RuleSet) -> Result<LogicForceResult> {
        let force = self.calculate_force(text, rules);
        let state = self.generate_quantum_state(force)?;
        let entropy: f64 = state
            .probabilities()
            .into_iter()
            .filter(|&p| p > 0.0)
            .map(|p| -p * p.log2())
            .sum();
        let confidence = (1.0 - entropy / self.num_qubits as f64).clamp(0.0, 1.0);
        debug!(force, confidence, "scalar processing");
        Ok(LogicForceResult {
            force,
            confidence,
            state,
            significant: force >= self.force_threshold,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn test_rules() -> RuleSet {
        RuleSet::from_patterns(vec![("greeting", vec!["hello", "hi"]), ("command", vec!["create", "update"])])
    }

    #[test]
    fn test_scalar_initialization() -> Result<()> {
        let processor = ScalarForceProcessor::new(4)?;
        assert_eq!(processor.num_qubits(), 4);
        assert_eq!(processor.state_space(), 16);
        assert_eq!(processor.force_threshold(), 0.7);
        Ok(())
    }

    #[test]
    fn test_scalar_process_inputs() -> Result<()> {
        let processor = ScalarForceProcessor::new(4)?;
        let rules = test_rules();
        for (text, expected) in [("hello world", 0.5), ("hello create", 1.0), ("random text", 0.0), ("", 0.0)] {
            let result = processor.process(text, &rules)?;
            assert!((result.force - expected).abs() < TOLERANCE, "{}", text);
            assert!((0.0..=1.0).contains(&result.confidence));
            assert!((result.state.norm_sqr() - 1.0).abs() < TOLERANCE);
        }
        let half = processor.process("hello world", &rules)?;
        // Two outcomes at 1/2 each: one bit of entropy over four qubits
        assert!((half.confidence - 0.75).abs() < TOLERANCE);
        assert!(!half.significant);
        assert!(processor.process("hello create", &rules)?.significant);
        Ok(())
    }

    #[test]
    fn test_vector_processor_rules_and_states() -> Result<()> {
        let mut processor = LogicForceProcessor::new(LftConfig::default())?;
        processor.add_rule("greeting", &["hello", "hi"], 0.8, Some("social"))?;
        assert!(processor.add_rule("bad", &["x"], 2.0, None).is_err());

        let force = processor.calculate_force("hello there", Some("social"));
        assert!((force.magnitude - 0.8).abs() < TOLERANCE);
        assert!((force.direction - std::f64::consts::TAU).abs() < TOLERANCE);

        let state = processor.to_quantum_state(&force)?;
        assert_eq!(state.dim(), 2);
        let blended = processor.apply_force(&QuantumState::zero_state(1)?, &force)?;
        assert!((blended.norm_sqr() - 1.0).abs() < TOLERANCE);
        assert!(processor.is_actionable(&force));
        Ok(())
    }

    #[test]
    fn test_disabled_quantum_processing() -> Result<()> {
        let config = LftConfig { quantum_enabled: false, ..LftConfig::default() };
        let mut processor = LogicForceProcessor::new(config)?;
        processor.add_rule("greeting", &["hello"], 1.0, None)?;
        let force = processor.calculate_force("hello", None);
        assert!(force.magnitude > 0.0);
        assert!(matches!(processor.to_quantum_state(&force), Err(LftError::DisabledFeature { .. })));
        assert!(matches!(
            processor.apply_force(&QuantumState::zero_state(1)?, &force),
            Err(LftError::DisabledFeature { .. })
        ));
        Ok(())
    }
}
