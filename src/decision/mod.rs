// src/decision/mod.rs

//! The full text-to-decision pipeline.
//!
//! `text → scalar force → scalar encoding → logic operation (vector force)
//! → measurement over the rule categories`, plus rule updates and
//! calibration from labelled examples.

mod calibration;

pub use calibration::Calibrator;

use crate::config::LftConfig;
use crate::core::{LftError, LogicForce, QuantumState, Result, RuleSet};
use crate::encoding::StateEncoder;
use crate::force::ForceCalculator;
use crate::measurement::{Decision, Measurer};
use crate::simulation::ProcessorSession;
use std::fmt;
use tracing::{debug, info};

/// Result of [`QuantumDecisionSystem::process`].
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineResult {
    /// Winning category.
    pub decision: String,
    /// Its normalized probability.
    pub probability: f64,
    pub confidence: f64,
    /// The evolved state that was measured.
    pub state: QuantumState,
}

impl From<Decision> for PipelineResult {
    fn from(decision: Decision) -> Self {
        Self {
            decision: decision.chosen,
            probability: decision.probability,
            confidence: decision.confidence,
            state: decision.state,
        }
    }
}

impl fmt::Display for PipelineResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (p={:.4}, confidence={:.4})", self.decision, self.probability, self.confidence)
    }
}

/// Rule set plus the pipeline that turns text into a decision.
#[derive(Debug, Clone)]
pub struct QuantumDecisionSystem {
    config: LftConfig,
    rules: RuleSet,
    calculator: ForceCalculator,
    encoder: StateEncoder,
    measurer: Measurer,
}

impl QuantumDecisionSystem {
    pub fn new(rules: RuleSet, config: LftConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            encoder: StateEncoder::new(config.num_qubits)?,
            config,
            rules,
            calculator: ForceCalculator::new(),
            measurer: Measurer::new(),
        })
    }

    /// System over `(category, patterns)` pairs, every weight at 1.0.
    pub fn from_patterns<I, S, P>(mapping: I, config: LftConfig) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<P>)>,
        S: Into<String>,
        P: Into<String>,
    {
        Self::new(RuleSet::from_patterns(mapping), config)
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn num_qubits(&self) -> usize {
        self.config.num_qubits
    }

    /// Runs the full pipeline on `text`.
    pub fn process(&self, text: &str) -> Result<PipelineResult> {
        self.ensure_ready()?;
        let scalar = self.calculator.scalar_force(text, &self.rules);
        let force = self.calculator.vector_force(text, &self.rules, None);
        let initial = self.encoder.encode_scalar(scalar)?;

        let evolved = self.evolve(initial, &force)?;
        let decision = self.measurer.measure(&evolved, &self.rules.weights())?;
        debug!(text, %decision, "pipeline decision");
        Ok(decision.into())
    }

    /// Loads `state` into a fresh session and applies `force` on its default targets.
    pub fn evolve(&self, state: QuantumState, force: &LogicForce) -> Result<QuantumState> {
        self.ensure_enabled()?;
        let mut session = ProcessorSession::with_config(&self.config)?;
        session.load_state(state)?;
        session.apply_logic_operation(force, None)?;
        Ok(session.state().clone())
    }

    /// Decision and probability for an already prepared state.
    pub fn measure_state(&self, state: &QuantumState) -> Result<(String, f64)> {
        self.ensure_ready()?;
        let decision = self.measurer.measure(state, &self.rules.weights())?;
        Ok((decision.chosen, decision.probability))
    }

    /// Merges rules; new categories start at weight 1.0.
    pub fn update_rules<I, S, P>(&mut self, mapping: I)
    where
        I: IntoIterator<Item = (S, Vec<P>)>,
        S: Into<String>,
        P: Into<String>,
    {
        self.rules.update_rules(mapping);
    }

    /// One batch pass over `(text, expected_category)` pairs.
    ///
    /// Every example is decided with the weights in force when the pass
    /// starts; weights change only once all examples are tallied.
    pub fn calibrate<'a, I>(&mut self, training: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut calibrator = Calibrator::new();
        for (text, expected) in training {
            let result = self.process(text)?;
            calibrator.record(expected, &result.decision);
        }
        calibrator.apply(&mut self.rules)?;
        info!(categories = self.rules.len(), "calibration pass applied");
        Ok(())
    }

    fn ensure_enabled(&self) -> Result<()> {
        if !self.config.quantum_enabled {
            return Err(LftError::DisabledFeature {
                message: "Quantum processing is disabled".to_string(),
            });
        }
        Ok(())
    }

    fn ensure_ready(&self) -> Result<()> {
        self.ensure_enabled()?;
        if self.rules.is_empty() {
            return Err(LftError::degenerate("decision system has no rule categories"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system() -> QuantumDecisionSystem {
        QuantumDecisionSystem::from_patterns(
            vec![("greeting", vec!["hello", "hi"]), ("command", vec!["create", "update"])],
            LftConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_initial_weights() {
        let system = system();
        assert_eq!(system.num_qubits(), 4);
        assert!(system.rules().weights().iter().all(|(_, w)| *w == 1.0));
    }

    #[test]
    fn test_measure_ground_state() -> Result<()> {
        let system = system();
        let (decision, probability) = system.measure_state(&QuantumState::zero_state(4)?)?;
        assert_eq!(decision, "greeting");
        assert!((probability - 1.0).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_evolve_keeps_dimension() -> Result<()> {
        let system = system();
        let force = LogicForce::new(0.6, 0.8, 1.0, 0.25);
        let evolved = system.evolve(QuantumState::zero_state(4)?, &force)?;
        assert_eq!(evolved.dim(), 16);
        assert!((evolved.norm_sqr() - 1.0).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_disabled_system_refuses_every_state_operation() -> Result<()> {
        let config = LftConfig { quantum_enabled: false, ..LftConfig::default() };
        let system = QuantumDecisionSystem::from_patterns(vec![("greeting", vec!["hello"])], config)?;
        let force = LogicForce::new(1.0, 1.0, 0.0, 0.0);
        let evolved = system.evolve(QuantumState::zero_state(4)?, &force);
        assert!(matches!(evolved, Err(LftError::DisabledFeature { .. })));
        let measured = system.measure_state(&QuantumState::zero_state(4)?);
        assert!(matches!(measured, Err(LftError::DisabledFeature { .. })));
        Ok(())
    }

    #[test]
    fn test_empty_rules_rejected() -> Result<()> {
        let empty = QuantumDecisionSystem::new(RuleSet::new(), LftConfig::default())?;
        assert!(matches!(empty.process("hello"), Err(LftError::DegenerateInput { .. })));
        Ok(())
    }

    #[test]
    fn test_update_rules_adds_category() {
        let mut system = system();
        system.update_rules(vec![("farewell", vec!["bye"])]);
        assert_eq!(system.rules().categories(), vec!["greeting", "command", "farewell"]);
        assert_eq!(system.rules().get("farewell").unwrap().weight(), 1.0);
    }
}
