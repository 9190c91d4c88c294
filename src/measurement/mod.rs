// src/measurement/mod.rs

//! Turns a state's squared-amplitude distribution into a named decision.

use crate::core::constants::lft_constants::AMPLITUDE_TOLERANCE;
use crate::core::{LftError, QuantumState, Result};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use tracing::{debug, trace, warn};

/// Outcome of measuring a state against a set of categories.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    /// Winning category.
    pub chosen: String,
    /// Normalized probability of the winning category.
    pub probability: f64,
    /// Every other category with its normalized probability, in input order.
    pub alternatives: Vec<(String, f64)>,
    /// `1 - H(p) / log2(n)` over the normalized category probabilities.
    pub confidence: f64,
    /// Register width of the measured state.
    pub qubits_used: usize,
    /// The state that was measured.
    pub state: QuantumState,
}

impl Decision {
    /// Probability assigned to `category`, if it took part.
    pub fn probability_of(&self, category: &str) -> Option<f64> {
        if category == self.chosen {
            return Some(self.probability);
        }
        self.alternatives.iter().find(|(name, _)| name == category).map(|(_, p)| *p)
    }

    /// Sum over all categories; 1 within rounding.
    pub fn total_probability(&self) -> f64 {
        self.probability + self.alternatives.iter().map(|(_, p)| p).sum::<f64>()
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Decision({} p={:.4}, confidence={:.4}, {} qubits)",
            self.chosen, self.probability, self.confidence, self.qubits_used
        )
    }
}

/// Deterministic measurement of states into categories.
#[derive(Debug, Clone, Copy, Default)]
pub struct Measurer;

impl Measurer {
    pub fn new() -> Self {
        Self
    }

    /// Measures `state` against weighted `categories`.
    ///
    /// The outcome range is split into `n` contiguous chunks of `dim / n`
    /// indices in category order; the last chunk also takes the
    /// `dim % n` leftover indices. Ties go to the earlier category.
    pub fn measure(&self, state: &QuantumState, categories: &[(String, f64)]) -> Result<Decision> {
        let scores = self.action_probabilities(state, categories)?;

        let mut best = 0;
        for (i, (_, p)) in scores.iter().enumerate() {
            if *p > scores[best].1 {
                best = i;
            }
        }

        let confidence = confidence(&scores);
        let (chosen, probability) = scores[best].clone();
        let alternatives = scores
            .into_iter()
            .enumerate()
            .filter(|(i, _)| *i != best)
            .map(|(_, entry)| entry)
            .collect();

        let decision = Decision {
            chosen,
            probability,
            alternatives,
            confidence,
            qubits_used: state.num_qubits(),
            state: state.clone(),
        };
        debug!(%decision, "measured");
        Ok(decision)
    }

    /// Normalized per-category probabilities, in category order.
    pub fn action_probabilities(&self, state: &QuantumState, categories: &[(String, f64)]) -> Result<Vec<(String, f64)>> {
        if categories.is_empty() {
            return Err(LftError::degenerate("cannot measure against zero categories"));
        }
        let probabilities = state.probabilities();
        let dim = probabilities.len();
        let n = categories.len();
        let chunk = dim / n;

        let mut scores: Vec<(String, f64)> = categories
            .iter()
            .enumerate()
            .map(|(i, (name, weight))| {
                let start = i * chunk;
                let end = if i + 1 == n { dim } else { start + chunk };
                let mass: f64 = probabilities[start..end].iter().sum();
                trace!(category = name.as_str(), start, end, mass, weight, "chunk score");
                (name.clone(), weight * mass)
            })
            .collect();

        let total: f64 = scores.iter().map(|(_, s)| s).sum();
        if !total.is_finite() {
            return Err(LftError::degenerate(format!("category scores sum to {}", total)));
        }
        if total <= AMPLITUDE_TOLERANCE {
            warn!(categories = n, "all weighted scores are zero, using a uniform distribution");
            let uniform = 1.0 / n as f64;
            scores.iter_mut().for_each(|(_, s)| *s = uniform);
        } else {
            scores.iter_mut().for_each(|(_, s)| *s /= total);
        }
        Ok(scores)
    }

    /// Draws one basis index from `|state|²`.
    ///
    /// Without an explicit seed the generator is seeded from the amplitudes,
    /// so a given state always yields the same index.
    pub fn sample(&self, state: &QuantumState, seed: Option<u64>) -> usize {
        let seed = seed.unwrap_or_else(|| {
            let mut hasher = DefaultHasher::new();
            for c in state.vector() {
                c.re.to_ne_bytes().hash(&mut hasher);
                c.im.to_ne_bytes().hash(&mut hasher);
            }
            hasher.finish()
        });
        let mut rng = StdRng::seed_from_u64(seed);

        let probabilities = state.probabilities();
        let total: f64 = probabilities.iter().sum();
        let p_sample: f64 = rng.random::<f64>() * total;
        let mut cumulative = 0.0;
        for (index, p) in probabilities.iter().enumerate() {
            cumulative += p;
            if p_sample < cumulative {
                return index;
            }
        }
        // p_sample can land on `total` through rounding
        probabilities.iter().rposition(|&p| p > 0.0).unwrap_or(0)
    }
}

/// `1 - H_bits(p) / log2(n)`, 1 for a single category.
fn confidence(scores: &[(String, f64)]) -> f64 {
    if scores.len() <= 1 {
        return 1.0;
    }
    let entropy: f64 = scores.iter().map(|(_, p)| *p).filter(|&p| p > 0.0).map(|p| -p * p.log2()).sum();
    (1.0 - entropy / (scores.len() as f64).log2()).clamp(0.0, 1.0)
}
