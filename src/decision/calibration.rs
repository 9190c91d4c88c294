// src/decision/calibration.rs

use crate::core::{Result, RuleSet};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Success/total counts per expected category for one calibration pass.
///
/// A single batch pass: counts are gathered first and weights are written
/// once, as `successes / totals`, when the pass is applied. Categories that
/// never appeared as an expected label keep their weight.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Calibrator {
    tallies: HashMap<String, (usize, usize)>,
}

impl Calibrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one labelled prediction.
    pub fn record(&mut self, expected: &str, predicted: &str) {
        let entry = self.tallies.entry(expected.to_string()).or_insert((0, 0));
        if expected == predicted {
            entry.0 += 1;
        }
        entry.1 += 1;
    }

    /// `(successes, totals)` for `category`.
    pub fn tally(&self, category: &str) -> (usize, usize) {
        self.tallies.get(category).copied().unwrap_or((0, 0))
    }

    /// Empirical success rate, if the category was observed.
    pub fn success_rate(&self, category: &str) -> Option<f64> {
        match self.tally(category) {
            (_, 0) => None,
            (successes, totals) => Some(successes as f64 / totals as f64),
        }
    }

    /// Writes the success rates into `rules`.
    pub fn apply(&self, rules: &mut RuleSet) -> Result<()> {
        for (category, &(successes, totals)) in &self.tallies {
            if totals == 0 {
                continue;
            }
            if !rules.contains(category) {
                warn!(category = category.as_str(), "calibration label names an unknown category, skipped");
                continue;
            }
            let weight = successes as f64 / totals as f64;
            rules.set_weight(category, weight)?;
            debug!(category = category.as_str(), successes, totals, weight, "calibrated weight");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_rates() -> Result<()> {
        let mut rules = RuleSet::from_patterns(vec![("a", vec!["x"]), ("b", vec!["y"]), ("c", vec!["z"])]);
        rules.set_weight("c", 0.3)?;

        let mut calibrator = Calibrator::new();
        calibrator.record("a", "a");
        calibrator.record("a", "b");
        calibrator.record("a", "a");
        calibrator.record("a", "a");
        calibrator.record("b", "a");
        calibrator.record("ghost", "a");

        assert_eq!(calibrator.tally("a"), (3, 4));
        assert_eq!(calibrator.success_rate("c"), None);
        calibrator.apply(&mut rules)?;

        assert_eq!(rules.get("a").unwrap().weight(), 0.75);
        assert_eq!(rules.get("b").unwrap().weight(), 0.0);
        assert_eq!(rules.get("c").unwrap().weight(), 0.3);
        assert!(!rules.contains("ghost"));
        Ok(())
    }
}
