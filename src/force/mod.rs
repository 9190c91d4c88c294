// src/force/mod.rs

//! Turns free text into a logical force by matching tokens against a `RuleSet`.
//!
//! Two calculation modes exist side by side. The scalar mode counts
//! `(token, category)` hits and yields a single number; the vector mode yields
//! a full [`LogicForce`] with magnitude, coherence, direction and uncertainty.
//! Their formulas differ on purpose and are not unified.

mod processor;

pub use processor::{LogicForceProcessor, LogicForceResult, ScalarForceProcessor};

use crate::core::constants::lft_constants::{PI, TAU, WILDCARD};
use crate::core::{LogicForce, LogicRule, RuleSet};
use std::collections::HashSet;
use tracing::{debug, trace};

const COHERENCE_EPSILON: f64 = 1e-12;

/// Which shape of force a calculation should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceMode {
    Scalar,
    Vector,
}

/// Result of [`ForceCalculator::calculate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ForceValue {
    Scalar(f64),
    Vector(LogicForce),
}

/// Stateless rule matcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForceCalculator;

/// Lower-cases and splits on whitespace.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase().split_whitespace().map(str::to_string).collect()
}

/// One category that matched at least one pattern.
struct CategoryMatch<'a> {
    rule: &'a LogicRule,
    patterns: Vec<&'a str>,
}

impl ForceCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Dispatches on `mode`. `context` only affects the vector mode.
    pub fn calculate(&self, text: &str, rules: &RuleSet, mode: ForceMode, context: Option<&str>) -> ForceValue {
        match mode {
            ForceMode::Scalar => ForceValue::Scalar(self.scalar_force(text, rules)),
            ForceMode::Vector => ForceValue::Vector(self.vector_force(text, rules, context)),
        }
    }

    /// Scalar force: every `(token, category)` hit contributes
    /// `1 / num_categories`, capped at 1.
    pub fn scalar_force(&self, text: &str, rules: &RuleSet) -> f64 {
        let tokens = tokenize(text);
        if tokens.is_empty() || rules.is_empty() {
            return 0.0;
        }
        let share = 1.0 / rules.len() as f64;
        let hits = tokens
            .iter()
            .map(|token| rules.iter().filter(|(_, rule)| rule.matches(token)).count())
            .sum::<usize>();
        let force = (hits as f64 * share).min(1.0);
        debug!(hits, force, "scalar force");
        force
    }

    /// Vector force over the rule set, optionally aligned to `context`.
    pub fn vector_force(&self, text: &str, rules: &RuleSet, context: Option<&str>) -> LogicForce {
        let tokens = tokenize(text);
        let matches = find_matches(&tokens, rules);
        if matches.is_empty() {
            debug!("no rule matched, returning zero force");
            return LogicForce::zero();
        }

        let force = LogicForce::new(
            magnitude(&matches, rules.len()),
            coherence(&matches),
            direction(&matches, context),
            uncertainty(&matches, &tokens),
        );
        debug!(%force, categories = matches.len(), "vector force");
        force
    }
}

/// Categories with at least one matching pattern, in rule-set order.
fn find_matches<'a>(tokens: &[String], rules: &'a RuleSet) -> Vec<CategoryMatch<'a>> {
    rules
        .iter()
        .filter_map(|(id, rule)| {
            let patterns: Vec<&str> = rule
                .patterns()
                .iter()
                .map(String::as_str)
                .filter(|p| tokens.iter().any(|t| crate::core::pattern_matches(p, t)))
                .collect();
            trace!(category = id, matched = patterns.len(), "pattern scan");
            (!patterns.is_empty()).then_some(CategoryMatch { rule, patterns })
        })
        .collect()
}

fn magnitude(matches: &[CategoryMatch<'_>], total_categories: usize) -> f64 {
    let total_weight: f64 = matches.iter().map(|m| m.rule.weight() * m.patterns.len() as f64).sum();
    (total_weight / total_categories as f64).min(1.0)
}

/// `1 - H(p) / ln(k)` over the matched-pattern counts of the `k` matched categories.
fn coherence(matches: &[CategoryMatch<'_>]) -> f64 {
    if matches.len() <= 1 {
        return 1.0;
    }
    let total: usize = matches.iter().map(|m| m.patterns.len()).sum();
    let entropy: f64 = matches
        .iter()
        .map(|m| m.patterns.len() as f64 / total as f64)
        .filter(|&p| p > 0.0)
        .map(|p| -p * p.ln())
        .sum();
    let max_entropy = (matches.len() as f64).ln();
    let coherence = 1.0 - entropy / max_entropy;
    // An even spread must read as exactly zero, not a rounding residue.
    if coherence.abs() < COHERENCE_EPSILON {
        return 0.0;
    }
    coherence.clamp(0.0, 1.0)
}

fn direction(matches: &[CategoryMatch<'_>], context: Option<&str>) -> f64 {
    let Some(context) = context.filter(|c| !c.is_empty()) else {
        return 0.0;
    };
    let aligned = matches.iter().filter(|m| m.rule.context() == Some(context)).count();
    if aligned == 0 {
        return PI;
    }
    TAU * aligned as f64 / matches.len() as f64
}

/// `1 - unique matched words / token count`; wildcard patterns claim every
/// token sharing their prefix.
fn uncertainty(matches: &[CategoryMatch<'_>], tokens: &[String]) -> f64 {
    if tokens.is_empty() {
        return 1.0;
    }
    let mut matched: HashSet<&str> = HashSet::new();
    for &pattern in matches.iter().flat_map(|m| m.patterns.iter()) {
        match pattern.strip_suffix(WILDCARD) {
            Some(prefix) => matched.extend(tokens.iter().map(String::as_str).filter(|t| t.starts_with(prefix))),
            None => {
                matched.insert(pattern);
            }
        }
    }
    (1.0 - matched.len() as f64 / tokens.len() as f64).clamp(0.0, 1.0)
}
