// src/core/rules.rs

use super::constants::lft_constants::WILDCARD;
use super::error::{LftError, Result};
use std::collections::HashMap;
use std::fmt;

/// Match patterns for one category plus its weight and optional context tag.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicRule {
    patterns: Vec<String>,
    weight: f64,
    context: Option<String>,
}

impl LogicRule {
    /// Creates a rule, rejecting weights outside `[0, 1]`.
    pub fn new(patterns: Vec<String>, weight: f64, context: Option<String>) -> Result<Self> {
        validate_weight(weight)?;
        Ok(Self { patterns, weight, context })
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Whether any of this rule's patterns matches `token`.
    pub fn matches(&self, token: &str) -> bool {
        self.patterns.iter().any(|p| pattern_matches(p, token))
    }
}

/// A pattern matches a token when equal to it, or, when it ends with the
/// wildcard marker, when the token starts with the pattern's prefix.
pub fn pattern_matches(pattern: &str, token: &str) -> bool {
    match pattern.strip_suffix(WILDCARD) {
        Some(prefix) => token.starts_with(prefix),
        None => pattern == token,
    }
}

fn validate_weight(weight: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&weight) {
        return Err(LftError::configuration(format!(
            "Weight must be between 0 and 1, got {}",
            weight
        )));
    }
    Ok(())
}

/// Named rule categories in insertion order.
///
/// Lookup is by name; iteration follows insertion order, which the measurer
/// uses to lay categories out over the outcome space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    entries: Vec<(String, LogicRule)>,
    index: HashMap<String, usize>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a rule set from `(category, patterns)` pairs, each at weight 1.0.
    pub fn from_patterns<I, S, P>(mapping: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<P>)>,
        S: Into<String>,
        P: Into<String>,
    {
        let mut rules = Self::new();
        rules.update_rules(mapping);
        rules
    }

    /// Adds or replaces a category.
    pub fn add_rule(
        &mut self,
        id: impl Into<String>,
        patterns: Vec<String>,
        weight: f64,
        context: Option<String>,
    ) -> Result<()> {
        let rule = LogicRule::new(patterns, weight, context)?;
        self.insert(id.into(), rule);
        Ok(())
    }

    /// Merges `(category, patterns)` pairs: existing categories get the new
    /// patterns and keep their weight and context, new ones start at weight 1.0.
    pub fn update_rules<I, S, P>(&mut self, mapping: I)
    where
        I: IntoIterator<Item = (S, Vec<P>)>,
        S: Into<String>,
        P: Into<String>,
    {
        for (id, patterns) in mapping {
            let id = id.into();
            let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
            match self.index.get(&id) {
                Some(&i) => self.entries[i].1.patterns = patterns,
                None => self.insert(id, LogicRule { patterns, weight: 1.0, context: None }),
            }
        }
    }

    /// Sets a category's weight; unknown categories and out-of-range weights are errors.
    pub fn set_weight(&mut self, id: &str, weight: f64) -> Result<()> {
        validate_weight(weight)?;
        let i = *self
            .index
            .get(id)
            .ok_or_else(|| LftError::configuration(format!("Unknown rule category '{}'", id)))?;
        self.entries[i].1.weight = weight;
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&LogicRule> {
        self.index.get(id).map(|&i| &self.entries[i].1)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Categories with their rules, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LogicRule)> {
        self.entries.iter().map(|(id, rule)| (id.as_str(), rule))
    }

    /// Category names in insertion order.
    pub fn categories(&self) -> Vec<&str> {
        self.entries.iter().map(|(id, _)| id.as_str()).collect()
    }

    /// `(category, weight)` pairs in insertion order.
    pub fn weights(&self) -> Vec<(String, f64)> {
        self.entries.iter().map(|(id, rule)| (id.clone(), rule.weight)).collect()
    }

    fn insert(&mut self, id: String, rule: LogicRule) {
        match self.index.get(&id) {
            Some(&i) => self.entries[i].1 = rule,
            None => {
                self.index.insert(id.clone(), self.entries.len());
                self.entries.push((id, rule));
            }
        }
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "RuleSet ({} categories):", self.len())?;
        for (id, rule) in self.iter() {
            write!(f, "  {} (w={:.3}): {}", id, rule.weight, rule.patterns.join(", "))?;
            if let Some(ctx) = rule.context() {
                write!(f, " [{}]", ctx)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
