// src/core/force.rs

use std::fmt;

/// Structured measure of how strongly a piece of text engages the rule set.
///
/// Produced once per input and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogicForce {
    /// Weighted match strength, `[0, 1]`.
    pub magnitude: f64,
    /// Concentration of matches across categories, `[0, 1]`.
    pub coherence: f64,
    /// Context alignment angle, `[0, 2π]`.
    pub direction: f64,
    /// Share of input tokens left unexplained by any rule, `[0, 1]`.
    pub uncertainty: f64,
}

impl LogicForce {
    pub fn new(magnitude: f64, coherence: f64, direction: f64, uncertainty: f64) -> Self {
        Self { magnitude, coherence, direction, uncertainty }
    }

    /// The canonical "no match" force.
    pub fn zero() -> Self {
        Self::new(0.0, 1.0, 0.0, 1.0)
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    /// Whether the magnitude reaches `threshold`.
    pub fn is_significant(&self, threshold: f64) -> bool {
        self.magnitude >= threshold
    }

    /// Whether the coherence reaches `threshold`.
    pub fn is_coherent(&self, threshold: f64) -> bool {
        self.coherence >= threshold
    }
}

impl Default for LogicForce {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for LogicForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Force(magnitude={:.4}, coherence={:.4}, direction={:.4}, uncertainty={:.4})",
            self.magnitude, self.coherence, self.direction, self.uncertainty
        )
    }
}
