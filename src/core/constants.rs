//! Numeric constants shared by the simulation stages.

/// Constants governing tolerances and register limits
pub mod lft_constants {
    /// Allowed deviation of `Σ|c_i|²` from 1 before a state is rescaled.
    pub const NORM_TOLERANCE: f64 = 1e-9;
    /// Amplitudes or norms below this are treated as zero.
    pub const AMPLITUDE_TOLERANCE: f64 = 1e-12;
    /// Largest register the dense simulation accepts.
    ///
    /// The density-matrix path materializes a `2^n x 2^n` complex operator and
    /// eigendecomposes a matrix of the same size, so memory grows as `4^n`
    /// and time as `8^n`. Eight qubits is a 256 x 256 problem.
    pub const MAX_QUBITS: usize = 8;
    /// Trailing marker turning a rule pattern into a prefix match.
    pub const WILDCARD: char = '*';
    /// Used for phase angles (`e^(iθ)`)
    pub const PI: f64 = std::f64::consts::PI;
    /// Full turn, upper bound of a force direction.
    pub const TAU: f64 = std::f64::consts::TAU;
}
