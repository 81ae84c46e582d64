//! Error types for distribution parameter validation.

use std::fmt;

/// Result type for distribution operations.
pub type StatsResult<T> = Result<T, StatsError>;

/// Errors produced when constructing a distribution or requesting an
/// interval. Evaluation methods never error; numeric domain violations
/// propagate as NaN/Inf instead.
#[derive(Debug, Clone)]
pub enum StatsError {
    /// Invalid parameter value for a distribution.
    InvalidParameter {
        name: String,
        value: f64,
        reason: String,
    },

    /// Probability value out of range [0, 1].
    InvalidProbability { value: f64 },
}

impl fmt::Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter {
                name,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{}' = {}: {}", name, value, reason)
            }
            Self::InvalidProbability { value } => {
                write!(f, "Invalid probability {}: must be in [0, 1]", value)
            }
        }
    }
}

impl std::error::Error for StatsError {}
