//! Validation errors for rule tuning.

/// Rejected tuning values.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RulesError {
    #[error("probability `{name}` must be within [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("`{name}` must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("stat bounds are inverted: {0}")]
    InvertedBounds(String),
}

/// Check that a configured chance is usable as a probability.
pub fn check_probability(name: &'static str, value: f64) -> Result<(), RulesError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(RulesError::InvalidProbability { name, value })
    }
}

/// Check that a configured factor or divisor is strictly positive.
pub fn check_positive(name: &'static str, value: f64) -> Result<(), RulesError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(RulesError::NonPositive { name, value })
    }
}
