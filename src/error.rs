//! Construction-time errors.
//!
//! A night either fails while it is being set up or runs to a normal
//! termination. Nothing inside the run loop produces an error.

use crate::validation::{is_valid_range, ValidationError};

/// Result type for setup operations.
pub type SetupResult<T> = Result<T, SetupError>;

/// Error raised while building classifiers, series or nights.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("invalid night setup: {}", join_messages(.0))]
    Invalid(Vec<ValidationError>),

    #[error("seeing bin boundaries must be finite and strictly increasing, got {cuts:?}")]
    DegenerateBoundaries { cuts: [f64; 3] },

    #[error("seeing range [{min}, {max}] is empty or not finite")]
    InvalidRange { min: f64, max: f64 },

    #[error("reference sample is empty")]
    EmptySample,

    #[error("invalid noise distribution: {0}")]
    Distribution(#[from] rand_distr::NormalError),
}

impl From<Vec<ValidationError>> for SetupError {
    fn from(errors: Vec<ValidationError>) -> Self {
        SetupError::Invalid(errors)
    }
}

impl SetupError {
    /// `Ok` if `[min, max]` is a finite, non-empty interval.
    pub(crate) fn check_range(min: f64, max: f64) -> SetupResult<()> {
        if is_valid_range(min, max) {
            Ok(())
        } else {
            Err(SetupError::InvalidRange { min, max })
        }
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
