//! Input validation for scheduling nights.
//!
//! Checks configuration and registry integrity before a night is built, so
//! the run loop itself never has to fail. Detects:
//! - Inconsistent forecast horizon / window
//! - Invalid seeing range, percentile cuts or noise parameters
//! - Empty registries, duplicate program IDs, zero-length programs
//! - Night lengths that are zero or exceed the seeing series
//!
//! All problems are collected rather than stopping at the first one.

use crate::config::NightConfig;
use crate::models::ProgramRegistry;
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A configuration value is out of range.
    InvalidConfig,
    /// Two programs share the same ID.
    DuplicateId,
    /// The registry has no programs.
    EmptyRegistry,
    /// A program has a zero base duration.
    InvalidDuration,
    /// Percentile cut points are not strictly increasing inside (0, 100).
    DegenerateBoundaries,
    /// Night length is zero or longer than the seeing series.
    InvalidNightLength,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    fn config(message: impl Into<String>) -> Self {
        Self::new(ValidationErrorKind::InvalidConfig, message)
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

fn into_result(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a night configuration.
///
/// Checks:
/// 1. Lookahead and forecast window are positive, window ≤ lookahead
/// 2. Forecast uncertainty is finite and non-negative
/// 3. Percentile cuts are strictly increasing inside (0, 100)
/// 4. Seeing range is finite and non-empty
/// 5. Retry budget is positive
/// 6. Reference distribution has a positive spread, sample size and a
///    finite, non-empty clip range
pub fn validate_config(config: &NightConfig) -> ValidationResult {
    into_result(config_errors(config))
}

/// Whether `[min, max]` is a finite, non-empty interval.
pub(crate) fn is_valid_range(min: f64, max: f64) -> bool {
    min.is_finite() && max.is_finite() && min < max
}

fn config_errors(config: &NightConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.max_lookahead == 0 {
        errors.push(ValidationError::config("max_lookahead must be positive"));
    }
    if config.forecast_window == 0 {
        errors.push(ValidationError::config("forecast_window must be positive"));
    }
    if config.forecast_window > config.max_lookahead {
        errors.push(ValidationError::config(format!(
            "forecast_window ({}) exceeds max_lookahead ({})",
            config.forecast_window, config.max_lookahead
        )));
    }
    if !(config.max_uncertainty.is_finite() && config.max_uncertainty >= 0.0) {
        errors.push(ValidationError::config(format!(
            "max_uncertainty must be finite and non-negative, got {}",
            config.max_uncertainty
        )));
    }

    let [a, b, c] = config.percentile_cuts;
    let cuts_ok = a > 0.0 && a < b && b < c && c < 100.0;
    if !cuts_ok {
        errors.push(ValidationError::new(
            ValidationErrorKind::DegenerateBoundaries,
            format!(
                "percentile cuts must be strictly increasing inside (0, 100), got {:?}",
                config.percentile_cuts
            ),
        ));
    }

    if !is_valid_range(config.min_seeing, config.max_seeing) {
        errors.push(ValidationError::config(format!(
            "seeing range [{}, {}] is empty or not finite",
            config.min_seeing, config.max_seeing
        )));
    }

    if config.max_retries == 0 {
        errors.push(ValidationError::config("max_retries must be positive"));
    }

    let model = &config.seeing;
    if !(model.std_dev.is_finite() && model.std_dev > 0.0) {
        errors.push(ValidationError::config(format!(
            "seeing std_dev must be positive, got {}",
            model.std_dev
        )));
    }
    if model.reference_sample_size == 0 {
        errors.push(ValidationError::config(
            "reference_sample_size must be positive",
        ));
    }
    if !is_valid_range(model.reference_floor, model.reference_ceiling) {
        errors.push(ValidationError::config(format!(
            "reference clip range [{}, {}] is empty or not finite",
            model.reference_floor, model.reference_ceiling
        )));
    }

    errors
}

/// Validates a program registry.
///
/// Checks:
/// 1. At least one program
/// 2. No duplicate program IDs
/// 3. Every program has a positive base duration
pub fn validate_registry(registry: &ProgramRegistry) -> ValidationResult {
    into_result(registry_errors(registry))
}

fn registry_errors(registry: &ProgramRegistry) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if registry.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyRegistry,
            "Registry has no programs",
        ));
    }

    let mut ids = HashSet::new();
    for p in registry.iter() {
        if !ids.insert(p.id()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate program ID: {}", p.id()),
            ));
        }
        if p.obs_minutes() == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDuration,
                format!("Program '{}' has zero observation time", p.id()),
            ));
        }
    }

    errors
}

/// Validates everything needed to build a night.
///
/// Runs [`validate_config`] and [`validate_registry`] and additionally
/// requires `0 < total_minutes <= series_len`.
pub fn validate_night(
    config: &NightConfig,
    registry: &ProgramRegistry,
    series_len: usize,
    total_minutes: u32,
) -> ValidationResult {
    let mut errors = config_errors(config);
    errors.extend(registry_errors(registry));

    if total_minutes == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidNightLength,
            "Night length must be positive",
        ));
    } else if total_minutes as usize > series_len {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidNightLength,
            format!(
                "Night length {total_minutes} exceeds seeing series length {series_len}"
            ),
        ));
    }

    into_result(errors)
}
