//! Baseline vs forecast-aware comparison over one shared night.
//!
//! Each policy gets its own [`Night`] and its own copy of the registry; only
//! the seeing series is shared, read-only. The two runs execute on scoped
//! threads.

use std::sync::Arc;

use super::{Night, NightReport};
use crate::config::NightConfig;
use crate::dispatching::{ForecastAware, Reactive, SelectionPolicy};
use crate::error::SetupResult;
use crate::models::ProgramRegistry;
use crate::seeing::{SeeingClassifier, SeeingSeries};

/// Reports of both policies over the same night.
#[derive(Debug, Clone)]
pub struct Comparison {
    /// Reactive (current conditions only) run.
    pub baseline: NightReport,
    /// Forecast-aware run.
    pub forecast: NightReport,
}

impl Comparison {
    /// Extra passed programs achieved by the forecast-aware policy.
    pub fn pass_gain(&self) -> i64 {
        self.forecast.summary.passed as i64 - self.baseline.summary.passed as i64
    }
}

/// Runs the reactive baseline and the forecast-aware policy seeded with
/// `forecast_seed` over `series`.
pub fn compare_policies(
    config: &NightConfig,
    classifier: SeeingClassifier,
    series: Arc<SeeingSeries>,
    registry: &ProgramRegistry,
    forecast_seed: u64,
) -> SetupResult<Comparison> {
    let mut forecast_policy = ForecastAware::seeded(config, forecast_seed)?;
    let mut baseline_policy = Reactive;
    compare_with(
        config,
        classifier,
        series,
        registry,
        &mut baseline_policy,
        &mut forecast_policy,
    )
}

/// Runs two arbitrary policies over the same night.
pub fn compare_with(
    config: &NightConfig,
    classifier: SeeingClassifier,
    series: Arc<SeeingSeries>,
    registry: &ProgramRegistry,
    baseline_policy: &mut dyn SelectionPolicy,
    forecast_policy: &mut dyn SelectionPolicy,
) -> SetupResult<Comparison> {
    let mut baseline = Night::new(
        config.clone(),
        classifier,
        Arc::clone(&series),
        registry.clone(),
    )?;
    let mut forecast = Night::new(config.clone(), classifier, series, registry.clone())?;

    std::thread::scope(|s| {
        s.spawn(|| baseline.run(baseline_policy));
        s.spawn(|| forecast.run(forecast_policy));
    });

    let comparison = Comparison {
        baseline: baseline.report(),
        forecast: forecast.report(),
    };
    log::info!(
        "{}: {} passed, {}: {} passed",
        comparison.baseline.policy,
        comparison.baseline.summary.passed,
        comparison.forecast.policy,
        comparison.forecast.summary.passed
    );
    Ok(comparison)
}
