//! Built-in selection policies.
//!
//! # Policies
//!
//! - **Reactive**: scan from the bin of the current true seeing.
//! - **ForecastAware**: scan from a bin chosen by comparing current seeing
//!   with a noisy forecast of the near future.
//!
//! Both scan bins in rank order from their starting bin to the worst bin,
//! and programs in registry order within a bin, returning the first pending
//! program that fits in the remaining time.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;

use super::{Forecaster, Selection, SelectionContext, SelectionPolicy};
use crate::config::NightConfig;
use crate::error::SetupResult;
use crate::models::SeeingBin;

// ======================== Reactive ========================

/// Current-conditions-only baseline.
///
/// Never considers bins better than the current one.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reactive;

impl SelectionPolicy for Reactive {
    fn name(&self) -> &'static str {
        "reactive"
    }

    fn select(&mut self, ctx: &SelectionContext<'_>) -> Selection {
        let program = ctx
            .registry
            .first_eligible(ctx.current_bin(), ctx.remaining_minutes);
        Selection::reactive(program)
    }

    fn description(&self) -> &'static str {
        "Baseline: schedule for the seeing observed now"
    }
}

// ======================== Forecast-aware ========================

/// Starting bin for the forecast-aware scan.
///
/// If the forecast predicts improvement (`forecast_mean < current_seeing`)
/// the better of the two bins is used, otherwise the worse one. The two
/// cases are deliberately asymmetric.
pub fn search_start(
    current_seeing: f64,
    current_bin: SeeingBin,
    forecast_mean: f64,
    forecast_bin: SeeingBin,
) -> SeeingBin {
    if forecast_mean < current_seeing {
        current_bin.min(forecast_bin)
    } else {
        current_bin.max(forecast_bin)
    }
}

/// Policy that incorporates a noisy short-horizon forecast.
///
/// Owns its random source so each run is seeded independently.
pub struct ForecastAware<R = StdRng> {
    forecaster: Forecaster,
    rng: R,
}

impl<R: Rng> ForecastAware<R> {
    /// Creates the policy with an explicit random source.
    pub fn new(forecaster: Forecaster, rng: R) -> Self {
        Self { forecaster, rng }
    }
}

impl ForecastAware<StdRng> {
    /// Creates the policy for `config` with a reproducible seed.
    ///
    /// Fails if `config` is invalid, so a bad forecast range surfaces at
    /// construction rather than on the first decision.
    pub fn seeded(config: &NightConfig, seed: u64) -> SetupResult<Self> {
        Ok(Self::new(Forecaster::new(config)?, StdRng::seed_from_u64(seed)))
    }
}

impl<R> fmt::Debug for ForecastAware<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForecastAware")
            .field("forecaster", &self.forecaster)
            .finish_non_exhaustive()
    }
}

impl<R: Rng + Send> SelectionPolicy for ForecastAware<R> {
    fn name(&self) -> &'static str {
        "forecast-aware"
    }

    fn select(&mut self, ctx: &SelectionContext<'_>) -> Selection {
        let forecast = self.forecaster.forecast(
            ctx.current_minute,
            ctx.total_minutes,
            ctx.series,
            &mut self.rng,
        );
        // The forecaster always produces a mean.
        let forecast_mean = forecast.mean.unwrap_or_else(|| ctx.current_seeing());

        let current_seeing = ctx.current_seeing();
        let start = search_start(
            current_seeing,
            ctx.classifier.classify(current_seeing),
            forecast_mean,
            ctx.classifier.classify(forecast_mean),
        );

        Selection {
            program: ctx.registry.first_eligible(start, ctx.remaining_minutes),
            forecast,
        }
    }

    fn description(&self) -> &'static str {
        "Schedule for the better of now and forecast when improving, the worse otherwise"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Program, ProgramRegistry};
    use crate::seeing::{SeeingClassifier, SeeingSeries};

    fn classifier() -> SeeingClassifier {
        SeeingClassifier::new([0.5, 0.7, 0.9]).unwrap()
    }

    fn registry() -> ProgramRegistry {
        ProgramRegistry::new(vec![
            Program::imaging("fair", SeeingBin::Fair, 40),
            Program::imaging("excellent", SeeingBin::Excellent, 40),
            Program::imaging("poor", SeeingBin::Poor, 40),
        ])
    }

    fn ctx<'a>(
        t: u32,
        series: &'a SeeingSeries,
        registry: &'a ProgramRegistry,
        classifier: &'a SeeingClassifier,
    ) -> SelectionContext<'a> {
        let total = series.len() as u32;
        SelectionContext {
            current_minute: t,
            remaining_minutes: total - t,
            total_minutes: total,
            series,
            registry,
            classifier,
        }
    }

    /// 0.8 now (Fair), 0.4 (Excellent) from minute 1 onward.
    fn improving_series() -> SeeingSeries {
        let mut values = vec![0.4; 600];
        values[0] = 0.8;
        SeeingSeries::new(values)
    }

    #[test]
    fn test_search_start_improving_uses_better_bin() {
        let start = search_start(0.8, SeeingBin::Fair, 0.4, SeeingBin::Excellent);
        assert_eq!(start, SeeingBin::Excellent);
    }

    #[test]
    fn test_search_start_worsening_uses_worse_bin() {
        let start = search_start(0.4, SeeingBin::Excellent, 0.8, SeeingBin::Fair);
        assert_eq!(start, SeeingBin::Fair);
        // Flat forecast counts as not improving
        let flat = search_start(0.6, SeeingBin::Good, 0.6, SeeingBin::Good);
        assert_eq!(flat, SeeingBin::Good);
    }

    #[test]
    fn test_search_start_improving_within_same_bin() {
        let start = search_start(0.65, SeeingBin::Good, 0.55, SeeingBin::Good);
        assert_eq!(start, SeeingBin::Good);
    }

    #[test]
    fn test_reactive_scans_from_current_bin() {
        let series = improving_series();
        let reg = registry();
        let c = classifier();
        let sel = Reactive.select(&ctx(0, &series, &reg, &c));
        assert_eq!(sel.program, Some(0)); // "fair"
        assert_eq!(sel.forecast.mean, None);
    }

    #[test]
    fn test_reactive_none_when_nothing_fits() {
        let series = SeeingSeries::constant(0.8, 30);
        let reg = registry();
        let c = classifier();
        let sel = Reactive.select(&ctx(0, &series, &reg, &c));
        assert_eq!(sel.program, None);
    }

    #[test]
    fn test_forecast_aware_acts_on_improvement() {
        let config = NightConfig::default().with_max_uncertainty(0.0);
        let mut policy = ForecastAware::seeded(&config, 1).unwrap();
        let series = improving_series();
        let reg = registry();
        let c = classifier();

        let sel = policy.select(&ctx(0, &series, &reg, &c));
        assert_eq!(sel.program, Some(1)); // "excellent", scan began at rank 0
        assert!((sel.forecast.mean.unwrap() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_forecast_aware_conservative_on_degradation() {
        let config = NightConfig::default().with_max_uncertainty(0.0);
        let mut policy = ForecastAware::seeded(&config, 1).unwrap();
        let mut values = vec![1.2; 600];
        values[0] = 0.4;
        let series = SeeingSeries::new(values);
        let reg = registry();
        let c = classifier();

        let sel = policy.select(&ctx(0, &series, &reg, &c));
        assert_eq!(sel.program, Some(2)); // "poor": worse of Excellent/Poor
    }

    #[test]
    fn test_descriptions_name_the_strategy() {
        let forecast = ForecastAware::seeded(&NightConfig::default(), 1).unwrap();
        assert!(Reactive.description().starts_with("Baseline"));
        assert_ne!(forecast.description(), forecast.name());
    }

    #[test]
    fn test_seeded_rejects_invalid_forecast_range() {
        let config = NightConfig::default().with_seeing_range(2.0, 0.3);
        assert!(ForecastAware::seeded(&config, 1).is_err());
    }

    #[test]
    fn test_forecast_aware_reports_forecast_without_match() {
        let config = NightConfig::default().with_max_uncertainty(0.0);
        let mut policy = ForecastAware::seeded(&config, 1).unwrap();
        let series = SeeingSeries::constant(0.6, 600);
        let reg = ProgramRegistry::new(vec![Program::imaging("big", SeeingBin::Good, 900)]);
        let c = classifier();

        let sel = policy.select(&ctx(595, &series, &reg, &c));
        assert_eq!(sel.program, None);
        assert_eq!(sel.forecast.mean, Some(0.6));
        assert_eq!(sel.forecast.uncertainty, 0.0);
    }
}
