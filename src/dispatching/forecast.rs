//! Noisy short-horizon seeing forecasts.
//!
//! # Algorithm
//!
//! For a decision at minute `t` the sampled window is the trailing slice
//! of the lookahead:
//!
//! ```text
//! start = min(t + L − W, T)     end = min(t + L, T)
//! ```
//!
//! Each minute `m` in `[start, end)` contributes a draw from
//! `N(series[m], σ(m − t))` clipped to the physical range. The forecast is
//! the mean of the draws together with the mean σ. When the window is empty
//! (close to the end of the night) the forecast falls back to the true value
//! at `min(t, T − 1)` with zero uncertainty.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use std::ops::Range;

use crate::config::NightConfig;
use crate::error::SetupResult;
use crate::models::ForecastSample;
use crate::seeing::{SeeingSeries, UncertaintyModel};
use crate::validation::validate_config;

/// Forecast generator with horizon-dependent noise.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecaster {
    config: NightConfig,
    uncertainty: UncertaintyModel,
}

impl Forecaster {
    /// Creates a forecaster from the night configuration.
    ///
    /// Fails if `config` does not pass [`validate_config`].
    pub fn new(config: &NightConfig) -> SetupResult<Self> {
        validate_config(config)?;
        Ok(Self::from_valid(config.clone()))
    }

    fn from_valid(config: NightConfig) -> Self {
        let uncertainty = UncertaintyModel::from_config(&config);
        Self {
            config,
            uncertainty,
        }
    }

    /// Sampled window for a decision at `current_minute`, or `None` if it
    /// collapses at the end of the night.
    pub fn window(&self, current_minute: u32, total_minutes: u32) -> Option<Range<u32>> {
        let lookahead = self.config.max_lookahead;
        let lead = lookahead.saturating_sub(self.config.forecast_window);
        let start = current_minute.saturating_add(lead).min(total_minutes);
        let end = current_minute.saturating_add(lookahead).min(total_minutes);
        (end > start).then_some(start..end)
    }

    /// Forecast for a decision at `current_minute`.
    ///
    /// `total_minutes` must be positive and not exceed `series.len()`.
    pub fn forecast<R: Rng>(
        &self,
        current_minute: u32,
        total_minutes: u32,
        series: &SeeingSeries,
        rng: &mut R,
    ) -> ForecastSample {
        let Some(window) = self.window(current_minute, total_minutes) else {
            let fallback = current_minute.min(total_minutes.saturating_sub(1));
            return ForecastSample::new(series.at(fallback), 0.0);
        };

        let n = window.len() as f64;
        let (sum_value, sum_sigma) = window.fold((0.0, 0.0), |(sv, ss), minute| {
            let sigma = self.uncertainty.sigma(minute - current_minute);
            let truth = series.at(minute);
            let noisy = match Normal::new(truth, sigma) {
                Ok(noise) => noise.sample(rng),
                Err(_) => truth,
            };
            (sv + self.config.clip_seeing(noisy), ss + sigma)
        });

        ForecastSample::new(sum_value / n, sum_sigma / n)
    }
}

impl Default for Forecaster {
    fn default() -> Self {
        Self::from_valid(NightConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ramp(minutes: usize) -> SeeingSeries {
        SeeingSeries::new((0..minutes).map(|i| 0.3 + i as f64 * 0.001).collect())
    }

    #[test]
    fn test_window_is_trailing_slice() {
        let f = Forecaster::default();
        assert_eq!(f.window(0, 600), Some(20..30));
        assert_eq!(f.window(100, 600), Some(120..130));
        // Partially clipped near the end
        assert_eq!(f.window(575, 600), Some(595..600));
    }

    #[test]
    fn test_degenerate_window_falls_back() {
        let f = Forecaster::default();
        let series = ramp(600);
        assert_eq!(f.window(595, 600), None);

        let sample = f.forecast(595, 600, &series, &mut StdRng::seed_from_u64(0));
        assert_eq!(sample.mean, Some(series.at(595)));
        assert_eq!(sample.uncertainty, 0.0);
    }

    #[test]
    fn test_fallback_clamps_to_last_minute() {
        let f = Forecaster::default();
        let series = ramp(600);
        let sample = f.forecast(600, 600, &series, &mut StdRng::seed_from_u64(0));
        assert_eq!(sample.mean, Some(series.at(599)));
    }

    #[test]
    fn test_noiseless_forecast_is_window_mean() {
        let config = NightConfig::default().with_max_uncertainty(0.0);
        let f = Forecaster::new(&config).unwrap();
        let series = ramp(600);
        let sample = f.forecast(0, 600, &series, &mut StdRng::seed_from_u64(0));
        let expected = series.mean_over(20, 30).unwrap();
        assert!((sample.mean.unwrap() - expected).abs() < 1e-12);
        assert_eq!(sample.uncertainty, 0.0);
    }

    #[test]
    fn test_uncertainty_is_mean_sigma() {
        let f = Forecaster::default();
        let series = ramp(600);
        let sample = f.forecast(0, 600, &series, &mut StdRng::seed_from_u64(0));
        let model = UncertaintyModel::default();
        let expected = (20..30).map(|m| model.sigma(m)).sum::<f64>() / 10.0;
        assert!((sample.uncertainty - expected).abs() < 1e-12);
    }

    #[test]
    fn test_noisy_samples_are_clipped() {
        let config = NightConfig::default().with_max_uncertainty(50.0);
        let f = Forecaster::new(&config).unwrap();
        let series = SeeingSeries::constant(1.0, 100);
        let mut rng = StdRng::seed_from_u64(11);
        for t in 0..60 {
            let mean = f.forecast(t, 100, &series, &mut rng).mean.unwrap();
            assert!((0.3..=2.0).contains(&mean));
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let inverted = NightConfig::default().with_seeing_range(2.0, 0.3);
        assert!(Forecaster::new(&inverted).is_err());
        let no_window = NightConfig::default().with_lookahead(30, 0);
        assert!(Forecaster::new(&no_window).is_err());
    }

    #[test]
    fn test_seeded_forecast_reproducible() {
        let f = Forecaster::default();
        let series = ramp(600);
        let a = f.forecast(10, 600, &series, &mut StdRng::seed_from_u64(4));
        let b = f.forecast(10, 600, &series, &mut StdRng::seed_from_u64(4));
        assert_eq!(a, b);
    }
}
