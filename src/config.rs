//! Night configuration.
//!
//! Collects every tunable constant of a scheduling run: observation
//! overheads, forecast horizon, seeing bin cut points, retry budget and the
//! physical seeing range. All values have conventional defaults and can be
//! loaded from any `serde` format.
//!
//! # Units
//! Durations are whole simulated minutes. Seeing values are in
//! arcsec-equivalent units (lower = sharper).

use serde::{Deserialize, Serialize};

use crate::models::ObservationKind;

/// Fixed setup time per observation kind (minutes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverheadTable {
    /// Overhead added to imaging programs.
    pub imaging: u32,
    /// Overhead added to spectroscopy programs.
    pub spectroscopy: u32,
}

impl OverheadTable {
    /// Creates an overhead table.
    pub fn new(imaging: u32, spectroscopy: u32) -> Self {
        Self {
            imaging,
            spectroscopy,
        }
    }

    /// Overhead for the given observation kind.
    #[inline]
    pub fn overhead(&self, kind: ObservationKind) -> u32 {
        match kind {
            ObservationKind::Imaging => self.imaging,
            ObservationKind::Spectroscopy => self.spectroscopy,
        }
    }
}

impl Default for OverheadTable {
    fn default() -> Self {
        Self::new(10, 20)
    }
}

/// Parameters of the site seeing distribution.
///
/// Used both for the one-time reference sample that fixes bin boundaries
/// and, by default, for series generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeeingModel {
    /// Typical (median) seeing.
    pub mean: f64,
    /// Night-to-night spread.
    pub std_dev: f64,
    /// Number of draws in the reference sample.
    pub reference_sample_size: usize,
    /// Lower clip applied to reference draws.
    pub reference_floor: f64,
    /// Upper clip applied to reference draws.
    pub reference_ceiling: f64,
}

impl Default for SeeingModel {
    fn default() -> Self {
        Self {
            mean: 0.7,
            std_dev: 0.2,
            reference_sample_size: 10_000,
            reference_floor: 0.0,
            reference_ceiling: 2.0,
        }
    }
}

/// Configuration of a single scheduling night.
///
/// # Example
/// ```
/// use seeing_schedule::config::NightConfig;
///
/// let config = NightConfig::default()
///     .with_max_retries(20)
///     .with_lookahead(45, 15);
/// assert_eq!(config.max_retries, 20);
/// assert_eq!(config.forecast_window, 15);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NightConfig {
    /// Per-kind setup overheads.
    pub overheads: OverheadTable,
    /// Forecast horizon (minutes ahead of the decision time).
    pub max_lookahead: u32,
    /// Trailing slice of the horizon that is sampled (minutes).
    pub forecast_window: u32,
    /// Forecast standard deviation at the horizon.
    pub max_uncertainty: f64,
    /// Population percentiles separating the four seeing bins.
    pub percentile_cuts: [f64; 3],
    /// Consecutive no-match minutes tolerated before the night stalls.
    pub max_retries: u32,
    /// Lower bound of physically valid seeing.
    pub min_seeing: f64,
    /// Upper bound of physically valid seeing.
    pub max_seeing: f64,
    /// Site seeing distribution.
    pub seeing: SeeingModel,
}

impl Default for NightConfig {
    fn default() -> Self {
        Self {
            overheads: OverheadTable::default(),
            max_lookahead: 30,
            forecast_window: 10,
            max_uncertainty: 0.2,
            percentile_cuts: [20.0, 50.0, 70.0],
            max_retries: 50,
            min_seeing: 0.3,
            max_seeing: 2.0,
            seeing: SeeingModel::default(),
        }
    }
}

impl NightConfig {
    /// Sets the observation overheads.
    pub fn with_overheads(mut self, overheads: OverheadTable) -> Self {
        self.overheads = overheads;
        self
    }

    /// Sets the forecast horizon and its sampled trailing window.
    pub fn with_lookahead(mut self, max_lookahead: u32, forecast_window: u32) -> Self {
        self.max_lookahead = max_lookahead;
        self.forecast_window = forecast_window;
        self
    }

    /// Sets the forecast uncertainty at the horizon.
    pub fn with_max_uncertainty(mut self, sigma: f64) -> Self {
        self.max_uncertainty = sigma;
        self
    }

    /// Sets the bin percentile cut points.
    pub fn with_percentile_cuts(mut self, cuts: [f64; 3]) -> Self {
        self.percentile_cuts = cuts;
        self
    }

    /// Sets the consecutive retry budget.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the physical seeing range used for clipping.
    pub fn with_seeing_range(mut self, min_seeing: f64, max_seeing: f64) -> Self {
        self.min_seeing = min_seeing;
        self.max_seeing = max_seeing;
        self
    }

    /// Sets the site seeing distribution.
    pub fn with_seeing_model(mut self, seeing: SeeingModel) -> Self {
        self.seeing = seeing;
        self
    }

    /// Clips a seeing value into the physical range.
    #[inline]
    pub fn clip_seeing(&self, value: f64) -> f64 {
        value.clamp(self.min_seeing, self.max_seeing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NightConfig::default();
        assert_eq!(config.overheads.overhead(ObservationKind::Imaging), 10);
        assert_eq!(config.overheads.overhead(ObservationKind::Spectroscopy), 20);
        assert_eq!(config.max_lookahead, 30);
        assert_eq!(config.forecast_window, 10);
        assert_eq!(config.max_retries, 50);
        assert_eq!(config.percentile_cuts, [20.0, 50.0, 70.0]);
    }

    #[test]
    fn test_builder() {
        let config = NightConfig::default()
            .with_overheads(OverheadTable::new(5, 15))
            .with_max_uncertainty(0.0)
            .with_seeing_range(0.2, 3.0);
        assert_eq!(config.overheads.imaging, 5);
        assert!((config.max_uncertainty - 0.0).abs() < 1e-12);
        assert!((config.clip_seeing(5.0) - 3.0).abs() < 1e-12);
        assert!((config.clip_seeing(0.1) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "max_retries": 7, "overheads": { "imaging": 3, "spectroscopy": 4 } }"#;
        let config: NightConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.max_retries, 7);
        assert_eq!(config.overheads, OverheadTable::new(3, 4));
        assert_eq!(config.max_lookahead, 30);
        assert!((config.seeing.mean - 0.7).abs() < 1e-12);
    }
}
