//! Seeing time series and its generator.
//!
//! A night's seeing is a read-only sequence of values, one per simulated
//! minute. [`SeriesGenerator`] produces realistic nights with a
//! mean-reverting random walk smoothed by a moving average.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::config::NightConfig;
use crate::error::{SetupError, SetupResult};

/// Minute-by-minute seeing values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeeingSeries {
    values: Vec<f64>,
}

impl SeeingSeries {
    /// Wraps a value sequence.
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Constant seeing for `minutes` minutes.
    pub fn constant(value: f64, minutes: usize) -> Self {
        Self::new(vec![value; minutes])
    }

    /// Seeing at `minute`.
    ///
    /// # Panics
    /// If `minute` is past the end of the series.
    #[inline]
    pub fn at(&self, minute: u32) -> f64 {
        self.values[minute as usize]
    }

    /// Seeing at `minute`, or `None` past the end.
    pub fn get(&self, minute: u32) -> Option<f64> {
        self.values.get(minute as usize).copied()
    }

    /// Mean over `[start, end)`, clamped to the series. `None` if empty.
    pub fn mean_over(&self, start: u32, end: u32) -> Option<f64> {
        let end = (end as usize).min(self.values.len());
        let start = (start as usize).min(end);
        let window = &self.values[start..end];
        if window.is_empty() {
            None
        } else {
            Some(window.iter().sum::<f64>() / window.len() as f64)
        }
    }

    /// Number of minutes covered.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl From<Vec<f64>> for SeeingSeries {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

/// Smoothed mean-reverting random walk generator.
///
/// # Algorithm
/// 1. `raw[0] = mean`; `raw[i] = raw[i-1] + δᵢ + reversion·(mean − raw[i-1])`
///    with `δᵢ ~ N(0, volatility/10)`.
/// 2. Edge-pad by `smoothing_window / 2` and apply a moving average of
///    `smoothing_window` samples.
/// 3. Clip to `[min_seeing, max_seeing]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesGenerator {
    /// Number of minutes to produce.
    pub minutes: usize,
    /// Level the walk reverts to.
    pub mean: f64,
    /// Seeing spread; per-minute step σ is a tenth of this.
    pub volatility: f64,
    /// Pull toward the mean per step (0..1).
    pub reversion: f64,
    /// Moving-average length (minutes).
    pub smoothing_window: usize,
    /// Lower clip.
    pub min_seeing: f64,
    /// Upper clip.
    pub max_seeing: f64,
}

impl SeriesGenerator {
    /// Creates a generator with default reversion, smoothing and range.
    pub fn new(minutes: usize, mean: f64, volatility: f64) -> Self {
        let config = NightConfig::default();
        Self {
            minutes,
            mean,
            volatility,
            reversion: 0.01,
            smoothing_window: 30,
            min_seeing: config.min_seeing,
            max_seeing: config.max_seeing,
        }
    }

    /// Creates a generator using the site model and range of `config`.
    pub fn from_config(minutes: usize, config: &NightConfig) -> Self {
        Self {
            min_seeing: config.min_seeing,
            max_seeing: config.max_seeing,
            ..Self::new(minutes, config.seeing.mean, config.seeing.std_dev)
        }
    }

    /// Sets the moving-average length.
    pub fn with_smoothing_window(mut self, window: usize) -> Self {
        self.smoothing_window = window;
        self
    }

    /// Draws one night.
    ///
    /// Fails if `[min_seeing, max_seeing]` is not a finite, non-empty range
    /// or if `volatility` does not give a valid normal distribution.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> SetupResult<SeeingSeries> {
        SetupError::check_range(self.min_seeing, self.max_seeing)?;
        if self.minutes == 0 {
            return Ok(SeeingSeries::new(Vec::new()));
        }

        let step = Normal::new(0.0, self.volatility / 10.0)?;
        let mut raw = Vec::with_capacity(self.minutes);
        raw.push(self.mean);
        for _ in 1..self.minutes {
            let prev = raw[raw.len() - 1];
            let drift = (self.mean - prev) * self.reversion;
            raw.push(prev + step.sample(rng) + drift);
        }

        let smoothed = moving_average(&raw, self.smoothing_window);
        let values = smoothed
            .into_iter()
            .map(|v| v.clamp(self.min_seeing, self.max_seeing))
            .collect();
        Ok(SeeingSeries::new(values))
    }
}

/// Edge-padded moving average returning exactly `raw.len()` values.
fn moving_average(raw: &[f64], window: usize) -> Vec<f64> {
    if window <= 1 || raw.is_empty() {
        return raw.to_vec();
    }

    let pad = window / 2;
    let first = raw[0];
    let last = raw[raw.len() - 1];
    let padded: Vec<f64> = std::iter::repeat(first)
        .take(pad)
        .chain(raw.iter().copied())
        .chain(std::iter::repeat(last).take(pad))
        .collect();

    padded
        .windows(window)
        .take(raw.len())
        .map(|w| w.iter().sum::<f64>() / window as f64)
        .collect()
}
