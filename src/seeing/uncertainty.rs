//! Forecast uncertainty model.
//!
//! Forecast error grows with horizon. The standard deviation follows a
//! normalised exponential curve:
//!
//! ```text
//! σ(m) = σ_max · (e^(m/H) − 1) / (e − 1)
//! ```
//!
//! so `σ(0) = 0` and `σ(H) = σ_max`, with the steepest growth near the horizon.

use serde::{Deserialize, Serialize};
use std::f64::consts::E;

use crate::config::NightConfig;

/// Maps minutes ahead to forecast standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyModel {
    horizon_minutes: u32,
    max_sigma: f64,
}

impl UncertaintyModel {
    /// Creates a model reaching `max_sigma` at `horizon_minutes`.
    ///
    /// A zero horizon is treated as one minute.
    pub fn new(horizon_minutes: u32, max_sigma: f64) -> Self {
        Self {
            horizon_minutes: horizon_minutes.max(1),
            max_sigma,
        }
    }

    /// Model for the lookahead and uncertainty settings of `config`.
    pub fn from_config(config: &NightConfig) -> Self {
        Self::new(config.max_lookahead, config.max_uncertainty)
    }

    /// Forecast σ for a prediction `minutes_ahead` into the future.
    pub fn sigma(&self, minutes_ahead: u32) -> f64 {
        let x = minutes_ahead as f64 / self.horizon_minutes as f64;
        self.max_sigma * x.exp_m1() / (E - 1.0)
    }

    /// Horizon at which σ reaches its configured maximum.
    pub fn horizon_minutes(&self) -> u32 {
        self.horizon_minutes
    }

    /// σ at the horizon.
    pub fn max_sigma(&self) -> f64 {
        self.max_sigma
    }
}

impl Default for UncertaintyModel {
    fn default() -> Self {
        Self::from_config(&NightConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_endpoints() {
        let m = UncertaintyModel::new(30, 0.2);
        assert!(m.sigma(0).abs() < 1e-12);
        assert!((m.sigma(30) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_convex_growth() {
        let m = UncertaintyModel::new(30, 0.2);
        // Exponential curve lies below the straight line between endpoints.
        assert!(m.sigma(15) < 0.1);
        assert!(m.sigma(15) > 0.0);
    }

    #[test]
    fn test_zero_max_is_flat() {
        let m = UncertaintyModel::new(30, 0.0);
        assert_eq!(m.sigma(0), 0.0);
        assert_eq!(m.sigma(30), 0.0);
    }

    #[test]
    fn test_zero_horizon_does_not_divide_by_zero() {
        let m = UncertaintyModel::new(0, 0.2);
        assert_eq!(m.horizon_minutes(), 1);
        assert!((m.sigma(1) - 0.2).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_strictly_increasing(a in 0u32..30, step in 1u32..30) {
            let m = UncertaintyModel::new(30, 0.2);
            let b = (a + step).min(30);
            prop_assume!(a < b);
            prop_assert!(m.sigma(a) < m.sigma(b));
        }
    }
}
