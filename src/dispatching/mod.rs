//! Selection policies for the night scheduler.
//!
//! A policy inspects the night at a decision point and returns the next
//! program to run (if any) together with the forecast it relied on.
//!
//! # Usage
//!
//! ```
//! use seeing_schedule::config::NightConfig;
//! use seeing_schedule::dispatching::{ForecastAware, SelectionPolicy};
//! use seeing_schedule::dispatching::rules::Reactive;
//!
//! let config = NightConfig::default();
//! let baseline = Reactive;
//! let forecast = ForecastAware::seeded(&config, 7).unwrap();
//! assert_eq!(baseline.name(), "reactive");
//! assert_eq!(forecast.name(), "forecast-aware");
//! ```

mod context;
mod forecast;
pub mod rules;

pub use context::{Selection, SelectionContext};
pub use forecast::Forecaster;
pub use rules::{search_start, ForecastAware, Reactive};

use std::fmt::Debug;

/// A rule deciding which program to run next.
///
/// Policies may carry state (e.g. a random source), hence `&mut self`.
pub trait SelectionPolicy: Send + Debug {
    /// Policy name (e.g., "reactive").
    fn name(&self) -> &'static str;

    /// Chooses the next program for the given night state.
    ///
    /// Must only return indices of pending programs whose total duration
    /// fits in `ctx.remaining_minutes`.
    fn select(&mut self, ctx: &SelectionContext<'_>) -> Selection;

    /// Policy description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
