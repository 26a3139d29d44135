//! Overnight observation scheduling under variable atmospheric seeing.
//!
//! Simulates a night of observation programs against a minute-by-minute
//! seeing series and compares a reactive scheduler with one that acts on
//! noisy short-horizon forecasts.
//!
//! # Modules
//!
//! - **`config`**: `NightConfig` with overheads, forecast horizon, bin cuts, retry budget
//! - **`models`**: Domain types: `SeeingBin`, `Program`, `ProgramRegistry`, `NightEvent`
//! - **`seeing`**: `SeeingSeries`, `SeriesGenerator`, `SeeingClassifier`, `UncertaintyModel`
//! - **`dispatching`**: `SelectionPolicy` with `Reactive` and `ForecastAware` rules
//! - **`scheduler`**: `Night` run loop, `NightSummary` KPIs, `NightReport`, policy comparison
//! - **`validation`**: Input integrity checks run before a night is built
//!
//! # Architecture
//!
//! Seeing generation and reporting are collaborators around the engine:
//! the engine reads a series, consumes a registry and emits structured
//! events and a per-minute forecast trace. All randomness is injected
//! through `rand::Rng` values so every run is reproducible from a seed.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Roddier (1981), "The effects of atmospheric turbulence in optical astronomy"

pub mod config;
pub mod dispatching;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod seeing;
pub mod validation;

pub use error::{SetupError, SetupResult};
