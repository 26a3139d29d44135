//! Night execution engine, KPIs and reports.
//!
//! # Algorithm
//!
//! `Night` is a time-stepped greedy scheduler: at every decision point a
//! [`SelectionPolicy`](crate::dispatching::SelectionPolicy) proposes a
//! program; if it fits it runs to completion, otherwise one minute is
//! consumed as a retry. The night ends when time runs out or the
//! consecutive retry budget is exhausted.
//!
//! # KPI
//!
//! `NightSummary` reports passed/failed executions, retries, utilization and
//! the unused tail of the night.
//!
//! # Example
//!
//! ```
//! use seeing_schedule::config::NightConfig;
//! use seeing_schedule::dispatching::Reactive;
//! use seeing_schedule::models::{Program, ProgramRegistry, SeeingBin};
//! use seeing_schedule::scheduler::Night;
//! use seeing_schedule::seeing::{SeeingClassifier, SeeingSeries};
//!
//! let classifier = SeeingClassifier::new([0.55, 0.7, 0.8]).unwrap();
//! let registry = ProgramRegistry::new(vec![Program::imaging("P01", SeeingBin::Good, 60)]);
//! let series = SeeingSeries::constant(0.6, 600);
//!
//! let mut night = Night::new(NightConfig::default(), classifier, series, registry).unwrap();
//! let summary = night.run(&mut Reactive);
//! assert_eq!(summary.passed, 1);
//! assert_eq!(night.forecast_trace().len() as u32, night.current_minute());
//! ```

mod compare;
mod engine;
mod kpi;
mod report;

pub use compare::{compare_policies, compare_with, Comparison};
pub use engine::{EngineState, Night};
pub use kpi::NightSummary;
pub use report::NightReport;
