//! Night quality metrics (KPIs).
//!
//! Computes performance indicators of a night from its structured event
//! log. The registry only contributes the count of programs never run.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Passed | Executed programs whose delivered seeing met the requirement |
//! | Failed | Executed programs that missed the requirement |
//! | Pending | Programs never executed |
//! | Busy minutes | Sum of executed total durations (overhead included) |
//! | Unused minutes | Night length minus end of the last execution |
//! | Utilization | Busy minutes / night length |
//! | Pass rate | Passed / executed |

use serde::{Deserialize, Serialize};

use crate::models::{NightEvent, ProgramRegistry, Termination};

/// Night performance indicators.
///
/// All time values are in minutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NightSummary {
    /// Executed programs that met their requirement.
    pub passed: usize,
    /// Executed programs that missed their requirement.
    pub failed: usize,
    /// Executed programs.
    pub completed: usize,
    /// Programs left unexecuted.
    pub pending: usize,
    /// Retry minutes logged.
    pub retries: usize,
    /// Minutes spent executing programs.
    pub busy_minutes: u32,
    /// Minutes after the last execution ended.
    pub unused_minutes: u32,
    /// Fraction of the night spent executing (0.0..1.0).
    pub utilization: f64,
    /// Fraction of executions that passed (0.0..1.0).
    pub pass_rate: f64,
    /// Termination cause, if the night has ended.
    pub termination: Option<Termination>,
}

impl NightSummary {
    /// Computes KPIs from a night log.
    ///
    /// # Arguments
    /// * `events` - The night's execution/retry log.
    /// * `registry` - The night's programs (for the pending count).
    /// * `total_minutes` - Night length.
    pub fn calculate(
        events: &[NightEvent],
        registry: &ProgramRegistry,
        total_minutes: u32,
    ) -> Self {
        let mut busy_minutes: u32 = 0;
        let mut last_exec_end: u32 = 0;
        let mut retries: usize = 0;
        let mut passed: usize = 0;
        let mut failed: usize = 0;
        let mut termination = None;

        for event in events {
            match event {
                NightEvent::Executed {
                    start_minute,
                    program,
                    met_requirement,
                    ..
                } => {
                    busy_minutes += program.total_minutes();
                    last_exec_end = last_exec_end.max(start_minute + program.total_minutes());
                    if *met_requirement {
                        passed += 1;
                    } else {
                        failed += 1;
                    }
                }
                NightEvent::Retry { .. } => retries += 1,
                NightEvent::NightEnd {
                    termination: t, ..
                } => termination = Some(*t),
                NightEvent::Unused { .. } => {}
            }
        }

        let completed = passed + failed;

        let utilization = if total_minutes == 0 {
            0.0
        } else {
            busy_minutes as f64 / total_minutes as f64
        };

        let pass_rate = if completed == 0 {
            0.0
        } else {
            passed as f64 / completed as f64
        };

        Self {
            passed,
            failed,
            completed,
            pending: registry.len().saturating_sub(completed),
            retries,
            busy_minutes,
            unused_minutes: total_minutes.saturating_sub(last_exec_end),
            utilization,
            pass_rate,
            termination,
        }
    }

    /// Whether the night meets the given quality thresholds.
    pub fn meets_thresholds(&self, min_passed: usize, min_utilization: f64) -> bool {
        self.passed >= min_passed && self.utilization >= min_utilization
    }
}
