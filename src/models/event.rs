//! Night execution records.
//!
//! The engine appends one [`NightEvent`] per execution or retry, plus the
//! closing summary, and one [`ForecastSample`] per simulated minute. Both are
//! explicit records so reporting never has to parse formatted text.

use serde::{Deserialize, Serialize};

use super::{ObservationKind, Program, SeeingBin};

/// Identity snapshot of an executed program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramSummary {
    /// Program identifier.
    pub id: String,
    /// Observation kind.
    pub kind: ObservationKind,
    /// Required seeing bin.
    pub required_bin: SeeingBin,
    /// Base observation time (minutes).
    pub obs_minutes: u32,
    /// Setup overhead (minutes).
    pub overhead_minutes: u32,
}

impl ProgramSummary {
    /// Total occupied time (minutes).
    #[inline]
    pub fn total_minutes(&self) -> u32 {
        self.obs_minutes + self.overhead_minutes
    }
}

impl From<&Program> for ProgramSummary {
    fn from(p: &Program) -> Self {
        Self {
            id: p.id().to_string(),
            kind: p.kind(),
            required_bin: p.required_bin(),
            obs_minutes: p.obs_minutes(),
            overhead_minutes: p.overhead_minutes(),
        }
    }
}

/// Why the run loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// Simulated time reached the end of the night.
    NightExhausted,
    /// The consecutive retry budget ran out.
    RetriesExhausted,
}

/// One entry of the execution log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NightEvent {
    /// A program ran from `start_minute` for its total duration.
    Executed {
        start_minute: u32,
        program: ProgramSummary,
        delivered_seeing: f64,
        met_requirement: bool,
    },
    /// No eligible program at `minute`; one minute was consumed.
    ///
    /// `minute` is the decision minute, before the clock advances, so the
    /// first retry of a night is stamped `0` and a night table lists each
    /// retry at the minute it was attempted rather than the minute after.
    Retry {
        minute: u32,
        current_bin: SeeingBin,
    },
    /// Closing tally.
    NightEnd {
        remaining_minutes: u32,
        passed: usize,
        failed: usize,
        termination: Termination,
    },
    /// Minutes between the end of the last execution and the end of the night.
    Unused { minutes: u32 },
}

impl NightEvent {
    /// Simulated minute the event refers to, if any.
    pub fn minute(&self) -> Option<u32> {
        match self {
            NightEvent::Executed { start_minute, .. } => Some(*start_minute),
            NightEvent::Retry { minute, .. } => Some(*minute),
            NightEvent::NightEnd { .. } | NightEvent::Unused { .. } => None,
        }
    }

    /// Whether this is an execution record.
    pub fn is_execution(&self) -> bool {
        matches!(self, NightEvent::Executed { .. })
    }

    /// Whether this is a retry record.
    pub fn is_retry(&self) -> bool {
        matches!(self, NightEvent::Retry { .. })
    }
}

/// Forecast used for one simulated minute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    /// Forecast mean seeing. `None` for policies that do not forecast.
    pub mean: Option<f64>,
    /// Mean forecast standard deviation over the sampled window.
    pub uncertainty: f64,
}

impl ForecastSample {
    /// Sample for a policy that uses no forecast.
    pub const NONE: ForecastSample = ForecastSample {
        mean: None,
        uncertainty: 0.0,
    };

    /// Creates a forecast sample.
    pub fn new(mean: f64, uncertainty: f64) -> Self {
        Self {
            mean: Some(mean),
            uncertainty,
        }
    }
}
