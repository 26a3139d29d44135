//! Selection context passed to policies.

use crate::models::{ForecastSample, ProgramRegistry, SeeingBin};
use crate::seeing::{SeeingClassifier, SeeingSeries};

/// Read-only night state at a decision point.
///
/// All times are whole minutes from the start of the night.
#[derive(Debug, Clone, Copy)]
pub struct SelectionContext<'a> {
    /// Decision time.
    pub current_minute: u32,
    /// Minutes left in the night.
    pub remaining_minutes: u32,
    /// Length of the night.
    pub total_minutes: u32,
    /// True seeing for the whole night.
    pub series: &'a SeeingSeries,
    /// Candidate programs.
    pub registry: &'a ProgramRegistry,
    /// Bin definitions for the run.
    pub classifier: &'a SeeingClassifier,
}

impl<'a> SelectionContext<'a> {
    /// True seeing at the decision time.
    #[inline]
    pub fn current_seeing(&self) -> f64 {
        self.series.at(self.current_minute)
    }

    /// Bin of the true seeing at the decision time.
    #[inline]
    pub fn current_bin(&self) -> SeeingBin {
        self.classifier.classify(self.current_seeing())
    }
}

/// Outcome of one policy decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    /// Registry index of the chosen program, if any.
    pub program: Option<usize>,
    /// Forecast the decision was based on.
    pub forecast: ForecastSample,
}

impl Selection {
    /// Selection without a forecast.
    pub fn reactive(program: Option<usize>) -> Self {
        Self {
            program,
            forecast: ForecastSample::NONE,
        }
    }
}
