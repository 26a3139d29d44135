//! Observation program model.
//!
//! A program is a single observation request: a required seeing bin, a base
//! exposure duration and an observation kind. The kind determines a fixed
//! setup overhead, so the time a program occupies the telescope is
//! `obs_minutes + overhead_minutes`.
//!
//! # Lifecycle
//! Identity fields are fixed at construction. The execution outcome is
//! recorded exactly once, by the scheduling engine.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::SeeingBin;
use crate::config::OverheadTable;

/// Kind of observation, which determines setup overhead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationKind {
    /// Direct imaging.
    Imaging,
    /// Spectroscopy (longer acquisition and calibration setup).
    Spectroscopy,
}

impl ObservationKind {
    /// Short label used in night tables.
    pub fn short_label(self) -> &'static str {
        match self {
            ObservationKind::Imaging => "Img",
            ObservationKind::Spectroscopy => "Spect",
        }
    }
}

impl fmt::Display for ObservationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObservationKind::Imaging => f.write_str("Imaging"),
            ObservationKind::Spectroscopy => f.write_str("Spectroscopy"),
        }
    }
}

/// Result of executing a program.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgramOutcome {
    /// Minute at which execution started.
    pub start_minute: u32,
    /// Mean true seeing over the base observation window.
    pub delivered_seeing: f64,
    /// Whether delivered seeing stayed within the required bin's upper bound.
    pub met_requirement: bool,
}

/// An observation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    id: String,
    required_bin: SeeingBin,
    obs_minutes: u32,
    kind: ObservationKind,
    overhead_minutes: u32,
    outcome: Option<ProgramOutcome>,
}

impl Program {
    /// Creates a program, deriving its overhead from `overheads`.
    pub fn new(
        id: impl Into<String>,
        required_bin: SeeingBin,
        obs_minutes: u32,
        kind: ObservationKind,
        overheads: &OverheadTable,
    ) -> Self {
        Self {
            id: id.into(),
            required_bin,
            obs_minutes,
            kind,
            overhead_minutes: overheads.overhead(kind),
            outcome: None,
        }
    }

    /// Creates an imaging program with default overheads.
    pub fn imaging(id: impl Into<String>, required_bin: SeeingBin, obs_minutes: u32) -> Self {
        Self::new(
            id,
            required_bin,
            obs_minutes,
            ObservationKind::Imaging,
            &OverheadTable::default(),
        )
    }

    /// Creates a spectroscopy program with default overheads.
    pub fn spectroscopy(id: impl Into<String>, required_bin: SeeingBin, obs_minutes: u32) -> Self {
        Self::new(
            id,
            required_bin,
            obs_minutes,
            ObservationKind::Spectroscopy,
            &OverheadTable::default(),
        )
    }

    /// Unique program identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Seeing bin the observation was requested in.
    pub fn required_bin(&self) -> SeeingBin {
        self.required_bin
    }

    /// Base exposure duration (minutes).
    pub fn obs_minutes(&self) -> u32 {
        self.obs_minutes
    }

    /// Observation kind.
    pub fn kind(&self) -> ObservationKind {
        self.kind
    }

    /// Setup overhead (minutes).
    pub fn overhead_minutes(&self) -> u32 {
        self.overhead_minutes
    }

    /// Telescope time occupied: base duration plus overhead (minutes).
    #[inline]
    pub fn total_minutes(&self) -> u32 {
        self.obs_minutes + self.overhead_minutes
    }

    /// Execution outcome, `None` until executed.
    pub fn outcome(&self) -> Option<&ProgramOutcome> {
        self.outcome.as_ref()
    }

    /// Whether the program has been executed.
    #[inline]
    pub fn is_completed(&self) -> bool {
        self.outcome.is_some()
    }

    /// Mean seeing delivered during execution.
    pub fn delivered_seeing(&self) -> Option<f64> {
        self.outcome.map(|o| o.delivered_seeing)
    }

    /// Whether the requirement was met. `None` until executed.
    pub fn met_requirement(&self) -> Option<bool> {
        self.outcome.map(|o| o.met_requirement)
    }

    /// Whether the program is still pending and fits in `remaining` minutes.
    #[inline]
    pub fn is_eligible(&self, remaining: u32) -> bool {
        !self.is_completed() && self.total_minutes() <= remaining
    }

    /// Records the execution outcome.
    ///
    /// Returns `false` and leaves the program untouched if it already ran.
    pub(crate) fn record_outcome(&mut self, outcome: ProgramOutcome) -> bool {
        if self.outcome.is_some() {
            return false;
        }
        self.outcome = Some(outcome);
        true
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {} min (Obs: {} min, Overhead: {} min), Bin: {}",
            self.kind,
            self.total_minutes(),
            self.obs_minutes,
            self.overhead_minutes,
            self.required_bin
        )
    }
}
