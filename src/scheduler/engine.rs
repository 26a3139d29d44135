//! Time-stepped night execution.
//!
//! # Algorithm
//!
//! While time remains and the consecutive retry counter is below budget:
//! 1. Ask the policy for a program given the current night state.
//! 2. If one is returned and fits: record its delivered seeing over the
//!    base observation window `[t, t + obs)`, log one forecast sample per
//!    minute of its total duration, advance time by that duration and reset
//!    the retry counter.
//! 3. Otherwise: log one forecast sample, advance one minute and count a
//!    retry.
//!
//! On termination the pass/fail tally and the unused tail are appended to
//! the log.
//!
//! # Invariants
//! - `current_minute + remaining_minutes == total_minutes` after every step.
//! - The forecast trace has exactly `current_minute` entries.
//! - Each program is executed at most once.

use std::iter;
use std::sync::Arc;

use super::{NightReport, NightSummary};
use crate::config::NightConfig;
use crate::dispatching::{SelectionContext, SelectionPolicy};
use crate::error::SetupResult;
use crate::models::{
    ForecastSample, NightEvent, ProgramOutcome, ProgramRegistry, ProgramSummary, SeeingBin,
    Termination,
};
use crate::seeing::{SeeingClassifier, SeeingSeries};
use crate::validation::{validate_night, ValidationError, ValidationErrorKind};

/// Run-loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// The last step executed a program (or nothing has run yet).
    Running,
    /// One or more consecutive minutes passed without a match.
    Stalled { retries: u32 },
    /// The night is over.
    Ended(Termination),
}

/// One simulated observing night.
///
/// Owns its registry and a shared, read-only handle to the seeing series,
/// so independent nights over the same series can run concurrently.
#[derive(Debug, Clone)]
pub struct Night {
    config: NightConfig,
    classifier: SeeingClassifier,
    series: Arc<SeeingSeries>,
    registry: ProgramRegistry,
    total_minutes: u32,
    current_minute: u32,
    remaining_minutes: u32,
    last_exec_end: u32,
    retries: u32,
    state: EngineState,
    policy_name: Option<&'static str>,
    events: Vec<NightEvent>,
    forecast_trace: Vec<ForecastSample>,
}

impl Night {
    /// Creates a night spanning the whole series.
    pub fn new(
        config: NightConfig,
        classifier: SeeingClassifier,
        series: impl Into<Arc<SeeingSeries>>,
        registry: ProgramRegistry,
    ) -> SetupResult<Self> {
        let series = series.into();
        let total_minutes = u32::try_from(series.len()).map_err(|_| {
            vec![ValidationError {
                kind: ValidationErrorKind::InvalidNightLength,
                message: format!("Seeing series of {} minutes is too long", series.len()),
            }]
        })?;
        Self::with_length(config, classifier, series, registry, total_minutes)
    }

    /// Creates a night of `total_minutes`, which must not exceed the series.
    pub fn with_length(
        config: NightConfig,
        classifier: SeeingClassifier,
        series: impl Into<Arc<SeeingSeries>>,
        registry: ProgramRegistry,
        total_minutes: u32,
    ) -> SetupResult<Self> {
        let series = series.into();
        validate_night(&config, &registry, series.len(), total_minutes)?;

        let capacity = total_minutes as usize;
        Ok(Self {
            config,
            classifier,
            series,
            registry,
            total_minutes,
            current_minute: 0,
            remaining_minutes: total_minutes,
            last_exec_end: 0,
            retries: 0,
            state: EngineState::Running,
            policy_name: None,
            events: Vec::new(),
            forecast_trace: Vec::with_capacity(capacity),
        })
    }

    /// Runs the night to termination with `policy`.
    ///
    /// Calling this on an ended night returns the existing summary.
    pub fn run(&mut self, policy: &mut dyn SelectionPolicy) -> NightSummary {
        log::debug!(
            "night of {} min with {} programs, policy {}",
            self.total_minutes,
            self.registry.len(),
            policy.name()
        );
        while !matches!(self.step(policy), EngineState::Ended(_)) {}
        self.summary()
    }

    /// Advances the night by one decision.
    pub fn step(&mut self, policy: &mut dyn SelectionPolicy) -> EngineState {
        if matches!(self.state, EngineState::Ended(_)) {
            return self.state;
        }
        self.policy_name.get_or_insert(policy.name());

        if let Some(termination) = self.termination_due() {
            self.finish(termination);
            return self.state;
        }

        let current_bin = self.classifier.classify(self.series.at(self.current_minute));
        let selection = {
            let ctx = SelectionContext {
                current_minute: self.current_minute,
                remaining_minutes: self.remaining_minutes,
                total_minutes: self.total_minutes,
                series: &self.series,
                registry: &self.registry,
                classifier: &self.classifier,
            };
            policy.select(&ctx)
        };

        let chosen = selection.program.filter(|&i| {
            self.registry
                .get(i)
                .is_some_and(|p| p.is_eligible(self.remaining_minutes))
        });
        match chosen {
            Some(index) => self.execute(index, selection.forecast),
            None => self.retry(current_bin, selection.forecast),
        }

        self.state = match self.termination_due() {
            Some(termination) => {
                self.finish(termination);
                self.state
            }
            None if self.retries > 0 => EngineState::Stalled {
                retries: self.retries,
            },
            None => EngineState::Running,
        };
        self.state
    }

    fn termination_due(&self) -> Option<Termination> {
        if self.current_minute >= self.total_minutes {
            Some(Termination::NightExhausted)
        } else if self.retries >= self.config.max_retries {
            Some(Termination::RetriesExhausted)
        } else {
            None
        }
    }

    fn execute(&mut self, index: usize, forecast: ForecastSample) {
        let start = self.current_minute;
        let Some(program) = self.registry.get_mut(index) else {
            return;
        };

        let obs_end = start + program.obs_minutes();
        let delivered_seeing = self.series.mean_over(start, obs_end).unwrap_or(f64::NAN);
        let met_requirement =
            delivered_seeing <= self.classifier.upper_bound(program.required_bin());
        program.record_outcome(ProgramOutcome {
            start_minute: start,
            delivered_seeing,
            met_requirement,
        });

        let summary = ProgramSummary::from(&*program);
        let duration = program.total_minutes();
        log::debug!(
            "{start:03}: executing {} ({program}), delivered {delivered_seeing:.3}, {}",
            program.id(),
            if met_requirement { "pass" } else { "fail" }
        );

        self.events.push(NightEvent::Executed {
            start_minute: start,
            program: summary,
            delivered_seeing,
            met_requirement,
        });
        self.forecast_trace
            .extend(iter::repeat(forecast).take(duration as usize));
        self.current_minute += duration;
        self.remaining_minutes -= duration;
        self.last_exec_end = self.current_minute;
        self.retries = 0;
    }

    fn retry(&mut self, current_bin: SeeingBin, forecast: ForecastSample) {
        let minute = self.current_minute;
        self.forecast_trace.push(forecast);
        self.retries += 1;
        self.current_minute += 1;
        self.remaining_minutes -= 1;
        self.events.push(NightEvent::Retry {
            minute,
            current_bin,
        });
        log::debug!("{minute:03}: retry, no program for {current_bin}");
    }

    fn finish(&mut self, termination: Termination) {
        let passed = self.registry.passed_count();
        let failed = self.registry.failed_count();
        let unused = self.total_minutes - self.last_exec_end;

        self.events.push(NightEvent::NightEnd {
            remaining_minutes: self.remaining_minutes,
            passed,
            failed,
            termination,
        });
        self.events.push(NightEvent::Unused { minutes: unused });

        if termination == Termination::RetriesExhausted {
            log::warn!(
                "night stalled at minute {} after {} consecutive retries",
                self.current_minute,
                self.retries
            );
        }
        log::info!(
            "night end ({:?}): rem {} | passed {} failed {} | unused {}",
            termination,
            self.remaining_minutes,
            passed,
            failed,
            unused
        );
        self.state = EngineState::Ended(termination);
    }

    /// KPIs derived from the log so far.
    pub fn summary(&self) -> NightSummary {
        NightSummary::calculate(&self.events, &self.registry, self.total_minutes)
    }

    /// Read-only report of the night.
    pub fn report(&self) -> NightReport {
        NightReport {
            policy: self.policy_name.unwrap_or("none").to_string(),
            total_minutes: self.total_minutes,
            events: self.events.clone(),
            forecast_trace: self.forecast_trace.clone(),
            summary: self.summary(),
        }
    }

    /// Current run-loop state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Termination cause, once ended.
    pub fn termination(&self) -> Option<Termination> {
        match self.state {
            EngineState::Ended(t) => Some(t),
            _ => None,
        }
    }

    /// Current simulated minute.
    pub fn current_minute(&self) -> u32 {
        self.current_minute
    }

    /// Minutes left in the night.
    pub fn remaining_minutes(&self) -> u32 {
        self.remaining_minutes
    }

    /// Night length (minutes).
    pub fn total_minutes(&self) -> u32 {
        self.total_minutes
    }

    /// Consecutive retries so far.
    pub fn consecutive_retries(&self) -> u32 {
        self.retries
    }

    /// Execution and retry log.
    pub fn events(&self) -> &[NightEvent] {
        &self.events
    }

    /// Per-minute forecast trace.
    pub fn forecast_trace(&self) -> &[ForecastSample] {
        &self.forecast_trace
    }

    /// Program registry with execution outcomes.
    pub fn registry(&self) -> &ProgramRegistry {
        &self.registry
    }

    /// Bin definitions in use.
    pub fn classifier(&self) -> &SeeingClassifier {
        &self.classifier
    }

    /// The seeing series.
    pub fn series(&self) -> &SeeingSeries {
        &self.series
    }
}
