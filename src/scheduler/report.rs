//! Night report.
//!
//! A read-only snapshot of a finished night for reporting and plotting
//! collaborators. The `Display` impl renders the operator table.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::NightSummary;
use crate::models::{ForecastSample, NightEvent};

/// Everything a night produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NightReport {
    /// Name of the policy that drove the night.
    pub policy: String,
    /// Night length (minutes).
    pub total_minutes: u32,
    /// Execution/retry log, closed by the summary events.
    pub events: Vec<NightEvent>,
    /// One forecast sample per simulated minute.
    pub forecast_trace: Vec<ForecastSample>,
    /// Derived KPIs.
    pub summary: NightSummary,
}

impl NightReport {
    /// Executions only, in time order.
    pub fn executions(&self) -> impl Iterator<Item = &NightEvent> {
        self.events.iter().filter(|e| e.is_execution())
    }

    /// Forecast means per minute (`None` for minutes without a forecast).
    pub fn forecast_means(&self) -> Vec<Option<f64>> {
        self.forecast_trace.iter().map(|s| s.mean).collect()
    }
}

impl fmt::Display for NightReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<6} {:<10} {:<12} {:<4} {:<6} {:<4}",
            "Time", "Act", "Type", "Dur", "Bin", "Met"
        )?;
        writeln!(f, "{}", "-".repeat(50))?;

        for event in &self.events {
            match event {
                NightEvent::Executed {
                    start_minute,
                    program,
                    met_requirement,
                    ..
                } => {
                    let met = if *met_requirement { "Pass" } else { "Fail" };
                    writeln!(
                        f,
                        "{:<6} Exec {:<12} {:<4} {:<6} {:<4}",
                        format!("{start_minute:03}"),
                        program.kind.short_label(),
                        program.total_minutes(),
                        program.required_bin.label(),
                        met
                    )?;
                }
                NightEvent::Retry { minute, .. } => {
                    writeln!(f, "{:<6} Retry      -    -    -    -", format!("{minute:03}"))?;
                }
                NightEvent::NightEnd {
                    remaining_minutes,
                    passed,
                    failed,
                    ..
                } => {
                    writeln!(
                        f,
                        "Night end Rem:{remaining_minutes} | Passed:{passed} Failed:{failed}"
                    )?;
                }
                NightEvent::Unused { minutes } => {
                    writeln!(f, "Unused since last obs:{minutes} min")?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Program, ProgramSummary, SeeingBin, Termination};

    fn report() -> NightReport {
        let p = Program::spectroscopy("P1", SeeingBin::Good, 60);
        let events = vec![
            NightEvent::Retry {
                minute: 0,
                current_bin: SeeingBin::Poor,
            },
            NightEvent::Executed {
                start_minute: 1,
                program: ProgramSummary::from(&p),
                delivered_seeing: 0.6,
                met_requirement: true,
            },
            NightEvent::NightEnd {
                remaining_minutes: 19,
                passed: 1,
                failed: 0,
                termination: Termination::RetriesExhausted,
            },
            NightEvent::Unused { minutes: 19 },
        ];
        let registry = crate::models::ProgramRegistry::new(vec![p]);
        NightReport {
            policy: "reactive".into(),
            total_minutes: 100,
            summary: NightSummary::calculate(&events, &registry, 100),
            events,
            forecast_trace: vec![ForecastSample::NONE; 81],
        }
    }

    #[test]
    fn test_table_rendering() {
        let text = report().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("Time   Act"));
        assert!(lines[2].starts_with("000    Retry"));
        assert!(lines[3].starts_with("001    Exec Spect"));
        assert!(lines[3].contains("80"));
        assert!(lines[3].contains("20-50%"));
        assert!(lines[3].ends_with("Pass"));
        assert_eq!(lines[4], "Night end Rem:19 | Passed:1 Failed:0");
        assert_eq!(lines[5], "Unused since last obs:19 min");
    }

    #[test]
    fn test_executions_filter() {
        assert_eq!(report().executions().count(), 1);
        assert!(report().forecast_means().iter().all(Option::is_none));
    }

    #[test]
    fn test_json_roundtrip() {
        let r = report();
        let json = serde_json::to_string(&r).unwrap();
        let back: NightReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
