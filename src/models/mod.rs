//! Scheduling domain models.
//!
//! Provides the data types of an observing night: seeing bins, observation
//! programs, the program registry and the structured records the engine
//! emits.
//!
//! # Domain Mappings
//!
//! | seeing-schedule | Generic scheduling |
//! |-----------------|--------------------|
//! | Program | Task |
//! | SeeingBin | Resource capability class |
//! | Overhead | Setup time |
//! | NightEvent | Assignment / idle record |

mod bin;
mod event;
mod program;
mod registry;

pub use bin::SeeingBin;
pub use event::{ForecastSample, NightEvent, ProgramSummary, Termination};
pub use program::{ObservationKind, Program, ProgramOutcome};
pub use registry::{ProgramRegistry, RegistryPlan};
