//! Program registry.
//!
//! The fixed multiset of programs available for one night. Iteration order
//! is the registry order and is what breaks ties between programs requesting
//! the same bin.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{ObservationKind, Program, SeeingBin};
use crate::config::OverheadTable;

/// Recipe for drawing a random registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryPlan {
    /// Nominal number of programs.
    pub count: usize,
    /// Fraction of `count` requested in each bin, in rank order.
    pub bin_fractions: [f64; SeeingBin::COUNT],
    /// Shortest base duration (minutes, inclusive).
    pub min_obs_minutes: u32,
    /// Longest base duration (minutes, inclusive).
    pub max_obs_minutes: u32,
}

impl Default for RegistryPlan {
    fn default() -> Self {
        Self {
            count: 20,
            bin_fractions: [0.2, 0.3, 0.2, 0.3],
            min_obs_minutes: 40,
            max_obs_minutes: 120,
        }
    }
}

impl RegistryPlan {
    /// Number of programs drawn for `bin`.
    pub fn count_for(&self, bin: SeeingBin) -> usize {
        (self.bin_fractions[bin.rank()] * self.count as f64).floor() as usize
    }
}

/// Ordered collection of the night's programs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgramRegistry {
    programs: Vec<Program>,
}

impl ProgramRegistry {
    /// Creates a registry preserving the given order.
    pub fn new(programs: Vec<Program>) -> Self {
        Self { programs }
    }

    /// Draws a shuffled registry following `plan`.
    ///
    /// Each program gets a uniform base duration in
    /// `[plan.min_obs_minutes, plan.max_obs_minutes]` and a uniformly chosen kind.
    pub fn generate<R: Rng>(plan: &RegistryPlan, overheads: &OverheadTable, rng: &mut R) -> Self {
        let lo = plan.min_obs_minutes.min(plan.max_obs_minutes);
        let hi = plan.min_obs_minutes.max(plan.max_obs_minutes);

        let mut programs = Vec::with_capacity(plan.count);
        for bin in SeeingBin::ALL {
            for _ in 0..plan.count_for(bin) {
                let obs = rng.random_range(lo..=hi);
                let kind = if rng.random_bool(0.5) {
                    ObservationKind::Spectroscopy
                } else {
                    ObservationKind::Imaging
                };
                programs.push((bin, obs, kind));
            }
        }
        programs.shuffle(rng);

        let programs = programs
            .into_iter()
            .enumerate()
            .map(|(i, (bin, obs, kind))| {
                Program::new(format!("P{:02}", i + 1), bin, obs, kind, overheads)
            })
            .collect();
        Self { programs }
    }

    /// Index of the first eligible program, scanning `from` and every worse
    /// bin in rank order, and programs in registry order within a bin.
    ///
    /// # Complexity
    /// O(bins × programs).
    pub fn first_eligible(&self, from: SeeingBin, remaining_minutes: u32) -> Option<usize> {
        from.and_worse().iter().find_map(|&bin| {
            self.programs
                .iter()
                .position(|p| p.required_bin() == bin && p.is_eligible(remaining_minutes))
        })
    }

    /// Program at `index`.
    pub fn get(&self, index: usize) -> Option<&Program> {
        self.programs.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Program> {
        self.programs.get_mut(index)
    }

    /// Iterates programs in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &Program> {
        self.programs.iter()
    }

    /// All programs as a slice.
    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    /// Number of programs.
    pub fn len(&self) -> usize {
        self.programs.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    /// Number of executed programs.
    pub fn completed_count(&self) -> usize {
        self.programs.iter().filter(|p| p.is_completed()).count()
    }

    /// Executed programs that met their seeing requirement.
    pub fn passed_count(&self) -> usize {
        self.programs
            .iter()
            .filter(|p| p.met_requirement() == Some(true))
            .count()
    }

    /// Executed programs that missed their seeing requirement.
    pub fn failed_count(&self) -> usize {
        self.programs
            .iter()
            .filter(|p| p.met_requirement() == Some(false))
            .count()
    }
}

impl FromIterator<Program> for ProgramRegistry {
    fn from_iter<I: IntoIterator<Item = Program>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
