//! Seeing classifier.
//!
//! Maps continuous seeing to a [`SeeingBin`] using three cut points derived
//! once from population percentiles of a reference sample. The reference
//! sample is drawn independently of any particular night so bin definitions
//! do not depend on the realised series.
//!
//! # Intervals
//!
//! | Bin | Interval |
//! |-----|----------|
//! | `0-20%` | `(-inf, c0)` |
//! | `20-50%` | `[c0, c1)` |
//! | `50-70%` | `[c1, c2)` |
//! | `>70%` | `[c2, +inf)` (also catches NaN) |

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::config::{NightConfig, SeeingModel};
use crate::error::{SetupError, SetupResult};
use crate::models::SeeingBin;

/// Fixed bin boundaries for one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeeingClassifier {
    cuts: [f64; 3],
}

impl SeeingClassifier {
    /// Creates a classifier from explicit cut points.
    ///
    /// Cuts must be finite and strictly increasing.
    pub fn new(cuts: [f64; 3]) -> SetupResult<Self> {
        let finite = cuts.iter().all(|c| c.is_finite());
        let increasing = cuts.windows(2).all(|w| w[0] < w[1]);
        if finite && increasing {
            Ok(Self { cuts })
        } else {
            Err(SetupError::DegenerateBoundaries { cuts })
        }
    }

    /// Derives cut points from percentiles of an existing sample.
    pub fn from_sample(sample: &[f64], percentiles: [f64; 3]) -> SetupResult<Self> {
        if sample.is_empty() {
            return Err(SetupError::EmptySample);
        }
        let mut sorted = sample.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        Self::new(percentiles.map(|p| percentile(&sorted, p)))
    }

    /// Draws a reference sample from `model` and derives the cut points.
    ///
    /// Draws are `N(mean, std_dev)` clipped to
    /// `[reference_floor, reference_ceiling]`, which must be a finite,
    /// non-empty interval.
    pub fn from_reference<R: Rng>(
        model: &SeeingModel,
        percentiles: [f64; 3],
        rng: &mut R,
    ) -> SetupResult<Self> {
        SetupError::check_range(model.reference_floor, model.reference_ceiling)?;
        let normal = Normal::new(model.mean, model.std_dev)?;
        let sample: Vec<f64> = (0..model.reference_sample_size)
            .map(|_| {
                normal
                    .sample(rng)
                    .clamp(model.reference_floor, model.reference_ceiling)
            })
            .collect();
        let classifier = Self::from_sample(&sample, percentiles)?;
        log::debug!(
            "seeing bin cuts from {} reference draws: {:?}",
            sample.len(),
            classifier.cuts
        );
        Ok(classifier)
    }

    /// Convenience: reference classifier for a whole [`NightConfig`].
    pub fn for_config<R: Rng>(config: &NightConfig, rng: &mut R) -> SetupResult<Self> {
        Self::from_reference(&config.seeing, config.percentile_cuts, rng)
    }

    /// Bin containing `value`. Total over all `f64`, including NaN.
    pub fn classify(&self, value: f64) -> SeeingBin {
        self.cuts
            .iter()
            .position(|&cut| value < cut)
            .map_or(SeeingBin::Poor, SeeingBin::from_rank)
    }

    /// Upper bound of `bin` (`+inf` for the worst bin).
    pub fn upper_bound(&self, bin: SeeingBin) -> f64 {
        self.cuts.get(bin.rank()).copied().unwrap_or(f64::INFINITY)
    }

    /// Nominal lower bound of `bin` (`0.0` for the best bin).
    pub fn lower_bound(&self, bin: SeeingBin) -> f64 {
        match bin.rank() {
            0 => 0.0,
            r => self.cuts[r - 1],
        }
    }

    /// Cut points in rank order.
    pub fn cuts(&self) -> [f64; 3] {
        self.cuts
    }
}

/// Percentile of a sorted sample with linear interpolation between ranks.
///
/// `p` is in percent and clamped to `[0, 100]`.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
