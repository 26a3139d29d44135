//! Seeing quality bins.
//!
//! Four ordered, non-overlapping categories spanning the whole seeing axis.
//! Rank 0 is the best (sharpest) bin; the last bin is unbounded above.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A discrete seeing quality category.
///
/// Variants are declared best-to-worst, so the derived `Ord` follows rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SeeingBin {
    /// Best 20% of the reference distribution.
    Excellent,
    /// 20th to 50th percentile.
    Good,
    /// 50th to 70th percentile.
    Fair,
    /// Worse than the 70th percentile.
    Poor,
}

impl SeeingBin {
    /// All bins in rank order (best first).
    pub const ALL: [SeeingBin; 4] = [
        SeeingBin::Excellent,
        SeeingBin::Good,
        SeeingBin::Fair,
        SeeingBin::Poor,
    ];

    /// Number of bins.
    pub const COUNT: usize = 4;

    /// Rank index (0 = best).
    #[inline]
    pub fn rank(self) -> usize {
        self as usize
    }

    /// Bin at the given rank. Ranks past the worst bin saturate to it.
    #[inline]
    pub fn from_rank(rank: usize) -> Self {
        Self::ALL[rank.min(Self::COUNT - 1)]
    }

    /// This bin followed by every worse bin, in rank order.
    #[inline]
    pub fn and_worse(self) -> &'static [SeeingBin] {
        &Self::ALL[self.rank()..]
    }

    /// Percentile label of the bin.
    pub fn label(self) -> &'static str {
        match self {
            SeeingBin::Excellent => "0-20%",
            SeeingBin::Good => "20-50%",
            SeeingBin::Fair => "50-70%",
            SeeingBin::Poor => ">70%",
        }
    }
}

impl fmt::Display for SeeingBin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
