//! Types for use as [crate::Read::Cfg].

use core::ops::{Bound, RangeBounds};

/// Configuration for limiting the length of a string or collection.
///
/// Every length in the format is attacker-controlled, so decoders check it against a
/// [RangeCfg] before allocating anything.
///
/// # Examples
///
/// ```
/// use hxs_codec::RangeCfg;
///
/// // Limit lengths to 0..=1024
/// let cfg = RangeCfg::new(0..=1024);
/// assert!(cfg.contains(500));
/// assert!(!cfg.contains(2000));
///
/// // Allow anything
/// let cfg: RangeCfg = (..).into();
/// assert!(cfg.contains(usize::MAX));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct RangeCfg {
    start: Bound<usize>,
    end: Bound<usize>,
}

impl RangeCfg {
    /// Creates a new `RangeCfg` from any type implementing `RangeBounds<usize>`.
    pub fn new(r: impl RangeBounds<usize>) -> Self {
        Self {
            start: r.start_bound().cloned(),
            end: r.end_bound().cloned(),
        }
    }

    /// Creates a `RangeCfg` that accepts any length up to and including `max`.
    pub const fn max(max: usize) -> Self {
        Self {
            start: Bound::Unbounded,
            end: Bound::Included(max),
        }
    }

    /// Returns true if the length is within this range.
    pub fn contains(&self, len: usize) -> bool {
        let above_start = match self.start {
            Bound::Included(s) => len >= s,
            Bound::Excluded(s) => len > s,
            Bound::Unbounded => true,
        };
        let below_end = match self.end {
            Bound::Included(e) => len <= e,
            Bound::Excluded(e) => len < e,
            Bound::Unbounded => true,
        };
        above_start && below_end
    }
}

impl Default for RangeCfg {
    fn default() -> Self {
        Self::new(..)
    }
}

macro_rules! impl_from_range {
    ($($range:ty),*) => {
        $(
            impl From<$range> for RangeCfg {
                fn from(r: $range) -> Self {
                    Self::new(r)
                }
            }
        )*
    };
}

impl_from_range!(
    core::ops::Range<usize>,
    core::ops::RangeInclusive<usize>,
    core::ops::RangeFrom<usize>,
    core::ops::RangeTo<usize>,
    core::ops::RangeToInclusive<usize>,
    core::ops::RangeFull
);
