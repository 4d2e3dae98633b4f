//! Procedural label volume
//!
//! Computes labels on demand from a closure. Useful for extents far too large
//! to store densely, where a provider would load blocks lazily.

use std::fmt;

use super::interval::Interval;
use super::label_volume::LabelVolume;

/// Label volume whose labels come from a function of the coordinate
pub struct FunctionVolume<F>
where
    F: Fn(&[i64]) -> u64,
{
    interval: Interval,
    label_fn: F,
}

impl<F> FunctionVolume<F>
where
    F: Fn(&[i64]) -> u64,
{
    pub fn new(interval: Interval, label_fn: F) -> Self {
        FunctionVolume { interval, label_fn }
    }
}

impl<F> LabelVolume for FunctionVolume<F>
where
    F: Fn(&[i64]) -> u64,
{
    fn interval(&self) -> &Interval {
        &self.interval
    }

    fn label_at(&self, position: &[i64]) -> u64 {
        (self.label_fn)(position)
    }
}

impl<F> fmt::Debug for FunctionVolume<F>
where
    F: Fn(&[i64]) -> u64,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionVolume")
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}
