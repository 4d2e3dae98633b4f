//! Label volume capability trait
//!
//! A label volume is anything that can report its extent and the integer
//! label stored at a coordinate inside that extent. Providers backed by lazily
//! loaded blocks implement this trait directly; the extractor never assumes
//! that a read is cheap.

use super::interval::Interval;

/// Label value meaning "no object"
pub const BACKGROUND: u64 = 0;

/// Random-access integer-labeled volume
pub trait LabelVolume {
    /// The valid extent of the volume
    fn interval(&self) -> &Interval;

    /// Label stored at `position`
    ///
    /// Callers only pass coordinates contained in [`LabelVolume::interval`].
    fn label_at(&self, position: &[i64]) -> u64;

    /// Number of axes
    fn num_dimensions(&self) -> usize {
        self.interval().num_dimensions()
    }

    /// Label at `position`, or `None` outside the extent
    fn get(&self, position: &[i64]) -> Option<u64> {
        if self.interval().contains(position) {
            Some(self.label_at(position))
        } else {
            None
        }
    }
}

impl<T: LabelVolume + ?Sized> LabelVolume for &T {
    fn interval(&self) -> &Interval {
        (**self).interval()
    }

    fn label_at(&self, position: &[i64]) -> u64 {
        (**self).label_at(position)
    }
}

impl<T: LabelVolume + ?Sized> LabelVolume for Box<T> {
    fn interval(&self) -> &Interval {
        (**self).interval()
    }

    fn label_at(&self, position: &[i64]) -> u64 {
        (**self).label_at(position)
    }
}
