//! Axis-aligned integer intervals
//!
//! An [`Interval`] is an inclusive box in index space, one `min`/`max` pair
//! per axis. Every linear layout derived from it is row-major: the last axis
//! varies fastest.

use std::fmt;

use crate::extractor::errors::{RegionError, RegionKitResult};

/// Inclusive axis-aligned box in integer index space
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Interval {
    min: Vec<i64>,
    max: Vec<i64>,
}

impl Interval {
    /// Create an interval from inclusive per-axis bounds
    ///
    /// # Arguments
    /// * `min` - Lower corner (inclusive)
    /// * `max` - Upper corner (inclusive)
    ///
    /// # Returns
    /// The interval, or an error if the two corners disagree in dimensionality
    pub fn new(min: Vec<i64>, max: Vec<i64>) -> RegionKitResult<Self> {
        if min.len() != max.len() {
            return Err(RegionError::Configuration(format!(
                "Interval corners have different dimensionality: {} vs {}",
                min.len(),
                max.len()
            )));
        }
        Ok(Interval { min, max })
    }

    /// Create a zero-origin interval with the given size along each axis
    ///
    /// An axis of size 0 makes the interval empty.
    pub fn from_dimensions(dimensions: &[usize]) -> Self {
        Interval {
            min: vec![0; dimensions.len()],
            max: dimensions.iter().map(|&d| d as i64 - 1).collect(),
        }
    }

    /// The canonical empty interval of the given dimensionality
    pub fn empty(num_dimensions: usize) -> Self {
        Interval {
            min: vec![0; num_dimensions],
            max: vec![-1; num_dimensions],
        }
    }

    /// Tightest interval enclosing every given point
    ///
    /// Returns the empty interval when there are no points.
    pub fn from_points<'p, I>(num_dimensions: usize, points: I) -> Self
    where
        I: IntoIterator<Item = &'p [i64]>,
    {
        let mut min = vec![i64::MAX; num_dimensions];
        let mut max = vec![i64::MIN; num_dimensions];
        let mut any = false;

        for point in points {
            any = true;
            for d in 0..num_dimensions {
                min[d] = min[d].min(point[d]);
                max[d] = max[d].max(point[d]);
            }
        }

        if !any {
            return Interval::empty(num_dimensions);
        }
        Interval { min, max }
    }

    /// Lower corner (inclusive)
    pub fn min(&self) -> &[i64] {
        &self.min
    }

    /// Upper corner (inclusive)
    pub fn max(&self) -> &[i64] {
        &self.max
    }

    pub fn num_dimensions(&self) -> usize {
        self.min.len()
    }

    /// Whether any axis has `max < min`
    pub fn is_empty(&self) -> bool {
        self.min.iter().zip(&self.max).any(|(lo, hi)| hi < lo)
    }

    /// Number of positions along axis `d` (0 for an empty interval)
    ///
    /// Saturates at `u64::MAX` for an axis spanning the whole `i64` range.
    pub fn dimension(&self, d: usize) -> u64 {
        u64::try_from(self.span(d)).unwrap_or(u64::MAX)
    }

    fn span(&self, d: usize) -> i128 {
        if self.is_empty() {
            return 0;
        }
        self.max[d] as i128 - self.min[d] as i128 + 1
    }

    /// Number of positions along every axis
    pub fn dimensions(&self) -> Vec<u64> {
        (0..self.num_dimensions()).map(|d| self.dimension(d)).collect()
    }

    /// Total number of positions, or `None` if it overflows `u64`
    pub fn num_elements(&self) -> Option<u64> {
        (0..self.num_dimensions()).try_fold(1u64, |acc, d| {
            u64::try_from(self.span(d)).ok().and_then(|span| acc.checked_mul(span))
        })
    }

    /// Whether the coordinate lies inside the interval
    ///
    /// Coordinates of the wrong dimensionality are never contained.
    pub fn contains(&self, position: &[i64]) -> bool {
        position.len() == self.num_dimensions()
            && position
                .iter()
                .zip(self.min.iter().zip(&self.max))
                .all(|(p, (lo, hi))| p >= lo && p <= hi)
    }

    /// Row-major linear index of a contained coordinate
    pub fn linear_index(&self, position: &[i64]) -> Option<u64> {
        if !self.contains(position) {
            return None;
        }
        self.layout().map(|layout| layout.index_of(position))
    }

    /// Coordinate at a row-major linear index
    pub fn coordinate_at(&self, index: u64) -> Option<Vec<i64>> {
        let layout = self.layout()?;
        if index >= layout.len() {
            return None;
        }
        let mut position = vec![0; self.num_dimensions()];
        layout.coordinate_into(index, &mut position);
        Some(position)
    }

    /// Precomputed row-major layout, or `None` if the element count overflows
    pub fn layout(&self) -> Option<IndexLayout> {
        IndexLayout::new(self)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "[empty; {}d]", self.num_dimensions());
        }
        let axes: Vec<String> = self
            .min
            .iter()
            .zip(&self.max)
            .map(|(lo, hi)| format!("{}..={}", lo, hi))
            .collect();
        write!(f, "[{}]", axes.join(", "))
    }
}

/// Row-major strides for an interval
///
/// Converting between coordinates and linear indices happens on every
/// traversal step, so the strides are computed once per interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexLayout {
    min: Vec<i64>,
    dimensions: Vec<u64>,
    strides: Vec<u64>,
    len: u64,
}

impl IndexLayout {
    fn new(interval: &Interval) -> Option<Self> {
        let dimensions = interval.dimensions();
        let len = interval.num_elements()?;

        let mut strides = vec![1u64; dimensions.len()];
        for d in (0..dimensions.len().saturating_sub(1)).rev() {
            strides[d] = strides[d + 1].checked_mul(dimensions[d + 1].max(1))?;
        }

        Some(IndexLayout {
            min: interval.min.clone(),
            dimensions,
            strides,
            len,
        })
    }

    /// Number of positions covered by the layout
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Linear index of a coordinate the caller knows to be inside the interval
    pub fn index_of(&self, position: &[i64]) -> u64 {
        position
            .iter()
            .zip(&self.min)
            .zip(&self.strides)
            .map(|((&p, &lo), stride)| (p as i128 - lo as i128) as u64 * stride)
            .sum()
    }

    /// Write the coordinate of a linear index into `out`
    pub fn coordinate_into(&self, mut index: u64, out: &mut [i64]) {
        for d in 0..self.strides.len() {
            let stride = self.strides[d];
            out[d] = (self.min[d] as i128 + (index / stride) as i128) as i64;
            index %= stride;
        }
    }

    /// Size along each axis
    pub fn dimensions(&self) -> &[u64] {
        &self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dimensions() {
        let interval = Interval::from_dimensions(&[3, 4]);
        assert_eq!(interval.min(), &[0, 0]);
        assert_eq!(interval.max(), &[2, 3]);
        assert_eq!(interval.num_elements(), Some(12));
        assert!(!interval.is_empty());
    }

    #[test]
    fn test_empty_interval() {
        let interval = Interval::empty(3);
        assert!(interval.is_empty());
        assert_eq!(interval.dimensions(), vec![0, 0, 0]);
        assert_eq!(interval.num_elements(), Some(0));
        assert!(!interval.contains(&[0, 0, 0]));
    }

    #[test]
    fn test_mismatched_corners_rejected() {
        assert!(Interval::new(vec![0, 0], vec![1]).is_err());
    }

    #[test]
    fn test_contains_checks_dimensionality() {
        let interval = Interval::new(vec![-2, 5], vec![2, 9]).unwrap();
        assert!(interval.contains(&[-2, 9]));
        assert!(!interval.contains(&[-3, 6]));
        assert!(!interval.contains(&[0]));
        assert!(!interval.contains(&[0, 6, 0]));
    }

    #[test]
    fn test_row_major_indexing_with_offset_origin() {
        let interval = Interval::new(vec![10, -1, 4], vec![11, 1, 7]).unwrap();
        assert_eq!(interval.linear_index(&[10, -1, 4]), Some(0));
        assert_eq!(interval.linear_index(&[10, -1, 5]), Some(1));
        assert_eq!(interval.linear_index(&[10, 0, 4]), Some(4));
        assert_eq!(interval.linear_index(&[11, -1, 4]), Some(12));
        assert_eq!(interval.coordinate_at(23), Some(vec![11, 1, 7]));
        assert_eq!(interval.coordinate_at(24), None);
        assert_eq!(interval.linear_index(&[12, 0, 4]), None);
    }

    #[test]
    fn test_from_points_is_tight() {
        let points: Vec<Vec<i64>> = vec![vec![3, -1], vec![0, 4], vec![2, 2]];
        let interval = Interval::from_points(2, points.iter().map(|p| p.as_slice()));
        assert_eq!(interval.min(), &[0, -1]);
        assert_eq!(interval.max(), &[3, 4]);

        let none: Vec<Vec<i64>> = Vec::new();
        assert!(Interval::from_points(2, none.iter().map(|p| p.as_slice())).is_empty());
    }

    #[test]
    fn test_overflowing_extent_has_no_layout() {
        let interval = Interval::new(vec![i64::MIN, i64::MIN], vec![i64::MAX, i64::MAX]).unwrap();
        assert_eq!(interval.num_elements(), None);
        assert!(interval.layout().is_none());
    }
}
