//! Dense in-memory label volume
//!
//! Stores one `u64` label per voxel in row-major order over an arbitrary
//! interval. This is the volume type produced by the file loaders.

use std::collections::BTreeMap;

use crate::extractor::errors::{RegionError, RegionKitResult};
use super::interval::{IndexLayout, Interval};
use super::label_volume::{LabelVolume, BACKGROUND};

/// Dense row-major label volume
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayVolume {
    interval: Interval,
    layout: IndexLayout,
    labels: Vec<u64>,
}

impl ArrayVolume {
    /// Create a volume over `interval` from row-major labels
    ///
    /// # Arguments
    /// * `interval` - Extent of the volume
    /// * `labels` - One label per voxel, last axis fastest
    ///
    /// # Returns
    /// The volume, or an error if the label count does not match the extent
    pub fn new(interval: Interval, labels: Vec<u64>) -> RegionKitResult<Self> {
        let layout = interval.layout().ok_or_else(|| {
            RegionError::Configuration(format!("Volume extent {} is too large", interval))
        })?;

        if layout.len() != labels.len() as u64 {
            return Err(RegionError::Configuration(format!(
                "Volume extent {} holds {} voxels but {} labels were given",
                interval,
                layout.len(),
                labels.len()
            )));
        }

        Ok(ArrayVolume { interval, layout, labels })
    }

    /// Create a zero-origin volume with the given size along each axis
    pub fn from_dimensions(dimensions: &[usize], labels: Vec<u64>) -> RegionKitResult<Self> {
        Self::new(Interval::from_dimensions(dimensions), labels)
    }

    /// Create a 2-D volume from rows (`[row, column]` indexing)
    pub fn from_rows(rows: &[Vec<u64>]) -> RegionKitResult<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.len());

        if rows.iter().any(|row| row.len() != width) {
            return Err(RegionError::Configuration("All rows must have the same length".to_string()));
        }

        let labels = rows.iter().flat_map(|row| row.iter().copied()).collect();
        Self::from_dimensions(&[height, width], labels)
    }

    /// Create a volume of the given size filled with one label
    pub fn filled(dimensions: &[usize], label: u64) -> RegionKitResult<Self> {
        let count = dimensions.iter().product();
        Self::from_dimensions(dimensions, vec![label; count])
    }

    /// Move the volume so its lower corner sits at `origin`
    pub fn with_origin(self, origin: &[i64]) -> RegionKitResult<Self> {
        if origin.len() != self.interval.num_dimensions() {
            return Err(RegionError::Configuration(format!(
                "Origin has {} axes but the volume has {}",
                origin.len(),
                self.interval.num_dimensions()
            )));
        }

        let max = origin
            .iter()
            .zip(self.interval.dimensions())
            .map(|(&o, d)| o + d as i64 - 1)
            .collect();
        Self::new(Interval::new(origin.to_vec(), max)?, self.labels)
    }

    /// Row-major label storage
    pub fn labels(&self) -> &[u64] {
        &self.labels
    }

    /// Overwrite the label at `position`
    pub fn set(&mut self, position: &[i64], label: u64) -> RegionKitResult<()> {
        if !self.interval.contains(position) {
            return Err(RegionError::OutOfBounds {
                seed: position.to_vec(),
                interval: self.interval.clone(),
            });
        }
        let index = self.layout.index_of(position) as usize;
        self.labels[index] = label;
        Ok(())
    }

    /// Voxel count per non-background label
    pub fn label_counts(&self) -> BTreeMap<u64, u64> {
        let mut counts = BTreeMap::new();
        for &label in self.labels.iter().filter(|&&l| l != BACKGROUND) {
            *counts.entry(label).or_insert(0) += 1;
        }
        counts
    }
}

impl LabelVolume for ArrayVolume {
    fn interval(&self) -> &Interval {
        &self.interval
    }

    fn label_at(&self, position: &[i64]) -> u64 {
        self.labels[self.layout.index_of(position) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_indexing() {
        let volume = ArrayVolume::from_rows(&[vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
        assert_eq!(volume.interval().dimensions(), vec![2, 3]);
        assert_eq!(volume.label_at(&[0, 2]), 3);
        assert_eq!(volume.label_at(&[1, 0]), 4);
        assert_eq!(volume.get(&[2, 0]), None);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        assert!(ArrayVolume::from_rows(&[vec![1, 2], vec![3]]).is_err());
    }

    #[test]
    fn test_label_count_mismatch_rejected() {
        assert!(ArrayVolume::from_dimensions(&[2, 2], vec![1, 2, 3]).is_err());
    }

    #[test]
    fn test_with_origin_shifts_extent() {
        let volume = ArrayVolume::from_rows(&[vec![1, 2], vec![3, 4]])
            .unwrap()
            .with_origin(&[10, -5])
            .unwrap();
        assert_eq!(volume.interval().min(), &[10, -5]);
        assert_eq!(volume.interval().max(), &[11, -4]);
        assert_eq!(volume.label_at(&[11, -5]), 3);
    }

    #[test]
    fn test_set_and_label_counts() {
        let mut volume = ArrayVolume::filled(&[2, 2, 2], 0).unwrap();
        volume.set(&[1, 1, 1], 9).unwrap();
        volume.set(&[0, 1, 0], 9).unwrap();
        volume.set(&[0, 0, 0], 3).unwrap();
        assert!(volume.set(&[2, 0, 0], 1).is_err());

        let counts = volume.label_counts();
        assert_eq!(counts.get(&9), Some(&2));
        assert_eq!(counts.get(&3), Some(&1));
        assert_eq!(counts.get(&0), None);
    }
}
