//! Extraction results
//!
//! A [`RegionResult`] is the immutable output of one traversal: the tight
//! bounding interval of the region in volume coordinates and a bit-packed
//! [`RegionMask`] over that interval. Mask index 0 along an axis corresponds
//! to the interval's `min` along that axis.

use std::fmt;

use crate::extractor::errors::{RegionError, RegionKitResult};
use crate::volume::{IndexLayout, Interval};

/// Bit-packed binary mask over a zero-origin box
///
/// Bits are stored row-major (last axis fastest), least significant bit
/// first within each byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionMask {
    dimensions: Vec<u64>,
    layout: IndexLayout,
    bits: Vec<u8>,
}

impl RegionMask {
    /// All-false mask with the given size along each axis
    pub(crate) fn new(dimensions: &[u64]) -> RegionKitResult<Self> {
        let layout = Self::layout_for(dimensions)?;
        let bits = vec![0u8; Self::byte_len(layout.len())?];
        Ok(RegionMask {
            dimensions: dimensions.to_vec(),
            layout,
            bits,
        })
    }

    /// Mask from its packed representation
    ///
    /// # Returns
    /// The mask, or a format error if `bits` has the wrong length
    pub(crate) fn from_bytes(dimensions: &[u64], bits: Vec<u8>) -> RegionKitResult<Self> {
        let layout = Self::layout_for(dimensions)?;
        let expected = Self::byte_len(layout.len())?;
        if bits.len() != expected {
            return Err(RegionError::InvalidFormat(format!(
                "Mask payload holds {} bytes, expected {}",
                bits.len(),
                expected
            )));
        }
        let tail = layout.len() % 8;
        if tail != 0 && bits.last().is_some_and(|&b| b >> tail != 0) {
            return Err(RegionError::InvalidFormat("Mask payload has bits set past its end".to_string()));
        }
        Ok(RegionMask {
            dimensions: dimensions.to_vec(),
            layout,
            bits,
        })
    }

    fn layout_for(dimensions: &[u64]) -> RegionKitResult<IndexLayout> {
        let max = dimensions.iter().map(|&d| d as i64 - 1).collect();
        Interval::new(vec![0; dimensions.len()], max)?
            .layout()
            .ok_or_else(|| RegionError::Configuration("Mask is too large to address".to_string()))
    }

    fn byte_len(voxels: u64) -> RegionKitResult<usize> {
        usize::try_from(voxels.div_ceil(8))
            .map_err(|_| RegionError::Configuration("Mask is too large to allocate".to_string()))
    }

    /// Size along each axis
    pub fn dimensions(&self) -> &[u64] {
        &self.dimensions
    }

    /// Number of voxels covered (true or false)
    pub fn len(&self) -> u64 {
        self.layout.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    /// Value at a row-major local index
    pub fn get(&self, index: u64) -> bool {
        if index >= self.len() {
            return false;
        }
        self.bits[(index / 8) as usize] & (1 << (index % 8)) != 0
    }

    /// Value at a local coordinate; false outside the mask
    pub fn get_local(&self, position: &[i64]) -> bool {
        let inside = position.len() == self.dimensions.len()
            && position
                .iter()
                .zip(&self.dimensions)
                .all(|(&p, &d)| p >= 0 && (p as u64) < d);
        inside && self.get(self.layout.index_of(position))
    }

    pub(crate) fn set(&mut self, index: u64) {
        self.bits[(index / 8) as usize] |= 1 << (index % 8);
    }

    /// Number of true voxels
    pub fn count(&self) -> u64 {
        self.bits.iter().map(|b| b.count_ones() as u64).sum()
    }

    /// Packed bits, LSB-first
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    /// One boolean per voxel in row-major order
    pub fn to_bools(&self) -> Vec<bool> {
        (0..self.len()).map(|i| self.get(i)).collect()
    }
}

/// Outcome of one region extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionResult {
    seed: Vec<i64>,
    label: u64,
    bounding_interval: Interval,
    mask: RegionMask,
    region_size: u64,
    capped_at_max_size: bool,
}

impl RegionResult {
    /// Empty result for a background seed
    pub(crate) fn empty(seed: Vec<i64>) -> RegionKitResult<Self> {
        let n = seed.len();
        Ok(RegionResult {
            seed,
            label: 0,
            bounding_interval: Interval::empty(n),
            mask: RegionMask::new(&vec![0; n])?,
            region_size: 0,
            capped_at_max_size: false,
        })
    }

    pub(crate) fn new(
        seed: Vec<i64>,
        label: u64,
        bounding_interval: Interval,
        mask: RegionMask,
        capped_at_max_size: bool,
    ) -> Self {
        let region_size = mask.count();
        RegionResult {
            seed,
            label,
            bounding_interval,
            mask,
            region_size,
            capped_at_max_size,
        }
    }

    /// Seed the traversal started from
    pub fn seed(&self) -> &[i64] {
        &self.seed
    }

    /// Label shared by every region voxel (0 for an empty region)
    pub fn label(&self) -> u64 {
        self.label
    }

    /// Tightest box around the region, in volume coordinates
    pub fn bounding_interval(&self) -> &Interval {
        &self.bounding_interval
    }

    /// Mask over the bounding interval
    pub fn mask(&self) -> &RegionMask {
        &self.mask
    }

    /// Number of region voxels
    pub fn region_size(&self) -> u64 {
        self.region_size
    }

    /// Whether the size budget cut the traversal short
    pub fn capped_at_max_size(&self) -> bool {
        self.capped_at_max_size
    }

    pub fn is_empty(&self) -> bool {
        self.region_size == 0
    }

    pub fn num_dimensions(&self) -> usize {
        self.seed.len()
    }

    /// Whether a volume coordinate belongs to the region
    pub fn contains(&self, position: &[i64]) -> bool {
        if !self.bounding_interval.contains(position) {
            return false;
        }
        let local: Vec<i64> = position
            .iter()
            .zip(self.bounding_interval.min())
            .map(|(p, lo)| p - lo)
            .collect();
        self.mask.get_local(&local)
    }

    /// Volume coordinates of every region voxel, in row-major order
    pub fn voxels(&self) -> impl Iterator<Item = Vec<i64>> + '_ {
        let layout = self.bounding_interval.layout();
        let n = self.num_dimensions();
        (0..self.mask.len())
            .filter(move |&i| self.mask.get(i))
            .filter_map(move |i| {
                layout.as_ref().map(|layout| {
                    let mut position = vec![0; n];
                    layout.coordinate_into(i, &mut position);
                    position
                })
            })
    }
}

impl fmt::Display for RegionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "label {} from seed {:?}: {} voxels in {}{}",
            self.label,
            self.seed,
            self.region_size,
            self.bounding_interval,
            if self.capped_at_max_size { " (capped at max size)" } else { "" }
        )
    }
}
