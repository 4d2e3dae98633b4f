//! Bounded connected-region extraction
//!
//! [`RegionExtractor`] flood-fills from a seed over voxels carrying the seed's
//! label, breadth first, and stops once the region reaches a voxel budget.
//!
//! Traversal order is FIFO over the frontier, and neighbors are tried in the
//! shape's offset order. The budget is checked before each dequeue and after
//! each insertion, so a region never exceeds it. When the budget is reached
//! the remaining frontier is probed (reads only) to decide whether anything
//! was actually left out: `capped_at_max_size` is true exactly when the
//! natural component is larger than the budget.

use std::collections::VecDeque;

use log::debug;

use crate::extractor::errors::{RegionError, RegionKitResult};
use crate::extractor::monitor::{TraversalMonitor, Unmonitored, PROGRESS_STRIDE};
use crate::extractor::result::{RegionMask, RegionResult};
use crate::extractor::shape::NeighborhoodShape;
use crate::extractor::visited::{VisitedPolicy, VisitedSet, VisitedStrategy, DEFAULT_DENSE_VISITED_LIMIT};
use crate::volume::{IndexLayout, Interval, LabelVolume, BACKGROUND};

/// Tuning knobs that do not change which voxels a traversal visits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractorOptions {
    /// Visited-set strategy selection
    pub visited_policy: VisitedPolicy,
    /// Largest extent, in voxels, for which [`VisitedPolicy::Auto`] picks a dense set
    pub dense_visited_limit: u64,
}

impl Default for ExtractorOptions {
    fn default() -> Self {
        ExtractorOptions {
            visited_policy: VisitedPolicy::Auto,
            dense_visited_limit: DEFAULT_DENSE_VISITED_LIMIT,
        }
    }
}

/// Flood-fill extractor bound to one volume, shape and budget
///
/// The extractor only borrows the volume and never mutates it. All traversal
/// state is local to each call, so `run` takes `&self` and one extractor can
/// serve concurrent callers when the volume is `Sync`.
pub struct RegionExtractor<'v, V: LabelVolume + ?Sized> {
    volume: &'v V,
    shape: NeighborhoodShape,
    max_region_size: u64,
    layout: IndexLayout,
    visited: VisitedStrategy,
}

impl<'v, V: LabelVolume + ?Sized> RegionExtractor<'v, V> {
    /// Create an extractor with default options
    ///
    /// # Arguments
    /// * `volume` - Labeled volume to traverse
    /// * `shape` - Neighborhood defining adjacency
    /// * `max_region_size` - Voxel budget per traversal
    ///
    /// # Returns
    /// The extractor, or a configuration error for a zero budget, an empty
    /// shape, a shape of the wrong dimensionality, or an extent too large to
    /// index
    pub fn new(volume: &'v V, shape: NeighborhoodShape, max_region_size: u64) -> RegionKitResult<Self> {
        Self::with_options(volume, shape, max_region_size, ExtractorOptions::default())
    }

    /// Create an extractor with explicit options
    pub fn with_options(
        volume: &'v V,
        shape: NeighborhoodShape,
        max_region_size: u64,
        options: ExtractorOptions,
    ) -> RegionKitResult<Self> {
        if max_region_size == 0 {
            return Err(RegionError::Configuration("Maximum region size must be positive".to_string()));
        }

        if shape.is_empty() {
            return Err(RegionError::Configuration("Neighborhood shape has no offsets".to_string()));
        }

        let interval = volume.interval();
        if shape.num_dimensions() != interval.num_dimensions() {
            return Err(RegionError::Configuration(format!(
                "Neighborhood shape is {}-dimensional but the volume is {}-dimensional",
                shape.num_dimensions(),
                interval.num_dimensions()
            )));
        }

        let layout = interval.layout().ok_or_else(|| {
            RegionError::Configuration(format!("Volume extent {} overflows the linear index space", interval))
        })?;

        let visited = options
            .visited_policy
            .resolve(layout.len(), options.dense_visited_limit)?;

        debug!(
            "Region extractor over {} with shape {} ({} offsets), budget {}, visited set {:?}",
            interval,
            shape,
            shape.len(),
            max_region_size,
            visited
        );

        Ok(RegionExtractor {
            volume,
            shape,
            max_region_size,
            layout,
            visited,
        })
    }

    pub fn shape(&self) -> &NeighborhoodShape {
        &self.shape
    }

    pub fn max_region_size(&self) -> u64 {
        self.max_region_size
    }

    /// Extract the region containing `seed`
    ///
    /// # Returns
    /// The region, an empty result for a background seed, or
    /// [`RegionError::OutOfBounds`] if the seed is outside the volume
    pub fn run(&self, seed: &[i64]) -> RegionKitResult<RegionResult> {
        self.run_monitored(seed, &Unmonitored)
    }

    /// Extract the region containing `seed`, polling `monitor` as it goes
    ///
    /// Returns [`RegionError::Cancelled`] if the monitor asks to stop.
    pub fn run_monitored(&self, seed: &[i64], monitor: &dyn TraversalMonitor) -> RegionKitResult<RegionResult> {
        let interval = self.volume.interval();
        if !interval.contains(seed) {
            return Err(RegionError::OutOfBounds {
                seed: seed.to_vec(),
                interval: interval.clone(),
            });
        }

        let label = self.volume.label_at(seed);
        if label == BACKGROUND {
            debug!("Seed {:?} is background, returning an empty region", seed);
            return RegionResult::empty(seed.to_vec());
        }

        let n = seed.len();
        let mut visited = self.visited.create();
        let mut frontier = VecDeque::new();
        let mut order = Vec::new();
        let mut lower = seed.to_vec();
        let mut upper = seed.to_vec();

        let seed_index = self.layout.index_of(seed);
        visited.insert(seed_index);
        frontier.push_back(seed_index);
        order.push(seed_index);

        let mut current = vec![0i64; n];
        let mut neighbor = vec![0i64; n];

        'traversal: while (order.len() as u64) < self.max_region_size {
            if monitor.should_stop() {
                debug!("Traversal from {:?} cancelled after {} voxels", seed, order.len());
                return Err(RegionError::Cancelled);
            }

            let Some(index) = frontier.pop_front() else {
                break;
            };
            self.layout.coordinate_into(index, &mut current);

            for offset in self.shape.offsets() {
                if !self.step(interval, &current, offset, &mut neighbor) {
                    continue;
                }

                let neighbor_index = self.layout.index_of(&neighbor);
                if visited.contains(neighbor_index) || self.volume.label_at(&neighbor) != label {
                    continue;
                }

                visited.insert(neighbor_index);
                frontier.push_back(neighbor_index);
                order.push(neighbor_index);
                for d in 0..n {
                    lower[d] = lower[d].min(neighbor[d]);
                    upper[d] = upper[d].max(neighbor[d]);
                }

                let size = order.len() as u64;
                if size % PROGRESS_STRIDE == 0 {
                    monitor.on_progress(size);
                }
                if size >= self.max_region_size {
                    // remaining offsets of this voxel are still unexplored
                    frontier.push_front(index);
                    break 'traversal;
                }
            }
        }

        let capped = (order.len() as u64) >= self.max_region_size
            && self.has_unexplored_member(interval, &frontier, visited.as_ref(), label);

        let bounding_interval = Interval::new(lower, upper)?;
        let mask = self.build_mask(&bounding_interval, &order)?;
        let result = RegionResult::new(seed.to_vec(), label, bounding_interval, mask, capped);

        debug!("Extracted {}", result);
        Ok(result)
    }

    /// Compute `current + offset` into `out`; false if it leaves the extent
    fn step(&self, interval: &Interval, current: &[i64], offset: &[i64], out: &mut [i64]) -> bool {
        for d in 0..current.len() {
            match current[d].checked_add(offset[d]) {
                Some(v) if v >= interval.min()[d] && v <= interval.max()[d] => out[d] = v,
                _ => return false,
            }
        }
        true
    }

    /// Whether any frontier voxel still has an unvisited same-label neighbor
    fn has_unexplored_member(
        &self,
        interval: &Interval,
        frontier: &VecDeque<u64>,
        visited: &dyn VisitedSet,
        label: u64,
    ) -> bool {
        let n = interval.num_dimensions();
        let mut current = vec![0i64; n];
        let mut neighbor = vec![0i64; n];

        for &index in frontier {
            self.layout.coordinate_into(index, &mut current);
            for offset in self.shape.offsets() {
                if !self.step(interval, &current, offset, &mut neighbor) {
                    continue;
                }
                if visited.contains(self.layout.index_of(&neighbor)) {
                    continue;
                }
                if self.volume.label_at(&neighbor) == label {
                    return true;
                }
            }
        }
        false
    }

    fn build_mask(&self, bounding_interval: &Interval, order: &[u64]) -> RegionKitResult<RegionMask> {
        let mut mask = RegionMask::new(&bounding_interval.dimensions())?;
        let local = bounding_interval.layout().ok_or_else(|| {
            RegionError::Configuration(format!("Bounding interval {} is too large to index", bounding_interval))
        })?;

        let mut position = vec![0i64; bounding_interval.num_dimensions()];
        for &index in order {
            self.layout.coordinate_into(index, &mut position);
            mask.set(local.index_of(&position));
        }
        Ok(mask)
    }
}
