//! Bounded connected-region extraction
//!
//! This module provides the flood-fill extractor, the neighborhood shapes
//! that define adjacency, and the result container a traversal produces.

pub mod errors;
mod shape;
mod visited;
mod monitor;
mod result;
mod region_extractor;

#[cfg(test)]
mod tests;

pub use errors::{RegionError, RegionKitResult};
pub use shape::{NeighborhoodShape, ShapeKind};
pub use visited::{VisitedPolicy, VisitedSet, DenseVisitedSet, SparseVisitedSet, DEFAULT_DENSE_VISITED_LIMIT};
pub use monitor::{CancellationToken, TraversalMonitor, Unmonitored, PROGRESS_STRIDE};
pub use result::{RegionMask, RegionResult};
pub use region_extractor::{ExtractorOptions, RegionExtractor};
