//! Visited-set strategies
//!
//! Traversals track visited voxels by their row-major linear index in the
//! volume. A dense bit vector is only affordable for small extents; large
//! (possibly lazily loaded) volumes use a hashed set that grows with the
//! region instead of the volume.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::extractor::errors::{RegionError, RegionKitResult};

/// Default upper bound on extent size for the dense strategy (2^26 voxels, 8 MiB of bits)
pub const DEFAULT_DENSE_VISITED_LIMIT: u64 = 1 << 26;

/// Set of visited linear indices
pub trait VisitedSet {
    /// Mark `index` visited; returns false if it already was
    fn insert(&mut self, index: u64) -> bool;

    fn contains(&self, index: u64) -> bool;

    /// Number of visited indices
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Bit vector over the whole extent
pub struct DenseVisitedSet {
    words: Vec<u64>,
    count: u64,
}

impl DenseVisitedSet {
    pub fn new(extent_len: usize) -> Self {
        DenseVisitedSet {
            words: vec![0; extent_len.div_ceil(64)],
            count: 0,
        }
    }
}

impl VisitedSet for DenseVisitedSet {
    fn insert(&mut self, index: u64) -> bool {
        let word = &mut self.words[(index / 64) as usize];
        let bit = 1u64 << (index % 64);
        if *word & bit != 0 {
            return false;
        }
        *word |= bit;
        self.count += 1;
        true
    }

    fn contains(&self, index: u64) -> bool {
        self.words[(index / 64) as usize] & (1u64 << (index % 64)) != 0
    }

    fn len(&self) -> u64 {
        self.count
    }
}

/// Hashed set of visited indices
#[derive(Default)]
pub struct SparseVisitedSet {
    indices: HashSet<u64>,
}

impl SparseVisitedSet {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VisitedSet for SparseVisitedSet {
    fn insert(&mut self, index: u64) -> bool {
        self.indices.insert(index)
    }

    fn contains(&self, index: u64) -> bool {
        self.indices.contains(&index)
    }

    fn len(&self) -> u64 {
        self.indices.len() as u64
    }
}

/// How an extractor chooses its visited-set strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisitedPolicy {
    /// Dense when the extent is within the dense limit, sparse otherwise
    #[default]
    Auto,
    /// Always dense
    Dense,
    /// Always sparse
    Sparse,
}

/// Strategy resolved for one volume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitedStrategy {
    Dense(usize),
    Sparse,
}

impl VisitedStrategy {
    /// Allocate a fresh, empty set for one traversal
    pub fn create(&self) -> Box<dyn VisitedSet> {
        match *self {
            VisitedStrategy::Dense(extent_len) => Box::new(DenseVisitedSet::new(extent_len)),
            VisitedStrategy::Sparse => Box::new(SparseVisitedSet::new()),
        }
    }
}

impl VisitedPolicy {
    /// Pick a strategy for an extent of `extent_len` voxels
    ///
    /// # Returns
    /// The strategy, or a configuration error when a dense set is forced on
    /// an extent that cannot be addressed in memory
    pub fn resolve(&self, extent_len: u64, dense_limit: u64) -> RegionKitResult<VisitedStrategy> {
        match self {
            VisitedPolicy::Sparse => Ok(VisitedStrategy::Sparse),
            VisitedPolicy::Auto => match usize::try_from(extent_len) {
                Ok(len) if extent_len <= dense_limit => Ok(VisitedStrategy::Dense(len)),
                _ => Ok(VisitedStrategy::Sparse),
            },
            VisitedPolicy::Dense => usize::try_from(extent_len)
                .map(VisitedStrategy::Dense)
                .map_err(|_| {
                    RegionError::Configuration(format!(
                        "A dense visited set cannot cover {} voxels",
                        extent_len
                    ))
                }),
        }
    }
}

impl FromStr for VisitedPolicy {
    type Err = RegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(VisitedPolicy::Auto),
            "dense" => Ok(VisitedPolicy::Dense),
            "sparse" | "hashed" => Ok(VisitedPolicy::Sparse),
            other => Err(RegionError::Configuration(format!(
                "Unknown visited-set policy '{}' (expected auto, dense or sparse)",
                other
            ))),
        }
    }
}

impl fmt::Display for VisitedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VisitedPolicy::Auto => "auto",
            VisitedPolicy::Dense => "dense",
            VisitedPolicy::Sparse => "sparse",
        };
        write!(f, "{}", name)
    }
}
