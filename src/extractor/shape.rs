//! Neighborhood shapes
//!
//! A [`NeighborhoodShape`] is the fixed list of relative offsets that defines
//! adjacency for a traversal. The named shapes enumerate their offsets in
//! lexicographic order (first axis most significant, most negative first),
//! which makes breadth-first traversal order reproducible.

use std::collections::HashSet;
use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

use crate::extractor::errors::{RegionError, RegionKitResult};

lazy_static! {
    static ref SHAPE_PATTERN: Regex =
        Regex::new(r"(?i)^\s*(diamond|rectangle|box|hypersphere|sphere)\s*(?::\s*(\d+))?\s*$")
            .expect("shape pattern is a valid regex");
}

/// Family a shape was generated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// Offsets with L1 norm up to the radius (face connectivity at radius 1)
    Diamond(u32),
    /// Offsets with L-infinity norm up to the span (full-cube connectivity at span 1)
    Rectangle(u32),
    /// Offsets with Euclidean norm up to the radius
    HyperSphere(u32),
    /// User-supplied offsets
    Custom,
}

/// Immutable set of neighbor offsets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborhoodShape {
    kind: ShapeKind,
    num_dimensions: usize,
    offsets: Vec<Vec<i64>>,
}

impl NeighborhoodShape {
    /// Offsets whose L1 norm lies in `1..=radius`
    ///
    /// `diamond(3, 1)` yields the 6 face neighbors of a voxel.
    pub fn diamond(num_dimensions: usize, radius: u32) -> Self {
        let r = radius as i64;
        Self::enumerate(ShapeKind::Diamond(radius), num_dimensions, radius, |offset| {
            offset.iter().map(|v| v.abs()).sum::<i64>() <= r
        })
    }

    /// Offsets whose L-infinity norm lies in `1..=span`
    ///
    /// `rectangle(3, 1)` yields all 26 voxels of the surrounding cube.
    pub fn rectangle(num_dimensions: usize, span: u32) -> Self {
        Self::enumerate(ShapeKind::Rectangle(span), num_dimensions, span, |_| true)
    }

    /// Offsets whose squared Euclidean norm lies in `1..=radius²`
    pub fn hypersphere(num_dimensions: usize, radius: u32) -> Self {
        let r2 = radius as i64 * radius as i64;
        Self::enumerate(ShapeKind::HyperSphere(radius), num_dimensions, radius, |offset| {
            offset.iter().map(|v| v * v).sum::<i64>() <= r2
        })
    }

    /// Shape from arbitrary offsets
    ///
    /// The zero offset and repeated offsets are dropped; the remaining order
    /// is kept as given.
    ///
    /// # Returns
    /// The shape, or a configuration error if the offsets disagree in
    /// dimensionality
    pub fn from_offsets(offsets: Vec<Vec<i64>>) -> RegionKitResult<Self> {
        let num_dimensions = offsets.first().map_or(0, |o| o.len());

        if let Some(bad) = offsets.iter().find(|o| o.len() != num_dimensions) {
            return Err(RegionError::Configuration(format!(
                "Offset {:?} has {} axes, expected {}",
                bad,
                bad.len(),
                num_dimensions
            )));
        }

        let mut seen = HashSet::new();
        let offsets = offsets
            .into_iter()
            .filter(|o| o.iter().any(|&v| v != 0))
            .filter(|o| seen.insert(o.clone()))
            .collect();

        Ok(NeighborhoodShape {
            kind: ShapeKind::Custom,
            num_dimensions,
            offsets,
        })
    }

    /// Parse a textual shape such as `diamond:1`, `rectangle:2` or `sphere`
    ///
    /// The radius defaults to 1 when omitted. `box` is accepted for
    /// rectangle and `sphere` for hypersphere.
    pub fn parse(text: &str, num_dimensions: usize) -> RegionKitResult<Self> {
        let captures = SHAPE_PATTERN.captures(text).ok_or_else(|| {
            RegionError::Configuration(format!(
                "Invalid neighborhood shape '{}' (expected e.g. diamond:1, rectangle:1, hypersphere:2)",
                text
            ))
        })?;

        let radius = match captures.get(2) {
            Some(m) => m.as_str().parse::<u32>().map_err(|_| {
                RegionError::Configuration(format!("Invalid shape radius: {}", m.as_str()))
            })?,
            None => 1,
        };

        match captures[1].to_lowercase().as_str() {
            "diamond" => Ok(Self::diamond(num_dimensions, radius)),
            "rectangle" | "box" => Ok(Self::rectangle(num_dimensions, radius)),
            _ => Ok(Self::hypersphere(num_dimensions, radius)),
        }
    }

    fn enumerate<F>(kind: ShapeKind, num_dimensions: usize, radius: u32, keep: F) -> Self
    where
        F: Fn(&[i64]) -> bool,
    {
        let r = radius as i64;
        let mut offsets = Vec::new();

        if num_dimensions > 0 && r > 0 {
            let mut current = vec![-r; num_dimensions];
            'odometer: loop {
                if current.iter().any(|&v| v != 0) && keep(&current) {
                    offsets.push(current.clone());
                }

                let mut axis = num_dimensions;
                loop {
                    if axis == 0 {
                        break 'odometer;
                    }
                    axis -= 1;
                    if current[axis] < r {
                        current[axis] += 1;
                        break;
                    }
                    current[axis] = -r;
                }
            }
        }

        NeighborhoodShape {
            kind,
            num_dimensions,
            offsets,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn num_dimensions(&self) -> usize {
        self.num_dimensions
    }

    /// Offsets in traversal order
    pub fn offsets(&self) -> &[Vec<i64>] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Whether every offset's negation is also an offset
    pub fn is_symmetric(&self) -> bool {
        let set: HashSet<&Vec<i64>> = self.offsets.iter().collect();
        self.offsets.iter().all(|o| {
            let negated: Vec<i64> = o.iter().map(|v| -v).collect();
            set.contains(&negated)
        })
    }
}

impl fmt::Display for NeighborhoodShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ShapeKind::Diamond(r) => write!(f, "diamond:{}", r),
            ShapeKind::Rectangle(r) => write!(f, "rectangle:{}", r),
            ShapeKind::HyperSphere(r) => write!(f, "hypersphere:{}", r),
            ShapeKind::Custom => write!(f, "custom({} offsets)", self.offsets.len()),
        }
    }
}
