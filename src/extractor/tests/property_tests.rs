//! Invariants checked over pseudo-random label volumes

use std::collections::{HashSet, VecDeque};

use crate::extractor::{NeighborhoodShape, RegionExtractor, RegionResult};
use crate::volume::{ArrayVolume, LabelVolume};

use super::test_utils::{noise_volume, reference_component};

fn seeds(volume: &ArrayVolume, stride: usize) -> Vec<Vec<i64>> {
    let interval = volume.interval();
    (0..interval.num_elements().unwrap())
        .step_by(stride)
        .map(|i| interval.coordinate_at(i).unwrap())
        .collect()
}

fn region_set(result: &RegionResult) -> HashSet<Vec<i64>> {
    result.voxels().collect()
}

#[test]
fn test_unbounded_run_matches_reference_component() {
    let shapes = [
        NeighborhoodShape::diamond(2, 1),
        NeighborhoodShape::rectangle(2, 1),
        NeighborhoodShape::hypersphere(2, 2),
    ];
    let volume = noise_volume(&[17, 13], 3, 11);

    for shape in shapes {
        let extractor = RegionExtractor::new(&volume, shape.clone(), u64::MAX).unwrap();
        for seed in seeds(&volume, 3) {
            let result = extractor.run(&seed).unwrap();
            let expected = reference_component(&volume, &shape, &seed);

            assert_eq!(region_set(&result), expected, "shape {} seed {:?}", shape, seed);
            assert_eq!(result.region_size(), expected.len() as u64);
            assert!(!result.capped_at_max_size());
        }
    }
}

#[test]
fn test_seed_inclusion_and_label_purity() {
    let volume = noise_volume(&[6, 7, 8], 4, 5);
    let extractor = RegionExtractor::new(&volume, NeighborhoodShape::diamond(3, 1), 20).unwrap();

    for seed in seeds(&volume, 7) {
        let result = extractor.run(&seed).unwrap();
        let label = volume.label_at(&seed);

        if label == 0 {
            assert!(result.is_empty());
            assert!(result.bounding_interval().is_empty());
            assert!(!result.capped_at_max_size());
            continue;
        }

        assert!(result.contains(&seed));
        assert_eq!(result.label(), label);
        for voxel in result.voxels() {
            assert_eq!(volume.label_at(&voxel), label);
        }
    }
}

#[test]
fn test_region_is_connected_under_shape() {
    let volume = noise_volume(&[9, 9, 9], 2, 23);
    let shape = NeighborhoodShape::diamond(3, 1);
    let extractor = RegionExtractor::new(&volume, shape.clone(), 50).unwrap();

    for seed in seeds(&volume, 31) {
        let result = extractor.run(&seed).unwrap();
        if result.is_empty() {
            continue;
        }

        let region = region_set(&result);
        let mut reached = HashSet::new();
        let mut queue = VecDeque::new();
        reached.insert(seed.clone());
        queue.push_back(seed.clone());
        while let Some(current) = queue.pop_front() {
            for offset in shape.offsets() {
                let next: Vec<i64> = current.iter().zip(offset).map(|(c, o)| c + o).collect();
                if region.contains(&next) && reached.insert(next.clone()) {
                    queue.push_back(next);
                }
            }
        }
        assert_eq!(reached, region, "region from {:?} is not connected", seed);
    }
}

#[test]
fn test_bounding_interval_is_tight() {
    let volume = noise_volume(&[10, 12], 2, 3);
    let extractor = RegionExtractor::new(&volume, NeighborhoodShape::rectangle(2, 1), 1000).unwrap();

    for seed in seeds(&volume, 5) {
        let result = extractor.run(&seed).unwrap();
        if result.is_empty() {
            continue;
        }

        let voxels: Vec<Vec<i64>> = result.voxels().collect();
        let bounds = result.bounding_interval();
        for d in 0..2 {
            let lo = voxels.iter().map(|v| v[d]).min().unwrap();
            let hi = voxels.iter().map(|v| v[d]).max().unwrap();
            assert_eq!(bounds.min()[d], lo);
            assert_eq!(bounds.max()[d], hi);
        }
        assert_eq!(result.mask().len(), bounds.num_elements().unwrap());
    }
}

#[test]
fn test_cap_monotonicity_and_flag_flip() {
    let volume = ArrayVolume::filled(&[4, 4, 3], 5).unwrap();
    let shape = NeighborhoodShape::diamond(3, 1);
    let component_size = 48u64;

    let mut previous: HashSet<Vec<i64>> = HashSet::new();
    for cap in 1..=component_size + 5 {
        let extractor = RegionExtractor::new(&volume, shape.clone(), cap).unwrap();
        let result = extractor.run(&[1, 2, 1]).unwrap();
        let current = region_set(&result);

        assert_eq!(result.region_size(), cap.min(component_size));
        assert!(current.is_superset(&previous), "cap {} lost voxels", cap);
        assert_eq!(result.capped_at_max_size(), cap < component_size, "cap {}", cap);
        previous = current;
    }
}

#[test]
fn test_capped_region_never_exceeds_budget() {
    let volume = noise_volume(&[20, 20], 2, 99);
    let shape = NeighborhoodShape::rectangle(2, 1);

    for cap in [1u64, 2, 3, 5, 8, 13] {
        let extractor = RegionExtractor::new(&volume, shape.clone(), cap).unwrap();
        for seed in seeds(&volume, 17) {
            let result = extractor.run(&seed).unwrap();
            let natural = reference_component(&volume, &shape, &seed).len() as u64;

            assert!(result.region_size() <= cap);
            assert_eq!(result.region_size(), natural.min(cap));
            assert_eq!(result.capped_at_max_size(), natural > cap);
        }
    }
}
