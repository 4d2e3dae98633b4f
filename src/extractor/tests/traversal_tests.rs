//! Traversal mechanics: visited strategies, monitoring, read counts, sharing

use std::cell::Cell;
use std::thread;

use crate::extractor::{
    CancellationToken, ExtractorOptions, NeighborhoodShape, RegionError, RegionExtractor,
    TraversalMonitor, VisitedPolicy,
};
use crate::volume::{ArrayVolume, FunctionVolume, Interval};

use super::test_utils::{noise_volume, CountingVolume};

#[test]
fn test_dense_and_sparse_visited_sets_agree() {
    let volume = noise_volume(&[8, 8, 8], 2, 7);
    let shape = NeighborhoodShape::rectangle(3, 1);

    let dense = RegionExtractor::with_options(
        &volume,
        shape.clone(),
        200,
        ExtractorOptions { visited_policy: VisitedPolicy::Dense, ..ExtractorOptions::default() },
    )
    .unwrap();
    let sparse = RegionExtractor::with_options(
        &volume,
        shape,
        200,
        ExtractorOptions { visited_policy: VisitedPolicy::Sparse, ..ExtractorOptions::default() },
    )
    .unwrap();

    for seed in [[0, 0, 0], [3, 4, 5], [7, 7, 7], [2, 6, 1]] {
        assert_eq!(dense.run(&seed).unwrap(), sparse.run(&seed).unwrap());
    }
}

#[test]
fn test_huge_lazy_volume_uses_sparse_bookkeeping() {
    let side = 1i64 << 20;
    let interval = Interval::new(vec![0, 0, 0], vec![side - 1; 3]).unwrap();
    let centre = [side / 2, side / 2, side / 2];
    let volume = FunctionVolume::new(interval, move |p: &[i64]| {
        let d2: i64 = p.iter().zip(&centre).map(|(a, c)| (a - c) * (a - c)).sum();
        if d2 <= 25 { 3 } else { 0 }
    });

    let extractor = RegionExtractor::new(&volume, NeighborhoodShape::diamond(3, 1), 1_000_000).unwrap();
    let result = extractor.run(&centre).unwrap();

    let mut expected = 0u64;
    for x in -5i64..=5 {
        for y in -5i64..=5 {
            for z in -5i64..=5 {
                if x * x + y * y + z * z <= 25 {
                    expected += 1;
                }
            }
        }
    }

    assert_eq!(result.region_size(), expected);
    assert_eq!(result.bounding_interval().min(), &[centre[0] - 5, centre[1] - 5, centre[2] - 5]);
    assert_eq!(result.bounding_interval().max(), &[centre[0] + 5, centre[1] + 5, centre[2] + 5]);
    assert!(!result.capped_at_max_size());
}

#[test]
fn test_dense_limit_only_changes_bookkeeping() {
    let volume = noise_volume(&[6, 6, 6], 2, 13);
    let shape = NeighborhoodShape::diamond(3, 1);
    let tight = RegionExtractor::with_options(
        &volume,
        shape.clone(),
        40,
        ExtractorOptions { dense_visited_limit: 0, ..ExtractorOptions::default() },
    )
    .unwrap();
    let roomy = RegionExtractor::new(&volume, shape, 40).unwrap();

    for seed in [[0, 0, 0], [5, 5, 5], [1, 4, 2]] {
        assert_eq!(tight.run(&seed).unwrap(), roomy.run(&seed).unwrap());
    }
}

#[test]
fn test_volume_with_negative_origin() {
    let volume = ArrayVolume::from_rows(&[vec![3, 3, 0], vec![0, 3, 3]])
        .unwrap()
        .with_origin(&[-10, 5])
        .unwrap();
    let extractor = RegionExtractor::new(&volume, NeighborhoodShape::diamond(2, 1), 10).unwrap();

    let result = extractor.run(&[-10, 5]).unwrap();

    assert_eq!(result.region_size(), 4);
    assert_eq!(result.bounding_interval().min(), &[-10, 5]);
    assert_eq!(result.bounding_interval().max(), &[-9, 7]);
    assert!(result.contains(&[-9, 7]));
    assert!(!result.contains(&[-9, 5]));
    assert!(matches!(extractor.run(&[0, 0]), Err(RegionError::OutOfBounds { .. })));
}

#[test]
fn test_rectangle_joins_diagonal_neighbors() {
    let volume = ArrayVolume::from_rows(&[vec![1, 0], vec![0, 1]]).unwrap();

    let diamond = RegionExtractor::new(&volume, NeighborhoodShape::diamond(2, 1), 10).unwrap();
    let rectangle = RegionExtractor::new(&volume, NeighborhoodShape::rectangle(2, 1), 10).unwrap();

    assert_eq!(diamond.run(&[0, 0]).unwrap().region_size(), 1);
    assert_eq!(rectangle.run(&[0, 0]).unwrap().region_size(), 2);
}

#[test]
fn test_overflowing_extent_is_a_configuration_error() {
    let interval = Interval::new(vec![i64::MIN, i64::MIN], vec![i64::MAX, i64::MAX]).unwrap();
    let volume = FunctionVolume::new(interval, |_: &[i64]| 1);

    assert!(matches!(
        RegionExtractor::new(&volume, NeighborhoodShape::diamond(2, 1), 10),
        Err(RegionError::Configuration(_))
    ));
}

#[test]
fn test_each_voxel_read_bounded_by_neighborhood() {
    let volume = ArrayVolume::filled(&[10, 10, 10], 4).unwrap();
    let counting = CountingVolume::new(&volume);
    let shape = NeighborhoodShape::diamond(3, 1);
    let extractor = RegionExtractor::new(&counting, shape, 10_000).unwrap();

    let result = extractor.run(&[5, 5, 5]).unwrap();

    assert_eq!(result.region_size(), 1000);
    // one read for the seed, then only first visits of unvisited neighbors
    assert_eq!(counting.reads(), 1000);
}

#[test]
fn test_cancelled_token_aborts_run() {
    let volume = ArrayVolume::filled(&[5, 5], 1).unwrap();
    let extractor = RegionExtractor::new(&volume, NeighborhoodShape::diamond(2, 1), 100).unwrap();
    let token = CancellationToken::new();
    let handle = token.clone();
    handle.cancel();

    assert!(token.is_cancelled());
    assert!(matches!(extractor.run_monitored(&[2, 2], &token), Err(RegionError::Cancelled)));
    assert!(extractor.run(&[2, 2]).is_ok());
}

struct RecordingMonitor {
    calls: Cell<u32>,
    last: Cell<u64>,
}

impl TraversalMonitor for RecordingMonitor {
    fn on_progress(&self, visited: u64) {
        self.calls.set(self.calls.get() + 1);
        self.last.set(visited);
    }
}

#[test]
fn test_progress_reported_at_stride() {
    let volume = ArrayVolume::filled(&[100, 100], 1).unwrap();
    let extractor = RegionExtractor::new(&volume, NeighborhoodShape::diamond(2, 1), u64::MAX).unwrap();
    let monitor = RecordingMonitor { calls: Cell::new(0), last: Cell::new(0) };

    let result = extractor.run_monitored(&[0, 0], &monitor).unwrap();

    assert_eq!(result.region_size(), 10_000);
    assert_eq!(monitor.calls.get(), 2);
    assert_eq!(monitor.last.get(), 8192);
}

#[test]
fn test_extractor_shared_across_threads() {
    let volume = noise_volume(&[12, 12], 2, 42);
    let extractor = RegionExtractor::new(&volume, NeighborhoodShape::diamond(2, 1), 500).unwrap();
    let expected: Vec<_> = (0..12).map(|i| extractor.run(&[i, i]).unwrap()).collect();

    thread::scope(|scope| {
        let handles: Vec<_> = (0..12i64)
            .map(|i| {
                let extractor = &extractor;
                scope.spawn(move || extractor.run(&[i, i]).unwrap())
            })
            .collect();

        for (handle, expected) in handles.into_iter().zip(&expected) {
            assert_eq!(&handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn test_results_do_not_leak_between_runs() {
    let volume = ArrayVolume::from_rows(&[vec![1, 1, 2, 2], vec![1, 0, 0, 2]]).unwrap();
    let extractor = RegionExtractor::new(&volume, NeighborhoodShape::diamond(2, 1), 10).unwrap();

    let first = extractor.run(&[0, 0]).unwrap();
    let second = extractor.run(&[0, 3]).unwrap();
    let again = extractor.run(&[0, 0]).unwrap();

    assert_eq!(first, again);
    assert_eq!(second.region_size(), 3);
    assert!(!second.contains(&[0, 0]));
}
