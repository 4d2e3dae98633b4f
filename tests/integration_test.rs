//! Integration tests for loading, extracting and persisting regions

extern crate std;

use std::fs;
use std::path::{Path, PathBuf};

use image::{GrayImage, Luma};
use regionkit::config::RegionKitConfig;
use regionkit::io::ByteOrder;
use regionkit::volume::lvol;
use regionkit::{ArrayVolume, LabelVolume, NeighborhoodShape, RegionError, RegionKit, VolumeLoader};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("regionkit_integration_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn sample_volume() -> ArrayVolume {
    ArrayVolume::from_rows(&[
        vec![1, 1, 0, 2, 2],
        vec![1, 0, 0, 2, 2],
        vec![1, 1, 1, 0, 0],
        vec![0, 0, 1, 3, 3],
        vec![4, 0, 1, 3, 3],
    ])
    .unwrap()
}

fn toolkit(dir: &Path) -> RegionKit {
    let log_file = dir.join("regionkit.log");
    RegionKit::new(Some(log_file.to_str().unwrap())).unwrap()
}

#[test]
fn test_complete_region_workflow() {
    let dir = scratch_dir("workflow");
    let kit = toolkit(&dir);

    let volume_path = dir.join("sample.lvol");
    lvol::save(&volume_path, &sample_volume(), ByteOrder::BigEndian).unwrap();
    let volume = kit.load_volume(&volume_path).unwrap();
    std::assert_eq!(volume, sample_volume());

    let result = kit.extract(&volume, &[0, 0]).unwrap();
    std::assert_eq!(result.label(), 1);
    std::assert_eq!(result.region_size(), 8);
    std::assert!(!result.capped_at_max_size());
    std::assert_eq!(result.bounding_interval().min(), &[0, 0]);
    std::assert_eq!(result.bounding_interval().max(), &[4, 2]);
    std::assert!(result.contains(&[4, 2]));
    std::assert!(!result.contains(&[1, 1]));

    for compression in ["deflate", "zstd", "none"] {
        let region_path = dir.join(format!("label1_{}.rrg", compression));
        kit.save_region(&result, &region_path, compression).unwrap();
        let restored = kit.load_region(&region_path).unwrap();
        std::assert_eq!(restored, result);
    }

    let masks = kit.save_mask_images(&result, &dir).unwrap();
    std::assert_eq!(masks.len(), 1);
    let mask = image::open(&masks[0]).unwrap().to_luma8();
    std::assert_eq!(mask.dimensions(), (3, 5));
    std::assert_eq!(mask.get_pixel(2, 4).0, [255]);
    std::assert_eq!(mask.get_pixel(1, 1).0, [0]);

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn test_budget_from_configuration() {
    let dir = scratch_dir("budget");
    let mut config = RegionKitConfig::default();
    config.extraction.max_region_size = 3;
    config.extraction.shape = "rectangle:1".to_string();
    let log_file = dir.join("regionkit.log");
    let kit = RegionKit::with_config(config, Some(log_file.to_str().unwrap())).unwrap();

    let volume = sample_volume();
    let capped = kit.extract(&volume, &[0, 0]).unwrap();
    std::assert_eq!(capped.region_size(), 3);
    std::assert!(capped.capped_at_max_size());

    // the four-voxel block of 3s exceeds the budget of three as well
    let block = kit.extract(&volume, &[4, 4]).unwrap();
    std::assert_eq!(block.region_size(), 3);
    std::assert!(block.capped_at_max_size());

    let exact = kit
        .extract_with(&volume, &[0, 0], NeighborhoodShape::rectangle(2, 1), 8)
        .unwrap();
    std::assert_eq!(exact.region_size(), 8);
    std::assert!(!exact.capped_at_max_size());

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn test_seed_outside_volume() {
    let dir = scratch_dir("outside");
    let kit = toolkit(&dir);
    let volume = sample_volume();

    std::assert!(kit.extract_or_none(&volume, &[5, 0]).unwrap().is_none());
    std::assert!(kit.extract_or_none(&volume, &[2, 2]).unwrap().is_some());
    std::assert!(matches!(
        kit.extract(&volume, &[-1, 0]),
        Err(RegionError::OutOfBounds { .. })
    ));

    let background = kit.extract_or_none(&volume, &[1, 1]).unwrap().unwrap();
    std::assert!(background.is_empty());
    std::assert_eq!(background.label(), 0);

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn test_image_stack_extraction() {
    let dir = scratch_dir("stack");
    let stack_dir = dir.join("stack");
    fs::create_dir_all(&stack_dir).unwrap();

    // a column of label 7 running through three slices
    for z in 0..3u32 {
        let mut slice = GrayImage::new(4, 4);
        slice.put_pixel(1, 2, Luma([7]));
        if z == 1 {
            slice.put_pixel(2, 2, Luma([7]));
        }
        slice.save(stack_dir.join(format!("slice_{:03}.png", z))).unwrap();
    }

    let kit = toolkit(&dir);
    let volume = VolumeLoader::load(&stack_dir).unwrap();
    std::assert_eq!(volume.num_dimensions(), 3);
    std::assert_eq!(volume.interval().dimensions(), vec![3, 4, 4]);

    let result = kit.extract(&volume, &[0, 2, 1]).unwrap();
    std::assert_eq!(result.label(), 7);
    std::assert_eq!(result.region_size(), 4);
    std::assert_eq!(result.bounding_interval().min(), &[0, 2, 1]);
    std::assert_eq!(result.bounding_interval().max(), &[2, 2, 2]);

    let masks = kit.save_mask_images(&result, dir.join("masks")).unwrap();
    std::assert_eq!(masks.len(), 3);

    let colorized = dir.join("slice1.png");
    kit.colorize(&volume, Some(1), &colorized).unwrap();
    let image = image::open(&colorized).unwrap().to_rgba8();
    std::assert_eq!(image.dimensions(), (4, 4));
    std::assert_eq!(image.get_pixel(0, 0).0[3], 0);
    std::assert_eq!(image.get_pixel(2, 2), image.get_pixel(1, 2));

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn test_describe_volume_and_compressions() {
    let dir = scratch_dir("describe");
    let kit = toolkit(&dir);

    let description = kit.describe_volume(&sample_volume());
    std::assert!(description.contains("Distinct labels: 4"));
    std::assert!(description.contains("    1: 8"));

    let methods = kit.list_compression_methods();
    std::assert_eq!(methods.len(), 3);
    std::assert!(methods.iter().any(|m| m == "Deflate"));

    fs::remove_dir_all(dir).unwrap();
}
