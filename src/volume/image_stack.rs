//! Label volumes from grayscale images
//!
//! A single 8- or 16-bit grayscale image becomes a 2-D volume indexed
//! `[y, x]`; a stack of equally sized images becomes a 3-D volume indexed
//! `[z, y, x]`, one image per z plane in the order given. Pixel values are
//! taken as labels without rescaling.

use image::DynamicImage;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

use crate::extractor::errors::{RegionError, RegionKitResult};
use super::array_volume::ArrayVolume;

/// Extensions recognised as label images
pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "tif", "tiff", "pgm", "bmp", "webp"];

/// Whether `path` has one of the recognised image extensions
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Extracts raw labels from a single-channel image
///
/// # Returns
/// `(width, height, labels)` with labels in row-major order, or an error for
/// colour images
pub fn image_labels(image: &DynamicImage) -> RegionKitResult<(u32, u32, Vec<u64>)> {
    match image {
        DynamicImage::ImageLuma8(buffer) => Ok((
            buffer.width(),
            buffer.height(),
            buffer.as_raw().iter().map(|&v| v as u64).collect(),
        )),
        DynamicImage::ImageLuma16(buffer) => Ok((
            buffer.width(),
            buffer.height(),
            buffer.as_raw().iter().map(|&v| v as u64).collect(),
        )),
        other => Err(RegionError::ImageError(format!(
            "Label images must be 8- or 16-bit grayscale, found {:?}",
            other.color()
        ))),
    }
}

/// Loads one image as a 2-D volume
pub fn load_image<P: AsRef<Path>>(path: P) -> RegionKitResult<ArrayVolume> {
    let path = path.as_ref();
    info!("Loading label image: {}", path.display());
    let image = image::open(path)?;
    let (width, height, labels) = image_labels(&image)?;
    ArrayVolume::from_dimensions(&[height as usize, width as usize], labels)
}

/// Loads a stack of images as a 3-D volume
///
/// # Arguments
/// * `paths` - One image per z plane, in plane order
///
/// # Returns
/// The volume, or an error if the stack is empty or the images differ in size
pub fn load_stack<P: AsRef<Path>>(paths: &[P]) -> RegionKitResult<ArrayVolume> {
    if paths.is_empty() {
        return Err(RegionError::Configuration("Image stack is empty".to_string()));
    }

    info!("Loading label stack of {} images", paths.len());
    let mut plane_size: Option<(u32, u32)> = None;
    let mut labels = Vec::new();

    for path in paths {
        let path = path.as_ref();
        let image = image::open(path)?;
        let (width, height, plane) = image_labels(&image)?;

        match plane_size {
            None => plane_size = Some((width, height)),
            Some(size) if size != (width, height) => {
                return Err(RegionError::ImageError(format!(
                    "{} is {}x{} but the stack is {}x{}",
                    path.display(),
                    width,
                    height,
                    size.0,
                    size.1
                )));
            }
            Some(_) => {}
        }

        debug!("Plane {} from {}", labels.len() / plane.len().max(1), path.display());
        labels.extend(plane);
    }

    let (width, height) = plane_size.unwrap_or((0, 0));
    ArrayVolume::from_dimensions(&[paths.len(), height as usize, width as usize], labels)
}

/// Lists the images in `dir` sorted by file name
pub fn list_stack_dir<P: AsRef<Path>>(dir: P) -> RegionKitResult<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        if path.is_file() && is_image_path(&path) {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::LabelVolume;
    use image::{GrayImage, ImageBuffer, Luma, RgbImage};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("regionkit_image_stack_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_single_image_is_row_major() {
        let dir = scratch_dir("single");
        let path = dir.join("labels.png");
        GrayImage::from_raw(3, 2, vec![0, 1, 2, 3, 4, 5]).unwrap().save(&path).unwrap();

        let volume = load_image(&path).unwrap();

        assert_eq!(volume.interval().dimensions(), vec![2, 3]);
        assert_eq!(volume.label_at(&[1, 0]), 3);
        assert_eq!(volume.label_at(&[0, 2]), 2);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_sixteen_bit_labels_are_not_rescaled() {
        let image: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::from_raw(2, 1, vec![300, 65535]).unwrap();
        let (width, height, labels) = image_labels(&DynamicImage::ImageLuma16(image)).unwrap();

        assert_eq!((width, height), (2, 1));
        assert_eq!(labels, vec![300, 65535]);
    }

    #[test]
    fn test_stack_from_directory() {
        let dir = scratch_dir("stack");
        GrayImage::from_raw(2, 2, vec![1, 1, 0, 0]).unwrap().save(dir.join("z01.png")).unwrap();
        GrayImage::from_raw(2, 2, vec![0, 0, 7, 7]).unwrap().save(dir.join("z00.png")).unwrap();
        fs::write(dir.join("notes.txt"), "not an image").unwrap();

        let paths = list_stack_dir(&dir).unwrap();
        assert_eq!(paths.len(), 2);
        let volume = load_stack(&paths).unwrap();

        assert_eq!(volume.interval().dimensions(), vec![2, 2, 2]);
        assert_eq!(volume.label_at(&[0, 1, 0]), 7);
        assert_eq!(volume.label_at(&[1, 0, 1]), 1);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_stack_size_mismatch() {
        let dir = scratch_dir("mismatch");
        GrayImage::new(2, 2).save(dir.join("a.png")).unwrap();
        GrayImage::new(3, 2).save(dir.join("b.png")).unwrap();

        let paths = list_stack_dir(&dir).unwrap();
        assert!(matches!(load_stack(&paths), Err(RegionError::ImageError(_))));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_colour_images_are_rejected() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(1, 1));
        assert!(image_labels(&image).is_err());
    }
}
