//! Region mask export utilities
//!
//! This module writes extracted region masks as 8-bit PNG images, one image
//! per z plane for 3-D regions. Region voxels are 255, everything else 0.

use image::{GrayImage, Luma};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::extractor::errors::{RegionError, RegionKitResult};
use crate::extractor::RegionResult;

/// Pixel value for region voxels
pub const MASK_FOREGROUND: u8 = 255;

/// Render one plane of a region mask
///
/// # Arguments
/// * `result` - A 2-D or 3-D region
/// * `plane` - Local index along the first axis for 3-D regions
///
/// # Returns
/// An image covering the region's bounding interval
pub fn mask_plane_image(result: &RegionResult, plane: u64) -> RegionKitResult<GrayImage> {
    let dims = result.mask().dimensions();
    let (depth, height, width) = match dims.len() {
        2 => (1, dims[0], dims[1]),
        3 => (dims[0], dims[1], dims[2]),
        n => {
            return Err(RegionError::Configuration(format!(
                "Only 2-D and 3-D masks can be exported as images, not {}-D",
                n
            )))
        }
    };
    if plane >= depth {
        return Err(RegionError::Configuration(format!("Mask plane {} is outside 0..{}", plane, depth)));
    }

    let to_u32 = |v: u64| {
        u32::try_from(v).map_err(|_| RegionError::Configuration("Mask plane is too large for an image".to_string()))
    };
    let mut image = GrayImage::new(to_u32(width)?, to_u32(height)?);
    let offset = plane * height * width;
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let index = offset + y as u64 * width + x as u64;
        if result.mask().get(index) {
            *pixel = Luma([MASK_FOREGROUND]);
        }
    }
    Ok(image)
}

/// Save a region mask as PNG images in `dir`
///
/// A 2-D region produces `<prefix>.png`; a 3-D region produces one
/// `<prefix>_z<index>.png` per plane of its bounding interval, named by the
/// plane's volume coordinate.
///
/// # Returns
/// The written paths
pub fn save_mask_pngs(result: &RegionResult, dir: &Path, prefix: &str) -> RegionKitResult<Vec<PathBuf>> {
    if result.is_empty() {
        warn!("Region is empty, no mask images written");
        return Ok(Vec::new());
    }

    fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    if result.num_dimensions() == 2 {
        let path = dir.join(format!("{}.png", prefix));
        mask_plane_image(result, 0)?.save(&path)?;
        written.push(path);
    } else {
        let z0 = result.bounding_interval().min().first().copied().unwrap_or(0);
        for plane in 0..result.bounding_interval().dimension(0) {
            let path = dir.join(format!("{}_z{:05}.png", prefix, z0 + plane as i64));
            mask_plane_image(result, plane)?.save(&path)?;
            written.push(path);
        }
    }

    info!("Wrote {} mask image(s) to {}", written.len(), dir.display());
    Ok(written)
}

/// Ensure a file path has PNG extension for transparency support
///
/// If the file doesn't already have a PNG extension, this function
/// creates a new path with the .png extension.
///
/// # Arguments
/// * `file_path` - The original file path
///
/// # Returns
/// A path with .png extension
pub fn ensure_png_extension(file_path: &str) -> String {
    let path = Path::new(file_path);

    // If it's already a PNG, return as is
    if let Some(ext) = path.extension() {
        if ext.to_string_lossy().to_lowercase() == "png" {
            return file_path.to_string();
        }
    }

    let stem = path.file_stem().unwrap_or_default();
    let parent = path.parent().unwrap_or_else(|| Path::new(""));

    let new_path = parent.join(format!("{}.png", stem.to_string_lossy()));
    new_path.to_string_lossy().to_string()
}
