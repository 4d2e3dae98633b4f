//! Label slice colorization
//!
//! Renders one 2-D plane of a label volume into an RGBA image using a label
//! palette, optionally restricted to a selection of labels and with an
//! extracted region painted on top.

use image::{Rgba, RgbaImage};
use log::debug;
use std::collections::HashSet;

use crate::extractor::errors::{RegionError, RegionKitResult};
use crate::extractor::RegionResult;
use crate::volume::LabelVolume;
use super::lut::{color_for_label, LabelColor, Palette, DEFAULT_LUT_SEED};

/// Maps labels to colors and renders label planes
#[derive(Debug, Clone)]
pub struct LabelColorizer {
    palette: Palette,
    seed: u64,
    selection: HashSet<u64>,
}

impl Default for LabelColorizer {
    fn default() -> Self {
        LabelColorizer::new(Palette::default(), DEFAULT_LUT_SEED)
    }
}

impl LabelColorizer {
    pub fn new(palette: Palette, seed: u64) -> Self {
        LabelColorizer {
            palette,
            seed,
            selection: HashSet::new(),
        }
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Restrict coloring to the given labels
    pub fn select<I: IntoIterator<Item = u64>>(&mut self, labels: I) {
        self.selection.extend(labels);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selection(&self) -> &HashSet<u64> {
        &self.selection
    }

    /// Color for `label`, transparent if a selection exists and excludes it
    pub fn color(&self, label: u64) -> LabelColor {
        if !self.selection.is_empty() && !self.selection.contains(&label) {
            return LabelColor::TRANSPARENT;
        }
        color_for_label(label, self.seed, self.palette)
    }

    /// Renders one plane of a 2-D or 3-D volume
    ///
    /// # Arguments
    /// * `volume` - Volume to render
    /// * `slice` - Index along the first axis for 3-D volumes; ignored for 2-D
    ///
    /// # Returns
    /// An image whose x axis is the volume's last axis
    pub fn colorize_slice(&self, volume: &dyn LabelVolume, slice: Option<i64>) -> RegionKitResult<RgbaImage> {
        let plane = PlaneSelector::new(volume.interval().min(), volume.interval().max(), slice)?;
        let (width, height) = plane.size()?;
        debug!("Colorizing {}x{} plane with the {} palette", width, height, self.palette);

        let mut image = RgbaImage::new(width, height);
        let mut position = plane.origin();
        for y in 0..height {
            for x in 0..width {
                plane.locate(&mut position, x, y);
                let color = self.color(volume.label_at(&position));
                image.put_pixel(x, y, Rgba(color.to_rgba()));
            }
        }
        Ok(image)
    }

    /// Paints the voxels of `region` lying in the rendered plane
    ///
    /// `volume_min` is the lower corner of the volume the image was rendered
    /// from, so image pixel (0, 0) maps to it.
    pub fn highlight_region(
        &self,
        image: &mut RgbaImage,
        volume_min: &[i64],
        region: &RegionResult,
        slice: Option<i64>,
    ) -> RegionKitResult<u64> {
        if region.num_dimensions() != volume_min.len() {
            return Err(RegionError::Configuration(format!(
                "Region is {}-dimensional but the image was rendered from a {}-dimensional volume",
                region.num_dimensions(),
                volume_min.len()
            )));
        }

        let n = volume_min.len();
        if !(2..=3).contains(&n) {
            return Err(RegionError::Configuration(format!(
                "Only 2-D and 3-D regions can be highlighted, not {}-D",
                n
            )));
        }

        let mut painted = 0;
        for voxel in region.voxels() {
            if n == 3 && Some(voxel[0]) != slice {
                continue;
            }
            let x = voxel[n - 1] - volume_min[n - 1];
            let y = voxel[n - 2] - volume_min[n - 2];
            if let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) {
                if x < image.width() && y < image.height() {
                    image.put_pixel(x, y, Rgba(LabelColor::SELECTION.to_rgba()));
                    painted += 1;
                }
            }
        }
        Ok(painted)
    }
}

/// Maps image pixels to volume coordinates for one plane
struct PlaneSelector<'a> {
    min: &'a [i64],
    max: &'a [i64],
    slice: Option<i64>,
}

impl<'a> PlaneSelector<'a> {
    fn new(min: &'a [i64], max: &'a [i64], slice: Option<i64>) -> RegionKitResult<Self> {
        match min.len() {
            2 => Ok(PlaneSelector { min, max, slice: None }),
            3 => {
                let z = slice.unwrap_or(min[0]);
                if z < min[0] || z > max[0] {
                    return Err(RegionError::Configuration(format!(
                        "Slice {} is outside {}..={}",
                        z, min[0], max[0]
                    )));
                }
                Ok(PlaneSelector { min, max, slice: Some(z) })
            }
            n => Err(RegionError::Configuration(format!(
                "Only 2-D and 3-D volumes can be colorized, not {}-D",
                n
            ))),
        }
    }

    fn size(&self) -> RegionKitResult<(u32, u32)> {
        let n = self.min.len();
        let extent = |d: usize| {
            u32::try_from((self.max[d] as i128 - self.min[d] as i128 + 1).max(0))
                .map_err(|_| RegionError::Configuration("Plane is too large to render".to_string()))
        };
        Ok((extent(n - 1)?, extent(n - 2)?))
    }

    fn origin(&self) -> Vec<i64> {
        let mut position = self.min.to_vec();
        if let Some(z) = self.slice {
            position[0] = z;
        }
        position
    }

    fn locate(&self, position: &mut [i64], x: u32, y: u32) {
        let n = self.min.len();
        position[n - 1] = self.min[n - 1] + x as i64;
        position[n - 2] = self.min[n - 2] + y as i64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::{NeighborhoodShape, RegionExtractor};
    use crate::volume::ArrayVolume;

    #[test]
    fn test_background_and_selection() {
        let volume = ArrayVolume::from_rows(&[vec![0, 1], vec![2, 2]]).unwrap();
        let mut colorizer = LabelColorizer::new(Palette::GoldenAngle, 7);

        let image = colorizer.colorize_slice(&volume, None).unwrap();
        assert_eq!(image.dimensions(), (2, 2));
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 0]);
        assert_eq!(image.get_pixel(1, 0).0, color_for_label(1, 7, Palette::GoldenAngle).to_rgba());
        assert_eq!(image.get_pixel(0, 1), image.get_pixel(1, 1));

        colorizer.select([2]);
        let image = colorizer.colorize_slice(&volume, None).unwrap();
        assert_eq!(image.get_pixel(1, 0).0, [0, 0, 0, 0]);
        assert_eq!(image.get_pixel(0, 1).0[3], 255);
    }

    #[test]
    fn test_slice_of_three_dimensional_volume() {
        let mut volume = ArrayVolume::filled(&[3, 2, 4], 0).unwrap();
        volume.set(&[1, 1, 3], 9).unwrap();
        let colorizer = LabelColorizer::default();

        let image = colorizer.colorize_slice(&volume, Some(1)).unwrap();
        assert_eq!(image.dimensions(), (4, 2));
        assert_eq!(image.get_pixel(3, 1).0, colorizer.color(9).to_rgba());

        let other = colorizer.colorize_slice(&volume, Some(0)).unwrap();
        assert_eq!(other.get_pixel(3, 1).0, [0, 0, 0, 0]);

        assert!(colorizer.colorize_slice(&volume, Some(3)).is_err());
    }

    #[test]
    fn test_highlight_region() {
        let volume = ArrayVolume::from_rows(&[vec![5, 5, 0], vec![0, 5, 6]]).unwrap();
        let colorizer = LabelColorizer::default();
        let region = RegionExtractor::new(&volume, NeighborhoodShape::diamond(2, 1), 10)
            .unwrap()
            .run(&[0, 0])
            .unwrap();

        let mut image = colorizer.colorize_slice(&volume, None).unwrap();
        let painted = colorizer
            .highlight_region(&mut image, volume.interval().min(), &region, None)
            .unwrap();

        assert_eq!(painted, 3);
        assert_eq!(image.get_pixel(1, 1).0, LabelColor::SELECTION.to_rgba());
        assert_ne!(image.get_pixel(2, 1).0, LabelColor::SELECTION.to_rgba());
    }

    #[test]
    fn test_unsupported_dimensionality() {
        let volume = ArrayVolume::filled(&[4], 1).unwrap();
        assert!(LabelColorizer::default().colorize_slice(&volume, None).is_err());
    }

    #[test]
    fn test_highlight_rejects_unsupported_dimensionality() {
        let volume = ArrayVolume::filled(&[4], 1).unwrap();
        let region = RegionExtractor::new(&volume, NeighborhoodShape::diamond(1, 1), 10)
            .unwrap()
            .run(&[0])
            .unwrap();
        let mut image = RgbaImage::new(4, 1);

        let result = LabelColorizer::default().highlight_region(&mut image, volume.interval().min(), &region, None);
        assert!(matches!(result, Err(RegionError::Configuration(_))));
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 0]);
    }
}
