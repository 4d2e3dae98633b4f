use std::path::{Path, PathBuf};
use log::{debug, info};

use crate::config::RegionKitConfig;
use crate::compression::CompressionFactory;
use crate::extractor::errors::{RegionError, RegionKitResult};
use crate::extractor::{NeighborhoodShape, RegionExtractor, RegionResult};
use crate::io::{ByteOrder, RegionFileReader, RegionFileWriter};
use crate::labels::LabelColorizer;
use crate::utils::logger::Logger;
use crate::utils::mask_utils;
use crate::volume::{ArrayVolume, LabelVolume, VolumeLoader};

/// Main interface to the RegionKit library
pub struct RegionKit {
    logger: Logger,
    config: RegionKitConfig,
}

impl RegionKit {
    /// Create a new RegionKit instance with default settings
    ///
    /// # Arguments
    /// * `log_file` - Optional path to log file, defaults to "regionkit.log"
    ///
    /// # Returns
    /// A RegionKit instance or an error if initialization fails
    pub fn new(log_file: Option<&str>) -> RegionKitResult<Self> {
        Self::with_config(RegionKitConfig::default(), log_file)
    }

    /// Create a RegionKit instance with explicit settings
    pub fn with_config(config: RegionKitConfig, log_file: Option<&str>) -> RegionKitResult<Self> {
        let log_path = log_file.unwrap_or(&config.logging.file);
        let logger = Logger::with_level(log_path, config.logging.level, false)?;
        Ok(RegionKit { logger, config })
    }

    pub fn config(&self) -> &RegionKitConfig {
        &self.config
    }

    /// Load a label volume from an `.lvol` file, an image or a directory of images
    pub fn load_volume<P: AsRef<Path>>(&self, path: P) -> RegionKitResult<ArrayVolume> {
        VolumeLoader::load(path)
    }

    /// Extract the region under `seed` using the configured shape and budget
    ///
    /// # Arguments
    /// * `volume` - Label volume
    /// * `seed` - Seed voxel, one coordinate per axis
    ///
    /// # Returns
    /// The region, or `OutOfBounds` if the seed lies outside the volume
    pub fn extract<V: LabelVolume + ?Sized>(&self, volume: &V, seed: &[i64]) -> RegionKitResult<RegionResult> {
        let shape = self.config.extraction.shape_for(volume.num_dimensions())?;
        self.extract_with(volume, seed, shape, self.config.extraction.max_region_size)
    }

    /// Extract the region under `seed` with an explicit shape and budget
    pub fn extract_with<V: LabelVolume + ?Sized>(
        &self,
        volume: &V,
        seed: &[i64],
        shape: NeighborhoodShape,
        max_region_size: u64,
    ) -> RegionKitResult<RegionResult> {
        let extractor = RegionExtractor::with_options(
            volume,
            shape,
            max_region_size,
            self.config.extraction.extractor_options(),
        )?;
        let result = extractor.run(seed)?;
        self.logger.log_region_summary(&result)?;
        Ok(result)
    }

    /// Like [`RegionKit::extract`], but a seed outside the volume yields `None`
    ///
    /// Suited to interactive picking, where a click may land outside any data.
    pub fn extract_or_none<V: LabelVolume + ?Sized>(
        &self,
        volume: &V,
        seed: &[i64],
    ) -> RegionKitResult<Option<RegionResult>> {
        match self.extract(volume, seed) {
            Ok(result) => Ok(Some(result)),
            Err(RegionError::OutOfBounds { seed, interval }) => {
                debug!("Seed {:?} outside {}, no region", seed, interval);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Save a region to a region file
    ///
    /// # Arguments
    /// * `result` - Region to save
    /// * `output_path` - Destination file
    /// * `compression` - Payload compression ("none", "deflate", "zstd")
    pub fn save_region<P: AsRef<Path>>(&self, result: &RegionResult, output_path: P, compression: &str) -> RegionKitResult<()> {
        let writer = RegionFileWriter::with_compression_name(ByteOrder::native(), compression)?;
        writer.save(output_path, result)
    }

    /// Load a region file
    pub fn load_region<P: AsRef<Path>>(&self, path: P) -> RegionKitResult<RegionResult> {
        RegionFileReader::load(path)
    }

    /// Save a region mask as PNG images
    pub fn save_mask_images<P: AsRef<Path>>(&self, result: &RegionResult, dir: P) -> RegionKitResult<Vec<PathBuf>> {
        mask_utils::save_mask_pngs(result, dir.as_ref(), &format!("label{}", result.label()))
    }

    /// Render a plane of `volume` with the configured palette
    ///
    /// # Arguments
    /// * `volume` - 2-D or 3-D label volume
    /// * `slice` - Plane along the first axis of a 3-D volume
    /// * `output_path` - PNG file to write
    pub fn colorize<P: AsRef<Path>>(&self, volume: &dyn LabelVolume, slice: Option<i64>, output_path: P) -> RegionKitResult<()> {
        let colorizer = LabelColorizer::new(self.config.labels.palette, self.config.labels.seed);
        let image = colorizer.colorize_slice(volume, slice)?;
        image.save(output_path.as_ref())?;
        info!("Colorized plane written to {}", output_path.as_ref().display());
        Ok(())
    }

    /// Summarize a label volume
    ///
    /// # Returns
    /// A multi-line description of the volume's extent and labels
    pub fn describe_volume(&self, volume: &ArrayVolume) -> String {
        let interval = volume.interval();
        let counts = volume.label_counts();

        let mut result = "Label Volume:\n".to_string();
        result.push_str(&format!("  Extent: {}\n", interval));
        result.push_str(&format!("  Voxels: {}\n", interval.num_elements().unwrap_or(0)));
        result.push_str(&format!("  Distinct labels: {}\n", counts.len()));
        for (label, count) in counts {
            result.push_str(&format!("    {}: {}\n", label, count));
        }
        result
    }

    /// List available compression methods
    ///
    /// # Returns
    /// Vector of compression method names
    pub fn list_compression_methods(&self) -> Vec<String> {
        CompressionFactory::get_available_handlers()
            .iter()
            .map(|h| h.name().to_string())
            .collect()
    }
}
