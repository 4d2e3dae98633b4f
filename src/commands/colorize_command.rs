//! Label slice colorization command
//!
//! This module implements the command that renders one plane of a label
//! volume as a color PNG, optionally highlighting the region under a seed.

use clap::ArgMatches;
use log::{info, warn};

use crate::commands::command_traits::Command;
use crate::commands::extract_command::extraction_settings;
use crate::config::{ExtractionConfig, RegionKitConfig};
use crate::extractor::errors::{RegionError, RegionKitResult};
use crate::extractor::RegionExtractor;
use crate::labels::{LabelColorizer, Palette};
use crate::utils::arg_utils;
use crate::utils::logger::Logger;
use crate::utils::mask_utils::ensure_png_extension;
use crate::volume::{ArrayVolume, LabelVolume, VolumeLoader};

/// Command for rendering a label plane
pub struct ColorizeCommand<'a> {
    /// Path to the input volume
    input_file: String,
    /// Path of the PNG to write
    output_file: String,
    /// Plane along the first axis of a 3-D volume
    slice: Option<i64>,
    /// Label-to-color mapping
    colorizer: LabelColorizer,
    /// Seed whose region is highlighted (optional)
    seed: Option<Vec<i64>>,
    /// Extraction settings for the highlighted region
    extraction: ExtractionConfig,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> ColorizeCommand<'a> {
    /// Create a new colorize command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `config` - Configured defaults
    /// * `logger` - Logger for recording operations
    ///
    /// # Returns
    /// A new ColorizeCommand instance or an error
    pub fn new(args: &ArgMatches, config: &RegionKitConfig, logger: &'a Logger) -> RegionKitResult<Self> {
        let input_file = args.get_one::<String>("input")
            .ok_or_else(|| RegionError::GenericError("Missing input file".to_string()))?
            .clone();

        let output_file = args.get_one::<String>("colorize")
            .ok_or_else(|| RegionError::GenericError("Missing output image path".to_string()))?;
        let output_file = ensure_png_extension(output_file);

        let slice = match args.get_one::<String>("slice") {
            Some(s) => Some(s.trim().parse::<i64>()
                .map_err(|_| RegionError::Configuration(format!("Invalid slice index: {}", s)))?),
            None => None,
        };

        let palette = match args.get_one::<String>("palette") {
            Some(name) => name.parse::<Palette>()?,
            None => config.labels.palette,
        };
        let lut_seed = match args.get_one::<String>("lut-seed") {
            Some(s) => s.trim().parse::<u64>()
                .map_err(|_| RegionError::Configuration(format!("Invalid LUT seed: {}", s)))?,
            None => config.labels.seed,
        };
        let mut colorizer = LabelColorizer::new(palette, lut_seed);
        if let Some(selection) = args.get_one::<String>("select") {
            colorizer.select(arg_utils::parse_label_list(selection)?);
        }

        let seed = args.get_one::<String>("seed")
            .map(|s| arg_utils::parse_coordinate(s))
            .transpose()?;

        Ok(ColorizeCommand {
            input_file,
            output_file,
            slice,
            colorizer,
            seed,
            extraction: extraction_settings(args, config)?,
            logger,
        })
    }

    /// Paint the region under the seed, if any, onto the image
    fn highlight(&self, volume: &ArrayVolume, image: &mut image::RgbaImage) -> RegionKitResult<()> {
        let Some(seed) = &self.seed else {
            return Ok(());
        };

        let shape = self.extraction.shape_for(volume.num_dimensions())?;
        let extractor = RegionExtractor::with_options(
            volume,
            shape,
            self.extraction.max_region_size,
            self.extraction.extractor_options(),
        )?;
        let result = extractor.run(seed)?;
        self.logger.log_region_summary(&result)?;

        let slice = if volume.num_dimensions() == 3 {
            Some(self.slice.unwrap_or(volume.interval().min()[0]))
        } else {
            None
        };
        let painted = self.colorizer.highlight_region(image, volume.interval().min(), &result, slice)?;
        if painted == 0 && !result.is_empty() {
            warn!("The region under {:?} does not cross the rendered plane", seed);
        }
        info!("Highlighted {} pixels of {}", painted, result);
        Ok(())
    }
}

impl<'a> Command for ColorizeCommand<'a> {
    fn execute(&self) -> RegionKitResult<()> {
        let volume = VolumeLoader::load(&self.input_file)?;
        info!(
            "Colorizing {} with the {} palette (seed {})",
            self.input_file,
            self.colorizer.palette(),
            self.colorizer.seed()
        );

        let mut image = self.colorizer.colorize_slice(&volume, self.slice)?;
        self.highlight(&volume, &mut image)?;

        image.save(&self.output_file)?;
        info!("Wrote {}x{} image to {}", image.width(), image.height(), self.output_file);
        Ok(())
    }
}
