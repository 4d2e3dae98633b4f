//! Region extraction command
//!
//! This module implements the command for extracting the connected region
//! under a seed voxel, saving it as a region file and as mask images.

use clap::ArgMatches;
use log::{debug, info, warn};
use std::path::Path;

use crate::commands::command_traits::Command;
use crate::compression::CompressionFactory;
use crate::config::{ExtractionConfig, RegionKitConfig};
use crate::extractor::errors::{RegionError, RegionKitResult};
use crate::extractor::{RegionExtractor, RegionResult, VisitedPolicy};
use crate::io::{ByteOrder, RegionFileWriter};
use crate::utils::arg_utils;
use crate::utils::logger::Logger;
use crate::utils::mask_utils;
use crate::utils::progress::ProgressTracker;
use crate::volume::{ArrayVolume, LabelVolume, VolumeLoader};

/// Command for extracting one region from a label volume
pub struct ExtractCommand<'a> {
    /// Path to the input volume
    input_file: String,
    /// Seed voxel
    seed: Vec<i64>,
    /// Extraction settings after command-line overrides
    extraction: ExtractionConfig,
    /// Region file to write (optional)
    output_file: Option<String>,
    /// Directory for mask PNGs (optional)
    mask_dir: Option<String>,
    /// Compression method name for the region file
    compression: String,
    /// Whether to show a progress spinner
    show_progress: bool,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> ExtractCommand<'a> {
    /// Create a new extract command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `config` - Configured defaults
    /// * `logger` - Logger for recording operations
    ///
    /// # Returns
    /// A new ExtractCommand instance or an error
    pub fn new(args: &ArgMatches, config: &RegionKitConfig, logger: &'a Logger) -> RegionKitResult<Self> {
        let input_file = args.get_one::<String>("input")
            .ok_or_else(|| RegionError::GenericError("Missing input file".to_string()))?
            .clone();

        let seed_str = args.get_one::<String>("seed")
            .ok_or_else(|| RegionError::GenericError("Missing seed coordinate".to_string()))?;
        let seed = arg_utils::parse_coordinate(seed_str)?;
        info!("Seed: {:?}", seed);

        let extraction = extraction_settings(args, config)?;

        let compression = args.get_one::<String>("compression")
            .cloned()
            .unwrap_or_else(|| "deflate".to_string());
        // fail before any work is done
        CompressionFactory::get_handler_by_name(&compression)?;

        Ok(ExtractCommand {
            input_file,
            seed,
            extraction,
            output_file: args.get_one::<String>("output").cloned(),
            mask_dir: args.get_one::<String>("mask-png").cloned(),
            compression,
            show_progress: !args.get_flag("quiet"),
            logger,
        })
    }

    /// Run the extraction against an already loaded volume
    fn extract(&self, volume: &ArrayVolume) -> RegionKitResult<RegionResult> {
        let shape = self.extraction.shape_for(volume.num_dimensions())?;
        let extractor = RegionExtractor::with_options(
            volume,
            shape,
            self.extraction.max_region_size,
            self.extraction.extractor_options(),
        )?;

        let tracker = if self.show_progress {
            ProgressTracker::spinner("flood fill")
        } else {
            ProgressTracker::hidden()
        };

        let result = extractor.run_monitored(&self.seed, &tracker);
        tracker.finish();
        result
    }

    /// Persist the result as requested
    fn write_outputs(&self, result: &RegionResult) -> RegionKitResult<()> {
        if let Some(output) = &self.output_file {
            let writer = RegionFileWriter::with_compression_name(ByteOrder::native(), &self.compression)?;
            writer.save(output, result)?;
            info!("Region written to {} ({})", output, writer.compression_name());
        }

        if let Some(dir) = &self.mask_dir {
            let stem = Path::new(&self.input_file)
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "region".to_string());
            let prefix = format!("{}_label{}", stem, result.label());
            mask_utils::save_mask_pngs(result, Path::new(dir), &prefix)?;
        }

        Ok(())
    }
}

impl<'a> Command for ExtractCommand<'a> {
    fn execute(&self) -> RegionKitResult<()> {
        let volume = VolumeLoader::load(&self.input_file)?;
        debug!("Loaded volume over {}", volume.interval());

        let result = match self.extract(&volume) {
            Ok(result) => result,
            Err(RegionError::OutOfBounds { seed, interval }) => {
                warn!("Seed {:?} is outside the volume {}; nothing extracted", seed, interval);
                return Err(RegionError::OutOfBounds { seed, interval });
            }
            Err(e) => return Err(e),
        };

        self.logger.log_region_summary(&result)?;
        if result.is_empty() {
            warn!("Seed {:?} is background (label 0); the region is empty", self.seed);
        } else {
            info!("Extracted {}", result);
        }
        if result.capped_at_max_size() {
            warn!(
                "Region reached the size limit of {} voxels and was cut short",
                self.extraction.max_region_size
            );
        }

        self.write_outputs(&result)
    }
}

/// Extraction settings from the config file with command-line overrides
pub(crate) fn extraction_settings(args: &ArgMatches, config: &RegionKitConfig) -> RegionKitResult<ExtractionConfig> {
    let mut extraction = config.extraction.clone();

    if let Some(shape) = args.get_one::<String>("shape") {
        // validated now, resolved against the volume later
        crate::extractor::NeighborhoodShape::parse(shape, 1)?;
        extraction.shape = shape.clone();
    }

    if let Some(max) = args.get_one::<String>("max-size") {
        let max = max.trim().replace('_', "").parse::<u64>()
            .map_err(|_| RegionError::Configuration(format!("Invalid maximum region size: {}", max)))?;
        if max == 0 {
            return Err(RegionError::Configuration("Maximum region size must be positive".to_string()));
        }
        extraction.max_region_size = max;
    }

    if let Some(policy) = args.get_one::<String>("visited") {
        extraction.visited_policy = policy.parse::<VisitedPolicy>()?;
    }

    info!(
        "Extraction settings: shape {}, max size {}, visited set {}",
        extraction.shape, extraction.max_region_size, extraction.visited_policy
    );
    Ok(extraction)
}
