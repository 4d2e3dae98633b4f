//! Volume and region file description command
//!
//! This module implements the command that reports the structure of a label
//! volume (extent, label statistics) or of a saved region file.

use clap::ArgMatches;
use log::info;
use std::path::Path;

use crate::commands::command_traits::Command;
use crate::compression::CompressionFactory;
use crate::extractor::errors::{RegionError, RegionKitResult};
use crate::io::region_file::REGION_EXTENSION;
use crate::io::RegionFileReader;
use crate::utils::logger::Logger;
use crate::volume::{ArrayVolume, LabelVolume, VolumeLoader};

/// Number of labels listed when not verbose
const SUMMARY_LABEL_COUNT: usize = 10;

/// Command for describing volumes and region files
pub struct InfoCommand<'a> {
    /// Path to the input file
    input_file: String,
    /// Whether to list every label
    verbose: bool,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> InfoCommand<'a> {
    /// Create a new info command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording operations
    ///
    /// # Returns
    /// A new InfoCommand instance or an error
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> RegionKitResult<Self> {
        let input_file = args.get_one::<String>("input")
            .ok_or_else(|| RegionError::GenericError("Missing input file".to_string()))?
            .clone();

        Ok(InfoCommand {
            input_file,
            verbose: args.get_flag("verbose"),
            logger,
        })
    }

    fn is_region_file(&self) -> bool {
        Path::new(&self.input_file)
            .extension()
            .map(|e| e.to_string_lossy().eq_ignore_ascii_case(REGION_EXTENSION))
            .unwrap_or(false)
    }

    /// Describe a saved region
    fn describe_region(&self) -> RegionKitResult<()> {
        let header = RegionFileReader::load_header(&self.input_file)?;
        let compression = CompressionFactory::create_handler(header.compression)?;

        info!("Region file: {}", self.input_file);
        info!("  Byte order: {}", header.byte_order.name());
        info!("  Version: {}", header.version);
        info!("  Compression: {} ({})", header.compression, compression.name());
        info!("  Payload: {} bytes", header.payload_len);

        let result = RegionFileReader::load(&self.input_file)?;
        info!("  {}", result);
        self.logger.log_region_summary(&result)?;
        Ok(())
    }

    /// Describe a label volume
    fn describe_volume(&self, volume: &ArrayVolume) -> RegionKitResult<()> {
        let interval = volume.interval();
        let counts = volume.label_counts();
        let foreground: u64 = counts.values().sum();
        let total = interval.num_elements().unwrap_or(0);

        info!("Label volume: {}", self.input_file);
        info!("  Dimensions: {}", interval.num_dimensions());
        info!("  Extent: {}", interval);
        info!("  Size: {:?}", interval.dimensions());
        info!("  Voxels: {} ({} labeled, {} background)", total, foreground, total - foreground);
        info!("  Distinct labels: {}", counts.len());

        let mut by_size: Vec<(u64, u64)> = counts.into_iter().collect();
        by_size.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        let shown = if self.verbose { by_size.len() } else { by_size.len().min(SUMMARY_LABEL_COUNT) };

        for (label, count) in &by_size[..shown] {
            let line = format!("    label {}: {} voxels", label, count);
            info!("{}", line);
            self.logger.log(&line)?;
        }
        if shown < by_size.len() {
            info!("    ... {} more (use --verbose to list all)", by_size.len() - shown);
        }

        Ok(())
    }
}

impl<'a> Command for InfoCommand<'a> {
    fn execute(&self) -> RegionKitResult<()> {
        if self.is_region_file() {
            self.describe_region()
        } else {
            let volume = VolumeLoader::load(&self.input_file)?;
            self.describe_volume(&volume)
        }
    }
}
