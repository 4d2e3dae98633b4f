//! CLI command implementations
//!
//! `--info` describes a volume or region file, `--colorize` renders a label
//! plane, and `--seed` extracts a region.

pub mod command_traits;
pub mod cli;
pub mod extract_command;
pub mod info_command;
pub mod colorize_command;

pub use command_traits::{Command, CommandFactory};
pub use cli::build_cli;
pub use extract_command::ExtractCommand;
pub use info_command::InfoCommand;
pub use colorize_command::ColorizeCommand;

use clap::ArgMatches;
use crate::config::RegionKitConfig;
use crate::extractor::errors::RegionKitResult;
use crate::utils::logger::Logger;

/// Picks the command for the parsed CLI arguments
#[derive(Default)]
pub struct RegionkitCommandFactory;

impl RegionkitCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        RegionkitCommandFactory
    }
}

impl<'a> CommandFactory<'a> for RegionkitCommandFactory {
    fn create_command(
        &self,
        args: &ArgMatches,
        config: &RegionKitConfig,
        logger: &'a Logger,
    ) -> RegionKitResult<Box<dyn Command + 'a>> {
        if args.get_flag("info") {
            Ok(Box::new(InfoCommand::new(args, logger)?))
        } else if args.contains_id("colorize") {
            Ok(Box::new(ColorizeCommand::new(args, config, logger)?))
        } else if args.contains_id("seed") {
            Ok(Box::new(ExtractCommand::new(args, config, logger)?))
        } else {
            // Without a seed there is nothing to extract; describe the input
            Ok(Box::new(InfoCommand::new(args, logger)?))
        }
    }
}
