//! Command pattern interfaces
//!
//! Each CLI mode (extract, info, colorize) is a `Command` built by a
//! `CommandFactory` from the parsed arguments and the loaded configuration.

use crate::config::RegionKitConfig;
use crate::extractor::errors::RegionKitResult;
use crate::utils::logger::Logger;

/// Represents an executable command in the application
pub trait Command {
    /// Execute the command
    ///
    /// # Returns
    /// Result indicating success or an error
    fn execute(&self) -> RegionKitResult<()>;
}

/// Factory for creating commands from CLI arguments
pub trait CommandFactory<'a> {
    /// Create a new Command instance based on CLI arguments
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `config` - Settings from the configuration file, overridden by `args`
    /// * `logger` - Logger for recording operations
    ///
    /// # Returns
    /// A command that implements the Command trait, or an error
    fn create_command(
        &self,
        args: &clap::ArgMatches,
        config: &RegionKitConfig,
        logger: &'a Logger,
    ) -> RegionKitResult<Box<dyn Command + 'a>>;
}
