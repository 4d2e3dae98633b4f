//! Logger utility for application-wide logging
//!
//! This module provides a custom logger implementation that works alongside
//! the standard log crate, but adds file output capabilities.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use log::{Log, Record, Metadata, LevelFilter};

use crate::extractor::RegionResult;

/// Custom logger implementation
pub struct Logger {
    /// File handle for log output
    file: Mutex<Option<File>>,
    /// Most verbose level written
    level: LevelFilter,
    /// Whether records are also printed to the console
    echo: bool,
}

impl Logger {
    /// Creates a new logger instance
    ///
    /// # Arguments
    ///
    /// * `log_file` - Path to the log file
    ///
    /// # Returns
    ///
    /// A new Logger instance or an error if the file cannot be created
    pub fn new(log_file: &str) -> io::Result<Self> {
        Self::with_level(log_file, LevelFilter::Debug, true)
    }

    /// Creates a logger with an explicit level and console mirroring
    pub fn with_level(log_file: &str, level: LevelFilter, echo: bool) -> io::Result<Self> {
        let file = File::create(Path::new(log_file))?;
        Ok(Logger {
            file: Mutex::new(Some(file)),
            level,
            echo,
        })
    }

    /// Logger that writes nowhere; used when no log file can be opened
    pub fn disabled() -> Self {
        Logger {
            file: Mutex::new(None),
            level: LevelFilter::Off,
            echo: false,
        }
    }

    /// Logs a message to the log file
    ///
    /// # Arguments
    ///
    /// * `message` - The message to log
    pub fn log(&self, message: &str) -> io::Result<()> {
        let mut guard = self
            .file
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;
        if let Some(file) = guard.as_mut() {
            writeln!(file, "{}", message)?;
            file.flush()?;
        }
        Ok(())
    }

    /// Logs an extraction result in a formatted way
    ///
    /// # Arguments
    ///
    /// * `result` - The region to describe
    pub fn log_region_summary(&self, result: &RegionResult) -> io::Result<()> {
        self.log("Region:")?;
        self.log(&format!("  Seed: {:?}", result.seed()))?;
        self.log(&format!("  Label: {}", result.label()))?;
        self.log(&format!("  Voxels: {}", result.region_size()))?;
        self.log(&format!("  Bounding interval: {}", result.bounding_interval()))?;
        self.log(&format!("  Capped at max size: {}", result.capped_at_max_size()))?;
        Ok(())
    }

    /// Static method to initialize the global logger
    pub fn init_global_logger(log_file: &str) -> io::Result<()> {
        Self::init_global_logger_with_level(log_file, LevelFilter::Debug, true)
    }

    /// Initialize the global logger with an explicit level
    pub fn init_global_logger_with_level(log_file: &str, level: LevelFilter, echo: bool) -> io::Result<()> {
        let global_logger = Logger::with_level(log_file, level, echo)?;

        // Only called once at startup
        if log::set_boxed_logger(Box::new(global_logger)).is_err() {
            eprintln!("Warning: Global logger was already initialized");
        }

        log::set_max_level(level);
        Ok(())
    }
}

// Implement the Log trait to make our Logger work with the log crate
impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let message = format!("[{}] {}", record.level(), record.args());
            let _ = self.log(&message);

            if self.echo {
                println!("{}", message);
            }
        }
    }

    fn flush(&self) {
        // Already flushing in the log method
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::{NeighborhoodShape, RegionExtractor};
    use crate::volume::ArrayVolume;
    use log::Level;

    #[test]
    fn test_region_summary_written_to_file() {
        let path = std::env::temp_dir().join(format!("regionkit_logger_{}.log", std::process::id()));
        let logger = Logger::with_level(path.to_str().unwrap(), LevelFilter::Info, false).unwrap();

        let volume = ArrayVolume::filled(&[2, 2], 3).unwrap();
        let result = RegionExtractor::new(&volume, NeighborhoodShape::diamond(2, 1), 2)
            .unwrap()
            .run(&[0, 0])
            .unwrap();
        logger.log_region_summary(&result).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("Label: 3"));
        assert!(contents.contains("Voxels: 2"));
        assert!(contents.contains("Capped at max size: true"));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_level_filtering() {
        let logger = Logger::disabled();
        let metadata = Metadata::builder().level(Level::Error).build();
        assert!(!logger.enabled(&metadata));
        assert!(logger.log("ignored").is_ok());
    }
}
