//! Custom error types for region extraction

use std::fmt;
use std::io;

use crate::volume::Interval;

/// Region extraction error types
#[derive(Debug)]
pub enum RegionError {
    /// Invalid extractor or configuration parameters
    Configuration(String),
    /// Seed coordinate outside the volume's declared extent
    OutOfBounds {
        /// The rejected seed
        seed: Vec<i64>,
        /// The extent it was checked against
        interval: Interval,
    },
    /// Traversal was stopped by its monitor
    Cancelled,
    /// I/O error
    IoError(io::Error),
    /// Malformed region or volume file
    InvalidFormat(String),
    /// Unsupported compression code in a region file
    UnsupportedCompression(u16),
    /// Image decoding or encoding failure
    ImageError(String),
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for RegionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            RegionError::OutOfBounds { seed, interval } => {
                write!(f, "Seed {:?} lies outside the volume extent {}", seed, interval)
            }
            RegionError::Cancelled => write!(f, "Region extraction was cancelled"),
            RegionError::IoError(e) => write!(f, "I/O error: {}", e),
            RegionError::InvalidFormat(msg) => write!(f, "Invalid file format: {}", msg),
            RegionError::UnsupportedCompression(c) => write!(f, "Unsupported compression method: {}", c),
            RegionError::ImageError(msg) => write!(f, "Image error: {}", msg),
            RegionError::GenericError(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for RegionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegionError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for RegionError {
    fn from(error: io::Error) -> Self {
        RegionError::IoError(error)
    }
}

impl From<image::ImageError> for RegionError {
    fn from(error: image::ImageError) -> Self {
        RegionError::ImageError(error.to_string())
    }
}

impl From<String> for RegionError {
    fn from(msg: String) -> Self {
        RegionError::GenericError(msg)
    }
}

/// Result type for region operations
pub type RegionKitResult<T> = Result<T, RegionError>;
