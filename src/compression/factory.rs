//! Factory for creating compression handlers

use crate::extractor::errors::{RegionError, RegionKitResult};
use super::handler::CompressionHandler;
use super::uncompressed::UncompressedHandler;
use super::deflate::DeflateHandler;
use super::zstd::ZstdHandler;

/// Factory for creating compression handlers
pub struct CompressionFactory;

impl CompressionFactory {
    /// Create a compression handler for the given compression code
    pub fn create_handler(compression: u16) -> RegionKitResult<Box<dyn CompressionHandler>> {
        match compression {
            1 => Ok(Box::new(UncompressedHandler)),
            8 => Ok(Box::new(DeflateHandler)),
            14 => Ok(Box::new(ZstdHandler::new())),
            _ => Err(RegionError::UnsupportedCompression(compression))
        }
    }

    /// Get a handler by name
    ///
    /// ZSTD accepts an optional level suffix, as in `zstd:19`.
    pub fn get_handler_by_name(name: &str) -> RegionKitResult<Box<dyn CompressionHandler>> {
        let lowered = name.trim().to_lowercase();
        let (method, level) = match lowered.split_once(':') {
            Some((method, level)) => (method, Some(level)),
            None => (lowered.as_str(), None),
        };

        match (method, level) {
            ("uncompressed" | "none", None) => Ok(Box::new(UncompressedHandler)),
            ("deflate" | "zip" | "zlib", None) => Ok(Box::new(DeflateHandler)),
            ("zstd", None) => Ok(Box::new(ZstdHandler::new())),
            ("zstd", Some(level)) => {
                let level = level.parse::<i32>().map_err(|_| {
                    RegionError::Configuration(format!("Invalid ZSTD level: {}", level))
                })?;
                Ok(Box::new(ZstdHandler::with_level(level)))
            }
            _ => Err(RegionError::Configuration(format!("Unknown compression type: {}", name)))
        }
    }

    /// Get all available compression handlers
    pub fn get_available_handlers() -> Vec<Box<dyn CompressionHandler>> {
        vec![
            Box::new(UncompressedHandler),
            Box::new(DeflateHandler),
            Box::new(ZstdHandler::new())
        ]
    }
}
