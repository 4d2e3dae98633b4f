//! Compression handler trait definition

use crate::extractor::errors::RegionKitResult;

/// Strategy trait for handling different compression methods
pub trait CompressionHandler: Send + Sync {
    /// Decompress the data
    fn decompress(&self, data: &[u8]) -> RegionKitResult<Vec<u8>>;

    /// Compress the data
    fn compress(&self, data: &[u8]) -> RegionKitResult<Vec<u8>>;

    /// Get the name of this compression method
    fn name(&self) -> &'static str;

    /// Get the compression code stored in region file headers
    fn code(&self) -> u16;
}
