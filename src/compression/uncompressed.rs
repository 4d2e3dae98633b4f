//! Handler for uncompressed payloads

use crate::extractor::errors::RegionKitResult;
use super::handler::CompressionHandler;

/// Pass-through handler (compression code 1)
pub struct UncompressedHandler;

impl CompressionHandler for UncompressedHandler {
    fn decompress(&self, data: &[u8]) -> RegionKitResult<Vec<u8>> {
        Ok(data.to_vec())
    }

    fn compress(&self, data: &[u8]) -> RegionKitResult<Vec<u8>> {
        Ok(data.to_vec())
    }

    fn name(&self) -> &'static str {
        "Uncompressed"
    }

    fn code(&self) -> u16 {
        1
    }
}
