//! Handler for Deflate (zlib) compressed payloads

use std::io::{Read, Write};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use crate::extractor::errors::{RegionError, RegionKitResult};
use super::handler::CompressionHandler;

/// Deflate (zlib) compression handler (compression code 8)
///
/// Bit-packed masks are long runs of identical bytes, which zlib shrinks well.
pub struct DeflateHandler;

impl CompressionHandler for DeflateHandler {
    fn decompress(&self, data: &[u8]) -> RegionKitResult<Vec<u8>> {
        let mut decoder = ZlibDecoder::new(data);
        let mut decompressed_data = Vec::new();
        match decoder.read_to_end(&mut decompressed_data) {
            Ok(_) => Ok(decompressed_data),
            Err(e) => Err(RegionError::IoError(e))
        }
    }

    fn compress(&self, data: &[u8]) -> RegionKitResult<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data)?;
        Ok(encoder.finish()?)
    }

    fn name(&self) -> &'static str {
        "Deflate"
    }

    fn code(&self) -> u16 {
        8
    }
}
