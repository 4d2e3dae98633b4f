//! Payload compression for region files
//!
//! This module implements strategies for the compression methods a region
//! file payload may use. Codes follow the TIFF numbering (1 none, 8 deflate,
//! 14 zstd) so files stay recognisable to raster tooling.

mod handler;
mod uncompressed;
mod deflate;
mod factory;
mod zstd;

pub use handler::CompressionHandler;
pub use uncompressed::UncompressedHandler;
pub use deflate::DeflateHandler;
pub use factory::CompressionFactory;
pub use zstd::ZstdHandler;
