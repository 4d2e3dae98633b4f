//! Region files (`.rrg`)
//!
//! A region file persists one [`RegionResult`]: the seed, label, capped flag
//! and bounding interval in a fixed header, followed by the bit-packed mask
//! run through one of the compression handlers.
//!
//! Layout after the two-byte byte order mark:
//! `RRGN`, version (u16), ndim (u16), label (u64), capped (u8),
//! compression (u16), seed, min and max (ndim i64 each), payload length
//! (u64), payload.

use log::{debug, info};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::compression::{CompressionFactory, CompressionHandler, DeflateHandler};
use crate::extractor::errors::{RegionError, RegionKitResult};
use crate::extractor::{RegionMask, RegionResult};
use crate::io::byte_order::ByteOrder;
use crate::io::seekable::SeekableReader;
use crate::volume::Interval;

/// Magic bytes following the byte order mark
pub const REGION_MAGIC: &[u8; 4] = b"RRGN";

/// Current format version
pub const REGION_FORMAT_VERSION: u16 = 1;

/// File extension used for region files
pub const REGION_EXTENSION: &str = "rrg";

/// Decoded region file header
#[derive(Debug, Clone, PartialEq)]
pub struct RegionFileHeader {
    pub byte_order: ByteOrder,
    pub version: u16,
    pub label: u64,
    pub capped_at_max_size: bool,
    pub compression: u16,
    pub seed: Vec<i64>,
    pub bounding_interval: Interval,
    pub payload_len: u64,
}

/// Writes region results to region files
pub struct RegionFileWriter {
    byte_order: ByteOrder,
    compression: Box<dyn CompressionHandler>,
}

impl Default for RegionFileWriter {
    fn default() -> Self {
        RegionFileWriter::new(ByteOrder::native(), Box::new(DeflateHandler))
    }
}

impl RegionFileWriter {
    /// Create a writer
    ///
    /// # Arguments
    /// * `byte_order` - Byte order for header fields
    /// * `compression` - Compression applied to the mask payload
    pub fn new(byte_order: ByteOrder, compression: Box<dyn CompressionHandler>) -> Self {
        RegionFileWriter { byte_order, compression }
    }

    /// Create a writer using the compression method named `name`
    pub fn with_compression_name(byte_order: ByteOrder, name: &str) -> RegionKitResult<Self> {
        Ok(RegionFileWriter::new(byte_order, CompressionFactory::get_handler_by_name(name)?))
    }

    pub fn compression_name(&self) -> &'static str {
        self.compression.name()
    }

    /// Serialize `result` into `writer`
    pub fn write(&self, writer: &mut dyn Write, result: &RegionResult) -> RegionKitResult<()> {
        let ndim = u16::try_from(result.num_dimensions()).map_err(|_| {
            RegionError::Configuration(format!("Cannot store a {}-dimensional region", result.num_dimensions()))
        })?;
        let handler = self.byte_order.create_handler();
        let payload = self.compression.compress(result.mask().as_bytes())?;
        let interval = result.bounding_interval();

        debug!(
            "Writing region header: {} dims, label {}, {} ({} -> {} bytes)",
            ndim,
            result.label(),
            self.compression.name(),
            result.mask().as_bytes().len(),
            payload.len()
        );

        self.byte_order.write_mark(writer)?;
        writer.write_all(REGION_MAGIC)?;
        handler.write_u16(writer, REGION_FORMAT_VERSION)?;
        handler.write_u16(writer, ndim)?;
        handler.write_u64(writer, result.label())?;
        writer.write_all(&[result.capped_at_max_size() as u8])?;
        handler.write_u16(writer, self.compression.code())?;
        for coords in [result.seed(), interval.min(), interval.max()] {
            for &v in coords {
                handler.write_i64(writer, v)?;
            }
        }
        handler.write_u64(writer, payload.len() as u64)?;
        writer.write_all(&payload)?;

        Ok(())
    }

    /// Save `result` to `path`
    pub fn save<P: AsRef<Path>>(&self, path: P, result: &RegionResult) -> RegionKitResult<()> {
        let path = path.as_ref();
        info!("Saving region ({} voxels) to {}", result.region_size(), path.display());
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write(&mut writer, result)?;
        writer.flush()?;
        Ok(())
    }
}

/// Reads region files back into region results
pub struct RegionFileReader;

impl RegionFileReader {
    /// Read and validate the header, leaving the reader at the payload
    pub fn read_header(reader: &mut dyn SeekableReader) -> RegionKitResult<RegionFileHeader> {
        let byte_order = ByteOrder::detect(reader)?;
        let handler = byte_order.create_handler();

        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if &magic != REGION_MAGIC {
            return Err(RegionError::InvalidFormat(format!(
                "Not a region file (magic {:?})",
                String::from_utf8_lossy(&magic)
            )));
        }

        let version = handler.read_u16(reader)?;
        if version != REGION_FORMAT_VERSION {
            return Err(RegionError::InvalidFormat(format!("Unsupported region file version {}", version)));
        }

        let ndim = handler.read_u16(reader)? as usize;
        if ndim == 0 {
            return Err(RegionError::InvalidFormat("Region has no dimensions".to_string()));
        }

        let label = handler.read_u64(reader)?;
        let mut capped = [0u8; 1];
        reader.read_exact(&mut capped)?;
        let capped_at_max_size = match capped[0] {
            0 => false,
            1 => true,
            other => return Err(RegionError::InvalidFormat(format!("Invalid capped flag {}", other))),
        };

        let compression = handler.read_u16(reader)?;
        // reject unknown codes before touching the payload
        CompressionFactory::create_handler(compression)?;

        let mut coords = [Vec::with_capacity(ndim), Vec::with_capacity(ndim), Vec::with_capacity(ndim)];
        for values in coords.iter_mut() {
            for _ in 0..ndim {
                values.push(handler.read_i64(reader)?);
            }
        }
        let [seed, min, max] = coords;
        let bounding_interval = Interval::new(min, max)?;
        if bounding_interval.num_elements().is_none() {
            return Err(RegionError::InvalidFormat(format!(
                "Bounding interval {} is too large to address",
                bounding_interval
            )));
        }
        if (label == 0) != bounding_interval.is_empty() {
            return Err(RegionError::InvalidFormat(format!(
                "Label {} does not match bounding interval {}",
                label, bounding_interval
            )));
        }
        let payload_len = handler.read_u64(reader)?;

        Ok(RegionFileHeader {
            byte_order,
            version,
            label,
            capped_at_max_size,
            compression,
            seed,
            bounding_interval,
            payload_len,
        })
    }

    /// Read a complete region result
    pub fn read(reader: &mut dyn SeekableReader) -> RegionKitResult<RegionResult> {
        let header = Self::read_header(reader)?;

        let mut payload = Vec::new();
        (&mut *reader).take(header.payload_len).read_to_end(&mut payload)?;
        if payload.len() as u64 != header.payload_len {
            return Err(RegionError::InvalidFormat(format!(
                "Region payload is truncated: {} of {} bytes",
                payload.len(),
                header.payload_len
            )));
        }

        let bits = CompressionFactory::create_handler(header.compression)?.decompress(&payload)?;
        let mask = RegionMask::from_bytes(&header.bounding_interval.dimensions(), bits)?;

        if (mask.count() == 0) != (header.label == 0) {
            return Err(RegionError::InvalidFormat(format!(
                "Label {} does not match a mask of {} voxels",
                header.label,
                mask.count()
            )));
        }

        Ok(RegionResult::new(
            header.seed,
            header.label,
            header.bounding_interval,
            mask,
            header.capped_at_max_size,
        ))
    }

    /// Load a region file from disk
    pub fn load<P: AsRef<Path>>(path: P) -> RegionKitResult<RegionResult> {
        let path = path.as_ref();
        info!("Loading region file: {}", path.display());
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read(&mut reader)
    }

    /// Load only the header of a region file
    pub fn load_header<P: AsRef<Path>>(path: P) -> RegionKitResult<RegionFileHeader> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);
        Self::read_header(&mut reader)
    }
}
