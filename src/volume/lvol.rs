//! Raw label volume files (`.lvol`)
//!
//! An `.lvol` file stores one dense label volume: a byte order mark, the
//! `LVOL` magic, the label width, the extent and then every label in
//! row-major order. Labels are narrowed to the smallest width that holds the
//! largest label when writing.

use log::{debug, info};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::extractor::errors::{RegionError, RegionKitResult};
use crate::io::byte_order::ByteOrder;
use crate::io::seekable::SeekableReader;
use super::array_volume::ArrayVolume;
use super::interval::Interval;
use super::label_volume::LabelVolume;

/// Magic bytes following the byte order mark
pub const LVOL_MAGIC: &[u8; 4] = b"LVOL";

/// File extension used for label volume files
pub const LVOL_EXTENSION: &str = "lvol";

/// Smallest supported label width, in bytes, that can store `max_label`
pub fn label_width(max_label: u64) -> u8 {
    if max_label <= u8::MAX as u64 {
        1
    } else if max_label <= u16::MAX as u64 {
        2
    } else if max_label <= u32::MAX as u64 {
        4
    } else {
        8
    }
}

/// Reads a label volume from any seekable reader
///
/// # Arguments
/// * `reader` - Reader positioned at the byte order mark
///
/// # Returns
/// The decoded volume, or `InvalidFormat` for a malformed header
pub fn read_volume(reader: &mut dyn SeekableReader) -> RegionKitResult<ArrayVolume> {
    let byte_order = ByteOrder::detect(reader)?;
    let handler = byte_order.create_handler();
    debug!("Label volume byte order: {}", byte_order.name());

    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if &magic != LVOL_MAGIC {
        return Err(RegionError::InvalidFormat(format!(
            "Not a label volume file (magic {:?})",
            String::from_utf8_lossy(&magic)
        )));
    }

    let mut header = [0u8; 2];
    reader.read_exact(&mut header)?;
    let width = header[0];
    let ndim = header[1] as usize;

    if !matches!(width, 1 | 2 | 4 | 8) {
        return Err(RegionError::InvalidFormat(format!("Unsupported label width: {} bytes", width)));
    }
    if ndim == 0 {
        return Err(RegionError::InvalidFormat("Label volume has no dimensions".to_string()));
    }

    let mut min = Vec::with_capacity(ndim);
    for _ in 0..ndim {
        min.push(handler.read_i64(reader)?);
    }
    let mut max = Vec::with_capacity(ndim);
    for _ in 0..ndim {
        max.push(handler.read_i64(reader)?);
    }

    let interval = Interval::new(min, max)?;
    let count = interval
        .num_elements()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| RegionError::InvalidFormat(format!("Volume extent {} is too large to load", interval)))?;

    let byte_len = (count as u64)
        .checked_mul(width as u64)
        .ok_or_else(|| RegionError::InvalidFormat(format!("Volume extent {} is too large to load", interval)))?;

    // the header is untrusted; never size the label buffer past the data present
    let position = reader.stream_position()?;
    let end = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(position))?;
    let available = end.saturating_sub(position);
    if available < byte_len {
        return Err(RegionError::IoError(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("Label data is truncated: {} of {} bytes", available, byte_len),
        )));
    }

    debug!("Reading {} labels of {} bytes over {}", count, width, interval);
    let labels = handler.read_labels(reader, width, count)?;

    ArrayVolume::new(interval, labels)
}

/// Writes a label volume
///
/// # Arguments
/// * `writer` - Destination
/// * `volume` - Volume to store
/// * `byte_order` - Byte order for the header and labels
pub fn write_volume(writer: &mut dyn Write, volume: &ArrayVolume, byte_order: ByteOrder) -> RegionKitResult<()> {
    let interval = volume.interval();
    let ndim = u8::try_from(interval.num_dimensions()).map_err(|_| {
        RegionError::Configuration(format!("Cannot store a {}-dimensional volume", interval.num_dimensions()))
    })?;
    let width = label_width(volume.labels().iter().copied().max().unwrap_or(0));
    let handler = byte_order.create_handler();

    byte_order.write_mark(writer)?;
    writer.write_all(LVOL_MAGIC)?;
    writer.write_all(&[width, ndim])?;
    for &v in interval.min() {
        handler.write_i64(writer, v)?;
    }
    for &v in interval.max() {
        handler.write_i64(writer, v)?;
    }
    handler.write_labels(writer, width, volume.labels())?;

    Ok(())
}

/// Loads a label volume file from disk
pub fn load<P: AsRef<Path>>(path: P) -> RegionKitResult<ArrayVolume> {
    let path = path.as_ref();
    info!("Loading label volume: {}", path.display());
    let file = File::open(path)?;
    let mut reader = BufReader::with_capacity(1024 * 1024, file);
    read_volume(&mut reader)
}

/// Saves a label volume file to disk
pub fn save<P: AsRef<Path>>(path: P, volume: &ArrayVolume, byte_order: ByteOrder) -> RegionKitResult<()> {
    let path = path.as_ref();
    info!("Saving label volume {} to {}", volume.interval(), path.display());
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_volume(&mut writer, volume, byte_order)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_label_width() {
        assert_eq!(label_width(0), 1);
        assert_eq!(label_width(255), 1);
        assert_eq!(label_width(256), 2);
        assert_eq!(label_width(70_000), 4);
        assert_eq!(label_width(u64::MAX), 8);
    }

    #[test]
    fn test_round_trip_both_byte_orders() {
        let volume = ArrayVolume::from_dimensions(&[2, 2, 3], (0..12).map(|v| v * 1000).collect())
            .unwrap()
            .with_origin(&[-1, 4, 0])
            .unwrap();

        for byte_order in [ByteOrder::LittleEndian, ByteOrder::BigEndian] {
            let mut buffer: Vec<u8> = Vec::new();
            write_volume(&mut buffer, &volume, byte_order).unwrap();

            // header: mark, magic, width, ndim, min, max
            assert_eq!(buffer.len(), 2 + 4 + 2 + 48 + 12 * 2);
            let decoded = read_volume(&mut Cursor::new(buffer)).unwrap();
            assert_eq!(decoded, volume);
        }
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut buffer = b"IIXXXX".to_vec();
        buffer.extend_from_slice(&[1, 1]);
        let result = read_volume(&mut Cursor::new(buffer));
        assert!(matches!(result, Err(RegionError::InvalidFormat(_))));
    }

    #[test]
    fn test_rejects_bad_width() {
        let mut buffer = b"IILVOL".to_vec();
        buffer.extend_from_slice(&[3, 1]);
        let result = read_volume(&mut Cursor::new(buffer));
        assert!(matches!(result, Err(RegionError::InvalidFormat(_))));
    }

    #[test]
    fn test_truncated_labels_are_an_io_error() {
        let volume = ArrayVolume::filled(&[4, 4], 9).unwrap();
        let mut buffer: Vec<u8> = Vec::new();
        write_volume(&mut buffer, &volume, ByteOrder::LittleEndian).unwrap();
        buffer.truncate(buffer.len() - 3);

        assert!(matches!(read_volume(&mut Cursor::new(buffer)), Err(RegionError::IoError(_))));
    }

    fn header_with_extent(width: u8, max: i64) -> Vec<u8> {
        let mut buffer = b"IILVOL".to_vec();
        buffer.extend_from_slice(&[width, 1]);
        buffer.extend_from_slice(&0i64.to_le_bytes());
        buffer.extend_from_slice(&max.to_le_bytes());
        buffer
    }

    #[test]
    fn test_oversized_extent_is_rejected_before_allocating() {
        // 2^62 eight-byte labels overflow the byte count
        let overflowing = header_with_extent(8, (1i64 << 62) - 1);
        assert!(matches!(
            read_volume(&mut Cursor::new(overflowing)),
            Err(RegionError::InvalidFormat(_))
        ));

        // 2^40 one-byte labels fit the byte count but not the file
        let mut short = header_with_extent(1, (1i64 << 40) - 1);
        short.extend_from_slice(&[7; 16]);
        assert!(matches!(read_volume(&mut Cursor::new(short)), Err(RegionError::IoError(_))));
    }
}
