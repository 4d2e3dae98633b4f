//! Byte order handling for region and volume files
//!
//! This module implements the Strategy pattern for handling different
//! byte orders (little-endian vs big-endian) when reading and writing the
//! crate's binary formats. Both formats open with the same two-byte mark
//! TIFF uses: `II` for little-endian, `MM` for big-endian.

use byteorder::{BigEndian, LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Result, Write};

use crate::extractor::errors::{RegionError, RegionKitResult};
use crate::io::seekable::SeekableReader;

/// Represents the byte order of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian byte order (II)
    LittleEndian,
    /// Big-endian byte order (MM)
    BigEndian,
}

impl ByteOrder {
    /// Detects the byte order from a file's leading mark
    pub fn detect(reader: &mut dyn SeekableReader) -> RegionKitResult<Self> {
        let mark = reader.read_u16::<LittleEndian>()?;
        match mark {
            0x4949 => Ok(ByteOrder::LittleEndian), // "II"
            0x4D4D => Ok(ByteOrder::BigEndian),    // "MM"
            _ => Err(RegionError::InvalidFormat(format!("Invalid byte order marker: {:#06x}", mark))),
        }
    }

    /// Writes the two-byte mark for this byte order
    pub fn write_mark(&self, writer: &mut dyn Write) -> Result<()> {
        match self {
            ByteOrder::LittleEndian => writer.write_all(b"II"),
            ByteOrder::BigEndian => writer.write_all(b"MM"),
        }
    }

    /// Returns a string representation of this byte order
    pub fn name(&self) -> &'static str {
        match self {
            ByteOrder::LittleEndian => "Little Endian (II)",
            ByteOrder::BigEndian => "Big Endian (MM)",
        }
    }

    /// Creates the appropriate handler for this byte order
    pub fn create_handler(&self) -> Box<dyn ByteOrderHandler> {
        match self {
            ByteOrder::LittleEndian => Box::new(LittleEndianHandler),
            ByteOrder::BigEndian => Box::new(BigEndianHandler),
        }
    }

    /// Byte order of the running machine
    pub fn native() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::BigEndian
        } else {
            ByteOrder::LittleEndian
        }
    }
}

/// Trait for byte order handling strategies
pub trait ByteOrderHandler: Send + Sync {
    /// Read a u16 value
    fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16>;

    /// Read a u64 value
    fn read_u64(&self, reader: &mut dyn SeekableReader) -> Result<u64>;

    /// Read an i64 value
    fn read_i64(&self, reader: &mut dyn SeekableReader) -> Result<i64>;

    /// Read `count` unsigned labels of `width` bytes each, widened to u64
    fn read_labels(&self, reader: &mut dyn SeekableReader, width: u8, count: usize) -> Result<Vec<u64>>;

    /// Write a u16 value
    fn write_u16(&self, writer: &mut dyn Write, value: u16) -> Result<()>;

    /// Write a u64 value
    fn write_u64(&self, writer: &mut dyn Write, value: u64) -> Result<()>;

    /// Write an i64 value
    fn write_i64(&self, writer: &mut dyn Write, value: i64) -> Result<()>;

    /// Write labels narrowed to `width` bytes each
    ///
    /// Labels are truncated to the width; callers pick a width that holds
    /// the largest label.
    fn write_labels(&self, writer: &mut dyn Write, width: u8, labels: &[u64]) -> Result<()>;
}

macro_rules! byte_order_handler {
    ($(#[$doc:meta])* $name:ident, $order:ty) => {
        $(#[$doc])*
        pub struct $name;

        impl ByteOrderHandler for $name {
            fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16> {
                reader.read_u16::<$order>()
            }

            fn read_u64(&self, reader: &mut dyn SeekableReader) -> Result<u64> {
                reader.read_u64::<$order>()
            }

            fn read_i64(&self, reader: &mut dyn SeekableReader) -> Result<i64> {
                reader.read_i64::<$order>()
            }

            fn read_labels(&self, reader: &mut dyn SeekableReader, width: u8, count: usize) -> Result<Vec<u64>> {
                match width {
                    1 => {
                        let mut buf = vec![0u8; count];
                        reader.read_exact(&mut buf)?;
                        Ok(buf.into_iter().map(u64::from).collect())
                    }
                    2 => {
                        let mut buf = vec![0u16; count];
                        reader.read_u16_into::<$order>(&mut buf)?;
                        Ok(buf.into_iter().map(u64::from).collect())
                    }
                    4 => {
                        let mut buf = vec![0u32; count];
                        reader.read_u32_into::<$order>(&mut buf)?;
                        Ok(buf.into_iter().map(u64::from).collect())
                    }
                    8 => {
                        let mut buf = vec![0u64; count];
                        reader.read_u64_into::<$order>(&mut buf)?;
                        Ok(buf)
                    }
                    _ => Err(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        format!("Unsupported label width: {} bytes", width),
                    )),
                }
            }

            fn write_u16(&self, writer: &mut dyn Write, value: u16) -> Result<()> {
                writer.write_u16::<$order>(value)
            }

            fn write_u64(&self, writer: &mut dyn Write, value: u64) -> Result<()> {
                writer.write_u64::<$order>(value)
            }

            fn write_i64(&self, writer: &mut dyn Write, value: i64) -> Result<()> {
                writer.write_i64::<$order>(value)
            }

            fn write_labels(&self, writer: &mut dyn Write, width: u8, labels: &[u64]) -> Result<()> {
                for &label in labels {
                    match width {
                        1 => writer.write_u8(label as u8)?,
                        2 => writer.write_u16::<$order>(label as u16)?,
                        4 => writer.write_u32::<$order>(label as u32)?,
                        8 => writer.write_u64::<$order>(label)?,
                        _ => {
                            return Err(std::io::Error::new(
                                std::io::ErrorKind::InvalidInput,
                                format!("Unsupported label width: {} bytes", width),
                            ))
                        }
                    }
                }
                Ok(())
            }
        }
    };
}

byte_order_handler!(
    /// Little-endian byte order handler
    LittleEndianHandler,
    LittleEndian
);

byte_order_handler!(
    /// Big-endian byte order handler
    BigEndianHandler,
    BigEndian
);
