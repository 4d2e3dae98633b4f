//! I/O utilities for file handling
//!
//! This module provides the byte order strategies shared by the binary
//! formats and the region file reader/writer.

pub mod seekable;
pub mod byte_order;
pub mod region_file;


pub use byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};
pub use region_file::{RegionFileReader, RegionFileWriter};
