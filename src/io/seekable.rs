//! Seekable reader trait
//!
//! Region and volume files are read through this trait so that files,
//! in-memory cursors and buffered readers share one code path.

use std::io::{Read, Seek};

/// Trait for readers that can both read and seek
pub trait SeekableReader: Read + Seek + Send + Sync {}

impl<T: Read + Seek + Send + Sync> SeekableReader for T {}
