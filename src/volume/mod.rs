//! Label volumes
//!
//! This module defines the capability a volume provider must offer to the
//! extractor, a dense in-memory implementation, and loaders for the file
//! formats the command-line tool reads.

mod interval;
mod label_volume;
mod array_volume;
mod function_volume;
pub mod lvol;
pub mod image_stack;
mod loader;

pub use interval::{IndexLayout, Interval};
pub use label_volume::{LabelVolume, BACKGROUND};
pub use array_volume::ArrayVolume;
pub use function_volume::FunctionVolume;
pub use loader::VolumeLoader;
