pub mod io;
pub mod utils;
pub mod compression;
pub mod extractor;
pub mod volume;
pub mod labels;
pub mod config;
pub mod commands;
pub mod api;

pub use crate::api::RegionKit;

pub use config::RegionKitConfig;
pub use extractor::{NeighborhoodShape, RegionError, RegionExtractor, RegionKitResult, RegionResult};
pub use volume::{ArrayVolume, FunctionVolume, Interval, LabelVolume, VolumeLoader};
