//! Label colors
//!
//! Stable label-to-color mapping and rendering of label planes.

pub mod lut;
mod colorize;

pub use lut::{color_for_label, color_index, LabelColor, Palette, DEFAULT_LUT_SEED, GLASBEY_LUT, GOLDEN_ANGLE_LUT};
pub use colorize::LabelColorizer;
