//! Label color lookup tables
//!
//! Labels are hashed onto a 256-entry lookup table with the golden ratio so
//! that neighbouring label values land on visually distant colors. Two
//! tables are provided: a golden-angle walk through HSB space and the
//! Glasbey table of maximally distinct colors. A third palette interpolates
//! around the hue wheel instead of using a table.

use lazy_static::lazy_static;
use std::fmt;
use std::str::FromStr;

use crate::extractor::errors::{RegionError, RegionKitResult};

/// Inverse of the golden ratio
pub const GOLDEN_RATIO: f64 = 0.618_033_988_749_894_8;

/// Hue and saturation increment of the golden-angle table
const GOLDEN_ANGLE_STEP: f32 = 0.38197;

/// Alpha used for Glasbey colors
pub const GLASBEY_ALPHA: u8 = 125;

/// Alpha used for hue-wheel colors
pub const SAALFELD_ALPHA: u8 = 0x20;

/// Default hash seed for label colors
pub const DEFAULT_LUT_SEED: u64 = 42;

/// Hue-wheel control points for red, green and blue
const WHEEL_R: [f64; 7] = [1.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0];
const WHEEL_G: [f64; 7] = [0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0];
const WHEEL_B: [f64; 7] = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0];

/// RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LabelColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl LabelColor {
    /// Fully transparent black, used for background and unselected labels
    pub const TRANSPARENT: LabelColor = LabelColor { r: 0, g: 0, b: 0, a: 0 };

    /// Opaque green used to highlight a selection
    pub const SELECTION: LabelColor = LabelColor { r: 0, g: 255, b: 0, a: 255 };

    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        LabelColor { r, g, b, a }
    }

    /// Convert to hex string (#RRGGBBAA format)
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }

    /// Packed `0xAARRGGBB` value
    pub fn to_argb(&self) -> u32 {
        u32::from_be_bytes([self.a, self.r, self.g, self.b])
    }

    pub fn to_rgba(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// How labels are mapped to colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Palette {
    /// Glasbey table, semi-transparent
    #[default]
    Glasbey,
    /// Golden-angle HSB table, opaque
    GoldenAngle,
    /// Interpolated hue wheel, faint
    Saalfeld,
}

impl Palette {
    pub fn name(&self) -> &'static str {
        match self {
            Palette::Glasbey => "glasbey",
            Palette::GoldenAngle => "golden-angle",
            Palette::Saalfeld => "saalfeld",
        }
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Palette {
    type Err = RegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "glasbey" => Ok(Palette::Glasbey),
            "golden-angle" | "golden" => Ok(Palette::GoldenAngle),
            "saalfeld" | "wheel" => Ok(Palette::Saalfeld),
            other => Err(RegionError::Configuration(format!(
                "Unknown palette '{}' (expected glasbey, golden-angle or saalfeld)",
                other
            ))),
        }
    }
}

lazy_static! {
    /// 256-entry golden-angle lookup table
    pub static ref GOLDEN_ANGLE_LUT: Vec<[u8; 3]> = create_golden_angle_lut(256);
}

/// Fractional part of `label * seed * GOLDEN_RATIO`
fn golden_hash(label: u64, seed: u64) -> f64 {
    let x = (label as f64) * (seed as f64) * GOLDEN_RATIO;
    x - x.floor()
}

/// Lookup table index for a label
///
/// # Arguments
/// * `label` - Label value
/// * `seed` - Hash seed; changing it reshuffles all colors
///
/// # Returns
/// An index in `0..255`
pub fn color_index(label: u64, seed: u64) -> usize {
    ((255.0 * golden_hash(label, seed)) as usize).min(255)
}

/// Color for a label under the given palette
///
/// Label 0 is background and always transparent.
pub fn color_for_label(label: u64, seed: u64, palette: Palette) -> LabelColor {
    if label == 0 {
        return LabelColor::TRANSPARENT;
    }

    match palette {
        Palette::Glasbey => {
            let [r, g, b] = GLASBEY_LUT[color_index(label, seed)];
            LabelColor::new(r, g, b, GLASBEY_ALPHA)
        }
        Palette::GoldenAngle => {
            let [r, g, b] = GOLDEN_ANGLE_LUT[color_index(label, seed)];
            LabelColor::new(r, g, b, 255)
        }
        Palette::Saalfeld => wheel_color(golden_hash(label, seed)),
    }
}

/// Interpolated hue-wheel color for a position in `[0, 1)`
fn wheel_color(position: f64) -> LabelColor {
    let x = position * 6.0;
    let k = (x as usize).min(5);
    let l = k + 1;
    let u = x - k as f64;
    let v = 1.0 - u;
    let channel = |xs: &[f64; 7]| ((v * xs[k] + u * xs[l]) * 255.0 + 0.5).min(255.0) as u8;

    LabelColor::new(channel(&WHEEL_R), channel(&WHEEL_G), channel(&WHEEL_B), SAALFELD_ALPHA)
}

/// Builds a lookup table by walking hue and saturation by the golden angle
///
/// Starts at hue 0.5 and saturation 0.75 with full brightness; saturation is
/// folded back into `[0.5, 1]` after each step.
pub fn create_golden_angle_lut(num_colors: usize) -> Vec<[u8; 3]> {
    let mut hue = 0.5f32;
    let mut saturation = 0.75f32;
    let mut lut = Vec::with_capacity(num_colors);

    for _ in 0..num_colors {
        lut.push(hsb_to_rgb(hue, saturation, 1.0));

        hue += GOLDEN_ANGLE_STEP;
        if hue > 1.0 {
            hue -= 1.0;
        }
        saturation += GOLDEN_ANGLE_STEP;
        if saturation > 1.0 {
            saturation -= 1.0;
        }
        saturation = 0.5 * saturation + 0.5;
    }

    lut
}

/// HSB to RGB conversion with round-half-up channels
pub fn hsb_to_rgb(hue: f32, saturation: f32, brightness: f32) -> [u8; 3] {
    let to_byte = |v: f32| (v * 255.0 + 0.5) as u8;

    if saturation == 0.0 {
        let v = to_byte(brightness);
        return [v, v, v];
    }

    let h = (hue - hue.floor()) * 6.0;
    let f = h - h.floor();
    let p = brightness * (1.0 - saturation);
    let q = brightness * (1.0 - saturation * f);
    let t = brightness * (1.0 - saturation * (1.0 - f));

    let (r, g, b) = match h as u32 {
        0 => (brightness, t, p),
        1 => (q, brightness, p),
        2 => (p, brightness, t),
        3 => (p, q, brightness),
        4 => (t, p, brightness),
        _ => (brightness, p, q),
    };
    [to_byte(r), to_byte(g), to_byte(b)]
}

/// Glasbey table of maximally distinct colors
pub const GLASBEY_LUT: [[u8; 3]; 256] = [
    [255, 255, 255], [0, 0, 255], [255, 0, 0], [0, 255, 0], [0, 0, 51], [255, 0, 182],
    [0, 83, 0], [255, 211, 0], [0, 159, 255], [154, 77, 66], [0, 255, 190], [120, 63, 193],
    [31, 150, 152], [255, 172, 253], [177, 204, 113], [241, 8, 92], [254, 143, 66], [221, 0, 255],
    [32, 26, 1], [114, 0, 85], [118, 108, 149], [2, 173, 36], [200, 255, 0], [136, 108, 0],
    [255, 183, 159], [133, 133, 103], [161, 3, 0], [20, 249, 255], [0, 71, 158], [220, 94, 147],
    [147, 212, 255], [0, 76, 255], [0, 66, 80], [57, 167, 106], [238, 112, 254], [0, 0, 100],
    [171, 245, 204], [161, 146, 255], [164, 255, 115], [255, 206, 113], [71, 0, 21], [212, 173, 197],
    [251, 118, 111], [171, 188, 0], [117, 0, 215], [166, 0, 154], [0, 115, 254], [165, 93, 174],
    [98, 132, 2], [0, 121, 168], [0, 255, 131], [86, 53, 0], [159, 0, 63], [66, 45, 66],
    [255, 242, 187], [0, 93, 67], [252, 255, 124], [159, 191, 186], [167, 84, 19], [74, 39, 108],
    [0, 16, 166], [145, 78, 109], [207, 149, 0], [195, 187, 255], [253, 68, 64], [66, 78, 32],
    [106, 1, 0], [181, 131, 84], [132, 233, 147], [96, 217, 0], [255, 111, 211], [102, 75, 63],
    [254, 100, 0], [228, 3, 127], [17, 199, 174], [210, 129, 139], [91, 118, 124], [32, 59, 106],
    [180, 84, 255], [226, 8, 210], [0, 1, 20], [93, 132, 68], [166, 250, 255], [97, 123, 201],
    [98, 0, 122], [126, 190, 58], [0, 60, 183], [255, 253, 0], [7, 197, 226], [180, 167, 57],
    [148, 186, 138], [204, 187, 160], [55, 0, 49], [0, 40, 1], [150, 122, 129], [39, 136, 38],
    [206, 130, 180], [150, 164, 196], [180, 32, 128], [110, 86, 180], [147, 0, 185], [199, 48, 61],
    [115, 102, 255], [15, 187, 253], [172, 164, 100], [182, 117, 250], [216, 220, 254], [87, 141, 113],
    [216, 85, 34], [0, 196, 103], [243, 165, 105], [216, 255, 182], [1, 24, 219], [52, 66, 54],
    [255, 154, 0], [87, 95, 1], [198, 241, 79], [255, 95, 133], [123, 172, 240], [120, 100, 49],
    [162, 133, 204], [105, 255, 220], [198, 82, 100], [121, 26, 64], [0, 238, 70], [231, 207, 69],
    [217, 128, 233], [255, 211, 209], [209, 255, 141], [36, 0, 3], [87, 163, 193], [211, 231, 201],
    [203, 111, 79], [62, 24, 0], [0, 117, 223], [112, 176, 88], [209, 24, 0], [0, 30, 107],
    [105, 200, 197], [255, 203, 255], [233, 194, 137], [191, 129, 46], [69, 42, 145], [171, 76, 194],
    [14, 117, 61], [0, 30, 25], [118, 73, 127], [255, 169, 200], [94, 55, 217], [238, 230, 138],
    [159, 54, 33], [80, 0, 148], [189, 144, 128], [0, 109, 126], [88, 223, 96], [71, 80, 103],
    [1, 93, 159], [99, 48, 60], [2, 206, 148], [139, 83, 37], [171, 0, 255], [141, 42, 135],
    [85, 83, 148], [150, 255, 0], [0, 152, 123], [255, 138, 203], [222, 69, 200], [107, 109, 230],
    [30, 0, 68], [173, 76, 138], [255, 134, 161], [0, 35, 60], [138, 205, 0], [111, 202, 157],
    [225, 75, 253], [255, 176, 77], [229, 232, 57], [114, 16, 255], [111, 82, 101], [134, 137, 48],
    [99, 38, 80], [105, 38, 32], [200, 110, 0], [209, 164, 255], [198, 210, 86], [79, 103, 77],
    [174, 165, 166], [170, 45, 101], [199, 81, 175], [255, 89, 172], [146, 102, 78], [102, 134, 184],
    [111, 152, 255], [92, 255, 159], [172, 137, 178], [210, 34, 98], [199, 207, 147], [255, 185, 30],
    [250, 148, 141], [49, 34, 78], [254, 81, 97], [254, 141, 100], [68, 54, 23], [201, 162, 84],
    [199, 232, 240], [68, 152, 0], [147, 172, 58], [22, 75, 28], [8, 84, 121], [116, 45, 0],
    [104, 60, 255], [64, 41, 38], [164, 113, 215], [207, 0, 155], [118, 1, 35], [83, 0, 88],
    [0, 82, 232], [43, 92, 87], [160, 217, 146], [176, 26, 229], [29, 3, 36], [122, 58, 159],
    [214, 209, 207], [160, 100, 105], [106, 157, 160], [153, 219, 113], [192, 56, 207], [125, 255, 89],
    [149, 0, 34], [213, 162, 223], [22, 131, 204], [166, 249, 69], [109, 105, 97], [86, 188, 78],
    [255, 109, 81], [255, 3, 248], [255, 0, 73], [202, 0, 35], [67, 109, 18], [234, 170, 173],
    [191, 165, 0], [38, 44, 51], [85, 185, 2], [121, 182, 158], [254, 236, 212], [139, 165, 89],
    [141, 254, 193], [0, 60, 43], [63, 17, 40], [255, 221, 246], [17, 26, 146], [154, 66, 84],
    [149, 157, 238], [126, 130, 72], [58, 6, 101], [189, 117, 101],
];
