//! Configuration file handling
//!
//! Settings are read from a TOML file with `[extraction]`, `[labels]` and
//! `[logging]` tables. Every key is optional; missing keys keep their
//! defaults and malformed values are configuration errors.

use log::{debug, LevelFilter};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::extractor::errors::{RegionError, RegionKitResult};
use crate::extractor::{ExtractorOptions, NeighborhoodShape, VisitedPolicy, DEFAULT_DENSE_VISITED_LIMIT};
use crate::labels::{Palette, DEFAULT_LUT_SEED};

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "regionkit.toml";

/// Voxel budget used when nothing else is configured
pub const DEFAULT_MAX_REGION_SIZE: u64 = 1_000_000_000;

/// `[extraction]` settings
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionConfig {
    pub max_region_size: u64,
    /// Shape name such as `diamond:1`, resolved against the volume's dimensionality
    pub shape: String,
    pub visited_policy: VisitedPolicy,
    pub dense_visited_limit: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        ExtractionConfig {
            max_region_size: DEFAULT_MAX_REGION_SIZE,
            shape: "diamond:1".to_string(),
            visited_policy: VisitedPolicy::Auto,
            dense_visited_limit: DEFAULT_DENSE_VISITED_LIMIT,
        }
    }
}

impl ExtractionConfig {
    /// Shape for a volume with `num_dimensions` axes
    pub fn shape_for(&self, num_dimensions: usize) -> RegionKitResult<NeighborhoodShape> {
        NeighborhoodShape::parse(&self.shape, num_dimensions)
    }

    pub fn extractor_options(&self) -> ExtractorOptions {
        ExtractorOptions {
            visited_policy: self.visited_policy,
            dense_visited_limit: self.dense_visited_limit,
        }
    }
}

/// `[labels]` settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelConfig {
    pub palette: Palette,
    pub seed: u64,
}

impl Default for LabelConfig {
    fn default() -> Self {
        LabelConfig {
            palette: Palette::default(),
            seed: DEFAULT_LUT_SEED,
        }
    }
}

/// `[logging]` settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub file: String,
    pub level: LevelFilter,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            file: "regionkit.log".to_string(),
            level: LevelFilter::Info,
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionKitConfig {
    pub extraction: ExtractionConfig,
    pub labels: LabelConfig,
    pub logging: LoggingConfig,
}

impl FromStr for RegionKitConfig {
    type Err = RegionError;

    /// Parse configuration from a TOML string
    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let toml_value: toml::Value = match content.parse() {
            Ok(value) => value,
            Err(e) => return Err(RegionError::Configuration(format!("Failed to parse TOML: {}", e))),
        };

        let mut config = RegionKitConfig::default();

        if let Some(table) = toml_value.get("extraction") {
            let extraction = &mut config.extraction;
            if let Some(size) = get_u64(table, "extraction", "max_region_size")? {
                if size == 0 {
                    return Err(RegionError::Configuration(
                        "extraction.max_region_size must be positive".to_string(),
                    ));
                }
                extraction.max_region_size = size;
            }
            if let Some(shape) = get_str(table, "extraction", "shape")? {
                // validates the kind and radius; dimensionality comes later
                NeighborhoodShape::parse(shape, 1)?;
                extraction.shape = shape.to_string();
            }
            if let Some(policy) = get_str(table, "extraction", "visited")? {
                extraction.visited_policy = policy.parse()?;
            }
            if let Some(limit) = get_u64(table, "extraction", "dense_visited_limit")? {
                extraction.dense_visited_limit = limit;
            }
        }

        if let Some(table) = toml_value.get("labels") {
            if let Some(palette) = get_str(table, "labels", "palette")? {
                config.labels.palette = palette.parse()?;
            }
            if let Some(seed) = get_u64(table, "labels", "seed")? {
                config.labels.seed = seed;
            }
        }

        if let Some(table) = toml_value.get("logging") {
            if let Some(file) = get_str(table, "logging", "file")? {
                config.logging.file = file.to_string();
            }
            if let Some(level) = get_str(table, "logging", "level")? {
                config.logging.level = LevelFilter::from_str(level).map_err(|_| {
                    RegionError::Configuration(format!("Invalid logging.level '{}'", level))
                })?;
            }
        }

        Ok(config)
    }
}

impl RegionKitConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> RegionKitResult<Self> {
        let path = path.as_ref();
        debug!("Reading configuration from {}", path.display());
        let contents = fs::read_to_string(path)?;
        contents.parse()
    }

    /// Load `path` if given, else the default file if present, else defaults
    pub fn load(path: Option<&str>) -> RegionKitResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => Ok(RegionKitConfig::default()),
        }
    }
}

fn get_u64(table: &toml::Value, section: &str, key: &str) -> RegionKitResult<Option<u64>> {
    match table.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_integer()
            .and_then(|v| u64::try_from(v).ok())
            .map(Some)
            .ok_or_else(|| {
                RegionError::Configuration(format!("{}.{} must be a non-negative integer", section, key))
            }),
    }
}

fn get_str<'v>(table: &'v toml::Value, section: &str, key: &str) -> RegionKitResult<Option<&'v str>> {
    match table.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(Some)
            .ok_or_else(|| RegionError::Configuration(format!("{}.{} must be a string", section, key))),
    }
}
