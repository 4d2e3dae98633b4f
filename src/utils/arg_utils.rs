//! Command-line argument parsing helpers

use lazy_static::lazy_static;
use regex::Regex;

use crate::extractor::errors::{RegionError, RegionKitResult};

lazy_static! {
    static ref INTEGER_LIST: Regex = Regex::new(r"^\s*[-+]?\d+(?:\s*,\s*[-+]?\d+)*\s*$").unwrap();
    static ref INTEGER: Regex = Regex::new(r"[-+]?\d+").unwrap();
}

/// Parse a coordinate such as `12,40,7` (or `[12, 40, 7]`)
///
/// # Arguments
/// * `text` - Comma-separated integers, optionally wrapped in brackets
///
/// # Returns
/// One value per axis, or a configuration error
pub fn parse_coordinate(text: &str) -> RegionKitResult<Vec<i64>> {
    let inner = text.trim().trim_start_matches(['[', '(']).trim_end_matches([']', ')']);
    if !INTEGER_LIST.is_match(inner) {
        return Err(RegionError::Configuration(format!(
            "Invalid coordinate '{}' (expected comma-separated integers such as 12,40,7)",
            text
        )));
    }

    INTEGER
        .find_iter(inner)
        .map(|m| {
            m.as_str()
                .parse::<i64>()
                .map_err(|_| RegionError::Configuration(format!("Coordinate value {} is out of range", m.as_str())))
        })
        .collect()
}

/// Parse a list of labels such as `3,17,42`
pub fn parse_label_list(text: &str) -> RegionKitResult<Vec<u64>> {
    parse_coordinate(text)?
        .into_iter()
        .map(|v| {
            u64::try_from(v).map_err(|_| RegionError::Configuration(format!("Label {} must not be negative", v)))
        })
        .collect()
}
