//! Coordinate extraction from free-form message text.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::Coordinate;

/// Two signed decimals separated by a comma, e.g. `45.12345, 25.12345`.
/// Both numbers need a fractional part. Digits are ASCII only; `\d` would
/// also match full-width and other Unicode digits that `f64` cannot parse.
static COORDINATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(-?[0-9]+\.[0-9]+),\s*(-?[0-9]+\.[0-9]+)").expect("coordinate pattern is valid")
});

/// Returns the leftmost coordinate pair in `text`, if any.
///
/// Ranges are not checked, so `"200.0, 500.0"` parses as-is. A match whose
/// numbers fail to convert is treated the same as no match.
pub fn parse(text: &str) -> Option<Coordinate> {
    let captures = COORDINATE_PATTERN.captures(text)?;
    let latitude = captures.get(1)?.as_str().parse::<f64>().ok()?;
    let longitude = captures.get(2)?.as_str().parse::<f64>().ok()?;
    Some(Coordinate::new(latitude, longitude))
}
