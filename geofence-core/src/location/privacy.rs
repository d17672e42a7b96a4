//! Coordinate redaction for diagnostics.
//!
//! Log output from the registry identifies positions only by a coarse
//! geohash cell, never by raw latitude/longitude.
//!
//! # Geohash Precision Table
//!
//! | Length | Cell Width | Cell Height |
//! |--------|-----------|-------------|
//! | 4      | ±20 km    | ±20 km      |
//! | 5      | ±2.4 km   | ±2.4 km     |
//! | 6      | ±0.61 km  | ±0.61 km    |

use super::query::{is_valid_latitude, is_valid_longitude};

/// Geohash length used for log output (~5 km cells).
pub const COARSE_CELL_PRECISION: usize = 5;

/// Placeholder rendered when a position cannot be encoded.
const UNKNOWN_CELL: &str = "?????";

/// Renders a position as a coarse geohash cell suitable for logs.
///
/// Invalid coordinates render as a fixed placeholder instead of failing,
/// since this is only used for diagnostics.
///
/// # Examples
///
/// ```
/// use geofence_core::location::coarse_cell;
///
/// let cell = coarse_cell(37.7749, -122.4194);
/// assert_eq!(cell, "9q8yy");
/// ```
#[must_use]
pub fn coarse_cell(lat: f64, lon: f64) -> String {
    if !is_valid_latitude(lat) || !is_valid_longitude(lon) {
        return UNKNOWN_CELL.to_string();
    }

    geohash::encode(geohash::Coord { x: lon, y: lat }, COARSE_CELL_PRECISION)
        .unwrap_or_else(|_| UNKNOWN_CELL.to_string())
}
