//! Location inputs for the geofence registry.
//!
//! Provides:
//! - [`LocationQuery`]: a validated position plus the search radius used to
//!   look up nearby features
//! - Coordinate range checks shared with geofence definitions
//! - Coarse geohash cells for log output, so raw positions never reach logs
//!
//! # Example Usage
//!
//! ```
//! use geofence_core::location::LocationQuery;
//!
//! // Radius usually comes from the positioning accuracy of the fix
//! let query = LocationQuery::new(37.0, -122.0, 150.0).unwrap();
//! assert_eq!(query.radius_m(), 150.0);
//!
//! // Zero or negative radii are rejected
//! assert!(LocationQuery::new(37.0, -122.0, 0.0).is_err());
//! ```

pub mod privacy;
mod query;

pub use privacy::{coarse_cell, COARSE_CELL_PRECISION};
pub use query::{is_valid_latitude, is_valid_longitude, LocationQuery};
