//! Location query type.

use serde::{Deserialize, Serialize};

use crate::geofence::{GeofenceError, GeofenceResult};

/// Returns true when `lat` is finite and within -90.0..=90.0.
#[must_use]
pub fn is_valid_latitude(lat: f64) -> bool {
    lat.is_finite() && (-90.0..=90.0).contains(&lat)
}

/// Returns true when `lon` is finite and within -180.0..=180.0.
#[must_use]
pub fn is_valid_longitude(lon: f64) -> bool {
    lon.is_finite() && (-180.0..=180.0).contains(&lon)
}

/// A position and search radius used to find nearby features.
///
/// The radius is supplied by the caller, typically derived from the
/// accuracy of the current fix. It is not the radius of the geofences
/// that get registered.
///
/// # Example
///
/// ```
/// use geofence_core::location::LocationQuery;
///
/// let query = LocationQuery::new(37.7749, -122.4194, 150.0).unwrap();
/// assert_eq!(query.latitude(), 37.7749);
/// assert_eq!(query.longitude(), -122.4194);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationQuery {
    latitude: f64,
    longitude: f64,
    radius_m: f64,
}

impl LocationQuery {
    /// Creates a validated location query.
    ///
    /// # Errors
    ///
    /// Returns [`GeofenceError::InvalidLocation`] if either coordinate is not
    /// finite or out of range, or if `radius_m` is not strictly positive.
    pub fn new(latitude: f64, longitude: f64, radius_m: f64) -> GeofenceResult<Self> {
        if !is_valid_latitude(latitude) {
            return Err(GeofenceError::InvalidLocation(format!(
                "latitude {latitude} out of range"
            )));
        }
        if !is_valid_longitude(longitude) {
            return Err(GeofenceError::InvalidLocation(format!(
                "longitude {longitude} out of range"
            )));
        }
        if !(radius_m.is_finite() && radius_m > 0.0) {
            return Err(GeofenceError::InvalidLocation(format!(
                "search radius must be positive, got {radius_m}"
            )));
        }

        Ok(Self {
            latitude,
            longitude,
            radius_m,
        })
    }

    /// Re-checks the invariants of a query that may have been deserialized.
    ///
    /// # Errors
    ///
    /// Same conditions as [`LocationQuery::new`].
    pub fn validate(&self) -> GeofenceResult<()> {
        Self::new(self.latitude, self.longitude, self.radius_m).map(|_| ())
    }

    /// Latitude of the query center.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude of the query center.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Search radius in meters.
    #[must_use]
    pub const fn radius_m(&self) -> f64 {
        self.radius_m
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_accepts_valid_query() {
        let query = LocationQuery::new(37.0, -122.0, 150.0).unwrap();
        assert_eq!(query.latitude(), 37.0);
        assert_eq!(query.longitude(), -122.0);
        assert_eq!(query.radius_m(), 150.0);
    }

    #[test]
    fn new_accepts_boundaries() {
        assert!(LocationQuery::new(90.0, 180.0, 1.0).is_ok());
        assert!(LocationQuery::new(-90.0, -180.0, 1.0).is_ok());
    }

    #[test]
    fn new_rejects_out_of_range_latitude() {
        let err = LocationQuery::new(91.0, 0.0, 10.0).unwrap_err();
        assert!(matches!(err, GeofenceError::InvalidLocation(_)));
    }

    #[test]
    fn new_rejects_out_of_range_longitude() {
        let err = LocationQuery::new(0.0, -180.5, 10.0).unwrap_err();
        assert!(matches!(err, GeofenceError::InvalidLocation(_)));
    }

    #[test]
    fn new_rejects_nan_coordinates() {
        assert!(LocationQuery::new(f64::NAN, 0.0, 10.0).is_err());
        assert!(LocationQuery::new(0.0, f64::INFINITY, 10.0).is_err());
    }

    #[test]
    fn new_rejects_non_positive_radius() {
        assert!(LocationQuery::new(0.0, 0.0, 0.0).is_err());
        assert!(LocationQuery::new(0.0, 0.0, -5.0).is_err());
        assert!(LocationQuery::new(0.0, 0.0, f64::NAN).is_err());
    }

    #[test]
    fn validate_catches_deserialized_garbage() {
        let query: LocationQuery =
            serde_json::from_str(r#"{"latitude":120.0,"longitude":0.0,"radius_m":10.0}"#)
                .unwrap();
        assert!(query.validate().is_err());
    }

    #[test]
    fn coordinate_checks() {
        assert!(is_valid_latitude(0.0));
        assert!(!is_valid_latitude(-90.1));
        assert!(is_valid_longitude(-180.0));
        assert!(!is_valid_longitude(f64::NAN));
    }
}
