//! Geofence data types.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::error::{GeofenceError, GeofenceResult};
use crate::location::{is_valid_latitude, is_valid_longitude};

/// Maximum number of features requested per registration.
pub const GEOFENCE_MAX_COUNT: usize = 100;

/// Radius of every registered geofence, in meters.
pub const PREFERRED_GEOFENCE_RADIUS_M: f64 = 125.0;

/// Longest request ID the provider accepts, in bytes.
pub const MAX_REQUEST_ID_LEN: usize = 100;

bitflags::bitflags! {
    /// Transitions a geofence is monitored for.
    ///
    /// Bit values match the platform constants.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Transitions: u8 {
        /// Device entered the region.
        const ENTER = 1;
        /// Device left the region.
        const EXIT = 2;
        /// Device stayed inside the region for the loitering delay.
        const DWELL = 4;
    }
}

/// How long the provider keeps a geofence alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiration {
    /// Kept until explicitly removed.
    Never,
    /// Dropped by the provider after the given duration.
    After(Duration),
}

/// Which transitions fire immediately if the device is already inside a
/// geofence when it is added.
///
/// | Trigger | Platform Flag |
/// |---------|---------------|
/// | Enter   | 1             |
/// | Exit    | 2             |
/// | Dwell   | 4             |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InitialTrigger {
    /// Fire an enter event immediately.
    Enter,
    /// Fire an exit event immediately.
    Exit,
    /// Fire a dwell event once the loitering delay passes.
    #[default]
    Dwell,
}

impl InitialTrigger {
    /// Returns the platform flag value for this trigger.
    #[must_use]
    pub const fn flag(self) -> u8 {
        match self {
            Self::Enter => 1,
            Self::Exit => 2,
            Self::Dwell => 4,
        }
    }
}

/// A nearby point of interest returned by the feature source.
///
/// The registry treats everything except the ID and position as opaque
/// payload carried alongside the geofence it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Stable feature ID, reused as the geofence request ID.
    pub id: String,
    /// Feature latitude.
    pub latitude: f64,
    /// Feature longitude.
    pub longitude: f64,
}

impl Feature {
    /// Creates a new feature record.
    #[must_use]
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: id.into(),
            latitude,
            longitude,
        }
    }
}

/// A circular region submitted to the geofencing provider.
///
/// # Example
///
/// ```
/// use geofence_core::geofence::{Expiration, GeofenceDefinition, Transitions};
///
/// let geofence = GeofenceDefinition::new(
///     "poi-42",
///     37.0,
///     -122.0,
///     125.0,
///     Expiration::Never,
///     Transitions::ENTER | Transitions::EXIT,
/// )
/// .unwrap();
/// assert_eq!(geofence.request_id(), "poi-42");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GeofenceDefinition {
    request_id: String,
    latitude: f64,
    longitude: f64,
    radius_m: f64,
    expiration: Expiration,
    transitions: Transitions,
}

impl GeofenceDefinition {
    /// Builds a validated geofence definition.
    ///
    /// # Errors
    ///
    /// Returns [`GeofenceError::InvalidFeature`] if the request ID is empty or
    /// longer than [`MAX_REQUEST_ID_LEN`], the center is out of range, the
    /// radius is not positive, or no transitions are requested.
    pub fn new(
        request_id: impl Into<String>,
        latitude: f64,
        longitude: f64,
        radius_m: f64,
        expiration: Expiration,
        transitions: Transitions,
    ) -> GeofenceResult<Self> {
        let request_id = request_id.into();

        let reason = if request_id.is_empty() {
            Some("empty request id".to_string())
        } else if request_id.len() > MAX_REQUEST_ID_LEN {
            Some(format!(
                "request id longer than {MAX_REQUEST_ID_LEN} bytes"
            ))
        } else if !is_valid_latitude(latitude) || !is_valid_longitude(longitude) {
            Some(format!("center ({latitude}, {longitude}) out of range"))
        } else if !(radius_m.is_finite() && radius_m > 0.0) {
            Some(format!("radius must be positive, got {radius_m}"))
        } else if transitions.is_empty() {
            Some("no transitions requested".to_string())
        } else {
            None
        };

        if let Some(reason) = reason {
            return Err(GeofenceError::InvalidFeature {
                id: request_id,
                reason,
            });
        }

        Ok(Self {
            request_id,
            latitude,
            longitude,
            radius_m,
            expiration,
            transitions,
        })
    }

    /// Builds the never-expiring enter/exit geofence for a feature.
    ///
    /// # Errors
    ///
    /// Same conditions as [`GeofenceDefinition::new`].
    pub fn for_feature(feature: &Feature, radius_m: f64) -> GeofenceResult<Self> {
        Self::new(
            feature.id.clone(),
            feature.latitude,
            feature.longitude,
            radius_m,
            Expiration::Never,
            Transitions::ENTER | Transitions::EXIT,
        )
    }

    /// Request ID. Expected to be unique within the active set; not enforced.
    #[must_use]
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Center latitude.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Center longitude.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Radius in meters.
    #[must_use]
    pub const fn radius_m(&self) -> f64 {
        self.radius_m
    }

    /// Expiration policy.
    #[must_use]
    pub const fn expiration(&self) -> Expiration {
        self.expiration
    }

    /// Monitored transitions.
    #[must_use]
    pub const fn transitions(&self) -> Transitions {
        self.transitions
    }
}

/// A submitted geofence paired with the feature it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct GeofenceEntry {
    /// The definition sent to the provider.
    pub geofence: GeofenceDefinition,
    /// The source feature.
    pub feature: Feature,
    /// When the entry was appended to the active set.
    pub registered_at: DateTime<Utc>,
}

/// One add batch as handed to the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct GeofencingRequest {
    /// Trigger applied to geofences the device is already inside.
    pub initial_trigger: InitialTrigger,
    /// Every definition in the batch.
    pub geofences: Vec<GeofenceDefinition>,
}

impl GeofencingRequest {
    /// Request IDs in batch order.
    #[must_use]
    pub fn request_ids(&self) -> Vec<String> {
        self.geofences
            .iter()
            .map(|g| g.request_id().to_string())
            .collect()
    }
}

/// Identifies where the provider delivers transition events.
///
/// A single target is shared by every add batch a registry submits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallbackTarget(String);

impl CallbackTarget {
    /// Name of the default transition receiver.
    pub const DEFAULT_NAME: &'static str = "geofence-transitions";

    /// Creates a callback target with the given receiver name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Receiver name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Default for CallbackTarget {
    fn default() -> Self {
        Self::new(Self::DEFAULT_NAME)
    }
}
