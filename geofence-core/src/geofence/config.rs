//! Registry configuration.

use serde::{Deserialize, Serialize};

use super::error::{GeofenceError, GeofenceResult};
use super::types::{InitialTrigger, GEOFENCE_MAX_COUNT};

/// Settings for a [`GeofenceRegistry`](super::GeofenceRegistry).
///
/// Defaults reproduce the established behavior: 100 features per query,
/// dwell initial trigger, an invalidation that leaves the in-memory set
/// untouched, and remove hooks that both hang off acceptance.
///
/// The geofence radius is not configurable; every geofence uses
/// [`PREFERRED_GEOFENCE_RADIUS_M`](super::PREFERRED_GEOFENCE_RADIUS_M).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Cap passed to the feature source on each registration.
    pub max_features_per_query: usize,

    /// Initial trigger attached to every add batch.
    pub initial_trigger: InitialTrigger,

    /// Clear the in-memory active set once a remove batch is submitted.
    ///
    /// Off by default: the set stays stale after invalidation and the next
    /// registration resubmits the old entries alongside the new ones.
    pub clear_on_invalidate: bool,

    /// Invoke `on_remove_failed` when the provider rejects a remove batch.
    ///
    /// Off by default: an accepted remove batch fires `on_remove_failed`
    /// (with no error) and then `on_remove_succeeded`, and a rejected one
    /// fires nothing. Rejections are then visible solely through the log
    /// and the batch outcome.
    pub report_remove_failures: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_features_per_query: GEOFENCE_MAX_COUNT,
            initial_trigger: InitialTrigger::default(),
            clear_on_invalidate: false,
            report_remove_failures: false,
        }
    }
}

impl RegistryConfig {
    /// Checks that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`GeofenceError::InvalidConfig`] if the query cap is zero.
    pub fn validate(&self) -> GeofenceResult<()> {
        if self.max_features_per_query == 0 {
            return Err(GeofenceError::InvalidConfig(
                "max_features_per_query must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Parses and validates a configuration from JSON.
    ///
    /// Missing fields take their default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails validation.
    pub fn from_json(json: &str) -> GeofenceResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Converts this configuration to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (extremely rare).
    pub fn to_json(&self) -> GeofenceResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
