//! Error types for geofence registry operations.
//!
//! Synchronous precondition failures (`PermissionDenied`, `WrongThread`,
//! invalid input) are returned directly from `register`/`invalidate`.
//! Provider-side failures only ever arrive through a batch outcome and the
//! listener hooks.

use thiserror::Error;

/// Status code reported when geofencing is unavailable on the device.
pub const STATUS_GEOFENCE_NOT_AVAILABLE: i32 = 1000;

/// Status code reported when the app exceeds the provider's geofence quota.
pub const STATUS_TOO_MANY_GEOFENCES: i32 = 1001;

/// Status code reported when too many callback targets are registered.
pub const STATUS_TOO_MANY_CALLBACK_TARGETS: i32 = 1002;

/// Failure reported by the platform geofencing provider for a whole batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Geofencing service is not available (e.g. location turned off).
    #[error("Geofencing not available")]
    NotAvailable,

    /// Registering the batch would exceed the provider's geofence quota.
    #[error("Too many geofences registered")]
    TooManyGeofences,

    /// Too many distinct callback targets registered with the provider.
    #[error("Too many callback targets registered")]
    TooManyCallbackTargets,

    /// Any other provider status.
    #[error("Provider error {code}: {message}")]
    Other {
        /// Raw status code from the provider.
        code: i32,
        /// Provider-supplied message.
        message: String,
    },
}

impl ProviderError {
    /// Maps a raw provider status code to an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use geofence_core::geofence::ProviderError;
    ///
    /// assert_eq!(ProviderError::from_status(1001, ""), ProviderError::TooManyGeofences);
    /// assert_eq!(ProviderError::from_status(13, "internal").status_code(), 13);
    /// ```
    #[must_use]
    pub fn from_status(code: i32, message: impl Into<String>) -> Self {
        match code {
            STATUS_GEOFENCE_NOT_AVAILABLE => Self::NotAvailable,
            STATUS_TOO_MANY_GEOFENCES => Self::TooManyGeofences,
            STATUS_TOO_MANY_CALLBACK_TARGETS => Self::TooManyCallbackTargets,
            _ => Self::Other {
                code,
                message: message.into(),
            },
        }
    }

    /// Returns the raw provider status code.
    #[must_use]
    pub const fn status_code(&self) -> i32 {
        match self {
            Self::NotAvailable => STATUS_GEOFENCE_NOT_AVAILABLE,
            Self::TooManyGeofences => STATUS_TOO_MANY_GEOFENCES,
            Self::TooManyCallbackTargets => STATUS_TOO_MANY_CALLBACK_TARGETS,
            Self::Other { code, .. } => *code,
        }
    }
}

/// Errors that can occur during geofence registry operations.
#[derive(Debug, Error)]
pub enum GeofenceError {
    /// Fine-location authorization is not granted.
    #[error("Geofence registry requires fine location permission")]
    PermissionDenied,

    /// Called outside the configured control thread.
    #[error("Geofence registry must be called from the control thread")]
    WrongThread,

    /// Location query is malformed.
    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    /// A feature cannot be turned into a geofence definition.
    #[error("Invalid feature {id}: {reason}")]
    InvalidFeature {
        /// The offending feature ID.
        id: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Feature source lookup failed.
    #[error("Feature lookup failed: {0}")]
    FeatureLookup(String),

    /// Provider rejected an add batch.
    #[error("Failed to add geofences: {0}")]
    ProviderAddFailed(#[source] ProviderError),

    /// Provider rejected a remove batch.
    #[error("Failed to remove geofences: {0}")]
    ProviderRemoveFailed(#[source] ProviderError),

    /// Completion task was cancelled or panicked before reporting.
    #[error("Batch task failed: {0}")]
    TaskFailed(String),

    /// Registry configuration is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for geofence registry operations.
pub type GeofenceResult<T> = Result<T, GeofenceError>;

impl From<serde_json::Error> for GeofenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}
