//! Geofence Core Library
//!
//! Keeps a bounded set of point-of-interest geofences registered with a
//! platform geofencing provider. The provider, the feature lookup, and the
//! permission and thread checks are injected by the host application.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![deny(unsafe_code)]

pub mod geofence;
pub mod location;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use geofence::{GeofenceError, GeofenceRegistry, GeofenceResult};
