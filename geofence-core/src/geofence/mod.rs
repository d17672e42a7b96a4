//! Geofence registry for nearby points of interest.
//!
//! Turns a location update into a batch of circular geofences around the
//! nearest features and keeps that batch registered with the platform
//! geofencing provider.
//!
//! # Architecture
//!
//! ```text
//! location update
//!     │
//!     ▼
//! GeofenceRegistry ──query──▶ FeatureSource
//!     │
//!     ├──add batch───▶ GeofenceProvider ──▶ transitions to CallbackTarget
//!     └──remove batch─▶ GeofenceProvider
//!                           │
//!                           ▼ (async, per batch)
//!                     GeofenceListener hooks
//! ```
//!
//! # Preconditions
//!
//! | Check | Error |
//! |-------|-------|
//! | Caller on control context | `WrongThread` |
//! | Fine location authorized | `PermissionDenied` |
//!
//! Both are checked, in that order, before any collaborator is called.
//!
//! # Known Hazards
//!
//! - Registrations accumulate; the per-query cap does not bound the active
//!   set across registrations.
//! - By default invalidation leaves the in-memory set intact.
//! - By default both remove hooks fire on an accepted remove batch
//!   (`on_remove_failed` with no error, then `on_remove_succeeded`) and a
//!   rejected one fires neither. See [`RegistryConfig`].
//! - `register` submits no add batch while the active set is empty, since
//!   the platform refuses an add request with zero geofences; the handle
//!   reports [`BatchOutcome::Skipped`] instead of one add per call.
//!   `invalidate` always submits, even with no IDs.

mod batch;
mod config;
mod error;
mod listener;
mod provider;
mod registry;
mod types;

pub use batch::{BatchHandle, BatchOperation, BatchOutcome};
pub use config::RegistryConfig;
pub use error::{
    GeofenceError, GeofenceResult, ProviderError, STATUS_GEOFENCE_NOT_AVAILABLE,
    STATUS_TOO_MANY_CALLBACK_TARGETS, STATUS_TOO_MANY_GEOFENCES,
};
pub use listener::{ChannelListener, GeofenceEvent, GeofenceListener, NoopListener};
pub use provider::{
    ExecutionContext, FeatureSource, GeofenceProvider, PermissionCheck, ProviderFuture,
    ThreadAffinity,
};
pub use registry::GeofenceRegistry;
pub use types::{
    CallbackTarget, Expiration, Feature, GeofenceDefinition, GeofenceEntry, GeofencingRequest,
    InitialTrigger, Transitions, GEOFENCE_MAX_COUNT, MAX_REQUEST_ID_LEN,
    PREFERRED_GEOFENCE_RADIUS_M,
};
