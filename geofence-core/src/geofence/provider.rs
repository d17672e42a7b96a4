//! Collaborator interfaces consumed by the registry.
//!
//! The platform geofencing engine, the point-of-interest lookup, the
//! permission check, and the thread check are all injected. None of them
//! are owned by this crate.

use std::thread::{self, ThreadId};

use futures::future::BoxFuture;

use super::error::{GeofenceResult, ProviderError};
use super::types::{CallbackTarget, Feature, GeofencingRequest};
use crate::location::LocationQuery;

/// Completion of a provider batch request.
pub type ProviderFuture = BoxFuture<'static, Result<(), ProviderError>>;

/// Platform geofencing engine.
///
/// Both calls must return immediately. The returned future resolves once
/// the provider has accepted or rejected the whole batch; there is no
/// per-geofence result.
pub trait GeofenceProvider: Send + Sync {
    /// Submits one add batch whose transitions are delivered to `target`.
    fn add_geofences(&self, request: GeofencingRequest, target: CallbackTarget) -> ProviderFuture;

    /// Submits one remove batch keyed by request ID.
    fn remove_geofences(&self, request_ids: Vec<String>) -> ProviderFuture;
}

/// Lookup of nearby points of interest.
pub trait FeatureSource: Send + Sync {
    /// Returns at most `max_count` features within the query radius.
    ///
    /// # Errors
    ///
    /// Returns [`GeofenceError::FeatureLookup`](super::GeofenceError::FeatureLookup)
    /// if the lookup cannot be performed.
    fn query(&self, location: &LocationQuery, max_count: usize) -> GeofenceResult<Vec<Feature>>;
}

/// Fine-location authorization check.
pub trait PermissionCheck: Send + Sync {
    /// Returns true when the process may use precise location.
    fn is_location_authorized(&self) -> bool;
}

/// Check that the caller runs on the designated control context.
pub trait ExecutionContext: Send + Sync {
    /// Returns true when invoked from the required context.
    fn is_current(&self) -> bool;
}

/// Pins registry calls to one OS thread.
///
/// # Example
///
/// ```
/// use geofence_core::geofence::{ExecutionContext, ThreadAffinity};
///
/// let affinity = ThreadAffinity::current();
/// assert!(affinity.is_current());
///
/// let other = std::thread::spawn(move || affinity.is_current()).join().unwrap();
/// assert!(!other);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadAffinity {
    thread: ThreadId,
}

impl ThreadAffinity {
    /// Binds to the calling thread.
    #[must_use]
    pub fn current() -> Self {
        Self::for_thread(thread::current().id())
    }

    /// Binds to a specific thread.
    #[must_use]
    pub const fn for_thread(thread: ThreadId) -> Self {
        Self { thread }
    }

    /// The required thread.
    #[must_use]
    pub const fn thread(&self) -> ThreadId {
        self.thread
    }
}

impl ExecutionContext for ThreadAffinity {
    fn is_current(&self) -> bool {
        thread::current().id() == self.thread
    }
}
