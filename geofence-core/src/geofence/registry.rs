//! Geofence registry: reconciles nearby features with the platform provider.
//!
//! # Lifecycle
//!
//! - `register` queries the feature source, appends one entry per feature
//!   to the active set, then submits the whole active set as one add batch.
//! - `invalidate` snapshots the request IDs of the active set and submits
//!   one remove batch.
//!
//! Registrations accumulate until invalidation. With the default
//! configuration invalidation does not clear the in-memory set, so a later
//! registration resubmits previously invalidated entries as well.

use std::sync::Arc;

use chrono::Utc;
use log::{debug, info, warn};
use tokio::runtime::Handle;

use super::batch::{BatchHandle, BatchOperation, BatchOutcome};
use super::config::RegistryConfig;
use super::error::{GeofenceError, GeofenceResult};
use super::listener::{GeofenceListener, NoopListener};
use super::provider::{
    ExecutionContext, FeatureSource, GeofenceProvider, PermissionCheck, ProviderFuture,
};
use super::types::{
    CallbackTarget, GeofenceDefinition, GeofenceEntry, GeofencingRequest,
    PREFERRED_GEOFENCE_RADIUS_M,
};
use crate::location::{coarse_cell, LocationQuery};

/// Keeps a batch of feature-derived geofences registered with a provider.
///
/// Every public operation must run on the control context configured at
/// construction and requires fine-location authorization. Both are checked
/// before any collaborator is called.
///
/// Provider completions run as tasks on the injected runtime and report
/// through the [`GeofenceListener`]; they never touch the active set.
///
/// # Example
///
/// ```ignore
/// use geofence_core::geofence::{GeofenceRegistry, ThreadAffinity};
/// use geofence_core::location::LocationQuery;
///
/// let mut registry = GeofenceRegistry::new(
///     platform_provider,
///     poi_index,
///     location_permission,
///     ThreadAffinity::current(),
///     tokio::runtime::Handle::current(),
/// );
///
/// let query = LocationQuery::new(37.0, -122.0, 150.0)?;
/// let batch = registry.register(&query)?;
/// // ... later
/// registry.invalidate()?;
/// ```
pub struct GeofenceRegistry {
    provider: Box<dyn GeofenceProvider>,
    features: Box<dyn FeatureSource>,
    permission: Box<dyn PermissionCheck>,
    context: Box<dyn ExecutionContext>,
    listener: Arc<dyn GeofenceListener>,
    runtime: Handle,
    config: RegistryConfig,
    target: CallbackTarget,
    geofences: Vec<GeofenceEntry>,
}

impl GeofenceRegistry {
    /// Creates a registry with default configuration and a no-op listener.
    ///
    /// # Arguments
    ///
    /// * `provider` - Platform geofencing engine
    /// * `features` - Nearby point-of-interest lookup
    /// * `permission` - Fine-location authorization check
    /// * `context` - Control context every call must run on
    /// * `runtime` - Runtime that drives provider completions
    pub fn new(
        provider: impl GeofenceProvider + 'static,
        features: impl FeatureSource + 'static,
        permission: impl PermissionCheck + 'static,
        context: impl ExecutionContext + 'static,
        runtime: Handle,
    ) -> Self {
        Self {
            provider: Box::new(provider),
            features: Box::new(features),
            permission: Box::new(permission),
            context: Box::new(context),
            listener: Arc::new(NoopListener),
            runtime,
            config: RegistryConfig::default(),
            target: CallbackTarget::default(),
            geofences: Vec::new(),
        }
    }

    /// Replaces the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GeofenceError::InvalidConfig`] if the configuration fails
    /// validation.
    pub fn with_config(mut self, config: RegistryConfig) -> GeofenceResult<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Sets the listener that receives batch completions.
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn GeofenceListener>) -> Self {
        self.listener = listener;
        self
    }

    /// Sets where the provider delivers transition events.
    #[must_use]
    pub fn with_callback_target(mut self, target: CallbackTarget) -> Self {
        self.target = target;
        self
    }

    /// Registers geofences for the features near `location`.
    ///
    /// Appends one entry per returned feature, then submits every
    /// definition in the active set (including earlier, not yet invalidated
    /// registrations) as a single add batch. Returns without waiting for the
    /// provider.
    ///
    /// If the active set is still empty after the lookup, no batch is
    /// submitted and the handle reports [`BatchOutcome::Skipped`].
    ///
    /// # Errors
    ///
    /// - [`GeofenceError::WrongThread`] if called off the control context
    /// - [`GeofenceError::PermissionDenied`] without location authorization
    /// - [`GeofenceError::InvalidLocation`] for a malformed query
    /// - [`GeofenceError::FeatureLookup`] if the feature source fails
    /// - [`GeofenceError::InvalidFeature`] if a feature cannot become a
    ///   geofence; the active set is left unchanged
    pub fn register(&mut self, location: &LocationQuery) -> GeofenceResult<BatchHandle> {
        self.check_preconditions("register")?;
        location.validate()?;

        let cell = coarse_cell(location.latitude(), location.longitude());
        let cap = self.config.max_features_per_query;

        let mut features = self.features.query(location, cap)?;
        if features.len() > cap {
            warn!(
                "Feature source returned {} features near {cell}, truncating to {cap}",
                features.len()
            );
            features.truncate(cap);
        }

        let registered_at = Utc::now();
        let entries = features
            .into_iter()
            .map(|feature| {
                let geofence =
                    GeofenceDefinition::for_feature(&feature, PREFERRED_GEOFENCE_RADIUS_M)?;
                Ok(GeofenceEntry {
                    geofence,
                    feature,
                    registered_at,
                })
            })
            .collect::<GeofenceResult<Vec<_>>>()?;

        debug!(
            "Registering {} geofences near {cell} ({} already active)",
            entries.len(),
            self.geofences.len()
        );
        self.geofences.extend(entries);

        let request = GeofencingRequest {
            initial_trigger: self.config.initial_trigger,
            geofences: self.collect_geofences(),
        };
        if request.geofences.is_empty() {
            debug!("No geofences near {cell}, add batch not submitted");
            return Ok(BatchHandle::skipped(BatchOperation::Add));
        }

        let request_ids = request.request_ids();
        info!(
            "Submitting add batch of {} geofences to {}",
            request_ids.len(),
            self.target.name()
        );

        let pending = self.provider.add_geofences(request, self.target.clone());
        let task = self
            .runtime
            .spawn(complete_add(pending, Arc::clone(&self.listener)));

        Ok(BatchHandle::submitted(BatchOperation::Add, request_ids, task))
    }

    /// Removes every geofence in the active set from the provider.
    ///
    /// The request IDs are snapshotted at call time and submitted as one
    /// remove batch, even when the active set is empty; the provider decides
    /// what an empty removal means. Unless `clear_on_invalidate` is set, the
    /// in-memory active set is left as it was.
    ///
    /// # Errors
    ///
    /// - [`GeofenceError::WrongThread`] if called off the control context
    /// - [`GeofenceError::PermissionDenied`] without location authorization
    pub fn invalidate(&mut self) -> GeofenceResult<BatchHandle> {
        self.check_preconditions("invalidate")?;

        let expired = self.request_ids();
        if self.config.clear_on_invalidate {
            self.geofences.clear();
        }

        info!("Submitting remove batch of {} geofences", expired.len());

        let pending = self.provider.remove_geofences(expired.clone());
        let task = self.runtime.spawn(complete_remove(
            pending,
            Arc::clone(&self.listener),
            self.config.report_remove_failures,
        ));

        Ok(BatchHandle::submitted(BatchOperation::Remove, expired, task))
    }

    /// Entries currently believed to be registered, in insertion order.
    #[must_use]
    pub fn active_set(&self) -> &[GeofenceEntry] {
        &self.geofences
    }

    /// Number of entries in the active set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.geofences.len()
    }

    /// Returns true if the active set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.geofences.is_empty()
    }

    /// Request IDs of the active set, in insertion order.
    #[must_use]
    pub fn request_ids(&self) -> Vec<String> {
        self.geofences
            .iter()
            .map(|entry| entry.geofence.request_id().to_string())
            .collect()
    }

    /// Current configuration.
    #[must_use]
    pub const fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Target that receives transition events.
    #[must_use]
    pub const fn callback_target(&self) -> &CallbackTarget {
        &self.target
    }

    fn check_preconditions(&self, operation: &str) -> GeofenceResult<()> {
        if !self.context.is_current() {
            warn!("{operation} called off the control thread");
            return Err(GeofenceError::WrongThread);
        }
        if !self.permission.is_location_authorized() {
            warn!("{operation} called without location permission");
            return Err(GeofenceError::PermissionDenied);
        }
        Ok(())
    }

    fn collect_geofences(&self) -> Vec<GeofenceDefinition> {
        self.geofences
            .iter()
            .map(|entry| entry.geofence.clone())
            .collect()
    }
}

async fn complete_add(pending: ProviderFuture, listener: Arc<dyn GeofenceListener>) -> BatchOutcome {
    match pending.await {
        Ok(()) => {
            listener.on_add_succeeded();
            BatchOutcome::Accepted
        }
        Err(e) => {
            let err = GeofenceError::ProviderAddFailed(e);
            warn!("{err}");
            listener.on_add_failed(&err);
            BatchOutcome::Rejected(err)
        }
    }
}

async fn complete_remove(
    pending: ProviderFuture,
    listener: Arc<dyn GeofenceListener>,
    report_failures: bool,
) -> BatchOutcome {
    match pending.await {
        Ok(()) => {
            // Both hooks hang off acceptance unless failures are reported.
            if !report_failures {
                listener.on_remove_failed(None);
            }
            listener.on_remove_succeeded();
            BatchOutcome::Accepted
        }
        Err(e) => {
            let err = GeofenceError::ProviderRemoveFailed(e);
            warn!("{err}");
            if report_failures {
                listener.on_remove_failed(Some(&err));
            }
            BatchOutcome::Rejected(err)
        }
    }
}
