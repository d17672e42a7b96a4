//! Mock collaborators for exercising the registry without a platform.
//!
//! Every mock is cheaply cloneable and clones share state, so a test can
//! hand one clone to the registry and inspect another.
//!
//! Only compiled for tests or with the `test-utils` feature.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{self, FutureExt};
use tokio::sync::oneshot;

use crate::geofence::{
    CallbackTarget, ExecutionContext, Feature, FeatureSource, GeofenceError, GeofenceProvider,
    GeofenceResult, GeofencingRequest, PermissionCheck, ProviderError, ProviderFuture,
};
use crate::location::LocationQuery;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One provider call as seen by [`RecordingProvider`].
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderCall {
    /// `add_geofences`
    Add {
        /// The submitted request.
        request: GeofencingRequest,
        /// The submitted callback target.
        target: CallbackTarget,
    },
    /// `remove_geofences`
    Remove {
        /// The submitted request IDs.
        request_ids: Vec<String>,
    },
}

struct ProviderState {
    calls: Vec<ProviderCall>,
    add_result: Result<(), ProviderError>,
    remove_result: Result<(), ProviderError>,
    deferred: bool,
    pending: VecDeque<oneshot::Sender<Result<(), ProviderError>>>,
}

/// Provider that records every batch and answers with a configurable result.
///
/// In deferred mode completions are held until [`complete_next`] is called,
/// which lets tests observe the registry between submission and completion.
///
/// [`complete_next`]: RecordingProvider::complete_next
#[derive(Clone)]
pub struct RecordingProvider {
    state: Arc<Mutex<ProviderState>>,
}

impl Default for RecordingProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingProvider {
    /// Provider that accepts every batch immediately.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ProviderState {
                calls: Vec::new(),
                add_result: Ok(()),
                remove_result: Ok(()),
                deferred: false,
                pending: VecDeque::new(),
            })),
        }
    }

    /// Provider whose batches stay pending until completed by the test.
    #[must_use]
    pub fn deferred() -> Self {
        let provider = Self::new();
        lock(&provider.state).deferred = true;
        provider
    }

    /// Sets the result returned for subsequent add batches.
    pub fn set_add_result(&self, result: Result<(), ProviderError>) {
        lock(&self.state).add_result = result;
    }

    /// Sets the result returned for subsequent remove batches.
    pub fn set_remove_result(&self, result: Result<(), ProviderError>) {
        lock(&self.state).remove_result = result;
    }

    /// Resolves the oldest pending batch in deferred mode.
    ///
    /// Returns false if nothing was pending or its task is gone.
    pub fn complete_next(&self, result: Result<(), ProviderError>) -> bool {
        let sender = lock(&self.state).pending.pop_front();
        sender.is_some_and(|tx| tx.send(result).is_ok())
    }

    /// Number of batches waiting for completion.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        lock(&self.state).pending.len()
    }

    /// Every call in order.
    #[must_use]
    pub fn calls(&self) -> Vec<ProviderCall> {
        lock(&self.state).calls.clone()
    }

    /// Total number of provider calls.
    #[must_use]
    pub fn call_count(&self) -> usize {
        lock(&self.state).calls.len()
    }

    /// Requests submitted through `add_geofences`.
    #[must_use]
    pub fn add_requests(&self) -> Vec<GeofencingRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ProviderCall::Add { request, .. } => Some(request),
                ProviderCall::Remove { .. } => None,
            })
            .collect()
    }

    /// Callback targets submitted through `add_geofences`.
    #[must_use]
    pub fn add_targets(&self) -> Vec<CallbackTarget> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ProviderCall::Add { target, .. } => Some(target),
                ProviderCall::Remove { .. } => None,
            })
            .collect()
    }

    /// ID lists submitted through `remove_geofences`.
    #[must_use]
    pub fn remove_requests(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ProviderCall::Remove { request_ids } => Some(request_ids),
                ProviderCall::Add { .. } => None,
            })
            .collect()
    }

    fn respond(&self, call: ProviderCall) -> ProviderFuture {
        let mut state = lock(&self.state);
        let result = match &call {
            ProviderCall::Add { .. } => state.add_result.clone(),
            ProviderCall::Remove { .. } => state.remove_result.clone(),
        };
        state.calls.push(call);

        if !state.deferred {
            return future::ready(result).boxed();
        }

        let (tx, rx) = oneshot::channel();
        state.pending.push_back(tx);
        async move {
            rx.await.unwrap_or_else(|_| {
                Err(ProviderError::Other {
                    code: -1,
                    message: "completion dropped".to_string(),
                })
            })
        }
        .boxed()
    }
}

impl GeofenceProvider for RecordingProvider {
    fn add_geofences(&self, request: GeofencingRequest, target: CallbackTarget) -> ProviderFuture {
        self.respond(ProviderCall::Add { request, target })
    }

    fn remove_geofences(&self, request_ids: Vec<String>) -> ProviderFuture {
        self.respond(ProviderCall::Remove { request_ids })
    }
}

struct SourceState {
    features: Vec<Feature>,
    failure: Option<String>,
    queries: Vec<(LocationQuery, usize)>,
}

/// Feature source returning a fixed list.
///
/// The list is returned verbatim, ignoring `max_count`, so callers can check
/// their own capping.
#[derive(Clone)]
pub struct StaticFeatureSource {
    state: Arc<Mutex<SourceState>>,
}

impl StaticFeatureSource {
    /// Source that always returns `features`.
    #[must_use]
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            state: Arc::new(Mutex::new(SourceState {
                features,
                failure: None,
                queries: Vec::new(),
            })),
        }
    }

    /// Replaces the returned features.
    pub fn set_features(&self, features: Vec<Feature>) {
        lock(&self.state).features = features;
    }

    /// Makes every subsequent lookup fail with `reason`.
    pub fn fail_with(&self, reason: impl Into<String>) {
        lock(&self.state).failure = Some(reason.into());
    }

    /// Every lookup as `(query, max_count)`.
    #[must_use]
    pub fn queries(&self) -> Vec<(LocationQuery, usize)> {
        lock(&self.state).queries.clone()
    }
}

impl FeatureSource for StaticFeatureSource {
    fn query(&self, location: &LocationQuery, max_count: usize) -> GeofenceResult<Vec<Feature>> {
        let mut state = lock(&self.state);
        state.queries.push((*location, max_count));
        match &state.failure {
            Some(reason) => Err(GeofenceError::FeatureLookup(reason.clone())),
            None => Ok(state.features.clone()),
        }
    }
}

/// Permission check with a switchable answer.
#[derive(Debug, Clone)]
pub struct StaticPermission(Arc<AtomicBool>);

impl StaticPermission {
    /// Permission that is granted.
    #[must_use]
    pub fn granted() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    /// Permission that is denied.
    #[must_use]
    pub fn denied() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// Grants or revokes the permission.
    pub fn set_granted(&self, granted: bool) {
        self.0.store(granted, Ordering::SeqCst);
    }
}

impl PermissionCheck for StaticPermission {
    fn is_location_authorized(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Execution context with a switchable answer.
#[derive(Debug, Clone)]
pub struct FixedContext(Arc<AtomicBool>);

impl FixedContext {
    /// Context that reports the caller is on the control thread.
    #[must_use]
    pub fn current() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    /// Context that reports the caller is elsewhere.
    #[must_use]
    pub fn elsewhere() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// Changes whether the caller counts as on the control thread.
    pub fn set_current(&self, current: bool) {
        self.0.store(current, Ordering::SeqCst);
    }
}

impl ExecutionContext for FixedContext {
    fn is_current(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(ids: &[&str]) -> GeofencingRequest {
        GeofencingRequest {
            initial_trigger: crate::geofence::InitialTrigger::Dwell,
            geofences: ids
                .iter()
                .map(|id| {
                    crate::geofence::GeofenceDefinition::for_feature(
                        &Feature::new(*id, 0.0, 0.0),
                        125.0,
                    )
                    .unwrap()
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn recording_provider_records_in_order() {
        let provider = RecordingProvider::new();

        provider
            .add_geofences(request(&["a"]), CallbackTarget::default())
            .await
            .unwrap();
        provider.remove_geofences(vec!["a".to_string()]).await.unwrap();

        assert_eq!(provider.call_count(), 2);
        assert!(matches!(provider.calls()[0], ProviderCall::Add { .. }));
        assert_eq!(provider.remove_requests(), vec![vec!["a"]]);
    }

    #[tokio::test]
    async fn recording_provider_returns_configured_error() {
        let provider = RecordingProvider::new();
        provider.set_add_result(Err(ProviderError::NotAvailable));

        let result = provider
            .add_geofences(request(&["a"]), CallbackTarget::default())
            .await;

        assert_eq!(result, Err(ProviderError::NotAvailable));
    }

    #[tokio::test]
    async fn deferred_provider_waits_for_completion() {
        let provider = RecordingProvider::deferred();
        let pending = provider.remove_geofences(vec!["x".to_string()]);
        assert_eq!(provider.pending_count(), 1);

        assert!(provider.complete_next(Err(ProviderError::TooManyGeofences)));
        assert_eq!(pending.await, Err(ProviderError::TooManyGeofences));
        assert!(!provider.complete_next(Ok(())));
    }

    #[test]
    fn static_source_records_queries() {
        let source = StaticFeatureSource::new(vec![Feature::new("a", 1.0, 2.0)]);
        let query = LocationQuery::new(1.0, 2.0, 30.0).unwrap();

        let features = source.query(&query, 10).unwrap();

        assert_eq!(features.len(), 1);
        assert_eq!(source.queries(), vec![(query, 10)]);
    }

    #[test]
    fn static_source_can_fail() {
        let source = StaticFeatureSource::new(Vec::new());
        source.fail_with("offline");
        let query = LocationQuery::new(1.0, 2.0, 30.0).unwrap();

        assert!(matches!(
            source.query(&query, 10),
            Err(GeofenceError::FeatureLookup(_))
        ));
    }

    #[test]
    fn switches_share_state_across_clones() {
        let permission = StaticPermission::denied();
        let clone = permission.clone();
        clone.set_granted(true);
        assert!(permission.is_location_authorized());

        let context = FixedContext::elsewhere();
        assert!(!context.is_current());
        context.clone().set_current(true);
        assert!(context.is_current());
    }
}
