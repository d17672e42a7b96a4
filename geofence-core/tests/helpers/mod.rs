//! Reusable fixtures for registry integration tests.
//!
//! Each `Harness` wires a `GeofenceRegistry` to shared-state mocks from
//! `geofence_core::testing`, so the test keeps handles for inspection.

#![allow(dead_code)]

use std::sync::Arc;

use geofence_core::geofence::{
    ChannelListener, Feature, GeofenceEvent, GeofenceRegistry, RegistryConfig,
};
use geofence_core::location::LocationQuery;
use geofence_core::testing::{
    FixedContext, RecordingProvider, StaticFeatureSource, StaticPermission,
};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedReceiver;

/// A registry plus handles to every collaborator it was built with.
pub struct Harness {
    pub registry: GeofenceRegistry,
    pub provider: RecordingProvider,
    pub features: StaticFeatureSource,
    pub permission: StaticPermission,
    pub context: FixedContext,
    pub events: UnboundedReceiver<GeofenceEvent>,
}

impl Harness {
    /// Builds a registry with default configuration on the current runtime.
    pub fn new(features: Vec<Feature>) -> Self {
        Self::build(
            features,
            RecordingProvider::new(),
            RegistryConfig::default(),
            Handle::current(),
        )
    }

    /// Builds a registry whose provider holds completions until released.
    pub fn deferred(features: Vec<Feature>) -> Self {
        Self::build(
            features,
            RecordingProvider::deferred(),
            RegistryConfig::default(),
            Handle::current(),
        )
    }

    /// Builds a registry with an explicit configuration.
    pub fn with_config(features: Vec<Feature>, config: RegistryConfig) -> Self {
        Self::build(features, RecordingProvider::new(), config, Handle::current())
    }

    /// Fully explicit constructor, usable outside an async context.
    pub fn build(
        features: Vec<Feature>,
        provider: RecordingProvider,
        config: RegistryConfig,
        runtime: Handle,
    ) -> Self {
        let features = StaticFeatureSource::new(features);
        let permission = StaticPermission::granted();
        let context = FixedContext::current();
        let (listener, events) = ChannelListener::new();

        let registry = GeofenceRegistry::new(
            provider.clone(),
            features.clone(),
            permission.clone(),
            context.clone(),
            runtime,
        )
        .with_config(config)
        .expect("config should be valid")
        .with_listener(Arc::new(listener));

        Self {
            registry,
            provider,
            features,
            permission,
            context,
            events,
        }
    }
}

/// The query used throughout the scenarios.
pub fn sample_query() -> LocationQuery {
    LocationQuery::new(37.0, -122.0, 150.0).expect("valid query")
}

/// `count` distinct features named `{prefix}{i}` spread around a point.
pub fn features(prefix: &str, count: usize) -> Vec<Feature> {
    (0..count)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let offset = i as f64 * 0.001;
            Feature::new(format!("{prefix}{i}"), 37.0 + offset, -122.0 - offset)
        })
        .collect()
}
