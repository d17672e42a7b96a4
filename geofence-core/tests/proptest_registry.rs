//! Property-based tests for geofence registration and invalidation.
//!
//! These tests verify:
//! - P1: one registration appends exactly the features returned, shaped as
//!   fixed-radius enter/exit geofences
//! - P2: add batches are cumulative across registrations
//! - P3: remove batches carry exactly the active set's IDs, in order
//! - P4: failed preconditions never reach a collaborator

#![allow(clippy::float_cmp)]

mod helpers;

use geofence_core::geofence::{
    Feature, GeofenceError, RegistryConfig, Transitions, PREFERRED_GEOFENCE_RADIUS_M,
};
use geofence_core::location::LocationQuery;
use geofence_core::testing::RecordingProvider;
use helpers::{features, Harness};
use proptest::prelude::*;
use tokio::runtime::{Builder, Runtime};

fn runtime() -> Runtime {
    Builder::new_current_thread()
        .build()
        .expect("runtime should build")
}

fn harness(rt: &Runtime, initial: Vec<Feature>) -> Harness {
    Harness::build(
        initial,
        RecordingProvider::new(),
        RegistryConfig::default(),
        rt.handle().clone(),
    )
}

/// Splits up to 100 features across 1..=5 registrations.
fn registration_sizes() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0usize..=20, 1..=5)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: registering against k features adds exactly k entries, each
    /// a 125 m enter/exit geofence keyed by the feature ID.
    #[test]
    fn p1_register_appends_one_entry_per_feature(
        k in 0usize..=100,
        lat in -89.0f64..=89.0,
        lon in -179.0f64..=179.0,
        radius in 1.0f64..5_000.0,
    ) {
        let rt = runtime();
        let mut h = harness(&rt, features("poi-", k));
        let query = LocationQuery::new(lat, lon, radius).unwrap();

        let batch = h.registry.register(&query).unwrap();

        prop_assert_eq!(h.registry.len(), k);
        for (entry, feature) in h.registry.active_set().iter().zip(features("poi-", k)) {
            prop_assert_eq!(entry.geofence.request_id(), feature.id.as_str());
            prop_assert_eq!(entry.geofence.radius_m(), PREFERRED_GEOFENCE_RADIUS_M);
            prop_assert_eq!(entry.geofence.transitions(), Transitions::ENTER | Transitions::EXIT);
        }

        prop_assert_eq!(batch.is_submitted(), k > 0);
        let adds = h.provider.add_requests();
        if k == 0 {
            prop_assert!(adds.is_empty());
        } else {
            prop_assert_eq!(adds.len(), 1);
            prop_assert_eq!(adds[0].geofences.len(), k);
        }
    }

    /// Property: the add batch submitted on the n-th registration contains
    /// the sum of all features registered so far.
    #[test]
    fn p2_add_batches_are_cumulative(sizes in registration_sizes()) {
        let rt = runtime();
        let mut h = harness(&rt, Vec::new());
        let query = LocationQuery::new(37.0, -122.0, 150.0).unwrap();

        let mut expected_ids = Vec::new();
        let mut last_batch_len = 0;
        for (step, size) in sizes.iter().enumerate() {
            let batch = features(&format!("r{step}-"), *size);
            expected_ids.extend(batch.iter().map(|f| f.id.clone()));
            h.features.set_features(batch);

            let handle = h.registry.register(&query).unwrap();
            if handle.is_submitted() {
                last_batch_len = handle.request_ids().len();
            }
        }

        let total: usize = sizes.iter().sum();
        prop_assert_eq!(h.registry.len(), total);
        prop_assert_eq!(h.registry.request_ids(), expected_ids.clone());
        if total > 0 {
            prop_assert_eq!(last_batch_len, total);
            let adds = h.provider.add_requests();
            prop_assert_eq!(adds.last().unwrap().request_ids(), expected_ids);
        }
    }

    /// Property: invalidate submits exactly the IDs present at call time.
    #[test]
    fn p3_invalidate_snapshots_active_ids(
        sizes in registration_sizes(),
        clear in any::<bool>(),
    ) {
        let rt = runtime();
        let config = RegistryConfig {
            clear_on_invalidate: clear,
            ..RegistryConfig::default()
        };
        let mut h = Harness::build(
            Vec::new(),
            RecordingProvider::new(),
            config,
            rt.handle().clone(),
        );
        let query = LocationQuery::new(37.0, -122.0, 150.0).unwrap();
        for (step, size) in sizes.iter().enumerate() {
            h.features.set_features(features(&format!("r{step}-"), *size));
            h.registry.register(&query).unwrap();
        }
        let before = h.registry.request_ids();

        let batch = h.registry.invalidate().unwrap();

        prop_assert!(batch.is_submitted());
        prop_assert_eq!(batch.request_ids(), before.as_slice());
        prop_assert_eq!(h.provider.remove_requests(), vec![before.clone()]);
        let expected_len = if clear { 0 } else { before.len() };
        prop_assert_eq!(h.registry.len(), expected_len);
    }

    /// Property: whenever the thread or permission check fails, the call
    /// errors and neither the feature source nor the provider is touched.
    #[test]
    fn p4_failed_preconditions_touch_nothing(
        on_thread in any::<bool>(),
        authorized in any::<bool>(),
        invalidate_first in any::<bool>(),
    ) {
        prop_assume!(!(on_thread && authorized));

        let rt = runtime();
        let mut h = harness(&rt, features("poi-", 3));
        h.context.set_current(on_thread);
        h.permission.set_granted(authorized);
        let query = LocationQuery::new(37.0, -122.0, 150.0).unwrap();

        let result = if invalidate_first {
            h.registry.invalidate().map(|_| ())
        } else {
            h.registry.register(&query).map(|_| ())
        };

        let err = result.unwrap_err();
        if on_thread {
            prop_assert!(matches!(err, GeofenceError::PermissionDenied));
        } else {
            prop_assert!(matches!(err, GeofenceError::WrongThread));
        }
        prop_assert!(h.features.queries().is_empty());
        prop_assert_eq!(h.provider.call_count(), 0);
        prop_assert!(h.registry.is_empty());
    }
}
