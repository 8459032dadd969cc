use super::*;
use serde_json::json;
use std::sync::Arc;
use std::thread;

#[test]
fn test_defaults_at_start() {
    let store = DashboardStore::default();
    let state = store.read();

    assert_eq!(state.temperature, 21.0);
    assert_eq!(state.electricity_usage, 6.8);
    assert_eq!(state.average_electricity, 7.5);
    assert_eq!(state.water_usage, 150.0);
    assert_eq!(state.average_water, 120.0);
    assert!(state.heating_on);
    assert!(!state.lights_on_unoccupied);
    assert_eq!(state.tree_health, 10);
    assert_eq!(state.lost_leaves(), 0);
}

#[test]
fn test_patch_temperature_in_range() {
    let store = DashboardStore::default();

    for temp in 16..=28 {
        let before = store.read().last_updated;
        store.patch(&DashboardPatch::temperature(f64::from(temp)));

        let after = store.read();
        assert_eq!(after.temperature, f64::from(temp));
        assert!(after.last_updated > before);
    }
}

#[test]
fn test_patch_only_touches_supplied_fields() {
    let store = DashboardStore::default();
    let before = store.read();

    let patch: DashboardPatch = serde_json::from_value(json!({
        "waterUsage": 99.5,
        "lightsOnUnoccupied": true
    }))
    .unwrap();
    let after = store.patch(&patch);

    assert_eq!(after.water_usage, 99.5);
    assert!(after.lights_on_unoccupied);
    assert_eq!(after.temperature, before.temperature);
    assert_eq!(after.electricity_usage, before.electricity_usage);
    assert_eq!(after.tree_health, before.tree_health);
}

#[test]
fn test_patch_does_not_validate_temperature_range() {
    let store = DashboardStore::default();
    let after = store.patch(&DashboardPatch::temperature(40.0));
    assert_eq!(after.temperature, 40.0);
}

#[test]
fn test_tree_health_is_clamped() {
    let store = DashboardStore::default();

    let patch = DashboardPatch {
        tree_health: Some(14.0),
        ..DashboardPatch::default()
    };
    assert_eq!(store.patch(&patch).tree_health, 10);

    let patch = DashboardPatch {
        tree_health: Some(-3.0),
        ..DashboardPatch::default()
    };
    assert_eq!(store.patch(&patch).tree_health, 0);

    let patch = DashboardPatch {
        tree_health: Some(6.6),
        ..DashboardPatch::default()
    };
    let state = store.patch(&patch);
    assert_eq!(state.tree_health, 7);
    assert_eq!(state.lost_leaves(), 3);
}

#[test]
fn test_clamp_tree_health_nan() {
    assert_eq!(clamp_tree_health(f64::NAN), 0);
    assert_eq!(clamp_tree_health(f64::INFINITY), 10);
}

#[test]
fn test_patch_ignores_unknown_fields_and_last_updated() {
    let patch: DashboardPatch = serde_json::from_value(json!({
        "temperature": 23,
        "lastUpdated": "2001-01-01T00:00:00Z",
        "somethingElse": [1, 2, 3]
    }))
    .unwrap();

    assert_eq!(patch.field_count(), 1);

    let store = DashboardStore::default();
    let state = store.patch(&patch);
    assert_eq!(state.temperature, 23.0);
    // Server-stamped, not the 2001 value from the body
    assert!(state.last_updated.timestamp() > 978_307_200);
}

#[test]
fn test_patch_accepts_long_field_names() {
    let patch: DashboardPatch = serde_json::from_value(json!({
        "temperatureC": 19.5,
        "electricityUsageKWh": 9.1,
        "averageWaterL": 80
    }))
    .unwrap();

    assert_eq!(patch.temperature, Some(19.5));
    assert_eq!(patch.electricity_usage, Some(9.1));
    assert_eq!(patch.average_water, Some(80.0));
}

#[test]
fn test_patch_rejects_wrongly_typed_field() {
    let result: Result<DashboardPatch, _> =
        serde_json::from_value(json!({ "temperature": "warm" }));
    assert!(result.is_err());
}

#[test]
fn test_read_is_idempotent() {
    let store = DashboardStore::default();
    assert_eq!(store.read(), store.read());
}

#[test]
fn test_snapshot_uses_camel_case_keys() {
    let store = DashboardStore::default();
    let json = serde_json::to_value(store.read()).unwrap();

    assert_eq!(json["electricityUsage"], 6.8);
    assert_eq!(json["averageElectricity"], 7.5);
    assert_eq!(json["heatingOn"], true);
    assert_eq!(json["treeHealth"], 10);
    assert!(json["lastUpdated"].is_string());
}

#[test]
fn test_concurrent_patches_keep_every_field() {
    let store = Arc::new(DashboardStore::default());
    let mut handles = vec![];

    for i in 0..10 {
        let store_clone = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            let patch = if i % 2 == 0 {
                DashboardPatch {
                    water_usage: Some(200.0),
                    ..DashboardPatch::default()
                }
            } else {
                DashboardPatch {
                    electricity_usage: Some(8.0),
                    ..DashboardPatch::default()
                }
            };
            store_clone.patch(&patch);
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    let state = store.read();
    assert_eq!(state.water_usage, 200.0);
    assert_eq!(state.electricity_usage, 8.0);
}
