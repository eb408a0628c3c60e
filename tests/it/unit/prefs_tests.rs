//! Preference store tests: typed access and JSON persistence.

use panview::prefs::{JsonFileStore, MemoryStore, PreferencesStore, PrefsError};

#[test]
fn json_store_starts_empty_when_the_file_is_missing() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::open(dir.path().join("preferences.json")).unwrap();
    assert_eq!(store.get_bool("anything"), None);
}

#[test]
fn json_store_round_trips_all_value_types() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("preferences.json");

    let mut store = JsonFileStore::open(&path).unwrap();
    store.set_bool("navi.drag.require-click", false);
    store.set_int("rotation-effect", 30);
    store.set_double("navi.drag.speed", -1.5);
    store.set_string("navi.map.mode", "square");
    store.save().unwrap();

    let reloaded = JsonFileStore::open(&path).unwrap();
    assert_eq!(reloaded.get_bool("navi.drag.require-click"), Some(false));
    assert_eq!(reloaded.get_int("rotation-effect"), Some(30));
    assert_eq!(reloaded.get_double("navi.drag.speed"), Some(-1.5));
    assert_eq!(
        reloaded.get_string("navi.map.mode"),
        Some("square".to_owned())
    );
}

#[test]
fn whole_number_doubles_survive_a_save_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.json");

    let mut store = JsonFileStore::open(&path).unwrap();
    store.set_double("speed", 2.0);
    store.save().unwrap();

    let reloaded = JsonFileStore::open(&path).unwrap();
    assert_eq!(reloaded.get_double("speed"), Some(2.0));
}

#[test]
fn malformed_file_reports_a_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.json");
    std::fs::write(&path, "not json at all").unwrap();

    match JsonFileStore::open(&path) {
        Err(PrefsError::Json(_)) => {}
        other => panic!("expected a JSON error, got {other:?}"),
    }
}

#[test]
fn typed_reads_do_not_cross_types() {
    let mut store = MemoryStore::new();
    store.set_int("value", 3);
    assert_eq!(store.get_bool("value"), None);
    assert_eq!(store.get_string("value"), None);
    // Ints are readable as doubles: JSON stores whole doubles that way.
    assert_eq!(store.get_double("value"), Some(3.0));
}
