//! State store backends

use roledeck::*;
use tempfile::TempDir;

fn sample_state() -> State {
    let p = Permission::with_id("p1", "users.edit", "", Some("Users"));
    let mut r = Role::with_id("r1", "Editor", "");
    r.permissions.push(p.clone());
    State { permissions: vec![p], roles: vec![r] }
}

#[test]
fn test_lmdb_save_and_load() {
    let dir = TempDir::new().unwrap();
    let cfg = EditorConfig::default();
    let mut store = LmdbStore::open(dir.path(), &cfg).unwrap();
    assert_eq!(store.load().unwrap(), None);
    assert_eq!(store.revision().unwrap(), 0);

    store.save(&sample_state()).unwrap();
    store.save(&sample_state()).unwrap();
    assert_eq!(store.load().unwrap(), Some(sample_state()));
    assert_eq!(store.revision().unwrap(), 2);

    store.clear().unwrap();
    assert_eq!(store.load().unwrap(), None);
    assert_eq!(store.revision().unwrap(), 0);
}

#[test]
fn test_lmdb_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let cfg = EditorConfig::default();
    {
        let mut store = LmdbStore::open(dir.path(), &cfg).unwrap();
        store.save(&sample_state()).unwrap();
    }
    let store = LmdbStore::open(dir.path(), &cfg).unwrap();
    assert_eq!(store.load().unwrap(), Some(sample_state()));
    assert_eq!(store.revision().unwrap(), 1);
}

#[test]
fn test_lmdb_storage_key_isolates_documents() {
    let dir = TempDir::new().unwrap();
    let cfg = EditorConfig { storage_key: "other".into(), ..EditorConfig::default() };
    let mut store = LmdbStore::open(dir.path(), &cfg).unwrap();
    store.save(&State::default()).unwrap();
    assert_eq!(store.load().unwrap(), Some(State::default()));
}

#[test]
fn test_memory_store() {
    let mut store = MemoryStore::new();
    assert_eq!(store.load().unwrap(), None);
    store.save(&sample_state()).unwrap();
    assert_eq!(store.load().unwrap(), Some(sample_state()));
    assert_eq!(store.revision().unwrap(), 1);
    assert!(store.text().unwrap().contains("\"permissions\""));
}

#[test]
fn test_memory_store_unavailable() {
    let mut store = MemoryStore::unavailable();
    assert!(matches!(store.load(), Err(Error::PersistenceUnavailable(_))));
    assert!(matches!(store.save(&State::default()), Err(Error::PersistenceUnavailable(_))));
}

#[test]
fn test_memory_store_loads_legacy_text() {
    let store = MemoryStore::with_text(r#"[{"id": 1, "name": "a.b"}]"#);
    let state = store.load().unwrap().unwrap();
    assert_eq!(state.permissions[0].id, "1");
}

#[test]
fn test_config_from_json() {
    let cfg = EditorConfig::from_json_str(r#"{"uncategorized_label": "Other", "action_fallback": {"sentinel": "unknown"}}"#).unwrap();
    assert_eq!(cfg.uncategorized_label, "Other");
    assert_eq!(cfg.action_fallback, ActionFallback::Sentinel("unknown".into()));
    assert_eq!(cfg.storage_key, DEFAULT_STORAGE_KEY);

    let cfg = EditorConfig::from_json_str(r#"{"action_fallback": "bare_name"}"#).unwrap();
    assert_eq!(cfg, EditorConfig::default());

    assert!(matches!(EditorConfig::from_json_str(r#"{"bogus": 1}"#), Err(Error::Config(_))));
}
