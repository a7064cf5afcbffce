//! Preferences round trips through a real file and a controller restart.

use ramen_core::{JsonFileStore, Language, PreferencesStore, ViewController};
use tempfile::TempDir;

#[test]
fn test_missing_file_loads_defaults() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join("prefs.json"));
    let prefs = store.load();
    assert_eq!(prefs.language, Language::Zh);
    assert_eq!(prefs.selected_shop_key, None);
    assert!(prefs.todos.is_empty());
}

#[test]
fn test_save_creates_parent_dirs() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deeper").join("prefs.json");
    let mut ctl = ViewController::start(JsonFileStore::new(&path));
    ctl.add_todo("check opening hours");
    assert!(path.exists());
}

#[test]
fn test_session_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prefs.json");

    {
        let mut ctl = ViewController::start(JsonFileStore::new(&path));
        ctl.set_language(Language::En);
        ctl.select_shop("Musashi Ramen");
        ctl.add_todo("a");
        ctl.add_todo("b");
        ctl.add_todo("c");
        ctl.remove_todo_at(1);
        // never persisted
        ctl.set_pending_todo_text("half-typed");
    }

    let ctl = ViewController::start(JsonFileStore::new(&path));
    let view = ctl.state();
    assert_eq!(view.language, Language::En);
    assert_eq!(view.selected_shop.map(|s| s.key), Some("musashi"));
    let texts: Vec<&str> = view.todos.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["a", "c"]);
    assert!(view.pending_todo_text.is_empty());

    let raw = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["selectedShopKey"], "musashi");
}

#[test]
fn test_legacy_file_is_understood() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prefs.json");
    std::fs::write(
        &path,
        r#"{"language": "en", "selectedShopName": "Ichiran Ramen", "todos": ["a", "b"]}"#,
    )
    .unwrap();

    let ctl = ViewController::start(JsonFileStore::new(&path));
    let view = ctl.state();
    assert_eq!(view.language, Language::En);
    assert_eq!(view.selected_shop.unwrap().name.en, "Ichiran Ramen");
    let texts: Vec<&str> = view.todos.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["a", "b"]);
}

#[test]
fn test_corrupt_file_falls_back_then_recovers() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prefs.json");
    std::fs::write(&path, "{ truncated").unwrap();

    let mut ctl = ViewController::start(JsonFileStore::new(&path));
    assert_eq!(ctl.state().language, Language::Zh);
    ctl.add_todo("fresh start");

    let reloaded = JsonFileStore::new(&path).load();
    assert_eq!(reloaded.todos.len(), 1);
}
