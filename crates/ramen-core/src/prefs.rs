//! Persisted preferences: language, selected shop, to-do list.
//!
//! The whole [`Preferences`] value is written on every change. Loading is
//! lenient field by field: anything missing or malformed falls back to its
//! default and is logged, never surfaced to the user.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::catalog;
use crate::i18n::Language;

#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    #[error("preferences I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("preferences could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Stable identity of a to-do entry. Never reused within one list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(pub u64);

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: TodoId,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub language: Language,
    /// Catalog key of the selected shop.
    pub selected_shop_key: Option<String>,
    pub todos: Vec<TodoItem>,
}

impl Preferences {
    /// Decode stored JSON, substituting defaults for anything unusable.
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::from_value(&value),
            Err(e) => {
                warn!("[prefs] stored preferences are not JSON ({}), using defaults", e);
                Self::default()
            }
        }
    }

    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            warn!("[prefs] stored preferences are not an object, using defaults");
            return Self::default();
        };

        let language = match obj.get("language").and_then(Value::as_str) {
            Some(code) => Language::from_code(code).unwrap_or_else(|| {
                warn!("[prefs] unknown language code {:?}", code);
                Language::default()
            }),
            None => Language::default(),
        };

        // Older files stored the localized display name instead of a key;
        // it can only be matched in the language it was saved under.
        let selected_shop_key = match obj.get("selectedShopKey").and_then(Value::as_str) {
            Some(key) => catalog::find_by_key(key).map(|s| s.key.to_string()),
            None => obj
                .get("selectedShopName")
                .and_then(Value::as_str)
                .and_then(|name| catalog::find_by_name(language, name))
                .map(|s| s.key.to_string()),
        };

        let todos = obj.get("todos").map(parse_todos).unwrap_or_default();

        Self {
            language,
            selected_shop_key,
            todos,
        }
    }

    /// Smallest id greater than every stored one, or `None` when the
    /// largest stored id leaves no room above it.
    pub fn next_todo_id(&self) -> Option<TodoId> {
        match self.todos.iter().map(|t| t.id.0).max() {
            Some(max) => max.checked_add(1).map(TodoId),
            None => Some(TodoId(1)),
        }
    }
}

/// Reassign ids `1..=n` in list order and return the first free id.
pub(crate) fn renumber_todos(todos: &mut [TodoItem]) -> TodoId {
    let mut next = 1;
    for todo in todos.iter_mut() {
        todo.id = TodoId(next);
        next += 1;
    }
    TodoId(next)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredTodo {
    Bare(String),
    Item { id: u64, text: String },
}

/// A malformed list is replaced wholesale by an empty one.
fn parse_todos(value: &Value) -> Vec<TodoItem> {
    let stored: Vec<StoredTodo> = match serde_json::from_value(value.clone()) {
        Ok(v) => v,
        Err(e) => {
            warn!("[prefs] stored to-do list is malformed ({}), starting empty", e);
            return Vec::new();
        }
    };

    let max = stored
        .iter()
        .filter_map(|t| match t {
            StoredTodo::Item { id, .. } => Some(*id),
            StoredTodo::Bare(_) => None,
        })
        .max()
        .unwrap_or(0);
    // Every entry may need a fresh id above `max`, plus one for the next add.
    let keep_ids = max.checked_add(stored.len() as u64 + 1).is_some();
    if !keep_ids {
        warn!("[prefs] stored to-do id {} leaves no room, renumbering", max);
    }
    let mut next = if keep_ids { max + 1 } else { 1 };
    let mut seen = HashSet::new();

    stored
        .into_iter()
        .map(|t| {
            let (id, text) = match t {
                StoredTodo::Item { id, text } if keep_ids && id != 0 && seen.insert(id) => {
                    (id, text)
                }
                StoredTodo::Item { text, .. } | StoredTodo::Bare(text) => {
                    let id = next;
                    next += 1;
                    (id, text)
                }
            };
            TodoItem {
                id: TodoId(id),
                text,
            }
        })
        .collect()
}

/// Load/save contract between the view controller and whatever holds the
/// preferences.
pub trait PreferencesStore {
    /// Never fails: returns defaults when nothing usable is stored.
    fn load(&self) -> Preferences;

    fn save(&mut self, prefs: &Preferences) -> Result<(), PrefsError>;
}

impl<S: PreferencesStore + ?Sized> PreferencesStore for Box<S> {
    fn load(&self) -> Preferences {
        (**self).load()
    }

    fn save(&mut self, prefs: &Preferences) -> Result<(), PrefsError> {
        (**self).save(prefs)
    }
}

/// Preferences kept in a single pretty-printed JSON file.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferencesStore for JsonFileStore {
    fn load(&self) -> Preferences {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Preferences::from_json(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("[prefs] no preferences at {}", self.path.display());
                Preferences::default()
            }
            Err(e) => {
                warn!("[prefs] failed to read {}: {}", self.path.display(), e);
                Preferences::default()
            }
        }
    }

    fn save(&mut self, prefs: &Preferences) -> Result<(), PrefsError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(prefs)?)?;
        Ok(())
    }
}

/// In-process store. Clones share the same slot, so a handle kept outside
/// the controller sees every write.
#[derive(Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<Preferences>>>,
    writes: Arc<Mutex<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(prefs: Preferences) -> Self {
        let store = Self::default();
        *store.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(prefs);
        store
    }

    /// The last saved (or seeded) value.
    pub fn stored(&self) -> Option<Preferences> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PreferencesStore for MemoryStore {
    fn load(&self) -> Preferences {
        self.stored().unwrap_or_default()
    }

    fn save(&mut self, prefs: &Preferences) -> Result<(), PrefsError> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(prefs.clone());
        *self.writes.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(prefs: &Preferences) -> Vec<&str> {
        prefs.todos.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_garbage_yields_defaults() {
        assert_eq!(Preferences::from_json("not json"), Preferences::default());
        assert_eq!(Preferences::from_json("[1, 2]"), Preferences::default());
        assert_eq!(Preferences::from_json("{}"), Preferences::default());
    }

    #[test]
    fn test_malformed_todos_keep_other_fields() {
        let prefs = Preferences::from_json(
            r#"{"language": "en", "selectedShopKey": "ippudo", "todos": "oops"}"#,
        );
        assert_eq!(prefs.language, Language::En);
        assert_eq!(prefs.selected_shop_key.as_deref(), Some("ippudo"));
        assert!(prefs.todos.is_empty());

        let prefs = Preferences::from_json(r#"{"todos": ["a", 3, "b"]}"#);
        assert!(prefs.todos.is_empty());
    }

    #[test]
    fn test_unknown_language_falls_back() {
        let prefs = Preferences::from_json(r#"{"language": "fr"}"#);
        assert_eq!(prefs.language, Language::Zh);
    }

    #[test]
    fn test_legacy_display_name_and_bare_todos() {
        let prefs = Preferences::from_json(
            r#"{"language": "en", "selectedShopName": "Ichiran Ramen", "todos": ["a", "b"]}"#,
        );
        assert_eq!(prefs.language, Language::En);
        assert_eq!(prefs.selected_shop_key.as_deref(), Some("ichiran"));
        assert_eq!(texts(&prefs), vec!["a", "b"]);
        assert_eq!(prefs.todos[0].id, TodoId(1));
        assert_eq!(prefs.todos[1].id, TodoId(2));
    }

    #[test]
    fn test_legacy_name_from_other_language_is_dropped() {
        let prefs = Preferences::from_json(
            r#"{"language": "zh", "selectedShopName": "Ichiran Ramen"}"#,
        );
        assert_eq!(prefs.selected_shop_key, None);
    }

    #[test]
    fn test_unknown_key_is_dropped() {
        let prefs = Preferences::from_json(r#"{"selectedShopKey": "ramen-mars"}"#);
        assert_eq!(prefs.selected_shop_key, None);
    }

    #[test]
    fn test_duplicate_ids_are_renumbered() {
        let prefs = Preferences::from_json(
            r#"{"todos": [{"id": 4, "text": "x"}, {"id": 4, "text": "y"}, "z"]}"#,
        );
        let ids: Vec<u64> = prefs.todos.iter().map(|t| t.id.0).collect();
        assert_eq!(ids, vec![4, 5, 6]);
        assert_eq!(texts(&prefs), vec!["x", "y", "z"]);
        assert_eq!(prefs.next_todo_id(), Some(TodoId(7)));
    }

    #[test]
    fn test_max_id_renumbers_list() {
        let prefs = Preferences::from_json(
            r#"{"todos": [{"id": 18446744073709551615, "text": "x"}, "y"]}"#,
        );
        let ids: Vec<u64> = prefs.todos.iter().map(|t| t.id.0).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(texts(&prefs), vec!["x", "y"]);
        assert_eq!(prefs.next_todo_id(), Some(TodoId(3)));

        // Close to the limit but with room for every entry: ids survive.
        let prefs = Preferences::from_json(
            r#"{"todos": [{"id": 18446744073709551610, "text": "x"}, "y"]}"#,
        );
        assert_eq!(prefs.todos[0].id, TodoId(u64::MAX - 5));
        assert_eq!(prefs.todos[1].id, TodoId(u64::MAX - 4));
    }

    #[test]
    fn test_next_id_none_at_limit() {
        let mut prefs = Preferences {
            todos: vec![TodoItem {
                id: TodoId(u64::MAX),
                text: "x".to_string(),
            }],
            ..Default::default()
        };
        assert_eq!(prefs.next_todo_id(), None);
        assert_eq!(renumber_todos(&mut prefs.todos), TodoId(2));
        assert_eq!(prefs.todos[0].id, TodoId(1));
    }

    #[test]
    fn test_serialized_shape() {
        let prefs = Preferences {
            language: Language::En,
            selected_shop_key: Some("nagi".to_string()),
            todos: vec![TodoItem {
                id: TodoId(9),
                text: "queue early".to_string(),
            }],
        };
        let value = serde_json::to_value(&prefs).unwrap();
        assert_eq!(value["language"], "en");
        assert_eq!(value["selectedShopKey"], "nagi");
        assert_eq!(value["todos"][0]["id"], 9);
        assert_eq!(Preferences::from_value(&value), prefs);
    }

    #[test]
    fn test_memory_store_shares_writes() {
        let handle = MemoryStore::new();
        let mut store = handle.clone();
        assert_eq!(store.load(), Preferences::default());
        let prefs = Preferences {
            language: Language::En,
            ..Default::default()
        };
        store.save(&prefs).unwrap();
        assert_eq!(handle.stored(), Some(prefs));
        assert_eq!(handle.write_count(), 1);
    }
}
