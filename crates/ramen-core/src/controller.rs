//! ViewController: single owner of all mutable UI state.
//!
//! Every operation commits its change to [`ViewState`] first and then
//! writes the persisted subset through the injected store. Store failures
//! are logged and reported back to the caller; the in-memory state is
//! never rolled back.

use tracing::{debug, warn};

use crate::catalog::{self, ShopRecord};
use crate::i18n::{Language, Strings};
use crate::joke::Joke;
use crate::prefs::{renumber_todos, Preferences, PreferencesStore, PrefsError, TodoId, TodoItem};

/// Full in-memory state of the running UI.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub language: Language,
    pub selected_shop: Option<&'static ShopRecord>,
    pub todos: Vec<TodoItem>,
    pub pending_todo_text: String,
    pub joke: Option<Joke>,
}

impl ViewState {
    pub fn strings(&self) -> &'static Strings {
        self.language.strings()
    }

    pub fn selected_display_name(&self) -> Option<&'static str> {
        self.selected_shop.map(|s| s.display_name(self.language))
    }

    pub fn todo_position(&self, id: TodoId) -> Option<usize> {
        self.todos.iter().position(|t| t.id == id)
    }
}

/// Outcome of a mutating operation.
#[derive(Debug)]
pub enum Persisted {
    /// Nothing changed, nothing written.
    Unchanged,
    Saved,
    /// State changed but the write failed.
    Failed(PrefsError),
}

impl Persisted {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

pub struct ViewController<S: PreferencesStore> {
    store: S,
    state: ViewState,
    next_todo_id: TodoId,
}

impl<S: PreferencesStore> ViewController<S> {
    /// Startup: read the store once and resolve the stored selection in
    /// the restored language. Nothing is written here.
    pub fn start(store: S) -> Self {
        let mut prefs = store.load();
        let selected_shop = prefs
            .selected_shop_key
            .as_deref()
            .and_then(catalog::find_by_key);
        debug!(
            "[view] restored language={} shop={:?} todos={}",
            prefs.language.code(),
            selected_shop.map(|s| s.key),
            prefs.todos.len()
        );
        let next_todo_id = prefs.next_todo_id().unwrap_or_else(|| {
            warn!("[view] stored to-do ids leave no room, renumbering");
            renumber_todos(&mut prefs.todos)
        });
        Self {
            store,
            state: ViewState {
                language: prefs.language,
                selected_shop,
                todos: prefs.todos,
                pending_todo_text: String::new(),
                joke: None,
            },
            next_todo_id,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn strings(&self) -> &'static Strings {
        self.state.strings()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The persisted subset of the current state.
    pub fn preferences(&self) -> Preferences {
        Preferences {
            language: self.state.language,
            selected_shop_key: self.state.selected_shop.map(|s| s.key.to_string()),
            todos: self.state.todos.clone(),
        }
    }

    // ── Language ──────────────────────────────────────────────────────────────

    /// Always clears the selection, even when the new language has a shop
    /// with the same key.
    pub fn set_language(&mut self, lang: Language) -> Persisted {
        debug!("[view] language {} -> {}", self.state.language.code(), lang.code());
        self.state.language = lang;
        self.state.selected_shop = None;
        self.persist()
    }

    pub fn cycle_language(&mut self) -> Persisted {
        self.set_language(self.state.language.next())
    }

    // ── Shop selection ────────────────────────────────────────────────────────

    /// Match by display name in the current language. A miss clears the
    /// selection.
    pub fn select_shop(&mut self, display_name: &str) -> Persisted {
        let shop = catalog::find_by_name(self.state.language, display_name);
        if shop.is_none() {
            debug!("[view] no shop named {:?} in {}", display_name, self.state.language.code());
        }
        self.set_selection(shop)
    }

    pub fn select_shop_by_key(&mut self, key: &str) -> Persisted {
        self.set_selection(catalog::find_by_key(key))
    }

    pub fn clear_selection(&mut self) -> Persisted {
        self.set_selection(None)
    }

    fn set_selection(&mut self, shop: Option<&'static ShopRecord>) -> Persisted {
        self.state.selected_shop = shop;
        self.persist()
    }

    // ── To-dos ────────────────────────────────────────────────────────────────

    /// Append the trimmed text. Blank input is ignored and leaves the
    /// pending buffer alone.
    pub fn add_todo(&mut self, text: &str) -> (Option<TodoId>, Persisted) {
        let text = text.trim();
        if text.is_empty() {
            return (None, Persisted::Unchanged);
        }
        let id = self.allocate_todo_id();
        self.state.todos.push(TodoItem {
            id,
            text: text.to_string(),
        });
        self.state.pending_todo_text.clear();
        debug!("[view] added todo {}", id);
        (Some(id), self.persist())
    }

    /// Hands out `next_todo_id`. If the id after it is unrepresentable the
    /// list is renumbered from 1 first, so ids stay unique.
    fn allocate_todo_id(&mut self) -> TodoId {
        if let Some(after) = self.next_todo_id.0.checked_add(1) {
            let id = self.next_todo_id;
            self.next_todo_id = TodoId(after);
            return id;
        }
        warn!("[view] to-do ids exhausted, renumbering");
        let id = renumber_todos(&mut self.state.todos);
        self.next_todo_id = TodoId(id.0.saturating_add(1));
        id
    }

    pub fn submit_pending_todo(&mut self) -> (Option<TodoId>, Persisted) {
        let text = std::mem::take(&mut self.state.pending_todo_text);
        let result = self.add_todo(&text);
        if result.0.is_none() {
            self.state.pending_todo_text = text;
        }
        result
    }

    pub fn remove_todo(&mut self, id: TodoId) -> Persisted {
        match self.state.todo_position(id) {
            Some(pos) => {
                self.state.todos.remove(pos);
                debug!("[view] removed todo {}", id);
                self.persist()
            }
            None => Persisted::Unchanged,
        }
    }

    /// Positional delete; the index is resolved to an id at call time.
    pub fn remove_todo_at(&mut self, index: usize) -> Persisted {
        match self.state.todos.get(index) {
            Some(item) => {
                let id = item.id;
                self.remove_todo(id)
            }
            None => Persisted::Unchanged,
        }
    }

    /// Input buffer only, never persisted.
    pub fn set_pending_todo_text(&mut self, text: impl Into<String>) {
        self.state.pending_todo_text = text.into();
    }

    // ── Joke ──────────────────────────────────────────────────────────────────

    /// Replace the shown joke; the latest completion wins.
    pub fn apply_joke(&mut self, joke: Joke) {
        self.state.joke = Some(joke);
    }

    fn persist(&mut self) -> Persisted {
        let prefs = self.preferences();
        match self.store.save(&prefs) {
            Ok(()) => Persisted::Saved,
            Err(e) => {
                warn!("[view] failed to save preferences: {}", e);
                Persisted::Failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::MemoryStore;

    fn fresh() -> (ViewController<MemoryStore>, MemoryStore) {
        let handle = MemoryStore::new();
        (ViewController::start(handle.clone()), handle)
    }

    fn texts(view: &ViewState) -> Vec<&str> {
        view.todos.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_start_with_empty_store_uses_defaults() {
        let (ctl, handle) = fresh();
        let view = ctl.state();
        assert_eq!(view.language, Language::Zh);
        assert!(view.selected_shop.is_none());
        assert!(view.todos.is_empty());
        assert!(view.joke.is_none());
        assert_eq!(handle.write_count(), 0);
    }

    #[test]
    fn test_language_switch_always_clears_selection() {
        for lang in Language::ALL {
            let (mut ctl, handle) = fresh();
            assert!(ctl.select_shop_by_key("ippudo").is_saved());
            assert!(ctl.state().selected_shop.is_some());
            ctl.set_language(lang);
            assert!(ctl.state().selected_shop.is_none());
            assert_eq!(ctl.state().language, lang);
            let stored = handle.stored().unwrap();
            assert_eq!(stored.language, lang);
            assert_eq!(stored.selected_shop_key, None);
        }
    }

    #[test]
    fn test_select_unknown_name_leaves_none() {
        let (mut ctl, _) = fresh();
        ctl.select_shop("Ramen on Mars");
        assert!(ctl.state().selected_shop.is_none());
    }

    #[test]
    fn test_select_miss_clears_previous_selection() {
        let (mut ctl, _) = fresh();
        ctl.select_shop("一蘭拉麵");
        assert_eq!(ctl.state().selected_shop.unwrap().key, "ichiran");
        // English name while the UI is in Chinese
        ctl.select_shop("Ichiran Ramen");
        assert!(ctl.state().selected_shop.is_none());
    }

    #[test]
    fn test_select_persists_key_not_name() {
        let (mut ctl, handle) = fresh();
        ctl.set_language(Language::En);
        ctl.select_shop("Ramen Nagi");
        assert_eq!(ctl.state().selected_display_name(), Some("Ramen Nagi"));
        assert_eq!(
            handle.stored().unwrap().selected_shop_key.as_deref(),
            Some("nagi")
        );
    }

    #[test]
    fn test_blank_todos_are_noops() {
        let (mut ctl, handle) = fresh();
        for text in ["", "   ", "\t\n"] {
            let (id, persisted) = ctl.add_todo(text);
            assert!(id.is_none());
            assert!(matches!(persisted, Persisted::Unchanged));
        }
        assert!(ctl.state().todos.is_empty());
        assert_eq!(handle.write_count(), 0);
    }

    #[test]
    fn test_add_then_remove_restores_sequence() {
        let (mut ctl, _) = fresh();
        ctl.add_todo("a");
        let before = ctl.state().todos.clone();
        ctl.add_todo("Buy milk");
        ctl.remove_todo_at(1);
        assert_eq!(ctl.state().todos, before);

        let (mut ctl, _) = fresh();
        ctl.add_todo("Buy milk");
        ctl.remove_todo_at(0);
        assert!(ctl.state().todos.is_empty());
    }

    #[test]
    fn test_add_trims_and_clears_pending() {
        let (mut ctl, handle) = fresh();
        ctl.set_pending_todo_text("  soak eggs  ");
        assert_eq!(handle.write_count(), 0);
        let (id, _) = ctl.submit_pending_todo();
        assert!(id.is_some());
        assert_eq!(texts(ctl.state()), vec!["soak eggs"]);
        assert!(ctl.state().pending_todo_text.is_empty());
        assert_eq!(handle.write_count(), 1);
    }

    #[test]
    fn test_blank_submit_keeps_pending_buffer() {
        let (mut ctl, _) = fresh();
        ctl.set_pending_todo_text("   ");
        let (id, _) = ctl.submit_pending_todo();
        assert!(id.is_none());
        assert_eq!(ctl.state().pending_todo_text, "   ");
    }

    #[test]
    fn test_remove_by_id_is_stable_across_removals() {
        let (mut ctl, _) = fresh();
        let (a, _) = ctl.add_todo("a");
        let (b, _) = ctl.add_todo("b");
        let (c, _) = ctl.add_todo("c");
        ctl.remove_todo(a.unwrap());
        // b shifted to position 0 but still answers to its own id
        ctl.remove_todo(c.unwrap());
        assert_eq!(texts(ctl.state()), vec!["b"]);
        assert_eq!(ctl.state().todos[0].id, b.unwrap());
        assert!(matches!(ctl.remove_todo(a.unwrap()), Persisted::Unchanged));
        assert!(matches!(ctl.remove_todo_at(5), Persisted::Unchanged));
    }

    #[test]
    fn test_ids_never_reused() {
        let (mut ctl, _) = fresh();
        let (a, _) = ctl.add_todo("a");
        ctl.remove_todo(a.unwrap());
        let (b, _) = ctl.add_todo("b");
        assert_ne!(a, b);
    }

    #[test]
    fn test_restart_reproduces_saved_state() {
        let seeded = MemoryStore::with(Preferences::from_json(
            r#"{"language": "en", "selectedShopName": "Ichiran Ramen", "todos": ["a", "b"]}"#,
        ));
        let ctl = ViewController::start(seeded);
        let view = ctl.state();
        assert_eq!(view.language, Language::En);
        assert_eq!(view.selected_shop.unwrap().name.en, "Ichiran Ramen");
        assert_eq!(texts(view), vec!["a", "b"]);
    }

    #[test]
    fn test_restart_keeps_todo_ids() {
        let (mut ctl, handle) = fresh();
        ctl.add_todo("a");
        let (b, _) = ctl.add_todo("b");
        ctl.remove_todo_at(0);

        let mut restarted = ViewController::start(handle.clone());
        assert_eq!(restarted.state().todos[0].id, b.unwrap());
        let (c, _) = restarted.add_todo("c");
        assert!(c.unwrap() > b.unwrap());
    }

    #[test]
    fn test_restart_after_max_id_keeps_ids_unique() {
        let seeded = MemoryStore::with(Preferences::from_json(
            r#"{"todos": [{"id": 18446744073709551615, "text": "x"}, "y"]}"#,
        ));
        let mut ctl = ViewController::start(seeded);
        let (z, _) = ctl.add_todo("z");
        let mut ids: Vec<TodoId> = ctl.state().todos.iter().map(|t| t.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);

        ctl.remove_todo(z.unwrap());
        assert_eq!(texts(ctl.state()), vec!["x", "y"]);
    }

    #[test]
    fn test_add_at_id_limit_renumbers() {
        let seeded = MemoryStore::with(Preferences {
            todos: vec![TodoItem {
                id: TodoId(u64::MAX - 1),
                text: "x".to_string(),
            }],
            ..Default::default()
        });
        let mut ctl = ViewController::start(seeded.clone());
        let (a, _) = ctl.add_todo("a");
        let (b, _) = ctl.add_todo("b");
        let ids: Vec<TodoId> = ctl.state().todos.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![TodoId(1), a.unwrap(), b.unwrap()]);
        assert_eq!(a, Some(TodoId(2)));
        assert_eq!(b, Some(TodoId(3)));

        ctl.remove_todo(a.unwrap());
        assert_eq!(texts(ctl.state()), vec!["x", "b"]);
        let restarted = ViewController::start(seeded);
        assert_eq!(texts(restarted.state()), vec!["x", "b"]);
    }

    #[test]
    fn test_joke_is_last_write_wins_and_not_persisted() {
        let (mut ctl, handle) = fresh();
        ctl.apply_joke(Joke::new("first", "1"));
        ctl.apply_joke(Joke::new("second", "2"));
        assert_eq!(ctl.state().joke.as_ref().unwrap().setup, "second");
        assert_eq!(handle.write_count(), 0);
    }

    struct FailingStore;

    impl PreferencesStore for FailingStore {
        fn load(&self) -> Preferences {
            Preferences::default()
        }

        fn save(&mut self, _prefs: &Preferences) -> Result<(), PrefsError> {
            Err(PrefsError::Io(std::io::Error::other("disk full")))
        }
    }

    #[test]
    fn test_save_failure_keeps_in_memory_change() {
        let mut ctl = ViewController::start(FailingStore);
        assert!(ctl.add_todo("still here").1.is_failed());
        assert_eq!(texts(ctl.state()), vec!["still here"]);
    }

    impl Persisted {
        fn is_saved(&self) -> bool {
            matches!(self, Self::Saved)
        }
    }
}
