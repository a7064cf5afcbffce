//! Core of the ramen finder: shop catalog, UI strings, persisted
//! preferences, the view controller, and the joke client. Nothing here
//! touches the terminal.

pub mod catalog;
pub mod config;
pub mod controller;
pub mod i18n;
pub mod joke;
pub mod platform;
pub mod prefs;

pub use catalog::ShopRecord;
pub use controller::{Persisted, ViewController, ViewState};
pub use i18n::{Language, Strings};
pub use joke::{Joke, JokeFetcher};
pub use prefs::{JsonFileStore, MemoryStore, Preferences, PreferencesStore, TodoId, TodoItem};
