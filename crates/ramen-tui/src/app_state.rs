//! AppState: shared read-only data passed to all components during render/event.
//!
//! Components read this but never mutate it. The App event-loop is the only
//! thing that writes to AppState, and it does so through the view controller.

use chrono::{DateTime, Local};
use ramen_core::{PreferencesStore, Strings, ViewController, ViewState};

use crate::widgets::status_bar::InputMode;

pub type Controller = ViewController<Box<dyn PreferencesStore>>;

pub struct AppState {
    /// Owns the language, selection, to-dos, pending input and joke.
    pub controller: Controller,

    // ── UI mode ─────────────────────────────────────────────────────────────
    pub input_mode: InputMode,

    // ── Joke requests ───────────────────────────────────────────────────────
    /// Requests issued but not yet completed. Never cancelled.
    pub jokes_in_flight: usize,
    pub joke_fetched_at: Option<DateTime<Local>>,
}

impl AppState {
    pub fn new(controller: Controller) -> Self {
        Self {
            controller,
            input_mode: InputMode::Normal,
            jokes_in_flight: 0,
            joke_fetched_at: None,
        }
    }

    pub fn view(&self) -> &ViewState {
        self.controller.state()
    }

    pub fn strings(&self) -> &'static Strings {
        self.controller.strings()
    }

    pub fn joke_pending(&self) -> bool {
        self.jokes_in_flight > 0
    }
}

#[cfg(test)]
pub(crate) fn test_state() -> AppState {
    let store: Box<dyn PreferencesStore> = Box::new(ramen_core::MemoryStore::new());
    AppState::new(ViewController::start(store))
}
