//! Action enum: all user-initiated intents and internal events.

use ramen_core::{Language, TodoId};

/// Unique identifier for a focusable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    Header,
    ShopPicker,
    ShopInfo,
    TodoPanel,
    JokePanel,
    HelpOverlay,
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Language ─────────────────────────────────────────────────────────────
    SetLanguage(Language),
    CycleLanguage,

    // ── Shops ────────────────────────────────────────────────────────────────
    SelectShop(&'static str), // catalog key
    ClearSelection,

    // ── To-dos ───────────────────────────────────────────────────────────────
    PendingTodoChanged(String),
    SubmitTodo,
    RemoveTodo(TodoId),

    // ── Joke ─────────────────────────────────────────────────────────────────
    FetchJoke,

    // ── Navigation ───────────────────────────────────────────────────────────
    FocusNext,
    FocusPrev,
    FocusPane(ComponentId),

    // ── Filter ───────────────────────────────────────────────────────────────
    CloseFilter,

    // ── UI ───────────────────────────────────────────────────────────────────
    ToggleHelp,
    CopyToClipboard(String),

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
}
