//! App: component-based event loop.
//!
//! Architecture:
//! - `App` owns all components and `AppState` (shared read-only data for components).
//! - A `tokio::mpsc` channel carries `AppMessage` events in from background tasks
//!   (terminal input and joke requests).
//! - The event loop draws each frame, then awaits the next message.
//! - Components return `Vec<Action>`; App dispatches each Action, and only
//!   the App calls into the view controller.

use std::io;
use std::time::Duration;

use chrono::Local;
use ramen_core::{Joke, JokeFetcher, Persisted};
use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    components::{
        header::Header, help_overlay::HelpOverlay, joke_panel::JokePanel, shop_info::ShopInfo,
        shop_picker::ShopPicker, todo_panel::TodoPanel,
    },
    focus::FocusRing,
    widgets::{status_bar::{self, InputMode}, toast::ToastManager},
};

// ── Internal event bus ────────────────────────────────────────────────────────

pub enum AppMessage {
    Event(Event),
    /// A joke request finished. Requests are never cancelled, so these
    /// arrive in completion order and the last one wins.
    JokeFetched(Joke),
}

/// Screen rectangles from the last draw, for mouse hit-testing.
#[derive(Debug, Clone, Copy, Default)]
struct PaneAreas {
    header: Rect,
    shop_picker: Rect,
    shop_info: Rect,
    todo_panel: Rect,
    joke_panel: Rect,
}

pub struct App {
    state: AppState,
    header: Header,
    shop_picker: ShopPicker,
    shop_info: ShopInfo,
    todo_panel: TodoPanel,
    joke_panel: JokePanel,
    help_overlay: HelpOverlay,
    focus: FocusRing,
    toast: ToastManager,
    fetcher: JokeFetcher,
    pane_areas: PaneAreas,
    should_quit: bool,
    msg_tx: mpsc::Sender<AppMessage>,
    msg_rx: Option<mpsc::Receiver<AppMessage>>,
}

impl App {
    pub fn new(state: AppState, fetcher: JokeFetcher) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel::<AppMessage>(256);
        Self {
            header: Header::new(),
            shop_picker: ShopPicker::new(&state),
            shop_info: ShopInfo::new(),
            todo_panel: TodoPanel::new(&state),
            joke_panel: JokePanel::new(),
            help_overlay: HelpOverlay::new(),
            focus: FocusRing::default(),
            toast: ToastManager::new(),
            fetcher,
            pane_areas: PaneAreas::default(),
            should_quit: false,
            msg_tx,
            msg_rx: Some(msg_rx),
            state,
        }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        let mut rx = self
            .msg_rx
            .take()
            .ok_or_else(|| anyhow::anyhow!("event loop already started"))?;

        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        // ── Background task: keyboard/mouse events ────────────────────────────
        let event_tx = self.msg_tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // Toast expiry check + spinner animation
        let mut toast_tick = tokio::time::interval(Duration::from_millis(100));
        toast_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    let mut redraw = self.handle_message(msg);
                    while let Ok(next) = rx.try_recv() {
                        redraw |= self.handle_message(next);
                    }
                    needs_redraw = redraw;
                }

                _ = toast_tick.tick() => {
                    if !self.toast.is_empty() {
                        self.toast.tick();
                        needs_redraw = true;
                    }
                }
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        info!("ramen exiting");

        Ok(())
    }

    /// Returns whether the screen needs a redraw.
    fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::Event(Event::Key(key)) => {
                if key.kind == KeyEventKind::Release {
                    return false;
                }
                for action in self.handle_key(key) {
                    self.dispatch(action);
                }
                self.sync_input_mode();
                true
            }
            AppMessage::Event(Event::Mouse(mouse)) => {
                let actions = self.handle_mouse(mouse);
                let redraw = !actions.is_empty()
                    || matches!(
                        mouse.kind,
                        MouseEventKind::Down(_) | MouseEventKind::ScrollUp | MouseEventKind::ScrollDown
                    );
                for action in actions {
                    self.dispatch(action);
                }
                self.sync_input_mode();
                redraw
            }
            AppMessage::Event(Event::Resize(..)) => true,
            AppMessage::Event(_) => false,
            AppMessage::JokeFetched(joke) => {
                debug!("[joke] applied: {:?}", joke.setup);
                self.state.controller.apply_joke(joke);
                self.state.jokes_in_flight = self.state.jokes_in_flight.saturating_sub(1);
                self.state.joke_fetched_at = Some(Local::now());
                if !self.state.joke_pending() {
                    self.toast.dismiss_spinner();
                }
                true
            }
        }
    }

    // ── Key handling ──────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        let mode = self.state.input_mode;
        if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
            return vec![Action::Quit];
        }

        // Help overlay captures all keys when visible
        if self.help_overlay.visible {
            return self.help_overlay.handle_key(key, &self.state);
        }

        // Tab / Shift-Tab always cycle focus (closing the filter first)
        match key.code {
            KeyCode::Tab => {
                if mode == InputMode::Filter {
                    return vec![Action::CloseFilter, Action::FocusNext];
                }
                return vec![Action::FocusNext];
            }
            KeyCode::BackTab => {
                if mode == InputMode::Filter {
                    return vec![Action::CloseFilter, Action::FocusPrev];
                }
                return vec![Action::FocusPrev];
            }
            _ => {}
        }

        // Global keys (Normal mode only; otherwise they are typed text)
        if mode == InputMode::Normal && key.modifiers.difference(KeyModifiers::SHIFT).is_empty() {
            match key.code {
                KeyCode::Char('q') => return vec![Action::Quit],
                KeyCode::Char('?') => return vec![Action::ToggleHelp],
                KeyCode::Char('l') => return vec![Action::CycleLanguage],
                KeyCode::Char('g') => return vec![Action::FetchJoke],
                KeyCode::Char(c @ '1'..='4') => {
                    let pos = c as usize - '1' as usize;
                    if let Some(id) = self.focus.set_by_position(pos) {
                        return vec![Action::FocusPane(id)];
                    }
                    return Vec::new();
                }
                _ => {}
            }
        }

        // Dispatch to the focused component
        let s = &self.state;
        match self.focus.current() {
            Some(ComponentId::ShopPicker) => self.shop_picker.handle_key(key, s),
            Some(ComponentId::ShopInfo) => self.shop_info.handle_key(key, s),
            Some(ComponentId::TodoPanel) => self.todo_panel.handle_key(key, s),
            Some(ComponentId::JokePanel) => self.joke_panel.handle_key(key, s),
            _ => Vec::new(),
        }
    }

    // ── Mouse handling ────────────────────────────────────────────────────────

    fn handle_mouse(&mut self, event: MouseEvent) -> Vec<Action> {
        let is_click = matches!(
            event.kind,
            MouseEventKind::Down(_) | MouseEventKind::ScrollUp | MouseEventKind::ScrollDown
        );
        if !is_click || self.help_overlay.visible {
            return Vec::new();
        }

        let col = event.column;
        let row = event.row;

        fn hit(r: Rect, col: u16, row: u16) -> bool {
            r.width > 0
                && r.height > 0
                && col >= r.x
                && col < r.x + r.width
                && row >= r.y
                && row < r.y + r.height
        }

        let areas = self.pane_areas;
        let s = &self.state;

        // Route to the pane under the cursor and move focus there.
        macro_rules! click_pane {
            ($component:expr, $area:expr) => {{
                let id = $component.id();
                let mut actions = $component.handle_mouse(event, $area, s);
                if self.focus.current() != Some(id) {
                    actions.insert(0, Action::FocusPane(id));
                }
                return actions;
            }};
        }

        if hit(areas.header, col, row) {
            return self.header.handle_mouse(event, areas.header, s);
        }
        if hit(areas.shop_picker, col, row) {
            click_pane!(self.shop_picker, areas.shop_picker);
        }
        if hit(areas.shop_info, col, row) {
            click_pane!(self.shop_info, areas.shop_info);
        }
        if hit(areas.todo_panel, col, row) {
            click_pane!(self.todo_panel, areas.todo_panel);
        }
        if hit(areas.joke_panel, col, row) {
            click_pane!(self.joke_panel, areas.joke_panel);
        }

        Vec::new()
    }

    // ── Action dispatcher ─────────────────────────────────────────────────────

    fn dispatch(&mut self, action: Action) {
        // Broadcast to all components first (focus changes, filter close, help)
        let secondary: Vec<Action> = {
            let s = &self.state;
            let mut out = Vec::new();
            out.extend(self.header.on_action(&action, s));
            out.extend(self.shop_picker.on_action(&action, s));
            out.extend(self.shop_info.on_action(&action, s));
            out.extend(self.todo_panel.on_action(&action, s));
            out.extend(self.joke_panel.on_action(&action, s));
            out.extend(self.help_overlay.on_action(&action, s));
            out
        };

        self.apply_action(action);

        // Dispatch any secondary actions (depth-limited to 1 level)
        for a in secondary {
            self.apply_action(a);
        }
    }

    fn apply_action(&mut self, action: Action) {
        // Pending text changes on every keystroke
        match &action {
            Action::PendingTodoChanged(_) => {}
            _ => debug!("apply_action: {:?}", action),
        }
        let controller = &mut self.state.controller;
        match action {
            // ── Language ──────────────────────────────────────────────────────
            Action::SetLanguage(lang) => {
                let outcome = controller.set_language(lang);
                self.report(outcome);
            }
            Action::CycleLanguage => {
                let outcome = controller.cycle_language();
                self.report(outcome);
            }

            // ── Shops ─────────────────────────────────────────────────────────
            Action::SelectShop(key) => {
                let outcome = controller.select_shop_by_key(key);
                self.report(outcome);
            }
            Action::ClearSelection => {
                let outcome = controller.clear_selection();
                self.report(outcome);
            }

            // ── To-dos ────────────────────────────────────────────────────────
            Action::PendingTodoChanged(text) => controller.set_pending_todo_text(text),
            Action::SubmitTodo => {
                let (_, outcome) = controller.submit_pending_todo();
                self.report(outcome);
            }
            Action::RemoveTodo(id) => {
                let outcome = controller.remove_todo(id);
                self.report(outcome);
            }

            // ── Joke ──────────────────────────────────────────────────────────
            Action::FetchJoke => self.spawn_joke_fetch(),

            // ── Navigation ────────────────────────────────────────────────────
            Action::FocusNext => {
                self.focus.next();
            }
            Action::FocusPrev => {
                self.focus.prev();
            }
            Action::FocusPane(id) => self.focus.set(id),

            // Components close their own filter in on_action
            Action::CloseFilter => {}

            // ── UI ────────────────────────────────────────────────────────────
            // HelpOverlay toggles itself in on_action
            Action::ToggleHelp => {}
            Action::CopyToClipboard(text) => {
                match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.clone())) {
                    Ok(()) => {
                        let first_line = text.lines().next().unwrap_or_default();
                        self.toast
                            .success(format!("{}: {}", self.state.strings().copied, first_line));
                    }
                    Err(e) => {
                        warn!("clipboard error: {}", e);
                        self.toast.error(format!("clipboard error: {}", e));
                    }
                }
            }

            Action::Quit => self.should_quit = true,
        }
    }

    /// Surface a failed preferences write; the in-memory change stays.
    fn report(&mut self, outcome: Persisted) {
        if let Persisted::Failed(e) = outcome {
            self.toast
                .warning(format!("{}: {}", self.state.strings().save_failed, e));
        }
    }

    /// Fire-and-forget: each press issues its own request and every
    /// completion is applied, in the order they finish.
    fn spawn_joke_fetch(&mut self) {
        self.state.jokes_in_flight += 1;
        self.toast.spinner(self.state.strings().fetching);
        let fetcher = self.fetcher.clone();
        let tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let joke = fetcher.fetch().await;
            if tx.send(AppMessage::JokeFetched(joke)).await.is_err() {
                debug!("[joke] app gone, dropping result");
            }
        });
    }

    fn sync_input_mode(&mut self) {
        self.state.input_mode = if self.shop_picker.filter_active() {
            InputMode::Filter
        } else if self.todo_panel.editing() {
            InputMode::Insert
        } else {
            InputMode::Normal
        };
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        use crate::theme::C_BG;
        use ratatui::widgets::Block;
        let area = frame.area();

        frame.render_widget(
            Block::default().style(ratatui::style::Style::default().bg(C_BG)),
            area,
        );

        // ── Outer layout: header | separator | body | statusbar ──────────────
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        self.header.draw(frame, outer[0], false, &self.state);
        self.pane_areas.header = outer[0];
        status_bar::draw_separator(frame, outer[1]);
        status_bar::draw_keys_bar(frame, outer[3], self.state.input_mode, self.state.strings());

        // ── Body: picker + info on the left, to-dos + joke on the right ──────
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(outer[2]);
        // placeholder + shops + filter row + borders
        let picker_h = ramen_core::catalog::all().len() as u16 + 4;
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(picker_h), Constraint::Min(0)])
            .split(columns[0]);
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(8)])
            .split(columns[1]);

        self.pane_areas.shop_picker = left[0];
        self.pane_areas.shop_info = left[1];
        self.pane_areas.todo_panel = right[0];
        self.pane_areas.joke_panel = right[1];

        let s = &self.state;
        let f = &self.focus;
        self.shop_picker
            .draw(frame, left[0], f.is_focused(ComponentId::ShopPicker), s);
        self.shop_info
            .draw(frame, left[1], f.is_focused(ComponentId::ShopInfo), s);
        self.todo_panel
            .draw(frame, right[0], f.is_focused(ComponentId::TodoPanel), s);
        self.joke_panel
            .draw(frame, right[1], f.is_focused(ComponentId::JokePanel), s);

        // ── Help overlay (on top of everything) ──────────────────────────────
        self.help_overlay.draw(frame, area, false, &self.state);

        // ── Toast notifications (topmost layer) ──────────────────────────────
        self.toast.draw(frame, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::test_state;
    use ramen_core::{Language, MemoryStore, PreferencesStore, ViewController};

    fn app() -> App {
        App::new(test_state(), JokeFetcher::new("http://127.0.0.1:9/jokes/random"))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_message(AppMessage::Event(Event::Key(key(code))));
    }

    #[test]
    fn test_l_cycles_language_and_clears_selection() {
        let mut app = app();
        app.dispatch(Action::SelectShop("ichiran"));
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.state.view().language, Language::En);
        assert!(app.state.view().selected_shop.is_none());
    }

    #[test]
    fn test_typing_a_todo_end_to_end() {
        let store = MemoryStore::new();
        let boxed: Box<dyn PreferencesStore> = Box::new(store.clone());
        let mut app = App::new(
            AppState::new(ViewController::start(boxed)),
            JokeFetcher::new("http://127.0.0.1:9/"),
        );
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.focus.current(), Some(ComponentId::TodoPanel));
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.state.input_mode, InputMode::Insert);
        // Global keys are plain text while typing
        for c in "lq".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert!(!app.should_quit);
        assert_eq!(app.state.view().pending_todo_text, "lq");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state.view().todos.len(), 1);
        assert_eq!(app.state.view().pending_todo_text, "");
        assert_eq!(store.stored().map(|p| p.todos.len()), Some(1));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_filter_mode_swallows_globals_until_tab() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.state.input_mode, InputMode::Filter);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.state.input_mode, InputMode::Normal);
        assert_eq!(app.focus.current(), Some(ComponentId::ShopInfo));
    }

    #[test]
    fn test_help_overlay_closes_on_any_key() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.help_overlay.visible);
        press(&mut app, KeyCode::Char('x'));
        assert!(!app.help_overlay.visible);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_joke_fetch_failure_applies_fallback() {
        let mut app = app();
        let mut rx = app.msg_rx.take().unwrap();
        app.dispatch(Action::FetchJoke);
        app.dispatch(Action::FetchJoke);
        assert_eq!(app.state.jokes_in_flight, 2);

        for _ in 0..2 {
            let msg = rx.recv().await.unwrap();
            app.handle_message(msg);
        }
        assert!(!app.state.joke_pending());
        assert!(app.state.joke_fetched_at.is_some());
        assert_eq!(app.state.view().joke, Some(Joke::fallback()));
    }
}
