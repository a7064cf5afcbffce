//! TodoPanel component: new-task input, add button, and the task list.
//!
//! The text being typed lives in the view controller as the pending input;
//! the local `TextInput` only tracks the cursor and is re-synced from it.

use ramen_core::TodoId;
use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{
        style_button, style_default, style_muted, style_selected, style_selected_focused,
        C_DELETE, C_INSERT_FG, C_SECONDARY,
    },
    widgets::{
        pane_chrome::{pane_chrome, Badge},
        text,
        text_input::{InputAction, TextInput},
    },
};

const DELETE_GLYPH: &str = " ✗ ";

pub struct TodoPanel {
    pub input: TextInput,
    cursor: usize,
    scroll_offset: usize,
    input_area: Rect,
    button_area: Rect,
    rows_area: Rect,
}

impl TodoPanel {
    pub fn new(state: &AppState) -> Self {
        let mut input =
            TextInput::new("+ ", state.strings().add_todo_placeholder, C_INSERT_FG).keep_on_esc();
        input.set_value(&state.view().pending_todo_text);
        Self {
            input,
            cursor: 0,
            scroll_offset: 0,
            input_area: Rect::default(),
            button_area: Rect::default(),
            rows_area: Rect::default(),
        }
    }

    pub fn editing(&self) -> bool {
        self.input.is_active()
    }

    fn sync_input(&mut self, state: &AppState) {
        let pending = &state.view().pending_todo_text;
        if self.input.text() != pending {
            self.input.set_value(pending);
        }
    }

    fn clamp_cursor(&mut self, len: usize) {
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
    }

    fn cursor_id(&self, state: &AppState) -> Option<TodoId> {
        state.view().todos.get(self.cursor).map(|t| t.id)
    }

    fn handle_insert_key(&mut self, key: KeyEvent) -> Vec<Action> {
        match self.input.handle_key(key) {
            InputAction::Changed(text) => vec![Action::PendingTodoChanged(text)],
            InputAction::Submitted => vec![Action::SubmitTodo],
            InputAction::Cancelled | InputAction::None => Vec::new(),
        }
    }
}

impl Component for TodoPanel {
    fn id(&self) -> ComponentId {
        ComponentId::TodoPanel
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return Vec::new();
        }
        self.sync_input(state);
        if self.input.is_active() {
            return self.handle_insert_key(key);
        }

        let len = state.view().todos.len();
        self.clamp_cursor(len);
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor + 1 < len {
                    self.cursor += 1;
                }
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = len.saturating_sub(1),
            KeyCode::Char('a') | KeyCode::Char('i') | KeyCode::Enter => self.input.activate(),
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.cursor_id(state) {
                    return vec![Action::RemoveTodo(id)];
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, state: &AppState) -> Vec<Action> {
        let len = state.view().todos.len();
        match event.kind {
            MouseEventKind::ScrollUp => self.cursor = self.cursor.saturating_sub(1),
            MouseEventKind::ScrollDown => {
                if self.cursor + 1 < len {
                    self.cursor += 1;
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                let (col, row) = (event.column, event.row);
                if contains(self.button_area, col, row) {
                    return vec![Action::SubmitTodo];
                }
                if contains(self.input_area, col, row) {
                    self.input.activate();
                    return Vec::new();
                }
                if contains(self.rows_area, col, row) {
                    self.input.deactivate();
                    let idx = self.scroll_offset + (row - self.rows_area.y) as usize;
                    let Some(item) = state.view().todos.get(idx) else {
                        return Vec::new();
                    };
                    self.cursor = idx;
                    let delete_x = self.rows_area.x
                        + self
                            .rows_area
                            .width
                            .saturating_sub(text::width(DELETE_GLYPH) as u16);
                    if col >= delete_x {
                        return vec![Action::RemoveTodo(item.id)];
                    }
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        // Focus moving away ends typing; the text stays pending.
        if let Action::FocusNext | Action::FocusPrev | Action::FocusPane(_) = action {
            self.input.deactivate();
        }
        Vec::new()
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        self.sync_input(state);
        let strings = state.strings();
        let todos = &state.view().todos;
        let count = todos.len().to_string();
        let badge = (!todos.is_empty()).then(|| Badge {
            text: &count,
            color: C_SECONDARY,
        });
        let block = pane_chrome(strings.todo_title, Some('3'), focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        // ── Input row: [+ text......][ Add ] ─────────────────────────────────
        let button_label = format!(" {} ", strings.add_button);
        let button_w = (text::width(&button_label) as u16).min(inner.width);
        self.input_area = Rect {
            width: inner.width - button_w,
            height: 1,
            ..inner
        };
        self.button_area = Rect {
            x: inner.x + inner.width - button_w,
            width: button_w,
            height: 1,
            ..inner
        };
        self.input.set_placeholder(strings.add_todo_placeholder);
        self.input.draw(frame, self.input_area);
        frame.render_widget(
            Paragraph::new(Span::styled(button_label, style_button())),
            self.button_area,
        );

        // ── Task rows ────────────────────────────────────────────────────────
        self.rows_area = Rect {
            y: inner.y + 1,
            height: inner.height.saturating_sub(1),
            ..inner
        };
        let height = self.rows_area.height as usize;
        if todos.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(format!(" {}", strings.empty_todos_hint), style_muted())),
                self.rows_area,
            );
            return;
        }

        self.clamp_cursor(todos.len());
        if height > 0 {
            if self.cursor < self.scroll_offset {
                self.scroll_offset = self.cursor;
            } else if self.cursor >= self.scroll_offset + height {
                self.scroll_offset = self.cursor + 1 - height;
            }
        }

        let delete_w = text::width(DELETE_GLYPH);
        let text_w = (self.rows_area.width as usize).saturating_sub(delete_w + 1);
        let highlight = focused && !self.input.is_active();

        let items: Vec<ListItem> = todos
            .iter()
            .enumerate()
            .skip(self.scroll_offset)
            .take(height)
            .map(|(idx, todo)| {
                let body = text::truncate(&todo.text, text_w);
                let pad = text_w.saturating_sub(text::width(&body));
                let line = Line::from(vec![
                    Span::styled(format!(" {}{}", body, " ".repeat(pad)), style_default()),
                    Span::styled(
                        DELETE_GLYPH,
                        Style::default().fg(C_DELETE).add_modifier(Modifier::BOLD),
                    ),
                ]);
                let item = ListItem::new(line);
                if idx == self.cursor {
                    item.style(if highlight {
                        style_selected_focused()
                    } else {
                        style_selected()
                    })
                } else {
                    item
                }
            })
            .collect();
        frame.render_widget(List::new(items), self.rows_area);
    }
}

fn contains(r: Rect, col: u16, row: u16) -> bool {
    r.width > 0 && r.height > 0 && col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height
}
