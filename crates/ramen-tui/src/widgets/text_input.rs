//! TextInput: single-line tui-input field used for the shop filter and
//! the new-task box.

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::theme::{C_INPUT_BG, C_MUTED};
use crate::widgets::text;

#[derive(Debug, PartialEq)]
pub enum InputAction {
    Changed(String),
    Submitted,
    Cancelled,
    None,
}

pub struct TextInput {
    input: Input,
    pub active: bool,
    prompt: &'static str,
    placeholder: String,
    color: Color,
    /// First Esc clears the text, second Esc leaves. Otherwise Esc leaves
    /// immediately and the text stays.
    clear_on_esc: bool,
}

impl TextInput {
    pub fn new(prompt: &'static str, placeholder: impl Into<String>, color: Color) -> Self {
        Self {
            input: Input::default(),
            active: false,
            prompt,
            placeholder: placeholder.into(),
            color,
            clear_on_esc: true,
        }
    }

    pub fn keep_on_esc(mut self) -> Self {
        self.clear_on_esc = false;
        self
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn clear(&mut self) {
        self.input = Input::default();
    }

    pub fn set_value(&mut self, value: &str) {
        self.input = Input::new(value.to_string());
    }

    pub fn set_placeholder(&mut self, placeholder: &str) {
        self.placeholder = placeholder.to_string();
    }

    pub fn text(&self) -> &str {
        self.input.value()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_empty(&self) -> bool {
        self.input.value().is_empty()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> InputAction {
        match key.code {
            KeyCode::Esc => {
                if self.clear_on_esc && !self.is_empty() {
                    self.clear();
                    InputAction::Changed(String::new())
                } else {
                    self.deactivate();
                    InputAction::Cancelled
                }
            }
            KeyCode::Enter => InputAction::Submitted,
            _ => {
                let before = self.input.value().to_string();
                self.input.handle_event(&Event::Key(key));
                if self.input.value() != before {
                    InputAction::Changed(self.input.value().to_string())
                } else {
                    InputAction::None
                }
            }
        }
    }

    /// Render the input bar into a one-row `area`.
    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let prompt_w = text::width(self.prompt) as u16;
        let scroll = self
            .input
            .visual_scroll(area.width.saturating_sub(prompt_w + 1) as usize);
        let value = self.input.value();
        let display = if value.is_empty() {
            Span::styled(
                format!("{}{}", self.prompt, self.placeholder),
                Style::default().fg(C_MUTED),
            )
        } else {
            Span::styled(
                format!("{}{}", self.prompt, text::skip_columns(value, scroll)),
                Style::default().fg(self.color),
            )
        };

        let paragraph =
            Paragraph::new(Line::from(vec![display])).style(Style::default().bg(C_INPUT_BG));
        frame.render_widget(paragraph, area);

        if self.active && area.width > 0 {
            let cursor_x = area.x + prompt_w + (self.input.visual_cursor() - scroll) as u16;
            frame.set_cursor_position((cursor_x.min(area.x + area.width - 1), area.y));
        }
    }
}
