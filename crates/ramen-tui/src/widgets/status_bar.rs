//! Status bar: bottom line with the input mode and keybindings.

use ramen_core::Strings;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_MODE_FILTER, C_MODE_INSERT, C_MODE_NORMAL, C_MUTED, C_SEPARATOR};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing into the shop filter.
    Filter,
    /// Typing a new to-do.
    Insert,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Filter => "FILTER",
            Self::Insert => "INSERT",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Self::Normal => C_MODE_NORMAL,
            Self::Filter => C_MODE_FILTER,
            Self::Insert => C_MODE_INSERT,
        }
    }

    fn keys(self, strings: &Strings) -> &'static str {
        match self {
            Self::Normal => strings.keys_normal,
            Self::Filter => strings.keys_filter,
            Self::Insert => strings.keys_insert,
        }
    }
}

/// Draw a horizontal separator line.
pub fn draw_separator(frame: &mut Frame, area: Rect) {
    let line = Line::from(Span::styled(
        "─".repeat(area.width as usize),
        Style::default().fg(C_SEPARATOR),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, mode: InputMode, strings: &Strings) {
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", mode.label()),
            Style::default().fg(mode.color()).add_modifier(Modifier::BOLD),
        ),
        Span::styled(mode.keys(strings), Style::default().fg(C_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
