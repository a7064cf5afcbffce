//! HelpOverlay component: centered popup with keyboard shortcut reference.

use ratatui::crossterm::event::{KeyEvent, KeyEventKind, MouseEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{C_BG, C_MUTED, C_PANEL_BORDER, C_PRIMARY, C_SECONDARY},
    widgets::text,
};

pub struct HelpOverlay {
    pub visible: bool,
}

impl HelpOverlay {
    pub fn new() -> Self {
        Self { visible: false }
    }
}

impl Component for HelpOverlay {
    fn id(&self) -> ComponentId {
        ComponentId::HelpOverlay
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release || !self.visible {
            return Vec::new();
        }
        // Any key press closes the overlay; nothing reaches the panes behind it.
        vec![Action::ToggleHelp]
    }

    fn handle_mouse(&mut self, _event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        Vec::new()
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if matches!(action, Action::ToggleHelp) {
            self.visible = !self.visible;
        }
        Vec::new()
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        if !self.visible {
            return;
        }
        let strings = state.strings();
        let key_w = strings
            .help_rows
            .iter()
            .map(|(k, _)| text::width(k))
            .max()
            .unwrap_or(0)
            + 2;

        let mut lines = vec![
            Line::from(Span::styled(
                strings.help_title,
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        lines.extend(strings.help_rows.iter().map(|(k, d)| help_row(k, d, key_w)));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            " ? / esc",
            Style::default().fg(C_MUTED),
        )));

        let popup = centered_rect(64, lines.len() as u16 + 2, area);
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(C_PANEL_BORDER))
                        .style(Style::default().bg(C_BG)),
                )
                .wrap(Wrap { trim: false }),
            popup,
        );
    }
}

/// Key column padded by display width so CJK descriptions line up.
fn help_row<'a>(key: &'a str, desc: &'a str, key_w: usize) -> Line<'a> {
    let pad = key_w.saturating_sub(text::width(key));
    Line::from(vec![
        Span::raw(" "),
        Span::styled(
            format!("{}{}", key, " ".repeat(pad)),
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
        ),
        Span::styled(desc, Style::default().fg(C_SECONDARY)),
    ])
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vert[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::test_state;
    use ratatui::crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_hidden_overlay_ignores_keys() {
        let state = test_state();
        let mut help = HelpOverlay::new();
        assert!(help.handle_key(key(KeyCode::Esc), &state).is_empty());
    }

    #[test]
    fn test_close_keys_toggle() {
        let state = test_state();
        let mut help = HelpOverlay::new();
        help.on_action(&Action::ToggleHelp, &state);
        assert!(help.visible);
        for code in [KeyCode::Char('j'), KeyCode::Char('q'), KeyCode::Enter] {
            assert_eq!(help.handle_key(key(code), &state), vec![Action::ToggleHelp]);
        }
        let actions = help.handle_key(key(KeyCode::Esc), &state);
        help.on_action(&actions[0], &state);
        assert!(!help.visible);
    }

    #[test]
    fn test_key_release_keeps_overlay_open() {
        let state = test_state();
        let mut help = HelpOverlay::new();
        help.on_action(&Action::ToggleHelp, &state);
        let mut release = key(KeyCode::Char('j'));
        release.kind = KeyEventKind::Release;
        assert!(help.handle_key(release, &state).is_empty());
    }

    #[test]
    fn test_centered_rect_fits_inside() {
        let r = centered_rect(64, 10, Rect::new(0, 0, 100, 40));
        assert_eq!(r.height, 10);
        assert!(r.x > 0 && r.x + r.width < 100);
    }
}
