//! JokePanel component: the "generate joke" button and the last joke shown.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{style_button, style_muted, C_BADGE_PENDING, C_PRIMARY, C_SECONDARY},
    widgets::{
        pane_chrome::{pane_chrome, Badge},
        text,
    },
};

pub struct JokePanel {
    button_area: Rect,
}

impl JokePanel {
    pub fn new() -> Self {
        Self {
            button_area: Rect::default(),
        }
    }
}

impl Component for JokePanel {
    fn id(&self) -> ComponentId {
        ComponentId::JokePanel
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return Vec::new();
        }
        match key.code {
            KeyCode::Enter => vec![Action::FetchJoke],
            KeyCode::Char('y') => match &state.view().joke {
                Some(joke) => vec![Action::CopyToClipboard(format!(
                    "{}\n{}",
                    joke.setup, joke.punchline
                ))],
                None => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        let r = self.button_area;
        let hit = event.column >= r.x
            && event.column < r.x + r.width
            && event.row >= r.y
            && event.row < r.y + r.height;
        if event.kind == MouseEventKind::Down(MouseButton::Left) && hit {
            return vec![Action::FetchJoke];
        }
        Vec::new()
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let strings = state.strings();
        let badge = state.joke_pending().then_some(Badge {
            text: strings.fetching,
            color: C_BADGE_PENDING,
        });
        let block = pane_chrome(strings.joke_title, Some('4'), focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height == 0 {
            return;
        }

        let label = format!(" {} ", strings.joke_button);
        let mut button = vec![Span::styled(label.clone(), style_button())];
        if let Some(at) = state.joke_fetched_at {
            button.push(Span::styled(
                format!("  {}", at.format("%H:%M:%S")),
                style_muted(),
            ));
        }
        self.button_area = Rect {
            width: (text::width(&label) as u16).min(inner.width),
            height: 1,
            ..inner
        };
        frame.render_widget(Paragraph::new(Line::from(button)), Rect { height: 1, ..inner });

        let body_area = Rect {
            y: inner.y + 1,
            height: inner.height.saturating_sub(1),
            ..inner
        };
        if body_area.height == 0 {
            return;
        }
        let lines = match &state.view().joke {
            Some(joke) => vec![
                Line::from(""),
                Line::from(Span::styled(
                    joke.setup.clone(),
                    Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    joke.punchline.clone(),
                    Style::default().fg(C_SECONDARY),
                )),
            ],
            None => vec![
                Line::from(""),
                Line::from(Span::styled(strings.no_joke_hint, style_muted())),
            ],
        };
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), body_area);
    }
}
