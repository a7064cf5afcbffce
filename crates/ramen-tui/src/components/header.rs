//! Header: two rows: localized title, then the language selector.

use ramen_core::i18n::LANGUAGE_LABEL;
use ramen_core::Language;
use ratatui::crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{style_secondary, style_title, C_MUTED, C_PRIMARY, C_SELECTION_BG},
    widgets::text,
};

pub struct Header {
    /// Where each language option was last drawn, for click hit-testing.
    option_areas: Vec<(Language, Rect)>,
}

impl Header {
    pub fn new() -> Self {
        Self {
            option_areas: Vec::new(),
        }
    }
}

impl Component for Header {
    fn id(&self) -> ComponentId {
        ComponentId::Header
    }

    fn handle_key(&mut self, _key: KeyEvent, _state: &AppState) -> Vec<Action> {
        Vec::new()
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, state: &AppState) -> Vec<Action> {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return Vec::new();
        }
        let hit = self.option_areas.iter().find(|(_, r)| {
            event.column >= r.x
                && event.column < r.x + r.width
                && event.row >= r.y
                && event.row < r.y + r.height
        });
        match hit {
            // Re-selecting the active option is not a change
            Some(&(lang, _)) if lang != state.view().language => vec![Action::SetLanguage(lang)],
            _ => Vec::new(),
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        if area.height == 0 {
            return;
        }
        let strings = state.strings();
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(format!(" {}", strings.title), style_title()))),
            Rect { height: 1, ..area },
        );
        if area.height < 2 {
            self.option_areas.clear();
            return;
        }

        let row = area.y + 1;
        let current = state.view().language;
        let mut spans = vec![Span::styled(format!(" {} ", LANGUAGE_LABEL), style_secondary())];
        let mut x = area.x + text::width(LANGUAGE_LABEL) as u16 + 2;
        self.option_areas.clear();
        for lang in Language::ALL {
            let label = format!(" {} ", lang.option_label());
            let w = text::width(&label) as u16;
            let style = if lang == current {
                Style::default()
                    .fg(C_PRIMARY)
                    .bg(C_SELECTION_BG)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(C_MUTED)
            };
            self.option_areas.push((
                lang,
                Rect {
                    x,
                    y: row,
                    width: w,
                    height: 1,
                },
            ));
            spans.push(Span::styled(label, style));
            spans.push(Span::raw(" "));
            x += w + 1;
        }
        spans.push(Span::styled("(l)", Style::default().fg(C_MUTED)));

        frame.render_widget(
            Paragraph::new(Line::from(spans)),
            Rect {
                y: row,
                height: 1,
                ..area
            },
        );
    }
}
