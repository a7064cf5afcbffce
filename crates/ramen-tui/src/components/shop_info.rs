//! ShopInfo component: name and address of the selected shop.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent};
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
    theme::{style_muted, style_secondary, C_LOCATION, C_PRIMARY},
    widgets::pane_chrome::pane_chrome,
};

pub struct ShopInfo;

impl ShopInfo {
    pub fn new() -> Self {
        Self
    }
}

impl Component for ShopInfo {
    fn id(&self) -> ComponentId {
        ComponentId::ShopInfo
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return Vec::new();
        }
        let view = state.view();
        match (key.code, view.selected_shop) {
            (KeyCode::Char('y'), Some(shop)) => vec![Action::CopyToClipboard(format!(
                "{}\n{}",
                shop.display_name(view.language),
                shop.display_address(view.language)
            ))],
            (KeyCode::Char('x') | KeyCode::Delete, Some(_)) => vec![Action::ClearSelection],
            _ => Vec::new(),
        }
    }

    fn handle_mouse(&mut self, _event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        Vec::new()
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let view = state.view();
        let block = pane_chrome(state.strings().info_title, Some('2'), focused, None);

        let lines = match view.selected_shop {
            Some(shop) => {
                let other = view.language.next();
                vec![
                    Line::from(Span::styled(
                        shop.display_name(view.language),
                        Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(shop.display_name(other), style_secondary())),
                    Line::from(""),
                    Line::from(Span::styled(
                        shop.display_address(view.language),
                        Style::default().fg(C_LOCATION),
                    )),
                ]
            }
            None => vec![Line::from(Span::styled(
                state.strings().no_selection_hint,
                style_muted(),
            ))],
        };

        frame.render_widget(
            Paragraph::new(lines)
                .block(block)
                .wrap(Wrap { trim: true }),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::test_state;
    use ramen_core::Language;
    use ratatui::crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};

    fn rendered(state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(70, 8)).unwrap();
        terminal
            .draw(|f| ShopInfo::new().draw(f, f.area(), true, state))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_shows_hint_without_selection() {
        let mut state = test_state();
        state.controller.set_language(Language::En);
        assert!(rendered(&state).contains("No shop selected"));
    }

    #[test]
    fn test_shows_localized_address() {
        let mut state = test_state();
        state.controller.set_language(Language::En);
        state.controller.select_shop("Ippudo Ramen");
        let screen = rendered(&state);
        assert!(screen.contains("Ippudo Ramen"));
        assert!(screen.contains("85 Zhongshan North Rd"));
    }

    #[test]
    fn test_copy_needs_selection() {
        let mut state = test_state();
        let mut info = ShopInfo::new();
        let y = KeyEvent::new(KeyCode::Char('y'), KeyModifiers::NONE);
        assert!(info.handle_key(y, &state).is_empty());
        state.controller.select_shop_by_key("nagi");
        assert_eq!(
            info.handle_key(y, &state),
            vec![Action::CopyToClipboard(
                "拉麵凪\n台北市大安區大安路一段75巷5號".to_string()
            )]
        );
    }
}
