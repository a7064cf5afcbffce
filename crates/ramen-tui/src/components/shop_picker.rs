//! ShopPicker component: the shop selector pane.
//!
//! The first row is the placeholder ("Please select"); it is drawn but can
//! never be chosen. Below it, one row per catalog shop in the current
//! language, filterable with `/`.

use ramen_core::catalog::{self, ShopRecord};
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
        style_default, style_muted, style_selected, style_selected_focused, C_BROTH,
        C_FILTER_FG, C_MUTED,
    },
    widgets::{
        pane_chrome::{pane_chrome, Badge},
        scrollable_list::ScrollableList,
        text,
        text_input::{InputAction, TextInput},
    },
};

pub struct ShopPicker {
    pub list: ScrollableList<&'static ShopRecord>,
    pub filter_input: TextInput,
    /// Rows area of the last draw, for mouse hit-testing.
    list_area: Rect,
}

impl ShopPicker {
    pub fn new(state: &AppState) -> Self {
        let mut list = ScrollableList::new(|shop: &&'static ShopRecord, q: &str| shop.matches(q));
        list.set_items(catalog::all().iter().collect());
        if let Some(selected) = state.view().selected_shop {
            if let Some(idx) = catalog::all().iter().position(|s| s.key == selected.key) {
                list.set_selected_by_original(idx);
            }
        }
        Self {
            list,
            filter_input: TextInput::new("/ ", state.strings().filter_placeholder, C_FILTER_FG),
            list_area: Rect::default(),
        }
    }

    pub fn filter_active(&self) -> bool {
        self.filter_input.is_active()
    }

    fn choose_cursor(&self) -> Vec<Action> {
        match self.list.selected_item() {
            Some(shop) => vec![Action::SelectShop(shop.key)],
            None => Vec::new(),
        }
    }

    fn handle_filter_key(&mut self, key: KeyEvent) -> Vec<Action> {
        match key.code {
            KeyCode::Up => {
                self.list.select_up(1);
                return Vec::new();
            }
            KeyCode::Down => {
                self.list.select_down(1);
                return Vec::new();
            }
            _ => {}
        }
        match self.filter_input.handle_key(key) {
            InputAction::Changed(q) => self.list.set_filter(&q),
            InputAction::Submitted => self.filter_input.deactivate(),
            InputAction::Cancelled => self.list.set_filter(""),
            InputAction::None => {}
        }
        Vec::new()
    }
}

impl Component for ShopPicker {
    fn id(&self) -> ComponentId {
        ComponentId::ShopPicker
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return Vec::new();
        }
        if self.filter_input.is_active() {
            return self.handle_filter_key(key);
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(1),
            KeyCode::Home => self.list.select_first(),
            KeyCode::End => self.list.select_last(),
            KeyCode::Enter => return self.choose_cursor(),
            KeyCode::Char('x') => return vec![Action::ClearSelection],
            KeyCode::Char('/') => self.filter_input.activate(),
            KeyCode::Esc if !self.filter_input.is_empty() => {
                self.filter_input.clear();
                self.list.set_filter("");
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        match event.kind {
            MouseEventKind::ScrollUp => self.list.select_up(1),
            MouseEventKind::ScrollDown => self.list.select_down(1),
            MouseEventKind::Down(MouseButton::Left) => {
                let r = self.list_area;
                if event.row >= r.y && event.row < r.y + r.height && event.column >= r.x {
                    let row = (event.row - r.y) as usize;
                    if self.list.handle_click(row) {
                        return self.choose_cursor();
                    }
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if matches!(action, Action::CloseFilter) {
            self.filter_input.deactivate();
        }
        Vec::new()
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let strings = state.strings();
        let lang = state.view().language;
        let count = format!("{}/{}", self.list.len(), catalog::all().len());
        let badge = (!self.list.filter.is_empty()).then(|| Badge {
            text: &count,
            color: C_FILTER_FG,
        });
        let block = pane_chrome(strings.select_label, Some('1'), focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height == 0 {
            return;
        }

        self.filter_input.set_placeholder(strings.filter_placeholder);
        let show_filter = self.filter_input.is_active() || !self.filter_input.is_empty();
        let filter_h = u16::from(show_filter && inner.height > 2);

        // Placeholder row: visible, never selectable
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!("  {}", strings.select_placeholder),
                style_muted().add_modifier(Modifier::ITALIC),
            ))),
            Rect { height: 1, ..inner },
        );

        let rows_area = Rect {
            y: inner.y + 1,
            height: inner.height.saturating_sub(1 + filter_h),
            ..inner
        };
        self.list_area = rows_area;

        if filter_h == 1 {
            self.filter_input.draw(
                frame,
                Rect {
                    y: inner.y + inner.height - 1,
                    height: 1,
                    ..inner
                },
            );
        }

        if self.list.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(format!("  {}", strings.no_matches), style_muted())),
                rows_area,
            );
            return;
        }

        let height = rows_area.height as usize;
        self.list.ensure_visible(height);
        let cursor_in_view = self.list.selected.saturating_sub(self.list.scroll_offset);
        let selected_key = state.view().selected_shop.map(|s| s.key);
        let name_w = (rows_area.width as usize).saturating_sub(3);

        let items: Vec<ListItem> = self
            .list
            .visible_items(height)
            .into_iter()
            .enumerate()
            .map(|(row, (_, shop))| {
                let chosen = selected_key == Some(shop.key);
                let marker = if chosen {
                    Span::styled(" ● ", Style::default().fg(C_BROTH))
                } else {
                    Span::styled("   ", Style::default().fg(C_MUTED))
                };
                let name = text::truncate(shop.display_name(lang), name_w);
                let name_style = if chosen {
                    style_default().fg(C_BROTH).add_modifier(Modifier::BOLD)
                } else {
                    style_default()
                };
                let line = Line::from(vec![marker, Span::styled(name, name_style)]);
                let item = ListItem::new(line);
                if row == cursor_in_view {
                    item.style(if focused {
                        style_selected_focused()
                    } else {
                        style_selected()
                    })
                } else {
                    item
                }
            })
            .collect();

        frame.render_widget(List::new(items), rows_area);
    }
}
