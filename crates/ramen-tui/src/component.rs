//! Component trait: the interface every UI panel implements.
//!
//! - Components own their local UI state (cursor, scroll, input buffers).
//! - Components receive `AppState` read-only for everything the view
//!   controller owns.
//! - Components return `Vec<Action>`; only the App mutates the controller.

use ratatui::crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{layout::Rect, Frame};

use crate::action::{Action, ComponentId};
use crate::app_state::AppState;

pub trait Component {
    fn id(&self) -> ComponentId;

    /// Handle a key event. Only called when this component has focus.
    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action>;

    /// Handle a mouse event inside the component's last drawn `area`.
    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, state: &AppState) -> Vec<Action>;

    /// Receive an action dispatched by the App, focused or not.
    fn on_action(&mut self, _action: &Action, _state: &AppState) -> Vec<Action> {
        Vec::new()
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState);
}
