pub mod header;
pub mod help_overlay;
pub mod joke_panel;
pub mod shop_info;
pub mod shop_picker;
pub mod todo_panel;
