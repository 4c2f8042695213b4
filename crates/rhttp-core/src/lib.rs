pub mod config;
pub mod help_popup;
pub mod keybinds;
pub mod kv;
pub mod paginator;
pub mod status_bar;
pub mod ui;
pub mod widget;
