//! Focusable form widgets.
//!
//! Every widget implements [`Focusable`]: it takes a [`WidgetEvent`], updates
//! its own value and returns at most one [`Notification`] for its owner.
//! Widgets never fail; problems travel inside notifications.

mod checkbox;
mod file_capture;
mod select;
mod text_field;

pub use checkbox::Checkbox;
pub use file_capture::{
    FileCapture, FileHandle, FileMode, FileOutcome, OpenRequest, MAX_PATH_SUGGESTIONS,
};
pub use select::SingleSelect;
pub use text_field::{Normalizer, TextField};

use crossterm::event::KeyEvent;
use ratatui::style::Style;
use ratatui::text::Line;

/// Stable identity of a widget that emits notifications.
pub type WidgetId = &'static str;

/// Input delivered to the focused widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetEvent {
    /// Raw editing key (characters, backspace, arrows).
    Key(KeyEvent),
    Confirm,
    Toggle,
    Autocomplete,
}

/// What a widget tells its owner after handling an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A text field was confirmed with this (normalised) value.
    Committed { value: String },
    Toggled { id: WidgetId, on: bool },
    Selected {
        id: WidgetId,
        index: usize,
        option: String,
    },
    /// A file capture was confirmed and wants `path` opened.
    OpenRequested(OpenRequest),
}

pub trait Focusable {
    fn focus(&mut self);
    fn blur(&mut self);
    fn is_focused(&self) -> bool;
    fn handle(&mut self, event: &WidgetEvent) -> Option<Notification>;
}

/// Styles used to draw widgets.
#[derive(Debug, Clone, Copy, Default)]
pub struct WidgetStyle {
    pub prompt: Style,
    pub prompt_active: Style,
    pub text: Style,
    pub placeholder: Style,
    pub placeholder_active: Style,
    pub suggestion: Style,
    pub checkbox_on: Style,
    pub checkbox_off: Style,
}

/// The closed set of widget kinds the form is built from.
#[derive(Debug)]
pub enum Widget {
    Text(TextField),
    Checkbox(Checkbox),
    Select(SingleSelect),
    File(FileCapture),
}

impl Widget {
    pub fn line(&self, style: &WidgetStyle) -> Line<'static> {
        match self {
            Widget::Text(w) => w.line(style),
            Widget::Checkbox(w) => w.line(style),
            Widget::Select(w) => w.line(style),
            Widget::File(w) => w.line(style),
        }
    }

    /// Whether typed characters go to this widget rather than key bindings.
    pub fn accepts_text(&self) -> bool {
        matches!(self, Widget::Text(_) | Widget::File(_))
    }

    pub fn as_text(&self) -> Option<&TextField> {
        match self {
            Widget::Text(w) => Some(w),
            Widget::File(w) => Some(w.field()),
            _ => None,
        }
    }
}

impl Focusable for Widget {
    fn focus(&mut self) {
        match self {
            Widget::Text(w) => w.focus(),
            Widget::Checkbox(w) => w.focus(),
            Widget::Select(w) => w.focus(),
            Widget::File(w) => w.focus(),
        }
    }

    fn blur(&mut self) {
        match self {
            Widget::Text(w) => w.blur(),
            Widget::Checkbox(w) => w.blur(),
            Widget::Select(w) => w.blur(),
            Widget::File(w) => w.blur(),
        }
    }

    fn is_focused(&self) -> bool {
        match self {
            Widget::Text(w) => w.is_focused(),
            Widget::Checkbox(w) => w.is_focused(),
            Widget::Select(w) => w.is_focused(),
            Widget::File(w) => w.is_focused(),
        }
    }

    fn handle(&mut self, event: &WidgetEvent) -> Option<Notification> {
        match self {
            Widget::Text(w) => w.handle(event),
            Widget::Checkbox(w) => w.handle(event),
            Widget::Select(w) => w.handle(event),
            Widget::File(w) => w.handle(event),
        }
    }
}
