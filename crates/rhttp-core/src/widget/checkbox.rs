use ratatui::text::{Line, Span};

use super::{Focusable, Notification, WidgetEvent, WidgetId, WidgetStyle};

const ON_LABEL: &str = "[x] ";
const OFF_LABEL: &str = "[ ] ";

/// Two-state toggle. It knows nothing about what the flag means; owners
/// react to the `Toggled` notification.
#[derive(Debug, Clone)]
pub struct Checkbox {
    id: WidgetId,
    label: String,
    on: bool,
    focused: bool,
}

impl Checkbox {
    pub fn new(id: WidgetId, label: impl Into<String>, on: bool) -> Self {
        Self {
            id,
            label: label.into(),
            on,
            focused: false,
        }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn set(&mut self, on: bool) {
        self.on = on;
    }

    pub fn toggle(&mut self) -> Notification {
        self.on = !self.on;
        Notification::Toggled {
            id: self.id,
            on: self.on,
        }
    }

    pub fn line(&self, style: &WidgetStyle) -> Line<'static> {
        let (mark, mark_style) = if self.on {
            (ON_LABEL, style.checkbox_on)
        } else {
            (OFF_LABEL, style.checkbox_off)
        };
        let label_style = if self.focused {
            style.prompt_active
        } else {
            style.prompt
        };
        Line::from(vec![
            Span::styled(mark, mark_style),
            Span::styled(self.label.clone(), label_style),
        ])
    }
}

impl Focusable for Checkbox {
    fn focus(&mut self) {
        self.focused = true;
    }

    fn blur(&mut self) {
        self.focused = false;
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn handle(&mut self, event: &WidgetEvent) -> Option<Notification> {
        match event {
            WidgetEvent::Toggle => Some(self.toggle()),
            _ => None,
        }
    }
}
