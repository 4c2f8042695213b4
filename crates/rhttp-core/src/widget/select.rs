use crossterm::event::KeyCode;
use ratatui::text::{Line, Span};

use super::{Focusable, Notification, WidgetEvent, WidgetId, WidgetStyle};

/// An ordered list of options with one selected.
#[derive(Debug, Clone)]
pub struct SingleSelect {
    id: WidgetId,
    label: String,
    options: Vec<String>,
    selected: usize,
    focused: bool,
}

impl SingleSelect {
    pub fn new<I, S>(id: WidgetId, label: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id,
            label: label.into(),
            options: options.into_iter().map(Into::into).collect(),
            selected: 0,
            focused: false,
        }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&str> {
        self.options.get(self.selected).map(String::as_str)
    }

    /// Select the option equal to `option`. Returns whether it was found.
    pub fn select_option(&mut self, option: &str) -> bool {
        match self.options.iter().position(|o| o == option) {
            Some(index) => {
                self.selected = index;
                true
            }
            None => false,
        }
    }

    pub fn next(&mut self) {
        if !self.options.is_empty() {
            self.selected = (self.selected + 1) % self.options.len();
        }
    }

    pub fn prev(&mut self) {
        if !self.options.is_empty() {
            self.selected = (self.selected + self.options.len() - 1) % self.options.len();
        }
    }

    pub fn line(&self, style: &WidgetStyle) -> Line<'static> {
        let label_style = if self.focused {
            style.prompt_active
        } else {
            style.prompt
        };
        let mut spans = vec![Span::styled(format!("{}: ", self.label), label_style)];
        for (i, option) in self.options.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" ", style.placeholder));
            }
            if i == self.selected {
                spans.push(Span::styled(format!("<{option}>"), style.checkbox_on));
            } else {
                spans.push(Span::styled(option.clone(), style.checkbox_off));
            }
        }
        Line::from(spans)
    }
}

impl Focusable for SingleSelect {
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
            WidgetEvent::Toggle => self.next(),
            WidgetEvent::Key(key) => match key.code {
                KeyCode::Right | KeyCode::Down => self.next(),
                KeyCode::Left | KeyCode::Up => self.prev(),
                _ => {}
            },
            WidgetEvent::Confirm => {
                return self.selected().map(|option| Notification::Selected {
                    id: self.id,
                    index: self.selected,
                    option: option.to_string(),
                });
            }
            WidgetEvent::Autocomplete => {}
        }
        None
    }
}
