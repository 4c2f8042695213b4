use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use super::{Focusable, Notification, WidgetEvent, WidgetStyle};

/// Rewrites a field value on commit (e.g. header name canonicalisation).
pub type Normalizer = fn(&str) -> String;

/// A single-line text input with a prompt, placeholder and suggestions.
#[derive(Debug, Clone, Default)]
pub struct TextField {
    prompt: String,
    placeholder: String,
    value: String,
    /// Byte offset into `value`, always on a char boundary.
    cursor: usize,
    suggestions: Vec<String>,
    normalizer: Option<Normalizer>,
    focused: bool,
}

impl TextField {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.set_value(value);
        self
    }

    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = suggestions;
        self
    }

    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.value.len();
    }

    /// Terminal column of the edit cursor, relative to the start of the line.
    pub fn cursor_column(&self) -> u16 {
        let width = self.prompt.width() + self.value[..self.cursor].width();
        u16::try_from(width).unwrap_or(u16::MAX)
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn set_suggestions(&mut self, suggestions: Vec<String>) {
        self.suggestions = suggestions;
    }

    /// First suggestion that extends the current value (case-insensitive).
    pub fn current_suggestion(&self) -> Option<&str> {
        let typed = self.value.to_lowercase();
        self.suggestions
            .iter()
            .find(|s| s.len() > self.value.len() && s.to_lowercase().starts_with(&typed))
            .map(String::as_str)
    }

    /// Replace the value with the current suggestion. Returns whether it changed.
    pub fn autocomplete(&mut self) -> bool {
        match self.current_suggestion().map(str::to_string) {
            Some(suggestion) => {
                self.set_value(suggestion);
                true
            }
            None => false,
        }
    }

    /// Apply the normaliser in place and return the committed value.
    pub fn commit(&mut self) -> &str {
        if let Some(normalize) = self.normalizer {
            let normalized = normalize(&self.value);
            self.set_value(normalized);
        }
        &self.value
    }

    pub fn insert_char(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = self.value[..self.cursor]
                .chars()
                .last()
                .map(|c| c.len_utf8())
                .unwrap_or(0);
            self.cursor -= prev;
            self.value.remove(self.cursor);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.len() {
            self.value.remove(self.cursor);
        }
    }

    pub fn cursor_left(&mut self) {
        if self.cursor > 0 {
            let prev = self.value[..self.cursor]
                .chars()
                .last()
                .map(|c| c.len_utf8())
                .unwrap_or(0);
            self.cursor -= prev;
        }
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.value.len() {
            let next = self.value[self.cursor..]
                .chars()
                .next()
                .map(|c| c.len_utf8())
                .unwrap_or(0);
            self.cursor += next;
        }
    }

    pub fn line(&self, style: &WidgetStyle) -> Line<'static> {
        let prompt_style = if self.focused {
            style.prompt_active
        } else {
            style.prompt
        };
        let mut spans = vec![Span::styled(self.prompt.clone(), prompt_style)];

        if self.value.is_empty() {
            let placeholder_style = if self.focused {
                style.placeholder_active
            } else {
                style.placeholder
            };
            spans.push(Span::styled(self.placeholder.clone(), placeholder_style));
        } else {
            spans.push(Span::styled(self.value.clone(), style.text));
            let hint = self.current_suggestion().filter(|_| self.focused);
            if let Some(suggestion) = hint {
                // Suggestions match case-insensitively; show the untyped tail.
                let tail: String = suggestion.chars().skip(self.value.chars().count()).collect();
                spans.push(Span::styled(tail, style.suggestion));
            }
        }
        Line::from(spans)
    }
}

impl Focusable for TextField {
    fn focus(&mut self) {
        self.focused = true;
        self.cursor_end();
    }

    fn blur(&mut self) {
        self.focused = false;
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn handle(&mut self, event: &WidgetEvent) -> Option<Notification> {
        match event {
            WidgetEvent::Confirm => Some(Notification::Committed {
                value: self.commit().to_string(),
            }),
            WidgetEvent::Autocomplete => {
                self.autocomplete();
                None
            }
            WidgetEvent::Toggle => {
                self.insert_char(' ');
                None
            }
            WidgetEvent::Key(key) => {
                if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
                    return None;
                }
                match key.code {
                    KeyCode::Char(c) => self.insert_char(c),
                    KeyCode::Backspace => self.backspace(),
                    KeyCode::Delete => self.delete(),
                    KeyCode::Left => self.cursor_left(),
                    KeyCode::Right => {
                        if self.cursor == self.value.len() {
                            self.autocomplete();
                        } else {
                            self.cursor_right();
                        }
                    }
                    KeyCode::Home => self.cursor = 0,
                    KeyCode::End => self.cursor_end(),
                    _ => {}
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    fn typed(field: &mut TextField, text: &str) {
        for c in text.chars() {
            field.handle(&WidgetEvent::Key(KeyEvent::new(
                KeyCode::Char(c),
                KeyModifiers::NONE,
            )));
        }
    }

    fn key(field: &mut TextField, code: KeyCode) {
        field.handle(&WidgetEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    #[test]
    fn test_editing_handles_multibyte_chars() {
        let mut field = TextField::new("> ");
        typed(&mut field, "héllo");
        assert_eq!(field.value(), "héllo");

        key(&mut field, KeyCode::Left);
        key(&mut field, KeyCode::Left);
        key(&mut field, KeyCode::Left);
        key(&mut field, KeyCode::Backspace);
        assert_eq!(field.value(), "hllo");
        assert_eq!(field.cursor(), 1);

        key(&mut field, KeyCode::Delete);
        assert_eq!(field.value(), "hlo");
        key(&mut field, KeyCode::Home);
        assert_eq!(field.cursor(), 0);
        key(&mut field, KeyCode::End);
        assert_eq!(field.cursor(), 3);
    }

    #[test]
    fn test_focus_moves_cursor_to_end_and_keeps_value() {
        let mut field = TextField::new("Host: ").with_value("localhost");
        field.cursor = 0;
        field.focus();
        assert!(field.is_focused());
        assert_eq!(field.cursor(), "localhost".len());
        field.blur();
        assert!(!field.is_focused());
        assert_eq!(field.value(), "localhost");
    }

    #[test]
    fn test_suggestion_is_case_insensitive_prefix() {
        let mut field = TextField::new("Method: ")
            .with_suggestions(vec!["GET".to_string(), "POST".to_string(), "PUT".to_string()]);
        typed(&mut field, "p");
        assert_eq!(field.current_suggestion(), Some("POST"));
        typed(&mut field, "u");
        assert_eq!(field.current_suggestion(), Some("PUT"));
        assert!(field.autocomplete());
        assert_eq!(field.value(), "PUT");
        assert_eq!(field.current_suggestion(), None);
        assert!(!field.autocomplete());
    }

    #[test]
    fn test_confirm_runs_normalizer() {
        let mut field =
            TextField::new("Header: ").with_normalizer(|s| s.trim().to_uppercase());
        typed(&mut field, " abc ");
        assert_eq!(
            field.handle(&WidgetEvent::Confirm),
            Some(Notification::Committed {
                value: "ABC".to_string()
            })
        );
        assert_eq!(field.value(), "ABC");
    }

    #[test]
    fn test_control_chords_are_ignored() {
        let mut field = TextField::new("");
        field.handle(&WidgetEvent::Key(KeyEvent::new(
            KeyCode::Char('g'),
            KeyModifiers::CONTROL,
        )));
        assert_eq!(field.value(), "");
    }

    #[test]
    fn test_cursor_column_counts_display_width() {
        let mut field = TextField::new("Path: ");
        typed(&mut field, "/日本");
        assert_eq!(field.cursor_column(), 6 + 1 + 4);
    }

    #[test]
    fn test_line_shows_placeholder_when_empty() {
        let field = TextField::new("Host: ").with_placeholder("example.com");
        let line = field.line(&WidgetStyle::default());
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "Host: example.com");
    }
}
