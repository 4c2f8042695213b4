use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::Style,
    text::{Line, Span},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::config::Config;
use crate::widget::WidgetStyle;

/// Helper to create a centered rect within a given area.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Length(width)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

/// Widget styles read from the theme.
pub fn widget_style(config: &mut Config) -> WidgetStyle {
    let fg = |config: &mut Config, name: &str| Style::default().fg(config.color(name));
    WidgetStyle {
        prompt: fg(config, "prompt"),
        prompt_active: fg(config, "prompt_active"),
        text: fg(config, "text_value"),
        placeholder: fg(config, "placeholder"),
        placeholder_active: fg(config, "placeholder_active"),
        suggestion: fg(config, "suggestion"),
        checkbox_on: fg(config, "checkbox_on"),
        checkbox_off: fg(config, "checkbox_off"),
    }
}

/// Cut `text` to at most `width` display columns.
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out
}

/// `name: value` line used by the request and response summaries.
pub fn key_value_line(
    name: &str,
    value: &str,
    name_style: Style,
    value_style: Style,
) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{name}: "), name_style),
        Span::styled(value.to_string(), value_style),
    ])
}
