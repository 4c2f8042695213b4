use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::keybinds::{Action, KeyMap};
use crate::ui::centered_rect;

/// A single entry in the help popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpEntry {
    /// Chords bound to the action (e.g. "ctrl+q / ctrl+c").
    pub key: String,
    pub description: String,
    pub section: &'static str,
}

/// The help overlay state.
#[derive(Debug, Default)]
pub struct HelpPopup {
    pub visible: bool,
    entries: Vec<HelpEntry>,
    scroll: u16,
}

impl HelpPopup {
    pub fn new(keys: &KeyMap) -> Self {
        Self {
            visible: false,
            entries: help_entries(keys),
            scroll: 0,
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        self.scroll = 0;
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.scroll = 0;
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn entries(&self) -> &[HelpEntry] {
        &self.entries
    }

    /// Render the help popup centered on screen.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.visible || self.entries.is_empty() {
            return;
        }

        let lines = self.build_lines();

        let popup_width = (area.width.saturating_sub(8)).min(64);
        let popup_height = (area.height.saturating_sub(4)).min(lines.len() as u16 + 2);
        let popup_area = centered_rect(popup_width, popup_height, area);

        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" rHttp help ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL);

        let max_scroll = (lines.len() as u16).saturating_sub(popup_height.saturating_sub(2));
        let scroll = self.scroll.min(max_scroll);

        let paragraph = Paragraph::new(lines).block(block).scroll((scroll, 0));
        frame.render_widget(paragraph, popup_area);
    }

    fn build_lines(&self) -> Vec<Line<'static>> {
        let mut lines: Vec<Line<'static>> = Vec::new();
        let mut current_section: Option<&str> = None;

        for entry in &self.entries {
            if current_section != Some(entry.section) {
                if !lines.is_empty() {
                    lines.push(Line::from(""));
                }
                lines.push(Line::from(Span::styled(
                    format!(" {}", entry.section),
                    Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                )));
                current_section = Some(entry.section);
            }

            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:>18} ", entry.key),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled("  ", Style::default().add_modifier(Modifier::DIM)),
                Span::raw(entry.description.clone()),
            ]));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            " Esc  close    up/down  scroll",
            Style::default().add_modifier(Modifier::DIM),
        )));

        lines
    }
}

fn section(action: Action) -> &'static str {
    match action {
        Action::Next
        | Action::Prev
        | Action::Confirm
        | Action::Delete
        | Action::ToggleCheckbox
        | Action::Autocomplete => "Fields",
        Action::Send | Action::PageUp | Action::PageDown | Action::FullScreen => "Request",
        Action::SaveSession | Action::LoadSession => "Session",
        Action::Help | Action::Quit => "Other",
    }
}

/// One entry per bound action, grouped by section.
pub fn help_entries(keys: &KeyMap) -> Vec<HelpEntry> {
    let mut entries: Vec<HelpEntry> = Action::ALL
        .into_iter()
        .filter(|action| !keys.chords(*action).is_empty())
        .map(|action| HelpEntry {
            key: keys.label(action),
            description: action.description().to_string(),
            section: section(action),
        })
        .collect();
    // Stable sort keeps action order inside each section.
    let rank = |s: &str| ["Fields", "Request", "Session", "Other"].iter().position(|x| *x == s);
    entries.sort_by_key(|e| rank(e.section));
    entries
}
