use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use rhttp_core::config::Config;
use rhttp_core::kv::DISPLAY_SEPARATOR;
use rhttp_core::ui::key_value_line;
use rhttp_core::widget::{FileCapture, Focusable};

use crate::HttpTool;
use crate::form::{COLUMN_WIDTH, FocusTarget, MARGIN};
use crate::model::{RequestModel, ResponseSnapshot};

/// Text styles of the request and response summaries.
#[derive(Debug, Clone, Copy, Default)]
pub struct Palette {
    pub text: Style,
    pub url: Style,
    pub header: Style,
    pub header_value: Style,
    pub body: Style,
    pub pressed_key: Style,
    pub pressed_key_value: Style,
}

impl Palette {
    pub fn from_config(config: &mut Config) -> Self {
        let fg = |config: &mut Config, name: &str| Style::default().fg(config.color(name));
        Self {
            text: fg(config, "text"),
            url: fg(config, "url"),
            header: fg(config, "header"),
            header_value: fg(config, "header_value"),
            body: fg(config, "body"),
            pressed_key: fg(config, "pressed_key"),
            pressed_key_value: fg(config, "pressed_key_value"),
        }
    }
}

/// The text blocks stacked above the response body.
struct Sections {
    form: Vec<Line<'static>>,
    panel: Vec<Line<'static>>,
    request: Vec<Line<'static>>,
    response: Vec<Line<'static>>,
}

impl Sections {
    fn new(tool: &HttpTool) -> Self {
        let palette = &tool.palette;
        let (form, panel, request) = if tool.fullscreen {
            (Vec::new(), Vec::new(), Vec::new())
        } else {
            (
                tool.form.lines(&tool.widget_style),
                side_panel(tool),
                request_summary(&tool.model, palette),
            )
        };
        let response = tool
            .response
            .as_ref()
            .map(|res| response_summary(res, palette))
            .unwrap_or_default();
        Self {
            form,
            panel,
            request,
            response,
        }
    }

    fn top_height(&self) -> u16 {
        self.form.len().max(self.panel.len()) as u16
    }

    /// Rows left for the body once everything else and the status bar fit.
    fn body_rows(&self, height: u16) -> u16 {
        height
            .saturating_sub(self.top_height())
            .saturating_sub(self.request.len() as u16)
            .saturating_sub(self.response.len() as u16)
            .saturating_sub(1)
    }
}

/// Body rows available at a terminal `height`, as `render` lays them out.
pub(crate) fn body_rows(tool: &HttpTool, height: u16) -> usize {
    usize::from(Sections::new(tool).body_rows(height))
}

/// Compose one frame. Also sizes the response page to the rows left over.
pub fn render(frame: &mut Frame, tool: &mut HttpTool) {
    let area = frame.area();
    let sections = Sections::new(tool);

    let [form_area, request_area, response_area, body_area, status_area] = Layout::vertical([
        Constraint::Length(sections.top_height()),
        Constraint::Length(sections.request.len() as u16),
        Constraint::Length(sections.response.len() as u16),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    let [left, panel] = Layout::horizontal([
        Constraint::Length(MARGIN + 2 * COLUMN_WIDTH),
        Constraint::Min(0),
    ])
    .areas(form_area);
    frame.render_widget(Paragraph::new(sections.form), left);
    frame.render_widget(Paragraph::new(sections.panel), panel);

    frame.render_widget(Paragraph::new(sections.request), request_area);
    frame.render_widget(Paragraph::new(sections.response), response_area);

    tool.paginator
        .set_page_size(usize::from(body_area.height), tool.styled.len());
    let body = inset(body_area, MARGIN);
    frame.render_widget(
        Paragraph::new(tool.paginator.page(&tool.styled).to_vec()),
        body,
    );

    frame.render_widget(Paragraph::new(tool.status.line(status_area.width)), status_area);

    tool.help.render(frame, area);

    if !tool.help.visible && !tool.fullscreen {
        if let Some((x, y)) = cursor(tool, left, panel) {
            frame.set_cursor_position((x, y));
        }
    }
}

fn inset(area: Rect, left: u16) -> Rect {
    let left = left.min(area.width);
    Rect {
        x: area.x + left,
        width: area.width - left,
        ..area
    }
}

/// Pressed-key echo followed by any visible file capture. The focused
/// capture lists its path suggestions below its prompt.
fn side_panel(tool: &HttpTool) -> Vec<Line<'static>> {
    let mut lines = vec![key_value_line(
        "Key",
        &tool.pressed_key,
        tool.palette.pressed_key,
        tool.palette.pressed_key_value,
    )];
    for capture in tool.form.captures().iter().filter(|c| c.is_visible()) {
        lines.push(capture.line(&tool.widget_style));
        lines.extend(listed_paths(capture).iter().map(|path| {
            Line::from(Span::styled(
                format!("  {path}"),
                tool.widget_style.suggestion,
            ))
        }));
    }
    lines
}

fn listed_paths(capture: &FileCapture) -> &[String] {
    if capture.is_focused() {
        capture.field().suggestions()
    } else {
        &[]
    }
}

/// Panel row of the capture at `index`, counting the lists above it.
fn capture_row(tool: &HttpTool, index: usize) -> Option<u16> {
    let mut row = 1;
    for (i, capture) in tool.form.captures().iter().enumerate() {
        if !capture.is_visible() {
            continue;
        }
        if i == index {
            return Some(row);
        }
        row += 1 + listed_paths(capture).len() as u16;
    }
    None
}

fn cursor(tool: &HttpTool, form: Rect, panel: Rect) -> Option<(u16, u16)> {
    match tool.form.focus_target() {
        FocusTarget::Capture(index) => {
            let capture = tool.form.captures().get(index)?;
            let row = capture_row(tool, index)?;
            Some((panel.x + capture.field().cursor_column(), panel.y + row))
        }
        FocusTarget::Ring(_) => {
            let (x, y) = tool.form.cursor_position()?;
            Some((form.x + x, form.y + y))
        }
    }
}

/// What will be sent: request line, headers, cookies and form body.
pub fn request_summary(model: &RequestModel, palette: &Palette) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::raw(" "),
        Span::styled(format!("{} ", model.method), palette.text),
        Span::styled(model.url(), palette.url),
        Span::styled(format!(" {}", model.protocol.label()), palette.text),
    ])];
    for (name, joined) in model.headers.values(DISPLAY_SEPARATOR) {
        lines.push(indented(key_value_line(
            &name,
            &joined,
            palette.header,
            palette.header_value,
        )));
    }
    if let Some(cookie) = model.cookie_header() {
        lines.push(indented(key_value_line(
            "Cookie",
            &cookie,
            palette.header,
            palette.header_value,
        )));
    }
    if let Some(body) = model.body() {
        lines.push(indented(key_value_line("Body", &body, palette.header, palette.body)));
    }
    lines.push(Line::default());
    lines
}

/// Status line and headers of the last response.
pub fn response_summary(response: &ResponseSnapshot, palette: &Palette) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::raw(" "),
        Span::styled(format!("{} {}", response.proto, response.status), palette.url),
    ])];
    for (name, joined) in response.headers.values(DISPLAY_SEPARATOR) {
        lines.push(indented(key_value_line(
            &name,
            &joined,
            palette.header,
            palette.header_value,
        )));
    }
    lines.push(Line::default());
    lines
}

fn indented(line: Line<'static>) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    spans.extend(line.spans);
    Line::from(spans)
}
