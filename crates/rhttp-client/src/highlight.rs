use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use unicode_width::UnicodeWidthChar;

const FALLBACK_THEME: &str = "base16-ocean.dark";
const TAB: &str = "    ";

/// Turns raw response bodies into wrapped display lines and styles them.
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
    plain: Style,
}

impl Highlighter {
    /// Load syntect's bundled syntaxes and the named theme. A warning is
    /// returned when the theme is unknown and a fallback was used.
    pub fn new(theme_name: &str, plain: Style) -> (Self, Option<String>) {
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let mut themes = ThemeSet::load_defaults().themes;

        let (theme, warning) = match themes.remove(theme_name) {
            Some(theme) => (theme, None),
            None => {
                let warning = format!("syntax theme {theme_name:?} not found");
                tracing::warn!("{warning}");
                let theme = themes
                    .remove(FALLBACK_THEME)
                    .or_else(|| themes.into_values().next())
                    .unwrap_or_default();
                (theme, Some(warning))
            }
        };

        (
            Self {
                syntax_set,
                theme,
                plain,
            },
            warning,
        )
    }

    /// Syntax for a response: by content type, then by the body's first
    /// line, then plain text.
    fn syntax_for(&self, content_type: &str, body: &str) -> &SyntaxReference {
        token_for_content_type(content_type)
            .and_then(|token| self.syntax_set.find_syntax_by_token(token))
            .or_else(|| {
                body.lines()
                    .next()
                    .and_then(|first| self.syntax_set.find_syntax_by_first_line(first))
            })
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }

    /// Plain display lines for `body`: JSON pretty-printed when
    /// `autoformat` is set, tabs expanded and long lines wrapped to `width`.
    pub fn format_body(
        &self,
        content_type: &str,
        body: &str,
        autoformat: bool,
        width: usize,
    ) -> Vec<String> {
        if body.is_empty() {
            return Vec::new();
        }

        let syntax = self.syntax_for(content_type, body);
        let text = if autoformat && syntax.name == "JSON" {
            pretty_json(body).unwrap_or_else(|| body.to_string())
        } else {
            body.to_string()
        };

        let width = width.max(1);
        text.lines()
            .flat_map(|line| wrap(&line.replace('\t', TAB).replace('\r', ""), width))
            .collect()
    }

    /// Styled lines for display. Rebuilt whenever the body lines change.
    pub fn highlight(&self, content_type: &str, lines: &[String]) -> Vec<Line<'static>> {
        let first = lines.first().map(String::as_str).unwrap_or("");
        let syntax = self.syntax_for(content_type, first);
        if syntax.name == self.syntax_set.find_syntax_plain_text().name {
            return lines
                .iter()
                .map(|line| Line::from(Span::styled(line.clone(), self.plain)))
                .collect();
        }

        let mut highlighter = HighlightLines::new(syntax, &self.theme);
        lines
            .iter()
            .map(|line| {
                let with_newline = format!("{line}\n");
                match highlighter.highlight_line(&with_newline, &self.syntax_set) {
                    Ok(ranges) => Line::from(
                        ranges
                            .into_iter()
                            .filter_map(|(style, text)| {
                                let text = text.trim_end_matches('\n');
                                (!text.is_empty())
                                    .then(|| Span::styled(text.to_string(), to_ratatui(style)))
                            })
                            .collect::<Vec<_>>(),
                    ),
                    Err(err) => {
                        tracing::debug!(%err, "highlighting failed");
                        Line::from(Span::styled(line.clone(), self.plain))
                    }
                }
            })
            .collect()
    }
}

/// Map a syntect style to a ratatui style.
fn to_ratatui(style: syntect::highlighting::Style) -> Style {
    let c = style.foreground;
    let mut out = Style::default().fg(Color::Rgb(c.r, c.g, c.b));
    if style.font_style.contains(FontStyle::BOLD) {
        out = out.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        out = out.add_modifier(Modifier::ITALIC);
    }
    out
}

/// syntect token for a media type such as `application/json; charset=utf-8`.
fn token_for_content_type(content_type: &str) -> Option<&'static str> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    if essence.is_empty() {
        return None;
    }
    if essence.ends_with("+json") {
        return Some("json");
    }
    if essence.ends_with("+xml") {
        return Some("xml");
    }
    let subtype = essence.rsplit('/').next().unwrap_or("");
    match subtype {
        "json" | "problem+json" => Some("json"),
        "html" | "xhtml" => Some("html"),
        "xml" => Some("xml"),
        "javascript" | "ecmascript" | "x-javascript" => Some("js"),
        "css" => Some("css"),
        "yaml" | "x-yaml" => Some("yaml"),
        "markdown" => Some("md"),
        "x-sh" | "x-shellscript" => Some("sh"),
        _ => None,
    }
}

fn pretty_json(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    serde_json::to_string_pretty(&value).ok()
}

/// Split `line` into chunks of at most `width` display columns.
fn wrap(line: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut used = 0;
    for c in line.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width && !current.is_empty() {
            out.push(std::mem::take(&mut current));
            used = 0;
        }
        current.push(c);
        used += w;
    }
    out.push(current);
    out
}
