use std::iter;
use std::time::Duration;

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::config::Config;

const BADGE: &str = " STATUS ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Error,
}

/// Styles for each part of the status bar.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusStyle {
    pub bar: Style,
    pub badge_ok: Style,
    pub badge_warning: Style,
    pub badge_error: Style,
    pub text_warning: Style,
    pub text_error: Style,
    pub req_count: Style,
    pub res_time: Style,
    pub indicator: Style,
}

impl StatusStyle {
    pub fn from_config(config: &mut Config) -> Self {
        let bar = Style::default()
            .fg(config.color("statusbar_fg"))
            .bg(config.color("statusbar_bg"));
        let badge = Style::default().fg(config.color("statusbar_badge_fg"));
        let nugget = Style::default().fg(config.color("statusbar_nugget"));
        Self {
            bar,
            badge_ok: badge.bg(config.color("statusbar_badge_ok")),
            badge_warning: badge.bg(config.color("statusbar_badge_warning")),
            badge_error: badge.bg(config.color("statusbar_badge_error")),
            text_warning: bar.fg(config.color("statusbar_text_warning")),
            text_error: bar.fg(config.color("statusbar_text_error")),
            req_count: nugget.bg(config.color("statusbar_req_count")),
            res_time: nugget.bg(config.color("statusbar_res_time")),
            indicator: nugget.bg(config.color("statusbar_indicator")),
        }
    }
}

/// Glyphs for the protocol indicator.
#[derive(Debug, Clone, Default)]
pub struct Indicators {
    pub http2: String,
    pub https: String,
    pub insecure: String,
    pub idle: String,
}

impl Indicators {
    pub fn from_config(config: &mut Config) -> Self {
        Self {
            http2: config.emoji("proto_http2"),
            https: config.emoji("proto_https"),
            insecure: config.emoji("proto_insecure"),
            idle: config.emoji("default_indicator"),
        }
    }
}

/// Status message, request counter, latency and protocol indicator.
///
/// Long messages scroll horizontally: every [`tick`](StatusBar::tick)
/// advances the byte offset by `step`, and the visible window stitches the
/// message tail to its head.
#[derive(Debug, Clone)]
pub struct StatusBar {
    severity: Severity,
    text: String,
    /// Byte offset of the marquee window, always on a char boundary.
    offset: usize,
    step: usize,
    request_count: u64,
    latency: String,
    status_code: u16,
    proto: String,
    proto_major: u8,
    scheme: String,
    style: StatusStyle,
    indicators: Indicators,
}

impl StatusBar {
    pub fn new(step: usize, style: StatusStyle, indicators: Indicators) -> Self {
        Self {
            severity: Severity::Info,
            text: String::new(),
            offset: 0,
            step: step.max(1),
            request_count: 0,
            latency: "0s".to_string(),
            status_code: 0,
            proto: String::new(),
            proto_major: 0,
            scheme: String::new(),
            style,
            indicators,
        }
    }

    pub fn info(&mut self, text: impl AsRef<str>) {
        self.set_status(Severity::Info, text.as_ref());
    }

    pub fn warning(&mut self, text: impl AsRef<str>) {
        self.set_status(Severity::Warning, text.as_ref());
    }

    pub fn error(&mut self, text: impl AsRef<str>) {
        self.set_status(Severity::Error, text.as_ref());
    }

    fn set_status(&mut self, severity: Severity, text: &str) {
        self.severity = severity;
        self.text = format!("{}{}", chrono::Local::now().format("[%H:%M:%S] "), text);
        self.offset = 0;
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn request_count(&self) -> u64 {
        self.request_count
    }

    pub fn set_request_count(&mut self, count: u64) {
        self.request_count = count;
    }

    pub fn increment_request_count(&mut self) {
        self.request_count += 1;
    }

    pub fn latency(&self) -> &str {
        &self.latency
    }

    pub fn set_latency(&mut self, latency: Duration) {
        self.latency = format!("{latency:?}");
    }

    /// Restore a latency string as saved in a session.
    pub fn set_latency_text(&mut self, latency: impl Into<String>) {
        self.latency = latency.into();
    }

    pub fn set_response(&mut self, status_code: u16, proto: &str, proto_major: u8, scheme: &str) {
        self.status_code = status_code;
        self.proto = proto.to_string();
        self.proto_major = proto_major;
        self.scheme = scheme.to_string();
    }

    pub fn clear_response(&mut self) {
        self.set_response(0, "", 0, "");
    }

    /// Advance the marquee by one step.
    pub fn tick(&mut self) {
        self.offset += self.step;
        while self.offset < self.text.len() && !self.text.is_char_boundary(self.offset) {
            self.offset += 1;
        }
        if self.offset >= self.text.len() {
            self.offset = 0;
        }
    }

    /// The message as it fits into `width` columns. Messages that fit are
    /// returned whole; longer ones are windowed from the marquee offset and
    /// padded to exactly `width` columns.
    pub fn visible_text(&self, width: usize) -> String {
        if self.text.width() <= width {
            return self.text.clone();
        }

        let start = self.offset.min(self.text.len());
        let tail = self.text[start..].chars();
        let head = self.text.chars();
        let stream = tail.chain(iter::once(' ')).chain(head);

        let mut out = String::new();
        let mut used = 0;
        for c in stream {
            let w = c.width().unwrap_or(0);
            if used + w > width {
                break;
            }
            out.push(c);
            used += w;
        }
        out.extend(iter::repeat_n(' ', width - used));
        out
    }

    /// Protocol glyph, protocol and status code of the last response.
    pub fn indicator(&self) -> String {
        let glyph = match self.proto_major {
            2 => &self.indicators.http2,
            1 if self.scheme == "https" => &self.indicators.https,
            1 => &self.indicators.insecure,
            _ => return format!("{}rHttp", self.indicators.idle),
        };
        format!("{glyph}{} {}", self.proto, self.status_code)
    }

    pub fn line(&self, width: u16) -> Line<'static> {
        let style = &self.style;
        let (badge_style, text_style) = match self.severity {
            Severity::Info => (style.badge_ok, style.bar),
            Severity::Warning => (style.badge_warning, style.text_warning),
            Severity::Error => (style.badge_error, style.text_error),
        };

        let count = format!(" {} ", self.request_count);
        let latency = format!(" {} ", self.latency);
        let indicator = format!(" {} ", self.indicator());

        let fixed = BADGE.width() + 1 + count.width() + latency.width() + indicator.width();
        let text_width = usize::from(width).saturating_sub(fixed);
        let mut text = self.visible_text(text_width);
        let pad = text_width.saturating_sub(text.width());
        text.extend(iter::repeat_n(' ', pad));

        Line::from(vec![
            Span::styled(BADGE, badge_style),
            Span::styled(" ", style.bar),
            Span::styled(text, text_style),
            Span::styled(count, style.req_count),
            Span::styled(latency, style.res_time),
            Span::styled(indicator, style.indicator),
        ])
    }
}
