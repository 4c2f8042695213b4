pub mod event;
pub mod executor;
pub mod form;
pub mod highlight;
pub mod model;
pub mod session;
pub mod ui;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Frame, text::Line};

use rhttp_core::{
    config::{Config, ConfigError},
    help_popup::HelpPopup,
    keybinds::{Action, KeyChord, KeyMap},
    paginator::Paginator,
    status_bar::{Indicators, StatusBar, StatusStyle},
    widget::{FileHandle, FileOutcome, WidgetId, WidgetStyle},
};

use event::{AppEvent, Effect};
use executor::{ExecutorResult, HttpRequestCmd};
use form::{LOAD_SESSION, MARGIN, RequestForm, SAVE_SESSION};
use highlight::Highlighter;
use model::{Counters, RequestModel, ResponseSnapshot, Scheme};
use session::Session;
use ui::Palette;

/// The interactive state engine: request model, form widgets, the last
/// response and the status bar. Every event is processed to completion;
/// slow work is handed back to the caller as an [`Effect`].
pub struct HttpTool {
    config: Config,
    keys: KeyMap,
    widget_style: WidgetStyle,
    palette: Palette,
    highlighter: Highlighter,
    model: RequestModel,
    form: RequestForm,
    response: Option<ResponseSnapshot>,
    /// Raw body of the last live response, kept to re-wrap on resize.
    raw_body: Option<String>,
    styled: Vec<Line<'static>>,
    paginator: Paginator,
    status: StatusBar,
    help: HelpPopup,
    fullscreen: bool,
    in_flight: bool,
    pressed_key: String,
    size: (u16, u16),
}

impl HttpTool {
    pub fn new(mut config: Config) -> Result<Self, ConfigError> {
        let keys = config.key_map()?;
        let widget_style = rhttp_core::ui::widget_style(&mut config);
        let palette = Palette::from_config(&mut config);
        let status_style = StatusStyle::from_config(&mut config);
        let indicators = Indicators::from_config(&mut config);

        let (highlighter, theme_warning) = Highlighter::new(&config.theme.syntax, palette.body);
        if let Some(warning) = theme_warning {
            config.warnings.push(warning);
        }

        let settings = &config.settings;
        let mut model = RequestModel::new();
        model.scheme = Scheme::from_secure(settings.checkboxes.https);
        let form = RequestForm::new(&model, settings.checkboxes.autoformat);

        let mut status = StatusBar::new(settings.marquee_step, status_style, indicators);
        if config.has_warnings() {
            status.warning(config.warning_message());
        } else {
            status.info(format!("press {} for help", keys.label(Action::Help)));
        }

        Ok(Self {
            paginator: Paginator::new(settings.page_shift),
            fullscreen: settings.fullscreen,
            help: HelpPopup::new(&keys),
            config,
            keys,
            widget_style,
            palette,
            highlighter,
            model,
            form,
            response: None,
            raw_body: None,
            styled: Vec::new(),
            status,
            in_flight: false,
            pressed_key: String::new(),
            size: (0, 0),
        })
    }

    pub fn model(&self) -> &RequestModel {
        &self.model
    }

    pub fn form(&self) -> &RequestForm {
        &self.form
    }

    pub fn response(&self) -> Option<&ResponseSnapshot> {
        self.response.as_ref()
    }

    pub fn status(&self) -> &StatusBar {
        &self.status
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn help_visible(&self) -> bool {
        self.help.visible
    }

    pub fn tick_interval(&self) -> std::time::Duration {
        self.config.settings.tick_interval()
    }

    fn counters(&self) -> Counters {
        Counters {
            request_count: self.status.request_count(),
            latency: self.status.latency().to_string(),
        }
    }

    /// Display columns available to response body lines.
    fn body_width(&self) -> usize {
        usize::from(self.size.0.saturating_sub(MARGIN)).max(1)
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Vec<Effect> {
        match event {
            AppEvent::Key(key) => self.handle_key(key).into_iter().collect(),
            AppEvent::Resize(width, height) => {
                self.resize(width, height);
                Vec::new()
            }
            AppEvent::Tick => {
                self.status.tick();
                self.form.tick();
                Vec::new()
            }
            AppEvent::Response(result) => {
                self.on_response(result);
                Vec::new()
            }
            AppEvent::FileOpened(outcome) => {
                self.on_file_opened(outcome);
                Vec::new()
            }
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        let first = self.size == (0, 0);
        self.size = (width, height);
        if !first {
            self.status.info(format!("screen size {width}x{height}"));
        }
        self.rewrap();
        let rows = ui::body_rows(self, height);
        self.paginator.set_page_size(rows, self.styled.len());
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Effect> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        self.pressed_key = KeyChord::from_event(&key).to_string();
        let action = self.keys.resolve(&key);

        if self.help.visible {
            match (action, key.code) {
                (Some(Action::Quit), _) => return Some(Effect::Quit),
                (Some(Action::Help), _) | (_, KeyCode::Esc) => self.help.hide(),
                (_, KeyCode::Down) => self.help.scroll_down(),
                (_, KeyCode::Up) => self.help.scroll_up(),
                _ => {}
            }
            return None;
        }

        let plain_char = matches!(key.code, KeyCode::Char(_))
            && !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        if plain_char && self.form.focused_accepts_text() {
            self.form.input(key);
            return None;
        }

        let Some(action) = action else {
            self.form.input(key);
            return None;
        };
        tracing::debug!(?action, "key action");

        match action {
            Action::Next => self.form.next(&mut self.model),
            Action::Prev => self.form.prev(),
            Action::Confirm => {
                if let Some(request) = self.form.confirm(&mut self.model) {
                    return Some(Effect::OpenFile(request));
                }
            }
            Action::Delete => {
                if let Some((group, name)) = self.form.delete(&mut self.model) {
                    self.status.info(format!("{} {name} deleted", group.label()));
                }
            }
            Action::ToggleCheckbox => {
                self.form.toggle(&mut self.model);
            }
            Action::Send => return self.send(),
            Action::Quit => return Some(Effect::Quit),
            Action::Help => self.help.toggle(),
            Action::PageUp => self.paginator.page_up(),
            Action::PageDown => self.paginator.page_down(self.styled.len()),
            Action::FullScreen => {
                self.fullscreen = !self.fullscreen;
                let state = if self.fullscreen { "on" } else { "off" };
                self.status.info(format!("full screen {state}"));
            }
            Action::SaveSession => self.toggle_capture(SAVE_SESSION),
            Action::LoadSession => self.toggle_capture(LOAD_SESSION),
            Action::Autocomplete => self.form.autocomplete(),
        }
        None
    }

    fn toggle_capture(&mut self, id: WidgetId) {
        if let Some(index) = self.form.capture_index(id) {
            self.form.toggle_capture(index);
        }
    }

    fn send(&mut self) -> Option<Effect> {
        if self.in_flight {
            self.status.warning("a request is already in flight");
            return None;
        }
        let cmd = HttpRequestCmd::from_model(&self.model, &self.config.settings);
        self.in_flight = true;
        self.status.info("sending request...");
        Some(Effect::Send(cmd))
    }

    fn on_response(&mut self, result: ExecutorResult) {
        self.in_flight = false;
        self.status.increment_request_count();

        match result {
            Ok(res) => {
                self.status.set_latency(res.elapsed);
                let mut snapshot = ResponseSnapshot {
                    status: res.status,
                    proto: res.proto,
                    headers: res.headers,
                    body_lines: Vec::new(),
                };
                let lines = self.highlighter.format_body(
                    snapshot.content_type(),
                    &res.body,
                    self.form.autoformat(),
                    self.body_width(),
                );
                snapshot.body_lines = lines;
                self.status.set_response(
                    snapshot.status_code(),
                    &snapshot.proto,
                    snapshot.protocol_major(),
                    self.model.scheme.as_str(),
                );
                self.styled = self
                    .highlighter
                    .highlight(snapshot.content_type(), &snapshot.body_lines);
                self.paginator.reset();
                self.response = Some(snapshot);
                self.raw_body = Some(res.body);

                if res.redirects.is_empty() {
                    self.status.info("request is executed, response taken");
                } else {
                    let chain = res.redirects.join(" → ");
                    tracing::warn!(%chain, "response followed redirects");
                    self.status
                        .warning(format!("{} redirects: {chain}", res.redirects.len()));
                }
            }
            Err(err) => {
                tracing::error!(%err, "request failed");
                self.status.set_latency(err.elapsed);
                self.status.clear_response();
                self.response = None;
                self.raw_body = None;
                self.styled.clear();
                self.paginator.reset();
                self.status.error(err.to_string());
            }
        }
    }

    fn on_file_opened(&mut self, outcome: FileOutcome) {
        let path = outcome.path.display().to_string();
        let handle = match outcome.result {
            Ok(handle) => handle,
            Err(err) => {
                tracing::error!(%path, %err, "file open failed");
                self.status.error(format!("cannot open {path}: {err}"));
                return;
            }
        };

        match (outcome.id, handle) {
            (SAVE_SESSION, FileHandle::Writer(writer)) => {
                let session =
                    Session::snapshot(&self.model, self.response.as_ref(), &self.counters());
                match session.save(writer) {
                    Ok(()) => {
                        tracing::info!(%path, "session saved");
                        self.status.info(format!("session saved to {path}"));
                    }
                    Err(err) => {
                        tracing::error!(%path, %err, "session save failed");
                        self.status.error(format!("cannot save session: {err}"));
                    }
                }
            }
            (LOAD_SESSION, FileHandle::Reader(reader)) => {
                match Session::load(reader).and_then(Session::into_parts) {
                    Ok(parts) => {
                        self.apply_session(parts);
                        tracing::info!(%path, "session loaded");
                        self.status.info(format!("session loaded from {path}"));
                    }
                    Err(err) => {
                        tracing::error!(%path, %err, "session load failed");
                        self.status.error(format!("cannot load session: {err}"));
                    }
                }
            }
            (id, _) => tracing::warn!(id, "unexpected file handle"),
        }
    }

    fn apply_session(&mut self, parts: (RequestModel, Option<ResponseSnapshot>, Counters)) {
        let (model, response, counters) = parts;
        self.model = model;
        self.form.sync_from(&self.model);

        self.status.set_request_count(counters.request_count);
        self.status.set_latency_text(counters.latency);
        match &response {
            Some(res) => {
                self.status.set_response(
                    res.status_code(),
                    &res.proto,
                    res.protocol_major(),
                    self.model.scheme.as_str(),
                );
                self.styled = self
                    .highlighter
                    .highlight(res.content_type(), &res.body_lines);
            }
            None => {
                self.status.clear_response();
                self.styled.clear();
            }
        }
        self.response = response;
        self.raw_body = None;
        self.paginator.reset();
    }

    /// Re-wrap the live response body to the current width.
    fn rewrap(&mut self) {
        let width = self.body_width();
        let autoformat = self.form.autoformat();
        let (Some(raw), Some(response)) = (&self.raw_body, &mut self.response) else {
            return;
        };
        let lines = self
            .highlighter
            .format_body(response.content_type(), raw, autoformat, width);
        response.body_lines = lines;
        self.styled = self
            .highlighter
            .highlight(response.content_type(), &response.body_lines);
    }

    pub fn render(&mut self, frame: &mut Frame) {
        ui::render(frame, self);
    }

    /// Status bar error raised outside the engine (e.g. a failed spawn).
    pub fn report_error(&mut self, err: impl std::fmt::Display) {
        tracing::error!(%err, "background work failed");
        self.status.error(err.to_string());
    }

    /// The send effect could not be started; allow a new one.
    pub fn abort_send(&mut self, err: impl std::fmt::Display) {
        self.in_flight = false;
        self.report_error(format!("cannot send request: {err}"));
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::path::PathBuf;
    use std::time::Duration;

    use ratatui::{Terminal, backend::TestBackend};

    use rhttp_core::kv::OrderedKeyValueSet;
    use rhttp_core::status_bar::Severity;
    use rhttp_core::widget::FileMode;

    use super::*;
    use crate::executor::{ErrorKind, HttpRequestError, HttpResponseResult};
    use crate::form::{FocusTarget, Slot};
    use crate::model::HttpMethod;

    fn tool() -> HttpTool {
        let mut tool = HttpTool::new(Config::defaults().unwrap()).unwrap();
        tool.resize(100, 40);
        tool
    }

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> AppEvent {
        AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn type_text(tool: &mut HttpTool, text: &str) {
        for c in text.chars() {
            tool.handle_event(key(KeyCode::Char(c)));
        }
    }

    fn clear_field(tool: &mut HttpTool) {
        for _ in 0..32 {
            tool.handle_event(key(KeyCode::Backspace));
        }
    }

    fn ok_response(body: &str, redirects: Vec<String>) -> ExecutorResult {
        let mut headers = OrderedKeyValueSet::new();
        headers.set("Content-Type", "application/json");
        Ok(HttpResponseResult {
            status: "200 OK".to_string(),
            proto: "HTTP/1.1".to_string(),
            headers,
            body: body.to_string(),
            elapsed: Duration::from_millis(120),
            redirects,
        })
    }

    #[test]
    fn test_method_commits_on_advance() {
        let mut tool = tool();
        clear_field(&mut tool);
        type_text(&mut tool, "post");
        tool.handle_event(key(KeyCode::Tab));
        assert_eq!(tool.model().method, HttpMethod::Post);
        assert_eq!(tool.form().focus_target(), FocusTarget::Ring(Slot::Host));
    }

    #[test]
    fn test_invalid_method_reverts() {
        let mut tool = tool();
        clear_field(&mut tool);
        type_text(&mut tool, "banana");
        tool.handle_event(key(KeyCode::Tab));
        assert_eq!(tool.model().method, HttpMethod::Get);
        tool.handle_event(AppEvent::Key(KeyEvent::new(
            KeyCode::BackTab,
            KeyModifiers::SHIFT,
        )));
        assert_eq!(tool.form().focused_text().unwrap().value(), "GET");
    }

    #[test]
    fn test_header_commit_and_delete() {
        let mut tool = tool();
        // method, host, path, then header name
        for _ in 0..3 {
            tool.handle_event(key(KeyCode::Tab));
        }
        type_text(&mut tool, "x auth token");
        tool.handle_event(key(KeyCode::Tab));
        type_text(&mut tool, "abc");
        tool.handle_event(key(KeyCode::Enter));
        assert_eq!(tool.model().headers.get("X-Auth-Token"), Some("abc"));
        assert_eq!(tool.model().headers.len(), 1);

        tool.handle_event(key(KeyCode::BackTab));
        tool.handle_event(key(KeyCode::BackTab));
        type_text(&mut tool, "X-Auth-Token");
        tool.handle_event(ctrl('d'));
        assert!(tool.model().headers.is_empty());
        assert!(tool.status().text().contains("header X-Auth-Token deleted"));
    }

    #[test]
    fn test_send_refused_while_in_flight() {
        let mut tool = tool();
        let effects = tool.handle_event(ctrl('g'));
        assert!(matches!(effects.as_slice(), [Effect::Send(cmd)] if cmd.url == "http://localhost/"));
        assert!(tool.is_in_flight());

        assert!(tool.handle_event(ctrl('g')).is_empty());
        assert_eq!(tool.status().severity(), Severity::Warning);
    }

    #[test]
    fn test_response_fills_snapshot_and_counters() {
        let mut tool = tool();
        tool.handle_event(ctrl('g'));
        tool.handle_event(AppEvent::Response(ok_response(r#"{"id":1}"#, Vec::new())));

        let response = tool.response().unwrap();
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.body_lines, vec!["{", "  \"id\": 1", "}"]);
        assert_eq!(tool.status().request_count(), 1);
        assert_eq!(tool.status().latency(), "120ms");
        assert!(!tool.is_in_flight());
        assert_eq!(tool.status().severity(), Severity::Info);
    }

    #[test]
    fn test_redirects_raise_a_warning() {
        let mut tool = tool();
        tool.handle_event(ctrl('g'));
        let hops = vec![
            "301 http://localhost/a".to_string(),
            "302 http://localhost/b".to_string(),
        ];
        tool.handle_event(AppEvent::Response(ok_response("{}", hops)));
        assert_eq!(tool.status().severity(), Severity::Warning);
        assert!(
            tool.status()
                .text()
                .contains("2 redirects: 301 http://localhost/a → 302 http://localhost/b")
        );
    }

    #[test]
    fn test_transport_failure_clears_response() {
        let mut tool = tool();
        tool.handle_event(ctrl('g'));
        tool.handle_event(AppEvent::Response(ok_response("{}", Vec::new())));
        tool.handle_event(ctrl('g'));
        tool.handle_event(AppEvent::Response(Err(HttpRequestError {
            kind: ErrorKind::Timeout,
            message: "deadline elapsed".to_string(),
            elapsed: Duration::from_secs(2),
        })));

        assert!(tool.response().is_none());
        assert_eq!(tool.status().severity(), Severity::Error);
        assert!(tool.status().text().contains("timeout: deadline elapsed"));
        assert_eq!(tool.status().request_count(), 2);
    }

    #[test]
    fn test_page_down_is_bounded_by_body() {
        let mut tool = tool();
        let body: Vec<String> = (0..100).map(|i| i.to_string()).collect();
        let mut headers = OrderedKeyValueSet::new();
        headers.set("Content-Type", "text/plain");
        tool.handle_event(AppEvent::Response(Ok(HttpResponseResult {
            status: "200 OK".to_string(),
            proto: "HTTP/1.1".to_string(),
            headers,
            body: body.join("\n"),
            elapsed: Duration::from_millis(5),
            redirects: Vec::new(),
        })));

        let backend = TestBackend::new(100, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| tool.render(frame)).unwrap();
        let page = tool.paginator().page_size();
        assert!(page > 0);

        for _ in 0..50 {
            tool.handle_event(key(KeyCode::PageDown));
        }
        assert_eq!(tool.paginator().offset(), 100 - page);
        tool.handle_event(key(KeyCode::PageUp));
        assert_eq!(tool.paginator().offset(), 100 - page - 5);
    }

    #[test]
    fn test_session_save_then_load_restores_state() {
        let mut tool = tool();
        clear_field(&mut tool);
        type_text(&mut tool, "delete");
        tool.handle_event(key(KeyCode::Tab));
        tool.handle_event(ctrl('g'));
        tool.handle_event(AppEvent::Response(ok_response(r#"{"ok":true}"#, Vec::new())));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let save = rhttp_core::widget::OpenRequest {
            id: SAVE_SESSION,
            path: path.clone(),
            mode: FileMode::Write,
        };
        tool.handle_event(AppEvent::FileOpened(save.open()));
        assert!(tool.status().text().contains("session saved"));

        let mut fresh = HttpTool::new(Config::defaults().unwrap()).unwrap();
        let load = rhttp_core::widget::OpenRequest {
            id: LOAD_SESSION,
            path,
            mode: FileMode::Read,
        };
        fresh.handle_event(AppEvent::FileOpened(load.open()));
        assert_eq!(fresh.model().method, HttpMethod::Delete);
        assert_eq!(fresh.response(), tool.response());
        assert_eq!(fresh.status().request_count(), 1);
        assert_eq!(fresh.status().latency(), "120ms");
        assert_eq!(fresh.form().focus_target(), FocusTarget::Ring(Slot::Method));
    }

    #[test]
    fn test_malformed_session_leaves_state_unchanged() {
        let mut tool = tool();
        let before = tool.model().clone();
        tool.handle_event(AppEvent::FileOpened(FileOutcome {
            id: LOAD_SESSION,
            path: PathBuf::from("broken.json"),
            result: Ok(FileHandle::Reader(Box::new(Cursor::new(b"{not json".to_vec())))),
        }));
        assert_eq!(tool.model(), &before);
        assert_eq!(tool.status().severity(), Severity::Error);
    }

    #[test]
    fn test_open_failure_is_reported() {
        let mut tool = tool();
        let dir = tempfile::tempdir().unwrap();
        let load = rhttp_core::widget::OpenRequest {
            id: LOAD_SESSION,
            path: dir.path().join("missing.json"),
            mode: FileMode::Read,
        };
        tool.handle_event(AppEvent::FileOpened(load.open()));
        assert_eq!(tool.status().severity(), Severity::Error);
        assert!(tool.status().text().contains("missing.json"));
    }

    #[test]
    fn test_save_prompt_opens_and_confirms() {
        let mut tool = tool();
        tool.handle_event(ctrl('s'));
        assert!(matches!(tool.form().focus_target(), FocusTarget::Capture(_)));
        type_text(&mut tool, "out.json");
        let effects = tool.handle_event(key(KeyCode::Enter));
        assert!(matches!(
            effects.as_slice(),
            [Effect::OpenFile(req)] if req.id == SAVE_SESSION && req.path == PathBuf::from("out.json")
        ));
        assert_eq!(tool.form().focus_target(), FocusTarget::Ring(Slot::Method));
    }

    #[test]
    fn test_help_and_fullscreen_toggles() {
        let mut tool = tool();
        tool.handle_event(AppEvent::Key(KeyEvent::new(KeyCode::F(1), KeyModifiers::NONE)));
        assert!(tool.help_visible());
        // keys other than close are swallowed while help is open
        tool.handle_event(ctrl('g'));
        assert!(!tool.is_in_flight());
        tool.handle_event(key(KeyCode::Esc));
        assert!(!tool.help_visible());

        let was = tool.is_fullscreen();
        tool.handle_event(ctrl('f'));
        assert_ne!(tool.is_fullscreen(), was);
        assert!(tool.status().text().contains("full screen"));
    }

    #[test]
    fn test_checkbox_toggles_scheme() {
        let mut tool = tool();
        for _ in 0..(3 + 2 * 4) {
            tool.handle_event(key(KeyCode::Tab));
        }
        assert_eq!(tool.form().focus_target(), FocusTarget::Ring(Slot::Toggle(0)));
        tool.handle_event(key(KeyCode::Char(' ')));
        assert_eq!(tool.model().scheme, Scheme::Https);
    }

    #[test]
    fn test_quit_effect() {
        let mut tool = tool();
        assert!(matches!(tool.handle_event(ctrl('q')).as_slice(), [Effect::Quit]));
    }

    #[test]
    fn test_render_shows_form_and_status() {
        let mut tool = tool();
        let backend = TestBackend::new(100, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| tool.render(frame)).unwrap();
        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Method"));
        assert!(text.contains("STATUS"));
    }

    #[test]
    fn test_load_prompt_lists_path_suggestions() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("alpha.json"), "{}").unwrap();
        std::fs::write(dir.path().join("beta.json"), "{}").unwrap();

        let mut tool = tool();
        tool.handle_event(ctrl('o'));
        type_text(&mut tool, &format!("{}/", dir.path().display()));
        tool.handle_event(AppEvent::Tick);

        let backend = TestBackend::new(140, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| tool.render(frame)).unwrap();
        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("alpha.json"));
        assert!(text.contains("beta.json"));

        tool.handle_event(ctrl('n'));
        let value = tool.form().focused_text().unwrap().value().to_string();
        assert!(value.ends_with("alpha.json"));
    }

    #[test]
    fn test_resize_keeps_page_offset_in_bounds() {
        let mut tool = tool();
        let line = "x".repeat(80);
        let body = vec![line.as_str(); 60].join("\n");
        let mut headers = OrderedKeyValueSet::new();
        headers.set("Content-Type", "text/plain");
        tool.handle_event(AppEvent::Response(Ok(HttpResponseResult {
            status: "200 OK".to_string(),
            proto: "HTTP/1.1".to_string(),
            headers,
            body,
            elapsed: Duration::from_millis(5),
            redirects: Vec::new(),
        })));

        let backend = TestBackend::new(100, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| tool.render(frame)).unwrap();

        tool.handle_event(AppEvent::Resize(41, 40));
        assert!(tool.response().unwrap().body_lines.len() > 60);
        for _ in 0..50 {
            tool.handle_event(key(KeyCode::PageDown));
        }
        assert!(tool.paginator().offset() > 0);

        tool.handle_event(AppEvent::Resize(100, 40));
        let lines = tool.response().unwrap().body_lines.len();
        assert_eq!(lines, 60);
        let page = tool.paginator().page_size();
        assert!(page > 0);
        assert!(tool.paginator().offset() <= lines.saturating_sub(page));
    }
}
