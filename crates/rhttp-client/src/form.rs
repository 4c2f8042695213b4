//! The request form: every editable widget, the focus ring over them, and
//! the commit layer that moves widget values into the [`RequestModel`].

use crossterm::event::KeyEvent;
use ratatui::text::{Line, Span};

use rhttp_core::kv::{DISPLAY_SEPARATOR, OrderedKeyValueSet};
use rhttp_core::widget::{
    Checkbox, FileCapture, FileMode, Focusable, Notification, OpenRequest, SingleSelect,
    TextField, Widget, WidgetEvent, WidgetId, WidgetStyle,
};

use crate::model::{HttpMethod, ProtocolVersion, RequestModel, Scheme, canonical_header_name};

pub const HTTPS: WidgetId = "https";
pub const AUTOFORMAT: WidgetId = "autoformat";
pub const PROTOCOL: WidgetId = "protocol";
pub const SAVE_SESSION: WidgetId = "session_save";
pub const LOAD_SESSION: WidgetId = "session_load";

/// Display columns reserved for the left widget of a form row.
pub const COLUMN_WIDTH: u16 = 30;
/// Left margin of every form row.
pub const MARGIN: u16 = 1;

/// The key/value collections a paired field writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldGroup {
    Header,
    Param,
    Cookie,
    Form,
}

impl FieldGroup {
    pub const ALL: [FieldGroup; 4] = [
        FieldGroup::Header,
        FieldGroup::Param,
        FieldGroup::Cookie,
        FieldGroup::Form,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FieldGroup::Header => "header",
            FieldGroup::Param => "param",
            FieldGroup::Cookie => "cookie",
            FieldGroup::Form => "form field",
        }
    }

    fn prompt(&self) -> &'static str {
        match self {
            FieldGroup::Header => "Header ",
            FieldGroup::Param => "Param  ",
            FieldGroup::Cookie => "Cookie ",
            FieldGroup::Form => "Form   ",
        }
    }

    fn placeholders(&self) -> (&'static str, &'static str) {
        match self {
            FieldGroup::Header => ("X-Auth-Token", "token value"),
            FieldGroup::Param => ("products_id", "10"),
            FieldGroup::Cookie => ("XDEBUG_SESSION", "debugger"),
            FieldGroup::Form => ("login", "user"),
        }
    }

    /// Separator used to join multiple values in value suggestions.
    fn separator(&self) -> &'static str {
        match self {
            FieldGroup::Header => ";",
            _ => DISPLAY_SEPARATOR,
        }
    }

    /// Current contents of this group's collection.
    fn collection(&self, model: &RequestModel) -> OrderedKeyValueSet {
        match self {
            FieldGroup::Header => model.headers.clone(),
            FieldGroup::Param => model.params(),
            FieldGroup::Cookie => model.cookies.clone(),
            FieldGroup::Form => model.form.clone(),
        }
    }
}

/// A name widget and a value widget that together define one entry.
#[derive(Debug)]
pub struct PairedField {
    pub group: FieldGroup,
    pub name: TextField,
    pub value: TextField,
}

impl PairedField {
    pub fn new(group: FieldGroup) -> Self {
        let (name_hint, value_hint) = group.placeholders();
        let mut name = TextField::new(group.prompt()).with_placeholder(name_hint);
        if group == FieldGroup::Header {
            name = name.with_normalizer(canonical_header_name);
        }
        Self {
            group,
            name,
            value: TextField::new("").with_placeholder(value_hint),
        }
    }

    /// Suggest the names and joined values currently in `set`.
    fn refresh_suggestions(&mut self, set: &OrderedKeyValueSet) {
        let separator = self.group.separator();
        self.name
            .set_suggestions(set.names().map(str::to_string).collect());
        self.value.set_suggestions(
            set.values(separator)
                .into_iter()
                .map(|(_, joined)| joined)
                .collect(),
        );
    }
}

/// One position of the focus ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Method,
    Host,
    Path,
    PairName(usize),
    PairValue(usize),
    Toggle(usize),
}

/// Cyclic traversal order over the form.
///
/// The slot list is derived from the number of paired fields and toggles, so
/// text fields and toggles form one continuous ring with no boundary arithmetic.
#[derive(Debug, Clone)]
pub struct FocusRing {
    slots: Vec<Slot>,
    cursor: usize,
}

impl FocusRing {
    pub fn new(pairs: usize, toggles: usize) -> Self {
        let mut slots = vec![Slot::Method, Slot::Host, Slot::Path];
        for i in 0..pairs {
            slots.push(Slot::PairName(i));
            slots.push(Slot::PairValue(i));
        }
        slots.extend((0..toggles).map(Slot::Toggle));
        Self { slots, cursor: 0 }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Slot {
        self.slots[self.cursor]
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn next(&mut self) -> Slot {
        self.cursor = (self.cursor + 1) % self.slots.len();
        self.current()
    }

    pub fn prev(&mut self) -> Slot {
        self.cursor = (self.cursor + self.slots.len() - 1) % self.slots.len();
        self.current()
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }
}

/// Where keyboard focus currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    Ring(Slot),
    /// A file capture opened by save/load, outside the ring.
    Capture(usize),
}

/// Every widget of the request form plus the focus state over them.
#[derive(Debug)]
pub struct RequestForm {
    method: TextField,
    host: TextField,
    path: TextField,
    pairs: Vec<PairedField>,
    toggles: Vec<Widget>,
    captures: Vec<FileCapture>,
    ring: FocusRing,
    detour: Option<usize>,
}

impl RequestForm {
    pub fn new(model: &RequestModel, autoformat: bool) -> Self {
        let method = TextField::new("Method ")
            .with_placeholder("GET")
            .with_value(model.method.as_str())
            .with_suggestions(HttpMethod::suggestions());
        let host = TextField::new("Host ")
            .with_placeholder("example.com")
            .with_value(model.host.clone());
        let path = TextField::new("Path   ")
            .with_placeholder("/")
            .with_value(model.path.clone());

        let pairs: Vec<PairedField> = FieldGroup::ALL.into_iter().map(PairedField::new).collect();

        let mut protocol = SingleSelect::new(
            PROTOCOL,
            "Protocol",
            ProtocolVersion::ALL.iter().map(ProtocolVersion::label),
        );
        protocol.select_option(model.protocol.label());
        let toggles = vec![
            Widget::Checkbox(Checkbox::new(HTTPS, "https", model.scheme == Scheme::Https)),
            Widget::Checkbox(Checkbox::new(AUTOFORMAT, "Auto format JSON", autoformat)),
            Widget::Select(protocol),
        ];

        let captures = vec![
            FileCapture::new(SAVE_SESSION, "Session save: ", FileMode::Write),
            FileCapture::new(LOAD_SESSION, "Session load: ", FileMode::Read),
        ];

        let ring = FocusRing::new(pairs.len(), toggles.len());
        let mut form = Self {
            method,
            host,
            path,
            pairs,
            toggles,
            captures,
            ring,
            detour: None,
        };
        form.refresh_all_suggestions(model);
        form.focus_current();
        form
    }

    pub fn ring(&self) -> &FocusRing {
        &self.ring
    }

    pub fn focus_target(&self) -> FocusTarget {
        match self.detour {
            Some(index) => FocusTarget::Capture(index),
            None => FocusTarget::Ring(self.ring.current()),
        }
    }

    pub fn pairs(&self) -> &[PairedField] {
        &self.pairs
    }

    pub fn captures(&self) -> &[FileCapture] {
        &self.captures
    }

    pub fn capture_index(&self, id: WidgetId) -> Option<usize> {
        self.captures.iter().position(|c| c.id() == id)
    }

    pub fn autoformat(&self) -> bool {
        self.toggles.iter().any(|w| match w {
            Widget::Checkbox(c) => c.id() == AUTOFORMAT && c.is_on(),
            _ => false,
        })
    }

    /// Whether typed characters should go to the focused widget.
    pub fn focused_accepts_text(&self) -> bool {
        match self.focus_target() {
            FocusTarget::Capture(_) => true,
            FocusTarget::Ring(Slot::Toggle(i)) => self.toggles[i].accepts_text(),
            FocusTarget::Ring(_) => true,
        }
    }

    pub fn focused_text(&self) -> Option<&TextField> {
        match self.focus_target() {
            FocusTarget::Capture(i) => Some(self.captures[i].field()),
            FocusTarget::Ring(slot) => match slot {
                Slot::Method => Some(&self.method),
                Slot::Host => Some(&self.host),
                Slot::Path => Some(&self.path),
                Slot::PairName(i) => Some(&self.pairs[i].name),
                Slot::PairValue(i) => Some(&self.pairs[i].value),
                Slot::Toggle(i) => self.toggles[i].as_text(),
            },
        }
    }

    fn slot_widget_mut(&mut self, slot: Slot) -> &mut dyn Focusable {
        match slot {
            Slot::Method => &mut self.method,
            Slot::Host => &mut self.host,
            Slot::Path => &mut self.path,
            Slot::PairName(i) => &mut self.pairs[i].name,
            Slot::PairValue(i) => &mut self.pairs[i].value,
            Slot::Toggle(i) => &mut self.toggles[i],
        }
    }

    fn focused_widget_mut(&mut self) -> &mut dyn Focusable {
        match self.detour {
            Some(index) => &mut self.captures[index],
            None => self.slot_widget_mut(self.ring.current()),
        }
    }

    fn focus_current(&mut self) {
        let slot = self.ring.current();
        self.slot_widget_mut(slot).focus();
    }

    fn blur_current(&mut self) {
        let slot = self.ring.current();
        self.slot_widget_mut(slot).blur();
    }

    /// Advance focus. Leaving the method field commits it.
    pub fn next(&mut self, model: &mut RequestModel) {
        if self.detour.is_some() {
            return;
        }
        if self.ring.current() == Slot::Method {
            self.commit_method(model);
        }
        self.blur_current();
        let slot = self.ring.next();
        self.focus_current();
        tracing::debug!(?slot, "focus next");
    }

    /// Retreat focus. Commits nothing.
    pub fn prev(&mut self) {
        if self.detour.is_some() {
            return;
        }
        self.blur_current();
        let slot = self.ring.prev();
        self.focus_current();
        tracing::debug!(?slot, "focus prev");
    }

    /// Handle the confirm key. Returns a file open request when a file
    /// capture was confirmed.
    pub fn confirm(&mut self, model: &mut RequestModel) -> Option<OpenRequest> {
        if let Some(index) = self.detour {
            let notification = self.captures[index].handle(&WidgetEvent::Confirm);
            self.detour = None;
            self.ring.reset();
            self.focus_current();
            return match notification {
                Some(Notification::OpenRequested(request)) => Some(request),
                _ => None,
            };
        }

        match self.ring.current() {
            // Confirm never changes the method; only advancing commits it.
            Slot::Method => self.method.set_value(model.method.as_str()),
            Slot::Host => {
                model.host = self.host.value().to_string();
                tracing::debug!(host = %model.host, "host committed");
            }
            Slot::Path => {
                model.path = self.path.value().to_string();
                tracing::debug!(path = %model.path, "path committed");
            }
            Slot::PairName(i) | Slot::PairValue(i) => {
                self.commit_pair(i, model);
            }
            Slot::Toggle(i) => {
                let notification = self.toggles[i].handle(&WidgetEvent::Confirm);
                if let Some(notification) = notification {
                    apply_toggle(notification, model);
                }
            }
        }
        self.next(model);
        None
    }

    /// Toggle the focused checkbox or cycle the focused select.
    /// Returns false when the focused widget is not a toggle.
    pub fn toggle(&mut self, model: &mut RequestModel) -> bool {
        let FocusTarget::Ring(Slot::Toggle(i)) = self.focus_target() else {
            return false;
        };
        if let Some(notification) = self.toggles[i].handle(&WidgetEvent::Toggle) {
            apply_toggle(notification, model);
        }
        true
    }

    /// Remove the entry named by the focused group's name field.
    /// Returns the group and the removed name.
    pub fn delete(&mut self, model: &mut RequestModel) -> Option<(FieldGroup, String)> {
        let FocusTarget::Ring(Slot::PairName(i) | Slot::PairValue(i)) = self.focus_target() else {
            return None;
        };
        let pair = &mut self.pairs[i];
        let group = pair.group;
        let name = pair.name.commit().to_string();
        if name.is_empty() {
            return None;
        }

        let removed = match group {
            FieldGroup::Header => model.headers.delete(&name),
            FieldGroup::Param => model.delete_param(&name),
            FieldGroup::Cookie => model.cookies.delete(&name),
            FieldGroup::Form => model.form.delete(&name),
        };
        pair.refresh_suggestions(&group.collection(model));
        tracing::debug!(group = group.label(), %name, removed, "delete");
        removed.then_some((group, name))
    }

    /// Forward a raw editing key to the focused widget.
    pub fn input(&mut self, key: KeyEvent) {
        self.focused_widget_mut().handle(&WidgetEvent::Key(key));
    }

    pub fn autocomplete(&mut self) {
        self.focused_widget_mut().handle(&WidgetEvent::Autocomplete);
    }

    /// Show or hide a file capture. Showing one hides the others and moves
    /// focus off the ring; hiding it returns focus to the ring start.
    pub fn toggle_capture(&mut self, index: usize) {
        let Some(capture) = self.captures.get(index) else {
            return;
        };
        let visible = capture.is_visible();
        self.blur_all();
        if visible {
            self.detour = None;
            self.ring.reset();
            self.focus_current();
        } else {
            let capture = &mut self.captures[index];
            capture.show();
            capture.focus();
            self.detour = Some(index);
        }
        tracing::debug!(index, shown = !visible, "file capture toggled");
    }

    fn blur_all(&mut self) {
        self.method.blur();
        self.host.blur();
        self.path.blur();
        for pair in &mut self.pairs {
            pair.name.blur();
            pair.value.blur();
        }
        for toggle in &mut self.toggles {
            toggle.blur();
        }
        for capture in &mut self.captures {
            capture.hide();
        }
    }

    /// Refresh path suggestions of the open file capture.
    pub fn tick(&mut self) {
        if let Some(index) = self.detour {
            self.captures[index].refresh_suggestions();
        }
    }

    /// Reset every widget to reflect `model` (after a session load).
    pub fn sync_from(&mut self, model: &RequestModel) {
        self.blur_all();
        self.detour = None;
        self.method.set_value(model.method.as_str());
        self.host.set_value(model.host.clone());
        self.path.set_value(model.path.clone());
        for pair in &mut self.pairs {
            pair.name.clear();
            pair.value.clear();
        }
        for toggle in &mut self.toggles {
            match toggle {
                Widget::Checkbox(c) if c.id() == HTTPS => c.set(model.scheme == Scheme::Https),
                Widget::Select(s) if s.id() == PROTOCOL => {
                    s.select_option(model.protocol.label());
                }
                _ => {}
            }
        }
        self.refresh_all_suggestions(model);
        self.ring.reset();
        self.focus_current();
    }

    fn commit_method(&mut self, model: &mut RequestModel) {
        match HttpMethod::match_input(self.method.value()) {
            Some(method) => {
                model.method = method;
                self.method.set_value(method.as_str());
                tracing::debug!(%method, "method committed");
            }
            None => {
                tracing::debug!(typed = self.method.value(), "method rejected");
                self.method.set_value(model.method.as_str());
            }
        }
    }

    fn commit_pair(&mut self, index: usize, model: &mut RequestModel) -> bool {
        let pair = &mut self.pairs[index];
        let group = pair.group;
        let name = pair.name.commit().to_string();
        let value = pair.value.value().to_string();
        if name.is_empty() || value.is_empty() {
            return false;
        }

        match group {
            FieldGroup::Header => model.headers.set(name.as_str(), value.as_str()),
            FieldGroup::Param => model.set_param(&name, &value),
            FieldGroup::Cookie => model.cookies.set(name.as_str(), value.as_str()),
            FieldGroup::Form => model.set_form_field(&name, &value),
        }
        pair.name.clear();
        pair.value.clear();
        pair.refresh_suggestions(&group.collection(model));
        tracing::debug!(group = group.label(), %name, "pair committed");
        true
    }

    fn refresh_all_suggestions(&mut self, model: &RequestModel) {
        for pair in &mut self.pairs {
            let set = pair.group.collection(model);
            pair.refresh_suggestions(&set);
        }
    }

    /// Rows of the form, each starting with a one-column margin.
    pub fn lines(&self, style: &WidgetStyle) -> Vec<Line<'static>> {
        let mut lines = vec![
            row(self.method.line(style), Some(self.host.line(style))),
            row(self.path.line(style), None),
        ];
        for pair in &self.pairs {
            lines.push(row(pair.name.line(style), Some(pair.value.line(style))));
        }

        let mut spans = vec![Span::raw(" ")];
        for toggle in &self.toggles {
            spans.extend(pad_line(toggle.line(style), COLUMN_WIDTH).spans);
        }
        lines.push(Line::from(spans));
        lines
    }

    /// Cursor position `(column, row)` relative to the form area, when a
    /// ring text field has focus.
    pub fn cursor_position(&self) -> Option<(u16, u16)> {
        let FocusTarget::Ring(slot) = self.focus_target() else {
            return None;
        };
        let (field, column, row) = match slot {
            Slot::Method => (&self.method, MARGIN, 0),
            Slot::Host => (&self.host, MARGIN + COLUMN_WIDTH, 0),
            Slot::Path => (&self.path, MARGIN, 1),
            Slot::PairName(i) => (&self.pairs[i].name, MARGIN, 2 + i as u16),
            Slot::PairValue(i) => (&self.pairs[i].value, MARGIN + COLUMN_WIDTH, 2 + i as u16),
            Slot::Toggle(_) => return None,
        };
        Some((column + field.cursor_column(), row))
    }
}

fn apply_toggle(notification: Notification, model: &mut RequestModel) {
    match notification {
        Notification::Toggled { id: HTTPS, on } => {
            model.scheme = Scheme::from_secure(on);
            tracing::debug!(scheme = model.scheme.as_str(), "scheme committed");
        }
        Notification::Selected { id: PROTOCOL, option, .. } => {
            if let Some(protocol) = ProtocolVersion::from_label(&option) {
                model.protocol = protocol;
                tracing::debug!(protocol = protocol.label(), "protocol committed");
            }
        }
        _ => {}
    }
}

fn pad_line(line: Line<'static>, width: u16) -> Line<'static> {
    let pad = usize::from(width).saturating_sub(line.width());
    let mut spans = line.spans;
    spans.push(Span::raw(" ".repeat(pad.max(1))));
    Line::from(spans)
}

fn row(left: Line<'static>, right: Option<Line<'static>>) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    match right {
        Some(right) => {
            spans.extend(pad_line(left, COLUMN_WIDTH).spans);
            spans.extend(right.spans);
        }
        None => spans.extend(left.spans),
    }
    Line::from(spans)
}
