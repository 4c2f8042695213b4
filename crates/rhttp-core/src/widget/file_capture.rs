use std::fmt;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crossterm::event::KeyCode;
use ratatui::text::Line;

use super::{Focusable, Notification, TextField, WidgetEvent, WidgetId, WidgetStyle};

/// Upper bound on directory entries offered as path suggestions.
pub const MAX_PATH_SUGGESTIONS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    Read,
    Write,
}

/// Request to open a path, emitted when a file capture is confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenRequest {
    pub id: WidgetId,
    pub path: PathBuf,
    pub mode: FileMode,
}

pub enum FileHandle {
    Reader(Box<dyn Read + Send>),
    Writer(Box<dyn Write + Send>),
}

impl fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileHandle::Reader(_) => f.write_str("FileHandle::Reader"),
            FileHandle::Writer(_) => f.write_str("FileHandle::Writer"),
        }
    }
}

/// Result of opening the path of an [`OpenRequest`].
#[derive(Debug)]
pub struct FileOutcome {
    pub id: WidgetId,
    pub path: PathBuf,
    pub result: io::Result<FileHandle>,
}

impl OpenRequest {
    /// Open the path in the requested mode. Blocking; run off the UI thread.
    pub fn open(self) -> FileOutcome {
        let result = match self.mode {
            FileMode::Read => File::open(&self.path)
                .map(|file| FileHandle::Reader(Box::new(io::BufReader::new(file)))),
            FileMode::Write => File::create(&self.path)
                .map(|file| FileHandle::Writer(Box::new(io::BufWriter::new(file)))),
        };
        FileOutcome {
            id: self.id,
            path: self.path,
            result,
        }
    }
}

/// A hidden-by-default path prompt used for session save and load.
#[derive(Debug)]
pub struct FileCapture {
    id: WidgetId,
    mode: FileMode,
    field: TextField,
    visible: bool,
}

impl FileCapture {
    pub fn new(id: WidgetId, prompt: impl Into<String>, mode: FileMode) -> Self {
        Self {
            id,
            mode,
            field: TextField::new(prompt).with_placeholder("session.json"),
            visible: false,
        }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn field(&self) -> &TextField {
        &self.field
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.field.blur();
    }

    /// Offer entries of the typed path's directory whose names contain the
    /// typed file-name fragment. Directories get a trailing `/`.
    pub fn refresh_suggestions(&mut self) {
        let typed = self.field.value();
        let (dir, fragment) = split_typed_path(typed);
        let listing_dir = if dir.is_empty() { "." } else { dir };

        let Ok(entries) = fs::read_dir(listing_dir) else {
            self.field.set_suggestions(Vec::new());
            return;
        };

        let mut suggestions: Vec<String> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().into_owned();
                if !name.contains(fragment) {
                    return None;
                }
                let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                let suffix = if is_dir { "/" } else { "" };
                Some(format!("{dir}{name}{suffix}"))
            })
            .collect();
        suggestions.sort();
        suggestions.truncate(MAX_PATH_SUGGESTIONS);
        self.field.set_suggestions(suggestions);
    }

    /// Replace the value with the first listed path. Paths match anywhere
    /// in the file name, not only as a prefix of the typed value.
    pub fn autocomplete(&mut self) -> bool {
        match self.field.suggestions().first().cloned() {
            Some(path) if path != self.field.value() => {
                self.field.set_value(path);
                true
            }
            _ => false,
        }
    }

    pub fn line(&self, style: &WidgetStyle) -> Line<'static> {
        self.field.line(style)
    }
}

// "a/b/c.js" -> ("a/b/", "c.js"); "c.js" -> ("", "c.js")
fn split_typed_path(typed: &str) -> (&str, &str) {
    match typed.rfind(std::path::MAIN_SEPARATOR).or_else(|| typed.rfind('/')) {
        Some(i) => typed.split_at(i + 1),
        None => ("", typed),
    }
}

impl Focusable for FileCapture {
    fn focus(&mut self) {
        self.field.focus();
    }

    fn blur(&mut self) {
        self.field.blur();
    }

    fn is_focused(&self) -> bool {
        self.field.is_focused()
    }

    fn handle(&mut self, event: &WidgetEvent) -> Option<Notification> {
        match event {
            WidgetEvent::Confirm => {
                let path = Path::new(self.field.value()).to_path_buf();
                self.hide();
                Some(Notification::OpenRequested(OpenRequest {
                    id: self.id,
                    path,
                    mode: self.mode,
                }))
            }
            WidgetEvent::Autocomplete => {
                self.autocomplete();
                None
            }
            WidgetEvent::Key(key)
                if key.code == KeyCode::Right
                    && self.field.cursor() == self.field.value().len() =>
            {
                self.autocomplete();
                None
            }
            other => {
                self.field.handle(other);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn type_path(capture: &mut FileCapture, text: &str) {
        for c in text.chars() {
            capture.handle(&WidgetEvent::Key(KeyEvent::new(
                KeyCode::Char(c),
                KeyModifiers::NONE,
            )));
        }
    }

    #[test]
    fn test_confirm_hides_and_requests_open() {
        let mut capture = FileCapture::new("save", "Save to: ", FileMode::Write);
        capture.show();
        capture.focus();
        type_path(&mut capture, "out.json");

        let notification = capture.handle(&WidgetEvent::Confirm);
        assert!(!capture.is_visible());
        assert!(!capture.is_focused());
        assert_eq!(
            notification,
            Some(Notification::OpenRequested(OpenRequest {
                id: "save",
                path: PathBuf::from("out.json"),
                mode: FileMode::Write,
            }))
        );
    }

    #[test]
    fn test_open_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let outcome = OpenRequest {
            id: "save",
            path: path.clone(),
            mode: FileMode::Write,
        }
        .open();
        match outcome.result.unwrap() {
            FileHandle::Writer(mut w) => {
                w.write_all(b"{}").unwrap();
                w.flush().unwrap();
            }
            FileHandle::Reader(_) => panic!("expected a writer"),
        }

        let outcome = OpenRequest {
            id: "load",
            path,
            mode: FileMode::Read,
        }
        .open();
        let mut text = String::new();
        match outcome.result.unwrap() {
            FileHandle::Reader(mut r) => r.read_to_string(&mut text).unwrap(),
            FileHandle::Writer(_) => panic!("expected a reader"),
        };
        assert_eq!(text, "{}");
    }

    #[test]
    fn test_open_missing_file_is_reported() {
        let outcome = OpenRequest {
            id: "load",
            path: PathBuf::from("/no/such/dir/session.json"),
            mode: FileMode::Read,
        }
        .open();
        assert_eq!(outcome.id, "load");
        assert!(outcome.result.is_err());
    }

    #[test]
    fn test_suggestions_list_directory_entries() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sessions")).unwrap();
        fs::write(dir.path().join("session-a.json"), "").unwrap();
        fs::write(dir.path().join("other.txt"), "").unwrap();
        for i in 0..12 {
            fs::write(dir.path().join(format!("session-{i:02}.bak")), "").unwrap();
        }

        let prefix = format!("{}/", dir.path().display());
        let mut capture = FileCapture::new("load", "Load from: ", FileMode::Read);
        type_path(&mut capture, &format!("{prefix}sess"));
        capture.refresh_suggestions();

        let suggestions = capture.field().suggestions();
        assert_eq!(suggestions.len(), MAX_PATH_SUGGESTIONS);
        assert!(suggestions.iter().all(|s| s.starts_with(&prefix)));
        assert!(suggestions.iter().all(|s| !s.ends_with("other.txt")));

        let mut capture = FileCapture::new("load", "Load from: ", FileMode::Read);
        type_path(&mut capture, &format!("{prefix}sessions"));
        capture.refresh_suggestions();
        assert_eq!(capture.field().suggestions(), &[format!("{prefix}sessions/")]);
    }

    #[test]
    fn test_autocomplete_takes_first_listed_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("session-a.json"), "").unwrap();
        fs::write(dir.path().join("zz.txt"), "").unwrap();

        let prefix = format!("{}/", dir.path().display());
        let mut capture = FileCapture::new("load", "Load from: ", FileMode::Read);
        capture.show();
        capture.focus();
        type_path(&mut capture, &format!("{prefix}a.json"));
        capture.refresh_suggestions();
        assert_eq!(capture.field().suggestions(), &[format!("{prefix}session-a.json")]);

        capture.handle(&WidgetEvent::Autocomplete);
        assert_eq!(capture.field().value(), format!("{prefix}session-a.json"));
        assert!(!capture.autocomplete());
    }

    #[test]
    fn test_right_at_end_autocompletes_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("my-session.json"), "").unwrap();

        let prefix = format!("{}/", dir.path().display());
        let mut capture = FileCapture::new("load", "Load from: ", FileMode::Read);
        capture.focus();
        type_path(&mut capture, &format!("{prefix}session"));
        capture.refresh_suggestions();

        let right = KeyEvent::new(KeyCode::Right, KeyModifiers::NONE);
        capture.handle(&WidgetEvent::Key(right));
        assert_eq!(capture.field().value(), format!("{prefix}my-session.json"));
    }

    #[test]
    fn test_split_typed_path() {
        assert_eq!(split_typed_path("a/b/c.js"), ("a/b/", "c.js"));
        assert_eq!(split_typed_path("c.js"), ("", "c.js"));
        assert_eq!(split_typed_path("dir/"), ("dir/", ""));
    }
}
