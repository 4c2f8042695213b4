use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use directories::{BaseDirs, ProjectDirs};
use ratatui::style::Color;
use serde::Deserialize;
use thiserror::Error;
use toml::Table;

use crate::keybinds::KeyMap;

/// The configuration compiled into the binary.
pub const DEFAULT_CONFIG: &str = include_str!("../default_config.toml");

/// Colour used when a theme entry is missing or unparsable.
pub const FALLBACK_COLOR: Color = Color::Indexed(11);

/// Glyph used when a theme emoji is missing.
pub const FALLBACK_EMOJI: &str = "❓";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid key binding: {0:?}")]
    InvalidKey(String),
    #[error("unknown action in [keys]: {0:?}")]
    UnknownAction(String),
}

/// Fully merged configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub settings: Settings,
    pub theme: Theme,
    #[serde(default)]
    pub keys: BTreeMap<String, Vec<String>>,
    /// Non-fatal problems found while resolving the theme.
    #[serde(skip)]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub timeout_secs: u64,
    pub max_redirects: usize,
    pub fullscreen: bool,
    pub page_shift: usize,
    pub marquee_step: usize,
    pub tick_ms: u64,
    pub checkboxes: CheckboxDefaults,
}

impl Settings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CheckboxDefaults {
    pub https: bool,
    pub autoformat: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Theme {
    /// syntect theme used for response bodies.
    pub syntax: String,
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
    #[serde(default)]
    pub emojis: BTreeMap<String, String>,
}

impl Config {
    /// Load the embedded defaults, then the user file, then `override_path`.
    pub fn load(override_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut layers = vec![parse_table(DEFAULT_CONFIG, "<defaults>")?];

        if let Some(path) = user_config_path() {
            if path.exists() {
                layers.push(read_table(&path)?);
            } else {
                tracing::debug!(path = %path.display(), "no user config");
            }
        }

        if let Some(path) = override_path {
            layers.push(read_table(&expand_home(path))?);
        }

        Self::from_layers(layers)
    }

    /// Deep-merge `layers` in order and deserialize the result.
    pub fn from_layers(layers: impl IntoIterator<Item = Table>) -> Result<Self, ConfigError> {
        let mut merged = Table::new();
        for layer in layers {
            merge_tables(&mut merged, layer);
        }
        toml::Value::Table(merged)
            .try_into()
            .map_err(|source| ConfigError::Parse {
                origin: "merged configuration".to_string(),
                source,
            })
    }

    /// Defaults only, as compiled in.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::from_layers([parse_table(DEFAULT_CONFIG, "<defaults>")?])
    }

    pub fn key_map(&self) -> Result<KeyMap, ConfigError> {
        KeyMap::from_table(&self.keys)
    }

    /// Theme colour by name, recording a warning and falling back when absent.
    pub fn color(&mut self, name: &str) -> Color {
        let Some(raw) = self.theme.colors.get(name) else {
            self.add_warning(format!("color {name:?} not found"));
            return FALLBACK_COLOR;
        };
        match Color::from_str(raw) {
            Ok(color) => color,
            Err(_) => {
                let message = format!("color {name:?} has invalid value {raw:?}");
                self.add_warning(message);
                FALLBACK_COLOR
            }
        }
    }

    /// Theme emoji by name, recording a warning and falling back when absent.
    pub fn emoji(&mut self, name: &str) -> String {
        match self.theme.emojis.get(name) {
            Some(emoji) => emoji.clone(),
            None => {
                self.add_warning(format!("emoji {name:?} not found"));
                FALLBACK_EMOJI.to_string()
            }
        }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn warning_message(&self) -> String {
        self.warnings.join(", ")
    }

    fn add_warning(&mut self, warning: String) {
        tracing::warn!("{warning}");
        if !self.warnings.contains(&warning) {
            self.warnings.push(warning);
        }
    }
}

/// Location of the per-user config file: `<config_dir>/config.toml`.
pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "rhttp").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Default log file location: `<data_dir>/rhttp.log`.
pub fn default_log_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "rhttp").map(|dirs| dirs.data_dir().join("rhttp.log"))
}

fn read_table(path: &Path) -> Result<Table, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_table(&text, &path.display().to_string())
}

fn parse_table(text: &str, origin: &str) -> Result<Table, ConfigError> {
    text.parse::<Table>().map_err(|source| ConfigError::Parse {
        origin: origin.to_string(),
        source,
    })
}

/// Recursively merge `overlay` into `base`. Nested tables merge key by key;
/// any other value in `overlay` replaces the one in `base`.
fn merge_tables(base: &mut Table, overlay: Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match BaseDirs::new() {
            Some(dirs) => dirs.home_dir().join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keybinds::Action;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn test_defaults_parse() {
        let config = Config::defaults().unwrap();
        assert_eq!(config.settings.timeout_secs, 2);
        assert_eq!(config.settings.page_shift, 5);
        assert!(config.settings.checkboxes.autoformat);
        assert!(!config.settings.checkboxes.https);
        assert_eq!(config.theme.syntax, "base16-mocha.dark");
    }

    #[test]
    fn test_default_keys_cover_every_action() {
        let config = Config::defaults().unwrap();
        let keys = config.key_map().unwrap();
        for action in Action::ALL {
            assert!(
                !keys.chords(action).is_empty(),
                "{action:?} has no default binding"
            );
        }
        let send = KeyEvent::new(KeyCode::Char('g'), KeyModifiers::CONTROL);
        assert_eq!(keys.resolve(&send), Some(Action::Send));
    }

    #[test]
    fn test_overlay_merges_nested_tables() {
        let defaults = parse_table(DEFAULT_CONFIG, "<defaults>").unwrap();
        let overlay = parse_table(
            "[settings]\ntimeout_secs = 30\n[settings.checkboxes]\nhttps = true\n[theme.colors]\nprompt = \"red\"\n",
            "<test>",
        )
        .unwrap();
        let config = Config::from_layers([defaults, overlay]).unwrap();
        assert_eq!(config.settings.timeout_secs, 30);
        assert_eq!(config.settings.max_redirects, 10);
        assert!(config.settings.checkboxes.https);
        assert!(config.settings.checkboxes.autoformat);
        assert_eq!(config.theme.colors["prompt"], "red");
        assert!(config.theme.colors.contains_key("placeholder"));
    }

    #[test]
    fn test_override_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[settings]\npage_shift = 7\n").unwrap();
        let config = Config::from_layers([
            parse_table(DEFAULT_CONFIG, "<defaults>").unwrap(),
            read_table(&path).unwrap(),
        ])
        .unwrap();
        assert_eq!(config.settings.page_shift, 7);
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        assert!(matches!(
            parse_table("[settings", "<test>"),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_override_file_is_io_error() {
        let err = read_table(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_color_lookup_and_fallback() {
        let mut config = Config::defaults().unwrap();
        assert_eq!(config.color("prompt"), Color::Indexed(69));
        assert_eq!(config.color("statusbar_bg"), Color::Rgb(0x35, 0x35, 0x33));
        assert!(!config.has_warnings());

        assert_eq!(config.color("no-such-color"), FALLBACK_COLOR);
        config
            .theme
            .colors
            .insert("broken".to_string(), "not a colour".to_string());
        assert_eq!(config.color("broken"), FALLBACK_COLOR);
        assert_eq!(config.warnings.len(), 2);
        assert!(config.warning_message().contains("no-such-color"));
    }

    #[test]
    fn test_emoji_fallback() {
        let mut config = Config::defaults().unwrap();
        assert_eq!(config.emoji("proto_http2"), "⚡ ");
        assert_eq!(config.emoji("missing"), FALLBACK_EMOJI);
        assert!(config.has_warnings());
    }

    #[test]
    fn test_expand_home_leaves_plain_paths() {
        assert_eq!(expand_home(Path::new("/etc/rhttp.toml")), PathBuf::from("/etc/rhttp.toml"));
    }
}
