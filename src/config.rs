//! Settings file, defaults, and resolved filesystem locations.
//!
//! ```toml
//! [settings]
//! ring_size = 50
//! show_comments_first = true
//!
//! [[actions]]
//! name = "Open URL"
//! command = "xdg-open %s"
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    core::preview::{PreviewOptions, is_line_break},
    menu::actions::{ActionError, ActionSpec, ActionTable},
    types::{BackendKind, RowFraming},
};

/// Directory and file stem used under the XDG base directories.
pub const APP_NAME: &str = "clipring";
const SETTINGS_FILE: &str = "settings.toml";
const MIN_POLL_INTERVAL_MS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid setting `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error("cannot determine the {0} directory")]
    NoDir(&'static str),
}

/// `[settings]` table. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub ring_size: usize,
    pub preview_width: usize,
    pub newline_char: String,
    pub comment_char: String,
    pub comment_delimiter: char,
    pub notify: bool,
    /// Seconds.
    pub notify_timeout: u64,
    pub show_comments_first: bool,
    pub colored_comments: bool,
    pub poll_interval_ms: u64,
    pub row_index: RowFraming,
    pub backend: BackendKind,
    pub data_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ring_size: 20,
            preview_width: 100,
            newline_char: "¬".to_string(),
            comment_char: "©".to_string(),
            comment_delimiter: '#',
            notify: true,
            notify_timeout: 1,
            show_comments_first: false,
            colored_comments: false,
            poll_interval_ms: 300,
            row_index: RowFraming::Rofi,
            backend: BackendKind::File,
            data_dir: None,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ring_size == 0 {
            return Err(invalid("ring_size", "must be at least 1"));
        }
        if self.preview_width == 0 {
            return Err(invalid("preview_width", "must be at least 1"));
        }
        if self.poll_interval_ms < MIN_POLL_INTERVAL_MS {
            return Err(invalid(
                "poll_interval_ms",
                format!("must be at least {MIN_POLL_INTERVAL_MS}"),
            ));
        }
        if self.newline_char.chars().any(is_line_break) {
            return Err(invalid("newline_char", "must not contain a line break"));
        }
        if is_line_break(self.comment_delimiter) {
            return Err(invalid("comment_delimiter", "must not be a line break"));
        }
        Ok(())
    }

    pub fn preview_options(&self) -> PreviewOptions {
        PreviewOptions {
            max_width: self.preview_width,
            newline_marker: self.newline_char.clone(),
            comment_char: self.comment_char.clone(),
            comment_delimiter: self.comment_delimiter,
            show_comments_first: self.show_comments_first,
            colored_comments: self.markup_rows(),
        }
    }

    /// Pango-styled rows; only rofi interprets markup, other pickers get plain text.
    pub fn markup_rows(&self) -> bool {
        self.colored_comments && self.row_index == RowFraming::Rofi
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn notify_timeout(&self) -> Duration {
        Duration::from_secs(self.notify_timeout)
    }
}

fn invalid(key: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key,
        reason: reason.into(),
    }
}

/// Raw shape of the settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub settings: Settings,
    pub actions: Vec<ActionSpec>,
}

impl ConfigFile {
    pub fn parse(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }
}

/// Filesystem locations used by one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub config_file: PathBuf,
    pub data_dir: PathBuf,
    /// Unix socket the daemon accepts clipboard handoffs on.
    pub socket: PathBuf,
}

impl Paths {
    pub fn default_config_file() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoDir("config"))?;
        Ok(dir.join(APP_NAME).join(SETTINGS_FILE))
    }

    fn resolve(config_file: PathBuf, data_dir: Option<&Path>) -> Result<Self, ConfigError> {
        let data_dir = match data_dir {
            Some(dir) => dir.to_path_buf(),
            None => dirs::data_dir()
                .ok_or(ConfigError::NoDir("data"))?
                .join(APP_NAME),
        };
        let socket = match dirs::runtime_dir() {
            Some(dir) => dir.join(format!("{APP_NAME}.sock")),
            None => {
                let user = std::env::var("USER").unwrap_or_default();
                std::env::temp_dir().join(format!("{APP_NAME}-{user}.sock"))
            }
        };
        Ok(Self {
            config_file,
            data_dir,
            socket,
        })
    }
}

/// Everything a process needs, built once at start-up.
#[derive(Debug, Clone)]
pub struct Config {
    pub settings: Settings,
    pub actions: ActionTable,
    pub paths: Paths,
}

impl Config {
    /// Reads `path` (or the default location). A missing file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_file = match path {
            Some(p) => p.to_path_buf(),
            None => Paths::default_config_file()?,
        };
        let file = match std::fs::read_to_string(&config_file) {
            Ok(text) => ConfigFile::parse(&text, &config_file)?,
            Err(err) if err.kind() == ErrorKind::NotFound => ConfigFile::default(),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: config_file,
                    source,
                });
            }
        };
        Self::from_file(file, config_file)
    }

    pub fn from_file(file: ConfigFile, config_file: PathBuf) -> Result<Self, ConfigError> {
        file.settings.validate()?;
        let actions = ActionTable::from_specs(file.actions)?;
        let paths = Paths::resolve(config_file, file.settings.data_dir.as_deref())?;
        Ok(Self {
            settings: file.settings,
            actions,
            paths,
        })
    }

    /// Applies the command-line `--quiet` flag.
    pub fn silence(&mut self) {
        self.settings.notify = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let file = ConfigFile::parse("", Path::new("settings.toml")).expect("parse");
        assert_eq!(file.settings, Settings::default());
        assert!(file.actions.is_empty());
    }

    #[test]
    fn partial_settings_keep_other_defaults() {
        let text = r##"
            [settings]
            ring_size = 5
            row_index = "prefix"
            backend = "sqlite"
            comment_delimiter = ";"

            [[actions]]
            name = "Open"
            command = "xdg-open %s"

            [[actions]]
            name = "Upper"
            command = "notify-send %s"
        "##;
        let file = ConfigFile::parse(text, Path::new("settings.toml")).expect("parse");
        assert_eq!(file.settings.ring_size, 5);
        assert_eq!(file.settings.row_index, RowFraming::Prefix);
        assert_eq!(file.settings.backend, BackendKind::Sqlite);
        assert_eq!(file.settings.comment_delimiter, ';');
        assert_eq!(file.settings.preview_width, 100);
        let names: Vec<_> = file.actions.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["Open", "Upper"]);
    }

    #[test]
    fn zero_ring_size_is_rejected() {
        let settings = Settings {
            ring_size: 0,
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::Invalid { key: "ring_size", .. })
        ));
    }

    #[test]
    fn marker_with_line_break_is_rejected() {
        let settings = Settings {
            newline_char: "\n".to_string(),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn comment_colouring_needs_rofi_framing() {
        let rofi = Settings {
            colored_comments: true,
            ..Settings::default()
        };
        assert!(rofi.preview_options().colored_comments);

        for row_index in [RowFraming::Prefix, RowFraming::None] {
            let dmenu = Settings {
                row_index,
                ..rofi.clone()
            };
            assert!(!dmenu.markup_rows());
            assert_eq!(dmenu.preview_options().render_note("a & b # c"), "a & b # c");
        }
    }

    #[test]
    fn malformed_file_reports_parse_error() {
        let err = ConfigFile::parse("[settings\nring_size = ", Path::new("x.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
