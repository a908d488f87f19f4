//! Configuration loading and startup resolution (database path, initial
//! board name).
//!
//! Every field is optional in the file; a missing default config file is the
//! same as an empty one.

use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const MIN_COLUMN_WIDTH: u16 = 12;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub database: Option<PathBuf>,
    pub default_board: Option<String>,
    /// Width in cells of one board column.
    pub column_width: u16,
    /// `tracing` filter directive used when `KB_LOG` is unset.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: None,
            default_board: None,
            column_width: 24,
            log_filter: "info".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
    #[error("Could not determine a data directory (pass --db or set KB_DB)")]
    NoDataDir,
}

impl Config {
    /// Load from `explicit` if given (it must exist), else from the default
    /// location if present, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match explicit {
            Some(path) => Self::from_path(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_path(&path)?,
                _ => Self::default(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.column_width < MIN_COLUMN_WIDTH {
            return Err(ConfigError::InvalidValue {
                field: "column_width",
                reason: format!("must be at least {MIN_COLUMN_WIDTH}"),
            });
        }
        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "log_filter",
                reason: "must not be empty".to_string(),
            });
        }
        if let Some(board) = &self.default_board {
            if board.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "default_board",
                    reason: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// `<config dir>/kb/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("kb").join("config.toml"))
}

/// `<data dir>/kb`, honoring `XDG_DATA_HOME`. Holds the database and log.
pub fn data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("kb"))
}

/// Non-empty environment variable.
pub fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Database path: `--db`, then `KB_DB`, then config, then the data dir.
pub fn resolve_db_path(
    flag: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
    config: &Config,
) -> Result<PathBuf, ConfigError> {
    if let Some(path) = flag {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = env("KB_DB") {
        return Ok(PathBuf::from(path));
    }
    if let Some(path) = &config.database {
        return Ok(path.clone());
    }
    data_dir().map(|d| d.join("kb.db")).ok_or(ConfigError::NoDataDir)
}

/// Initial board name, first match wins: `--board`, `KB_BOARD`,
/// `TMUX_SESSION_NAME` without a `dev-` prefix, config `default_board`,
/// basename of `cwd`.
pub fn detect_board(
    flag: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
    config: &Config,
    cwd: Option<&Path>,
) -> Option<String> {
    if let Some(name) = flag.map(str::trim).filter(|n| !n.is_empty()) {
        return Some(name.to_string());
    }
    if let Some(name) = env("KB_BOARD") {
        return Some(name);
    }
    if let Some(session) = env("TMUX_SESSION_NAME") {
        let name = session.strip_prefix("dev-").unwrap_or(&session);
        if !name.is_empty() {
            return Some(name.to_string());
        }
    }
    if let Some(name) = &config.default_board {
        return Some(name.clone());
    }
    cwd.and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.column_width, 24);
        assert_eq!(config.log_filter, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_partial_file() {
        let file = write_config("default_board = \"work\"\ncolumn_width = 30\n");
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.default_board.as_deref(), Some("work"));
        assert_eq!(config.column_width, 30);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn reject_narrow_columns() {
        let file = write_config("column_width = 8\n");
        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "column_width", .. }));
    }

    #[test]
    fn reject_unknown_keys() {
        let file = write_config("colour = \"red\"\n");
        assert!(matches!(Config::load(Some(file.path())), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn db_path_precedence() {
        let config = Config {
            database: Some(PathBuf::from("/cfg/kb.db")),
            ..Config::default()
        };
        let env = env_from(&[("KB_DB", "/env/kb.db")]);
        assert_eq!(
            resolve_db_path(Some(Path::new("/flag/kb.db")), &env, &config).unwrap(),
            PathBuf::from("/flag/kb.db")
        );
        assert_eq!(resolve_db_path(None, &env, &config).unwrap(), PathBuf::from("/env/kb.db"));
        assert_eq!(
            resolve_db_path(None, env_from(&[]), &config).unwrap(),
            PathBuf::from("/cfg/kb.db")
        );
    }

    #[test]
    fn board_detection_order() {
        let config = Config {
            default_board: Some("from-config".into()),
            ..Config::default()
        };
        let cwd = Path::new("/home/me/project");
        let full = env_from(&[("KB_BOARD", "from-env"), ("TMUX_SESSION_NAME", "dev-tmux")]);

        assert_eq!(detect_board(Some("flag"), &full, &config, Some(cwd)).as_deref(), Some("flag"));
        assert_eq!(detect_board(None, &full, &config, Some(cwd)).as_deref(), Some("from-env"));
        let tmux = env_from(&[("TMUX_SESSION_NAME", "dev-tmux")]);
        assert_eq!(detect_board(None, &tmux, &config, Some(cwd)).as_deref(), Some("tmux"));
        assert_eq!(
            detect_board(None, env_from(&[]), &config, Some(cwd)).as_deref(),
            Some("from-config")
        );
        assert_eq!(
            detect_board(None, env_from(&[]), &Config::default(), Some(cwd)).as_deref(),
            Some("project")
        );
    }

    #[test]
    fn tmux_name_without_prefix_is_kept() {
        let env = env_from(&[("TMUX_SESSION_NAME", "notes")]);
        assert_eq!(detect_board(None, env, &Config::default(), None).as_deref(), Some("notes"));
    }

    #[test]
    fn root_dir_yields_no_board() {
        assert_eq!(detect_board(None, env_from(&[]), &Config::default(), Some(Path::new("/"))), None);
    }
}
