//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.cardstack/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//! The card registry itself is declared in the same file as `[[cards]]`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::card::CardSpec;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CardStackConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    /// None when the file declares no `[[cards]]` at all.
    pub cards: Option<Vec<CardSpec>>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub log_level: Option<String>,
    pub log_file: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct HistoryConfig {
    pub initial_entries: Option<Vec<String>>,
    pub initial_index: Option<usize>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOG_FILE: &str = "cardstack.log";
pub const DEFAULT_INITIAL_ENTRY: &str = "/";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub log_level: log::LevelFilter,
    pub log_file: PathBuf,
    pub initial_entries: Vec<String>,
    pub initial_index: Option<usize>,
    pub cards: Option<Vec<CardSpec>>,
    /// A log level that didn't parse and was replaced by the default.
    pub rejected_log_level: Option<String>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.cardstack/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".cardstack").join("config.toml"))
}

/// Where the loaded config came from.
///
/// Loading runs before the file logger exists, so the caller logs this once
/// logging is up instead of the loader logging it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    File(PathBuf),
    /// No file existed, so a commented-out default was written here.
    Generated(PathBuf),
    /// No file existed and writing the default failed.
    GenerateFailed { path: PathBuf, reason: String },
    /// No home directory to look in.
    NoHome,
}

impl fmt::Display for ConfigOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigOrigin::File(path) => write!(f, "loaded config from {}", path.display()),
            ConfigOrigin::Generated(path) => {
                write!(f, "no config file found, generated default at {}", path.display())
            }
            ConfigOrigin::GenerateFailed { path, reason } => write!(
                f,
                "no config file found, failed to write default at {}: {reason}",
                path.display()
            ),
            ConfigOrigin::NoHome => write!(f, "could not determine home directory, using default config"),
        }
    }
}

/// Load config from `~/.cardstack/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `CardStackConfig::default()`.
pub fn load_config() -> Result<(CardStackConfig, ConfigOrigin), ConfigError> {
    let Some(path) = config_path() else {
        return Ok((CardStackConfig::default(), ConfigOrigin::NoHome));
    };

    if !path.exists() {
        let origin = match generate_default_config(&path) {
            Ok(()) => ConfigOrigin::Generated(path),
            Err(e) => ConfigOrigin::GenerateFailed {
                path,
                reason: e.to_string(),
            },
        };
        return Ok((CardStackConfig::default(), origin));
    }

    let config = load_config_from(&path)?;
    Ok((config, ConfigOrigin::File(path)))
}

/// Load config from an explicit path. A missing file is an error here.
pub fn load_config_from(path: &Path) -> Result<CardStackConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&contents).map_err(ConfigError::Parse)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) -> std::io::Result<()> {
    let default_content = r#"# Card Stack Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# log_level = "info"                 # "off", "error", "warn", "info", "debug", "trace"
# log_file = "cardstack.log"

# [history]
# initial_entries = ["/", "/items"]  # Starting history, oldest first
# initial_index = 1                  # Defaults to the last entry

# Cards are matched in order; the first match wins.
# [[cards]]
# key = "home"
# path = "/"
# exact = true
# title = "Home"

# [[cards]]
# key = "items"
# path = "/items"
# exact = true

#   [[cards.cards]]                  # Nested cards follow their parent
#   key = "item"
#   path = "/items/:id"
"#;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, default_content)
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_log_level` comes from the `--log-level` flag (None = not specified).
pub fn resolve(config: CardStackConfig, cli_log_level: Option<&str>) -> ResolvedConfig {
    // Log level: CLI → env → config → default
    let log_level = cli_log_level
        .map(|s| s.to_string())
        .or_else(|| std::env::var("CARDSTACK_LOG_LEVEL").ok())
        .or_else(|| config.general.log_level.clone())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
    let (log_level, rejected_log_level) = match parse_level(&log_level) {
        Some(filter) => (filter, None),
        None => (log::LevelFilter::Info, Some(log_level)),
    };

    // Log file: env → config → default
    let log_file = std::env::var("CARDSTACK_LOG_FILE")
        .ok()
        .or_else(|| config.general.log_file.clone())
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());

    let initial_entries = config
        .history
        .initial_entries
        .filter(|entries| !entries.is_empty())
        .unwrap_or_else(|| vec![DEFAULT_INITIAL_ENTRY.to_string()]);

    ResolvedConfig {
        log_level,
        log_file: PathBuf::from(log_file),
        initial_entries,
        initial_index: config.history.initial_index,
        cards: config.cards,
        rejected_log_level,
    }
}

fn parse_level(level: &str) -> Option<log::LevelFilter> {
    level.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_no_cards() {
        let config = CardStackConfig::default();
        assert!(config.cards.is_none());
        assert!(config.general.log_level.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve(CardStackConfig::default(), Some("info"));
        assert_eq!(resolved.log_level, log::LevelFilter::Info);
        assert_eq!(resolved.initial_entries, [DEFAULT_INITIAL_ENTRY]);
        assert_eq!(resolved.initial_index, None);
        assert!(resolved.cards.is_none());
    }

    #[test]
    fn test_resolve_cli_log_level_wins() {
        let config = CardStackConfig {
            general: GeneralConfig {
                log_level: Some("warn".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve(config, Some("debug"));
        assert_eq!(resolved.log_level, log::LevelFilter::Debug);
        assert!(resolved.rejected_log_level.is_none());
    }

    #[test]
    fn test_resolve_unknown_level_falls_back() {
        let resolved = resolve(CardStackConfig::default(), Some("chatty"));
        assert_eq!(resolved.log_level, log::LevelFilter::Info);
        assert_eq!(resolved.rejected_log_level.as_deref(), Some("chatty"));
    }

    #[test]
    fn test_resolve_empty_entries_start_at_root() {
        let config = CardStackConfig {
            history: HistoryConfig {
                initial_entries: Some(Vec::new()),
                initial_index: None,
            },
            ..Default::default()
        };
        let resolved = resolve(config, Some("info"));
        assert_eq!(resolved.initial_entries, ["/"]);
    }

    #[test]
    fn test_full_toml() {
        let toml_str = r#"
[general]
log_level = "debug"
log_file = "/tmp/stack.log"

[history]
initial_entries = ["/", "/items", "/items/3"]
initial_index = 1

[[cards]]
key = "home"
path = "/"
exact = true

[[cards]]
key = "items"
path = "/items"
exact = true

  [[cards.cards]]
  key = "item"
  path = "/items/:id"
  title = "Item"
"#;
        let config: CardStackConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level.as_deref(), Some("debug"));
        assert_eq!(config.history.initial_index, Some(1));

        let cards = config.cards.unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[1].cards.len(), 1);
        assert_eq!(cards[1].cards[0].key, "item");
        assert_eq!(cards[1].cards[0].title.as_deref(), Some("Item"));
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only history, no cards table at all
        let toml_str = r#"
[history]
initial_entries = ["/a"]
"#;
        let config: CardStackConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.history.initial_entries.as_deref(),
            Some(&["/a".to_string()][..])
        );
        assert!(config.cards.is_none());
        assert!(config.general.log_file.is_none());
    }

    #[test]
    fn test_generated_default_parses_as_empty_config() {
        let path = std::env::temp_dir()
            .join(format!("cardstack-{}", uuid::Uuid::new_v4().simple()))
            .join("config.toml");
        generate_default_config(&path).unwrap();

        let config = load_config_from(&path).unwrap();
        assert!(config.cards.is_none());
        assert!(config.history.initial_entries.is_none());

        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_origin_describes_itself() {
        let origin = ConfigOrigin::Generated(PathBuf::from("/home/u/.cardstack/config.toml"));
        assert_eq!(
            origin.to_string(),
            "no config file found, generated default at /home/u/.cardstack/config.toml"
        );
        assert!(ConfigOrigin::NoHome.to_string().contains("home directory"));
    }

    #[test]
    fn test_load_config_from_missing_file_is_io_error() {
        let result = load_config_from(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
