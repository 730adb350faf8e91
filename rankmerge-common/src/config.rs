//! Configuration loading and resolution
//!
//! Settings resolve in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing config file is not an error: a warning is logged and compiled
//! defaults apply. A config file that exists but cannot be parsed is.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const ENV_CONFIG: &str = "RANKMERGE_CONFIG";
/// Environment variable overriding the database path
pub const ENV_DATABASE: &str = "RANKMERGE_DATABASE";
/// Environment variable carrying the directory access token
pub const ENV_ACCESS_TOKEN: &str = "RANKMERGE_ACCESS_TOKEN";
/// Environment variable overriding the home roster identifier
pub const ENV_HOME_ROSTER: &str = "RANKMERGE_HOME_ROSTER";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Path to SQLite database file (relative or absolute)
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Fantasy team whose players trigger "future player" notices
    #[serde(default)]
    pub home_roster_id: Option<String>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Player directory endpoint configuration
    #[serde(default)]
    pub directory: DirectoryConfig,

    /// Candidate matching thresholds
    #[serde(default)]
    pub matching: MatchingConfig,

    /// Ranking lists to ingest, in processing order
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// External player directory (search endpoint) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Search endpoint URL
    #[serde(default = "default_search_url")]
    pub search_url: String,

    /// League scope for the search, if the directory requires one
    #[serde(default)]
    pub league_id: Option<String>,

    /// Directory API version parameter
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Restrict results to players eligible in the league
    #[serde(default)]
    pub eligible_only: bool,

    /// Restrict results to unowned players
    #[serde(default)]
    pub free_agents_only: bool,

    /// Total request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Access token (the environment variable takes precedence)
    #[serde(default)]
    pub access_token: Option<String>,

    /// Memoize search results for the duration of one source run
    #[serde(default)]
    pub cache_queries: bool,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            search_url: default_search_url(),
            league_id: None,
            api_version: default_api_version(),
            eligible_only: false,
            free_agents_only: false,
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            access_token: None,
            cache_queries: false,
        }
    }
}

/// Candidate matching configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Jaro-Winkler similarity at which two differing given names still
    /// count as the same person under relaxed equality
    #[serde(default = "default_given_name_similarity")]
    pub given_name_similarity: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            given_name_similarity: default_given_name_similarity(),
        }
    }
}

/// One ranking list to ingest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Path to the ranking file
    pub path: PathBuf,

    /// Source identifier (defaults to the file stem)
    #[serde(default)]
    pub id: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_search_url() -> String {
    "https://api.cbssports.com/fantasy/players/search".to_string()
}

fn default_api_version() -> String {
    "3.0".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_given_name_similarity() -> f64 {
    0.85
}

/// Compiled default locations for the current platform
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub config_file: Option<PathBuf>,
    pub database_path: PathBuf,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        let config_file = dirs::config_dir().map(|d| d.join("rankmerge").join("config.toml"));
        let database_path = dirs::data_local_dir()
            .map(|d| d.join("rankmerge").join("rankmerge.db"))
            .unwrap_or_else(|| PathBuf::from("./rankmerge_data/rankmerge.db"));

        Self {
            config_file,
            database_path,
        }
    }
}

/// Load the TOML configuration
///
/// Lookup order: explicit path, then `RANKMERGE_CONFIG`, then the platform
/// config directory. Explicitly named files must exist; the platform default
/// is optional.
pub fn load_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    if let Some(path) = explicit {
        return read_config_file(path);
    }

    if let Ok(path) = std::env::var(ENV_CONFIG) {
        return read_config_file(Path::new(&path));
    }

    match CompiledDefaults::for_current_platform().config_file {
        Some(path) if path.exists() => read_config_file(&path),
        Some(path) => {
            warn!(
                "No config file at {}, using built-in defaults",
                path.display()
            );
            Ok(TomlConfig::default())
        }
        None => {
            warn!("Could not determine config directory, using built-in defaults");
            Ok(TomlConfig::default())
        }
    }
}

/// Read and parse one TOML config file
pub fn read_config_file(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Resolve the database path: CLI → ENV → TOML → compiled default
pub fn resolve_database_path(cli_arg: Option<&Path>, toml_config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(ENV_DATABASE) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &toml_config.database_path {
        return path.clone();
    }

    CompiledDefaults::for_current_platform().database_path
}

/// Resolve the home roster identifier: CLI → ENV → TOML
///
/// Returns `None` when no roster is configured, which disables
/// "future player" notices.
pub fn resolve_home_roster_id(cli_arg: Option<&str>, toml_config: &TomlConfig) -> Option<String> {
    if let Some(id) = cli_arg.filter(|id| is_valid_value(id)) {
        return Some(id.trim().to_string());
    }

    if let Ok(id) = std::env::var(ENV_HOME_ROSTER) {
        if is_valid_value(&id) {
            return Some(id.trim().to_string());
        }
    }

    toml_config
        .home_roster_id
        .as_deref()
        .filter(|id| is_valid_value(id))
        .map(|id| id.trim().to_string())
}

/// Resolve the directory access token: ENV → TOML
pub fn resolve_access_token(directory: &DirectoryConfig) -> Result<String> {
    let env_token = std::env::var(ENV_ACCESS_TOKEN).ok();
    let toml_token = directory.access_token.as_ref();

    if let (Some(env), Some(_)) = (&env_token, toml_token) {
        if is_valid_value(env) {
            warn!("Access token found in environment and TOML. Using environment.");
        }
    }

    if let Some(token) = env_token.filter(|t| is_valid_value(t)) {
        info!("Directory access token loaded from environment variable");
        return Ok(token.trim().to_string());
    }

    if let Some(token) = toml_token.filter(|t| is_valid_value(t)) {
        info!("Directory access token loaded from TOML config");
        return Ok(token.trim().to_string());
    }

    Err(Error::Config(format!(
        "Directory access token not configured. Set {ENV_ACCESS_TOKEN} or \
         [directory].access_token in the config file"
    )))
}

/// Non-empty, non-whitespace value check
pub fn is_valid_value(value: &str) -> bool {
    !value.trim().is_empty()
}
