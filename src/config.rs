use crate::error::{MjcError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The base config directory name under ~/.config/
const CONFIG_DIR_NAME: &str = "mjc";

/// The filename for the configuration file.
const CONFIG_FILENAME: &str = "config.toml";

/// Subdirectory names within the config directory
const DIAGRAMS_SUBDIR: &str = "diagrams";
const LOGS_SUBDIR: &str = "logs";

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:4567";
const DEFAULT_SESSION_EXPIRY_REDIRECT_MS: u64 = 2000;
const DEFAULT_LOGIN_REDIRECT_MS: u64 = 1000;
const DEFAULT_RENDERER: &str = "dot";

// ============================================================================
// Client Configuration
// ============================================================================

/// Settings for talking to the compiler service and presenting its output.
///
/// Missing fields in a config file fall back to their defaults, so a partial
/// file such as `server_url = "http://10.0.0.5:4567"` is valid.
///
/// # Example
///
/// ```toml
/// server_url = "http://127.0.0.1:4567"
/// session_expiry_redirect_ms = 2000
/// login_redirect_ms = 1000
/// renderer = "dot"
/// save_diagrams = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the compiler service, without a trailing path.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Delay before returning to the login screen after a 401.
    #[serde(default = "default_session_expiry_redirect_ms")]
    pub session_expiry_redirect_ms: u64,

    /// Delay before entering the workspace after a successful login.
    #[serde(default = "default_login_redirect_ms")]
    pub login_redirect_ms: u64,

    /// Graphviz executable used to turn DOT source into SVG.
    #[serde(default = "default_renderer")]
    pub renderer: String,

    /// Whether rendered SVGs are written under `~/.config/mjc/diagrams/`.
    #[serde(default = "default_true")]
    pub save_diagrams: bool,
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_session_expiry_redirect_ms() -> u64 {
    DEFAULT_SESSION_EXPIRY_REDIRECT_MS
}

fn default_login_redirect_ms() -> u64 {
    DEFAULT_LOGIN_REDIRECT_MS
}

fn default_renderer() -> String {
    DEFAULT_RENDERER.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            session_expiry_redirect_ms: DEFAULT_SESSION_EXPIRY_REDIRECT_MS,
            login_redirect_ms: DEFAULT_LOGIN_REDIRECT_MS,
            renderer: default_renderer(),
            save_diagrams: true,
        }
    }
}

impl Config {
    pub fn session_expiry_redirect(&self) -> Duration {
        Duration::from_millis(self.session_expiry_redirect_ms)
    }

    pub fn login_redirect(&self) -> Duration {
        Duration::from_millis(self.login_redirect_ms)
    }

    /// Server URL with any trailing slashes removed.
    pub fn base_url(&self) -> &str {
        self.server_url.trim_end_matches('/')
    }
}

// ============================================================================
// Config Validation
// ============================================================================

/// Error type for configuration validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("server_url must start with http:// or https:// (got `{0}`)")]
    InvalidServerUrl(String),

    #[error("renderer must name an executable, e.g. `dot`")]
    EmptyRenderer,
}

/// Validate a configuration for logical consistency.
///
/// # Example
///
/// ```
/// use mjc::config::{Config, validate_config};
///
/// assert!(validate_config(&Config::default()).is_ok());
///
/// let bad = Config {
///     server_url: "127.0.0.1:4567".to_string(),
///     ..Default::default()
/// };
/// assert!(validate_config(&bad).is_err());
/// ```
pub fn validate_config(config: &Config) -> std::result::Result<(), ConfigError> {
    let url = config.server_url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::InvalidServerUrl(config.server_url.clone()));
    }
    if config.renderer.trim().is_empty() {
        return Err(ConfigError::EmptyRenderer);
    }
    Ok(())
}

// ============================================================================
// Config File Management
// ============================================================================

/// Get the path to the config file (`~/.config/mjc/config.toml`).
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILENAME))
}

/// Load the configuration from `~/.config/mjc/config.toml`.
///
/// If the file doesn't exist, one is created with default values and
/// comments explaining each option.
pub fn load_config() -> Result<Config> {
    load_config_at(&config_dir()?)
}

fn load_config_at(dir: &Path) -> Result<Config> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        fs::create_dir_all(dir)?;
        let config = Config::default();
        fs::write(&config_path, generate_config_with_comments(&config))?;
        return Ok(config);
    }

    let content = fs::read_to_string(&config_path)?;
    let config: Config = toml::from_str(&content).map_err(|e| {
        MjcError::Config(format!(
            "Failed to parse config file at {:?}: {}",
            config_path, e
        ))
    })?;

    validate_config(&config).map_err(|e| {
        MjcError::Config(format!("Invalid config file at {:?}: {}", config_path, e))
    })?;

    Ok(config)
}

/// Save the configuration, rewriting the file with explanatory comments.
pub fn save_config(config: &Config) -> Result<()> {
    save_config_at(&config_dir()?, config)
}

fn save_config_at(dir: &Path, config: &Config) -> Result<()> {
    fs::create_dir_all(dir)?;
    fs::write(
        dir.join(CONFIG_FILENAME),
        generate_config_with_comments(config),
    )?;
    Ok(())
}

/// Keys accepted by `mjc config set`.
pub const VALID_KEYS: &[&str] = &[
    "server_url",
    "session_expiry_redirect_ms",
    "login_redirect_ms",
    "renderer",
    "save_diagrams",
];

/// Apply a single `key = value` update, parsing the value for the key's type.
pub fn set_config_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let parse_ms = |v: &str| {
        v.parse::<u64>().map_err(|_| {
            MjcError::Config(format!(
                "Invalid value for `{}`: expected milliseconds, got `{}`",
                key, v
            ))
        })
    };

    match key {
        "server_url" => config.server_url = value.to_string(),
        "session_expiry_redirect_ms" => config.session_expiry_redirect_ms = parse_ms(value)?,
        "login_redirect_ms" => config.login_redirect_ms = parse_ms(value)?,
        "renderer" => config.renderer = value.to_string(),
        "save_diagrams" => {
            config.save_diagrams = match value {
                "true" => true,
                "false" => false,
                other => {
                    return Err(MjcError::Config(format!(
                        "Invalid value for `save_diagrams`: expected true or false, got `{}`",
                        other
                    )))
                }
            }
        }
        other => {
            return Err(MjcError::Config(format!(
                "Unknown config key `{}`. Valid keys: {}",
                other,
                VALID_KEYS.join(", ")
            )))
        }
    }

    validate_config(config).map_err(|e| MjcError::Config(e.to_string()))
}

fn generate_config_with_comments(config: &Config) -> String {
    format!(
        r#"# mjc configuration

# Base URL of the compiler service
server_url = {}

# Milliseconds to wait before returning to the login screen
# after the server reports an expired session (HTTP 401)
session_expiry_redirect_ms = {}

# Milliseconds to wait before opening the workspace after a successful login
login_redirect_ms = {}

# Graphviz executable used to render diagrams to SVG
renderer = {}

# Keep rendered SVG files under ~/.config/mjc/diagrams/
save_diagrams = {}
"#,
        toml_string(&config.server_url),
        config.session_expiry_redirect_ms,
        config.login_redirect_ms,
        toml_string(&config.renderer),
        config.save_diagrams
    )
}

/// Encode `value` as a TOML string literal, escaping backslashes and quotes.
pub fn toml_string(value: &str) -> String {
    toml::Value::String(value.to_string()).to_string()
}

/// Get the mjc config directory path (~/.config/mjc/).
///
/// Does not create the directory.
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| MjcError::Config("Could not determine home directory".to_string()))?;
    Ok(home.join(".config").join(CONFIG_DIR_NAME))
}

/// Directory where rendered diagrams are kept.
pub fn diagrams_dir() -> Result<PathBuf> {
    Ok(config_dir()?.join(DIAGRAMS_SUBDIR))
}

/// Directory holding the TUI log file.
pub fn logs_dir() -> Result<PathBuf> {
    Ok(config_dir()?.join(LOGS_SUBDIR))
}
