//! Configuration loading and config file resolution
//!
//! The access template (`excludedProfiles`, `classAccess`, `objectAccess`) keeps the
//! camelCase keys of the JSON files administrators already maintain. TOML files with
//! the same keys are accepted as well; the format is picked by file extension.

use crate::{Error, Result};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable naming the configuration file
pub const CONFIG_ENV_VAR: &str = "SFPA_CONFIG";

pub const DEFAULT_API_VERSION: &str = "50.0";
pub const DEFAULT_METADATA_TYPE: &str = "Profile";
pub const DEFAULT_MAX_CONCURRENT_UPDATES: usize = 4;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Opaque object permission entry, passed through to the remote service verbatim
pub type ObjectPermission = Map<String, Value>;

/// Complete configuration file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncConfig {
    /// Profile names that are never updated
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub excluded_profiles: Vec<String>,

    /// Apex class names granted to every non-excluded profile
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub class_access: Vec<String>,

    /// Object permissions copied into every submitted profile
    #[serde(default, deserialize_with = "object_permission_list")]
    pub object_access: Vec<ObjectPermission>,

    /// Remote call settings
    #[serde(default)]
    pub sync: SyncSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote call settings
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncSettings {
    /// Login endpoint, used when neither CLI nor environment provide one
    pub login_url: Option<String>,
    /// Metadata API version sent with list calls and used for login
    pub api_version: String,
    /// Metadata type listed and updated
    pub metadata_type: String,
    /// Upper bound on simultaneous update calls
    pub max_concurrent_updates: usize,
    /// Per-call timeout for remote operations
    pub request_timeout_secs: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            login_url: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            metadata_type: DEFAULT_METADATA_TYPE.to_string(),
            max_concurrent_updates: DEFAULT_MAX_CONCURRENT_UPDATES,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl SyncSettings {
    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.api_version.trim().is_empty() {
            return Err(Error::InvalidInput("sync.apiVersion must not be empty".to_string()));
        }
        if self.metadata_type.trim().is_empty() {
            return Err(Error::InvalidInput("sync.metadataType must not be empty".to_string()));
        }
        if self.max_concurrent_updates == 0 {
            return Err(Error::InvalidInput(
                "sync.maxConcurrentUpdates must be at least 1".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::InvalidInput(
                "sync.requestTimeoutSecs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Load and validate a configuration file
///
/// `.json` files are parsed as JSON, everything else as TOML. A file that cannot be read
/// is an [`Error::Io`]; callers add the path as context.
pub fn load_config(path: &Path) -> Result<SyncConfig> {
    let content = std::fs::read_to_string(path)?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let config: SyncConfig = if is_json {
        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse JSON {} failed: {}", path.display(), e)))?
    } else {
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse TOML {} failed: {}", path.display(), e)))?
    };

    config.sync.validate()?;

    info!(
        path = %path.display(),
        excluded_profiles = config.excluded_profiles.len(),
        class_access = config.class_access.len(),
        object_access = config.object_access.len(),
        "Configuration loaded"
    );

    Ok(config)
}

/// Configuration file resolution following priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable (`SFPA_CONFIG`)
/// 3. `config.json` or `config.toml` in the working directory
/// 4. `<user config dir>/sfpa/config.toml`
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Result<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Ok(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    // Priority 3: Working directory
    for name in ["config.json", "config.toml"] {
        let candidate = PathBuf::from(name);
        if candidate.exists() {
            return Ok(candidate);
        }
    }

    // Priority 4: User config directory
    if let Some(path) = user_config_path() {
        if path.exists() {
            return Ok(path);
        }
    }

    Err(Error::Config(format!(
        "No configuration file found. Provide one using:\n\
         1. Command line: --config <path>\n\
         2. Environment: {}=<path>\n\
         3. ./config.json or ./config.toml\n\
         4. {}",
        CONFIG_ENV_VAR,
        user_config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "~/.config/sfpa/config.toml".to_string())
    )))
}

/// Platform config directory location of the configuration file
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("sfpa").join("config.toml"))
}

/// Sequence of strings; anything that is not a sequence degrades to empty
fn lenient_string_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => {
            warn!(value = %other, "Expected a list, treating as empty");
            return Ok(Vec::new());
        }
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            other => {
                warn!(value = %other, "Ignoring non-string list entry");
                None
            }
        })
        .collect())
}

/// Sequence of objects; a non-sequence degrades to empty, a non-object entry is an error
fn object_permission_list<'de, D>(
    deserializer: D,
) -> std::result::Result<Vec<ObjectPermission>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => {
            warn!(value = %other, "objectAccess is not a list, treating as empty");
            return Ok(Vec::new());
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(map),
            other => Err(D::Error::custom(format!(
                "objectAccess[{}] must be an object, got {}",
                index, other
            ))),
        })
        .collect()
}
