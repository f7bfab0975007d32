use crate::database::COMMON_DATABASE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level tcell configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TcellConfig {
    pub database: DatabaseConfig,
    pub identity: IdentityConfig,
    pub touchpad: TouchpadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Directory holding the `*-bug.json` files. Current directory when unset.
    pub dir: Option<PathBuf>,
    /// File name of the distro/kernel independent database.
    pub common: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dir: None,
            common: COMMON_DATABASE.to_string(),
        }
    }
}

/// Pin the identity instead of detecting it, e.g. to check another release.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub distro: Option<String>,
    pub kernel: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TouchpadConfig {
    /// Run the xinput touchpad check on laptops.
    pub enabled: bool,
    /// X display to query. Falls back to `$DISPLAY`, then `:0`.
    pub display: Option<String>,
}

impl Default for TouchpadConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            display: None,
        }
    }
}

impl TcellConfig {
    /// Database directory: explicit override, then config, then the working directory.
    pub fn database_dir(&self, override_dir: Option<&Path>) -> PathBuf {
        override_dir
            .map(Path::to_path_buf)
            .or_else(|| self.database.dir.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// X display for the touchpad check.
    pub fn display(&self) -> String {
        self.touchpad
            .display
            .clone()
            .or_else(|| std::env::var("DISPLAY").ok().filter(|d| !d.is_empty()))
            .unwrap_or_else(|| ":0".to_string())
    }
}

const SYSTEM_CONFIG: &str = "/etc/tcell/config.toml";

/// Load the system config file if it exists.
fn load_system() -> Option<toml::Value> {
    let content = std::fs::read_to_string(SYSTEM_CONFIG).ok()?;
    toml::from_str(&content).ok()
}

/// Load the user config file (~/.config/tcell/config.toml) if it exists.
fn load_user() -> Option<toml::Value> {
    let dir = dirs::config_dir()?;
    let path = dir.join("tcell").join("config.toml");
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Recursively merge two TOML values. Tables are merged key-by-key;
/// all other types in `overlay` replace `base`.
fn merge_values(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_values(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load config from a specific path, ignoring system/user files.
fn load_from_path(path: &Path) -> TcellConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("failed to parse config at {}: {}", path.display(), e);
            TcellConfig::default()
        }),
        Err(e) => {
            tracing::warn!("failed to read config at {}: {}", path.display(), e);
            TcellConfig::default()
        }
    }
}

/// Load the merged config: system defaults, then user overrides.
/// If `override_path` is provided, use only that file instead.
pub fn load(override_path: Option<&Path>) -> TcellConfig {
    if let Some(path) = override_path {
        return load_from_path(path);
    }

    let merged = match (load_system(), load_user()) {
        (Some(s), Some(u)) => Some(merge_values(s, u)),
        (Some(v), None) | (None, Some(v)) => Some(v),
        (None, None) => None,
    };

    match merged {
        Some(value) => value.try_into().unwrap_or_else(|e| {
            tracing::warn!("failed to deserialize config: {}", e);
            TcellConfig::default()
        }),
        None => TcellConfig::default(),
    }
}
