use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use unitpack_util::errors::PackError;

/// Global user configuration loaded from `~/.unitpack/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub retain: RetainConfig,

    #[serde(default)]
    pub packaging: PackagingConfig,
}

/// How a candidate's classifier takes part in matching it against the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierPolicy {
    /// Match on `group:name:type` only.
    #[default]
    Ignore,
    /// Match on `group:name:type:classifier`.
    Match,
}

/// Candidate reconciliation settings from `[retain]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetainConfig {
    #[serde(default)]
    pub classifier: ClassifierPolicy,
}

/// Packaging settings from `[packaging]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackagingConfig {
    #[serde(default = "default_assume_jar", rename = "assume-jar-when-unknown")]
    pub assume_jar_when_unknown: bool,
    #[serde(default = "default_lib_dir", rename = "lib-dir")]
    pub lib_dir: String,
}

impl Default for PackagingConfig {
    fn default() -> Self {
        Self {
            assume_jar_when_unknown: default_assume_jar(),
            lib_dir: default_lib_dir(),
        }
    }
}

fn default_assume_jar() -> bool {
    true
}

fn default_lib_dir() -> String {
    "lib".to_string()
}

impl GlobalConfig {
    /// Load the global configuration from `~/.unitpack/config.toml`, or return defaults if the file doesn't exist.
    pub fn load() -> miette::Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load configuration from an explicit path, or return defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> miette::Result<Self> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| PackError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        toml::from_str(&content).map_err(|e| {
            PackError::Config {
                message: format!("Failed to parse {}: {e}", path.display()),
            }
            .into()
        })
    }

    /// Returns the default path to the global config file.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }
}

/// Returns the path to the unitpack data directory (`~/.unitpack/`).
pub fn dirs_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join(".unitpack")
}
