//! Policy file loading and merging

use super::schema::{PolicyConfig, PolicyOverrides};
use crate::error::{RelayError, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub struct PolicyLoader;

impl PolicyLoader {
    /// Get the default policy file path
    pub fn default_policy_path() -> PathBuf {
        // Priority order:
        // 1. $NOTIFY_RELAY_POLICY
        // 2. $XDG_CONFIG_HOME/notify-relay/policy.toml
        // 3. ~/.config/notify-relay/policy.toml

        if let Ok(path) = env::var("NOTIFY_RELAY_POLICY") {
            return PathBuf::from(path);
        }

        if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("notify-relay/policy.toml");
        }

        if let Ok(home) = env::var("HOME") {
            return PathBuf::from(home).join(".config/notify-relay/policy.toml");
        }

        PathBuf::from("policy.toml")
    }

    /// Load a user override document from a file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<PolicyOverrides> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| RelayError::ConfigLoad {
            path: path.to_path_buf(),
            source,
        })?;

        let overrides: PolicyOverrides = toml::from_str(&contents)?;
        Ok(overrides)
    }

    /// Load the effective policy: built-in defaults merged with the user file
    ///
    /// Never fails. A missing file means defaults; an unreadable or malformed
    /// file means defaults plus a warning naming the path.
    pub fn load(path: Option<PathBuf>) -> PolicyConfig {
        let path = path.unwrap_or_else(Self::default_policy_path);

        if !path.exists() {
            tracing::debug!("Policy file not found at {:?}, using defaults", path);
            return PolicyConfig::default();
        }

        match Self::load_from_file(&path) {
            Ok(overrides) => {
                tracing::debug!("Loaded policy overrides from {:?}", path);
                PolicyConfig::default().merge(overrides)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to load policy from {:?}: {}. Using default configuration",
                    path,
                    e
                );
                PolicyConfig::default()
            }
        }
    }
}
