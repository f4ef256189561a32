//! Policy schema types

use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

/// Effective notification policy, loaded once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyConfig {
    /// Notification types eligible for display
    pub show_types: BTreeSet<String>,
    /// Timeout for types without an entry in `type_timeouts` (0 = no auto-dismiss)
    pub default_timeout: u64,
    /// Per-type timeouts in seconds
    pub type_timeouts: BTreeMap<String, u64>,
    pub enable_sound: bool,
    /// Suppress notifications that carry no URL
    pub require_url: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        let show_types = ["task_complete", "needs_input", "error", "warning"]
            .into_iter()
            .map(String::from)
            .collect();

        let type_timeouts = [
            ("info", 10),
            ("success", 15),
            ("error", 0),
            ("warning", 0),
            ("needs_input", 0),
            ("task_complete", 0),
            ("task_start", 5),
        ]
        .into_iter()
        .map(|(kind, secs)| (kind.to_string(), secs))
        .collect();

        Self {
            show_types,
            default_timeout: 0,
            type_timeouts,
            enable_sound: false,
            require_url: false,
        }
    }
}

impl PolicyConfig {
    /// Apply a user override document on top of this policy
    ///
    /// Keys present in `overrides` replace ours; `type_timeouts` is merged
    /// entry by entry so unmentioned types keep their timeout.
    pub fn merge(mut self, overrides: PolicyOverrides) -> Self {
        if let Some(show_types) = overrides.show_types {
            self.show_types = show_types.into_iter().collect();
        }

        if let Some(default_timeout) = overrides.default_timeout {
            self.default_timeout = default_timeout;
        }

        if let Some(type_timeouts) = overrides.type_timeouts {
            for (kind, secs) in type_timeouts {
                self.type_timeouts.insert(kind, secs);
            }
        }

        if let Some(enable_sound) = overrides.enable_sound {
            self.enable_sound = enable_sound;
        }

        if let Some(require_url) = overrides.require_url {
            self.require_url = require_url;
        }

        self
    }

    /// Human-readable form of a timeout for the startup banner
    pub fn describe_timeout(secs: u64) -> String {
        if secs == 0 {
            "permanent".to_string()
        } else {
            format!("{}s", secs)
        }
    }
}

/// User policy document; every key is optional and unknown keys are ignored
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolicyOverrides {
    #[serde(default)]
    pub show_types: Option<Vec<String>>,
    #[serde(default)]
    pub default_timeout: Option<u64>,
    #[serde(default)]
    pub type_timeouts: Option<BTreeMap<String, u64>>,
    #[serde(default)]
    pub enable_sound: Option<bool>,
    #[serde(default)]
    pub require_url: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = PolicyConfig::default();

        assert_eq!(policy.show_types.len(), 4);
        assert!(policy.show_types.contains("task_complete"));
        assert!(policy.show_types.contains("needs_input"));
        assert!(policy.show_types.contains("error"));
        assert!(policy.show_types.contains("warning"));
        assert!(!policy.show_types.contains("info"));

        assert_eq!(policy.default_timeout, 0);
        assert_eq!(policy.type_timeouts.get("info"), Some(&10));
        assert_eq!(policy.type_timeouts.get("success"), Some(&15));
        assert_eq!(policy.type_timeouts.get("task_start"), Some(&5));
        assert_eq!(policy.type_timeouts.get("error"), Some(&0));
        assert!(!policy.enable_sound);
        assert!(!policy.require_url);
    }

    #[test]
    fn test_merge_single_key_keeps_the_rest() {
        let overrides = PolicyOverrides {
            enable_sound: Some(true),
            ..Default::default()
        };

        let merged = PolicyConfig::default().merge(overrides);

        let expected = PolicyConfig {
            enable_sound: true,
            ..PolicyConfig::default()
        };
        assert_eq!(merged, expected);
    }

    #[test]
    fn test_merge_type_timeouts_keywise() {
        let overrides = PolicyOverrides {
            type_timeouts: Some(BTreeMap::from([
                ("info".to_string(), 3),
                ("deploy".to_string(), 20),
            ])),
            ..Default::default()
        };

        let merged = PolicyConfig::default().merge(overrides);

        assert_eq!(merged.type_timeouts.get("info"), Some(&3));
        assert_eq!(merged.type_timeouts.get("deploy"), Some(&20));
        // Untouched entries survive
        assert_eq!(merged.type_timeouts.get("success"), Some(&15));
        assert_eq!(merged.type_timeouts.get("task_start"), Some(&5));
        assert_eq!(merged.type_timeouts.len(), 8);
    }

    #[test]
    fn test_merge_show_types_replaces() {
        let overrides = PolicyOverrides {
            show_types: Some(vec!["info".to_string()]),
            ..Default::default()
        };

        let merged = PolicyConfig::default().merge(overrides);

        assert_eq!(merged.show_types.len(), 1);
        assert!(merged.show_types.contains("info"));
    }

    #[test]
    fn test_parse_overrides_ignores_unknown_keys() {
        let toml_str = r#"
enable_sound = true
require_url = true
favourite_colour = "teal"

[type_timeouts]
info = 1
"#;

        let overrides: PolicyOverrides = toml::from_str(toml_str).unwrap();
        assert_eq!(overrides.enable_sound, Some(true));
        assert_eq!(overrides.require_url, Some(true));
        assert!(overrides.show_types.is_none());
        assert!(overrides.default_timeout.is_none());
        assert_eq!(overrides.type_timeouts.unwrap().get("info"), Some(&1));
    }

    #[test]
    fn test_describe_timeout() {
        assert_eq!(PolicyConfig::describe_timeout(0), "permanent");
        assert_eq!(PolicyConfig::describe_timeout(15), "15s");
    }
}
