// src/core/config.rs
use std::env;
use std::path::PathBuf;
use log::LevelFilter;

use crate::core::store::{DEFAULT_EXPIRATION_DAYS, DEFAULT_RECENT_COUNT, DEFAULT_STORAGE_KEY};

// Configuration for the credential store and its CLI
#[derive(Debug, Clone)]
pub struct Config {
    // Storage
    pub storage_url: String,
    pub storage_key: String,

    // Records
    pub default_expiration_days: u32,
    pub recent_entries: usize,

    // Password Generation
    pub default_password_length: usize,

    // Logging
    pub log_level: LevelFilter,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_url: "file:./data".to_string(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),

            default_expiration_days: DEFAULT_EXPIRATION_DAYS,
            recent_entries: DEFAULT_RECENT_COUNT,

            default_password_length: 16,

            log_level: LevelFilter::Info,
            log_file: None,
        }
    }
}

impl Config {
    // Load configuration from environment variables
    pub fn load() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source, starting from defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_sources(lookup, platform_storage_url)
    }

    fn from_sources<F, D>(lookup: F, default_storage: D) -> Self
    where
        F: Fn(&str) -> Option<String>,
        D: FnOnce() -> Option<String>,
    {
        let mut config = Config::default();

        // Storage: the platform data dir is only consulted without an override
        match lookup("CREDVAULT_STORAGE").filter(|url| !url.trim().is_empty()) {
            Some(url) => config.storage_url = url,
            None => {
                if let Some(url) = default_storage() {
                    config.storage_url = url;
                }
            }
        }

        if let Some(key) = lookup("CREDVAULT_STORAGE_KEY") {
            if !key.trim().is_empty() {
                config.storage_key = key;
            }
        }

        // Records
        if let Some(val) = lookup("DEFAULT_EXPIRATION_DAYS") {
            match val.parse::<u32>() {
                Ok(days) if days > 0 => config.default_expiration_days = days,
                _ => log::warn!("Ignoring invalid DEFAULT_EXPIRATION_DAYS '{}'", val),
            }
        }

        if let Some(val) = lookup("RECENT_ENTRIES") {
            match val.parse() {
                Ok(count) => config.recent_entries = count,
                Err(_) => log::warn!("Ignoring invalid RECENT_ENTRIES '{}'", val),
            }
        }

        // Password Generation
        if let Some(val) = lookup("DEFAULT_PASSWORD_LENGTH") {
            match val.parse::<usize>() {
                Ok(length) if length > 0 => config.default_password_length = length,
                _ => log::warn!("Ignoring invalid DEFAULT_PASSWORD_LENGTH '{}'", val),
            }
        }

        // Logging
        if let Some(level) = lookup("LOG_LEVEL") {
            match level.to_lowercase().as_str() {
                "off" => config.log_level = LevelFilter::Off,
                "error" => config.log_level = LevelFilter::Error,
                "warn" => config.log_level = LevelFilter::Warn,
                "info" => config.log_level = LevelFilter::Info,
                "debug" => config.log_level = LevelFilter::Debug,
                "trace" => config.log_level = LevelFilter::Trace,
                _ => log::warn!("Unknown log level '{}', using {}", level, config.log_level),
            }
        }

        if let Some(file) = lookup("LOG_FILE") {
            if !file.trim().is_empty() {
                config.log_file = Some(PathBuf::from(file));
            }
        }

        config
    }
}

/// `file:` URL under the per-user data directory, if the platform defines one.
///
/// Nothing is created here; the file backend creates the directory when opened.
fn platform_storage_url() -> Option<String> {
    match directories::ProjectDirs::from("com", "credvault", "credvault") {
        Some(dirs) => Some(format!("file:{}", dirs.data_dir().display())),
        None => {
            log::warn!("Could not determine a data directory, using ./data");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_without_variables() {
        let config = from_pairs(&[]);
        assert_eq!(config.storage_key, "securePasswordManagerData");
        assert_eq!(config.default_expiration_days, 90);
        assert_eq!(config.recent_entries, 5);
        assert_eq!(config.default_password_length, 16);
        assert_eq!(config.log_level, LevelFilter::Info);
        assert!(config.storage_url.starts_with("file:"));
    }

    #[test]
    fn variables_override_defaults() {
        let config = from_pairs(&[
            ("CREDVAULT_STORAGE", "memory:"),
            ("CREDVAULT_STORAGE_KEY", "vault"),
            ("DEFAULT_EXPIRATION_DAYS", "30"),
            ("DEFAULT_PASSWORD_LENGTH", "24"),
            ("LOG_LEVEL", "DEBUG"),
            ("LOG_FILE", "/tmp/credvault.log"),
        ]);
        assert_eq!(config.storage_url, "memory:");
        assert_eq!(config.storage_key, "vault");
        assert_eq!(config.default_expiration_days, 30);
        assert_eq!(config.default_password_length, 24);
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/credvault.log")));
    }

    #[test]
    fn storage_override_skips_platform_lookup() {
        let consulted = std::cell::Cell::new(false);
        let config = Config::from_sources(
            |name| (name == "CREDVAULT_STORAGE").then(|| "memory:".to_string()),
            || {
                consulted.set(true);
                Some("file:/unused".to_string())
            },
        );
        assert_eq!(config.storage_url, "memory:");
        assert!(!consulted.get());
    }

    #[test]
    fn blank_storage_override_falls_back_to_platform_dir() {
        let config = Config::from_sources(
            |name| (name == "CREDVAULT_STORAGE").then(|| "  ".to_string()),
            || Some("file:/home/me/.local/share/credvault".to_string()),
        );
        assert_eq!(config.storage_url, "file:/home/me/.local/share/credvault");

        let config = Config::from_sources(|_| None, || None);
        assert_eq!(config.storage_url, "file:./data");
    }

    #[test]
    fn invalid_values_are_ignored() {
        let config = from_pairs(&[
            ("DEFAULT_EXPIRATION_DAYS", "0"),
            ("DEFAULT_PASSWORD_LENGTH", "lots"),
            ("LOG_LEVEL", "verbose"),
        ]);
        assert_eq!(config.default_expiration_days, 90);
        assert_eq!(config.default_password_length, 16);
        assert_eq!(config.log_level, LevelFilter::Info);
    }
}
