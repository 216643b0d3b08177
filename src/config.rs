//! Dialect settings
//!
//! Names the appliance predefines (and which therefore never appear as
//! entities in a configuration dump), resolution options, and serializer
//! layout. Loaded from a JSON file; every field has a default.

use crate::core::error::{Error, Result};
use crate::utils::get_config_dir;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up in the user configuration directory
pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialectConfig {
    /// Address names that resolve without an entity (e.g. `all`)
    #[serde(default = "default_implicit_addresses")]
    pub implicit_addresses: Vec<String>,
    /// Service names that resolve without an entity (e.g. `ALL`)
    #[serde(default = "default_implicit_services")]
    pub implicit_services: Vec<String>,
    /// Allow policy destination addresses to name a virtual IP
    #[serde(default)]
    pub vip_destinations: bool,
    /// Members per `set`/`append` line when emitting group member lists
    #[serde(default = "default_member_chunk_size")]
    pub member_chunk_size: usize,
}

impl Default for DialectConfig {
    fn default() -> Self {
        Self {
            implicit_addresses: default_implicit_addresses(),
            implicit_services: default_implicit_services(),
            vip_destinations: false,
            member_chunk_size: default_member_chunk_size(),
        }
    }
}

impl DialectConfig {
    pub fn is_implicit_address(&self, name: &str) -> bool {
        self.implicit_addresses.iter().any(|n| n == name)
    }

    pub fn is_implicit_service(&self, name: &str) -> bool {
        self.implicit_services.iter().any(|n| n == name)
    }
}

fn default_implicit_addresses() -> Vec<String> {
    ["all", "none"].map(String::from).to_vec()
}

fn default_implicit_services() -> Vec<String> {
    ["ALL", "ALL_TCP", "ALL_UDP", "ALL_ICMP", "ALL_ICMP6"]
        .map(String::from)
        .to_vec()
}

fn default_member_chunk_size() -> usize {
    32
}

/// Default location of the settings file, if a config directory exists.
pub fn default_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Loads dialect settings.
///
/// An explicit `path` must exist. Without one, the user configuration
/// directory is consulted and defaults are used when no file is there.
///
/// # Errors
///
/// Returns `Err` if:
/// - The file cannot be read
/// - The file is not valid settings JSON
/// - `member_chunk_size` is zero
pub fn load_config(path: Option<&Path>) -> Result<DialectConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match default_config_path().filter(|p| p.is_file()) {
            Some(path) => path,
            None => {
                debug!("No settings file found, using defaults");
                return Ok(DialectConfig::default());
            }
        },
    };

    debug!("Loading settings from {}", path.display());
    let json = std::fs::read_to_string(&path)?;
    let config: DialectConfig = serde_json::from_str(&json)
        .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;

    if config.member_chunk_size == 0 {
        return Err(Error::Config(format!(
            "{}: member_chunk_size must be at least 1",
            path.display()
        )));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn settings_file(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = DialectConfig::default();
        assert!(config.is_implicit_address("all"));
        assert!(!config.is_implicit_address("ALL"));
        assert!(config.is_implicit_service("ALL_TCP"));
        assert!(!config.vip_destinations);
        assert_eq!(config.member_chunk_size, 32);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let file = settings_file(r#"{ "vip_destinations": true, "implicit_services": ["ALL", "webproxy"] }"#);
        let config = load_config(Some(file.path())).unwrap();
        assert!(config.vip_destinations);
        assert!(config.is_implicit_service("webproxy"));
        assert!(!config.is_implicit_service("ALL_TCP"));
        assert_eq!(config.implicit_addresses, default_implicit_addresses());
    }

    #[test]
    fn test_invalid_file_is_error() {
        let file = settings_file("{ not json");
        assert!(matches!(load_config(Some(file.path())), Err(Error::Config(_))));

        let file = settings_file(r#"{ "member_chunk_size": 0 }"#);
        assert!(matches!(load_config(Some(file.path())), Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        assert!(matches!(load_config(Some(&missing)), Err(Error::Io(_))));
    }

    #[test]
    fn test_serde_round_trip() {
        let config = DialectConfig {
            member_chunk_size: 8,
            ..DialectConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: DialectConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
