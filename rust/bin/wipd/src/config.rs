//! Server-side configuration.
//!
//! Loaded from a TOML file, e.g. `/etc/wip/shop.toml`:
//!
//! ```toml
//! [storage]
//! data_dir = "/var/lib/wip/shop"
//!
//! [shift]
//! archive_hour = 20
//! utc_offset = "-05:00"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Default directory for named configs.
const CONFIG_DIR: &str = "/etc/wip";

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub storage: StorageConfig,

    #[serde(default)]
    pub shift: ShiftConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the redb file.
    pub data_dir: String,

    /// Explicit redb path. Defaults to `{data_dir}/wip.redb`.
    #[serde(default)]
    pub db_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShiftConfig {
    /// Local hour (0-23) from which yesterday's notes may be archived.
    #[serde(default = "default_archive_hour")]
    pub archive_hour: u32,

    /// Shop wall-clock offset, `+HH:MM` or `-HH:MM`. Host local time if unset.
    #[serde(default)]
    pub utc_offset: Option<String>,
}

fn default_archive_hour() -> u32 {
    20
}

impl Default for ShiftConfig {
    fn default() -> Self {
        Self {
            archive_hour: default_archive_hour(),
            utc_offset: None,
        }
    }
}

impl ServerConfig {
    /// Resolve a context name or path to a config file path.
    ///
    /// `shop` becomes `/etc/wip/shop.toml`; anything containing `/` or `.`
    /// is taken as a path.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.contains('.') {
            PathBuf::from(name_or_path)
        } else {
            Path::new(CONFIG_DIR).join(format!("{}.toml", name_or_path))
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Storage settings in the form the libraries take.
    pub fn service_config(&self, listen: &str) -> wip_core::ServiceConfig {
        wip_core::ServiceConfig {
            data_dir: Some(PathBuf::from(&self.storage.data_dir)),
            db_path: self.storage.db_path.as_ref().map(PathBuf::from),
            listen: listen.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_path() {
        assert_eq!(ServerConfig::resolve_path("shop"), PathBuf::from("/etc/wip/shop.toml"));
        assert_eq!(ServerConfig::resolve_path("./dev.toml"), PathBuf::from("./dev.toml"));
    }

    #[test]
    fn test_shift_defaults() {
        let config = ServerConfig::parse("[storage]\ndata_dir = \"/data\"\n").unwrap();
        assert_eq!(config.shift.archive_hour, 20);
        assert!(config.shift.utc_offset.is_none());
        assert_eq!(
            config.service_config("0.0.0.0:3001").resolve_db_path(),
            PathBuf::from("/data/wip.redb")
        );
    }

    #[test]
    fn test_full_config() {
        let config = ServerConfig::parse(
            r#"
            [storage]
            data_dir = "/data"
            db_path = "/fast/wip.redb"

            [shift]
            archive_hour = 18
            utc_offset = "-06:00"
            "#,
        )
        .unwrap();
        assert_eq!(config.shift.archive_hour, 18);
        assert_eq!(config.shift.utc_offset.as_deref(), Some("-06:00"));
        assert_eq!(
            config.service_config("x").resolve_db_path(),
            PathBuf::from("/fast/wip.redb")
        );
    }

    #[test]
    fn test_missing_storage_is_error() {
        assert!(ServerConfig::parse("[shift]\narchive_hour = 20\n").is_err());
    }
}
