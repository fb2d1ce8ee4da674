//! `warehouse.toml`: where the catalog lives and which authority it answers to

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::contract::{CONTENT_AUTHORITY, DATABASE_NAME};

pub const CONFIG_FILE: &str = "warehouse.toml";

/// Every key is optional; a missing key falls back to its default
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct WarehouseConfig {
    pub database: Option<String>,
    pub authority: Option<String>,
}

impl WarehouseConfig {
    /// Config with every key filled in with its default
    pub fn with_defaults() -> Self {
        Self {
            database: Some(default_database_path().to_string_lossy().into_owned()),
            authority: Some(CONTENT_AUTHORITY.to_string()),
        }
    }

    /// Read the config at `path`. A missing file is `None`, not an error.
    pub fn load(path: &Path) -> anyhow::Result<Option<Self>> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
        };
        let config: Self =
            toml::from_str(&contents).with_context(|| format!("parsing {}", path.display()))?;
        config.check_authority()?;
        Ok(Some(config))
    }

    /// Write the config to `path`; an existing file is kept unless `force`
    pub fn save(&self, path: &Path, force: bool) -> anyhow::Result<()> {
        if path.exists() && !force {
            anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
        }
        self.check_authority()?;
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
    }

    pub fn database_path(&self) -> PathBuf {
        self.database
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path)
    }

    pub fn authority(&self) -> &str {
        self.authority.as_deref().unwrap_or(CONTENT_AUTHORITY)
    }

    /// The authority becomes the host part of every item identifier
    fn check_authority(&self) -> anyhow::Result<()> {
        let authority = self.authority();
        if authority.is_empty() || authority.contains(['/', ':']) {
            anyhow::bail!("authority {:?} cannot be used in an item URI", authority);
        }
        Ok(())
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from(CONFIG_FILE)
}

pub fn default_database_path() -> PathBuf {
    PathBuf::from(".warehouse").join(DATABASE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_keys_missing() {
        let config: WarehouseConfig = toml::from_str("").unwrap();
        assert_eq!(config.authority(), CONTENT_AUTHORITY);
        assert_eq!(config.database_path(), PathBuf::from(".warehouse/warehouse.db"));
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(WarehouseConfig::load(&dir.path().join("nope.toml")).unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let config = WarehouseConfig {
            database: Some("stock.db".into()),
            authority: Some("shop".into()),
        };

        config.save(&path, false).unwrap();
        assert!(config.save(&path, false).is_err());
        WarehouseConfig::with_defaults().save(&path, true).unwrap();

        let loaded = WarehouseConfig::load(&path).unwrap().unwrap();
        assert_eq!(loaded, WarehouseConfig::with_defaults());
    }

    #[test]
    fn test_unusable_authority_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "authority = \"shop/items\"\n").unwrap();
        assert!(WarehouseConfig::load(&path).is_err());

        let empty = WarehouseConfig { authority: Some(String::new()), ..Default::default() };
        assert!(empty.save(&path, true).is_err());
    }

    #[test]
    fn test_malformed_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "database = [").unwrap();
        let err = WarehouseConfig::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains(CONFIG_FILE));
    }
}
