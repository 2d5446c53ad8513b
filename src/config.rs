use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::memory::PathScheme;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MnemonicConfig {
    pub core: CoreConfig,
    pub maintenance: MaintenanceConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CoreConfig {
    /// Path layout scheme for newly computed locations: `legacy` or `v2`.
    /// Reads always cover both layouts.
    pub scheme: String,
    pub log_level: String,
    /// Replaces the `~/mnemonic` store base when set. `MNEMONIC_ROOT`
    /// overrides the file value.
    pub root: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MaintenanceConfig {
    /// Half-life capture tooling should assign to new records; surfaced by
    /// `doctor`. Existing records always use their own `temporal.decay`.
    pub default_half_life: String,
    /// Report orphaned memories during `check`.
    pub report_orphans: bool,
}

impl Default for MnemonicConfig {
    fn default() -> Self {
        Self {
            core: CoreConfig::default(),
            maintenance: MaintenanceConfig::default(),
        }
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            scheme: "v2".into(),
            log_level: "info".into(),
            root: None,
        }
    }
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            default_half_life: "P30D".into(),
            report_orphans: true,
        }
    }
}

/// Returns `~/mnemonic/`, the home-rooted memory store.
pub fn default_mnemonic_dir() -> PathBuf {
    dirs::home_dir()
        .expect("home directory must exist")
        .join("mnemonic")
}

/// Returns the default config file path: `~/mnemonic/config.toml`
pub fn default_config_path() -> PathBuf {
    default_mnemonic_dir().join("config.toml")
}

impl MnemonicConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            MnemonicConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (MNEMONIC_ROOT, MNEMONIC_SCHEME,
    /// MNEMONIC_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("MNEMONIC_ROOT") {
            self.core.root = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("MNEMONIC_SCHEME") {
            self.core.scheme = val;
        }
        if let Ok(val) = std::env::var("MNEMONIC_LOG_LEVEL") {
            self.core.log_level = val;
        }
    }

    /// Parsed path scheme, falling back to v2 on an unrecognized value.
    pub fn scheme(&self) -> PathScheme {
        self.core.scheme.parse().unwrap_or(PathScheme::V2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = MnemonicConfig::default();
        assert_eq!(config.core.scheme, "v2");
        assert_eq!(config.core.log_level, "info");
        assert_eq!(config.scheme(), PathScheme::V2);
        assert!(config.maintenance.report_orphans);
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[core]
scheme = "legacy"
log_level = "debug"

[maintenance]
default_half_life = "P7D"
"#;
        let config: MnemonicConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.scheme(), PathScheme::Legacy);
        assert_eq!(config.core.log_level, "debug");
        assert_eq!(config.maintenance.default_half_life, "P7D");
        // defaults still apply for unset fields
        assert!(config.maintenance.report_orphans);
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = MnemonicConfig::default();
        std::env::set_var("MNEMONIC_ROOT", "/srv/memories");
        std::env::set_var("MNEMONIC_SCHEME", "legacy");
        std::env::set_var("MNEMONIC_LOG_LEVEL", "trace");

        config.apply_env_overrides();

        assert_eq!(config.core.root.as_deref(), Some(Path::new("/srv/memories")));
        assert_eq!(config.scheme(), PathScheme::Legacy);
        assert_eq!(config.core.log_level, "trace");

        // Clean up
        std::env::remove_var("MNEMONIC_ROOT");
        std::env::remove_var("MNEMONIC_SCHEME");
        std::env::remove_var("MNEMONIC_LOG_LEVEL");
    }

    #[test]
    fn unknown_scheme_falls_back_to_v2() {
        let mut config = MnemonicConfig::default();
        config.core.scheme = "v3".into();
        assert_eq!(config.scheme(), PathScheme::V2);
    }
}
