//! XDG Base Directory Support
//!
//! Resolves where bindery looks for its configuration file and copies
//! a legacy `./bindery.toml` into the XDG location once.

use std::env;
use std::fs;
use std::path::PathBuf;

/// Legacy config file, looked up in the working directory
pub const LEGACY_CONFIG_FILE: &str = "bindery.toml";

/// XDG directory structure for bindery
#[derive(Debug, Clone)]
pub struct XdgDirs {
    pub config_dir: PathBuf,
}

impl XdgDirs {
    /// Resolve directories
    ///
    /// Priority order (highest to lowest):
    /// 1. `BINDERY_CONFIG_DIR`
    /// 2. `XDG_CONFIG_HOME`
    /// 3. `~/.config`
    pub fn new() -> Self {
        Self {
            config_dir: Self::resolve_config_dir(),
        }
    }

    fn resolve_config_dir() -> PathBuf {
        if let Ok(dir) = env::var("BINDERY_CONFIG_DIR") {
            return PathBuf::from(dir);
        }

        if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("bindery");
        }

        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("bindery")
    }

    /// Config file path (`BINDERY_CONFIG_FILE` overrides)
    pub fn config_file(&self) -> PathBuf {
        if let Ok(file) = env::var("BINDERY_CONFIG_FILE") {
            return PathBuf::from(file);
        }

        self.config_dir.join("config.toml")
    }

    /// Log the resolved paths
    pub fn log_paths(&self) {
        tracing::debug!("XDG directories resolved:");
        tracing::debug!("  Config: {:?}", self.config_dir);
        tracing::debug!("  Config file: {:?}", self.config_file());
    }
}

impl Default for XdgDirs {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy `./bindery.toml` to the XDG config file if only the legacy one
/// exists. The legacy file is never deleted.
pub fn migrate_legacy_paths(xdg: &XdgDirs) -> std::io::Result<()> {
    let legacy_config = PathBuf::from(LEGACY_CONFIG_FILE);
    let new_config = xdg.config_file();

    if legacy_config.exists() && !new_config.exists() {
        if let Some(parent) = new_config.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&legacy_config, &new_config)?;
        tracing::info!("Migrated config: {:?} → {:?}", legacy_config, new_config);
        tracing::info!(
            "Legacy config file preserved at {:?} (safe to delete after verification)",
            legacy_config
        );
    }

    Ok(())
}
