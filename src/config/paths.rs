//! XDG path resolution for mender configuration and cache directories.

use anyhow::Result;
use std::path::PathBuf;

use super::types::Config;

impl Config {
    /// Returns the platform-specific configuration directory for mender.
    ///
    /// Returns `~/.config/mender/` on Linux (`XDG_CONFIG_HOME/mender`).
    pub fn config_dir() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join(crate::constants::APP_NAME);
        Ok(dir)
    }

    /// Returns the platform-specific cache directory for mender.
    ///
    /// Returns `~/.cache/mender/` on Linux (`XDG_CACHE_HOME/mender`).
    /// Used for storing readline history.
    pub fn cache_dir() -> Result<PathBuf> {
        let dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine cache directory"))?
            .join(crate::constants::APP_NAME);
        Ok(dir)
    }

    /// Returns the full path to the mender configuration file.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(crate::constants::CONFIG_FILENAME))
    }
}
