//! File loading for mender configuration.

use anyhow::{Context, Result};
use std::fs;

use super::types::Config;

impl Config {
    /// Loads the global config from `~/.config/mender/config.toml`.
    ///
    /// If no config file exists, creates one with commented defaults and
    /// returns the default configuration.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            let default_toml = "\
# Preselect a provider for `mender chat` (gemini, groq, openai, deepseek, claude)
# default_provider = \"groq\"

# Preselect a model for the default provider
# default_model = \"llama-3.3-70b-versatile\"

update_check = true
";
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, default_toml)
                .with_context(|| format!("Failed to write default config to {:?}", path))?;
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config at {:?}", path))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_an_empty_file() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.default_provider.is_none());
        assert!(config.default_model.is_none());
        assert!(config.system_prompt.is_some());
        assert!(config.update_check);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config: Config = toml::from_str(
            "default_provider = \"groq\"\ndefault_model = \"mixtral\"\nupdate_check = false\n",
        )
        .unwrap();
        assert_eq!(config.default_provider.as_deref(), Some("groq"));
        assert_eq!(config.default_model.as_deref(), Some("mixtral"));
        assert!(!config.update_check);
    }
}
