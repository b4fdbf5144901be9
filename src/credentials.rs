//! Flat credential cache for provider API keys.
//!
//! Keys are stored per provider name as an ordered list in a single JSON
//! file with owner-only permissions. The store is loaded once at startup
//! and saved after every addition; access is strictly sequential within a
//! session, so no locking is needed.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Persistent map of `provider name -> ordered API keys`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CredentialStore {
    #[serde(default)]
    pub provider_keys: HashMap<String, Vec<String>>,

    #[serde(skip)]
    path: Option<PathBuf>,
}

impl CredentialStore {
    /// Load the store from the default location, or start empty when no
    /// cache file exists yet.
    pub fn load() -> Result<Self> {
        let path = Self::store_path()?;
        Self::load_from(path)
    }

    /// Load the store from an explicit path (used by tests).
    pub fn load_from(path: PathBuf) -> Result<Self> {
        let mut store = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read credentials from {:?}", path))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse credentials at {:?}", path))?
        } else {
            Self::default()
        };
        store.path = Some(path);
        Ok(store)
    }

    /// Ordered keys stored for a provider, most recently added last.
    pub fn keys_for(&self, provider: &str) -> &[String] {
        self.provider_keys
            .get(provider)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Append a key for a provider and save immediately. Duplicate keys
    /// are ignored.
    pub fn add_key(&mut self, provider: &str, key: &str) -> Result<()> {
        let keys = self.provider_keys.entry(provider.to_string()).or_default();
        if !keys.iter().any(|k| k == key) {
            keys.push(key.to_string());
            self.save()?;
        }
        Ok(())
    }

    /// Write the store back to disk with owner-only permissions.
    pub fn save(&self) -> Result<()> {
        let path = self
            .path
            .as_ref()
            .context("Credential store has no backing path")?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write credentials to {:?}", path))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    fn store_path() -> Result<PathBuf> {
        Ok(Config::config_dir()?.join(crate::constants::CREDENTIALS_FILENAME))
    }
}

/// Render a key for display: first 8 and last 4 characters with an
/// ellipsis, short keys as-is.
pub fn mask_key(key: &str) -> String {
    if key.len() > 12 {
        format!("{}...{}", &key[..8], &key[key.len() - 4..])
    } else {
        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> CredentialStore {
        let dir = std::env::temp_dir().join(format!("mender_test_creds_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let _ = std::fs::remove_file(&path);
        CredentialStore::load_from(path).unwrap()
    }

    #[test]
    fn add_and_reload_round_trips() {
        let mut store = temp_store("roundtrip.json");
        store.add_key("Groq", "gsk_1234567890abcdef").unwrap();
        store.add_key("Groq", "gsk_second_key_000000").unwrap();

        let reloaded = CredentialStore::load_from(store.path.clone().unwrap()).unwrap();
        assert_eq!(
            reloaded.keys_for("Groq"),
            ["gsk_1234567890abcdef", "gsk_second_key_000000"]
        );
        assert!(reloaded.keys_for("OpenAI").is_empty());
    }

    #[test]
    fn duplicate_keys_are_ignored() {
        let mut store = temp_store("dedup.json");
        store.add_key("OpenAI", "sk-duplicate-key-xyz").unwrap();
        store.add_key("OpenAI", "sk-duplicate-key-xyz").unwrap();
        assert_eq!(store.keys_for("OpenAI").len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn store_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let mut store = temp_store("perms.json");
        store.add_key("DeepSeek", "sk-permission-check-1").unwrap();

        let meta = std::fs::metadata(store.path.as_ref().unwrap()).unwrap();
        assert_eq!(meta.permissions().mode() & 0o777, 0o600);
    }

    #[test]
    fn masking_hides_the_middle() {
        assert_eq!(mask_key("sk-abcdefghijklmnop"), "sk-abcde...mnop");
        assert_eq!(mask_key("short"), "short");
    }
}
