//! Struct definitions and serde defaults for mender configuration.

use serde::{Deserialize, Serialize};

/// Root configuration for mender, deserialized from `config.toml`.
///
/// Fields use serde defaults so mender can run with sensible defaults
/// when no config file exists.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Provider preselected for `mender chat` (skips the provider menu).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_provider: Option<String>,
    /// Model preselected for the default provider (skips the model menu).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
    /// Optional system prompt prepended to all conversations.
    #[serde(default = "default_system_prompt", skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    /// Whether to poll the release endpoint at chat startup.
    #[serde(default = "default_update_check")]
    pub update_check: bool,
}

pub(super) fn default_update_check() -> bool {
    true
}

/// Returns the default system prompt for new conversations.
///
/// Used by serde's `#[serde(default)]` attribute during deserialization
/// so configs without an explicit `system_prompt` still get a sensible default.
fn default_system_prompt() -> Option<String> {
    Some(crate::constants::DEFAULT_SYSTEM_PROMPT.to_string())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_provider: None,
            default_model: None,
            system_prompt: default_system_prompt(),
            update_check: default_update_check(),
        }
    }
}
