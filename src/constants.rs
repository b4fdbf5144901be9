//! Centralized constants for mender.
//!
//! All magic numbers, default strings, and configuration constants live here
//! so they can be changed in one place.

/// Application name used in CLI output and directory paths.
pub const APP_NAME: &str = "mender";

/// Configuration filename.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Credential cache filename (flat JSON, owner-only permissions).
pub const CREDENTIALS_FILENAME: &str = "credentials.json";

/// Readline history filename.
pub const HISTORY_FILENAME: &str = "chat_history.txt";

/// Release metadata endpoint polled by the update check.
pub const UPDATE_CHECK_URL: &str =
    "https://api.github.com/repos/zombiegirlcz/mender/releases/latest";

/// Maximum tokens requested from the Anthropic Messages API.
pub const MAX_TOKENS: u64 = 4096;

/// Default system prompt prepended to all conversations.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are mender, a helpful AI coding assistant in the terminal. \
Be concise. Use code blocks with language tags when showing code.";

// --- Operation budgets ---

/// Timeout for a single completion request.
pub const COMPLETION_TIMEOUT_SECS: u64 = 30;

/// Timeout for a model listing request.
pub const LISTING_TIMEOUT_SECS: u64 = 10;

/// Timeout for the release update check.
pub const UPDATE_TIMEOUT_SECS: u64 = 5;

/// Timeout for shell commands run via `/run`.
pub const RUN_TIMEOUT_SECS: u64 = 30;

// --- Tool limits ---

/// Maximum bytes of shell output shown before truncation.
pub const RUN_MAX_OUTPUT_SIZE: usize = 2000;

/// Maximum number of entries the scan tool lists per directory.
pub const SCAN_MAX_ENTRIES: usize = 100;

/// Maximum number of matching lines the search tool returns.
pub const SEARCH_MAX_MATCHES: usize = 50;

/// Byte threshold for binary file detection (check first N bytes for null).
pub const BINARY_DETECTION_BYTES: usize = 8192;

/// Maximum file size (bytes) the `/read` command will print.
pub const READ_FILE_MAX_SIZE: u64 = 100 * 1024;

/// Maximum number of models offered in a selection menu.
pub const MODEL_LIST_LIMIT: usize = 20;

/// Static model list for the Anthropic provider (no listing endpoint).
pub const ANTHROPIC_MODELS: &[&str] = &["claude-3-5-sonnet-20241022", "claude-3-opus-20250129"];

/// Anthropic Messages API endpoint.
pub const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Version header required by the Anthropic Messages API.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";
