//! Configuration types and path resolution for mender.
//!
//! Mender stores its settings as TOML at the platform's XDG config path
//! (e.g. `~/.config/mender/config.toml` on Linux); the credential cache
//! lives next to it and readline history under the XDG cache directory.

mod loader;
mod paths;
mod types;

pub use types::Config;
