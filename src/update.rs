//! Best-effort release update check.
//!
//! One unauthenticated GET against the release metadata endpoint with a
//! 5-second budget. Every failure (network, non-200, unexpected shape,
//! unparseable version) is swallowed; the check is informational only.

use std::time::Duration;

use colored::Colorize;
use semver::Version;
use serde_json::Value;

use crate::constants::{UPDATE_CHECK_URL, UPDATE_TIMEOUT_SECS};

/// Poll the release endpoint and print a notice when a newer version
/// exists. Never fails.
pub async fn check_updates() {
    let Some(latest) = fetch_latest_tag().await else {
        return;
    };
    if let Some(version) = newer_version(&latest, env!("CARGO_PKG_VERSION")) {
        println!(
            "{} {}",
            "update available:".yellow(),
            format!("v{version}").cyan()
        );
        println!();
    }
}

async fn fetch_latest_tag() -> Option<String> {
    let request = reqwest::Client::new()
        .get(UPDATE_CHECK_URL)
        .header("user-agent", crate::constants::APP_NAME)
        .send();
    let response = tokio::time::timeout(Duration::from_secs(UPDATE_TIMEOUT_SECS), request)
        .await
        .ok()?
        .ok()?;
    if !response.status().is_success() {
        return None;
    }
    let value: Value = response.json().await.ok()?;
    value["tag_name"].as_str().map(String::from)
}

/// Parse a release tag (with optional leading `v`) and return the version
/// when it is strictly newer than `current`.
fn newer_version(tag: &str, current: &str) -> Option<Version> {
    let latest = Version::parse(tag.trim().trim_start_matches('v')).ok()?;
    let current = Version::parse(current).ok()?;
    (latest > current).then_some(latest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_tags_are_reported() {
        assert!(newer_version("v9.9.9", "0.1.0").is_some());
        assert!(newer_version("9.9.9", "0.1.0").is_some());
    }

    #[test]
    fn same_or_older_tags_are_ignored() {
        assert!(newer_version("v0.1.0", "0.1.0").is_none());
        assert!(newer_version("0.0.1", "0.1.0").is_none());
    }

    #[test]
    fn garbage_tags_are_ignored() {
        assert!(newer_version("not-a-version", "0.1.0").is_none());
        assert!(newer_version("", "0.1.0").is_none());
    }
}
