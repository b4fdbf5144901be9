//! Shell command execution with a bounded timeout.

use std::time::Duration;

use crate::constants::RUN_MAX_OUTPUT_SIZE;
use crate::error::{Error, Result};

/// Run a shell command and capture its output.
///
/// The command runs under `sh -c` with both streams piped. On timeout the
/// whole call fails and captured output is discarded; partial results are
/// never returned.
pub async fn run_command(command: &str, timeout_secs: u64) -> Result<String> {
    let mut cmd = tokio::process::Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd.stdout(std::process::Stdio::piped());
    cmd.stderr(std::process::Stdio::piped());

    let child = cmd.spawn()?;

    let output = match tokio::time::timeout(
        Duration::from_secs(timeout_secs),
        child.wait_with_output(),
    )
    .await
    {
        Ok(result) => result?,
        Err(_) => return Err(Error::Timeout(timeout_secs)),
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    let mut text = stdout.to_string();
    if !stderr.is_empty() {
        if !text.is_empty() {
            text.push_str("\n--- stderr ---\n");
        }
        text.push_str(&stderr);
    }

    let mut text = cap_output(text.trim());
    let code = output.status.code().unwrap_or(-1);
    if code != 0 {
        text.push_str(&format!("\nexit code: {code}"));
    }
    Ok(text)
}

/// Truncate `output` to at most [`RUN_MAX_OUTPUT_SIZE`] bytes, appending a
/// notice when truncation occurs.
pub(super) fn cap_output(output: &str) -> String {
    if output.len() <= RUN_MAX_OUTPUT_SIZE {
        return output.to_string();
    }
    // Find a valid UTF-8 boundary at or before the limit.
    let mut end = RUN_MAX_OUTPUT_SIZE;
    while end > 0 && !output.is_char_boundary(end) {
        end -= 1;
    }
    format!(
        "{}\n... output truncated at {} bytes",
        &output[..end],
        RUN_MAX_OUTPUT_SIZE
    )
}
