//! Completion request handling per wire family.
//!
//! One public entry point, [`send_completion`], with enum dispatch on
//! [`WireFamily`]. Every request runs under the 30-second completion
//! budget; non-200 responses surface the provider's raw body as the error
//! text, and unexpected response shapes are caught and reported instead of
//! propagating as a fault.

use std::time::Duration;

use serde_json::{json, Value};

use crate::constants::{ANTHROPIC_VERSION, COMPLETION_TIMEOUT_SECS, MAX_TOKENS};
use crate::error::{Error, Result};
use crate::message::{Message, Role};

use super::descriptor::{ProviderDescriptor, WireFamily};

/// Send the conversation to a provider and return the assistant text.
pub async fn send_completion(
    descriptor: &ProviderDescriptor,
    key: &str,
    model: &str,
    history: &[Message],
) -> Result<String> {
    let request = request_once(descriptor, key, model, history);
    match tokio::time::timeout(Duration::from_secs(COMPLETION_TIMEOUT_SECS), request).await {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout(COMPLETION_TIMEOUT_SECS)),
    }
}

async fn request_once(
    descriptor: &ProviderDescriptor,
    key: &str,
    model: &str,
    history: &[Message],
) -> Result<String> {
    let client = reqwest::Client::new();

    let request = match descriptor.family {
        WireFamily::Google => {
            let url = format!(
                "{}/{}:generateContent?key={}",
                descriptor.completion_url, model, key
            );
            let body = json!({
                "contents": [{"parts": [{"text": flatten_history(history)}]}]
            });
            client.post(&url).json(&body)
        }
        WireFamily::OpenAi => {
            let body = json!({
                "model": model,
                "messages": history,
            });
            client
                .post(descriptor.completion_url)
                .bearer_auth(key)
                .json(&body)
        }
        WireFamily::Anthropic => {
            // The Messages API takes the system prompt as a top-level
            // field, not a message role.
            let system = history
                .iter()
                .find(|m| m.role == Role::System)
                .map(|m| m.content.clone());
            let messages: Vec<&Message> = history
                .iter()
                .filter(|m| m.role != Role::System)
                .collect();
            let mut body = json!({
                "model": model,
                "max_tokens": MAX_TOKENS,
                "messages": messages,
            });
            if let Some(system) = system {
                body["system"] = Value::String(system);
            }
            client
                .post(descriptor.completion_url)
                .header("x-api-key", key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&body)
        }
    };

    let response = request
        .send()
        .await
        .map_err(|e| Error::Provider(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Provider(if body.is_empty() {
            status.to_string()
        } else {
            body
        }));
    }

    let value: Value = response
        .json()
        .await
        .map_err(|e| Error::Provider(format!("malformed response body: {e}")))?;
    extract_text(descriptor.family, &value)
}

/// Flatten the conversation into the single-prompt shape the Google
/// family expects: one `USER:`/`SYSTEM:`-prefixed line per turn.
fn flatten_history(history: &[Message]) -> String {
    let mut prompt = String::new();
    for message in history {
        let role = match message.role {
            Role::User => "USER",
            _ => "SYSTEM",
        };
        prompt.push_str(role);
        prompt.push_str(": ");
        prompt.push_str(&message.content);
        prompt.push('\n');
    }
    prompt
}

/// Unwrap the assistant text from a family's documented response schema.
fn extract_text(family: WireFamily, value: &Value) -> Result<String> {
    let text = match family {
        WireFamily::Google => value["candidates"][0]["content"]["parts"][0]["text"].as_str(),
        WireFamily::OpenAi => value["choices"][0]["message"]["content"].as_str(),
        WireFamily::Anthropic => value["content"][0]["text"].as_str(),
    };
    text.map(str::to_string)
        .ok_or_else(|| Error::Provider(format!("unexpected {family} response shape")))
}
