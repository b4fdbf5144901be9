//! Model listing and discovery.

use std::time::Duration;

use serde_json::Value;

use crate::constants::{ANTHROPIC_MODELS, LISTING_TIMEOUT_SECS, MODEL_LIST_LIMIT};
use crate::error::{Error, Result};

use super::descriptor::{ProviderDescriptor, WireFamily};

/// Fetch the models available for a provider, sorted and capped.
///
/// Providers without a listing endpoint return their static model list
/// without touching the network.
pub async fn fetch_models(descriptor: &ProviderDescriptor, key: &str) -> Result<Vec<String>> {
    let Some(list_url) = descriptor.list_url else {
        return Ok(ANTHROPIC_MODELS.iter().map(|m| m.to_string()).collect());
    };

    let request = list_once(descriptor, list_url, key);
    let value = match tokio::time::timeout(Duration::from_secs(LISTING_TIMEOUT_SECS), request).await
    {
        Ok(result) => result?,
        Err(_) => return Err(Error::Timeout(LISTING_TIMEOUT_SECS)),
    };

    let mut models = parse_model_list(descriptor.family, &value);
    models.sort();
    models.truncate(MODEL_LIST_LIMIT);
    Ok(models)
}

async fn list_once(descriptor: &ProviderDescriptor, list_url: &str, key: &str) -> Result<Value> {
    let client = reqwest::Client::new();

    let request = match descriptor.family {
        WireFamily::Google => client.get(format!("{list_url}?key={key}")),
        _ => client.get(list_url).bearer_auth(key),
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

    response
        .json()
        .await
        .map_err(|e| Error::Provider(format!("malformed model list: {e}")))
}

/// Pull model identifiers out of a listing response.
///
/// Google nests models under `models[]` and only entries supporting
/// `generateContent` are usable for chat; the `models/` prefix is stripped.
/// The OpenAI family lists ids under `data[]`.
fn parse_model_list(family: WireFamily, value: &Value) -> Vec<String> {
    match family {
        WireFamily::Google => value["models"]
            .as_array()
            .map(|models| {
                models
                    .iter()
                    .filter(|m| {
                        m["supportedGenerationMethods"]
                            .as_array()
                            .is_some_and(|methods| {
                                methods.iter().any(|v| v.as_str() == Some("generateContent"))
                            })
                    })
                    .filter_map(|m| m["name"].as_str())
                    .map(|name| name.trim_start_matches("models/").to_string())
                    .collect()
            })
            .unwrap_or_default(),
        _ => value["data"]
            .as_array()
            .map(|models| {
                models
                    .iter()
                    .filter_map(|m| m["id"].as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn google_listing_filters_and_strips_prefix() {
        let value = json!({
            "models": [
                {
                    "name": "models/gemini-pro",
                    "supportedGenerationMethods": ["generateContent", "countTokens"]
                },
                {
                    "name": "models/embedding-001",
                    "supportedGenerationMethods": ["embedContent"]
                }
            ]
        });
        assert_eq!(
            parse_model_list(WireFamily::Google, &value),
            ["gemini-pro"]
        );
    }

    #[test]
    fn openai_listing_collects_ids() {
        let value = json!({
            "data": [{"id": "gpt-4o"}, {"id": "gpt-4o-mini"}]
        });
        assert_eq!(
            parse_model_list(WireFamily::OpenAi, &value),
            ["gpt-4o", "gpt-4o-mini"]
        );
    }

    #[test]
    fn malformed_listing_yields_no_models() {
        let value = json!({"unexpected": true});
        assert!(parse_model_list(WireFamily::Google, &value).is_empty());
        assert!(parse_model_list(WireFamily::OpenAi, &value).is_empty());
    }

    #[tokio::test]
    async fn local_listing_skips_the_network() {
        let claude = crate::provider::find_provider("claude").unwrap();
        let models = fetch_models(claude, "unused-key").await.unwrap();
        assert_eq!(models, ANTHROPIC_MODELS);
    }
}
