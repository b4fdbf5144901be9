//! Provider descriptors and the static registry.

/// Wire shape and authentication family shared by one or more providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFamily {
    /// Single-turn flattened prompt; API key in the query string.
    Google,
    /// Multi-turn message array; `Authorization: Bearer` header.
    OpenAi,
    /// Multi-turn message array with `max_tokens`; `x-api-key` header.
    Anthropic,
}

impl std::fmt::Display for WireFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WireFamily::Google => write!(f, "google"),
            WireFamily::OpenAi => write!(f, "openai"),
            WireFamily::Anthropic => write!(f, "anthropic"),
        }
    }
}

/// Static metadata for one hosted completion API.
#[derive(Debug)]
pub struct ProviderDescriptor {
    /// Display name, also the key into the credential store.
    pub name: &'static str,
    /// Wire family fixing request/response shape and auth.
    pub family: WireFamily,
    /// Completion endpoint (for [`WireFamily::Google`] this is the model
    /// collection base; the client appends `/{model}:generateContent`).
    pub completion_url: &'static str,
    /// Model listing endpoint, or `None` for providers served from a
    /// static model list.
    pub list_url: Option<&'static str>,
}

impl ProviderDescriptor {
    /// Whether models come from a static list instead of a listing call.
    pub fn is_local_listing(&self) -> bool {
        self.list_url.is_none()
    }
}

/// The five supported providers, in menu order.
pub const PROVIDERS: &[ProviderDescriptor] = &[
    ProviderDescriptor {
        name: "Google Gemini",
        family: WireFamily::Google,
        completion_url: "https://generativelanguage.googleapis.com/v1beta/models",
        list_url: Some("https://generativelanguage.googleapis.com/v1beta/models"),
    },
    ProviderDescriptor {
        name: "Groq",
        family: WireFamily::OpenAi,
        completion_url: "https://api.groq.com/openai/v1/chat/completions",
        list_url: Some("https://api.groq.com/openai/v1/models"),
    },
    ProviderDescriptor {
        name: "OpenAI",
        family: WireFamily::OpenAi,
        completion_url: "https://api.openai.com/v1/chat/completions",
        list_url: Some("https://api.openai.com/v1/models"),
    },
    ProviderDescriptor {
        name: "DeepSeek",
        family: WireFamily::OpenAi,
        completion_url: "https://api.deepseek.com/chat/completions",
        list_url: Some("https://api.deepseek.com/models"),
    },
    ProviderDescriptor {
        name: "Claude (Anthropic)",
        family: WireFamily::Anthropic,
        completion_url: crate::constants::ANTHROPIC_API_URL,
        list_url: None,
    },
];

/// Look up a provider by name, case-insensitively, matching either the
/// full display name or its first word (`groq`, `openai`, `claude`...).
pub fn find_provider(name: &str) -> Option<&'static ProviderDescriptor> {
    let wanted = name.to_lowercase();
    PROVIDERS.iter().find(|p| {
        let full = p.name.to_lowercase();
        full == wanted
            || full
                .split_whitespace()
                .next()
                .is_some_and(|first| first == wanted)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_five_entries() {
        assert_eq!(PROVIDERS.len(), 5);
        let names: Vec<_> = PROVIDERS.iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            [
                "Google Gemini",
                "Groq",
                "OpenAI",
                "DeepSeek",
                "Claude (Anthropic)"
            ]
        );
    }

    #[test]
    fn only_anthropic_is_local_listing() {
        let locals: Vec<_> = PROVIDERS
            .iter()
            .filter(|p| p.is_local_listing())
            .map(|p| p.family)
            .collect();
        assert_eq!(locals, [WireFamily::Anthropic]);
    }

    #[test]
    fn lookup_is_case_insensitive_and_accepts_short_names() {
        assert_eq!(find_provider("groq").unwrap().name, "Groq");
        assert_eq!(find_provider("GROQ").unwrap().name, "Groq");
        assert_eq!(find_provider("claude").unwrap().family, WireFamily::Anthropic);
        assert_eq!(find_provider("google").unwrap().family, WireFamily::Google);
        assert!(find_provider("mistral").is_none());
    }
}
