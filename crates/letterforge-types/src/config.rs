//! Service configuration shape.
//!
//! Loaded from `config.toml` in the data directory by the infrastructure
//! layer. Every field has a default so a missing or partial file still
//! yields a usable configuration.

use serde::{Deserialize, Serialize};

/// Global Letterforge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Text-completion model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the text-completion service. `None` uses the provider's
    /// public endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_base_url: Option<String>,

    /// Timeout for a single text-completion call, in seconds.
    #[serde(default = "default_llm_timeout_secs")]
    pub llm_timeout_secs: u64,

    /// Base URL of the document rendering service.
    #[serde(default = "default_renderer_url")]
    pub renderer_url: String,

    /// Timeout for a single rendering call, in seconds.
    #[serde(default = "default_renderer_timeout_secs")]
    pub renderer_timeout_secs: u64,

    /// Public base URL under which stored documents are reachable.
    #[serde(default = "default_files_base_url")]
    pub files_base_url: String,
}

fn default_model() -> String {
    "gemini-2.5-pro".to_string()
}

fn default_llm_timeout_secs() -> u64 {
    120
}

fn default_renderer_url() -> String {
    "http://localhost:9090".to_string()
}

fn default_renderer_timeout_secs() -> u64 {
    60
}

fn default_files_base_url() -> String {
    "http://localhost:3000/admin/contract/view".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            llm_base_url: None,
            llm_timeout_secs: default_llm_timeout_secs(),
            renderer_url: default_renderer_url(),
            renderer_timeout_secs: default_renderer_timeout_secs(),
            files_base_url: default_files_base_url(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_populated() {
        let config = ServiceConfig::default();
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.llm_timeout_secs, 120);
        assert!(config.llm_base_url.is_none());
        assert!(config.files_base_url.starts_with("http://"));
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let parsed: ServiceConfig = toml::from_str(
            r#"
model = "gemini-2.0-flash"
files_base_url = "https://letters.example.com/view"
"#,
        )
        .unwrap();
        assert_eq!(parsed.model, "gemini-2.0-flash");
        assert_eq!(parsed.files_base_url, "https://letters.example.com/view");
        assert_eq!(parsed.llm_timeout_secs, 120);
        assert_eq!(parsed.renderer_timeout_secs, 60);
    }
}
