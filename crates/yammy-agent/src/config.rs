//! Runtime settings for the Yammy pipeline.
//!
//! Loads a YAML settings file (all sections optional, serde defaults) and
//! then applies environment overrides. Env takes precedence over file.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

/// Default OpenAI-compatible chat completions endpoint (local Ollama).
pub const DEFAULT_CHAT_COMPLETIONS_URL: &str = "http://localhost:11434/v1/chat/completions";
/// Default embedding service base URL.
pub const DEFAULT_EMBED_BASE_URL: &str = "http://localhost:8000";

/// One chat-completions backend (classifier or answer writer).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Chat completions endpoint.
    pub url: String,
    /// Model name sent in the request body.
    pub model: String,
    /// Optional bearer token.
    pub api_key: Option<String>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_CHAT_COMPLETIONS_URL.to_string(),
            model: "qwen2.5:7b".to_string(),
            api_key: None,
        }
    }
}

/// Embedding service settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Base URL of the embedding service.
    pub url: String,
    /// Optional embedding model hint.
    pub model: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Use the deterministic hash embedder instead of the service.
    pub offline: bool,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_EMBED_BASE_URL.to_string(),
            model: None,
            timeout_secs: 30,
            offline: false,
        }
    }
}

/// Catalog snapshot location.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Path to the JSON snapshot artifact.
    pub path: PathBuf,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/catalog.json"),
        }
    }
}

/// Session store settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Seen-record retention in seconds.
    pub ttl_secs: i64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self { ttl_secs: 12 * 60 * 60 }
    }
}

/// Selection randomness settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SelectionSettings {
    /// Fixed RNG seed for reproducible selection; entropy-seeded when unset.
    pub seed: Option<u64>,
}

fn default_classifier() -> LlmSettings {
    LlmSettings {
        model: "phi3:mini".to_string(),
        ..LlmSettings::default()
    }
}

/// Full runtime settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Intent classifier backend (LLM #1).
    #[serde(default = "default_classifier")]
    pub classifier: LlmSettings,
    /// Answer writer backend (LLM #2).
    #[serde(default)]
    pub responder: LlmSettings,
    /// Embedding oracle.
    #[serde(default)]
    pub embedding: EmbeddingSettings,
    /// Catalog snapshot.
    #[serde(default)]
    pub catalog: CatalogSettings,
    /// Seen-history store.
    #[serde(default)]
    pub session: SessionSettings,
    /// Selection randomness.
    #[serde(default)]
    pub selection: SelectionSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            classifier: default_classifier(),
            responder: LlmSettings::default(),
            embedding: EmbeddingSettings::default(),
            catalog: CatalogSettings::default(),
            session: SessionSettings::default(),
            selection: SelectionSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from an optional YAML file and apply env overrides.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut settings = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read settings file {}", path.display()))?;
                serde_yaml::from_str(&raw)
                    .with_context(|| format!("failed to parse settings file {}", path.display()))?
            }
            None => Self::default(),
        };
        settings.apply_env(|name| std::env::var(name).ok());
        Ok(settings)
    }

    /// Apply environment overrides through a lookup function.
    ///
    /// Blank values are ignored, matching how the rest of the stack treats
    /// empty env vars.
    pub fn apply_env(&mut self, get: impl Fn(&str) -> Option<String>) {
        let lookup = |name: &str| {
            get(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        if let Some(url) = lookup("YAMMY_CLASSIFIER_URL") {
            self.classifier.url = url;
        }
        if let Some(url) = lookup("YAMMY_RESPONDER_URL") {
            self.responder.url = url;
        }
        if let Some(url) = lookup("YAMMY_EMBED_URL") {
            self.embedding.url = url;
        }
        if let Some(path) = lookup("YAMMY_CATALOG_PATH") {
            self.catalog.path = PathBuf::from(path);
        }
        if let Some(key) = lookup("YAMMY_LLM_API_KEY") {
            self.classifier.api_key = Some(key.clone());
            self.responder.api_key = Some(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_services() {
        let settings = Settings::default();
        assert_eq!(settings.classifier.url, DEFAULT_CHAT_COMPLETIONS_URL);
        assert_eq!(settings.classifier.model, "phi3:mini");
        assert_eq!(settings.responder.model, "qwen2.5:7b");
        assert_eq!(settings.session.ttl_secs, 43_200);
        assert!(!settings.embedding.offline);
    }

    #[test]
    fn partial_yaml_fills_missing_sections() {
        let yaml = "embedding:\n  offline: true\nsession:\n  ttl_secs: 60\n";
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert!(settings.embedding.offline);
        assert_eq!(settings.session.ttl_secs, 60);
        // Untouched sections keep serde defaults.
        assert_eq!(settings.embedding.url, DEFAULT_EMBED_BASE_URL);
        assert_eq!(settings.classifier.model, "phi3:mini");
    }

    #[test]
    fn env_overrides_win_and_blanks_are_ignored() {
        let mut settings = Settings::default();
        settings.apply_env(|name| match name {
            "YAMMY_EMBED_URL" => Some("http://embed:9000".to_string()),
            "YAMMY_CLASSIFIER_URL" => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(settings.embedding.url, "http://embed:9000");
        assert_eq!(settings.classifier.url, DEFAULT_CHAT_COMPLETIONS_URL);
    }

    #[test]
    fn load_reads_a_yaml_file() {
        use std::io::Write as _;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"classifier:\n  model: gemma2:9b\ncatalog:\n  path: /tmp/cat.json\n")
            .unwrap();
        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.classifier.model, "gemma2:9b");
        assert_eq!(settings.catalog.path, PathBuf::from("/tmp/cat.json"));
    }

    #[test]
    fn load_of_missing_file_is_an_error() {
        assert!(Settings::load(Some(Path::new("/nonexistent/settings.yaml"))).is_err());
    }

    #[test]
    fn api_key_override_applies_to_both_backends() {
        let mut settings = Settings::default();
        settings.apply_env(|name| {
            (name == "YAMMY_LLM_API_KEY").then(|| "secret".to_string())
        });
        assert_eq!(settings.classifier.api_key.as_deref(), Some("secret"));
        assert_eq!(settings.responder.api_key.as_deref(), Some("secret"));
    }
}
