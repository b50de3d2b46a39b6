//! Configuration for the chatbot service
//!
//! Defaults live in the `Default` impls; [`RagConfig::from_env`] overlays
//! process environment variables (a `.env` file is loaded by the binary).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Main service configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Knowledge base configuration
    pub knowledge_base: KnowledgeBaseConfig,
    /// Retrieval configuration
    pub retrieval: RetrievalConfig,
    /// Embedding configuration
    pub embeddings: EmbeddingConfig,
    /// Chat model configuration
    pub llm: LlmConfig,
    /// Authentication configuration
    pub auth: AuthConfig,
    /// Rate limiting configuration
    pub rate_limit: RateLimitConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Origins allowed by CORS
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 6835,
            cors_origins: vec![
                "http://localhost:5173".to_string(),
                "https://example.com".to_string(),
            ],
        }
    }
}

/// Knowledge base configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBaseConfig {
    /// CSV file with question/answer records
    pub path: PathBuf,
}

impl Default for KnowledgeBaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data_qna.csv"),
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of documents placed in every prompt
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 6 }
    }
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Embedding model name
    pub model: String,
    /// Documents sent per embeddings request while building the index
    pub batch_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            batch_size: 64,
        }
    }
}

/// Chat model (OpenAI-compatible API) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API base URL, including the version segment
    pub base_url: String,
    /// API key, shared by chat and embedding calls
    #[serde(skip_serializing)]
    pub api_key: String,
    /// Chat completion model name
    pub chat_model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds (client default when unset)
    pub timeout_secs: Option<u64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            chat_model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            timeout_secs: None,
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    /// Accepted bearer tokens
    #[serde(skip_serializing)]
    pub tokens: Vec<String>,
}

/// Per-client rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Sustained requests per minute per client
    pub per_minute: u32,
    /// Requests a client may send back to back
    pub burst: u32,
    /// Key clients by the first `X-Forwarded-For` hop (only behind a trusted proxy)
    pub trust_forwarded_for: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            per_minute: 60,
            burst: 10,
            trust_forwarded_for: false,
        }
    }
}

impl RagConfig {
    /// Build configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(host) = var("HOST") {
            config.server.host = host;
        }
        if let Some(port) = var("PORT") {
            config.server.port = parse_var("PORT", &port)?;
        }
        if let Some(origins) = var("CORS_ORIGINS") {
            config.server.cors_origins = split_list(&origins);
        }
        if let Some(path) = var("KNOWLEDGE_BASE_PATH") {
            config.knowledge_base.path = PathBuf::from(path);
        }
        if let Some(top_k) = var("RETRIEVAL_TOP_K") {
            config.retrieval.top_k = parse_var("RETRIEVAL_TOP_K", &top_k)?;
        }
        if let Some(model) = var("EMBEDDING_MODEL") {
            config.embeddings.model = model;
        }
        if let Some(batch) = var("EMBEDDING_BATCH_SIZE") {
            config.embeddings.batch_size = parse_var("EMBEDDING_BATCH_SIZE", &batch)?;
        }
        if let Some(base_url) = var("OPENAI_BASE_URL") {
            config.llm.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(api_key) = var("OPENAI_API_KEY") {
            config.llm.api_key = api_key;
        }
        if let Some(model) = var("CHAT_MODEL") {
            config.llm.chat_model = model;
        }
        if let Some(temperature) = var("CHAT_TEMPERATURE") {
            config.llm.temperature = parse_var("CHAT_TEMPERATURE", &temperature)?;
        }
        if let Some(timeout) = var("LLM_TIMEOUT_SECS") {
            config.llm.timeout_secs = Some(parse_var("LLM_TIMEOUT_SECS", &timeout)?);
        }
        if let Some(tokens) = var("API_TOKENS") {
            config.auth.tokens = split_list(&tokens);
        }
        if let Some(per_minute) = var("RATE_LIMIT_PER_MINUTE") {
            config.rate_limit.per_minute = parse_var("RATE_LIMIT_PER_MINUTE", &per_minute)?;
        }
        if let Some(burst) = var("RATE_LIMIT_BURST") {
            config.rate_limit.burst = parse_var("RATE_LIMIT_BURST", &burst)?;
        }
        if let Some(trust) = var("TRUST_FORWARDED_FOR") {
            config.rate_limit.trust_forwarded_for = parse_var("TRUST_FORWARDED_FOR", &trust)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the service cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.llm.api_key.is_empty() {
            return Err(Error::Config("OPENAI_API_KEY must be set".to_string()));
        }
        if self.auth.tokens.is_empty() {
            return Err(Error::Config(
                "API_TOKENS must list at least one token".to_string(),
            ));
        }
        if self.retrieval.top_k == 0 {
            return Err(Error::Config("RETRIEVAL_TOP_K must be positive".to_string()));
        }
        if self.embeddings.batch_size == 0 {
            return Err(Error::Config(
                "EMBEDDING_BATCH_SIZE must be positive".to_string(),
            ));
        }
        if self.rate_limit.per_minute == 0 || self.rate_limit.burst == 0 {
            return Err(Error::Config(
                "RATE_LIMIT_PER_MINUTE and RATE_LIMIT_BURST must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// `host:port` the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("Invalid value for {}: {:?}", key, value)))
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_required_vars() {
        let config = RagConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("API_TOKENS", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.server.port, 6835);
        assert_eq!(config.retrieval.top_k, 6);
        assert_eq!(config.llm.chat_model, "gpt-4o-mini");
        assert_eq!(config.knowledge_base.path, PathBuf::from("data_qna.csv"));
        assert_eq!(config.auth.tokens, vec!["secret".to_string()]);
        assert!(!config.rate_limit.trust_forwarded_for);
    }

    #[test]
    fn test_overrides() {
        let config = RagConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("API_TOKENS", "a, b ,,c"),
            ("PORT", "9000"),
            ("CORS_ORIGINS", "https://one.test,https://two.test"),
            ("OPENAI_BASE_URL", "http://localhost:8000/v1/"),
            ("LLM_TIMEOUT_SECS", "30"),
            ("TRUST_FORWARDED_FOR", "true"),
        ]))
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.auth.tokens, vec!["a", "b", "c"]);
        assert_eq!(config.server.cors_origins.len(), 2);
        assert_eq!(config.llm.base_url, "http://localhost:8000/v1");
        assert_eq!(config.llm.timeout_secs, Some(30));
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
        assert!(config.rate_limit.trust_forwarded_for);
    }

    #[test]
    fn test_missing_credentials_rejected() {
        assert!(matches!(
            RagConfig::from_lookup(lookup(&[("API_TOKENS", "secret")])),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            RagConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "sk-test")])),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_invalid_number_rejected() {
        let result = RagConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("API_TOKENS", "secret"),
            ("PORT", "not-a-port"),
        ]));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
