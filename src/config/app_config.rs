use std::time::Duration;

use serde::Deserialize;

use crate::domain::tool_cache::ToolCacheConfig;

/// Application configuration
///
/// Every section has defaults, so an empty environment yields a working
/// single-node deployment: in-memory stores, local hashing embeddings and no
/// cross-user sharing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
    pub cache: ToolCacheConfig,
    pub embedding: EmbeddingConfig,
    pub vector_store: VectorStoreConfig,
    pub hit_counter: HitCounterConfig,
    pub access: AccessConfig,
    pub sidecar: SidecarConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Install the Prometheus recorder and serve `/metrics`
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingProviderType {
    /// Local feature hashing, no network
    #[default]
    Hashing,
    /// OpenAI-compatible `/v1/embeddings` endpoint
    Openai,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProviderType,
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    /// Vector size of the hashing provider
    pub dimensions: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VectorStoreBackend {
    #[default]
    InMemory,
    Pgvector,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VectorStoreConfig {
    pub backend: VectorStoreBackend,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HitCounterBackend {
    #[default]
    InMemory,
    Redis,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HitCounterConfig {
    pub backend: HitCounterBackend,
    pub redis_url: Option<String>,
    pub key_prefix: String,
    /// Counters kept by the in-memory backend
    pub max_capacity: u64,
    /// Bound on Redis connects and commands; a slow counter reads as zero
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    /// Ask the RBAC service on every cross-user read
    Http,
    /// Refuse every cross-user read
    #[default]
    DenyAll,
    /// Grant every cross-user read; for local testing only
    AllowAll,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    pub mode: AccessMode,
    pub base_url: Option<String>,
    pub service_key: String,
    pub service_name: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SidecarConfig {
    /// Shared secret expected in `X-Service-Auth` on `/v1` and `/admin`
    pub service_key: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderType::default(),
            base_url: "https://api.openai.com".to_string(),
            api_key: None,
            model: "text-embedding-3-small".to_string(),
            dimensions: 256,
            timeout_secs: 10,
        }
    }
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            backend: VectorStoreBackend::default(),
            database_url: None,
            max_connections: 10,
            acquire_timeout_secs: 5,
        }
    }
}

impl Default for HitCounterConfig {
    fn default() -> Self {
        Self {
            backend: HitCounterBackend::default(),
            redis_url: None,
            key_prefix: "tool_cache:hits".to_string(),
            max_capacity: 100_000,
            timeout_ms: 500,
        }
    }
}

impl HitCounterConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            mode: AccessMode::default(),
            base_url: None,
            service_key: String::new(),
            service_name: "semantic-tool-cache".to_string(),
            timeout_secs: 5,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
