//! Application configuration

mod app_config;

pub use app_config::{
    AccessConfig, AccessMode, AppConfig, EmbeddingConfig, EmbeddingProviderType,
    HitCounterBackend, HitCounterConfig, LogFormat, LoggingConfig, MetricsConfig, ServerConfig,
    SidecarConfig, VectorStoreBackend, VectorStoreConfig,
};
