//! Embedding provider factory for runtime selection

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::{EmbeddingConfig, EmbeddingProviderType};
use crate::domain::embedding::EmbeddingProvider;
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClient;

use super::hashing::HashingEmbeddingProvider;
use super::openai::OpenAiEmbeddingProvider;

/// Factory for creating embedding provider instances
#[derive(Debug, Default)]
pub struct EmbeddingProviderFactory;

impl EmbeddingProviderFactory {
    pub fn create(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>, DomainError> {
        match config.provider {
            EmbeddingProviderType::Hashing => {
                info!(dimensions = config.dimensions, "Using local hashing embeddings");
                Ok(Arc::new(HashingEmbeddingProvider::new(config.dimensions)?))
            }
            EmbeddingProviderType::Openai => {
                let api_key = config
                    .api_key
                    .as_deref()
                    .filter(|key| !key.trim().is_empty())
                    .ok_or_else(|| {
                        DomainError::configuration(
                            "embedding.api_key is required for the openai provider",
                        )
                    })?;

                let client =
                    HttpClient::with_timeout("openai", Duration::from_secs(config.timeout_secs))?;
                let provider =
                    OpenAiEmbeddingProvider::with_base_url(client, api_key, &config.base_url)
                        .with_model(&config.model);

                info!(
                    model = %config.model,
                    base_url = %config.base_url,
                    "Using OpenAI embeddings"
                );

                Ok(Arc::new(provider))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_hashing() {
        let provider = EmbeddingProviderFactory::create(&EmbeddingConfig::default()).unwrap();
        assert_eq!(provider.provider_name(), "hashing");
    }

    #[test]
    fn test_openai_requires_api_key() {
        let config = EmbeddingConfig {
            provider: EmbeddingProviderType::Openai,
            api_key: Some("  ".to_string()),
            ..Default::default()
        };

        let result = EmbeddingProviderFactory::create(&config);
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_create_openai() {
        let config = EmbeddingConfig {
            provider: EmbeddingProviderType::Openai,
            api_key: Some("sk-test".to_string()),
            model: "text-embedding-3-large".to_string(),
            ..Default::default()
        };

        let provider = EmbeddingProviderFactory::create(&config).unwrap();
        assert_eq!(provider.provider_name(), "openai");
        assert_eq!(provider.model(), "text-embedding-3-large");
    }
}
