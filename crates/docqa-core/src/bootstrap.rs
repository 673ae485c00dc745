//! Application bootstrap: config resolution, provider and vector store construction.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use docqa_llm::any::AnyProvider;
use docqa_llm::{AzureOpenAiProvider, OpenAiProvider};
use docqa_memory::{InMemoryVectorStore, QdrantOps, VectorStore};

use crate::config::{Config, ProviderKind, SearchBackend};
use crate::error::{ConfigError, RagError};
use crate::rag::RagService;
use crate::vault::{EnvVaultProvider, VaultProvider};

pub struct AppBuilder {
    config: Config,
    config_path: PathBuf,
}

impl AppBuilder {
    /// Load the config at `config_path` and resolve its secrets from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be loaded or validated.
    pub async fn new(config_path: PathBuf) -> Result<Self, ConfigError> {
        Self::with_vault(config_path, &EnvVaultProvider).await
    }

    /// # Errors
    ///
    /// Returns an error if the config cannot be loaded or the vault fails.
    pub async fn with_vault(
        config_path: PathBuf,
        vault: &dyn VaultProvider,
    ) -> Result<Self, ConfigError> {
        let mut config = Config::load(&config_path)?;
        config.resolve_secrets(vault).await?;
        Ok(Self {
            config,
            config_path,
        })
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// # Errors
    ///
    /// Returns an error if the provider or vector store cannot be created.
    pub fn build_service(self) -> Result<RagService, RagError> {
        let provider = create_provider(&self.config)?;
        let store = create_vector_store(&self.config)?;
        RagService::new(self.config, provider, store)
    }
}

/// Priority: explicit path > `DOCQA_CONFIG` env > `config/default.toml`.
#[must_use]
pub fn resolve_config_path(cli: Option<PathBuf>) -> PathBuf {
    if let Some(path) = cli {
        return path;
    }
    if let Ok(path) = std::env::var("DOCQA_CONFIG") {
        return PathBuf::from(path);
    }
    PathBuf::from("config/default.toml")
}

/// # Errors
///
/// Returns [`ConfigError::Invalid`] if the provider's required settings are missing.
pub fn create_provider(config: &Config) -> Result<AnyProvider, ConfigError> {
    let llm = &config.llm;
    let api_key = config
        .secrets
        .llm_api_key
        .as_ref()
        .map(|k| k.expose().to_owned())
        .unwrap_or_default();
    if api_key.is_empty() && llm.provider != ProviderKind::Mock {
        tracing::warn!(
            provider = llm.provider.as_str(),
            "DOCQA_LLM_API_KEY is not set, LLM requests will be rejected"
        );
    }

    match llm.provider {
        ProviderKind::OpenAi => {
            let provider =
                OpenAiProvider::new(api_key, llm.base_url.clone(), llm.model.clone(), llm.max_tokens)
                    .with_temperature(llm.temperature)
                    .with_embedding_model(llm.embedding_model.clone())
                    .with_max_retries(llm.max_retries);
            Ok(AnyProvider::OpenAi(provider))
        }
        ProviderKind::Azure => {
            let azure = llm.azure.as_ref().ok_or_else(|| {
                ConfigError::Invalid("llm.azure section required for azure provider".into())
            })?;
            if azure.endpoint.trim().is_empty() || azure.chat_deployment.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "llm.azure.endpoint and llm.azure.chat_deployment are required".into(),
                ));
            }
            let provider = AzureOpenAiProvider::new(
                api_key,
                azure.endpoint.clone(),
                azure.chat_deployment.clone(),
                llm.max_tokens,
            )
            .with_api_version(azure.api_version.clone())
            .with_embedding_deployment(azure.embedding_deployment.clone())
            .with_temperature(llm.temperature)
            .with_max_retries(llm.max_retries);
            Ok(AnyProvider::Azure(provider))
        }
        #[cfg(any(test, feature = "mock"))]
        ProviderKind::Mock => Ok(AnyProvider::Mock(docqa_llm::mock::MockProvider::default())),
        #[cfg(not(any(test, feature = "mock")))]
        ProviderKind::Mock => Err(ConfigError::Invalid(
            "mock provider not available (feature not enabled)".into(),
        )),
    }
}

/// # Errors
///
/// Returns an error if the Qdrant client cannot be created.
pub fn create_vector_store(config: &Config) -> Result<Arc<dyn VectorStore>, RagError> {
    match config.search.backend {
        SearchBackend::Qdrant => {
            let ops = QdrantOps::new(&config.search.qdrant_url)?;
            tracing::info!(url = %config.search.qdrant_url, "using qdrant vector store");
            Ok(Arc::new(ops))
        }
        SearchBackend::Memory => {
            tracing::info!("using in-memory vector store");
            Ok(Arc::new(InMemoryVectorStore::new()))
        }
    }
}
