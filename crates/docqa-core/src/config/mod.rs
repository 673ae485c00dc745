mod env;
mod types;


pub use types::*;

use std::path::Path;

use docqa_memory::document::SplitterConfig;

use crate::error::ConfigError;
use crate::vault::{Secret, VaultProvider};

impl Config {
    /// Load configuration from a TOML file with env var overrides.
    ///
    /// Falls back to defaults when the file does not exist. The result is validated.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or if the merged
    /// configuration is rejected by [`Config::validate`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            toml::from_str::<Self>(&content)?
        } else {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Resolve sensitive configuration values through the vault.
    ///
    /// # Errors
    ///
    /// Returns an error if the vault backend fails.
    pub async fn resolve_secrets(&mut self, vault: &dyn VaultProvider) -> Result<(), ConfigError> {
        if let Some(val) = vault.get_secret("DOCQA_LLM_API_KEY").await? {
            self.secrets.llm_api_key = Some(Secret::new(val));
        }
        if let Some(val) = vault.get_secret("DOCQA_GATEWAY_TOKEN").await? {
            self.secrets.gateway_token = Some(Secret::new(val));
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the chunking window or retrieval depth is unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.splitter_config()
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if self.search.top_k == 0 {
            return Err(ConfigError::Invalid(
                "search.top_k must be greater than zero".into(),
            ));
        }
        if self.search.collection.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "search.collection must not be empty".into(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn splitter_config(&self) -> SplitterConfig {
        SplitterConfig {
            chunk_size: self.documents.chunk_size,
            chunk_overlap: self.documents.chunk_overlap,
            sentence_aware: self.documents.sentence_aware,
        }
    }

    /// Whether the selected provider has the credentials and endpoints it needs.
    #[must_use]
    pub fn llm_configured(&self) -> bool {
        let has_key = self
            .secrets
            .llm_api_key
            .as_ref()
            .is_some_and(|k| !k.expose().is_empty());
        match self.llm.provider {
            ProviderKind::Mock => true,
            ProviderKind::OpenAi => has_key,
            ProviderKind::Azure => {
                has_key
                    && self.llm.azure.as_ref().is_some_and(|a| {
                        !a.endpoint.trim().is_empty() && !a.chat_deployment.trim().is_empty()
                    })
            }
        }
    }
}
