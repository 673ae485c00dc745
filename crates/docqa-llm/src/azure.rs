use std::fmt;

use serde::Serialize;

use crate::error::LlmError;
use crate::openai::{
    ChatRequest, DEFAULT_MAX_RETRIES, EmbeddingRequest, parse_chat_response,
    parse_embedding_response, read_body,
};
use crate::provider::{LlmProvider, Message};
use crate::retry::send_with_retry;

pub const DEFAULT_API_VERSION: &str = "2024-02-01";

/// Azure OpenAI deployments. Chat and embeddings use separate deployments on one resource.
#[derive(Clone)]
pub struct AzureOpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    api_version: String,
    chat_deployment: String,
    embedding_deployment: Option<String>,
    max_tokens: u32,
    temperature: Option<f32>,
    max_retries: u32,
}

impl fmt::Debug for AzureOpenAiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureOpenAiProvider")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("api_version", &self.api_version)
            .field("chat_deployment", &self.chat_deployment)
            .field("embedding_deployment", &self.embedding_deployment)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

impl AzureOpenAiProvider {
    #[must_use]
    pub fn new(
        api_key: String,
        mut endpoint: String,
        chat_deployment: String,
        max_tokens: u32,
    ) -> Self {
        while endpoint.ends_with('/') {
            endpoint.pop();
        }
        Self {
            client: crate::http::default_client(),
            api_key,
            endpoint,
            api_version: DEFAULT_API_VERSION.to_owned(),
            chat_deployment,
            embedding_deployment: None,
            max_tokens,
            temperature: None,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    #[must_use]
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    #[must_use]
    pub fn with_embedding_deployment(mut self, deployment: Option<String>) -> Self {
        self.embedding_deployment = deployment;
        self
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn deployment_url(&self, deployment: &str, operation: &str) -> String {
        format!(
            "{}/openai/deployments/{deployment}/{operation}?api-version={}",
            self.endpoint, self.api_version
        )
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<String, LlmError> {
        let response = send_with_retry("azure", self.max_retries, || {
            self.client
                .post(url)
                .header("api-key", &self.api_key)
                .json(body)
                .send()
        })
        .await?;
        read_body("azure", response).await
    }
}

impl LlmProvider for AzureOpenAiProvider {
    async fn chat(&self, messages: &[Message]) -> Result<String, LlmError> {
        let body = ChatRequest {
            model: None,
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };
        let url = self.deployment_url(&self.chat_deployment, "chat/completions");
        let text = self.post_json(&url, &body).await?;
        parse_chat_response("azure", &text)
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        let deployment = self
            .embedding_deployment
            .as_deref()
            .ok_or(LlmError::EmbedUnsupported { provider: "azure" })?;

        let body = EmbeddingRequest {
            input: text,
            model: None,
        };
        let url = self.deployment_url(deployment, "embeddings");
        let text = self.post_json(&url, &body).await?;
        parse_embedding_response("azure", &text)
    }

    fn supports_embeddings(&self) -> bool {
        self.embedding_deployment.is_some()
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "azure"
    }
}
