//! Test-only mock LLM provider.

use std::sync::{Arc, Mutex};

use crate::error::LlmError;
use crate::provider::{LlmProvider, Message};

#[derive(Debug, Clone)]
pub struct MockProvider {
    responses: Arc<Mutex<Vec<String>>>,
    recorded: Arc<Mutex<Vec<Vec<Message>>>>,
    pub default_response: String,
    pub embedding: Vec<f32>,
    /// Computes the embedding from the input text when set; overrides `embedding`.
    pub embedder: Option<fn(&str) -> Vec<f32>>,
    pub supports_embeddings: bool,
    pub fail_chat: bool,
    pub fail_embed: bool,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            recorded: Arc::new(Mutex::new(Vec::new())),
            default_response: "mock response".into(),
            embedding: vec![0.0; 8],
            embedder: None,
            supports_embeddings: true,
            fail_chat: false,
            fail_embed: false,
        }
    }
}

impl MockProvider {
    #[must_use]
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_chat: true,
            fail_embed: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = embedding;
        self
    }

    #[must_use]
    pub fn with_embedder(mut self, embedder: fn(&str) -> Vec<f32>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Message lists passed to `chat`, oldest first. Shared between clones.
    #[must_use]
    pub fn recorded_messages(&self) -> Vec<Vec<Message>> {
        self.recorded.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl LlmProvider for MockProvider {
    async fn chat(&self, messages: &[Message]) -> Result<String, LlmError> {
        if let Ok(mut recorded) = self.recorded.lock() {
            recorded.push(messages.to_vec());
        }
        if self.fail_chat {
            return Err(LlmError::Other("mock LLM error".into()));
        }
        let mut responses = self
            .responses
            .lock()
            .map_err(|e| LlmError::Other(e.to_string()))?;
        if responses.is_empty() {
            Ok(self.default_response.clone())
        } else {
            Ok(responses.remove(0))
        }
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        if !self.supports_embeddings {
            return Err(LlmError::EmbedUnsupported { provider: "mock" });
        }
        if self.fail_embed {
            return Err(LlmError::Other("mock embed error".into()));
        }
        Ok(self.embedder.map_or_else(|| self.embedding.clone(), |f| f(text)))
    }

    fn supports_embeddings(&self) -> bool {
        self.supports_embeddings
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn queued_responses_then_default() {
        let mock = MockProvider::with_responses(vec!["first".into()]);
        assert_eq!(mock.chat(&[]).await.unwrap(), "first");
        assert_eq!(mock.chat(&[]).await.unwrap(), "mock response");
    }

    #[tokio::test]
    async fn records_messages_across_clones() {
        let mock = MockProvider::default();
        let clone = mock.clone();
        clone.chat(&[Message::user("q")]).await.unwrap();
        assert_eq!(mock.recorded_messages(), vec![vec![Message::user("q")]]);
    }

    #[tokio::test]
    async fn embedder_overrides_fixed_embedding() {
        #[expect(clippy::cast_precision_loss)]
        fn by_len(text: &str) -> Vec<f32> {
            vec![text.len() as f32]
        }
        let mock = MockProvider::default().with_embedder(by_len);
        assert_eq!(mock.embed("abc").await.unwrap(), vec![3.0]);
    }

    #[tokio::test]
    async fn failing_mock_errors() {
        let mock = MockProvider::failing();
        assert!(mock.chat(&[]).await.is_err());
        assert!(mock.embed("x").await.is_err());
    }
}
