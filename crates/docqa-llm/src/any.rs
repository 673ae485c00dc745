use std::sync::Arc;

use crate::azure::AzureOpenAiProvider;
use crate::error::LlmError;
#[cfg(feature = "mock")]
use crate::mock::MockProvider;
use crate::openai::OpenAiProvider;
use crate::provider::{EmbedFuture, LlmProvider, Message};

/// Generates a match over all `AnyProvider` variants, binding the inner provider
/// and evaluating the given expression for each arm.
macro_rules! delegate_provider {
    ($self:expr, |$p:ident| $expr:expr) => {
        match $self {
            AnyProvider::OpenAi($p) => $expr,
            AnyProvider::Azure($p) => $expr,
            #[cfg(feature = "mock")]
            AnyProvider::Mock($p) => $expr,
        }
    };
}

#[derive(Debug, Clone)]
pub enum AnyProvider {
    OpenAi(OpenAiProvider),
    Azure(AzureOpenAiProvider),
    #[cfg(feature = "mock")]
    Mock(MockProvider),
}

impl AnyProvider {
    /// Return a cloneable closure that calls `embed()` on this provider.
    pub fn embed_fn(&self) -> impl Fn(&str) -> EmbedFuture + Send + Sync + use<> {
        let provider = Arc::new(self.clone());
        move |text: &str| -> EmbedFuture {
            let p = Arc::clone(&provider);
            let owned = text.to_owned();
            Box::pin(async move { p.embed(&owned).await })
        }
    }
}

impl LlmProvider for AnyProvider {
    async fn chat(&self, messages: &[Message]) -> Result<String, LlmError> {
        delegate_provider!(self, |p| p.chat(messages).await)
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        delegate_provider!(self, |p| p.embed(text).await)
    }

    fn supports_embeddings(&self) -> bool {
        delegate_provider!(self, |p| p.supports_embeddings())
    }

    fn name(&self) -> &str {
        delegate_provider!(self, |p| p.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delegates_name_and_embedding_support() {
        let openai = AnyProvider::OpenAi(
            OpenAiProvider::new("k".into(), "http://x".into(), "m".into(), 1)
                .with_embedding_model(Some("e".into())),
        );
        assert_eq!(openai.name(), "openai");
        assert!(openai.supports_embeddings());

        let azure = AnyProvider::Azure(AzureOpenAiProvider::new(
            "k".into(),
            "http://x".into(),
            "d".into(),
            1,
        ));
        assert_eq!(azure.name(), "azure");
        assert!(!azure.supports_embeddings());
    }

    #[tokio::test]
    async fn embed_fn_propagates_errors() {
        let azure = AnyProvider::Azure(AzureOpenAiProvider::new(
            "k".into(),
            "http://x".into(),
            "d".into(),
            1,
        ));
        let embed = azure.embed_fn();
        assert!(matches!(
            embed("text").await,
            Err(LlmError::EmbedUnsupported { provider: "azure" })
        ));
    }

    #[cfg(feature = "mock")]
    #[tokio::test]
    async fn embed_fn_uses_inner_provider() {
        let mock = AnyProvider::Mock(MockProvider::default().with_embedding(vec![1.0, 2.0]));
        let embed = mock.embed_fn();
        assert_eq!(embed("a").await.unwrap(), vec![1.0, 2.0]);
        assert_eq!(mock.chat(&[Message::user("q")]).await.unwrap(), "mock response");
    }
}
