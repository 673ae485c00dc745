//! LLM provider abstraction for DocQA: chat completions and embeddings.

pub mod any;
pub mod azure;
pub mod error;
pub mod http;
#[cfg(feature = "mock")]
pub mod mock;
pub mod openai;
pub mod provider;
pub(crate) mod retry;

pub use any::AnyProvider;
pub use azure::AzureOpenAiProvider;
pub use error::LlmError;
pub use openai::OpenAiProvider;
pub use provider::{EmbedFuture, LlmProvider, Message, Role};
