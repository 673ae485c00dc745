//! Configuration, secret resolution and the document question-answering service.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod prompt;
pub mod rag;
pub mod vault;

pub use config::Config;
pub use error::{ConfigError, RagError};
pub use rag::{ConfigSummary, QueryAnswer, RagService};
