use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("vault error: {0}")]
    Vault(String),
}

#[derive(Debug, thiserror::Error)]
pub enum RagError {
    #[error("question cannot be empty")]
    EmptyQuestion,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Document(#[from] docqa_memory::document::DocumentError),

    #[error(transparent)]
    VectorStore(#[from] docqa_memory::VectorStoreError),

    #[error(transparent)]
    Llm(#[from] docqa_llm::LlmError),
}
