use serde::Serialize;

/// Where a document came from. Copied verbatim onto every chunk cut from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentMetadata {
    /// File name, e.g. `handbook.pdf`. Chunk ids are derived from it.
    pub source: String,
    pub file_path: String,
    /// Lowercase extension without the dot.
    pub file_type: String,
    pub file_size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub content: String,
    pub metadata: DocumentMetadata,
}

impl Document {
    #[must_use]
    pub fn new(content: impl Into<String>, metadata: DocumentMetadata) -> Self {
        Self {
            content: content.into(),
            metadata,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    pub content: String,
    #[serde(flatten)]
    pub metadata: DocumentMetadata,
    pub chunk_id: String,
    pub chunk_index: usize,
    pub total_chunks: usize,
    pub document_index: usize,
}

impl Chunk {
    /// `<source>_chunk_<index>`
    #[must_use]
    pub fn make_id(source: &str, chunk_index: usize) -> String {
        format!("{source}_chunk_{chunk_index}")
    }
}

/// A header-delimited slice of text produced by [`super::split_sections`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub content: String,
    pub header: String,
}
