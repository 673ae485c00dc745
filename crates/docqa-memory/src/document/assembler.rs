use super::splitter::TextSplitter;
use super::types::{Chunk, Document};

impl TextSplitter {
    /// Split one document into chunks tagged with ids and positions.
    #[must_use]
    pub fn split(&self, document: &Document, document_index: usize) -> Vec<Chunk> {
        let pieces = self.split_text(&document.content);
        let total_chunks = pieces.len();

        pieces
            .into_iter()
            .enumerate()
            .map(|(chunk_index, content)| Chunk {
                content,
                metadata: document.metadata.clone(),
                chunk_id: Chunk::make_id(&document.metadata.source, chunk_index),
                chunk_index,
                total_chunks,
                document_index,
            })
            .collect()
    }

    /// Split a batch of documents, preserving document order and chunk order within each.
    #[must_use]
    pub fn split_documents(&self, documents: &[Document]) -> Vec<Chunk> {
        let chunks: Vec<Chunk> = documents
            .iter()
            .enumerate()
            .flat_map(|(document_index, document)| self.split(document, document_index))
            .collect();

        tracing::info!(
            chunks = chunks.len(),
            documents = documents.len(),
            "documents chunked"
        );
        chunks
    }
}
