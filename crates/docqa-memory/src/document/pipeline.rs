use std::collections::HashMap;
use std::sync::Arc;

use futures::future::try_join_all;
use serde_json::json;
use uuid::Uuid;

use super::{Chunk, Document, DocumentError, DocumentLoader, TextSplitter};
use crate::vector_store::{VectorPoint, VectorStore};

pub const DEFAULT_BATCH_SIZE: usize = 16;

pub type EmbedFn = Box<dyn Fn(&str) -> docqa_llm::provider::EmbedFuture + Send + Sync>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct IngestReport {
    pub documents: usize,
    pub chunks: usize,
}

/// Split, embed and store documents in one collection.
pub struct IngestionPipeline {
    splitter: TextSplitter,
    store: Arc<dyn VectorStore>,
    collection: String,
    embed_fn: EmbedFn,
    batch_size: usize,
}

impl IngestionPipeline {
    pub fn new(
        splitter: TextSplitter,
        store: Arc<dyn VectorStore>,
        collection: impl Into<String>,
        embed_fn: EmbedFn,
    ) -> Self {
        Self {
            splitter,
            store,
            collection: collection.into(),
            embed_fn,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Number of chunks embedded concurrently. Clamped to at least 1.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Drop the collection if present and create it empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects either operation.
    pub async fn recreate_collection(&self, vector_size: u64) -> Result<(), DocumentError> {
        if self.store.collection_exists(&self.collection).await? {
            tracing::info!(collection = %self.collection, "dropping existing collection");
            self.store.delete_collection(&self.collection).await?;
        }
        self.store
            .ensure_collection(&self.collection, vector_size)
            .await?;
        Ok(())
    }

    /// Chunk `documents`, embed every chunk and upsert the vectors.
    ///
    /// Chunks that clean to nothing are not embedded. The first failing embedding or store
    /// call aborts the run.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Embedding`] or [`DocumentError::Storage`].
    pub async fn ingest(&self, documents: &[Document]) -> Result<IngestReport, DocumentError> {
        let mut chunks = self.splitter.split_documents(documents);
        chunks.retain(|chunk| !chunk.content.is_empty());
        let mut report = IngestReport {
            documents: documents.len(),
            chunks: 0,
        };
        if chunks.is_empty() {
            return Ok(report);
        }

        let total_batches = chunks.len().div_ceil(self.batch_size);
        let mut collection_ready = false;

        for (batch_idx, batch) in chunks.chunks(self.batch_size).enumerate() {
            let vectors =
                try_join_all(batch.iter().map(|chunk| (self.embed_fn)(&chunk.content))).await?;

            if !collection_ready && let Some(first) = vectors.first() {
                self.store
                    .ensure_collection(&self.collection, first.len() as u64)
                    .await?;
                collection_ready = true;
            }

            let points: Vec<VectorPoint> = batch
                .iter()
                .zip(vectors)
                .map(|(chunk, vector)| VectorPoint {
                    id: point_id(&chunk.metadata.file_path, chunk.chunk_index),
                    vector,
                    payload: chunk_payload(chunk),
                })
                .collect();
            self.store.upsert(&self.collection, points).await?;

            report.chunks += batch.len();
            tracing::info!(
                batch = batch_idx + 1,
                total_batches,
                chunks = report.chunks,
                "embedded batch"
            );
        }

        Ok(report)
    }

    /// # Errors
    ///
    /// Returns an error if loading, embedding, or storage fails.
    pub async fn load_and_ingest(
        &self,
        loader: &(dyn DocumentLoader + '_),
        path: &std::path::Path,
    ) -> Result<IngestReport, DocumentError> {
        let documents = loader.load(path).await?;
        self.ingest(&documents).await
    }
}

/// Stable point id keyed by file path, so same-named files in different folders never collide.
/// Re-ingesting a chunk overwrites its previous vector.
#[must_use]
pub fn point_id(file_path: &str, chunk_index: usize) -> String {
    Uuid::new_v5(
        &Uuid::NAMESPACE_OID,
        format!("{file_path}#{chunk_index}").as_bytes(),
    )
    .to_string()
}

fn chunk_payload(chunk: &Chunk) -> HashMap<String, serde_json::Value> {
    HashMap::from([
        ("content".to_owned(), json!(chunk.content)),
        ("source".to_owned(), json!(chunk.metadata.source)),
        ("file_path".to_owned(), json!(chunk.metadata.file_path)),
        ("file_type".to_owned(), json!(chunk.metadata.file_type)),
        ("chunk_id".to_owned(), json!(chunk.chunk_id)),
        ("chunk_index".to_owned(), json!(chunk.chunk_index)),
        ("total_chunks".to_owned(), json!(chunk.total_chunks)),
        ("document_index".to_owned(), json!(chunk.document_index)),
    ])
}
