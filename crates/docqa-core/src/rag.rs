use std::sync::Arc;

use docqa_llm::any::AnyProvider;
use docqa_llm::provider::LlmProvider;
use docqa_memory::VectorStore;
use docqa_memory::document::{
    DirectoryLoader, Document, DocumentStats, IngestReport, IngestionPipeline, TextSplitter,
};
use serde::Serialize;

use crate::config::Config;
use crate::error::RagError;
use crate::prompt::{ContextBlock, build_messages};

const UNKNOWN_SOURCE: &str = "Unknown";
const PROBE_TEXT: &str = "dimension probe";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryAnswer {
    pub answer: String,
    /// Distinct source file names in retrieval order.
    pub sources: Vec<String>,
    pub context_chunks: usize,
}

/// Non-sensitive view of the running configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigSummary {
    pub document_path: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k_results: usize,
    pub provider: &'static str,
    pub search_backend: &'static str,
    pub collection: String,
    pub llm_configured: bool,
}

/// Question answering over the configured document folder.
pub struct RagService {
    config: Config,
    provider: AnyProvider,
    store: Arc<dyn VectorStore>,
    splitter: TextSplitter,
}

impl RagService {
    /// # Errors
    ///
    /// Returns an error if the chunking settings are invalid.
    pub fn new(
        config: Config,
        provider: AnyProvider,
        store: Arc<dyn VectorStore>,
    ) -> Result<Self, RagError> {
        let splitter = TextSplitter::new(config.splitter_config())?;
        Ok(Self {
            config,
            provider,
            store,
            splitter,
        })
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn provider(&self) -> &AnyProvider {
        &self.provider
    }

    #[must_use]
    pub fn config_summary(&self) -> ConfigSummary {
        ConfigSummary {
            document_path: self.config.documents.path.display().to_string(),
            chunk_size: self.config.documents.chunk_size,
            chunk_overlap: self.config.documents.chunk_overlap,
            top_k_results: self.config.search.top_k,
            provider: self.config.llm.provider.as_str(),
            search_backend: self.config.search.backend.as_str(),
            collection: self.config.search.collection.clone(),
            llm_configured: self.config.llm_configured(),
        }
    }

    /// Make sure the search collection exists, sized for the provider's embeddings.
    ///
    /// # Errors
    ///
    /// Returns an error if the probe embedding or the store call fails.
    pub async fn setup_index(&self) -> Result<(), RagError> {
        let vector_size = self.probe_vector_size().await?;
        self.store
            .ensure_collection(&self.config.search.collection, vector_size)
            .await?;
        tracing::info!(
            collection = %self.config.search.collection,
            vector_size,
            "search index ready"
        );
        Ok(())
    }

    /// Load every document under the configured folder.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Document`] if the folder does not exist.
    pub async fn load_documents(&self) -> Result<Vec<Document>, RagError> {
        let loader = DirectoryLoader::new(&self.config.documents.path)?
            .with_max_file_size(self.config.documents.max_file_size);
        Ok(loader.load_all().await)
    }

    /// # Errors
    ///
    /// Returns [`RagError::Document`] if the folder does not exist.
    pub async fn stats(&self) -> Result<DocumentStats, RagError> {
        let documents = self.load_documents().await?;
        Ok(DocumentStats::from_documents(&documents))
    }

    /// Rebuild the index from the document folder.
    ///
    /// An empty folder is not an error: the index is left untouched and a zero report returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the folder is missing or embedding or storage fails.
    pub async fn ingest(&self) -> Result<IngestReport, RagError> {
        let documents = self.load_documents().await?;
        if documents.is_empty() {
            tracing::warn!(
                path = %self.config.documents.path.display(),
                "no documents found to ingest"
            );
            return Ok(IngestReport::default());
        }

        let stats = DocumentStats::from_documents(&documents);
        tracing::info!(
            documents = stats.total_documents,
            characters = stats.total_characters,
            average_chars = stats.average_chars_per_doc,
            file_types = ?stats.file_types,
            "loaded documents"
        );

        let pipeline = IngestionPipeline::new(
            self.splitter.clone(),
            Arc::clone(&self.store),
            self.config.search.collection.clone(),
            Box::new(self.provider.embed_fn()),
        )
        .with_batch_size(self.config.search.embed_batch_size);

        pipeline
            .recreate_collection(self.probe_vector_size().await?)
            .await?;
        let report = pipeline.ingest(&documents).await?;
        tracing::info!(
            documents = report.documents,
            chunks = report.chunks,
            "ingestion complete"
        );
        Ok(report)
    }

    /// Answer `question` from the indexed chunks.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmptyQuestion`] for blank input, otherwise any embedding,
    /// search or chat failure.
    pub async fn query(&self, question: &str) -> Result<QueryAnswer, RagError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(RagError::EmptyQuestion);
        }

        let vector = self.provider.embed(question).await?;
        let hits = self
            .store
            .search(
                &self.config.search.collection,
                vector,
                self.config.search.top_k as u64,
            )
            .await?;
        tracing::debug!(hits = hits.len(), "retrieved context");

        let blocks: Vec<ContextBlock> = hits
            .iter()
            .map(|hit| ContextBlock {
                source: hit
                    .payload_str("source")
                    .unwrap_or(UNKNOWN_SOURCE)
                    .to_owned(),
                content: hit.payload_str("content").unwrap_or_default().to_owned(),
            })
            .collect();

        let mut sources: Vec<String> = Vec::new();
        for block in &blocks {
            if !sources.contains(&block.source) {
                sources.push(block.source.clone());
            }
        }

        let messages = build_messages(question, &blocks);
        let answer = self.provider.chat(&messages).await?;

        Ok(QueryAnswer {
            answer,
            sources,
            context_chunks: blocks.len(),
        })
    }

    async fn probe_vector_size(&self) -> Result<u64, RagError> {
        let probe = self.provider.embed(PROBE_TEXT).await?;
        Ok(probe.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use docqa_llm::mock::MockProvider;
    use docqa_llm::{LlmError, Role};
    use docqa_memory::{InMemoryVectorStore, VectorStoreError};

    use super::*;
    use crate::config::ProviderKind;

    fn keyword_embedding(text: &str) -> Vec<f32> {
        let text = text.to_lowercase();
        let hit = |word: &str| if text.contains(word) { 1.0 } else { 0.0 };
        vec![hit("vacation"), hit("remote"), hit("security"), 0.1]
    }

    fn test_config(docs: &Path) -> Config {
        let mut config = Config::default();
        config.llm.provider = ProviderKind::Mock;
        config.documents.path = docs.to_path_buf();
        config.documents.chunk_size = 200;
        config.documents.chunk_overlap = 20;
        config
    }

    fn service(
        config: Config,
        mock: MockProvider,
    ) -> (RagService, Arc<InMemoryVectorStore>) {
        let store = Arc::new(InMemoryVectorStore::new());
        let dyn_store: Arc<dyn VectorStore> = store.clone();
        let svc = RagService::new(config, AnyProvider::Mock(mock), dyn_store).unwrap();
        (svc, store)
    }

    fn write_corpus(dir: &Path) {
        std::fs::write(
            dir.join("policy.txt"),
            "Employees get 20 vacation days per year.",
        )
        .unwrap();
        std::fs::write(
            dir.join("remote.md"),
            "# Remote\nRemote work is allowed two days a week.",
        )
        .unwrap();
    }

    #[test]
    fn rejects_invalid_chunking() {
        let mut config = Config::default();
        config.documents.chunk_overlap = config.documents.chunk_size;
        let result = RagService::new(
            config,
            AnyProvider::Mock(MockProvider::default()),
            Arc::new(InMemoryVectorStore::new()),
        );
        assert!(matches!(result, Err(RagError::Document(_))));
    }

    #[test]
    fn summary_reports_settings() {
        let dir = tempfile::tempdir().unwrap();
        let (svc, _) = service(test_config(dir.path()), MockProvider::default());
        let summary = svc.config_summary();
        assert_eq!(summary.document_path, dir.path().display().to_string());
        assert_eq!(summary.chunk_size, 200);
        assert_eq!(summary.chunk_overlap, 20);
        assert_eq!(summary.top_k_results, 5);
        assert_eq!(summary.provider, "mock");
        assert_eq!(summary.collection, "documents-index");
        assert!(summary.llm_configured);
    }

    #[tokio::test]
    async fn setup_index_creates_collection_with_probed_size() {
        let dir = tempfile::tempdir().unwrap();
        let mock = MockProvider::default().with_embedding(vec![0.5; 6]);
        let (svc, store) = service(test_config(dir.path()), mock);

        svc.setup_index().await.unwrap();
        assert_eq!(store.point_count("documents-index"), Some(0));
    }

    #[tokio::test]
    async fn ingest_then_query_cites_best_source() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(dir.path());
        let mock = MockProvider::with_responses(vec!["You get 20 days.".into()])
            .with_embedder(keyword_embedding);
        let recorder = mock.clone();
        let mut config = test_config(dir.path());
        config.search.top_k = 1;
        let (svc, store) = service(config, mock);

        let report = svc.ingest().await.unwrap();
        assert_eq!(report.documents, 2);
        assert_eq!(report.chunks, 2);
        assert_eq!(store.point_count("documents-index"), Some(2));

        let answer = svc.query("How many vacation days do I get?").await.unwrap();
        assert_eq!(answer.answer, "You get 20 days.");
        assert_eq!(answer.sources, vec!["policy.txt".to_owned()]);
        assert_eq!(answer.context_chunks, 1);

        let calls = recorder.recorded_messages();
        let last = calls.last().unwrap();
        assert_eq!(last[0].role, Role::System);
        assert!(last[1].content.contains("[1] (source: policy.txt)"));
        assert!(last[1].content.contains("20 vacation days"));
        assert!(!last[1].content.contains("Remote work"));
    }

    #[tokio::test]
    async fn sources_are_unique_and_ordered_by_score() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(dir.path());
        let mock = MockProvider::default().with_embedder(keyword_embedding);
        let (svc, _) = service(test_config(dir.path()), mock);
        svc.ingest().await.unwrap();

        let answer = svc.query("remote work rules").await.unwrap();
        assert_eq!(answer.context_chunks, 2);
        assert_eq!(
            answer.sources,
            vec!["remote.md".to_owned(), "policy.txt".to_owned()]
        );
    }

    #[tokio::test]
    async fn reingest_drops_removed_documents() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(dir.path());
        let mock = MockProvider::default().with_embedder(keyword_embedding);
        let (svc, store) = service(test_config(dir.path()), mock);

        svc.ingest().await.unwrap();
        assert_eq!(store.point_count("documents-index"), Some(2));

        std::fs::remove_file(dir.path().join("remote.md")).unwrap();
        let report = svc.ingest().await.unwrap();
        assert_eq!(report.documents, 1);
        assert_eq!(store.point_count("documents-index"), Some(1));
    }

    #[tokio::test]
    async fn empty_folder_ingests_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let (svc, store) = service(test_config(dir.path()), MockProvider::default());

        let report = svc.ingest().await.unwrap();
        assert_eq!(report, IngestReport::default());
        assert_eq!(store.point_count("documents-index"), None);
    }

    #[tokio::test]
    async fn missing_folder_is_an_error() {
        let config = test_config(Path::new("/nonexistent/docqa/documents"));
        let (svc, _) = service(config, MockProvider::default());
        assert!(matches!(svc.ingest().await, Err(RagError::Document(_))));
    }

    #[tokio::test]
    async fn blank_question_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (svc, _) = service(test_config(dir.path()), MockProvider::default());
        assert!(matches!(svc.query("  \n ").await, Err(RagError::EmptyQuestion)));
    }

    #[tokio::test]
    async fn query_before_ingest_reports_missing_collection() {
        let dir = tempfile::tempdir().unwrap();
        let (svc, _) = service(test_config(dir.path()), MockProvider::default());
        assert!(matches!(
            svc.query("anything").await,
            Err(RagError::VectorStore(VectorStoreError::CollectionNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let (svc, _) = service(test_config(dir.path()), MockProvider::failing());
        assert!(matches!(
            svc.query("anything").await,
            Err(RagError::Llm(LlmError::Other(_)))
        ));
    }

    #[tokio::test]
    async fn stats_summarize_folder() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(dir.path());
        let (svc, _) = service(test_config(dir.path()), MockProvider::default());
        let stats = svc.stats().await.unwrap();
        assert_eq!(stats.total_documents, 2);
        assert_eq!(stats.file_types.get("md"), Some(&1));
        assert_eq!(stats.file_types.get("txt"), Some(&1));
    }
}
