use std::path::Path;
use std::sync::Arc;

use docqa_core::bootstrap::AppBuilder;
use docqa_core::config::{ProviderKind, SearchBackend};
use docqa_core::vault::{SecretFuture, VaultProvider};
use docqa_core::{Config, RagError, RagService};
use docqa_llm::any::AnyProvider;
use docqa_llm::mock::MockProvider;
use docqa_memory::InMemoryVectorStore;
use docqa_memory::document::{TextSplitter, split_sections};
use serial_test::serial;

struct StaticVault(Option<&'static str>);

impl VaultProvider for StaticVault {
    fn get_secret(&self, key: &str) -> SecretFuture<'_> {
        let value = (key == "DOCQA_LLM_API_KEY")
            .then_some(self.0)
            .flatten()
            .map(str::to_owned);
        Box::pin(async move { Ok(value) })
    }
}

fn topic_embedding(text: &str) -> Vec<f32> {
    let text = text.to_lowercase();
    let hit = |word: &str| if text.contains(word) { 1.0 } else { 0.0 };
    vec![
        hit("leave"),
        hit("expense"),
        hit("security"),
        hit("onboarding"),
        0.05,
    ]
}

fn write_corpus(dir: &Path) {
    std::fs::create_dir_all(dir.join("policies")).unwrap();
    std::fs::write(
        dir.join("policies/leave.md"),
        "# Leave\nEmployees accrue 25 days of annual leave. Unused leave carries over for one year.",
    )
    .unwrap();
    std::fs::write(
        dir.join("policies/expenses.txt"),
        "Expense reports are due within 30 days. Receipts are required for every expense above 20 EUR.",
    )
    .unwrap();
    std::fs::write(
        dir.join("onboarding.txt"),
        "Onboarding starts on Monday. Security training is part of onboarding.",
    )
    .unwrap();
    std::fs::write(dir.join("diagram.png"), [0u8, 1, 2, 3]).unwrap();
}

fn mock_service(docs: &Path, mock: MockProvider, top_k: usize) -> RagService {
    let mut config = Config::default();
    config.llm.provider = ProviderKind::Mock;
    config.search.backend = SearchBackend::Memory;
    config.search.top_k = top_k;
    config.documents.path = docs.to_path_buf();
    config.documents.chunk_size = 120;
    config.documents.chunk_overlap = 20;
    RagService::new(
        config,
        AnyProvider::Mock(mock),
        Arc::new(InMemoryVectorStore::new()),
    )
    .unwrap()
}

#[tokio::test]
#[serial]
async fn builder_wires_config_file_into_service() {
    let dir = tempfile::tempdir().unwrap();
    let docs = dir.path().join("documents");
    write_corpus(&docs);
    let config_path = dir.path().join("docqa.toml");
    std::fs::write(
        &config_path,
        format!(
            "[llm]\nprovider = \"mock\"\n\n[search]\nbackend = \"memory\"\ntop_k = 2\n\n\
             [documents]\npath = {:?}\nchunk_size = 300\nchunk_overlap = 30\n",
            docs.display().to_string()
        ),
    )
    .unwrap();

    let builder = AppBuilder::with_vault(config_path, &StaticVault(Some("sk-test")))
        .await
        .unwrap();
    let service = builder.build_service().unwrap();

    let summary = service.config_summary();
    assert_eq!(summary.chunk_size, 300);
    assert_eq!(summary.top_k_results, 2);
    assert_eq!(summary.search_backend, "memory");
    assert!(summary.llm_configured);

    let report = service.ingest().await.unwrap();
    assert_eq!(report.documents, 3);
    assert!(report.chunks >= 3);

    let answer = service.query("What is covered?").await.unwrap();
    assert_eq!(answer.answer, "mock response");
    assert_eq!(answer.context_chunks, 2);
}

#[tokio::test]
async fn end_to_end_retrieval_prefers_matching_document() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path());
    let mock = MockProvider::with_responses(vec!["You accrue 25 days.".into()])
        .with_embedder(topic_embedding);
    let recorder = mock.clone();
    let service = mock_service(dir.path(), mock, 1);

    service.ingest().await.unwrap();
    let answer = service.query("How much annual leave do I get?").await.unwrap();

    assert_eq!(answer.answer, "You accrue 25 days.");
    assert_eq!(answer.sources, vec!["leave.md".to_owned()]);

    let prompt = &recorder.recorded_messages()[0][1].content;
    assert!(prompt.contains("(source: leave.md)"));
    assert!(prompt.contains("Question: How much annual leave do I get?"));
}

#[tokio::test]
async fn ingest_skips_unsupported_files_and_chunks_everything_else() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path());
    let service = mock_service(dir.path(), MockProvider::default(), 5);

    let stats = service.stats().await.unwrap();
    assert_eq!(stats.total_documents, 3);
    assert_eq!(stats.file_types.get("png"), None);

    let documents = service.load_documents().await.unwrap();
    let splitter = TextSplitter::new(service.config().splitter_config()).unwrap();
    let expected_chunks = splitter.split_documents(&documents).len();

    let report = service.ingest().await.unwrap();
    assert_eq!(report.chunks, expected_chunks);
}

#[tokio::test]
async fn query_errors_do_not_become_answers() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path());
    let service = mock_service(dir.path(), MockProvider::default(), 3);
    service.ingest().await.unwrap();

    let mut failing = MockProvider::default();
    failing.fail_chat = true;
    let broken = mock_service(dir.path(), failing, 3);
    broken.ingest().await.unwrap();

    assert!(matches!(
        broken.query("anything").await,
        Err(RagError::Llm(_))
    ));
    assert!(matches!(service.query("").await, Err(RagError::EmptyQuestion)));
}

#[test]
fn markdown_sections_match_loader_output() {
    let sections = split_sections(
        "Preface\n# Leave\n25 days\n## Carry over\nOne year",
        &docqa_memory::document::DEFAULT_SECTION_MARKERS,
    );
    let headers: Vec<&str> = sections.iter().map(|s| s.header.as_str()).collect();
    assert_eq!(headers, vec!["Introduction", "# Leave", "## Carry over"]);
}
