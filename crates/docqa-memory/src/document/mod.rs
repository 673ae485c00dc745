pub mod assembler;
pub mod cleaner;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod sections;
pub mod splitter;
pub mod stats;
pub mod types;

pub use cleaner::clean_text;
pub use error::DocumentError;
pub use loader::{DirectoryLoader, DocxLoader, TextLoader};
pub use pipeline::{EmbedFn, IngestReport, IngestionPipeline};
pub use sections::{DEFAULT_SECTION_MARKERS, split_sections};
pub use splitter::{SplitterConfig, TextSplitter};
pub use stats::DocumentStats;
pub use types::{Chunk, Document, DocumentMetadata, Section};

#[cfg(feature = "pdf")]
pub use loader::PdfLoader;

/// Default maximum file size: 50 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

pub trait DocumentLoader: Send + Sync {
    fn load(
        &self,
        path: &std::path::Path,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Vec<Document>, DocumentError>> + Send + '_>,
    >;

    fn supported_extensions(&self) -> &[&str];
}
