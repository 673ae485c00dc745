//! Document ingestion for DocQA: loading, cleaning, chunking and vector indexing.

pub mod document;
pub mod in_memory_store;
pub mod qdrant_ops;
pub mod similarity;
pub mod vector_store;

pub use in_memory_store::InMemoryVectorStore;
pub use qdrant_ops::QdrantOps;
pub use vector_store::{ScoredVectorPoint, VectorPoint, VectorStore, VectorStoreError};
