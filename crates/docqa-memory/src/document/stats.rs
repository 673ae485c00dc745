use std::collections::BTreeMap;

use serde::Serialize;

use super::types::Document;

/// Corpus summary logged before ingestion and printed by `docqa stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentStats {
    pub total_documents: usize,
    /// Counted in chars.
    pub total_characters: usize,
    pub file_types: BTreeMap<String, usize>,
    pub average_chars_per_doc: usize,
}

impl DocumentStats {
    #[must_use]
    pub fn from_documents(documents: &[Document]) -> Self {
        let mut file_types = BTreeMap::new();
        let mut total_characters = 0;
        for doc in documents {
            total_characters += doc.content.chars().count();
            *file_types
                .entry(doc.metadata.file_type.clone())
                .or_insert(0) += 1;
        }

        Self {
            total_documents: documents.len(),
            total_characters,
            file_types,
            average_chars_per_doc: total_characters
                .checked_div(documents.len())
                .unwrap_or_default(),
        }
    }
}
