use std::path::{Path, PathBuf};

use super::super::{DEFAULT_MAX_FILE_SIZE, Document, DocumentError, DocumentLoader};
use super::{DocxLoader, TextLoader, extension_of};

/// Recursively loads every supported file under a root folder.
pub struct DirectoryLoader {
    root: PathBuf,
    loaders: Vec<Box<dyn DocumentLoader>>,
}

impl DirectoryLoader {
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] if `root` does not exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, DocumentError> {
        let root = root.into();
        if !root.exists() {
            return Err(DocumentError::NotFound(root.display().to_string()));
        }
        Ok(Self {
            root,
            loaders: default_loaders(DEFAULT_MAX_FILE_SIZE),
        })
    }

    #[must_use]
    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.loaders = default_loaders(max_file_size);
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn supported_extensions(&self) -> Vec<&str> {
        self.loaders
            .iter()
            .flat_map(|l| l.supported_extensions().iter().copied())
            .collect()
    }

    fn loader_for(&self, extension: &str) -> Option<&dyn DocumentLoader> {
        self.loaders
            .iter()
            .find(|l| l.supported_extensions().contains(&extension))
            .map(Box::as_ref)
    }

    /// Load all supported files, in path order.
    ///
    /// Files that fail to load are logged and skipped. Documents with no text are dropped.
    pub async fn load_all(&self) -> Vec<Document> {
        let mut files: Vec<PathBuf> = ignore::WalkBuilder::new(&self.root)
            .hidden(true)
            .git_ignore(true)
            .build()
            .flatten()
            .filter(|e| e.file_type().is_some_and(|ft| ft.is_file()))
            .map(ignore::DirEntry::into_path)
            .collect();
        files.sort();

        let mut documents = Vec::new();
        for path in files {
            let extension = extension_of(&path);
            let Some(loader) = self.loader_for(&extension) else {
                tracing::debug!(path = %path.display(), "skipping unsupported file");
                continue;
            };

            match loader.load(&path).await {
                Ok(docs) => {
                    tracing::debug!(path = %path.display(), "loaded document");
                    documents.extend(docs.into_iter().filter(|d| !d.content.trim().is_empty()));
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to load document");
                }
            }
        }

        tracing::info!(
            documents = documents.len(),
            root = %self.root.display(),
            "documents loaded"
        );
        documents
    }
}

fn default_loaders(max_file_size: u64) -> Vec<Box<dyn DocumentLoader>> {
    #[cfg_attr(not(feature = "pdf"), allow(unused_mut))]
    let mut loaders: Vec<Box<dyn DocumentLoader>> = vec![
        Box::new(TextLoader { max_file_size }),
        Box::new(DocxLoader { max_file_size }),
    ];
    #[cfg(feature = "pdf")]
    loaders.push(Box::new(super::PdfLoader { max_file_size }));
    loaders
}
