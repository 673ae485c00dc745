mod directory;
mod docx;
#[cfg(feature = "pdf")]
mod pdf;
mod text;

use std::path::Path;

pub use directory::DirectoryLoader;
pub use docx::DocxLoader;
#[cfg(feature = "pdf")]
pub use pdf::PdfLoader;
pub use text::TextLoader;

use super::{DocumentError, DocumentMetadata};

/// Stat `path`, enforce the size cap and derive metadata from the file name.
async fn checked_metadata(path: &Path, max_size: u64) -> Result<DocumentMetadata, DocumentError> {
    let meta = tokio::fs::metadata(path).await?;
    if meta.len() > max_size {
        return Err(DocumentError::FileTooLarge(meta.len()));
    }

    Ok(DocumentMetadata {
        source: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        file_path: path.display().to_string(),
        file_type: extension_of(path),
        file_size: meta.len(),
    })
}

pub(crate) fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}
