use std::fmt::Write;
use std::path::Path;

use anyhow::Context;
use docqa_core::{Config, QueryAnswer};
use docqa_memory::document::{
    Chunk, DEFAULT_SECTION_MARKERS, DirectoryLoader, Document, Section, SplitterConfig,
    TextSplitter, split_sections,
};
use serde::Serialize;

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct ChunkOverrides {
    pub chunk_size: Option<usize>,
    pub chunk_overlap: Option<usize>,
    pub hard_cuts: bool,
}

impl ChunkOverrides {
    fn apply(self, mut config: SplitterConfig) -> SplitterConfig {
        if let Some(size) = self.chunk_size {
            config.chunk_size = size;
        }
        if let Some(overlap) = self.chunk_overlap {
            config.chunk_overlap = overlap;
        }
        if self.hard_cuts {
            config.sentence_aware = false;
        }
        config
    }
}

/// Load a single file or every supported file under a folder.
pub(crate) async fn load_path(config: &Config, path: &Path) -> anyhow::Result<Vec<Document>> {
    let loader = DirectoryLoader::new(path)
        .with_context(|| format!("cannot read {}", path.display()))?
        .with_max_file_size(config.documents.max_file_size);
    Ok(loader.load_all().await)
}

pub(crate) async fn chunk_path(
    config: &Config,
    path: &Path,
    overrides: ChunkOverrides,
) -> anyhow::Result<Vec<Chunk>> {
    let splitter = TextSplitter::new(overrides.apply(config.splitter_config()))
        .context("invalid chunking parameters")?;
    let documents = load_path(config, path).await?;
    Ok(splitter.split_documents(&documents))
}

pub(crate) async fn sections_of(
    config: &Config,
    path: &Path,
    markers: &[String],
) -> anyhow::Result<Vec<Section>> {
    let documents = load_path(config, path).await?;
    let sections = documents
        .iter()
        .flat_map(|doc| {
            if markers.is_empty() {
                split_sections(&doc.content, &DEFAULT_SECTION_MARKERS)
            } else {
                split_sections(&doc.content, markers)
            }
        })
        .collect();
    Ok(sections)
}

pub(crate) fn to_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    serde_json::to_string_pretty(value).context("failed to serialize output")
}

pub(crate) fn render_chunks(chunks: &[Chunk]) -> String {
    let mut out = String::new();
    for chunk in chunks {
        let _ = writeln!(
            out,
            "--- {} ({}/{}, {} chars)",
            chunk.chunk_id,
            chunk.chunk_index + 1,
            chunk.total_chunks,
            chunk.content.chars().count()
        );
        let _ = writeln!(out, "{}\n", chunk.content);
    }
    let _ = write!(out, "{} chunk(s)", chunks.len());
    out
}

pub(crate) fn render_sections(sections: &[Section]) -> String {
    sections
        .iter()
        .map(|s| format!("[{}]\n{}", s.header, s.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub(crate) fn render_answer(answer: &QueryAnswer) -> String {
    let mut out = answer.answer.clone();
    if !answer.sources.is_empty() {
        let _ = write!(out, "\n\nSources: {}", answer.sources.join(", "));
    }
    out
}
