use super::cleaner::clean_text;
use super::error::DocumentError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitterConfig {
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Characters shared by consecutive hard-cut chunks.
    pub chunk_overlap: usize,
    /// End chunks at a sentence terminator when one falls in the second half of the window.
    pub sentence_aware: bool,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            sentence_aware: true,
        }
    }
}

impl SplitterConfig {
    /// # Errors
    ///
    /// Returns [`DocumentError::InvalidConfiguration`] if `chunk_size` is zero or
    /// `chunk_overlap` is not smaller than `chunk_size`.
    pub fn validate(&self) -> Result<(), DocumentError> {
        if self.chunk_size == 0 {
            return Err(DocumentError::InvalidConfiguration(
                "chunk_size must be greater than zero".into(),
            ));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(DocumentError::InvalidConfiguration(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

/// Sliding-window text splitter. A constructed splitter always holds a valid config.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    config: SplitterConfig,
}

impl TextSplitter {
    /// # Errors
    ///
    /// Returns [`DocumentError::InvalidConfiguration`] if the config is rejected by
    /// [`SplitterConfig::validate`].
    pub fn new(config: SplitterConfig) -> Result<Self, DocumentError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }

    /// Clean `text` and cut it into overlapping chunks of at most `chunk_size` characters.
    ///
    /// Only empty input yields no chunks; whitespace-only input yields one empty chunk.
    #[must_use]
    pub fn split_text(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        let cleaned = clean_text(text);
        let chars: Vec<char> = cleaned.chars().collect();
        if chars.len() <= self.config.chunk_size {
            return vec![cleaned];
        }

        window_spans(&chars, &self.config)
            .into_iter()
            .filter_map(|(start, end)| {
                let piece: String = chars[start..end].iter().collect();
                let trimmed = piece.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_owned())
            })
            .collect()
    }
}

/// Raw `[start, end)` character windows before trimming.
fn window_spans(chars: &[char], config: &SplitterConfig) -> Vec<(usize, usize)> {
    let len = chars.len();
    let mut spans = Vec::new();
    let mut start = 0;

    while start < len {
        let mut end = (start + config.chunk_size).min(len);

        if end < len
            && config.sentence_aware
            && let Some(offset) = last_sentence_break(&chars[start..end])
            && 2 * offset > config.chunk_size
        {
            end = start + offset + 1;
        }

        spans.push((start, end));

        start = if end < len {
            // A snapped window can be shorter than the overlap; never move the cursor back.
            end.saturating_sub(config.chunk_overlap).max(start + 1)
        } else {
            end
        };
    }

    spans
}

/// Offset of the right-most `". "`, `".\n"`, `"! "` or `"? "` fully inside `window`.
fn last_sentence_break(window: &[char]) -> Option<usize> {
    window
        .windows(2)
        .rposition(|pair| matches!(pair, ['.', ' ' | '\n'] | ['!' | '?', ' ']))
}
