use std::fmt::Write;

use docqa_llm::Message;

pub const NO_ANSWER: &str = "I don't have enough information to answer that question.";

const SYSTEM_PROMPT: &str = "You are an intelligent assistant helping users find information \
from company documents.\nUse the following context to answer the question. If the answer is \
not in the context, say \"I don't have enough information to answer that question.\"";

const ANSWER_INSTRUCTION: &str =
    "Provide a clear, detailed answer based on the context. Always cite the sources you used.";

/// One retrieved chunk as it appears in the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextBlock {
    pub source: String,
    pub content: String,
}

/// Render retrieved chunks as numbered blocks tagged with their source.
#[must_use]
pub fn format_context(blocks: &[ContextBlock]) -> String {
    let mut out = String::new();
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            out.push_str("\n\n");
        }
        let _ = write!(out, "[{}] (source: {})\n{}", i + 1, block.source, block.content);
    }
    out
}

/// Build the chat messages for a question over retrieved context.
#[must_use]
pub fn build_messages(question: &str, blocks: &[ContextBlock]) -> Vec<Message> {
    let context = if blocks.is_empty() {
        "(no relevant context found)".to_owned()
    } else {
        format_context(blocks)
    };
    vec![
        Message::system(SYSTEM_PROMPT),
        Message::user(format!(
            "Context:\n{context}\n\nQuestion: {question}\n\n{ANSWER_INSTRUCTION}"
        )),
    ]
}
