//! Prompt templates and context formatting

use crate::storage::ScoredChunk;

/// Fixed refusal sentence used when the context does not contain the answer
pub const REFUSAL: &str = "I don't know based on the provided sources.";

/// Maximum preview length per chunk in the rendered context, in characters
const PREVIEW_LEN: usize = 500;

/// Prompt builder for grounded question answering
pub struct PromptBuilder;

impl PromptBuilder {
    /// Render retrieved chunks into a single prompt-ready context string.
    ///
    /// Every chunk becomes one tagged line `[source: <source>] <preview>`,
    /// where the preview is the trimmed content with newlines collapsed to
    /// spaces and truncated to 500 characters. Lines are joined with a blank
    /// line, in input order. An empty input yields an empty string.
    pub fn format_context(chunks: &[ScoredChunk]) -> String {
        let mut lines = Vec::with_capacity(chunks.len());
        for scored in chunks {
            let source = scored.chunk.source().unwrap_or("unknown");
            let preview = preview_of(&scored.chunk.content);
            lines.push(format!("[source: {}] {}", source, preview));
        }
        lines.join("\n\n")
    }

    /// System message: strict grounding with the fixed refusal sentence
    pub fn system_prompt() -> String {
        format!(
            "You are a strict RAG assistant. Answer ONLY from the provided context. \
             If the answer is not in the context, say '{}'\n\
             Cite sources as [source] after the sentence they support.",
            REFUSAL
        )
    }

    /// User message carrying the question and the formatted context
    pub fn user_prompt(question: &str, context: &str) -> String {
        format!(
            "Question: {}\n\nContext:\n{}\n\nAnswer in a few sentences with inline citations.",
            question, context
        )
    }
}

/// Collapse newlines to spaces and truncate to the preview length on a
/// character boundary
fn preview_of(content: &str) -> String {
    let flat: String = content
        .trim()
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();

    if flat.chars().count() <= PREVIEW_LEN {
        flat
    } else {
        flat.chars().take(PREVIEW_LEN).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::document::{Chunk, Document};

    fn scored(content: &str, source: &str) -> ScoredChunk {
        let mut doc = Document::new(content);
        doc.set_default_source(source);
        ScoredChunk {
            chunk: Chunk::from_parent(&doc, content.to_string(), 0),
            similarity: 0.9,
        }
    }

    #[test]
    fn empty_input_yields_empty_context() {
        assert_eq!(PromptBuilder::format_context(&[]), "");
    }

    #[test]
    fn renders_every_chunk_not_just_the_first() {
        let chunks = vec![
            scored("First chunk.", "file:a.txt"),
            scored("Second chunk.", "file:b.txt"),
            scored("Third chunk.", "https://example.com"),
        ];
        let context = PromptBuilder::format_context(&chunks);

        let lines: Vec<&str> = context.split("\n\n").collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "[source: file:a.txt] First chunk.");
        assert_eq!(lines[1], "[source: file:b.txt] Second chunk.");
        assert_eq!(lines[2], "[source: https://example.com] Third chunk.");
    }

    #[test]
    fn preview_collapses_newlines_and_truncates() {
        let content = format!("line one\nline two\n{}", "x".repeat(600));
        let chunks = vec![scored(&content, "file:a.txt")];
        let context = PromptBuilder::format_context(&chunks);

        assert!(context.starts_with("[source: file:a.txt] line one line two"));
        let preview = context.trim_start_matches("[source: file:a.txt] ");
        assert!(!preview.contains('\n'));
        assert_eq!(preview.chars().count(), 500);
    }

    #[test]
    fn system_prompt_embeds_refusal_sentence() {
        assert!(PromptBuilder::system_prompt().contains(REFUSAL));
    }

    #[test]
    fn user_prompt_carries_question_and_context() {
        let prompt = PromptBuilder::user_prompt("Why?", "[source: a] because");
        assert!(prompt.starts_with("Question: Why?"));
        assert!(prompt.contains("Context:\n[source: a] because"));
    }
}
