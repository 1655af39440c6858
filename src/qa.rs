//! Question-answering orchestrator: retrieve, format, generate, cite

use crate::error::Result;
use crate::generation::{AnswerGenerator, PromptBuilder, REFUSAL};
use crate::retrieval::Retriever;
use crate::storage::ScoredChunk;

/// A generated answer with its supporting source labels
#[derive(Debug, Clone)]
pub struct Answer {
    /// Generated answer text
    pub answer: String,
    /// Distinct source labels of the retrieved chunks, first-seen order
    pub sources: Vec<String>,
}

/// Query orchestrator running the read path end to end
pub struct QueryEngine {
    retriever: Retriever,
    generator: AnswerGenerator,
}

impl QueryEngine {
    /// Create a new query engine
    pub fn new(retriever: Retriever, generator: AnswerGenerator) -> Self {
        Self {
            retriever,
            generator,
        }
    }

    /// Answer a question from the stored chunks.
    ///
    /// Retrieval with zero hits short-circuits to the fixed refusal sentence
    /// and an empty source list, skipping the generation call.
    pub async fn ask(&self, question: &str) -> Result<Answer> {
        let retrieved = self.retriever.retrieve(question).await?;

        if retrieved.is_empty() {
            tracing::info!("no chunks retrieved, returning refusal");
            return Ok(Answer {
                answer: REFUSAL.to_string(),
                sources: Vec::new(),
            });
        }

        let context = PromptBuilder::format_context(&retrieved);
        let answer = self.generator.generate(question, &context).await?;
        let sources = distinct_sources(&retrieved);

        tracing::info!("answered question with {} sources", sources.len());
        Ok(Answer { answer, sources })
    }
}

/// Distinct `source` values from the retrieved chunks, first-seen order
fn distinct_sources(chunks: &[ScoredChunk]) -> Vec<String> {
    let mut sources = Vec::new();
    for scored in chunks {
        if let Some(source) = scored.chunk.source() {
            if !sources.iter().any(|s| s == source) {
                sources.push(source.to_string());
            }
        }
    }
    sources
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::document::{Chunk, Document};

    fn scored(source: &str) -> ScoredChunk {
        let mut doc = Document::new("text");
        doc.set_default_source(source);
        ScoredChunk {
            chunk: Chunk::from_parent(&doc, "text".to_string(), 0),
            similarity: 0.5,
        }
    }

    #[test]
    fn distinct_sources_removes_duplicates_keeps_order() {
        let chunks = vec![
            scored("file:a.txt"),
            scored("file:b.txt"),
            scored("file:a.txt"),
            scored("https://example.com"),
        ];
        assert_eq!(
            distinct_sources(&chunks),
            ["file:a.txt", "file:b.txt", "https://example.com"]
        );
    }

    #[test]
    fn distinct_sources_skips_untagged_chunks() {
        let untagged = ScoredChunk {
            chunk: Chunk::from_parent(&Document::new("x"), "x".to_string(), 0),
            similarity: 0.1,
        };
        assert!(distinct_sources(&[untagged]).is_empty());
    }
}
