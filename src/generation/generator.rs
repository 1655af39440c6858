//! Grounded answer generation

use std::sync::Arc;

use crate::error::Result;
use crate::providers::ChatProvider;

use super::prompt::PromptBuilder;

/// Answer generator combining the fixed prompt template with a chat provider.
///
/// One synchronous completion per call, temperature pinned by the provider;
/// failures propagate unchanged.
pub struct AnswerGenerator {
    chat: Arc<dyn ChatProvider>,
}

impl AnswerGenerator {
    /// Create a new generator
    pub fn new(chat: Arc<dyn ChatProvider>) -> Self {
        Self { chat }
    }

    /// Generate an answer for the question from the formatted context
    pub async fn generate(&self, question: &str, context: &str) -> Result<String> {
        let system = PromptBuilder::system_prompt();
        let user = PromptBuilder::user_prompt(question, context);
        self.chat.complete(&system, &user).await
    }
}
