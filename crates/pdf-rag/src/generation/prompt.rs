//! Prompt templates for RAG generation

/// Prompt builder for RAG queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build context from retrieved chunks, nearest first
    pub fn build_context(chunks: &[String]) -> String {
        chunks.join("\n")
    }

    /// Build a question-answering prompt restricted to the given context
    pub fn build_qa_prompt(context: &str, question: &str) -> String {
        format!(
            r#"
Use only the following context to answer the question.
If the answer is not in the context, say "Not found in document".

Context:
{context}

Question:
{question}
"#,
            context = context,
            question = question
        )
    }
}
