//! Prompt template for RAG generation

use crate::types::ScoredDocument;

/// Renders the answer prompt from retrieved documents and a question
pub struct PromptComposer;

impl PromptComposer {
    /// Concatenate document texts, separated by a blank line
    pub fn format_docs(context: &[ScoredDocument]) -> String {
        context
            .iter()
            .map(|d| d.document.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Build the full prompt for `question` grounded on `context`
    pub fn compose(context: &[ScoredDocument], question: &str) -> String {
        Self::render(&Self::format_docs(context), question)
    }

    /// Fill the template with already formatted context text
    pub fn render(context: &str, question: &str) -> String {
        format!(
            r#"Anda adalah asisten yang berpengetahuan luas. Berdasarkan konteks berikut, jawablah pertanyaan dengan seakurat mungkin.
Hanya jawab pertanyaan yang ada di konteks

Pertanyaan: {question}
Konteks: {context}

Jawaban:"#,
            question = question,
            context = context
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Document;

    fn scored(row: usize, content: &str) -> ScoredDocument {
        ScoredDocument {
            document: Document::new(row, "kb.csv", content),
            score: 1.0,
        }
    }

    #[test]
    fn test_format_docs_joins_with_blank_line() {
        let context = vec![scored(0, "question: a\nanswer: b"), scored(1, "question: c\nanswer: d")];
        assert_eq!(
            PromptComposer::format_docs(&context),
            "question: a\nanswer: b\n\nquestion: c\nanswer: d"
        );
    }

    #[test]
    fn test_compose_contains_question_and_context() {
        let context = vec![scored(0, "question: Jam buka?\nanswer: 08.00-16.00")];
        let prompt = PromptComposer::compose(&context, "Kapan kantor buka?");

        assert!(prompt.contains("Pertanyaan: Kapan kantor buka?"));
        assert!(prompt.contains("Konteks: question: Jam buka?\nanswer: 08.00-16.00"));
        assert!(prompt.starts_with("Anda adalah asisten"));
        assert!(prompt.ends_with("Jawaban:"));
    }

    #[test]
    fn test_compose_is_deterministic() {
        let context = vec![scored(0, "x"), scored(1, "y")];
        assert_eq!(
            PromptComposer::compose(&context, "q"),
            PromptComposer::compose(&context, "q")
        );
    }

    #[test]
    fn test_empty_context() {
        let prompt = PromptComposer::compose(&[], "Halo?");
        assert!(prompt.contains("Pertanyaan: Halo?\nKonteks: \n"));
    }
}
