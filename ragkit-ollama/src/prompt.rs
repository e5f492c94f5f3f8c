//! Prompt assembly for answer generation.

use ragkit_core::ScoredChunk;

/// System prompt keeping the model grounded in the retrieved context.
pub const SYSTEM_PROMPT: &str = "\
You are an AI assistant specialized in research and information analysis. \
Answer questions using exclusively the information provided in the context.

Instructions:
- Base your answers only on the provided context
- If the information is not in the context, say so clearly
- Be precise and concise, and always answer in the language of the question
- No greetings or pleasantries, answer directly
- Structure your answer clearly in Markdown
- Never invent facts that are not supported by the context
- If the context is missing or insufficient, answer \"IDK\"";

/// Build the user message: numbered source blocks followed by the
/// question.
pub fn build_context_prompt(query: &str, context: &[ScoredChunk]) -> String {
    let sources = context
        .iter()
        .enumerate()
        .map(|(index, result)| {
            let title = result
                .chunk
                .metadata
                .title
                .as_deref()
                .or(result.chunk.metadata.url.as_deref())
                .unwrap_or("unknown");
            format!("[Source {}: {title}]\n{}", index + 1, result.chunk.content)
        })
        .collect::<Vec<_>>()
        .join("\n\n---\n\n");

    format!("Context:\n{sources}\n\nQuestion: {query}")
}
