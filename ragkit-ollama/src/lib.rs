//! Ollama model provider for RagKit.
//!
//! [`OllamaClient`] implements
//! [`ModelProvider`](ragkit_core::ModelProvider) against a local Ollama
//! server: single and batched embeddings, chat-based answer generation
//! grounded in retrieved chunks, an availability probe, and model
//! listing.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ragkit_ollama::OllamaClient;
//!
//! let provider = OllamaClient::default()
//!     .with_model("llama3.2")
//!     .with_embedding_model("nomic-embed-text");
//! let embedding = provider.embed("hello world").await?;
//! ```

mod client;
mod prompt;

pub use client::OllamaClient;
pub use prompt::{SYSTEM_PROMPT, build_context_prompt};
