//! Gemini REST providers: `generateContent` for completions and
//! `embedContent` for embeddings. Both share [`GeminiConfig`].

mod completion;
mod config;
mod convert;
mod embedding;

pub use completion::GeminiCompletionModel;
pub use config::GeminiConfig;
pub use embedding::GeminiEmbeddingModel;
