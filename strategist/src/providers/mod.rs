//! Text-generation backends.

#[cfg(feature = "http")]
mod openai;

#[cfg(feature = "http")]
pub use openai::{ChatMessage, OpenAiCompatibleGenerator};
