//! Search provider implementations.

pub mod common;
pub mod gemini;

pub use gemini::GeminiProvider;
