// Text generation: rewrite, job-match scoring and the career assistant.
// All LLM calls go through llm_client; nothing here talks to the API directly.

pub mod generator;
pub mod handlers;
pub mod profile_text;
pub mod prompts;

pub use generator::{LlmTextGenerator, TextGenerator};
