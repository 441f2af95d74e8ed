// Interview Conversation Engine
// Implements: session state, phase catalog, prompt building, the retrying turn protocol,
// watermark score aggregation and final report synthesis.
// All provider calls go through the `GenerationProvider` trait in llm_client.

pub mod engine;
pub mod error;
pub mod handlers;
pub mod phase;
pub mod prompt_builder;
pub mod prompts;
pub mod questions;
pub mod report;
pub mod scoring;
pub mod session;
pub mod store;
pub mod turn;

#[cfg(test)]
pub mod testing;
