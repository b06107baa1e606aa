pub mod client;
pub mod engine;
pub mod parse;

#[cfg(test)]
pub mod mock;

// Public API exports
pub use client::{ChatMessage, ChatRequest, LlmGateway, ModelConfig, OpenRouterClient, UnavailableGateway};
pub use engine::{precheck_topic, QuizEngine};
