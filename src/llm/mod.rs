//! LLM module - language model completion calls
//!
//! Provides the completion trait consumed by agents and flows, plus the
//! OpenAI-compatible HTTP client implementation.

pub mod client;

use async_trait::async_trait;

use crate::core::{Message, Result};

pub use client::ChatClient;

/// A synchronous completion call: ordered messages in, one choice out
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Request a completion for the given conversation
    async fn complete(&self, messages: &[Message]) -> Result<Message>;
}
