//! Core module - shared types, configuration, and errors

pub mod config;
pub mod error;
pub mod types;

pub use config::{AgentConfig, Config, LlmConfig, LogConfig, ToolsConfig};
pub use error::{Error, Result};
pub use types::{AgentResult, Message};
