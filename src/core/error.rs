//! Custom error types for Ensemble
//!
//! Provides a unified error handling system across all modules.

use thiserror::Error;

/// Main error type for Ensemble operations
#[derive(Error, Debug)]
pub enum Error {
    /// Illegal agent state change
    #[error("invalid state transition from {from} to {to}")]
    Transition { from: String, to: String },

    /// A lifecycle hook rejected its transition
    #[error("lifecycle hook for {target} failed: {message}")]
    Hook { target: String, message: String },

    /// Action protocol text does not match the grammar
    #[error("protocol parse error: {message} (in: {text:?})")]
    Parse { message: String, text: String },

    /// No tool registered under the requested name
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// A tool was found but its invocation failed
    #[error("tool '{tool}' failed: {source}")]
    ToolFailed {
        tool: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A tool rejected its input before running
    #[error("invalid arguments for tool '{tool}': {message}")]
    InvalidArgs { tool: String, message: String },

    /// Model completion call errors
    #[error("model call failed: {0}")]
    Llm(String),

    /// The selection step named an agent that is not registered
    #[error("unknown agent selected: {0}")]
    UnknownAgent(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error for other cases
    #[error("{0}")]
    Other(String),
}

/// Convenience Result type for Ensemble operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a transition error
    pub fn transition(from: impl std::fmt::Display, to: impl std::fmt::Display) -> Self {
        Self::Transition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Create a hook failure error
    pub fn hook(target: impl std::fmt::Display, message: impl Into<String>) -> Self {
        Self::Hook {
            target: target.to_string(),
            message: message.into(),
        }
    }

    /// Create a parse error carrying the offending text
    pub fn parse(message: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            text: text.into(),
        }
    }

    /// Wrap a tool invocation failure with the tool's name
    pub fn tool_failed<E>(tool: impl Into<String>, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::ToolFailed {
            tool: tool.into(),
            source: source.into(),
        }
    }

    /// Create an invalid-arguments error for a tool
    pub fn invalid_args(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgs {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create a model call error
    pub fn llm(msg: impl Into<String>) -> Self {
        Self::Llm(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
