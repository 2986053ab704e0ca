//! Shared types used across Ensemble modules
//!
//! Contains conversation messages and orchestration result types.

use serde::{Deserialize, Serialize};

/// A message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender (user, system, assistant, tool)
    pub role: String,
    /// Content of the message
    pub content: String,
}

impl Message {
    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Create a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }

    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create a new tool message
    pub fn tool(content: impl Into<String>) -> Self {
        Self {
            role: "tool".to_string(),
            content: content.into(),
        }
    }
}

/// The output of one agent within a flow run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentResult {
    /// Name of the agent that produced this result
    pub agent_name: String,
    /// The agent's textual answer
    pub result: String,
}

impl AgentResult {
    /// Create a new agent result
    pub fn new(agent_name: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            result: result.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        assert_eq!(Message::user("hi").role, "user");
        assert_eq!(Message::assistant("hi").role, "assistant");
        assert_eq!(Message::system("hi").role, "system");
        assert_eq!(Message::tool("out").role, "tool");
    }

    #[test]
    fn test_message_serialization() {
        let msg = Message::user("hello");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"role\":\"user\""));
        assert!(json.contains("\"content\":\"hello\""));
    }
}
