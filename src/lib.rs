//! Ensemble - multi-agent orchestration runtime
//!
//! Coordinates autonomous agents, each wrapping a language-model decision
//! loop plus a set of invocable tools, to jointly complete a single task.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **LLM**: Completion trait with an OpenAI-compatible client
//! - **Protocol**: Line-oriented action grammar between model and tools
//! - **Tools**: Tool trait, registry, and the standard tool set
//! - **Agent**: Lifecycle state machine, conversation log, and agents
//! - **Flow**: Concurrent select/dispatch/merge orchestration
//! - **CLI**: Command-line interface and REPL
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! use ensemble::agent::{Agent, ManusAgent, ReactAgent};
//! use ensemble::llm::ChatClient;
//! use ensemble::tools::ToolRegistry;
//! use ensemble::{Config, Flow};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::load();
//!     let llm = Arc::new(ChatClient::from_config(&config));
//!     let tools = Arc::new(ToolRegistry::with_default_tools(&config));
//!
//!     let mut agents: HashMap<String, Arc<dyn Agent>> = HashMap::new();
//!     agents.insert(
//!         "manus".to_string(),
//!         Arc::new(ManusAgent::new(llm.clone(), tools.clone(), &config.agent)),
//!     );
//!     agents.insert(
//!         "react".to_string(),
//!         Arc::new(ReactAgent::new(llm.clone(), tools.clone(), &config.agent)),
//!     );
//!
//!     let flow = Flow::new(agents, llm).unwrap();
//!     let answer = flow
//!         .execute(&CancellationToken::new(), "summarize README.md")
//!         .await
//!         .unwrap();
//!     println!("{}", answer);
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod core;
pub mod flow;
pub mod llm;
pub mod protocol;
pub mod tools;

// Re-export commonly used items
pub use cli::Repl;
pub use core::{Config, Error, Result};
pub use flow::Flow;
