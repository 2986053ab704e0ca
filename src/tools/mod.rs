//! Tools module - invocable capabilities for agents
//!
//! Every tool exposes the same `run(cancel, input) -> output` contract
//! over JSON values; the registry routes dispatch by name.

pub mod file_ops;
pub mod http_fetch;
pub mod registry;
pub mod shell;
pub mod str_ops;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

use crate::core::{Error, Result};

pub use file_ops::FileOpsTool;
pub use http_fetch::HttpFetchTool;
pub use registry::ToolRegistry;
pub use shell::ShellTool;
pub use str_ops::StrOpsTool;

/// An invocable capability with a uniform run contract
#[async_trait]
pub trait Tool: Send + Sync {
    /// Registered name of the tool
    fn name(&self) -> &str;

    /// One-line description shown to the model
    fn description(&self) -> &str;

    /// Execute the tool with a structured input value
    async fn run(&self, cancel: &CancellationToken, input: Value) -> Result<Value>;
}

/// Interpret a tool input as a JSON object
pub(crate) fn object_args(tool: &str, input: &Value) -> Result<Map<String, Value>> {
    input
        .as_object()
        .cloned()
        .ok_or_else(|| Error::invalid_args(tool, "input must be a JSON object"))
}

/// Fetch a required string argument
pub(crate) fn require_str(tool: &str, args: &Map<String, Value>, key: &str) -> Result<String> {
    args.get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| Error::invalid_args(tool, format!("missing string argument `{}`", key)))
}
