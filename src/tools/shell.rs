//! Shell command execution tool

use async_trait::async_trait;
use serde_json::Value;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use crate::core::{Error, Result};
use crate::tools::{object_args, require_str, Tool};

const NAME: &str = "shell";

/// Run a command line under `sh -c` and capture its output
pub struct ShellTool;

impl ShellTool {
    pub fn new() -> Self {
        Self
    }

    fn command_from(input: &Value) -> Result<String> {
        // Accept both a bare command string and {"command": "..."}.
        if let Some(cmd) = input.as_str() {
            return Ok(cmd.to_string());
        }
        let args = object_args(NAME, input)?;
        require_str(NAME, &args, "command")
    }
}

impl Default for ShellTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for ShellTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Run a shell command line and return its combined output"
    }

    async fn run(&self, cancel: &CancellationToken, input: Value) -> Result<Value> {
        let command = Self::command_from(&input)?;

        let child = Command::new("sh")
            .arg("-c")
            .arg(&command)
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let output = tokio::select! {
            result = child.wait_with_output() => result?,
            _ = cancel.cancelled() => {
                return Err(Error::other(format!("shell command canceled: {}", command)));
            }
        };

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            return Err(Error::other(format!(
                "command exited with {}: {}",
                output.status,
                combined.trim_end()
            )));
        }

        Ok(Value::String(combined))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn token() -> CancellationToken {
        CancellationToken::new()
    }

    #[tokio::test]
    async fn test_echo() {
        let tool = ShellTool::new();
        let out = tool
            .run(&token(), json!({"command": "echo hello"}))
            .await
            .unwrap();
        assert_eq!(out, json!("hello\n"));
    }

    #[tokio::test]
    async fn test_string_input() {
        let tool = ShellTool::new();
        let out = tool.run(&token(), json!("printf ok")).await.unwrap();
        assert_eq!(out, json!("ok"));
    }

    #[tokio::test]
    async fn test_nonzero_exit() {
        let tool = ShellTool::new();
        let err = tool.run(&token(), json!({"command": "exit 3"})).await.unwrap_err();
        assert!(err.to_string().contains("exited with"));
    }

    #[tokio::test]
    async fn test_canceled_command() {
        let tool = ShellTool::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = tool
            .run(&cancel, json!({"command": "sleep 30"}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("canceled"));
    }

    #[tokio::test]
    async fn test_missing_command() {
        let tool = ShellTool::new();
        let err = tool.run(&token(), json!({})).await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgs { .. }));
    }
}
