//! CLI commands
//!
//! Special commands that can be executed in the REPL.

use crate::flow::Flow;
use crate::tools::ToolRegistry;

/// Result of parsing a command
pub enum CommandResult {
    /// Continue processing as a task
    Continue(String),
    /// Command was handled, show output
    Handled(String),
    /// Exit the REPL
    Exit,
}

/// Parse and handle special commands
pub fn handle_command(input: &str, flow: &Flow, tools: &ToolRegistry) -> CommandResult {
    let input = input.trim();

    match input {
        "/exit" | "/quit" | "/q" => CommandResult::Exit,

        "/help" | "/?" => CommandResult::Handled(help_text()),

        "/agents" => {
            let listing = flow
                .agent_names()
                .iter()
                .map(|name| format!("  - {}", name))
                .collect::<Vec<_>>()
                .join("\n");
            CommandResult::Handled(format!("Registered agents:\n{}", listing))
        }

        "/tools" => CommandResult::Handled(format!("Registered tools:\n{}", tools.catalog())),

        _ => {
            if input.starts_with('/') {
                CommandResult::Handled(format!(
                    "Unknown command: {}. Type /help for available commands.",
                    input
                ))
            } else {
                CommandResult::Continue(input.to_string())
            }
        }
    }
}

/// Generate help text
fn help_text() -> String {
    r#"Ensemble Commands:
─────────────────────────────────────────────
  /help, /?        Show this help message
  /exit, /quit     Exit Ensemble
  /agents          List registered agents
  /tools           List registered tools

Anything else is executed as a task: the flow
selects the participating agents, runs them in
parallel and merges their results.

Keyboard Shortcuts:
  Ctrl+C           Cancel the running flow
  Ctrl+D           Exit Ensemble
─────────────────────────────────────────────"#
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{Agent, AgentState};
    use crate::core::{Config, Result};
    use crate::llm::mock::MockClient;
    use crate::llm::LlmClient;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio_util::sync::CancellationToken;

    struct NoopAgent;

    #[async_trait]
    impl Agent for NoopAgent {
        fn name(&self) -> &str {
            "noop"
        }

        fn description(&self) -> &str {
            "does nothing"
        }

        fn state(&self) -> AgentState {
            AgentState::Idle
        }

        async fn act(&self, _cancel: &CancellationToken, _task: &str) -> Result<String> {
            Ok(String::new())
        }
    }

    fn fixtures() -> (Flow, ToolRegistry) {
        let mut agents: HashMap<String, Arc<dyn Agent>> = HashMap::new();
        agents.insert("noop".to_string(), Arc::new(NoopAgent));
        let mock = Arc::new(MockClient::new(Vec::<String>::new()));
        let flow = Flow::new(agents, mock as Arc<dyn LlmClient>).unwrap();
        (flow, ToolRegistry::with_default_tools(&Config::default()))
    }

    #[test]
    fn test_exit_command() {
        let (flow, tools) = fixtures();
        assert!(matches!(
            handle_command("/exit", &flow, &tools),
            CommandResult::Exit
        ));
    }

    #[test]
    fn test_agents_listing() {
        let (flow, tools) = fixtures();
        match handle_command("/agents", &flow, &tools) {
            CommandResult::Handled(output) => assert!(output.contains("noop")),
            _ => panic!("expected handled output"),
        }
    }

    #[test]
    fn test_plain_input_is_a_task() {
        let (flow, tools) = fixtures();
        match handle_command("summarize the report", &flow, &tools) {
            CommandResult::Continue(task) => assert_eq!(task, "summarize the report"),
            _ => panic!("expected task passthrough"),
        }
    }

    #[test]
    fn test_unknown_slash_command() {
        let (flow, tools) = fixtures();
        match handle_command("/bogus", &flow, &tools) {
            CommandResult::Handled(output) => assert!(output.contains("Unknown command")),
            _ => panic!("expected handled output"),
        }
    }
}
