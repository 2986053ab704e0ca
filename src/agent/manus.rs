//! Manus agent - tool-using generalist
//!
//! Acts by asking the model for an action, dispatching the requested tool
//! and feeding the observation back until the model stops requesting
//! actions.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::agent::lifecycle::LifecycleHooks;
use crate::agent::runtime::AgentRuntime;
use crate::agent::state::AgentState;
use crate::agent::Agent;
use crate::core::{AgentConfig, Result};
use crate::llm::LlmClient;
use crate::tools::ToolRegistry;

const NAME: &str = "manus";

const DESCRIPTION: &str = "Generalist that solves multi-step problems by invoking tools; \
suited to file operations, code generation and tasks that need precise execution";

/// The default tool-dispatching agent
pub struct ManusAgent {
    runtime: AgentRuntime,
}

impl ManusAgent {
    /// Create a manus agent
    pub fn new(llm: Arc<dyn LlmClient>, tools: Arc<ToolRegistry>, config: &AgentConfig) -> Self {
        Self {
            runtime: AgentRuntime::new(NAME, llm, tools, config),
        }
    }

    /// Create a manus agent with lifecycle hooks
    pub fn with_hooks(
        llm: Arc<dyn LlmClient>,
        tools: Arc<ToolRegistry>,
        config: &AgentConfig,
        hooks: LifecycleHooks,
    ) -> Self {
        Self {
            runtime: AgentRuntime::with_hooks(NAME, llm, tools, config, hooks),
        }
    }

    /// The agent's runtime
    pub fn runtime(&self) -> &AgentRuntime {
        &self.runtime
    }

    /// Drive a full lifecycle run against the task
    pub async fn run(&self, cancel: &CancellationToken, task: &str) -> Result<()> {
        self.runtime.run(self, cancel, task).await
    }
}

#[async_trait]
impl Agent for ManusAgent {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn state(&self) -> AgentState {
        self.runtime.state()
    }

    async fn think(&self, _cancel: &CancellationToken) -> Result<bool> {
        Ok(true)
    }

    async fn act(&self, cancel: &CancellationToken, task: &str) -> Result<String> {
        self.runtime.dispatch(cancel, task).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::mock::MockClient;
    use crate::tools::Tool;
    use serde_json::Value;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Returns the `text` argument"
        }

        async fn run(&self, _cancel: &CancellationToken, input: Value) -> Result<Value> {
            Ok(input["text"].clone())
        }
    }

    fn agent(replies: Vec<&str>) -> ManusAgent {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));
        ManusAgent::new(
            Arc::new(MockClient::new(replies)),
            Arc::new(registry),
            &AgentConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_act_dispatches_and_returns_final_text() {
        let manus = agent(vec![
            "Thought: echo it\nAction: echo\nAction Input: {\"text\": \"hi\"}",
            "Echoed: hi",
        ]);

        let result = manus.act(&CancellationToken::new(), "say hi").await.unwrap();
        assert_eq!(result, "Echoed: hi");
        assert_eq!(manus.name(), "manus");
    }

    #[tokio::test]
    async fn test_starts_idle() {
        let manus = agent(vec![]);
        assert_eq!(manus.state(), AgentState::Idle);
        assert_eq!(manus.runtime().steps_taken(), 0);
    }

    #[tokio::test]
    async fn test_full_run_reaches_finished() {
        // Each step does one dispatch round; replies repeat so the run
        // stalls after three identical results.
        let mut replies = Vec::new();
        for _ in 0..3 {
            replies.push("Action: echo\nAction Input: {\"text\": \"same\"}");
            replies.push("same answer");
        }
        let manus = agent(replies);

        manus.run(&CancellationToken::new(), "task").await.unwrap();
        assert_eq!(manus.state(), AgentState::Finished);
    }
}
