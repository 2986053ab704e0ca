//! React agent - explicit reason-act-observe loop
//!
//! Each round asks the model for a thought and an action, dispatches the
//! tool, and records the step as a synthetic assistant turn plus a system
//! observation turn. The loop ends on a `Final Answer` action or when the
//! round budget runs out.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::agent::lifecycle::LifecycleHooks;
use crate::agent::runtime::AgentRuntime;
use crate::agent::state::AgentState;
use crate::agent::Agent;
use crate::core::{AgentConfig, Error, Message, Result};
use crate::llm::LlmClient;
use crate::protocol::{self, ReactAction};
use crate::tools::ToolRegistry;

const NAME: &str = "react";

const DESCRIPTION: &str = "Works through a reason-act-observe cycle; suited to \
multi-step reasoning and exploratory tasks that need repeated attempts";

/// Returned when the round budget runs out without a final answer
pub const ROUND_LIMIT_RESULT: &str = "Round limit reached, task incomplete";

const SYSTEM_PROMPT: &str = "You are an assistant that works in a \
reason-act-observe cycle. Think first, then act, then observe the result \
before deciding the next step.";

/// Agent running the bounded reason-act-observe loop
pub struct ReactAgent {
    runtime: AgentRuntime,
    max_rounds: usize,
}

impl ReactAgent {
    /// Create a react agent
    pub fn new(llm: Arc<dyn LlmClient>, tools: Arc<ToolRegistry>, config: &AgentConfig) -> Self {
        Self {
            runtime: AgentRuntime::new(NAME, llm, tools, config),
            max_rounds: config.react_max_rounds,
        }
    }

    /// Create a react agent with lifecycle hooks
    pub fn with_hooks(
        llm: Arc<dyn LlmClient>,
        tools: Arc<ToolRegistry>,
        config: &AgentConfig,
        hooks: LifecycleHooks,
    ) -> Self {
        Self {
            runtime: AgentRuntime::with_hooks(NAME, llm, tools, config, hooks),
            max_rounds: config.react_max_rounds,
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

    fn opening_prompt(&self, task: &str) -> String {
        format!(
            "Solve the task using the available tools.\n\n\
             Available tools:\n{}\n\n\
             Respond in exactly this format:\n\
             Thought: reasoning about the next step\n\
             Action: tool_name\n\
             Action Input: {{\"arg\": \"value\"}}\n\
             Observation: tool output\n\
             ... (repeat until the task is complete)\n\
             Thought: the task is complete\n\
             Final Answer: the result\n\n\
             User input: {}",
            self.runtime.tools().catalog(),
            task
        )
    }
}

#[async_trait]
impl Agent for ReactAgent {
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
        let mut messages = vec![
            Message::system(SYSTEM_PROMPT),
            Message::user(self.opening_prompt(task)),
        ];

        for round in 0..self.max_rounds {
            let reply = self.runtime.llm().complete(&messages).await?;
            let step = protocol::parse_react(&reply.content)?;

            let action = match step.action {
                ReactAction::FinalAnswer(answer) => return Ok(answer),
                ReactAction::Tool(action) => action,
            };

            debug!(agent = %self.name(), round, tool = %action.tool_name, "react round");

            let tool = self.runtime.tools().get(&action.tool_name)?;
            let input = Value::Object(action.arguments.clone());
            let output = tool
                .run(cancel, input.clone())
                .await
                .map_err(|e| Error::tool_failed(&action.tool_name, e))?;

            let observation = protocol::render_value(&output);
            messages.push(Message::assistant(format!(
                "Thought: {}\nAction: {}\nAction Input: {}",
                step.thought, action.tool_name, input
            )));
            messages.push(Message::system(format!("Observation: {}", observation)));
        }

        Ok(ROUND_LIMIT_RESULT.to_string())
    }
}
