//! Agent runtime - lifecycle-driven step loop and tool dispatch
//!
//! The runtime owns the pieces every agent is composed from: the lifecycle
//! state machine, the conversation log, the model client and the tool
//! registry. Concrete agents supply `think`/`act` behavior on top.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::agent::conversation::ConversationLog;
use crate::agent::events::AgentEvent;
use crate::agent::lifecycle::{Lifecycle, LifecycleHooks};
use crate::agent::state::AgentState;
use crate::agent::Agent;
use crate::core::{AgentConfig, Error, Message, Result};
use crate::llm::LlmClient;
use crate::protocol;
use crate::tools::ToolRegistry;

/// Shared agent internals: state machine, log, model and tools
pub struct AgentRuntime {
    name: String,
    max_steps: usize,
    duplicate_threshold: usize,
    steps_taken: AtomicUsize,
    lifecycle: Lifecycle,
    conversation: Mutex<ConversationLog>,
    events: Mutex<Option<mpsc::Receiver<AgentEvent>>>,
    llm: Arc<dyn LlmClient>,
    tools: Arc<ToolRegistry>,
}

impl AgentRuntime {
    /// Create a runtime with no lifecycle hooks
    pub fn new(
        name: impl Into<String>,
        llm: Arc<dyn LlmClient>,
        tools: Arc<ToolRegistry>,
        config: &AgentConfig,
    ) -> Self {
        Self::with_hooks(name, llm, tools, config, LifecycleHooks::default())
    }

    /// Create a runtime with lifecycle hooks
    pub fn with_hooks(
        name: impl Into<String>,
        llm: Arc<dyn LlmClient>,
        tools: Arc<ToolRegistry>,
        config: &AgentConfig,
        hooks: LifecycleHooks,
    ) -> Self {
        let name = name.into();
        let (lifecycle, events) = Lifecycle::new(name.clone(), hooks);

        Self {
            name,
            max_steps: config.max_steps,
            duplicate_threshold: config.duplicate_threshold,
            steps_taken: AtomicUsize::new(0),
            lifecycle,
            conversation: Mutex::new(ConversationLog::new()),
            events: Mutex::new(Some(events)),
            llm,
            tools,
        }
    }

    /// Agent name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current lifecycle state
    pub fn state(&self) -> AgentState {
        self.lifecycle.state()
    }

    /// The lifecycle state machine
    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    /// Steps consumed by the current run
    pub fn steps_taken(&self) -> usize {
        self.steps_taken.load(Ordering::Relaxed)
    }

    /// The model client
    pub fn llm(&self) -> &Arc<dyn LlmClient> {
        &self.llm
    }

    /// The tool registry
    pub fn tools(&self) -> &Arc<ToolRegistry> {
        &self.tools
    }

    /// Snapshot of the conversation log
    pub fn conversation(&self) -> ConversationLog {
        self.conversation
            .lock()
            .expect("conversation lock poisoned")
            .clone()
    }

    /// Take the event receiver; yields `None` after the first call
    pub fn take_events(&self) -> Option<mpsc::Receiver<AgentEvent>> {
        self.events.lock().expect("events lock poisoned").take()
    }

    /// Drive a full agent run: Initializing, Running, then up to
    /// `max_steps` think/act iterations.
    ///
    /// Cancellation is observed between iterations and moves the agent to
    /// Terminated. A failing step moves the agent to Error and returns the
    /// step's error. Stalling (the same act result repeated
    /// `duplicate_threshold` times) finishes the run early.
    pub async fn run<A: Agent + ?Sized>(
        &self,
        agent: &A,
        cancel: &CancellationToken,
        task: &str,
    ) -> Result<()> {
        self.lifecycle.set_state(AgentState::Initializing)?;
        self.lifecycle.set_state(AgentState::Running)?;
        info!(agent = %self.name, "run started");

        for step in 0..self.max_steps {
            if cancel.is_cancelled() {
                info!(agent = %self.name, step, "run canceled");
                return self.lifecycle.set_state(AgentState::Terminated);
            }

            self.steps_taken.store(step + 1, Ordering::Relaxed);

            let should_act = match agent.think(cancel).await {
                Ok(should_act) => should_act,
                Err(e) => return self.fail(e),
            };

            if !should_act {
                continue;
            }

            let result = match agent.act(cancel, task).await {
                Ok(result) => result,
                Err(e) => return self.fail(e),
            };

            let stalled = {
                let mut log = self.conversation.lock().expect("conversation lock poisoned");
                log.add_assistant(&result);
                log.is_stalled(self.duplicate_threshold)
            };

            if stalled {
                info!(agent = %self.name, step, "stall detected, finishing early");
                return self.lifecycle.set_state(AgentState::Finished);
            }
        }

        info!(agent = %self.name, "step budget exhausted");
        self.lifecycle.set_state(AgentState::Finished)
    }

    /// One action round trip: prompt the model, parse the requested
    /// action, dispatch the tool, then feed the observation back. Repeats
    /// while the model keeps requesting actions and returns its final
    /// text.
    pub async fn dispatch(&self, cancel: &CancellationToken, task: &str) -> Result<String> {
        let opening = self.action_prompt(task);
        let mut reply = self.llm.complete(&[Message::user(opening)]).await?;

        loop {
            let action = protocol::parse_action(&reply.content)?;
            let tool = self.tools.get(&action.tool_name)?;

            debug!(agent = %self.name, tool = %action.tool_name, "dispatching tool");
            let output = tool
                .run(cancel, Value::Object(action.arguments))
                .await
                .map_err(|e| Error::tool_failed(&action.tool_name, e))?;

            let observation = protocol::render_value(&output);
            let follow_up = self.observation_prompt(&observation);
            reply = self.llm.complete(&[Message::user(follow_up)]).await?;

            if !protocol::contains_action(&reply.content) {
                return Ok(reply.content);
            }
        }
    }

    fn fail(&self, error: Error) -> Result<()> {
        self.lifecycle.record_error(error.to_string());
        if let Err(hook_err) = self.lifecycle.set_state(AgentState::Error) {
            warn!(agent = %self.name, %hook_err, "could not enter Error state");
        }
        Err(error)
    }

    fn action_prompt(&self, task: &str) -> String {
        format!(
            "You are an assistant that completes tasks by invoking tools. \
             Analyze the user input and pick the right tool.\n\n\
             Available tools:\n{}\n\n\
             Respond in exactly this format:\n\
             Thought: reasoning about the next step\n\
             Action: tool_name\n\
             Action Input: {{\"arg\": \"value\"}}\n\n\
             User input: {}",
            self.tools.catalog(),
            task
        )
    }

    fn observation_prompt(&self, observation: &str) -> String {
        format!(
            "Tool output: {}\n\n\
             Decide the next step based on the tool output. If another tool \
             call is needed, respond in exactly this format:\n\
             Thought: reasoning about the next step\n\
             Action: tool_name\n\
             Action Input: {{\"arg\": \"value\"}}\n\n\
             If the task is complete, respond with the final result directly.",
            observation
        )
    }
}
