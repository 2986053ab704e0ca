//! Agent module - lifecycle, conversation and agent behavior
//!
//! An agent pairs a model-driven decision loop with a set of invocable
//! tools. Concrete agents are composed from an [`AgentRuntime`] rather
//! than inheriting shared behavior.

pub mod conversation;
pub mod events;
pub mod lifecycle;
pub mod manus;
pub mod react;
pub mod runtime;
pub mod state;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::core::Result;

pub use conversation::ConversationLog;
pub use events::{AgentEvent, EventBus, EVENT_CAPACITY};
pub use lifecycle::{ErrorHook, Hook, Lifecycle, LifecycleHooks};
pub use manus::ManusAgent;
pub use react::ReactAgent;
pub use runtime::AgentRuntime;
pub use state::AgentState;

/// A worker that can take on a task
#[async_trait]
pub trait Agent: Send + Sync {
    /// Registered name of the agent
    fn name(&self) -> &str;

    /// Capability description shown during flow selection
    fn description(&self) -> &str;

    /// Current lifecycle state
    fn state(&self) -> AgentState;

    /// Decide whether an action is warranted this step
    async fn think(&self, _cancel: &CancellationToken) -> Result<bool> {
        Ok(false)
    }

    /// Perform one act operation against the task and return its text
    async fn act(&self, cancel: &CancellationToken, task: &str) -> Result<String>;
}
