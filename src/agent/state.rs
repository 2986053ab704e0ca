//! Agent execution states and the legal transition table

use serde::{Deserialize, Serialize};
use std::fmt;

/// Agent execution states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentState {
    /// Constructed, nothing started yet
    Idle,
    /// Lifecycle setup in progress
    Initializing,
    /// Step loop executing
    Running,
    /// Suspended, waiting for a resume
    Paused,
    /// Resume in progress
    Resuming,
    /// Completed normally or stalled out (terminal)
    Finished,
    /// Unrecovered failure (terminal)
    Error,
    /// Externally canceled (terminal)
    Terminated,
}

impl AgentState {
    /// All states, in declaration order
    pub const ALL: [AgentState; 8] = [
        AgentState::Idle,
        AgentState::Initializing,
        AgentState::Running,
        AgentState::Paused,
        AgentState::Resuming,
        AgentState::Finished,
        AgentState::Error,
        AgentState::Terminated,
    ];

    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AgentState::Finished | AgentState::Error | AgentState::Terminated
        )
    }

    /// Legal transition targets from this state
    pub fn legal_targets(&self) -> &'static [AgentState] {
        use AgentState::*;
        match self {
            Idle => &[Initializing, Terminated],
            Initializing => &[Running, Error],
            Running => &[Paused, Finished, Error],
            Paused => &[Resuming, Terminated],
            Resuming => &[Running, Error],
            Finished | Error | Terminated => &[],
        }
    }

    /// Whether a transition to `target` is allowed
    pub fn can_transition_to(&self, target: AgentState) -> bool {
        self.legal_targets().contains(&target)
    }
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AgentState::Idle => "Idle",
            AgentState::Initializing => "Initializing",
            AgentState::Running => "Running",
            AgentState::Paused => "Paused",
            AgentState::Resuming => "Resuming",
            AgentState::Finished => "Finished",
            AgentState::Error => "Error",
            AgentState::Terminated => "Terminated",
        };
        write!(f, "{}", name)
    }
}
