//! Agent lifecycle: validated state transitions plus hooks
//!
//! State mutation is serialized under a per-agent lock. A registered hook
//! runs synchronously inside the transition that targets its state; if the
//! hook fails the transition is abandoned and the failure becomes the
//! agent's last error.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde_json::json;
use tracing::debug;

use crate::agent::events::{AgentEvent, EventBus};
use crate::agent::state::AgentState;
use crate::core::{Error, Result};

/// A transition callback
pub type Hook = Box<dyn Fn() -> Result<()> + Send + Sync>;

/// The error callback; receives the agent's last recorded error, if any
pub type ErrorHook = Box<dyn Fn(Option<&str>) -> Result<()> + Send + Sync>;

/// Optional callbacks, one per transition target
#[derive(Default)]
pub struct LifecycleHooks {
    pub on_init: Option<Hook>,
    pub on_start: Option<Hook>,
    pub on_pause: Option<Hook>,
    pub on_resume: Option<Hook>,
    pub on_stop: Option<Hook>,
    pub on_error: Option<ErrorHook>,
    pub on_complete: Option<Hook>,
}

/// Per-agent state machine with hooks and event emission
pub struct Lifecycle {
    name: String,
    state: Mutex<AgentState>,
    hooks: LifecycleHooks,
    events: EventBus,
    last_error: Mutex<Option<String>>,
    started_at: Mutex<Option<Instant>>,
    ended_at: Mutex<Option<Instant>>,
}

impl Lifecycle {
    /// Create a lifecycle starting in `Idle`, returning the event receiver
    pub fn new(
        name: impl Into<String>,
        hooks: LifecycleHooks,
    ) -> (Self, tokio::sync::mpsc::Receiver<AgentEvent>) {
        let (events, rx) = EventBus::new();
        (
            Self {
                name: name.into(),
                state: Mutex::new(AgentState::Idle),
                hooks,
                events,
                last_error: Mutex::new(None),
                started_at: Mutex::new(None),
                ended_at: Mutex::new(None),
            },
            rx,
        )
    }

    /// Current state
    pub fn state(&self) -> AgentState {
        *self.state.lock().expect("state lock poisoned")
    }

    /// Last recorded error message, if any
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().expect("error lock poisoned").clone()
    }

    /// Record an error message without changing state
    pub fn record_error(&self, message: impl Into<String>) {
        *self.last_error.lock().expect("error lock poisoned") = Some(message.into());
    }

    /// Attempt a transition to `target`.
    ///
    /// Validates against the transition table, runs the target's hook, then
    /// applies the change and emits a `state_change` event. On an illegal
    /// transition or a hook failure the state is left unchanged.
    pub fn set_state(&self, target: AgentState) -> Result<()> {
        let mut state = self.state.lock().expect("state lock poisoned");
        let from = *state;

        if !from.can_transition_to(target) {
            return Err(Error::transition(from, target));
        }

        if let Err(e) = self.run_hook(target) {
            self.record_error(e.to_string());
            return Err(Error::hook(target, e.to_string()));
        }

        *state = target;
        drop(state);

        match target {
            AgentState::Running => {
                let mut started = self.started_at.lock().expect("time lock poisoned");
                if started.is_none() {
                    *started = Some(Instant::now());
                }
            }
            t if t.is_terminal() => {
                *self.ended_at.lock().expect("time lock poisoned") = Some(Instant::now());
            }
            _ => {}
        }

        debug!(agent = %self.name, %from, to = %target, "state change");
        self.events.emit(
            "state_change",
            json!({"from": from.to_string(), "to": target.to_string()}),
        );

        Ok(())
    }

    /// Time spent between entering Running and reaching a terminal state
    pub fn execution_time(&self) -> Option<Duration> {
        let started = (*self.started_at.lock().expect("time lock poisoned"))?;
        let ended = *self.ended_at.lock().expect("time lock poisoned");
        Some(ended.unwrap_or_else(Instant::now).duration_since(started))
    }

    /// Events dropped because the channel was full
    pub fn dropped_events(&self) -> u64 {
        self.events.dropped()
    }

    fn run_hook(&self, target: AgentState) -> Result<()> {
        match target {
            AgentState::Initializing => run(&self.hooks.on_init),
            AgentState::Running => run(&self.hooks.on_start),
            AgentState::Paused => run(&self.hooks.on_pause),
            AgentState::Resuming => run(&self.hooks.on_resume),
            AgentState::Terminated => run(&self.hooks.on_stop),
            AgentState::Finished => run(&self.hooks.on_complete),
            AgentState::Error => match &self.hooks.on_error {
                Some(hook) => hook(self.last_error().as_deref()),
                None => Ok(()),
            },
            AgentState::Idle => Ok(()),
        }
    }
}

fn run(hook: &Option<Hook>) -> Result<()> {
    match hook {
        Some(hook) => hook(),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn lifecycle(hooks: LifecycleHooks) -> Lifecycle {
        Lifecycle::new("test", hooks).0
    }

    #[test]
    fn test_legal_path() {
        let lc = lifecycle(LifecycleHooks::default());
        assert_eq!(lc.state(), AgentState::Idle);

        lc.set_state(AgentState::Initializing).unwrap();
        lc.set_state(AgentState::Running).unwrap();
        lc.set_state(AgentState::Paused).unwrap();
        lc.set_state(AgentState::Resuming).unwrap();
        lc.set_state(AgentState::Running).unwrap();
        lc.set_state(AgentState::Finished).unwrap();
        assert_eq!(lc.state(), AgentState::Finished);
    }

    #[test]
    fn test_illegal_transition_leaves_state() {
        let lc = lifecycle(LifecycleHooks::default());

        let err = lc.set_state(AgentState::Running).unwrap_err();
        assert!(matches!(err, Error::Transition { .. }));
        assert_eq!(lc.state(), AgentState::Idle);
    }

    #[test]
    fn test_terminal_states_reject_everything() {
        let lc = lifecycle(LifecycleHooks::default());
        lc.set_state(AgentState::Initializing).unwrap();
        lc.set_state(AgentState::Error).unwrap();

        for target in AgentState::ALL {
            assert!(lc.set_state(target).is_err());
        }
        assert_eq!(lc.state(), AgentState::Error);
    }

    #[test]
    fn test_hook_invoked_on_transition() {
        let count = Arc::new(AtomicUsize::new(0));
        let hook_count = Arc::clone(&count);

        let hooks = LifecycleHooks {
            on_init: Some(Box::new(move || {
                hook_count.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })),
            ..Default::default()
        };

        let lc = lifecycle(hooks);
        lc.set_state(AgentState::Initializing).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_hook_failure_aborts_transition() {
        let hooks = LifecycleHooks {
            on_start: Some(Box::new(|| Err(Error::other("refused")))),
            ..Default::default()
        };

        let lc = lifecycle(hooks);
        lc.set_state(AgentState::Initializing).unwrap();

        let err = lc.set_state(AgentState::Running).unwrap_err();
        assert!(matches!(err, Error::Hook { .. }));
        assert_eq!(lc.state(), AgentState::Initializing);
        assert!(lc.last_error().unwrap().contains("refused"));
    }

    #[test]
    fn test_error_hook_sees_last_error() {
        let seen = Arc::new(Mutex::new(None::<String>));
        let hook_seen = Arc::clone(&seen);

        let hooks = LifecycleHooks {
            on_error: Some(Box::new(move |err| {
                *hook_seen.lock().unwrap() = err.map(|e| e.to_string());
                Ok(())
            })),
            ..Default::default()
        };

        let lc = lifecycle(hooks);
        lc.set_state(AgentState::Initializing).unwrap();
        lc.record_error("model exploded");
        lc.set_state(AgentState::Error).unwrap();

        assert_eq!(seen.lock().unwrap().as_deref(), Some("model exploded"));
    }

    #[test]
    fn test_state_change_events() {
        let (lc, mut rx) = Lifecycle::new("test", LifecycleHooks::default());
        lc.set_state(AgentState::Initializing).unwrap();
        lc.set_state(AgentState::Running).unwrap();

        let first = rx.try_recv().unwrap();
        assert_eq!(first.kind, "state_change");
        assert_eq!(first.payload["from"], "Idle");
        assert_eq!(first.payload["to"], "Initializing");

        let second = rx.try_recv().unwrap();
        assert_eq!(second.payload["to"], "Running");
    }
}
