//! Flow orchestrator
//!
//! One flow execution asks the model which agents should participate,
//! runs each selected agent concurrently against the task, then asks the
//! model once more to merge the collected results into a single answer.
//! Any worker failure fails the whole call with the first collected error.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::agent::Agent;
use crate::core::{AgentResult, Error, Message, Result};
use crate::llm::LlmClient;

/// Single-shot orchestrator over a fixed set of agents
pub struct Flow {
    agents: HashMap<String, Arc<dyn Agent>>,
    llm: Arc<dyn LlmClient>,
}

/// The model's agent selection response
#[derive(Debug, Deserialize)]
struct Selection {
    agents: Vec<String>,
    #[serde(default)]
    reason: String,
}

impl Flow {
    /// Create a flow over the given agents
    pub fn new(agents: HashMap<String, Arc<dyn Agent>>, llm: Arc<dyn LlmClient>) -> Result<Self> {
        if agents.is_empty() {
            return Err(Error::config("flow requires at least one agent"));
        }
        Ok(Self { agents, llm })
    }

    /// Sorted names of the registered agents
    pub fn agent_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.agents.keys().cloned().collect();
        names.sort();
        names
    }

    /// Execute one task: select participants, run them concurrently, then
    /// merge their results into one answer.
    pub async fn execute(&self, cancel: &CancellationToken, task: &str) -> Result<String> {
        info!(task, "starting flow");

        let selected = self.select_agents(task).await?;
        info!(agents = ?selected, "agents selected");

        let mut workers: JoinSet<Result<AgentResult>> = JoinSet::new();
        for name in &selected {
            // Names were validated during selection.
            let agent = Arc::clone(&self.agents[name]);
            let name = name.clone();
            let task = task.to_string();
            let cancel = cancel.clone();

            workers.spawn(async move {
                debug!(agent = %name, "worker started");
                match agent.act(&cancel, &task).await {
                    Ok(result) => Ok(AgentResult::new(name, result)),
                    Err(e) => {
                        error!(agent = %name, %e, "worker failed");
                        Err(e)
                    }
                }
            });
        }

        // Wait for every worker before deciding the outcome.
        let mut results = Vec::with_capacity(selected.len());
        let mut first_error = None;

        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(Ok(result)) => results.push(result),
                Ok(Err(e)) => {
                    let _ = first_error.get_or_insert(e);
                }
                Err(join_error) => {
                    let _ = first_error
                        .get_or_insert(Error::other(format!("worker panicked: {}", join_error)));
                }
            }
        }

        if let Some(error) = first_error {
            return Err(error);
        }

        self.integrate(task, &results).await
    }

    /// Ask the model which agents should participate. Every returned name
    /// must be registered; an unknown name fails the call before any
    /// worker is spawned.
    async fn select_agents(&self, task: &str) -> Result<Vec<String>> {
        let system = format!(
            "You are a task analyst. Study the task and choose the agents \
             best suited to execute it.\n\n\
             Available agents:\n{}\n\n\
             Return the participating agents as JSON in exactly this form:\n\
             {{\"agents\": [\"name\", ...], \"reason\": \"why these agents\"}}",
            self.capability_catalog()
        );

        let reply = self
            .llm
            .complete(&[Message::system(system), Message::user(task)])
            .await?;

        let selection: Selection = serde_json::from_str(reply.content.trim()).map_err(|e| {
            Error::parse(
                format!("agent selection is not valid JSON: {}", e),
                &reply.content,
            )
        })?;

        for name in &selection.agents {
            if !self.agents.contains_key(name) {
                return Err(Error::UnknownAgent(name.clone()));
            }
        }

        debug!(reason = %selection.reason, "selection rationale");
        Ok(selection.agents)
    }

    /// Merge all agent results into one answer with a final model call
    async fn integrate(&self, task: &str, results: &[AgentResult]) -> Result<String> {
        let system = "You are a result integrator. Combine the agents' \
                      outputs into one complete, coherent answer, keeping \
                      every useful piece of information.";

        let mut summary = String::new();
        for result in results {
            summary.push_str(&format!("Result from {}:\n{}\n\n", result.agent_name, result.result));
        }

        let user = format!("Original task: {}\n\nAgent results:\n{}", task, summary);

        let reply = self
            .llm
            .complete(&[Message::system(system.to_string()), Message::user(user)])
            .await?;

        Ok(reply.content)
    }

    /// Render a "- name: description" line per agent for the selection
    /// prompt
    fn capability_catalog(&self) -> String {
        let mut entries: Vec<(&String, &Arc<dyn Agent>)> = self.agents.iter().collect();
        entries.sort_by_key(|(name, _)| name.as_str());

        entries
            .iter()
            .map(|(name, agent)| format!("- {}: {}", name, agent.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentState;
    use crate::llm::mock::MockClient;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Agent stub with a fixed reply and an act counter
    struct StubAgent {
        name: String,
        reply: std::result::Result<String, String>,
        delay_ms: u64,
        acts: AtomicUsize,
    }

    impl StubAgent {
        fn ok(name: &str, reply: &str) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                reply: Ok(reply.to_string()),
                delay_ms: 0,
                acts: AtomicUsize::new(0),
            })
        }

        fn ok_slow(name: &str, reply: &str, delay_ms: u64) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                reply: Ok(reply.to_string()),
                delay_ms,
                acts: AtomicUsize::new(0),
            })
        }

        fn failing(name: &str, message: &str) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                reply: Err(message.to_string()),
                delay_ms: 0,
                acts: AtomicUsize::new(0),
            })
        }

        fn act_count(&self) -> usize {
            self.acts.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Agent for StubAgent {
        fn name(&self) -> &str {
            &self.name
        }

        fn description(&self) -> &str {
            "stub"
        }

        fn state(&self) -> AgentState {
            AgentState::Idle
        }

        async fn act(&self, _cancel: &CancellationToken, _task: &str) -> Result<String> {
            self.acts.fetch_add(1, Ordering::SeqCst);
            if self.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            }
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(message) => Err(Error::other(message.clone())),
            }
        }
    }

    fn flow_with(
        agents: Vec<Arc<StubAgent>>,
        replies: Vec<&str>,
    ) -> (Flow, Arc<MockClient>) {
        let mock = Arc::new(MockClient::new(replies));
        let map: HashMap<String, Arc<dyn Agent>> = agents
            .into_iter()
            .map(|a| (a.name.clone(), a as Arc<dyn Agent>))
            .collect();
        let flow = Flow::new(map, Arc::clone(&mock) as Arc<dyn LlmClient>).unwrap();
        (flow, mock)
    }

    #[test]
    fn test_empty_agent_set_rejected() {
        let mock = Arc::new(MockClient::new(Vec::<String>::new()));
        let result = Flow::new(HashMap::new(), mock as Arc<dyn LlmClient>);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_all_success_integration() {
        let manus = StubAgent::ok("manus", "R1");
        let react = StubAgent::ok("react", "R2");
        let (flow, mock) = flow_with(
            vec![Arc::clone(&manus), Arc::clone(&react)],
            vec![
                r#"{"agents": ["manus", "react"], "reason": "both useful"}"#,
                "merged answer",
            ],
        );

        let answer = flow
            .execute(&CancellationToken::new(), "do the thing")
            .await
            .unwrap();
        assert_eq!(answer, "merged answer");
        assert_eq!(manus.act_count(), 1);
        assert_eq!(react.act_count(), 1);

        // The integration request contains each agent's result exactly once.
        let calls = mock.calls();
        assert_eq!(calls.len(), 2);
        let integration = &calls[1][1].content;
        assert_eq!(integration.matches("R1").count(), 1);
        assert_eq!(integration.matches("R2").count(), 1);
        assert!(integration.contains("Result from manus"));
        assert!(integration.contains("Result from react"));
    }

    #[tokio::test]
    async fn test_fail_fast_with_one_error() {
        // Three agents, exactly one fails.
        let a = StubAgent::ok("a", "fast");
        let b = StubAgent::ok("b", "also fast");
        let c = StubAgent::failing("c", "c fell over");
        let (flow, mock) = flow_with(
            vec![a, b, Arc::clone(&c)],
            vec![r#"{"agents": ["a", "b", "c"], "reason": "all"}"#],
        );

        let err = flow
            .execute(&CancellationToken::new(), "task")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("c fell over"));

        // No integration call happened: only the selection request went out.
        assert_eq!(mock.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_join_waits_for_slow_workers() {
        let slow = StubAgent::ok_slow("slow", "late result", 50);
        let fast = StubAgent::ok("fast", "early result");
        let (flow, mock) = flow_with(
            vec![Arc::clone(&slow), fast],
            vec![
                r#"{"agents": ["slow", "fast"], "reason": "both"}"#,
                "combined",
            ],
        );

        let answer = flow.execute(&CancellationToken::new(), "task").await.unwrap();
        assert_eq!(answer, "combined");

        let integration = &mock.calls()[1][1].content;
        assert!(integration.contains("late result"));
        assert!(integration.contains("early result"));
    }

    #[tokio::test]
    async fn test_unknown_agent_fails_before_dispatch() {
        let manus = StubAgent::ok("manus", "R1");
        let (flow, _) = flow_with(
            vec![Arc::clone(&manus)],
            vec![r#"{"agents": ["ghost"], "reason": "hallucinated"}"#],
        );

        let err = flow
            .execute(&CancellationToken::new(), "task")
            .await
            .unwrap_err();
        match err {
            Error::UnknownAgent(name) => assert_eq!(name, "ghost"),
            other => panic!("expected UnknownAgent, got {:?}", other),
        }
        assert_eq!(manus.act_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_selection_fails() {
        let manus = StubAgent::ok("manus", "R1");
        let (flow, _) = flow_with(vec![manus], vec!["sure, I'd pick manus"]);

        let err = flow
            .execute(&CancellationToken::new(), "task")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[tokio::test]
    async fn test_selection_prompt_lists_agents() {
        let manus = StubAgent::ok("manus", "R1");
        let (flow, mock) = flow_with(
            vec![manus],
            vec![r#"{"agents": ["manus"], "reason": "only choice"}"#, "done"],
        );

        flow.execute(&CancellationToken::new(), "task").await.unwrap();

        let selection_request = &mock.calls()[0];
        assert_eq!(selection_request[0].role, "system");
        assert!(selection_request[0].content.contains("- manus: stub"));
        assert_eq!(selection_request[1].content, "task");
    }
}
