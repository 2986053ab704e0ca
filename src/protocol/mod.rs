//! Action protocol parsing
//!
//! Model output that requests a tool invocation follows a fixed
//! line-oriented grammar:
//!
//! ```text
//! Thought: reasoning about the next step
//! Action: tool_name
//! Action Input: {"arg": "value"}
//! ```
//!
//! The reason-act-observe variant additionally accepts a terminal
//! `Final Answer: <text>` line in place of the action pair. Parsing is
//! done with an explicit line scanner so malformed input produces a
//! diagnostic that carries the offending text.

use serde_json::{Map, Value};

use crate::core::{Error, Result};

/// Literal marker scanned for in follow-up model output
pub const ACTION_MARKER: &str = "Action:";

const ACTION_PREFIX: &str = "Action:";
const ACTION_INPUT_PREFIX: &str = "Action Input:";
const THOUGHT_PREFIX: &str = "Thought:";
const FINAL_ANSWER_PREFIX: &str = "Final Answer:";

/// One tool invocation extracted from model output
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAction {
    /// Registered name of the tool to invoke
    pub tool_name: String,
    /// Arguments decoded from the `Action Input` JSON object
    pub arguments: Map<String, Value>,
}

/// One reason-act-observe step extracted from model output
#[derive(Debug, Clone, PartialEq)]
pub struct ReactStep {
    /// The model's reasoning line
    pub thought: String,
    /// What the model decided to do
    pub action: ReactAction,
}

/// The act half of a reason-act-observe step
#[derive(Debug, Clone, PartialEq)]
pub enum ReactAction {
    /// Invoke a tool and feed the observation back
    Tool(ParsedAction),
    /// Terminal answer; ends the loop with this text
    FinalAnswer(String),
}

/// Whether model output requests another dispatch round
pub fn contains_action(text: &str) -> bool {
    text.contains(ACTION_MARKER)
}

/// Parse an `Action:` / `Action Input:` pair from raw model output.
///
/// The `Action Input` line must immediately follow the `Action` line and
/// must hold a well-formed JSON object.
pub fn parse_action(text: &str) -> Result<ParsedAction> {
    let lines: Vec<&str> = text.lines().collect();

    for (i, line) in lines.iter().enumerate() {
        let Some(rest) = line.trim_start().strip_prefix(ACTION_PREFIX) else {
            continue;
        };

        let tool_name = rest.trim();
        if tool_name.is_empty() || !is_identifier(tool_name) {
            return Err(Error::parse(
                format!("action name {:?} is not an identifier", tool_name),
                text,
            ));
        }

        let Some(next) = lines.get(i + 1) else {
            return Err(Error::parse(
                "`Action:` line has no `Action Input:` line after it",
                text,
            ));
        };

        let Some(payload) = next.trim_start().strip_prefix(ACTION_INPUT_PREFIX) else {
            return Err(Error::parse(
                "`Action:` line is not followed by `Action Input:`",
                text,
            ));
        };

        let arguments = parse_arguments(payload.trim(), text)?;
        return Ok(ParsedAction {
            tool_name: tool_name.to_string(),
            arguments,
        });
    }

    Err(Error::parse("no `Action:` line found", text))
}

/// Parse a full reason-act-observe step: a `Thought:` line followed by
/// either an action pair or a `Final Answer:` line.
pub fn parse_react(text: &str) -> Result<ReactStep> {
    let lines: Vec<&str> = text.lines().collect();

    let Some(thought_idx) = lines
        .iter()
        .position(|l| l.trim_start().starts_with(THOUGHT_PREFIX))
    else {
        return Err(Error::parse("no `Thought:` line found", text));
    };

    let thought = lines[thought_idx]
        .trim_start()
        .strip_prefix(THOUGHT_PREFIX)
        .unwrap_or_default()
        .trim()
        .to_string();

    for (i, line) in lines.iter().enumerate().skip(thought_idx + 1) {
        let trimmed = line.trim_start();

        if let Some(rest) = trimmed.strip_prefix(FINAL_ANSWER_PREFIX) {
            // The answer runs from the marker to the end of the output.
            let mut answer = vec![rest.trim()];
            answer.extend(lines[i + 1..].iter().map(|l| l.trim_end()));
            let answer = answer.join("\n").trim().to_string();
            return Ok(ReactStep {
                thought,
                action: ReactAction::FinalAnswer(answer),
            });
        }

        if trimmed.starts_with(ACTION_PREFIX) {
            let action = parse_action(&lines[i..].join("\n"))?;
            return Ok(ReactStep {
                thought,
                action: ReactAction::Tool(action),
            });
        }
    }

    Err(Error::parse(
        "`Thought:` line is not followed by an action or final answer",
        text,
    ))
}

/// Render a tool output value for inclusion in a prompt
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Serialize an action back into the wire grammar (used when recording
/// synthetic assistant turns)
pub fn render_action(action: &ParsedAction) -> String {
    format!(
        "{} {}\n{} {}",
        ACTION_PREFIX,
        action.tool_name,
        ACTION_INPUT_PREFIX,
        Value::Object(action.arguments.clone())
    )
}

fn parse_arguments(payload: &str, full_text: &str) -> Result<Map<String, Value>> {
    if payload.is_empty() {
        return Err(Error::parse("`Action Input:` payload is empty", full_text));
    }

    let value: Value = serde_json::from_str(payload)
        .map_err(|e| Error::parse(format!("malformed JSON in `Action Input`: {}", e), payload))?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::parse(
            format!("`Action Input` must be a JSON object, got {}", other),
            payload,
        )),
    }
}

fn is_identifier(name: &str) -> bool {
    name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
