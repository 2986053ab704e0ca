//! String processing tool

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

use crate::core::{Error, Result};
use crate::tools::{object_args, require_str, Tool};

const NAME: &str = "str_ops";

/// Replace, split, join and regex-edit strings
pub struct StrOpsTool;

impl StrOpsTool {
    pub fn new() -> Self {
        Self
    }

    fn replace(&self, args: &Map<String, Value>) -> Result<Value> {
        let text = require_str(NAME, args, "text")?;
        let old = require_str(NAME, args, "old")?;
        let new = require_str(NAME, args, "new")?;
        Ok(Value::String(text.replace(&old, &new)))
    }

    fn split(&self, args: &Map<String, Value>) -> Result<Value> {
        let text = require_str(NAME, args, "text")?;
        let separator = require_str(NAME, args, "separator")?;
        let parts: Vec<Value> = text
            .split(&separator)
            .map(|s| Value::String(s.to_string()))
            .collect();
        Ok(Value::Array(parts))
    }

    fn join(&self, args: &Map<String, Value>) -> Result<Value> {
        let separator = require_str(NAME, args, "separator")?;
        let texts = args
            .get("texts")
            .and_then(|v| v.as_array())
            .ok_or_else(|| Error::invalid_args(NAME, "missing array argument `texts`"))?;

        let mut parts = Vec::with_capacity(texts.len());
        for item in texts {
            let s = item
                .as_str()
                .ok_or_else(|| Error::invalid_args(NAME, "`texts` items must be strings"))?;
            parts.push(s);
        }

        Ok(Value::String(parts.join(&separator)))
    }

    fn regex_replace(&self, args: &Map<String, Value>) -> Result<Value> {
        let text = require_str(NAME, args, "text")?;
        let pattern = require_str(NAME, args, "pattern")?;
        let replacement = require_str(NAME, args, "replacement")?;

        let re = regex::Regex::new(&pattern)
            .map_err(|e| Error::invalid_args(NAME, format!("bad pattern: {}", e)))?;

        Ok(Value::String(re.replace_all(&text, replacement.as_str()).into_owned()))
    }
}

impl Default for StrOpsTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for StrOpsTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "String processing: replace, split, join and regex_replace"
    }

    async fn run(&self, _cancel: &CancellationToken, input: Value) -> Result<Value> {
        let args = object_args(NAME, &input)?;
        let operation = require_str(NAME, &args, "operation")?;

        match operation.as_str() {
            "replace" => self.replace(&args),
            "split" => self.split(&args),
            "join" => self.join(&args),
            "regex_replace" => self.regex_replace(&args),
            other => Err(Error::invalid_args(
                NAME,
                format!("unsupported operation: {}", other),
            )),
        }
    }
}
