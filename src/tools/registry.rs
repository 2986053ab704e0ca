//! Tool registry - name-keyed lookup of invocable capabilities
//!
//! Built once at startup and shared behind an `Arc`; lookups after
//! construction are read-only, so concurrent agents never contend.

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::{Config, Error, Result};
use crate::tools::{FileOpsTool, HttpFetchTool, ShellTool, StrOpsTool, Tool};

/// Registry of available tools
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Create a registry with the standard tool set
    pub fn with_default_tools(config: &Config) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(FileOpsTool::new()));
        registry.register(Arc::new(StrOpsTool::new()));
        registry.register(Arc::new(ShellTool::new()));
        registry.register(Arc::new(HttpFetchTool::new(config.tools.http_timeout_secs)));
        registry
    }

    /// Register a tool under its own name
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Look up a tool by exact name
    pub fn get(&self, name: &str) -> Result<Arc<dyn Tool>> {
        self.tools
            .get(name)
            .cloned()
            .ok_or_else(|| Error::ToolNotFound(name.to_string()))
    }

    /// Whether a tool is registered under the given name
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Sorted tool names
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Render a "- name: description" line per tool for prompt building
    pub fn catalog(&self) -> String {
        let mut entries: Vec<(&String, &Arc<dyn Tool>)> = self.tools.iter().collect();
        entries.sort_by_key(|(name, _)| name.as_str());

        entries
            .iter()
            .map(|(name, tool)| format!("- {}: {}", name, tool.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::Value;
    use tokio_util::sync::CancellationToken;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Returns its input unchanged"
        }

        async fn run(&self, _cancel: &CancellationToken, input: Value) -> Result<Value> {
            Ok(input)
        }
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));

        assert!(registry.contains("echo"));
        assert!(registry.get("echo").is_ok());
    }

    #[test]
    fn test_get_unknown_tool() {
        let registry = ToolRegistry::new();
        let err = match registry.get("missing") {
            Ok(_) => panic!("expected ToolNotFound error"),
            Err(e) => e,
        };
        match err {
            Error::ToolNotFound(name) => assert_eq!(name, "missing"),
            other => panic!("expected ToolNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_default_tools() {
        let registry = ToolRegistry::with_default_tools(&Config::default());
        for name in ["file_ops", "str_ops", "shell", "http_fetch"] {
            assert!(registry.contains(name), "missing tool {}", name);
        }
    }

    #[test]
    fn test_catalog_is_sorted() {
        let registry = ToolRegistry::with_default_tools(&Config::default());
        let catalog = registry.catalog();
        let lines: Vec<&str> = catalog.lines().collect();
        assert_eq!(lines.len(), registry.len());
        assert!(lines[0].starts_with("- file_ops:"));

        let mut sorted = lines.clone();
        sorted.sort();
        assert_eq!(lines, sorted);
    }
}
