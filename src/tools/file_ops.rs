//! Filesystem operations tool

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::fs;
use tokio_util::sync::CancellationToken;

use crate::core::{Error, Result};
use crate::tools::{object_args, require_str, Tool};

const NAME: &str = "file_ops";

/// Read, write, list and delete files and directories
pub struct FileOpsTool;

impl FileOpsTool {
    pub fn new() -> Self {
        Self
    }

    async fn read(&self, path: &str) -> Result<Value> {
        let content = fs::read_to_string(path).await?;
        Ok(Value::String(content))
    }

    async fn write(&self, path: &str, content: &str) -> Result<Value> {
        fs::write(path, content).await?;
        Ok(json!("success"))
    }

    async fn mkdir(&self, path: &str) -> Result<Value> {
        fs::create_dir_all(path).await?;
        Ok(json!("success"))
    }

    async fn list(&self, path: &str) -> Result<Value> {
        let mut entries = fs::read_dir(path).await?;
        let mut listing = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let meta = entry.metadata().await?;
            listing.push(json!({
                "name": entry.file_name().to_string_lossy(),
                "size": meta.len(),
                "is_dir": meta.is_dir(),
            }));
        }

        Ok(Value::Array(listing))
    }

    async fn delete(&self, path: &str) -> Result<Value> {
        let meta = fs::metadata(path).await?;
        if meta.is_dir() {
            fs::remove_dir_all(path).await?;
        } else {
            fs::remove_file(path).await?;
        }
        Ok(json!("success"))
    }
}

impl Default for FileOpsTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for FileOpsTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "File operations: read, write, mkdir, list and delete paths"
    }

    async fn run(&self, _cancel: &CancellationToken, input: Value) -> Result<Value> {
        let args = object_args(NAME, &input)?;
        let operation = require_str(NAME, &args, "operation")?;
        let path = require_str(NAME, &args, "path")?;

        match operation.as_str() {
            "read" => self.read(&path).await,
            "write" => {
                let content = require_str(NAME, &args, "content")?;
                self.write(&path, &content).await
            }
            "mkdir" => self.mkdir(&path).await,
            "list" => self.list(&path).await,
            "delete" => self.delete(&path).await,
            other => Err(Error::invalid_args(
                NAME,
                format!("unsupported operation: {}", other),
            )),
        }
    }
}
