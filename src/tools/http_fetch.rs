//! HTTP fetch tool

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Map, Value};
use tokio_util::sync::CancellationToken;

use crate::core::{Error, Result};
use crate::tools::{require_str, Tool};

const NAME: &str = "http_fetch";

/// Perform an HTTP request and return status, headers and body
pub struct HttpFetchTool {
    client: reqwest::Client,
}

impl HttpFetchTool {
    pub fn new(timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    fn request_from(input: &Value) -> Result<(Method, String, Map<String, Value>)> {
        // A bare string is treated as a GET of that URL.
        if let Some(url) = input.as_str() {
            return Ok((Method::GET, url.to_string(), Map::new()));
        }

        let args = input
            .as_object()
            .ok_or_else(|| Error::invalid_args(NAME, "input must be a URL string or object"))?;

        let url = require_str(NAME, args, "url")?;

        let method = match args.get("method").and_then(|v| v.as_str()) {
            Some(m) => Method::from_bytes(m.to_uppercase().as_bytes())
                .map_err(|_| Error::invalid_args(NAME, format!("bad method: {}", m)))?,
            None => Method::GET,
        };

        Ok((method, url, args.clone()))
    }
}

#[async_trait]
impl Tool for HttpFetchTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Fetch a URL over HTTP; supports method, headers and JSON body"
    }

    async fn run(&self, cancel: &CancellationToken, input: Value) -> Result<Value> {
        let (method, url, args) = Self::request_from(&input)?;

        let parsed = url::Url::parse(&url)
            .map_err(|e| Error::invalid_args(NAME, format!("invalid URL {:?}: {}", url, e)))?;

        let mut request = self.client.request(method, parsed);

        if let Some(headers) = args.get("headers").and_then(|v| v.as_object()) {
            for (key, value) in headers {
                if let Some(value) = value.as_str() {
                    request = request.header(key, value);
                }
            }
        }

        if let Some(body) = args.get("body") {
            request = request.json(body);
        }

        let response = tokio::select! {
            result = request.send() => result?,
            _ = cancel.cancelled() => {
                return Err(Error::other(format!("http_fetch canceled: {}", url)));
            }
        };

        let status = response.status();
        let headers: Map<String, Value> = response
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.to_string(),
                    Value::String(String::from_utf8_lossy(v.as_bytes()).into_owned()),
                )
            })
            .collect();

        let body = response.text().await?;

        if status.is_client_error() || status.is_server_error() {
            return Err(Error::other(format!(
                "request to {} failed with status {}",
                url,
                status.as_u16()
            )));
        }

        Ok(json!({
            "status": status.as_u16(),
            "headers": headers,
            "body": body,
        }))
    }
}
