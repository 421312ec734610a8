//! PlantUML SVG rendering client
//!
//! This module talks to a [PlantUML](https://plantuml.com) server, either the
//! public instance (encoded GET) or a self-hosted one (raw POST).

use reqwest::{Client, Response, StatusCode};

use crate::config::RenderConfig;
use crate::error::{RenderError, Result};
use crate::request::{trim_base, RenderRequest, DEFAULT_SERVER};
use crate::retry::RetryPolicy;

/// Client for rendering PlantUML diagrams to SVG
///
/// The client holds no per-render state and can be cloned and shared between
/// tasks.
#[derive(Debug, Clone)]
pub struct PlantUmlClient {
    /// Server for encoded GET requests
    default_server: String,
    /// HTTP client
    http: Client,
    /// Retry behaviour for `403 Forbidden`
    retry: RetryPolicy,
}

impl Default for PlantUmlClient {
    fn default() -> Self {
        Self::new()
    }
}

impl PlantUmlClient {
    /// Create a client for the public PlantUML server
    pub fn new() -> Self {
        Self {
            default_server: DEFAULT_SERVER.to_string(),
            http: Client::new(),
            retry: RetryPolicy::default(),
        }
    }

    /// Create a client from configuration
    pub fn with_config(config: &RenderConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }

        Ok(Self {
            default_server: trim_base(&config.default_server).to_string(),
            http: builder.build()?,
            retry: config.retry_policy(),
        })
    }

    /// Use another server for encoded GET requests
    pub fn with_default_server(mut self, url: impl Into<String>) -> Self {
        self.default_server = trim_base(&url.into()).to_string();
        self
    }

    /// Set the retry policy
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Get the server used for encoded GET requests
    pub fn default_server(&self) -> &str {
        &self.default_server
    }

    /// Get the retry policy
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Render a diagram to SVG
    ///
    /// # Arguments
    /// * `source` - The PlantUML source
    /// * `server` - Base URL of a self-hosted server that accepts POST, or
    ///   `None` for an encoded GET against the default server
    ///
    /// # Returns
    /// The response body of a `200 OK`, unmodified
    ///
    /// # Example
    /// ```no_run
    /// use plantuml_render::PlantUmlClient;
    ///
    /// # async fn run() -> plantuml_render::Result<()> {
    /// let client = PlantUmlClient::new();
    /// let svg = client.render_svg("@startuml\nA -> B\n@enduml", None).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn render_svg(&self, source: &str, server: Option<&str>) -> Result<Vec<u8>> {
        let request = RenderRequest::new(source, server, &self.default_server)?;
        log::debug!("Rendering diagram: {} {}", request.method(), request.url());

        let response = self.send_with_retry(&request).await?;

        let status = response.status();
        if status != StatusCode::OK {
            let message = response
                .text()
                .await
                .ok()
                .map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty())
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(RenderError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }

    /// Generate the encoded GET URL for a diagram (without rendering)
    ///
    /// Useful for embedding in HTML or sharing.
    pub fn diagram_url(&self, source: &str) -> Result<String> {
        let request = RenderRequest::new(source, None, &self.default_server)?;
        Ok(request.url().to_string())
    }

    async fn send_with_retry(&self, request: &RenderRequest) -> Result<Response> {
        let mut retries = 0;
        loop {
            let response = request.build(&self.http).send().await?;

            let status = response.status().as_u16();
            if !self.retry.should_retry(status, retries) {
                return Ok(response);
            }

            log::warn!(
                "Server returned {} for {}, retrying in {:?}",
                status,
                request.url(),
                self.retry.delay
            );
            drop(response);
            tokio::time::sleep(self.retry.delay).await;
            retries += 1;
        }
    }
}

/// Render a diagram to SVG with a fresh default client
///
/// See [`PlantUmlClient::render_svg`].
pub async fn render_svg(source: &str, server: Option<&str>) -> Result<Vec<u8>> {
    PlantUmlClient::new().render_svg(source, server).await
}
