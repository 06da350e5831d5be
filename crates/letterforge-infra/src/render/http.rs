//! HTTP client for the document rendering service.
//!
//! Posts `{markup, style}` to the rendering service's `/render` endpoint
//! and returns the PDF bytes. The service owns markup-to-document
//! conversion; this client only moves bytes and maps failures.

use std::time::Duration;

use serde::Serialize;

use letterforge_core::render::DocumentRenderer;
use letterforge_types::render::RenderError;

/// Document renderer backed by an external HTTP rendering service.
pub struct HttpDocumentRenderer {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct RenderRequest<'a> {
    markup: &'a str,
    style: &'a str,
}

impl HttpDocumentRenderer {
    /// Create a renderer client for the service at `base_url`.
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, RenderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RenderError::Service {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { client, base_url })
    }

    fn url(&self) -> String {
        format!("{}/render", self.base_url.trim_end_matches('/'))
    }
}

impl DocumentRenderer for HttpDocumentRenderer {
    async fn render(&self, markup: &str, style: &str) -> Result<Vec<u8>, RenderError> {
        let response = self
            .client
            .post(self.url())
            .json(&RenderRequest { markup, style })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RenderError::Timeout
                } else {
                    RenderError::Service {
                        message: format!("HTTP request failed: {e}"),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(RenderError::Service {
                message: format!("HTTP {status}: {error_body}"),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RenderError::Decode(format!("failed to read document body: {e}")))?;

        if bytes.is_empty() {
            return Err(RenderError::Decode("rendered document is empty".to_string()));
        }

        tracing::debug!(bytes = bytes.len(), "document rendered");
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_appends_render_path_once() {
        let renderer =
            HttpDocumentRenderer::new("http://localhost:9090/".to_string(), Duration::from_secs(5))
                .unwrap();
        assert_eq!(renderer.url(), "http://localhost:9090/render");
    }
}
