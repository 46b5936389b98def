use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::header::CONTENT_TYPE;

use super::models::{RenderOptions, RenderRequest, RenderedDocument};

const PDF_MEDIA_TYPE: &str = "application/pdf";

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to process data field as JSON: {0}")]
    DataFormat(#[source] serde_json::Error),
    #[error("{message}{}", api_error_details(.status, .body))]
    Api {
        message: String,
        status: Option<u16>,
        body: Option<String>,
    },
    #[error("Unexpected content type returned by API: {}", .content_type.as_deref().unwrap_or("none"))]
    UnexpectedContentType { content_type: Option<String> },
}

fn api_error_details(status: &Option<u16>, body: &Option<String>) -> String {
    let mut details = String::new();
    if let Some(status) = status {
        details.push_str(&format!("\nStatus Code: {}", status));
    }
    if let Some(body) = body {
        details.push_str(&format!("\nResponse Body: {}", body));
    }
    details
}

/// Anything able to turn a [`RenderRequest`] into a rendered document.
#[async_trait]
pub trait DocumentRenderer {
    async fn render(&self, request: &RenderRequest) -> Result<RenderedDocument, RenderError>;
}

/// Parses the textual `data` field and hands the assembled request to `renderer`.
///
/// Malformed JSON is reported as [`RenderError::DataFormat`] without any call
/// being made.
pub async fn submit(
    renderer: &(dyn DocumentRenderer + Send + Sync),
    options: RenderOptions,
    raw_data: &str,
) -> Result<RenderedDocument, RenderError> {
    let data = serde_json::from_str(raw_data).map_err(RenderError::DataFormat)?;
    let request = RenderRequest::new(options, data);
    renderer.render(&request).await
}

/// HTTP client for the rendering API. One POST per request, no retries.
#[derive(Clone)]
pub struct RenderClient {
    http_client: reqwest::Client,
    endpoint: String,
}

impl RenderClient {
    pub fn new(http_client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http_client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl DocumentRenderer for RenderClient {
    async fn render(&self, request: &RenderRequest) -> Result<RenderedDocument, RenderError> {
        info!(
            "Submitting render request: template={:?}, output={}, devMode={}",
            request.template_name, request.output_name, request.dev_mode
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!("Render API request failed before a response arrived: {}", e);
                RenderError::Api {
                    message: format!("API request failed: {}", e),
                    status: e.status().map(|s| s.as_u16()),
                    body: None,
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Render API returned {}: {}", status, body);
            return Err(RenderError::Api {
                message: format!("API request failed: {} for url: {}", status, self.endpoint),
                status: Some(status.as_u16()),
                body: Some(body),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        if !is_pdf(content_type.as_deref()) {
            error!("Render API answered with content type {:?}", content_type);
            return Err(RenderError::UnexpectedContentType { content_type });
        }

        let content = response.bytes().await.map_err(|e| RenderError::Api {
            message: format!("API request failed while reading the response: {}", e),
            status: Some(status.as_u16()),
            body: None,
        })?;

        debug!("Received {} bytes of PDF for {}", content.len(), request.output_name);

        Ok(RenderedDocument {
            output_name: request.output_name.clone(),
            content: content.to_vec(),
        })
    }
}

fn is_pdf(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|value| value.split(';').next())
        .map(|media_type| media_type.trim().eq_ignore_ascii_case(PDF_MEDIA_TYPE))
        .unwrap_or(false)
}
