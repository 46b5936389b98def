#![allow(dead_code)]

use actix_web::dev::ServerHandle;
use actix_web::http::StatusCode;
use actix_web::{web, App, HttpResponse, HttpServer};
use render_form_server::config::AppConfig;
use render_form_server::render::{DocumentRenderer, RenderError, RenderRequest, RenderedDocument};
use serde_json::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};

pub const BOUNDARY: &str = "----render-form-test-boundary";
pub const SAMPLE_CSV: &str = "qty,ItemName,itemDescription,amt\n2,Widget,A small widget,3.5\n";
pub const SAMPLE_PDF: &[u8] = b"%PDF-1.4\n%mock document\n%%EOF\n";

pub fn test_config(output_dir: &Path) -> AppConfig {
    AppConfig {
        output_dir: output_dir.to_path_buf(),
        ..AppConfig::default()
    }
}

/// Builds a `multipart/form-data` body. Returns the content type header value and the body.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    if let Some((filename, content)) = file {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: text/csv\r\n\r\n",
                filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    (format!("multipart/form-data; boundary={}", BOUNDARY), body)
}

/// In-memory stand-in for the rendering API client.
pub struct MockRenderer {
    outcome: Result<Vec<u8>, (u16, String)>,
    requests: Mutex<Vec<RenderRequest>>,
}

impl MockRenderer {
    pub fn pdf(content: &[u8]) -> Self {
        Self {
            outcome: Ok(content.to_vec()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16, body: &str) -> Self {
        Self {
            outcome: Err((status, body.to_string())),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<RenderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DocumentRenderer for MockRenderer {
    async fn render(&self, request: &RenderRequest) -> Result<RenderedDocument, RenderError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.outcome {
            Ok(content) => Ok(RenderedDocument {
                output_name: request.output_name.clone(),
                content: content.clone(),
            }),
            Err((status, body)) => Err(RenderError::Api {
                message: format!("API request failed: {}", status),
                status: Some(*status),
                body: Some(body.clone()),
            }),
        }
    }
}

/// A real HTTP server on a random local port standing in for the rendering API.
/// Every request body is recorded; every request gets the same canned response.
pub struct MockRenderApi {
    pub url: String,
    requests: Arc<Mutex<Vec<Value>>>,
    handle: ServerHandle,
}

impl MockRenderApi {
    pub async fn start(status: u16, content_type: &'static str, body: &[u8]) -> Self {
        let requests: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
        let recorded = requests.clone();
        let body = body.to_vec();

        let server = HttpServer::new(move || {
            let recorded = recorded.clone();
            let body = body.clone();
            App::new().route(
                "/api/render",
                web::post().to(move |payload: web::Json<Value>| {
                    let recorded = recorded.clone();
                    let body = body.clone();
                    async move {
                        recorded.lock().unwrap().push(payload.into_inner());
                        HttpResponse::build(StatusCode::from_u16(status).unwrap())
                            .content_type(content_type)
                            .body(body)
                    }
                }),
            )
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("mock rendering API should bind");

        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        Self {
            url: format!("http://{}/api/render", addr),
            requests,
            handle,
        }
    }

    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }

    pub async fn stop(self) {
        self.handle.stop(true).await;
    }
}
