use actix_multipart::Multipart;
use actix_web::http::header::ContentType;
use actix_web::{web, HttpRequest, HttpResponse};
use log::{debug, error, info, warn};
use utoipa::ToSchema;

use super::multipart_parser::{MultipartParser, ParsedForm};
use super::page::{render_form, FlashMessage};
use crate::line_items::normalize;
use crate::publisher::validate_filename;
use crate::render::{self, RenderOptions};
use crate::session::SessionId;
use crate::AppState;

/// Fields accepted by `POST /`. `action` selects between `upload` and `submit`.
#[derive(Debug, serde::Deserialize, ToSchema)]
pub struct FormSubmission {
    #[allow(unused)]
    #[schema(example = "upload")]
    pub action: String,
    #[allow(unused)]
    pub file: Option<Vec<u8>>,
    #[allow(unused)]
    #[serde(rename = "accessKey")]
    pub access_key: Option<String>,
    #[allow(unused)]
    #[serde(rename = "templateName")]
    pub template_name: Option<String>,
    #[allow(unused)]
    #[serde(rename = "outputName")]
    #[schema(example = "result.pdf")]
    pub output_name: Option<String>,
    #[allow(unused)]
    #[serde(rename = "devMode")]
    #[schema(example = "n")]
    pub dev_mode: Option<String>,
    #[allow(unused)]
    #[serde(rename = "storeTo")]
    pub store_to: Option<String>,
    #[allow(unused)]
    #[schema(example = "{\"items\": []}")]
    pub data: Option<String>,
}

#[utoipa::path(
    tag = "Form",
    get,
    path = "/",
    responses(
        (status = 200, description = "HTML form, pre-filled with the last uploaded document", body = String, content_type = "text/html")
    )
)]
pub async fn show_form(req: HttpRequest, data: web::Data<AppState>) -> HttpResponse {
    let session = SessionId::from_request(&req);
    let json_data = data.sessions.take(&session.id).await.unwrap_or_default();
    form_response(&session, &json_data, &[])
}

#[utoipa::path(
    tag = "Form",
    post,
    path = "/",
    request_body(content = inline(FormSubmission), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "HTML form with the outcome of the action", body = String, content_type = "text/html")
    )
)]
pub async fn handle_form(
    req: HttpRequest,
    payload: Multipart,
    data: web::Data<AppState>,
) -> HttpResponse {
    let session = SessionId::from_request(&req);
    let mut json_data = data.sessions.take(&session.id).await.unwrap_or_default();

    let message = match MultipartParser::parse_form(payload, data.config.max_upload_bytes).await {
        Err(e) => {
            error!("Failed to parse form submission: {}", e);
            FlashMessage::danger(format!("Failed to read form submission: {}", e))
        }
        Ok(form) => match form.action() {
            Some("upload") => {
                info!("Executing upload action");
                let (document_text, message) = upload_csv(&data, &session, &form).await;
                if let Some(text) = document_text {
                    json_data = text;
                }
                message
            }
            Some("submit") => {
                info!("Executing submit action");
                json_data = form.field("data").unwrap_or_default().to_string();
                submit_document(&req, &data, &form).await
            }
            other => {
                warn!("Unknown form action: {:?}", other);
                FlashMessage::danger("Unknown form action.")
            }
        },
    };

    form_response(&session, &json_data, &[message])
}

/// Normalizes the uploaded CSV and caches its JSON text for the session.
/// A failed upload leaves the cache as it was.
async fn upload_csv(
    data: &AppState,
    session: &SessionId,
    form: &ParsedForm,
) -> (Option<String>, FlashMessage) {
    let file = match &form.file {
        Some(file) if !file.filename.is_empty() => file,
        _ => {
            return (
                None,
                FlashMessage::danger("No file selected. Please choose a CSV file."),
            )
        }
    };

    debug!("Normalizing uploaded file '{}'", file.filename);
    let document_text = normalize(&file.content)
        .map_err(|e| e.to_string())
        .and_then(|document| document.to_json_text().map_err(|e| e.to_string()));

    match document_text {
        Ok(text) => {
            data.sessions.set(&session.id, text.clone()).await;
            info!("CSV '{}' normalized and cached for session", file.filename);
            (
                Some(text),
                FlashMessage::success("CSV uploaded successfully! Data loaded into the form."),
            )
        }
        Err(e) => {
            error!("Failed to process CSV '{}': {}", file.filename, e);
            (
                None,
                FlashMessage::danger(format!("Failed to process CSV file: {}", e)),
            )
        }
    }
}

/// Sends the edited document to the rendering API and publishes the resulting PDF.
async fn submit_document(req: &HttpRequest, data: &AppState, form: &ParsedForm) -> FlashMessage {
    let options = RenderOptions::from_fields(&form.fields);

    if let Err(e) = validate_filename(&options.output_name) {
        error!("Rejected output name: {}", e);
        return FlashMessage::danger(e.to_string());
    }

    let raw_data = form.field("data").unwrap_or_default();
    let document = match render::submit(data.renderer.as_ref(), options, raw_data).await {
        Ok(document) => document,
        Err(e) => {
            error!("Render request failed: {}", e);
            return FlashMessage::danger(e.to_string());
        }
    };

    match data
        .publisher
        .publish(&document.output_name, &document.content)
        .await
    {
        Ok(path) => {
            let url = external_url(req, data, &path);
            info!("Rendered document available at {}", url);
            FlashMessage::success("File generated successfully!").with_link(url)
        }
        Err(e) => {
            error!("Failed to publish rendered document: {}", e);
            FlashMessage::danger(format!("Failed to save generated file: {}", e))
        }
    }
}

fn external_url(req: &HttpRequest, data: &AppState, path: &str) -> String {
    match &data.config.public_base_url {
        Some(base) => format!("{}{}", base, path),
        None => {
            let info = req.connection_info();
            format!("{}://{}{}", info.scheme(), info.host(), path)
        }
    }
}

fn form_response(session: &SessionId, json_data: &str, messages: &[FlashMessage]) -> HttpResponse {
    let mut response = HttpResponse::Ok();
    if session.is_new {
        response.cookie(session.cookie());
    }
    response
        .content_type(ContentType::html())
        .body(render_form(json_data, messages))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/")
            .route(web::get().to(show_form))
            .route(web::post().to(handle_form)),
    );
}
