use actix_files::NamedFile;
use actix_web::{web, HttpRequest, HttpResponse};
use log::{error, info};

use super::PublishError;
use crate::{AppState, ErrorResponse};

#[utoipa::path(
    tag = "Files",
    get,
    path = "/files/{filename}",
    responses(
        (status = 200, description = "Generated document bytes"),
        (status = 404, description = "File not found", body = ErrorResponse)
    ),
    params(
        ("filename" = String, Path, description = "Output name the document was published under")
    )
)]
pub async fn serve_file(
    req: HttpRequest,
    filename: web::Path<String>,
    data: web::Data<AppState>,
) -> HttpResponse {
    let filename = filename.into_inner();
    info!("Executing serve_file handler for filename: {}", &filename);

    let path = match data.publisher.locate(&filename).await {
        Ok(path) => path,
        Err(PublishError::NotFound(_)) | Err(PublishError::InvalidFilename(_)) => {
            error!("Generated file not found for serving: {}", &filename);
            return HttpResponse::NotFound().json(ErrorResponse::not_found(&format!(
                "File '{}' not found",
                filename
            )));
        }
        Err(e) => {
            error!("Failed to look up generated file '{}': {}", &filename, e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Failed to read generated file"));
        }
    };

    match NamedFile::open_async(&path).await {
        Ok(file) => file.into_response(&req),
        Err(e) => {
            error!("Failed to open generated file {}: {}", path.display(), e);
            HttpResponse::NotFound().json(ErrorResponse::not_found(&format!(
                "File '{}' not found",
                filename
            )))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(format!("{}/{{filename}}", super::FILES_ROUTE_PREFIX))
            .route(web::get().to(serve_file)),
    );
}
