use actix_web::middleware::Compress;
use actix_web::{web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod form;
pub mod line_items;
pub mod maintenance;
pub mod publisher;
pub mod render;
pub mod session;
pub mod state;

pub use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::form::handlers::show_form,
        crate::form::handlers::handle_form,
        crate::publisher::handlers::serve_file,
        crate::maintenance::git_update
    ),
    components(
        schemas(
            form::handlers::FormSubmission,
            line_items::LineItem,
            line_items::LineItemDocument,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Form", description = "CSV upload and document render form."),
        (name = "Files", description = "Generated document downloads."),
        (name = "Maintenance", description = "Operator-only template repository refresh.")
    )
)]
pub struct ApiDoc;

/// Registers every route of the application. The git update hook is only mounted
/// when a repository is configured.
pub fn configure_app(cfg: &mut web::ServiceConfig, git_update_enabled: bool) {
    cfg.configure(form::config)
        .configure(publisher::handlers::config);
    if git_update_enabled {
        cfg.configure(maintenance::config);
    }
}

pub async fn run() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match config::AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    let (host, port) = (config.host.clone(), config.port);

    let app_state = match AppState::new(config) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Failed to build HTTP client for the rendering API: {}", e);
            std::process::exit(1);
        }
    };

    app_state.publisher.ensure_output_dir().await?;
    log::info!(
        "Publishing generated files from {}",
        app_state.publisher.output_dir().display()
    );
    if app_state.git_updater.is_some() {
        log::info!("Git update hook enabled at POST /git_update");
    }

    let git_update_enabled = app_state.git_updater.is_some();
    let app_state = web::Data::new(app_state);

    let prometheus = PrometheusMetricsBuilder::new("render_form_server")
        .endpoint("/metrics")
        .build()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    log::info!("Starting server at http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .wrap(prometheus.clone())
            .app_data(app_state.clone())
            .configure(|cfg| configure_app(cfg, git_update_enabled))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
