//! Shared application state handed to every handler through `web::Data`.

use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::maintenance::GitUpdater;
use crate::publisher::FilePublisher;
use crate::render::{DocumentRenderer, RenderClient};
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub sessions: SessionStore,
    pub renderer: Arc<dyn DocumentRenderer + Send + Sync>,
    pub publisher: FilePublisher,
    pub git_updater: Option<GitUpdater>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .pool_idle_timeout(Duration::from_secs(900))
            .user_agent(concat!("render-form-server/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let renderer = Arc::new(RenderClient::new(http_client, config.render_api_url.clone()));
        Ok(Self::new_with_renderer(config, renderer))
    }

    pub fn new_with_renderer(
        config: AppConfig,
        renderer: Arc<dyn DocumentRenderer + Send + Sync>,
    ) -> Self {
        let sessions = SessionStore::new(
            Duration::from_secs(config.session_ttl_secs),
            config.session_capacity,
        );
        let publisher = FilePublisher::new(config.output_dir.clone());
        let git_updater = config
            .git_update_repo
            .as_ref()
            .map(|repo| GitUpdater::new(repo.clone(), config.git_update_branch.clone()));

        AppState {
            config: Arc::new(config),
            sessions,
            renderer,
            publisher,
            git_updater,
        }
    }
}
