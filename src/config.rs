//! Runtime configuration loaded from the environment (and `.env` via dotenvy).

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_RENDER_API_URL: &str = "https://us1.dws4.docmosis.com/api/render";
pub const DEFAULT_OUTPUT_DIR: &str = "./generated_files";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub output_dir: PathBuf,
    pub render_api_url: String,
    /// Overrides the scheme and host used when building links to published files.
    pub public_base_url: Option<String>,
    pub session_ttl_secs: u64,
    pub session_capacity: u64,
    pub max_upload_bytes: usize,
    pub git_update_repo: Option<PathBuf>,
    pub git_update_branch: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            render_api_url: DEFAULT_RENDER_API_URL.to_string(),
            public_base_url: None,
            session_ttl_secs: 60 * 60,
            session_capacity: 10_000,
            max_upload_bytes: 5 * 1024 * 1024,
            git_update_repo: None,
            git_update_branch: "main".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup; unset or blank keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            host: get("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", get("PORT"), defaults.port)?,
            output_dir: get("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            render_api_url: get("RENDER_API_URL").unwrap_or(defaults.render_api_url),
            public_base_url: get("PUBLIC_BASE_URL").map(|url| url.trim_end_matches('/').to_string()),
            session_ttl_secs: parse_or(
                "SESSION_TTL_SECS",
                get("SESSION_TTL_SECS"),
                defaults.session_ttl_secs,
            )?,
            session_capacity: parse_or(
                "SESSION_CAPACITY",
                get("SESSION_CAPACITY"),
                defaults.session_capacity,
            )?,
            max_upload_bytes: parse_or(
                "MAX_UPLOAD_BYTES",
                get("MAX_UPLOAD_BYTES"),
                defaults.max_upload_bytes,
            )?,
            git_update_repo: get("GIT_UPDATE_REPO").map(PathBuf::from),
            git_update_branch: get("GIT_UPDATE_BRANCH").unwrap_or(defaults.git_update_branch),
        })
    }
}

fn parse_or<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(default),
    }
}
