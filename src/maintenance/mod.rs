//! Operator hook that refreshes a local checkout of the template repository.
//!
//! Only mounted when `GIT_UPDATE_REPO` is configured. Runs the `git` CLI:
//! fetch, reset the tracking branch onto `origin/<branch>`, fast-forward pull.

use actix_web::{web, HttpResponse};
use log::{error, info};
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::{AppState, ErrorResponse};

#[derive(Debug, thiserror::Error)]
pub enum GitUpdateError {
    #[error("failed to run git {step}: {source}")]
    Io {
        step: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("git {step} exited with status {code}: {stderr}")]
    Exit {
        step: &'static str,
        code: i32,
        stderr: String,
    },
}

#[derive(Debug, Clone)]
pub struct GitUpdater {
    repo_dir: PathBuf,
    branch: String,
}

impl GitUpdater {
    pub fn new(repo_dir: impl Into<PathBuf>, branch: impl Into<String>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
            branch: branch.into(),
        }
    }

    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }

    /// The git invocations performed by [`GitUpdater::pull`], in order.
    pub fn steps(&self) -> Vec<(&'static str, Vec<String>)> {
        let remote_branch = format!("origin/{}", self.branch);
        vec![
            ("fetch", vec!["fetch".into(), "origin".into()]),
            (
                "checkout",
                vec![
                    "checkout".into(),
                    "-B".into(),
                    self.branch.clone(),
                    "--track".into(),
                    remote_branch,
                ],
            ),
            ("pull", vec!["pull".into(), "--ff-only".into()]),
        ]
    }

    pub async fn pull(&self) -> Result<(), GitUpdateError> {
        for (step, args) in self.steps() {
            let output = Command::new("git")
                .arg("-C")
                .arg(&self.repo_dir)
                .args(&args)
                .output()
                .await
                .map_err(|source| GitUpdateError::Io { step, source })?;

            if !output.status.success() {
                return Err(GitUpdateError::Exit {
                    step,
                    code: output.status.code().unwrap_or(-1),
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                });
            }
        }
        Ok(())
    }
}

#[utoipa::path(
    tag = "Maintenance",
    post,
    path = "/git_update",
    responses(
        (status = 200, description = "Template repository updated"),
        (status = 404, description = "Git update is not configured", body = ErrorResponse),
        (status = 500, description = "git failed", body = ErrorResponse)
    )
)]
pub async fn git_update(data: web::Data<AppState>) -> HttpResponse {
    let Some(updater) = data.git_updater.as_ref() else {
        return HttpResponse::NotFound().json(ErrorResponse::not_found("Git update is not configured"));
    };

    info!("Updating template repository at {}", updater.repo_dir().display());
    match updater.pull().await {
        Ok(()) => {
            info!("Template repository updated");
            HttpResponse::Ok().finish()
        }
        Err(e) => {
            error!("Template repository update failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&e.to_string()))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/git_update").route(web::post().to(git_update)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_track_configured_branch() {
        let updater = GitUpdater::new("docmosis", "main");
        let steps = updater.steps();

        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].1, vec!["fetch", "origin"]);
        assert_eq!(steps[1].1, vec!["checkout", "-B", "main", "--track", "origin/main"]);
        assert_eq!(steps[2].1, vec!["pull", "--ff-only"]);
    }

    #[tokio::test]
    async fn test_pull_outside_a_repository_fails() {
        let dir = tempfile::tempdir().unwrap();
        let updater = GitUpdater::new(dir.path(), "main");

        let err = updater.pull().await.unwrap_err();
        assert!(matches!(
            err,
            GitUpdateError::Io { step: "fetch", .. } | GitUpdateError::Exit { step: "fetch", .. }
        ));
    }
}
