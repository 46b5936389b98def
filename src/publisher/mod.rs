//! Persists rendered documents on disk and maps them to `/files/{filename}` URLs.
//!
//! The output directory is a flat namespace. Writing an existing name replaces the
//! previous file; concurrent writers of the same name race with last-writer-wins.

pub mod handlers;

use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;
use std::io;
use std::path::{Path, PathBuf};

pub const FILES_ROUTE_PREFIX: &str = "/files";

lazy_static! {
    static ref SAFE_FILENAME: Regex =
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]{0,254}$").expect("filename pattern is valid");
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Invalid output file name '{0}': use letters, digits, '.', '_' or '-' and start with a letter or digit")]
    InvalidFilename(String),
    #[error("File '{0}' not found")]
    NotFound(String),
    #[error("Failed to write '{filename}': {source}")]
    Io {
        filename: String,
        #[source]
        source: io::Error,
    },
}

/// Checks that `name` is a single, plain path component.
pub fn validate_filename(name: &str) -> Result<&str, PublishError> {
    if SAFE_FILENAME.is_match(name) {
        Ok(name)
    } else {
        Err(PublishError::InvalidFilename(name.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct FilePublisher {
    output_dir: PathBuf,
}

impl FilePublisher {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub async fn ensure_output_dir(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.output_dir).await
    }

    pub fn file_path(&self, filename: &str) -> Result<PathBuf, PublishError> {
        Ok(self.output_dir.join(validate_filename(filename)?))
    }

    /// Writes `content` under `filename` and returns the path the file is served at.
    pub async fn publish(&self, filename: &str, content: &[u8]) -> Result<String, PublishError> {
        let path = self.file_path(filename)?;
        let io_error = |source| PublishError::Io {
            filename: filename.to_string(),
            source,
        };

        self.ensure_output_dir().await.map_err(io_error)?;
        tokio::fs::write(&path, content).await.map_err(io_error)?;

        info!("Published {} ({} bytes)", path.display(), content.len());
        Ok(Self::url_path(filename))
    }

    /// Path of an already published file.
    pub async fn locate(&self, filename: &str) -> Result<PathBuf, PublishError> {
        let path = self
            .file_path(filename)
            .map_err(|_| PublishError::NotFound(filename.to_string()))?;

        match tokio::fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => Ok(path),
            _ => {
                debug!("No published file at {}", path.display());
                Err(PublishError::NotFound(filename.to_string()))
            }
        }
    }

    pub fn url_path(filename: &str) -> String {
        format!("{}/{}", FILES_ROUTE_PREFIX, filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_filename_accepts_plain_names() {
        for name in ["result.pdf", "Quote_2024-01.pdf", "a", "report.v2.final.pdf"] {
            assert!(validate_filename(name).is_ok(), "{name} should be accepted");
        }
    }

    #[test]
    fn test_validate_filename_rejects_paths() {
        for name in [
            "",
            "../secret.pdf",
            "dir/file.pdf",
            "..\\win.pdf",
            ".hidden",
            "/etc/passwd",
            "name with space.pdf",
            "résumé.pdf",
        ] {
            assert!(
                matches!(validate_filename(name), Err(PublishError::InvalidFilename(_))),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_filename_rejects_overlong_names() {
        let name = format!("{}.pdf", "a".repeat(300));
        assert!(validate_filename(&name).is_err());
    }

    #[test]
    fn test_url_path() {
        assert_eq!(FilePublisher::url_path("result.pdf"), "/files/result.pdf");
    }
}
