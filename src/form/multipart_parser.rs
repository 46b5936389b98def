use actix_multipart::Multipart;
use futures_util::StreamExt;
use log::debug;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// As sent by the browser; empty when no file was chosen.
    pub filename: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct ParsedForm {
    pub fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl ParsedForm {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn action(&self) -> Option<&str> {
        self.field("action")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FormParseError {
    #[error("Multipart field error: {0}")]
    FieldError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Invalid UTF-8 data in field '{field}': {reason}")]
    Utf8Error { field: String, reason: String },
    #[error("Upload exceeds the limit of {limit} bytes")]
    TooLarge { limit: usize },
}

pub struct MultipartParser;

impl MultipartParser {
    /// Collects the text fields of the form and the optional `file` part.
    ///
    /// The total number of bytes read across all parts is capped at `max_bytes`.
    pub async fn parse_form(
        mut multipart: Multipart,
        max_bytes: usize,
    ) -> Result<ParsedForm, FormParseError> {
        let mut form = ParsedForm::default();
        let mut total = 0usize;

        while let Some(item) = multipart.next().await {
            let mut field = item.map_err(|e| FormParseError::FieldError(e.to_string()))?;
            let content_disposition = field
                .content_disposition()
                .ok_or_else(|| FormParseError::FieldError("Content disposition not found".to_string()))?;
            let name = content_disposition
                .get_name()
                .ok_or_else(|| FormParseError::FieldError("Field name not found".to_string()))?
                .to_string();
            let filename = content_disposition.get_filename().map(str::to_string);

            let mut buffer = Vec::new();
            while let Some(chunk) = field.next().await {
                let data_chunk = chunk.map_err(|e| FormParseError::IoError(e.to_string()))?;
                total += data_chunk.len();
                if total > max_bytes {
                    return Err(FormParseError::TooLarge { limit: max_bytes });
                }
                buffer.extend_from_slice(&data_chunk);
            }

            match (name.as_str(), filename) {
                ("file", Some(filename)) => {
                    debug!("Received file part '{}' ({} bytes)", filename, buffer.len());
                    form.file = Some(UploadedFile {
                        filename,
                        content: buffer,
                    });
                }
                _ => {
                    let value = String::from_utf8(buffer).map_err(|e| FormParseError::Utf8Error {
                        field: name.clone(),
                        reason: e.to_string(),
                    })?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }
}
