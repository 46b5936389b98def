use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

pub const DEFAULT_OUTPUT_NAME: &str = "result.pdf";
pub const DEFAULT_DEV_MODE: &str = "n";

/// Form-supplied settings forwarded to the rendering API next to the data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub access_key: Option<String>,
    pub template_name: Option<String>,
    /// Defaults to `result.pdf`.
    pub output_name: String,
    /// Defaults to `n`.
    pub dev_mode: String,
    /// Defaults to an empty string.
    pub store_to: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            access_key: None,
            template_name: None,
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            dev_mode: DEFAULT_DEV_MODE.to_string(),
            store_to: String::new(),
        }
    }
}

impl RenderOptions {
    /// Reads the submit form fields. `outputName` and `devMode` fall back to their
    /// defaults when absent or blank; `storeTo` is passed through as given.
    pub fn from_fields(fields: &HashMap<String, String>) -> Self {
        let defaults = Self::default();
        let non_blank = |key: &str| {
            fields
                .get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        Self {
            access_key: fields.get("accessKey").cloned(),
            template_name: fields.get("templateName").cloned(),
            output_name: non_blank("outputName").unwrap_or(defaults.output_name),
            dev_mode: non_blank("devMode").unwrap_or(defaults.dev_mode),
            store_to: fields.get("storeTo").cloned().unwrap_or(defaults.store_to),
        }
    }
}

/// Body POSTed to the rendering API. `data` sits next to the other keys, never
/// wrapped in a further envelope.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub access_key: Option<String>,
    pub template_name: Option<String>,
    pub output_name: String,
    pub dev_mode: String,
    pub store_to: String,
    pub data: Value,
}

impl RenderRequest {
    pub fn new(options: RenderOptions, data: Value) -> Self {
        Self {
            access_key: options.access_key,
            template_name: options.template_name,
            output_name: options.output_name,
            dev_mode: options.dev_mode,
            store_to: options.store_to,
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub output_name: String,
    pub content: Vec<u8>,
}
