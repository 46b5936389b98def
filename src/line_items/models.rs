use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One normalized row of an uploaded CSV.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
pub struct LineItem {
    #[serde(rename = "qty")]
    #[schema(example = "2")]
    pub quantity: String,
    #[serde(rename = "ItemName")]
    #[schema(example = "Widget")]
    pub item_name: String,
    #[serde(rename = "itemDescription")]
    #[schema(example = "A small widget")]
    pub item_description: String,
    /// Always carries exactly two fraction digits.
    #[serde(rename = "amt")]
    #[schema(example = "3.50")]
    pub amount: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq, ToSchema)]
pub struct LineItemDocument {
    pub items: Vec<LineItem>,
}

impl LineItemDocument {
    pub fn new(items: Vec<LineItem>) -> Self {
        Self { items }
    }

    /// Pretty JSON with two-space indentation, the form the document takes in the
    /// session cache and the form textarea.
    pub fn to_json_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
