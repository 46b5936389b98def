//! CSV to line-item normalization.
//!
//! The uploaded file must carry at least the `qty`, `ItemName`, `itemDescription`
//! and `amt` columns. Text columns are copied verbatim, `amt` is re-rendered with
//! two fraction digits. The first bad amount aborts the whole file.

use log::debug;

use super::models::{LineItem, LineItemDocument};

pub const REQUIRED_COLUMNS: [&str; 4] = ["qty", "ItemName", "itemDescription", "amt"];

const UTF8_BOM: &str = "\u{feff}";

#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("File is not valid UTF-8 text: {0}")]
    Encoding(#[from] std::str::Utf8Error),
    #[error("CSV file must contain the following headers: 'qty', 'ItemName', 'itemDescription', 'amt' (missing: {})", .missing.join(", "))]
    Schema { missing: Vec<String> },
    #[error("Row {row}: could not convert amount '{value}' to a number")]
    AmountFormat { row: usize, value: String },
    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

struct ColumnIndexes {
    quantity: usize,
    item_name: usize,
    item_description: usize,
    amount: usize,
}

impl ColumnIndexes {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, NormalizeError> {
        let position = |name: &str| headers.iter().position(|header| header == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|column| position(column).is_none())
            .map(|column| column.to_string())
            .collect();

        match (
            position("qty"),
            position("ItemName"),
            position("itemDescription"),
            position("amt"),
        ) {
            (Some(quantity), Some(item_name), Some(item_description), Some(amount)) => Ok(Self {
                quantity,
                item_name,
                item_description,
                amount,
            }),
            _ => Err(NormalizeError::Schema { missing }),
        }
    }
}

/// Parses raw upload bytes into a [`LineItemDocument`].
pub fn normalize(raw: &[u8]) -> Result<LineItemDocument, NormalizeError> {
    let text = std::str::from_utf8(raw)?;
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let columns = ColumnIndexes::resolve(reader.headers()?)?;

    let mut items = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let row = index + 1;
        let cell = |at: usize| record.get(at).unwrap_or_default().to_string();

        let raw_amount = cell(columns.amount);
        let amount = format_amount(&raw_amount)
            .ok_or_else(|| NormalizeError::AmountFormat { row, value: raw_amount })?;

        items.push(LineItem {
            quantity: cell(columns.quantity),
            item_name: cell(columns.item_name),
            item_description: cell(columns.item_description),
            amount,
        });
    }

    debug!("Normalized {} line items from CSV upload", items.len());
    Ok(LineItemDocument::new(items))
}

/// Renders a decimal string with exactly two fraction digits, or `None` when it is
/// not a finite number.
pub fn format_amount(raw: &str) -> Option<String> {
    let value: f64 = raw.trim().parse().ok()?;
    value.is_finite().then(|| format!("{value:.2}"))
}
