pub mod models;
pub mod normalizer;

pub use models::{LineItem, LineItemDocument};
pub use normalizer::{normalize, NormalizeError, REQUIRED_COLUMNS};
