pub mod handlers;
pub mod multipart_parser;
pub mod page;

pub use handlers::config;
