//! Client for the external document rendering API.

pub mod client;
pub mod models;

pub use client::{submit, DocumentRenderer, RenderClient, RenderError};
pub use models::{RenderOptions, RenderRequest, RenderedDocument};
