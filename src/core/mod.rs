pub mod analyzer;
pub mod audit;
pub mod engine;
pub mod markup;
pub mod meta;
pub mod ping;
pub mod robots;
pub mod score;
pub mod sitemap;
pub mod social;
pub mod structured_data;
pub mod text;

pub use crate::domain::model::{Artifact, AuditReport, SeoScoreResult};
pub use crate::domain::ports::{Fetcher, Storage, Tool};
pub use crate::utils::error::Result;

/// Treats blank strings like a missing value.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
