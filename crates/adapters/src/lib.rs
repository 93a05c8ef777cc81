//! `adapters` — pluggable producers of ingestion-model events.
//!
//! Every source platform (committee-management APIs, city web pages, video
//! search) implements [`SourceAdapter`]; the shared shaping helpers in
//! [`shape`] do the normalization work so an adapter only has to fetch and
//! deserialize its raw payload.

use anyhow::Result;
use time::OffsetDateTime;

use ingest_core::schema::EventIngestionModel;

pub mod archive;
pub mod config;
pub mod shape;

pub use archive::ArchiveAdapter;
pub use config::{ScraperConfig, VotePatterns};

pub trait SourceAdapter {
    fn name(&self) -> &str;

    /// Normalized events whose first session falls within `[begin, end)`.
    fn get_events(
        &self,
        begin: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<Vec<EventIngestionModel>>;
}
