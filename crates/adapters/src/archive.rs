//! Adapter over a directory of pre-scraped raw event JSON files.
//!
//! Serves as the reference `SourceAdapter` implementation: network-backed
//! adapters produce the same `RawEvent` records and reuse the same shaping
//! path, differing only in how the raw payload is fetched.

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use time::OffsetDateTime;

use ingest_core::schema::EventIngestionModel;
use ingest_core::viable::ViabilityCache;

use crate::SourceAdapter;
use crate::config::ScraperConfig;
use crate::shape::{RawEvent, assemble_event, parse_datetime};

pub struct ArchiveAdapter {
    name: String,
    dir: PathBuf,
    config: ScraperConfig,
}

impl ArchiveAdapter {
    pub fn new(name: impl Into<String>, dir: impl Into<PathBuf>, config: ScraperConfig) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
            config,
        }
    }
}

impl SourceAdapter for ArchiveAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_events(
        &self,
        begin: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<Vec<EventIngestionModel>> {
        let cache = ViabilityCache::new();
        let mut paths: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("json"))
            .collect();
        paths.sort();

        let mut events = Vec::new();
        for path in paths {
            tracing::debug!(adapter = %self.name, file = %path.display(), "reading raw events");
            let raw_text = fs::read_to_string(&path)?;
            let raw_events: Vec<RawEvent> = serde_json::from_str(&raw_text)?;
            for raw in raw_events {
                let Some(event) = assemble_event(raw, &self.config, &cache)? else {
                    tracing::debug!(file = %path.display(), "raw event failed minimum viable ingestion");
                    continue;
                };
                if event_in_window(&event, begin, end) {
                    events.push(event);
                }
            }
        }
        Ok(events)
    }
}

/// An event belongs to the window when its first session datetime falls in
/// `[begin, end)`. A viable event always carries a session datetime; if the
/// text does not parse, the event is excluded rather than guessed at.
fn event_in_window(event: &EventIngestionModel, begin: OffsetDateTime, end: OffsetDateTime) -> bool {
    let first = event
        .sessions
        .iter()
        .find_map(|s| parse_datetime(s.session_datetime.as_deref()));
    match first {
        Some(dt) => begin <= dt && dt < end,
        None => {
            tracing::warn!("event sessions carry no parseable datetime; excluded from window");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use time::macros::datetime;

    fn write_archive(dir: &Path) {
        let raw = r#"[
          {
            "body": "City Council",
            "external_source_id": "evt-1",
            "sessions": [
              {"datetime": "2026-08-03T18:00:00Z", "video_uri": "https://video/1.mp4"}
            ],
            "items": []
          },
          {
            "body": "City Council",
            "external_source_id": "evt-2",
            "sessions": [
              {"datetime": "2026-09-10T18:00:00Z", "video_uri": "https://video/2.mp4"}
            ],
            "items": []
          }
        ]"#;
        fs::write(dir.join("events.json"), raw).unwrap();
    }

    #[test]
    fn window_filters_events() {
        let dir = tempfile::tempdir().unwrap();
        write_archive(dir.path());
        let adapter = ArchiveAdapter::new("archive", dir.path(), ScraperConfig::default());
        let events = adapter
            .get_events(
                datetime!(2026-08-01 00:00:00 UTC),
                datetime!(2026-09-01 00:00:00 UTC),
            )
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].external_source_id.as_deref(), Some("evt-1"));
    }

    #[test]
    fn non_json_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        write_archive(dir.path());
        fs::write(dir.path().join("README.txt"), "not events").unwrap();
        let adapter = ArchiveAdapter::new("archive", dir.path(), ScraperConfig::default());
        let events = adapter
            .get_events(
                datetime!(2026-01-01 00:00:00 UTC),
                datetime!(2027-01-01 00:00:00 UTC),
            )
            .unwrap();
        assert_eq!(events.len(), 2);
    }
}
