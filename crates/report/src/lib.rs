//! Markdown reports for human review of roster reconciliation output.
//!
//! The reconciliation engine only produces a change-detection signal; a
//! person updates the static roster store after reading the report. One note
//! is written per run, named by date.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use time::OffsetDateTime;
use time::macros::format_description;

use ingest_core::RosterDiff;

/// Counts carried into the report frontmatter.
#[derive(Debug, Clone, Copy)]
pub struct ReportContext {
    pub known_count: usize,
    pub scraped_count: usize,
}

/// Write the roster diff as a markdown note under `out_dir`, returning the
/// note's path.
pub fn write_roster_report(
    diff: &RosterDiff,
    context: ReportContext,
    generated_at: OffsetDateTime,
    out_dir: &Path,
) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)?;

    let day = format_description!("[year]-[month]-[day]");
    let stamp = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");
    let date = generated_at.format(&day)?;
    let note_path = out_dir.join(format!("roster-diff-{date}.md"));

    let mut md = String::new();
    md.push_str("---\n");
    md.push_str(&format!("generated_at: {}\n", generated_at.format(&stamp)?));
    md.push_str(&format!("known_count: {}\n", context.known_count));
    md.push_str(&format!("scraped_count: {}\n", context.scraped_count));
    md.push_str(&format!("departure_count: {}\n", diff.old_names.len()));
    md.push_str(&format!("new_count: {}\n", diff.new_names.len()));
    md.push_str("---\n\n");

    md.push_str(&format!("# Roster Diff - {date}\n\n"));
    md.push_str("This report is generated. Do not edit manually.\n\n");
    md.push_str(
        "Review each name below before touching the static roster store; \
         a single scrape is never authoritative.\n\n",
    );

    md.push_str("## Departure Candidates\n\n");
    if diff.old_names.is_empty() {
        md.push_str("_No departure candidates found._\n");
    } else {
        for name in &diff.old_names {
            md.push_str(&format!("- {name}\n"));
        }
    }
    md.push('\n');

    md.push_str("## New Member Candidates\n\n");
    if diff.new_names.is_empty() {
        md.push_str("_No new member candidates found._\n");
    } else {
        for name in &diff.new_names {
            md.push_str(&format!("- {name}\n"));
        }
    }

    fs::write(&note_path, md)?;
    Ok(note_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use time::macros::datetime;

    #[test]
    fn writes_note_with_counts_and_sections() {
        let dir = tempfile::tempdir().unwrap();
        let diff = RosterDiff {
            old_names: BTreeSet::from(["Brian Holt".to_string()]),
            new_names: BTreeSet::new(),
        };
        let path = write_roster_report(
            &diff,
            ReportContext {
                known_count: 9,
                scraped_count: 8,
            },
            datetime!(2026-08-06 07:30:00 UTC),
            dir.path(),
        )
        .unwrap();

        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("roster-diff-2026-08-06.md")
        );
        let body = fs::read_to_string(&path).unwrap();
        assert!(body.contains("departure_count: 1"));
        assert!(body.contains("- Brian Holt"));
        assert!(body.contains("_No new member candidates found._"));
        assert!(body.contains("Do not edit manually."));
    }

    #[test]
    fn empty_diff_still_produces_a_note() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_roster_report(
            &RosterDiff::default(),
            ReportContext {
                known_count: 0,
                scraped_count: 0,
            },
            datetime!(2026-08-06 07:30:00 UTC),
            dir.path(),
        )
        .unwrap();
        let body = fs::read_to_string(&path).unwrap();
        assert!(body.contains("_No departure candidates found._"));
    }
}
