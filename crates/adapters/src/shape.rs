//! Shared record shaping: the raw intermediate records every adapter
//! produces, and the helpers that turn them into ingestion-model values.
//!
//! Adapters differ in how they fetch and parse a source; once a `RawEvent`
//! exists, filtering, decision inference, session ordering, and viability
//! checks are identical across municipalities and live here.

use anyhow::Result;
use serde::Deserialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use ingest_core::schema::{
    Body, EventIngestionModel, EventMinutesItem, ItemDecision, Matter, MatterStatus, MinutesItem,
    Person, Session, SupportingFile, Vote, VoteDecision,
};
use ingest_core::text::{reduce, simplify};
use ingest_core::viable::{ViabilityCache, minimally_viable};

use crate::config::{ScraperConfig, VotePatterns};

/// One scraped meeting, before normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEvent {
    pub body: String,
    pub agenda_uri: Option<String>,
    pub minutes_uri: Option<String>,
    pub external_source_id: Option<String>,
    #[serde(default)]
    pub sessions: Vec<RawSession>,
    #[serde(default)]
    pub items: Vec<RawItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSession {
    pub datetime: Option<String>,
    pub video_uri: Option<String>,
    pub caption_uri: Option<String>,
    pub external_source_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawItem {
    pub name: String,
    pub description: Option<String>,
    pub matter_name: Option<String>,
    pub matter_title: Option<String>,
    pub matter_type: Option<String>,
    #[serde(default)]
    pub sponsors: Vec<String>,
    /// Free-text outcome, e.g. "Motion carried 7-2".
    pub result: Option<String>,
    #[serde(default)]
    pub votes: Vec<RawVote>,
    #[serde(default)]
    pub supporting_files: Vec<RawFile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawVote {
    pub person: String,
    /// Free-text decision as transcribed, e.g. "In Favor".
    pub decision: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawFile {
    pub name: Option<String>,
    pub uri: String,
}

/// Map a transcribed vote to a decision. Absence-style wording is checked
/// before reject so "not present" never reads as a "no".
pub fn infer_vote_decision(text: &str, patterns: &VotePatterns) -> Option<VoteDecision> {
    let lowered = simplify(text).to_lowercase();
    if lowered.is_empty() {
        return None;
    }
    if contains_any(&lowered, &patterns.absent) {
        return Some(VoteDecision::AbsentNonVoting);
    }
    if contains_any(&lowered, &patterns.abstain) {
        return Some(VoteDecision::AbstainNonVoting);
    }
    if contains_any(&lowered, &patterns.reject) {
        return Some(VoteDecision::Reject);
    }
    if contains_any(&lowered, &patterns.approve) {
        return Some(VoteDecision::Approve);
    }
    None
}

/// Map a free-text item outcome to passed/failed. Failure wording wins so
/// "motion to approve failed" reads as failed.
pub fn infer_item_decision(text: &str, patterns: &VotePatterns) -> Option<ItemDecision> {
    let lowered = simplify(text).to_lowercase();
    if lowered.is_empty() {
        return None;
    }
    if contains_any(&lowered, &patterns.failed) {
        return Some(ItemDecision::Failed);
    }
    if contains_any(&lowered, &patterns.passed) {
        return Some(ItemDecision::Passed);
    }
    None
}

pub fn infer_matter_status(text: &str, patterns: &VotePatterns) -> Option<MatterStatus> {
    let lowered = simplify(text).to_lowercase();
    if lowered.is_empty() {
        return None;
    }
    if contains_any(&lowered, &patterns.rejected) {
        return Some(MatterStatus::Rejected);
    }
    if contains_any(&lowered, &patterns.adopted) {
        return Some(MatterStatus::Adopted);
    }
    if contains_any(&lowered, &patterns.in_progress) {
        return Some(MatterStatus::InProgress);
    }
    None
}

fn contains_any(lowered: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|p| lowered.contains(p.as_str()))
}

/// Drop procedural minutes items (roll call, adjournment, ...) by lowercase
/// substring match against the configured ignore patterns.
pub fn filter_minutes_items(items: Vec<RawItem>, ignore_patterns: &[String]) -> Vec<RawItem> {
    items
        .into_iter()
        .filter(|item| {
            let name = simplify(&item.name).to_lowercase();
            let ignored = ignore_patterns.iter().any(|p| name.contains(p.as_str()));
            if ignored {
                tracing::debug!(item = %item.name, "minutes item matched ignore pattern");
            }
            !ignored
        })
        .collect()
}

/// Sort sessions chronologically and assign dense zero-based indices.
/// Sessions without a parseable datetime keep their scrape order.
pub fn order_sessions(mut raw: Vec<RawSession>) -> Vec<Session> {
    raw.sort_by(|a, b| {
        match (
            parse_datetime(a.datetime.as_deref()),
            parse_datetime(b.datetime.as_deref()),
        ) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => std::cmp::Ordering::Equal,
        }
    });
    raw.into_iter()
        .enumerate()
        .map(|(index, s)| Session {
            session_datetime: clean(s.datetime.as_deref()),
            video_uri: clean(s.video_uri.as_deref()),
            caption_uri: clean(s.caption_uri.as_deref()),
            session_index: index as i64,
            external_source_id: s.external_source_id,
        })
        .collect()
}

pub(crate) fn parse_datetime(raw: Option<&str>) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(raw?, &Rfc3339).ok()
}

fn clean(value: Option<&str>) -> Option<String> {
    value.map(simplify).filter(|v| !v.is_empty())
}

fn shape_person(name: &str) -> Person {
    Person {
        name: simplify(name),
        email: None,
        phone: None,
        website: None,
        picture_uri: None,
        is_active: true,
        seat: None,
        external_source_id: None,
    }
}

fn shape_matter(
    raw: &RawItem,
    config: &ScraperConfig,
    cache: &ViabilityCache,
) -> Result<Option<Matter>> {
    let sponsor_states: Vec<Option<Person>> = raw
        .sponsors
        .iter()
        .map(|s| minimally_viable(shape_person(s), cache))
        .collect::<Result<_>>()?;
    let sponsors = reduce(sponsor_states, false).unwrap_or_default();
    let matter = Matter {
        name: raw.matter_name.as_deref().map(simplify).unwrap_or_default(),
        title: raw.matter_title.as_deref().map(simplify).unwrap_or_default(),
        matter_type: clean(raw.matter_type.as_deref()),
        sponsors,
        result_status: raw
            .result
            .as_deref()
            .and_then(|r| infer_matter_status(r, &config.vote_patterns)),
    };
    minimally_viable(matter, cache)
}

/// Shape one raw minutes item. Votes whose person fails viability are
/// dropped because a vote must always be attributable.
pub fn shape_item(
    raw: RawItem,
    config: &ScraperConfig,
    cache: &ViabilityCache,
) -> Result<EventMinutesItem> {
    let matter = shape_matter(&raw, config, cache)?;
    let decision = raw
        .result
        .as_deref()
        .and_then(|r| infer_item_decision(r, &config.vote_patterns));

    let mut votes = Vec::new();
    for raw_vote in &raw.votes {
        match minimally_viable(shape_person(&raw_vote.person), cache)? {
            Some(person) => votes.push(Vote {
                person,
                decision: raw_vote
                    .decision
                    .as_deref()
                    .and_then(|d| infer_vote_decision(d, &config.vote_patterns)),
            }),
            None => {
                tracing::warn!(item = %raw.name, "vote without a resolvable person dropped");
            }
        }
    }

    let supporting_files = raw
        .supporting_files
        .iter()
        .filter(|f| !f.uri.trim().is_empty())
        .map(|f| SupportingFile {
            name: clean(f.name.as_deref()),
            uri: simplify(&f.uri),
        })
        .collect();

    Ok(EventMinutesItem {
        minutes_item: MinutesItem {
            name: simplify(&raw.name),
            description: clean(raw.description.as_deref()),
        },
        matter,
        decision,
        votes,
        supporting_files,
    })
}

/// Shape a whole raw event and apply the minimum viable ingestion contract.
/// Returns `None` when the event lacks a usable body or any viable session.
pub fn assemble_event(
    raw: RawEvent,
    config: &ScraperConfig,
    cache: &ViabilityCache,
) -> Result<Option<EventIngestionModel>> {
    let mut session_states = Vec::new();
    for session in order_sessions(raw.sessions) {
        session_states.push(minimally_viable(session, cache)?);
    }
    let kept = reduce(session_states, false).unwrap_or_default();
    // Re-index after dropping non-viable segments so indices stay dense.
    let sessions: Vec<Session> = kept
        .into_iter()
        .enumerate()
        .map(|(index, mut s)| {
            s.session_index = index as i64;
            s
        })
        .collect();

    let mut event_minutes_items = Vec::new();
    for item in filter_minutes_items(raw.items, &config.ignore_patterns) {
        event_minutes_items.push(shape_item(item, config, cache)?);
    }

    let event = EventIngestionModel {
        body: Body {
            name: simplify(&raw.body),
            is_active: true,
        },
        sessions,
        event_minutes_items,
        agenda_uri: clean(raw.agenda_uri.as_deref()),
        minutes_uri: clean(raw.minutes_uri.as_deref()),
        external_source_id: raw.external_source_id,
    };
    minimally_viable(event, cache)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns() -> VotePatterns {
        VotePatterns::default()
    }

    #[test]
    fn vote_decisions_infer_from_keywords() {
        let p = patterns();
        assert_eq!(infer_vote_decision("In Favor", &p), Some(VoteDecision::Approve));
        assert_eq!(infer_vote_decision("Nay", &p), Some(VoteDecision::Reject));
        assert_eq!(
            infer_vote_decision("Abstained", &p),
            Some(VoteDecision::AbstainNonVoting)
        );
        assert_eq!(
            infer_vote_decision("Not Present", &p),
            Some(VoteDecision::AbsentNonVoting)
        );
        assert_eq!(infer_vote_decision("¯\\_(ツ)_/¯", &p), None);
    }

    #[test]
    fn absence_wording_never_reads_as_a_no() {
        // "not present" contains "no"; the absent check runs first.
        assert_eq!(
            infer_vote_decision("not present", &patterns()),
            Some(VoteDecision::AbsentNonVoting)
        );
    }

    #[test]
    fn failure_wording_wins_over_approval_wording() {
        assert_eq!(
            infer_item_decision("Motion to approve failed", &patterns()),
            Some(ItemDecision::Failed)
        );
        assert_eq!(
            infer_item_decision("Motion carried", &patterns()),
            Some(ItemDecision::Passed)
        );
    }

    #[test]
    fn matter_status_infers_from_result_text() {
        let p = patterns();
        assert_eq!(infer_matter_status("Adopted 9-0", &p), Some(MatterStatus::Adopted));
        assert_eq!(infer_matter_status("Vetoed by Mayor", &p), Some(MatterStatus::Rejected));
        assert_eq!(
            infer_matter_status("Referred to committee", &p),
            Some(MatterStatus::InProgress)
        );
    }

    #[test]
    fn ignore_patterns_drop_procedural_items() {
        let items = vec![
            RawItem {
                name: "Roll Call".to_string(),
                description: None,
                matter_name: None,
                matter_title: None,
                matter_type: None,
                sponsors: vec![],
                result: None,
                votes: vec![],
                supporting_files: vec![],
            },
            RawItem {
                name: "CB 120001".to_string(),
                description: None,
                matter_name: None,
                matter_title: None,
                matter_type: None,
                sponsors: vec![],
                result: None,
                votes: vec![],
                supporting_files: vec![],
            },
        ];
        let kept = filter_minutes_items(items, &["roll call".to_string()]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "CB 120001");
    }

    #[test]
    fn sessions_sort_chronologically_with_dense_indices() {
        let raw = vec![
            RawSession {
                datetime: Some("2026-08-03T20:00:00Z".to_string()),
                video_uri: Some("https://video/2.mp4".to_string()),
                caption_uri: None,
                external_source_id: None,
            },
            RawSession {
                datetime: Some("2026-08-03T18:00:00Z".to_string()),
                video_uri: Some("https://video/1.mp4".to_string()),
                caption_uri: None,
                external_source_id: None,
            },
        ];
        let sessions = order_sessions(raw);
        assert_eq!(sessions[0].video_uri.as_deref(), Some("https://video/1.mp4"));
        assert_eq!(sessions[0].session_index, 0);
        assert_eq!(sessions[1].session_index, 1);
    }

    #[test]
    fn assemble_drops_event_with_no_viable_session() {
        let cache = ViabilityCache::new();
        let raw = RawEvent {
            body: "City Council".to_string(),
            agenda_uri: None,
            minutes_uri: None,
            external_source_id: None,
            sessions: vec![RawSession {
                datetime: Some("2026-08-03T18:00:00Z".to_string()),
                video_uri: None, // no video: not viable
                caption_uri: None,
                external_source_id: None,
            }],
            items: vec![],
        };
        let event = assemble_event(raw, &ScraperConfig::default(), &cache).unwrap();
        assert!(event.is_none());
    }

    #[test]
    fn assemble_keeps_viable_event_and_reindexes_sessions() {
        let cache = ViabilityCache::new();
        let raw = RawEvent {
            body: "  City   Council ".to_string(),
            agenda_uri: Some("https://agendas/1.pdf".to_string()),
            minutes_uri: None,
            external_source_id: Some("evt-1".to_string()),
            sessions: vec![
                RawSession {
                    datetime: Some("2026-08-03T18:00:00Z".to_string()),
                    video_uri: None, // dropped
                    caption_uri: None,
                    external_source_id: None,
                },
                RawSession {
                    datetime: Some("2026-08-03T20:00:00Z".to_string()),
                    video_uri: Some("https://video/2.mp4".to_string()),
                    caption_uri: None,
                    external_source_id: None,
                },
            ],
            items: vec![],
        };
        let event = assemble_event(raw, &ScraperConfig::default(), &cache)
            .unwrap()
            .expect("event should be viable");
        assert_eq!(event.body.name, "City Council");
        assert_eq!(event.sessions.len(), 1);
        assert_eq!(event.sessions[0].session_index, 0);
    }

    #[test]
    fn shape_item_drops_unattributable_votes_and_partial_matters() {
        let cache = ViabilityCache::new();
        let raw = RawItem {
            name: "CB 120001".to_string(),
            description: Some("  An ordinance  relating to parks ".to_string()),
            matter_name: Some("CB 120001".to_string()),
            matter_title: None, // matter fails viability
            matter_type: Some("Ordinance".to_string()),
            sponsors: vec!["Alice Grant".to_string()],
            result: Some("Motion carried".to_string()),
            votes: vec![
                RawVote {
                    person: "Alice Grant".to_string(),
                    decision: Some("In Favor".to_string()),
                },
                RawVote {
                    person: "   ".to_string(), // unattributable
                    decision: Some("In Favor".to_string()),
                },
            ],
            supporting_files: vec![],
        };
        let item = shape_item(raw, &ScraperConfig::default(), &cache).unwrap();
        assert!(item.matter.is_none());
        assert_eq!(item.decision, Some(ItemDecision::Passed));
        assert_eq!(item.votes.len(), 1);
        assert_eq!(item.votes[0].decision, Some(VoteDecision::Approve));
        assert_eq!(
            item.minutes_item.description.as_deref(),
            Some("An ordinance relating to parks")
        );
    }
}
