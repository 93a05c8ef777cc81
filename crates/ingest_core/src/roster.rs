//! Roster reconciliation: compare persons observed in freshly scraped events
//! against a previously known roster and surface membership changes.
//!
//! The output is a change-detection signal for human review. Nothing here
//! writes back to the known-roster store; a single scrape is never trusted
//! to mutate it.

use std::collections::BTreeSet;

use time::Date;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

use crate::names::{NameMatcher, NameVariantSource};
use crate::schema::{EventIngestionModel, Person};

/// Names of known persons who appear to have left, and of scraped persons
/// not present in the known roster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterDiff {
    pub old_names: BTreeSet<String>,
    pub new_names: BTreeSet<String>,
}

/// Distinct persons referenced as a matter sponsor or a vote's person across
/// all minutes items of all supplied events. Distinctness is by full value
/// equality, first-seen order.
pub fn extract_event_persons(events: &[EventIngestionModel]) -> Vec<Person> {
    let mut persons: Vec<Person> = Vec::new();
    for event in events {
        for item in &event.event_minutes_items {
            if let Some(matter) = &item.matter {
                for sponsor in &matter.sponsors {
                    if !persons.contains(sponsor) {
                        persons.push(sponsor.clone());
                    }
                }
            }
            for vote in &item.votes {
                if !persons.contains(&vote.person) {
                    persons.push(vote.person.clone());
                }
            }
        }
    }
    persons
}

/// Compare `scraped` against `known`.
///
/// A known person is old when no scraped person matches by name equivalence,
/// when the match is flagged inactive, or when the match's latest role
/// end-datetime on one of the `primary_bodies` falls strictly before
/// `today`. A scraped person is new when nothing in the known roster matches.
pub fn reconcile_roster<V: NameVariantSource>(
    scraped: &[Person],
    known: &[Person],
    primary_bodies: &[String],
    today: Date,
    matcher: &NameMatcher<V>,
) -> RosterDiff {
    let mut diff = RosterDiff::default();

    for person in known {
        let matched = scraped
            .iter()
            .find(|s| matcher.names_equivalent(&s.name, &person.name));
        let is_old = match matched {
            None => true,
            Some(matched) => {
                !matched.is_active
                    || latest_primary_term_end(matched, primary_bodies)
                        .is_some_and(|end| end < today)
            }
        };
        if is_old {
            tracing::debug!(name = %person.name, "known person flagged as departed");
            diff.old_names.insert(person.name.clone());
        }
    }

    for person in scraped {
        let is_known = known
            .iter()
            .any(|k| matcher.names_equivalent(&person.name, &k.name));
        if !is_known {
            tracing::debug!(name = %person.name, "scraped person not in known roster");
            diff.new_names.insert(person.name.clone());
        }
    }

    diff
}

/// Latest parseable end date among the person's roles on a primary body.
fn latest_primary_term_end(person: &Person, primary_bodies: &[String]) -> Option<Date> {
    let seat = person.seat.as_ref()?;
    let mut latest: Option<Date> = None;
    for role in &seat.roles {
        if !primary_bodies.iter().any(|b| b == &role.body.name) {
            continue;
        }
        let Some(raw) = role.end_datetime.as_deref() else {
            continue;
        };
        match parse_date(raw) {
            Some(end) => {
                if latest.is_none_or(|cur| end > cur) {
                    latest = Some(end);
                }
            }
            None => {
                tracing::warn!(
                    name = %person.name,
                    value = raw,
                    "unparsable role end datetime; term not treated as expired"
                );
            }
        }
    }
    latest
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates.
pub(crate) fn parse_date(raw: &str) -> Option<Date> {
    if let Ok(dt) = time::OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(dt.date());
    }
    let date_only = format_description!("[year]-[month]-[day]");
    Date::parse(raw, date_only).ok()
}
