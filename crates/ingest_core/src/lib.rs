//! `ingest_core` — normalization and reconciliation core for municipal
//! meeting scraping.
//!
//! Pure, synchronous functions over in-memory data: the common ingestion
//! model, text canonicalization, name equivalence, the minimum-viable-record
//! filter, and roster reconciliation. Source adapters and file IO live in
//! the `adapters` crate.

pub mod names;
pub mod phonetic;
pub mod roster;
pub mod schema;
pub mod text;
pub mod viable;

pub use names::{NameMatcher, NameVariantSource, NoVariants, StaticVariantTable};
pub use roster::{RosterDiff, extract_event_persons, reconcile_roster};
pub use text::{reduce, simplify};
pub use viable::{ViabilityCache, minimally_viable};
