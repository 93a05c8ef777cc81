//! Minimum viable ingestion: a record missing any of its required fields is
//! dropped whole rather than emitted partially populated.

use std::collections::BTreeMap;
use std::sync::Mutex;

use anyhow::{Result, anyhow};

use crate::schema::{Body, EventIngestionModel, Matter, Person, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    Populated,
    Empty,
}

impl FieldState {
    pub fn of_text(value: Option<&str>) -> Self {
        match value {
            Some(s) if !s.is_empty() => Self::Populated,
            _ => Self::Empty,
        }
    }

    pub fn of_required_text(value: &str) -> Self {
        if value.is_empty() { Self::Empty } else { Self::Populated }
    }

    pub fn of_seq<T>(value: &[T]) -> Self {
        if value.is_empty() { Self::Empty } else { Self::Populated }
    }

    /// A present integer is always populated; zero is a real value, not an
    /// absence (`session_index` 0 is the valid first segment).
    pub fn of_int(_value: i64) -> Self {
        Self::Populated
    }
}

/// Declared viability contract for one schema type: the set of fields the
/// type requires to be non-empty, and how to read each field's state.
///
/// Asking for a field outside the declared set is a programmer error and
/// surfaces as an explicit error naming the field and the record type.
pub trait Viability: Sized {
    fn type_name() -> &'static str;
    fn required_fields() -> &'static [&'static str];
    fn field_state(&self, field: &str) -> Result<FieldState>;
}

/// Per-run memo of type name -> required-field list. Population is lazy and
/// idempotent, so concurrent scrape tasks may share one cache without
/// coordination beyond the interior lock.
#[derive(Debug, Default)]
pub struct ViabilityCache {
    required: Mutex<BTreeMap<&'static str, &'static [&'static str]>>,
}

impl ViabilityCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn required_for<T: Viability>(&self) -> &'static [&'static str] {
        let mut map = self.required.lock().unwrap_or_else(|e| e.into_inner());
        *map.entry(T::type_name()).or_insert_with(T::required_fields)
    }
}

/// Pass `record` through unchanged when every required field is populated;
/// collapse it to `None` otherwise. Nested records are evaluated
/// independently by their own contracts before being attached to a parent.
pub fn minimally_viable<T: Viability>(record: T, cache: &ViabilityCache) -> Result<Option<T>> {
    for field in cache.required_for::<T>() {
        if record.field_state(field)? == FieldState::Empty {
            return Ok(None);
        }
    }
    Ok(Some(record))
}

fn unknown_field(type_name: &str, field: &str) -> anyhow::Error {
    anyhow!("unknown required field `{field}` on {type_name}")
}

impl Viability for Person {
    fn type_name() -> &'static str {
        "Person"
    }

    fn required_fields() -> &'static [&'static str] {
        &["name"]
    }

    fn field_state(&self, field: &str) -> Result<FieldState> {
        match field {
            "name" => Ok(FieldState::of_required_text(&self.name)),
            _ => Err(unknown_field(Self::type_name(), field)),
        }
    }
}

impl Viability for Body {
    fn type_name() -> &'static str {
        "Body"
    }

    fn required_fields() -> &'static [&'static str] {
        &["name"]
    }

    fn field_state(&self, field: &str) -> Result<FieldState> {
        match field {
            "name" => Ok(FieldState::of_required_text(&self.name)),
            _ => Err(unknown_field(Self::type_name(), field)),
        }
    }
}

impl Viability for Session {
    fn type_name() -> &'static str {
        "Session"
    }

    fn required_fields() -> &'static [&'static str] {
        &["session_datetime", "video_uri", "session_index"]
    }

    fn field_state(&self, field: &str) -> Result<FieldState> {
        match field {
            "session_datetime" => Ok(FieldState::of_text(self.session_datetime.as_deref())),
            "video_uri" => Ok(FieldState::of_text(self.video_uri.as_deref())),
            "session_index" => Ok(FieldState::of_int(self.session_index)),
            _ => Err(unknown_field(Self::type_name(), field)),
        }
    }
}

impl Viability for Matter {
    fn type_name() -> &'static str {
        "Matter"
    }

    fn required_fields() -> &'static [&'static str] {
        &["name", "title"]
    }

    fn field_state(&self, field: &str) -> Result<FieldState> {
        match field {
            "name" => Ok(FieldState::of_required_text(&self.name)),
            "title" => Ok(FieldState::of_required_text(&self.title)),
            _ => Err(unknown_field(Self::type_name(), field)),
        }
    }
}

impl Viability for EventIngestionModel {
    fn type_name() -> &'static str {
        "EventIngestionModel"
    }

    fn required_fields() -> &'static [&'static str] {
        &["body", "sessions"]
    }

    fn field_state(&self, field: &str) -> Result<FieldState> {
        match field {
            "body" => Ok(FieldState::of_required_text(&self.body.name)),
            "sessions" => Ok(FieldState::of_seq(&self.sessions)),
            _ => Err(unknown_field(Self::type_name(), field)),
        }
    }
}
