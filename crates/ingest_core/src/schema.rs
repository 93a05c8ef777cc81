use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Body {
    pub name: String,        // e.g. "City Council"
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Role {
    pub title: Option<String>,           // e.g. "Councilmember", "Chair"
    pub body: Body,
    pub start_datetime: Option<String>,  // ISO-8601 timestamp (UTC recommended)
    pub end_datetime: Option<String>,    // ISO-8601; in the past => term lapsed
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Seat {
    pub name: String,                    // e.g. "Position 4"
    pub electoral_area: Option<String>,  // e.g. "District 4" or "Citywide"
    pub roles: Vec<Role>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Person {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub picture_uri: Option<String>,
    pub is_active: bool,
    pub seat: Option<Seat>,
    pub external_source_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatterStatus {
    Adopted,
    InProgress,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Matter {
    pub name: String,                // short identifier, e.g. "CB 120001"
    pub title: String,               // full legislative title
    pub matter_type: Option<String>, // e.g. "Ordinance", "Resolution"
    pub sponsors: Vec<Person>,
    pub result_status: Option<MatterStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoteDecision {
    Approve,
    Reject,
    AbstainNonVoting,
    AbstainApprove,
    AbstainReject,
    AbsentNonVoting,
    AbsentApprove,
    AbsentReject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Vote {
    pub person: Person,
    pub decision: Option<VoteDecision>, // None = unknown, person must still resolve
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemDecision {
    Passed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MinutesItem {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SupportingFile {
    pub name: Option<String>,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EventMinutesItem {
    pub minutes_item: MinutesItem,
    pub matter: Option<Matter>,
    pub decision: Option<ItemDecision>,
    pub votes: Vec<Vote>,
    pub supporting_files: Vec<SupportingFile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Session {
    pub session_datetime: Option<String>, // ISO-8601 timestamp (UTC recommended)
    pub video_uri: Option<String>,
    pub caption_uri: Option<String>,
    pub session_index: i64,               // zero-based segment order within the event
    pub external_source_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EventIngestionModel {
    pub body: Body,
    pub sessions: Vec<Session>,          // ordered by session_index
    pub event_minutes_items: Vec<EventMinutesItem>,
    pub agenda_uri: Option<String>,
    pub minutes_uri: Option<String>,
    pub external_source_id: Option<String>,
}
