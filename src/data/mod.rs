//! Core data models for the LiveSports schedule
//!
//! This module contains the wire schema decoded from the schedule API
//! (`RawEvent`, `EventSchedule`) and the canonical `Match` record the
//! pipeline derives from it.

pub mod client;
pub mod decode;

pub use client::{filter_by_sport, filter_live, ScheduleError, SportsApiClient};
pub use decode::{decode, decode_json, decode_xml, DecodeError};

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Events grouped by calendar date key (`YYYY-MM-DD`)
pub type EventsByDate = BTreeMap<String, Vec<RawEvent>>;

/// Response format requested from the schedule API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Structured data (`format=json`)
    #[default]
    Json,
    /// Markup (`format=xml`)
    Xml,
}

impl Format {
    /// Value sent as the `format` query parameter
    pub fn as_query(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Xml => "xml",
        }
    }

    /// Parses a format name, accepting the wire names and their aliases.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" | "structured" => Some(Format::Json),
            "xml" | "markup" => Some(Format::Xml),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

/// A single scheduled event as delivered by the API
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawEvent {
    /// Start time in unix seconds; `None` when absent or not a number
    #[serde(
        default,
        alias = "unixTimestamp",
        deserialize_with = "lenient_timestamp"
    )]
    pub unix_timestamp: Option<i64>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub sport: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub tournament: String,
    /// Match title, e.g. "Lakers vs Celtics"
    #[serde(rename = "match", default, deserialize_with = "nullable_string")]
    pub title: String,
    /// Channel identifiers, possibly empty
    #[serde(default, alias = "channel", deserialize_with = "nullable_list")]
    pub channels: Vec<String>,
}

/// Decoded schedule payload
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventSchedule {
    /// Events keyed by date
    #[serde(default)]
    pub events: EventsByDate,
}

impl EventSchedule {
    /// Total number of events across all date groups
    pub fn event_count(&self) -> usize {
        self.events.values().map(Vec::len).sum()
    }
}

/// Canonical, flattened match record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Derived identifier (`sport-title-timestamp`, slugged)
    pub id: String,
    /// Date key of the group the event came from
    pub date: String,
    /// Start time in unix seconds
    pub timestamp: i64,
    pub sport: String,
    pub tournament: String,
    pub title: String,
    pub channels: Vec<String>,
    /// Liveness at normalization time
    pub is_live: bool,
}

/// Accepts an integer, a numeric string, or null/garbage (as `None`).
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Some(serde_json::Value::String(s)) => parse_timestamp(&s),
        _ => None,
    })
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parses a textual unix timestamp; surrounding whitespace is ignored.
pub(crate) fn parse_timestamp(text: &str) -> Option<i64> {
    text.trim().parse::<i64>().ok()
}
