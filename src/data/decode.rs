//! Response decoders for the two schedule formats
//!
//! Both decoders produce the same `EventSchedule`. The markup decoder walks a
//! typed schema: `day` elements carrying a `date` attribute, each holding
//! `event` elements with scalar children and repeated `channel` children.

use serde::Deserialize;
use thiserror::Error;

use super::{parse_timestamp, EventSchedule, EventsByDate, Format, RawEvent};

/// Errors raised while decoding a response body
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Structured body is not valid schedule JSON
    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// Markup body is not valid schedule XML
    #[error("Failed to parse XML response: {0}")]
    Xml(#[from] quick_xml::DeError),
}

#[derive(Debug, Deserialize)]
struct XmlSchedule {
    #[serde(rename = "day", default)]
    days: Vec<XmlDay>,
}

#[derive(Debug, Deserialize)]
struct XmlDay {
    #[serde(rename = "@date", default)]
    date: String,
    #[serde(rename = "event", default)]
    events: Vec<XmlEvent>,
}

#[derive(Debug, Deserialize)]
struct XmlEvent {
    #[serde(rename = "unixTimestamp", default)]
    unix_timestamp: Option<String>,
    #[serde(default)]
    sport: Option<String>,
    #[serde(default)]
    tournament: Option<String>,
    #[serde(rename = "match", default)]
    title: Option<String>,
    #[serde(rename = "channel", default)]
    channels: Vec<String>,
}

impl From<XmlEvent> for RawEvent {
    fn from(event: XmlEvent) -> Self {
        RawEvent {
            // Absent or non-integer text is unusable downstream
            unix_timestamp: event.unix_timestamp.as_deref().and_then(parse_timestamp),
            sport: event.sport.unwrap_or_default(),
            tournament: event.tournament.unwrap_or_default(),
            title: event.title.unwrap_or_default(),
            channels: event.channels,
        }
    }
}

/// Decodes a response body according to the requested format
pub fn decode(format: Format, body: &str) -> Result<EventSchedule, DecodeError> {
    match format {
        Format::Json => decode_json(body),
        Format::Xml => decode_xml(body),
    }
}

/// Decodes a structured (`format=json`) body
pub fn decode_json(body: &str) -> Result<EventSchedule, DecodeError> {
    Ok(serde_json::from_str(body)?)
}

/// Decodes a markup (`format=xml`) body.
///
/// A repeated date attribute replaces the earlier group, mirroring how the
/// structured format keys its map.
pub fn decode_xml(body: &str) -> Result<EventSchedule, DecodeError> {
    let schedule: XmlSchedule = quick_xml::de::from_str(body)?;

    let mut events = EventsByDate::new();
    for day in schedule.days {
        let day_events = day.events.into_iter().map(RawEvent::from).collect();
        events.insert(day.date, day_events);
    }

    Ok(EventSchedule { events })
}
