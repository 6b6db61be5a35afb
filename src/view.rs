//! Display view-model for the schedule
//!
//! Converts board state into plain records a renderer can draw without
//! knowing anything about the pipeline.

use chrono::{NaiveDate, TimeZone, Utc};
use chrono_tz::America::New_York;
use serde::Serialize;

use crate::config::STREAM_PAGE;
use crate::data::Match;
use crate::pipeline::{LoadState, MatchBoard};

/// Icon used when a sport has no dedicated one
const DEFAULT_ICON: &str = "fas fa-trophy";

/// One match card as shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchCard {
    pub id: String,
    pub sport: String,
    pub tournament: String,
    pub title: String,
    pub is_live: bool,
    /// Start time in US Eastern, e.g. "07:00 PM ET"
    pub time_label: String,
    /// Date key as "Jan 1"
    pub date_label: String,
    pub sport_icon: &'static str,
    /// "N streams available", absent when there are no channels
    pub stream_label: Option<String>,
    /// Link to the stream page for this match
    pub stream_url: String,
}

/// What the schedule area should show
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum ScheduleView {
    /// Nothing has loaded yet
    Loading,
    /// The latest load failed; offer a retry
    Failed { message: String },
    /// Loaded, but nothing passes the filter
    Empty,
    /// Cards in start-time order
    Cards(Vec<MatchCard>),
}

/// Builds the view for a board's load state, filter and matches
pub fn build_view(board: &MatchBoard) -> ScheduleView {
    match board.state() {
        LoadState::Loading => ScheduleView::Loading,
        LoadState::Failed(message) => ScheduleView::Failed {
            message: message.clone(),
        },
        LoadState::Ready => {
            let cards: Vec<_> = board.visible_matches().iter().map(MatchCard::from).collect();
            if cards.is_empty() {
                ScheduleView::Empty
            } else {
                ScheduleView::Cards(cards)
            }
        }
    }
}

impl From<&Match> for MatchCard {
    fn from(m: &Match) -> Self {
        MatchCard {
            id: m.id.clone(),
            sport: m.sport.clone(),
            tournament: m.tournament.clone(),
            title: m.title.clone(),
            is_live: m.is_live,
            time_label: format_time(m.timestamp),
            date_label: format_date(&m.date),
            sport_icon: sport_icon(&m.sport),
            stream_label: stream_label(m.channels.len()),
            stream_url: stream_url(&m.id, &m.title),
        }
    }
}

/// Formats a unix timestamp as 12-hour Eastern time
pub fn format_time(timestamp: i64) -> String {
    match Utc.timestamp_opt(timestamp, 0).single() {
        Some(utc) => format!("{} ET", utc.with_timezone(&New_York).format("%I:%M %p")),
        None => "--:-- ET".to_string(),
    }
}

/// Formats a `YYYY-MM-DD` key as "Jan 1"; other keys pass through
pub fn format_date(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%b %-d").to_string())
        .unwrap_or_else(|_| date.to_string())
}

/// Icon class for a sport
pub fn sport_icon(sport: &str) -> &'static str {
    match sport {
        "Basketball" => "fas fa-basketball-ball",
        "Football" => "fas fa-football-ball",
        "Ice Hockey" => "fas fa-hockey-puck",
        "Golf" => "fas fa-golf-ball",
        "Tennis" => "fas fa-tennis-ball",
        "Soccer" => "fas fa-futbol",
        "UFC" => "fas fa-user-ninja",
        "Boxing" => "fas fa-boxing-glove",
        "MMA" => "fas fa-people-arrows",
        "Mixed Martial Arts" => "fas fa-fist-raised",
        _ => DEFAULT_ICON,
    }
}

fn stream_label(channels: usize) -> Option<String> {
    match channels {
        0 => None,
        1 => Some("1 stream available".to_string()),
        n => Some(format!("{n} streams available")),
    }
}

fn stream_url(id: &str, title: &str) -> String {
    format!(
        "{STREAM_PAGE}?id={}&match={}",
        encode_component(id),
        encode_component(title)
    )
}

/// Percent-encodes everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`
fn encode_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{EventsByDate, RawEvent};

    const KICKOFF: i64 = 1_704_110_400; // 2024-01-01 12:00 UTC

    fn sample_match(channels: usize) -> Match {
        Match {
            id: "basketball-a-vs-b-1704110400".to_string(),
            date: "2024-01-01".to_string(),
            timestamp: KICKOFF,
            sport: "Basketball".to_string(),
            tournament: "NBA".to_string(),
            title: "A vs B".to_string(),
            channels: (0..channels).map(|i| format!("ch{i}")).collect(),
            is_live: true,
        }
    }

    #[test]
    fn test_format_time_in_eastern() {
        // Noon UTC in January is 7 AM EST
        assert_eq!(format_time(KICKOFF), "07:00 AM ET");
        // 2024-07-01 00:00 UTC is 8 PM EDT the previous evening
        assert_eq!(format_time(1_719_792_000), "08:00 PM ET");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-01-01"), "Jan 1");
        assert_eq!(format_date("2024-12-25"), "Dec 25");
        assert_eq!(format_date("tomorrow"), "tomorrow");
    }

    #[test]
    fn test_sport_icon_fallback() {
        assert_eq!(sport_icon("Soccer"), "fas fa-futbol");
        assert_eq!(sport_icon("soccer"), DEFAULT_ICON);
        assert_eq!(sport_icon("Darts"), DEFAULT_ICON);
    }

    #[test]
    fn test_stream_label_pluralization() {
        assert_eq!(stream_label(0), None);
        assert_eq!(stream_label(1).as_deref(), Some("1 stream available"));
        assert_eq!(stream_label(3).as_deref(), Some("3 streams available"));
    }

    #[test]
    fn test_stream_url_encodes_components() {
        assert_eq!(
            stream_url("basketball-a-vs-b-1", "A vs B & Co/Ltd"),
            "stream.html?id=basketball-a-vs-b-1&match=A%20vs%20B%20%26%20Co%2FLtd"
        );
        assert_eq!(encode_component("é"), "%C3%A9");
        assert_eq!(encode_component("it's (ok)!"), "it's%20(ok)!");
    }

    #[test]
    fn test_card_from_match() {
        let card = MatchCard::from(&sample_match(2));

        assert_eq!(card.id, "basketball-a-vs-b-1704110400");
        assert_eq!(card.date_label, "Jan 1");
        assert_eq!(card.sport_icon, "fas fa-basketball-ball");
        assert_eq!(card.stream_label.as_deref(), Some("2 streams available"));
        assert!(card.is_live);
    }

    #[test]
    fn test_build_view_states() {
        let mut board = MatchBoard::default();
        assert_eq!(build_view(&board), ScheduleView::Loading);

        let mut events = EventsByDate::new();
        events.insert(
            "2024-01-01".to_string(),
            vec![RawEvent {
                unix_timestamp: Some(KICKOFF),
                sport: "Basketball".to_string(),
                tournament: "NBA".to_string(),
                title: "A vs B".to_string(),
                channels: vec![],
            }],
        );
        let seq = board.begin_request();
        board.apply_response(seq, &events, KICKOFF);

        match build_view(&board) {
            ScheduleView::Cards(cards) => {
                assert_eq!(cards.len(), 1);
                assert_eq!(cards[0].stream_label, None);
            }
            other => panic!("expected cards, got {other:?}"),
        }

        board.set_filter("tennis");
        assert_eq!(build_view(&board), ScheduleView::Empty);

        let seq = board.begin_request();
        board.record_failure(seq, "offline");
        assert_eq!(
            build_view(&board),
            ScheduleView::Failed {
                message: "offline".to_string()
            }
        );
    }
}
