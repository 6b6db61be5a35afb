//! Match pipeline: normalization, filtering and live counting
//!
//! Turns a decoded schedule into a flat, time-ordered list of `Match` records
//! and derives the filtered view and live count from it. The free functions
//! are pure; `MatchBoard` is the session object that owns the current list,
//! the selected filter and the request sequencing.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::ScheduleConfig;
use crate::data::{EventsByDate, Match, RawEvent};
use crate::view::{build_view, ScheduleView};

/// Filter value that selects every match
pub const ALL_FILTER: &str = "all";

/// Whether a match starting at `timestamp` is live at `now`.
///
/// True iff `0 <= now - timestamp <= window_secs`.
pub fn is_live_at(timestamp: i64, now: i64, window_secs: i64) -> bool {
    match now.checked_sub(timestamp) {
        Some(elapsed) => (0..=window_secs).contains(&elapsed),
        None => false,
    }
}

/// Derives a stable match identifier from sport, title and start time.
///
/// The joined text is lowercased, every character outside `[a-z0-9]` becomes
/// `-`, and runs of `-` collapse to one.
pub fn match_id(sport: &str, title: &str, timestamp: i64) -> String {
    let raw = format!("{sport}-{title}-{timestamp}").to_lowercase();

    let mut id = String::with_capacity(raw.len());
    for c in raw.chars() {
        let c = if c.is_ascii_lowercase() || c.is_ascii_digit() {
            c
        } else {
            '-'
        };
        if c == '-' && id.ends_with('-') {
            continue;
        }
        id.push(c);
    }
    id
}

/// Flattens a schedule into matches sorted by start time.
///
/// Events whose sport equals `excluded_sport` exactly are dropped, as are
/// events without a usable timestamp. The sort is stable, so matches that
/// start together keep date-group order.
pub fn normalize(
    events: &EventsByDate,
    now: i64,
    excluded_sport: &str,
    window_secs: i64,
) -> Vec<Match> {
    let mut matches = Vec::new();

    for (date, day_events) in events {
        for event in day_events {
            if event.sport == excluded_sport {
                continue;
            }
            match to_match(date, event, now, window_secs) {
                Some(m) => matches.push(m),
                None => warn!(
                    date = %date,
                    sport = %event.sport,
                    title = %event.title,
                    "Skipping event without a usable timestamp"
                ),
            }
        }
    }

    matches.sort_by_key(|m| m.timestamp);
    matches
}

fn to_match(date: &str, event: &RawEvent, now: i64, window_secs: i64) -> Option<Match> {
    let timestamp = event.unix_timestamp?;

    Some(Match {
        id: match_id(&event.sport, &event.title, timestamp),
        date: date.to_string(),
        timestamp,
        sport: event.sport.clone(),
        tournament: event.tournament.clone(),
        title: event.title.clone(),
        channels: event.channels.clone(),
        is_live: is_live_at(timestamp, now, window_secs),
    })
}

/// Applies a display filter.
///
/// `"all"` returns every match; anything else keeps matches whose sport or
/// tournament contains the filter text, ignoring case.
pub fn filter_matches(filter: &str, matches: &[Match]) -> Vec<Match> {
    if filter == ALL_FILTER {
        return matches.to_vec();
    }

    let needle = filter.to_lowercase();
    matches
        .iter()
        .filter(|m| {
            m.sport.to_lowercase().contains(&needle)
                || m.tournament.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Counts matches flagged live at normalization time
pub fn update_live_count(matches: &[Match]) -> usize {
    matches.iter().filter(|m| m.is_live).count()
}

/// Where the board is in its load cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// No response has been applied yet
    Loading,
    /// The latest applied response succeeded
    Ready,
    /// The latest applied response failed
    Failed(String),
}

/// Session state for one schedule display
///
/// Owns the sorted match list, the selected filter and the live count. Every
/// fetch should take a sequence number from `begin_request` and hand its
/// outcome to `apply_response` or `record_failure`; outcomes older than the
/// newest applied one are discarded.
#[derive(Debug, Clone)]
pub struct MatchBoard {
    matches: Vec<Match>,
    filter: String,
    live_count: usize,
    state: LoadState,
    excluded_sport: String,
    live_window_secs: i64,
    next_sequence: u64,
    applied_sequence: Option<u64>,
}

impl Default for MatchBoard {
    fn default() -> Self {
        Self::new(&ScheduleConfig::default())
    }
}

impl MatchBoard {
    /// Creates an empty board in the `Loading` state
    pub fn new(config: &ScheduleConfig) -> Self {
        Self {
            matches: Vec::new(),
            filter: ALL_FILTER.to_string(),
            live_count: 0,
            state: LoadState::Loading,
            excluded_sport: config.excluded_sport.clone(),
            live_window_secs: config.live_window_secs(),
            next_sequence: 0,
            applied_sequence: None,
        }
    }

    /// Rebuilds the match list from `events` as of the current time
    pub fn process_matches(&mut self, events: &EventsByDate) {
        self.process_matches_at(events, Utc::now().timestamp());
    }

    /// Rebuilds the match list from `events` as of `now` (unix seconds).
    ///
    /// The previous list is replaced wholesale and the live count recomputed.
    pub fn process_matches_at(&mut self, events: &EventsByDate, now: i64) {
        self.matches = normalize(events, now, &self.excluded_sport, self.live_window_secs);
        self.state = LoadState::Ready;
        self.refresh_live_count();

        info!(
            matches = self.matches.len(),
            live = self.live_count,
            "Processed matches"
        );
    }

    /// Issues the sequence number for a new fetch
    pub fn begin_request(&mut self) -> u64 {
        self.next_sequence += 1;
        self.next_sequence
    }

    /// Applies the response to fetch `sequence` if nothing newer has been applied.
    ///
    /// Returns `false` when the response was stale and discarded.
    pub fn apply_response(&mut self, sequence: u64, events: &EventsByDate, now: i64) -> bool {
        if !self.accept_sequence(sequence) {
            return false;
        }
        self.process_matches_at(events, now);
        true
    }

    /// Records a failed fetch under the same ordering as `apply_response`.
    ///
    /// The board switches to the error state; the previous list is kept but is
    /// not rendered until a later response succeeds.
    pub fn record_failure(&mut self, sequence: u64, message: impl Into<String>) -> bool {
        if !self.accept_sequence(sequence) {
            return false;
        }
        self.state = LoadState::Failed(message.into());
        true
    }

    fn accept_sequence(&mut self, sequence: u64) -> bool {
        if self.applied_sequence.is_some_and(|applied| sequence <= applied) {
            warn!(
                sequence,
                applied = self.applied_sequence,
                "Discarding stale schedule response"
            );
            return false;
        }
        self.applied_sequence = Some(sequence);
        true
    }

    /// Recomputes the live count from the held list without refetching
    pub fn refresh_live_count(&mut self) -> usize {
        self.live_count = update_live_count(&self.matches);
        debug!(live = self.live_count, "Live count updated");
        self.live_count
    }

    /// All matches, sorted by start time
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn live_count(&self) -> usize {
        self.live_count
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Selects the display filter (`"all"` or a sport/tournament fragment)
    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
    }

    /// Matches passing the current filter
    pub fn visible_matches(&self) -> Vec<Match> {
        filter_matches(&self.filter, &self.matches)
    }

    /// Display model for the current state
    pub fn view(&self) -> ScheduleView {
        build_view(self)
    }
}
