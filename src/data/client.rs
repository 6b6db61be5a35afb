//! TopEmbed schedule API client
//!
//! Fetches the event schedule in either response format, decodes it and
//! serves repeat requests for the same format from a short-lived cache.

use chrono::Utc;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::{decode, DecodeError, EventSchedule, EventsByDate, Format};
use crate::cache::CacheManager;
use crate::config::ScheduleConfig;
use crate::pipeline::is_live_at;

/// Errors that can occur when fetching the schedule
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// The API answered with a non-success status
    #[error("API responded with status: {status}")]
    Fetch { status: u16 },

    /// The body could not be decoded in the requested format
    #[error("Failed to decode {format} response: {source}")]
    Decode {
        format: Format,
        #[source]
        source: DecodeError,
    },

    /// Transport-level failure (connect, TLS, body read)
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),
}

impl ScheduleError {
    /// Status code carried by a `Fetch` error
    pub fn status(&self) -> Option<u16> {
        match self {
            ScheduleError::Fetch { status } => Some(*status),
            _ => None,
        }
    }
}

/// Client for the schedule endpoint with a per-format cache
#[derive(Debug, Clone)]
pub struct SportsApiClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Decoded payloads keyed by format
    cache: CacheManager,
    /// Endpoint, TTL and liveness settings
    config: ScheduleConfig,
}

impl Default for SportsApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SportsApiClient {
    /// Creates a client with the default configuration
    pub fn new() -> Self {
        Self::with_config(ScheduleConfig::default())
    }

    /// Creates a client with a custom configuration
    pub fn with_config(config: ScheduleConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Creates a client with a custom HTTP client
    pub fn with_client(http_client: Client, config: ScheduleConfig) -> Self {
        Self {
            http_client,
            cache: CacheManager::new(config.cache_ttl),
            config,
        }
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Handle to the underlying cache
    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }

    /// Fetches the event schedule in the given format
    ///
    /// # Behavior
    /// - Returns the cached payload if one younger than the TTL exists
    /// - Otherwise issues exactly one GET with `format` as a query parameter
    /// - Non-success statuses fail with `ScheduleError::Fetch` and are not cached
    /// - Successful payloads are cached for the format and returned
    pub async fn fetch_events(&self, format: Format) -> Result<EventSchedule, ScheduleError> {
        let now = Utc::now();

        if let Some(cached) = self.cache.fresh_at(format, now) {
            debug!(%format, "Returning cached events");
            return Ok(cached);
        }

        let url = format!("{}?format={}", self.config.api_url, format.as_query());
        debug!(%url, "Fetching schedule");

        let response = self.http_client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), %format, "Schedule API returned an error status");
            return Err(ScheduleError::Fetch {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let schedule =
            decode(format, &body).map_err(|source| ScheduleError::Decode { format, source })?;

        info!(
            %format,
            days = schedule.events.len(),
            events = schedule.event_count(),
            "Fetched schedule"
        );

        self.cache.write_at(format, &schedule, now);
        Ok(schedule)
    }

    /// Fetches the structured schedule and keeps events for one sport.
    ///
    /// An event matches when its sport equals `sport` ignoring case, or its
    /// tournament contains `sport` ignoring case. Dates left without events
    /// are omitted.
    pub async fn get_events_by_sport(&self, sport: &str) -> Result<EventsByDate, ScheduleError> {
        let schedule = self.fetch_events(Format::Json).await?;
        Ok(filter_by_sport(&schedule.events, sport))
    }

    /// Keeps only events inside the liveness window at the current time
    pub fn live_events(&self, events: &EventsByDate) -> EventsByDate {
        filter_live(events, Utc::now().timestamp(), self.config.live_window_secs())
    }

    /// Drops every cached payload
    pub fn clear_cache(&self) {
        self.cache.clear();
        info!("API cache cleared");
    }
}

/// Sport/tournament filter behind `get_events_by_sport`
pub fn filter_by_sport(events: &EventsByDate, sport: &str) -> EventsByDate {
    let needle = sport.to_lowercase();

    retain_groups(events, |event| {
        event.sport.to_lowercase() == needle || event.tournament.to_lowercase().contains(&needle)
    })
}

/// Keeps events whose start lies within `window_secs` before `now_secs`.
///
/// Events without a usable timestamp are never live. Dates left without
/// events are omitted.
pub fn filter_live(events: &EventsByDate, now_secs: i64, window_secs: i64) -> EventsByDate {
    retain_groups(events, |event| {
        event
            .unix_timestamp
            .is_some_and(|ts| is_live_at(ts, now_secs, window_secs))
    })
}

fn retain_groups<F>(events: &EventsByDate, keep: F) -> EventsByDate
where
    F: Fn(&super::RawEvent) -> bool,
{
    events
        .iter()
        .filter_map(|(date, day_events)| {
            let kept: Vec<_> = day_events.iter().filter(|&e| keep(e)).cloned().collect();
            (!kept.is_empty()).then(|| (date.clone(), kept))
        })
        .collect()
}
