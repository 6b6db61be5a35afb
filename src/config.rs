//! Configuration for the schedule client and match pipeline
//!
//! Every tunable has a compile-time default. `ScheduleConfig::from_env` lets a
//! deployment override them without a rebuild.

use std::env;
use std::time::Duration;

/// Schedule endpoint (accepts `?format=json|xml`)
pub const DEFAULT_API_URL: &str = "https://topembed.pw/api.php";

/// How long a fetched payload is served from cache
pub const CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Span after kick-off during which a match counts as live
pub const LIVE_WINDOW: Duration = Duration::from_secs(3 * 3600);

/// Interval of the live-count timer
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Sport dropped from the match list (exact, case-sensitive)
pub const EXCLUDED_SPORT: &str = "Cricket";

/// Page that plays a match stream
pub const STREAM_PAGE: &str = "stream.html";

/// Runtime configuration shared by the client, pipeline and refresh timer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleConfig {
    /// Schedule endpoint URL, without query string
    pub api_url: String,
    /// Cache time-to-live per format
    pub cache_ttl: Duration,
    /// Liveness window after a match's start time
    pub live_window: Duration,
    /// Live-count timer interval
    pub refresh_interval: Duration,
    /// Sport name excluded from processed matches
    pub excluded_sport: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            cache_ttl: CACHE_TTL,
            live_window: LIVE_WINDOW,
            refresh_interval: REFRESH_INTERVAL,
            excluded_sport: EXCLUDED_SPORT.to_string(),
        }
    }
}

impl ScheduleConfig {
    /// Builds a config from defaults overlaid with `LIVESPORTS_*` variables.
    ///
    /// Empty or unparseable values keep the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            api_url: non_empty_var("LIVESPORTS_API_URL").unwrap_or(defaults.api_url),
            cache_ttl: secs_var("LIVESPORTS_CACHE_TTL_SECS").unwrap_or(defaults.cache_ttl),
            live_window: secs_var("LIVESPORTS_LIVE_WINDOW_SECS").unwrap_or(defaults.live_window),
            refresh_interval: secs_var("LIVESPORTS_REFRESH_INTERVAL_SECS")
                .unwrap_or(defaults.refresh_interval),
            excluded_sport: non_empty_var("LIVESPORTS_EXCLUDED_SPORT")
                .unwrap_or(defaults.excluded_sport),
        }
    }

    /// Liveness window in whole seconds
    pub fn live_window_secs(&self) -> i64 {
        i64::try_from(self.live_window.as_secs()).unwrap_or(i64::MAX)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn secs_var(name: &str) -> Option<Duration> {
    non_empty_var(name)
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_uses_constants() {
        let config = ScheduleConfig::default();
        assert_eq!(config.api_url, "https://topembed.pw/api.php");
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.live_window, Duration::from_secs(10_800));
        assert_eq!(config.refresh_interval, Duration::from_secs(60));
        assert_eq!(config.excluded_sport, "Cricket");
    }

    #[test]
    fn test_live_window_secs() {
        let config = ScheduleConfig::default();
        assert_eq!(config.live_window_secs(), 10_800);
    }

    #[test]
    fn test_from_env_overrides_and_falls_back() {
        env::set_var("LIVESPORTS_CACHE_TTL_SECS", "42");
        env::set_var("LIVESPORTS_LIVE_WINDOW_SECS", "not-a-number");
        env::set_var("LIVESPORTS_EXCLUDED_SPORT", "   ");

        let config = ScheduleConfig::from_env();

        env::remove_var("LIVESPORTS_CACHE_TTL_SECS");
        env::remove_var("LIVESPORTS_LIVE_WINDOW_SECS");
        env::remove_var("LIVESPORTS_EXCLUDED_SPORT");

        assert_eq!(config.cache_ttl, Duration::from_secs(42));
        assert_eq!(config.live_window, LIVE_WINDOW);
        assert_eq!(config.excluded_sport, EXCLUDED_SPORT);
    }
}
