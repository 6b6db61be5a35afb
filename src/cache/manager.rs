//! Cache manager for decoded schedule payloads
//!
//! Provides a `CacheManager` that keeps one entry per response format together
//! with the time it was fetched. Entries are fresh while younger than the TTL
//! and are replaced wholesale on refresh.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::data::{EventSchedule, Format};

/// A cached payload and its fetch time
#[derive(Debug, Clone)]
struct CacheEntry {
    data: EventSchedule,
    cached_at: DateTime<Utc>,
}

/// Result of a cache lookup
#[derive(Debug, Clone)]
pub struct CachedData {
    /// The cached payload
    pub data: EventSchedule,
    /// When the payload was fetched
    pub cached_at: DateTime<Utc>,
    /// Whether the entry has outlived the TTL
    pub is_expired: bool,
}

/// In-memory, format-scoped schedule cache
///
/// Cloning shares the underlying storage, so a clone handed to another task
/// sees the same entries.
#[derive(Debug, Clone)]
pub struct CacheManager {
    entries: Arc<Mutex<HashMap<Format, CacheEntry>>>,
    ttl: Duration,
}

impl CacheManager {
    /// Creates an empty cache with the given TTL
    pub fn new(ttl: std::time::Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl: Duration::from_std(ttl).unwrap_or(Duration::MAX),
        }
    }

    /// Time-to-live applied to every entry
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Stores `data` for `format`, stamped with the current time
    pub fn write(&self, format: Format, data: &EventSchedule) {
        self.write_at(format, data, Utc::now());
    }

    /// Stores `data` for `format`, stamped with `now`
    pub fn write_at(&self, format: Format, data: &EventSchedule, now: DateTime<Utc>) {
        self.entries.lock().insert(
            format,
            CacheEntry {
                data: data.clone(),
                cached_at: now,
            },
        );
    }

    /// Reads the entry for `format` relative to the current time
    pub fn read(&self, format: Format) -> Option<CachedData> {
        self.read_at(format, Utc::now())
    }

    /// Reads the entry for `format` relative to `now`.
    ///
    /// Returns `None` if nothing is cached for the format. An entry is fresh
    /// while `now - cached_at < ttl`.
    pub fn read_at(&self, format: Format, now: DateTime<Utc>) -> Option<CachedData> {
        let entries = self.entries.lock();
        let entry = entries.get(&format)?;
        let age = now - entry.cached_at;

        Some(CachedData {
            data: entry.data.clone(),
            cached_at: entry.cached_at,
            is_expired: age >= self.ttl,
        })
    }

    /// Returns the payload for `format` only if it is still fresh
    pub fn fresh_at(&self, format: Format, now: DateTime<Utc>) -> Option<EventSchedule> {
        self.read_at(format, now)
            .filter(|cached| !cached.is_expired)
            .map(|cached| cached.data)
    }

    /// Drops every entry
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Number of cached formats
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
