//! Cache module for decoded API responses
//!
//! Holds one payload per response format with a short TTL so repeated
//! requests within the window are served without touching the network.
//! Nothing is persisted; the cache lives as long as the process.

mod manager;

pub use manager::{CacheManager, CachedData};
