//! LiveSports Library
//!
//! Fetches a sports schedule, caches it per response format, and turns it
//! into a sorted, filterable list of matches with a live count.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod pipeline;
pub mod refresh;
pub mod view;
