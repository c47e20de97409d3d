//! # dlcache
//!
//! Fixed-capacity, slot-addressed cache for remote text documents.
//!
//! ## Architecture
//! - **Slots**: boxed slice of `Option<CacheEntry>`, sized once at construction (max 1000)
//! - **Entries**: fetch lazily on first read, then serve the memoized text
//! - **Eviction**: least-frequently-accessed slot, lowest index on ties (O(capacity) scan)
//!
//! ## Usage
//! 1. `next_free()` to find (or make) an empty slot
//! 2. `set(slot, url)` to bind a URL to it
//! 3. `get(slot)` to read; the first read fetches, later reads are hits

#![warn(missing_docs)]

mod cache;
mod entry;
mod error;
mod stats;

pub use cache::{SlotCache, MAX_CAPACITY};
pub use entry::CacheEntry;
pub use error::{CacheError, Result};
pub use stats::CacheStats;

pub use dlfetch::{Fetch, FetchError};
