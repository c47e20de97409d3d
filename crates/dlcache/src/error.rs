//! Error types for dlcache

use dlfetch::FetchError;
use thiserror::Error;

/// Result type alias for slot cache operations
pub type Result<T> = std::result::Result<T, CacheError>;

/// Error types for slot cache operations
#[derive(Error, Debug)]
pub enum CacheError {
    /// Requested capacity is above the supported maximum
    #[error("Capacity {requested} out of range (max {max})")]
    Capacity {
        /// Capacity asked for
        requested: usize,
        /// Largest accepted capacity
        max: usize,
    },

    /// Slot index outside `[0, capacity)`
    #[error("Slot {index} out of range (capacity {capacity})")]
    IndexOutOfRange {
        /// Index passed in
        index: usize,
        /// Cache capacity
        capacity: usize,
    },

    /// Tried to bind a URL into a slot that is still in use
    #[error("Slot {index} is occupied; call next_free() first")]
    SlotOccupied {
        /// Occupied slot
        index: usize,
    },

    /// Tried to read a slot with nothing bound to it
    #[error("Slot {index} is empty")]
    EmptySlot {
        /// Empty slot
        index: usize,
    },

    /// Zero-capacity cache has no slot to hand out
    #[error("Cache has zero capacity")]
    NoCapacity,

    /// Fetching the slot's URL failed; the slot stays unfetched
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl CacheError {
    /// Whether the error came from the fetch layer rather than slot bookkeeping
    pub fn is_fetch(&self) -> bool {
        matches!(self, CacheError::Fetch(_))
    }
}
