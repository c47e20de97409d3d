//! SlotCache: fixed array of lazily-fetched entries with LFU eviction

use dlfetch::Fetch;
use tracing::{debug, info, warn};

use crate::entry::CacheEntry;
use crate::error::{CacheError, Result};
use crate::stats::CacheStats;

/// Largest capacity a [`SlotCache`] accepts
pub const MAX_CAPACITY: usize = 1000;

/// Slot-addressed cache of remote text documents
///
/// Callers pick a slot with [`next_free`](SlotCache::next_free), bind a URL
/// with [`set`](SlotCache::set) and read through [`get`](SlotCache::get).
/// When every slot is taken, `next_free` discards the entry with the fewest
/// hits (lowest index on ties) and hands its slot back.
pub struct SlotCache<F> {
    /// One optional entry per slot; length never changes
    slots: Box<[Option<CacheEntry>]>,

    /// Used by entries on their first read
    fetcher: F,

    /// Cache statistics
    stats: CacheStats,
}

impl<F: Fetch> SlotCache<F> {
    /// Create a new cache with `capacity` empty slots
    ///
    /// # Arguments
    /// * `capacity` - Number of slots, at most [`MAX_CAPACITY`]
    /// * `fetcher` - Fetches a URL's text on an entry's first read
    ///
    /// # Returns
    /// * `Result<SlotCache<F>>` - Empty cache, or `CacheError::Capacity`
    pub fn new(capacity: usize, fetcher: F) -> Result<Self> {
        if capacity > MAX_CAPACITY {
            return Err(CacheError::Capacity {
                requested: capacity,
                max: MAX_CAPACITY,
            });
        }

        info!("Creating slot cache with {} slots", capacity);

        Ok(Self {
            slots: (0..capacity).map(|_| None).collect(),
            fetcher,
            stats: CacheStats::new(),
        })
    }

    /// Read the content of a slot, fetching it on the entry's first read
    ///
    /// # Arguments
    /// * `index` - Slot to read
    ///
    /// # Returns
    /// * `Result<&str>` - Content; `IndexOutOfRange`, `EmptySlot` or `Fetch` on failure
    pub fn get(&mut self, index: usize) -> Result<&str> {
        self.check_index(index)?;

        let entry = self.slots[index]
            .as_mut()
            .ok_or(CacheError::EmptySlot { index })?;
        let was_fetched = entry.is_fetched();

        match entry.get(&self.fetcher) {
            Ok(content) => {
                if was_fetched {
                    self.stats.record_hit();
                } else {
                    self.stats.record_miss();
                }
                Ok(content)
            }
            Err(e) => {
                warn!("Fetch for slot {} failed: {}", index, e);
                self.stats.record_fetch_failure();
                Err(e.into())
            }
        }
    }

    /// Bind a URL to an empty slot
    ///
    /// Occupied slots are never overwritten; free them with
    /// [`next_free`](SlotCache::next_free) first.
    ///
    /// # Arguments
    /// * `index` - Target slot, must be empty
    /// * `url` - Document to cache in that slot
    ///
    /// # Returns
    /// * `Result<usize>` - `index` on success
    pub fn set(&mut self, index: usize, url: impl Into<String>) -> Result<usize> {
        self.check_index(index)?;

        let slot = &mut self.slots[index];
        if slot.is_some() {
            return Err(CacheError::SlotOccupied { index });
        }

        let entry = CacheEntry::new(url);
        debug!("Bound {} to slot {}", entry.url(), index);
        *slot = Some(entry);
        self.stats.record_bind();

        Ok(index)
    }

    /// Find the first empty slot, evicting the least-accessed entry if full
    ///
    /// # Returns
    /// * `Result<usize>` - Index of an empty slot; `NoCapacity` for a zero-capacity cache
    pub fn next_free(&mut self) -> Result<usize> {
        if let Some(index) = self.slots.iter().position(Option::is_none) {
            return Ok(index);
        }

        let index = self.eviction_candidate().ok_or(CacheError::NoCapacity)?;
        if let Some(evicted) = self.slots[index].take() {
            debug!(
                "Evicted {} from slot {} ({} hits)",
                evicted.url(),
                index,
                evicted.access_count()
            );
        }
        self.stats.record_eviction();

        Ok(index)
    }

    /// Find a free slot and bind `url` to it
    pub fn insert(&mut self, url: impl Into<String>) -> Result<usize> {
        let index = self.next_free()?;
        self.set(index, url)
    }
}

impl<F> SlotCache<F> {
    /// Occupied slot with the fewest hits, lowest index on ties
    ///
    /// This is the slot [`next_free`](SlotCache::next_free) evicts once the
    /// cache is full. Nothing is removed.
    pub fn eviction_candidate(&self) -> Option<usize> {
        self.entries()
            .min_by_key(|(_, entry)| entry.access_count())
            .map(|(index, _)| index)
    }

    /// Inspect a slot without fetching or counting an access
    pub fn entry(&self, index: usize) -> Option<&CacheEntry> {
        self.slots.get(index)?.as_ref()
    }

    /// Occupied slots in index order
    pub fn entries(&self) -> impl Iterator<Item = (usize, &CacheEntry)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|entry| (index, entry)))
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Check if no slot is occupied
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Check if every slot is occupied
    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Get the fetcher used for misses
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.slots.len() {
            Ok(())
        } else {
            Err(CacheError::IndexOutOfRange {
                index,
                capacity: self.slots.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dlfetch::FetchError;
    use std::cell::Cell;

    const FREEBSD: &str = "https://people.freebsd.org/~crees/removed_ports/index.xml";
    const GOOGLE: &str = "https://google.com";

    fn echo(url: &str) -> dlfetch::Result<String> {
        Ok(format!("content of {}", url))
    }

    fn counting(calls: &Cell<usize>) -> impl Fn(&str) -> dlfetch::Result<String> + '_ {
        move |url: &str| {
            calls.set(calls.get() + 1);
            Ok(format!("content of {}", url))
        }
    }

    #[test]
    fn test_capacity_bounds() {
        for capacity in [0, 1, 2, 500, MAX_CAPACITY] {
            let cache = SlotCache::new(capacity, echo).unwrap();
            assert_eq!(cache.capacity(), capacity);
            assert_eq!(cache.len(), 0);
            assert!(cache.is_empty());
        }

        for capacity in [MAX_CAPACITY + 1, usize::MAX] {
            let result = SlotCache::new(capacity, echo);
            assert!(matches!(
                result,
                Err(CacheError::Capacity { requested, max: MAX_CAPACITY }) if requested == capacity
            ));
        }
    }

    #[test]
    fn test_next_free_on_empty_cache() {
        let mut cache = SlotCache::new(3, echo).unwrap();
        assert_eq!(cache.next_free().unwrap(), 0);
        // Asking again without binding gives the same slot
        assert_eq!(cache.next_free().unwrap(), 0);
    }

    #[test]
    fn test_next_free_scans_in_order() {
        let mut cache = SlotCache::new(3, echo).unwrap();
        cache.set(0, FREEBSD).unwrap();
        cache.set(2, GOOGLE).unwrap();

        assert_eq!(cache.next_free().unwrap(), 1);
        assert_eq!(cache.stats().evictions(), 0);
    }

    #[test]
    fn test_next_free_zero_capacity() {
        let mut cache = SlotCache::new(0, echo).unwrap();
        assert!(matches!(cache.next_free(), Err(CacheError::NoCapacity)));
        assert!(matches!(cache.insert(GOOGLE), Err(CacheError::NoCapacity)));
    }

    #[test]
    fn test_set_rejects_occupied_slot() {
        let mut cache = SlotCache::new(2, echo).unwrap();

        assert_eq!(cache.set(1, FREEBSD).unwrap(), 1);
        assert!(matches!(
            cache.set(1, GOOGLE),
            Err(CacheError::SlotOccupied { index: 1 })
        ));
        // Original binding untouched
        assert_eq!(cache.entry(1).unwrap().url(), FREEBSD);
    }

    #[test]
    fn test_set_out_of_range() {
        let mut cache = SlotCache::new(2, echo).unwrap();

        assert!(matches!(
            cache.set(2, GOOGLE),
            Err(CacheError::IndexOutOfRange { index: 2, capacity: 2 })
        ));
        assert!(cache.is_empty());
        assert_eq!(cache.stats().binds(), 0);
    }

    #[test]
    fn test_get_out_of_range() {
        let mut cache = SlotCache::new(2, echo).unwrap();
        cache.set(0, GOOGLE).unwrap();

        assert!(matches!(
            cache.get(5),
            Err(CacheError::IndexOutOfRange { index: 5, capacity: 2 })
        ));
        assert!(matches!(
            cache.get(usize::MAX),
            Err(CacheError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_get_empty_slot() {
        let mut cache = SlotCache::new(2, echo).unwrap();
        assert!(matches!(cache.get(0), Err(CacheError::EmptySlot { index: 0 })));
    }

    #[test]
    fn test_get_fetches_once() {
        let calls = Cell::new(0);
        let mut cache = SlotCache::new(2, counting(&calls)).unwrap();
        let slot = cache.next_free().unwrap();
        cache.set(slot, GOOGLE).unwrap();
        assert_eq!(calls.get(), 0);

        assert_eq!(cache.get(slot).unwrap(), "content of https://google.com");
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.entry(slot).unwrap().access_count(), 0);

        for expected in 1..=4 {
            cache.get(slot).unwrap();
            assert_eq!(cache.entry(slot).unwrap().access_count(), expected);
        }
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.stats().misses(), 1);
        assert_eq!(cache.stats().hits(), 4);
    }

    #[test]
    fn test_failed_fetch_leaves_slot_unfetched() {
        let calls = Cell::new(0);
        let flaky = |url: &str| -> dlfetch::Result<String> {
            calls.set(calls.get() + 1);
            if calls.get() == 1 {
                Err(FetchError::Status {
                    url: url.to_string(),
                    status: 500,
                })
            } else {
                Ok("ok".to_string())
            }
        };
        let mut cache = SlotCache::new(1, flaky).unwrap();
        cache.set(0, GOOGLE).unwrap();

        let err = cache.get(0).unwrap_err();
        assert!(err.is_fetch());
        assert!(!cache.entry(0).unwrap().is_fetched());
        assert_eq!(cache.stats().fetch_failures(), 1);

        assert_eq!(cache.get(0).unwrap(), "ok");
        assert_eq!(calls.get(), 2);
        assert_eq!(cache.entry(0).unwrap().access_count(), 0);
    }

    #[test]
    fn test_eviction_lowest_access_count() {
        // Slot 0: miss + 1 hit, slot 1: miss + 3 hits
        let mut cache = SlotCache::new(2, echo).unwrap();

        let first = cache.next_free().unwrap();
        cache.set(first, FREEBSD).unwrap();
        cache.get(first).unwrap();
        cache.get(first).unwrap();

        let second = cache.next_free().unwrap();
        assert_eq!(second, 1);
        cache.set(second, GOOGLE).unwrap();
        for _ in 0..4 {
            cache.get(second).unwrap();
        }

        assert_eq!(cache.entry(0).unwrap().access_count(), 1);
        assert_eq!(cache.entry(1).unwrap().access_count(), 3);
        assert_eq!(cache.eviction_candidate(), Some(0));

        assert_eq!(cache.next_free().unwrap(), 0);
        assert!(cache.entry(0).is_none());
        assert_eq!(cache.entry(1).unwrap().url(), GOOGLE);
        assert_eq!(cache.stats().evictions(), 1);
    }

    #[test]
    fn test_eviction_tie_breaks_on_lowest_index() {
        let mut cache = SlotCache::new(3, echo).unwrap();
        for url in ["a", "b", "c"] {
            cache.insert(url).unwrap();
        }
        // a: 2 hits, b: 1 hit, c: 1 hit
        for slot in [0, 0, 0, 1, 1, 2, 2] {
            cache.get(slot).unwrap();
        }

        assert!(cache.is_full());
        assert_eq!(cache.next_free().unwrap(), 1);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_eviction_of_never_read_entries() {
        let mut cache = SlotCache::new(2, echo).unwrap();
        cache.insert("a").unwrap();
        cache.insert("b").unwrap();

        // Both at zero: first slot goes
        assert_eq!(cache.next_free().unwrap(), 0);
        // Freed slot is reusable, and the cache is not full any more
        assert_eq!(cache.next_free().unwrap(), 0);
        assert_eq!(cache.stats().evictions(), 1);
    }

    #[test]
    fn test_set_after_eviction() {
        let mut cache = SlotCache::new(1, echo).unwrap();
        cache.set(0, FREEBSD).unwrap();
        assert!(cache.set(0, GOOGLE).is_err());

        let slot = cache.next_free().unwrap();
        assert_eq!(cache.set(slot, GOOGLE).unwrap(), 0);
        assert_eq!(cache.get(0).unwrap(), "content of https://google.com");
    }

    #[test]
    fn test_insert_fills_then_evicts() {
        let mut cache = SlotCache::new(2, echo).unwrap();
        assert_eq!(cache.insert("a").unwrap(), 0);
        assert_eq!(cache.insert("b").unwrap(), 1);
        cache.get(0).unwrap();
        cache.get(0).unwrap();

        // "b" has no hits, so it makes room for "c"
        assert_eq!(cache.insert("c").unwrap(), 1);
        let urls: Vec<_> = cache.entries().map(|(_, entry)| entry.url()).collect();
        assert_eq!(urls, vec!["a", "c"]);
        assert_eq!(cache.stats().binds(), 3);
    }

    #[test]
    fn test_eviction_candidate_empty() {
        let cache = SlotCache::new(4, echo).unwrap();
        assert_eq!(cache.eviction_candidate(), None);
        assert!(cache.entry(10).is_none());
    }
}
