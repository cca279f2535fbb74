use std::collections::HashSet;

use super::reading::{Reading, ReadingId};

pub const DEFAULT_CAPACITY: usize = 1000;

/// Bounded working set of readings for one device.
///
/// The sequence is kept ascending by timestamp (readings without a
/// parseable timestamp sort first), never holds two entries with the
/// same id, and evicts oldest-first once the capacity is reached.
/// Bulk load and incremental push both funnel through the same dedup
/// set, so a replayed reading never creates a second entry.
#[derive(Debug)]
pub struct ReadingStore {
    readings: Vec<Reading>,
    seen: HashSet<ReadingId>,
    cap: usize,
}

impl ReadingStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(cap: usize) -> Self {
        assert!(cap > 0, "store capacity must be positive");
        Self {
            readings: Vec::new(),
            seen: HashSet::new(),
            cap,
        }
    }

    /// Wholesale replace with the bulk-loaded history. Sorts ascending,
    /// drops duplicate ids (first occurrence wins) and keeps only the
    /// most recent `cap` entries.
    pub fn ingest_initial(&mut self, readings: Vec<Reading>) {
        let mut sorted = readings;
        sorted.sort_by_key(|r| r.timestamp);

        let mut seen = HashSet::new();
        let mut deduped: Vec<Reading> = sorted.into_iter().filter(|r| seen.insert(r.id)).collect();

        if deduped.len() > self.cap {
            let dropped = deduped.drain(..deduped.len() - self.cap);
            for reading in dropped {
                seen.remove(&reading.id);
            }
        }

        self.readings = deduped;
        self.seen = seen;
    }

    /// Appends a pushed reading unless its id is already present.
    /// Returns whether the reading was accepted.
    pub fn ingest_one(&mut self, reading: Reading) -> bool {
        if !self.seen.insert(reading.id) {
            return false;
        }

        //push order does not imply time order, so insert at the sorted position
        let at = self.readings.partition_point(|r| r.timestamp <= reading.timestamp);
        self.readings.insert(at, reading);

        if self.readings.len() > self.cap {
            let evicted = self.readings.remove(0);
            self.seen.remove(&evicted.id);
        }

        true
    }

    /// Clone of the current sequence. Not stable across time: a
    /// concurrent append may change the store right after.
    pub fn snapshot(&self) -> Vec<Reading> {
        self.readings.clone()
    }

    pub fn latest(&self) -> Option<&Reading> {
        self.readings.last()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

impl Default for ReadingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::parse_timestamp;

    #[test]
    fn test_dedup_across_bulk_and_push() {
        let mut store = ReadingStore::new();
        store.ingest_initial(vec![reading(1, "2025-08-10 10:00:00"), reading(2, "2025-08-10 10:01:00")]);

        assert!(!store.ingest_one(reading(2, "2025-08-10 10:01:00")));
        assert!(store.ingest_one(reading(3, "2025-08-10 10:02:00")));
        assert!(!store.ingest_one(reading(3, "2025-08-10 10:02:00")));

        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_bulk_load_dedup_first_wins() {
        let mut store = ReadingStore::new();
        let mut first = reading(1, "2025-08-10 10:00:00");
        first.voltage = Some(230.0);
        let mut replay = reading(1, "2025-08-10 10:00:00");
        replay.voltage = Some(999.0);

        store.ingest_initial(vec![first, replay]);

        assert_eq!(store.len(), 1);
        assert_eq!(store.latest().unwrap().voltage, Some(230.0));
    }

    #[test]
    fn test_capacity_bound_evicts_oldest() {
        let mut store = ReadingStore::with_capacity(3);
        for i in 0..5 {
            let ts = format!("2025-08-10 10:0{}:00", i);
            assert!(store.ingest_one(reading(i, &ts)));
        }

        assert_eq!(store.len(), 3);
        let ids: Vec<i64> = store.snapshot().iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![2, 3, 4]);
    }

    #[test]
    fn test_evicted_id_can_reenter() {
        //eviction must release the id, otherwise the dedup set grows unbounded
        let mut store = ReadingStore::with_capacity(2);
        store.ingest_one(reading(1, "2025-08-10 10:00:00"));
        store.ingest_one(reading(2, "2025-08-10 10:01:00"));
        store.ingest_one(reading(3, "2025-08-10 10:02:00"));

        assert!(store.ingest_one(reading(1, "2025-08-10 10:03:00")));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_out_of_order_push_kept_sorted() {
        let mut store = ReadingStore::new();
        store.ingest_one(reading(1, "2025-08-10 10:05:00"));
        store.ingest_one(reading(2, "2025-08-10 10:01:00"));

        let ids: Vec<i64> = store.snapshot().iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_timestampless_reading_stored_and_evicted_first() {
        let mut store = ReadingStore::with_capacity(2);
        store.ingest_one(Reading::new(ReadingId(1), None));
        store.ingest_one(reading(2, "2025-08-10 10:00:00"));
        assert_eq!(store.len(), 2);

        store.ingest_one(reading(3, "2025-08-10 10:01:00"));
        let ids: Vec<i64> = store.snapshot().iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    fn reading(id: i64, ts: &str) -> Reading {
        Reading::new(ReadingId(id), parse_timestamp(ts))
    }
}
