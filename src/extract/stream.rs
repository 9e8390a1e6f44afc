use std::collections::{BTreeMap, HashMap};

use super::event::Event;

/// Send-side event stream folded for correlation.
#[derive(Debug, Clone, Default)]
pub struct SentLog {
    /// Every send occurrence in log order (the canonical enumeration order).
    order: Vec<u64>,
    /// Unique ids in order of first appearance.
    first_seen: Vec<u64>,
    /// Last-seen send timestamp per id.
    timestamps: HashMap<u64, i64>,
}

impl SentLog {
    pub fn from_events<I: IntoIterator<Item = Event>>(events: I) -> Self {
        let mut log = Self::default();

        for event in events {
            if log.timestamps.insert(event.id, event.timestamp_ms).is_none() {
                log.first_seen.push(event.id);
            }
            log.order.push(event.id);
        }

        log
    }

    /// Every send occurrence in log order, repeats included.
    pub fn order(&self) -> &[u64] {
        &self.order
    }

    /// Unique ids in order of first appearance.
    pub fn first_seen(&self) -> &[u64] {
        &self.first_seen
    }

    /// Send timestamp for `id`. A repeated id reports its last occurrence.
    pub fn timestamp(&self, id: u64) -> Option<i64> {
        self.timestamps.get(&id).copied()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.timestamps.contains_key(&id)
    }

    /// Number of send occurrences, repeats included.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Receive-side event stream folded for correlation.
#[derive(Debug, Clone, Default)]
pub struct ReceivedLog {
    /// Last-seen receive timestamp per id.
    timestamps: BTreeMap<u64, i64>,
    /// Receive occurrences per id.
    counts: BTreeMap<u64, u64>,
}

impl ReceivedLog {
    pub fn from_events<I: IntoIterator<Item = Event>>(events: I) -> Self {
        let mut log = Self::default();

        for event in events {
            log.timestamps.insert(event.id, event.timestamp_ms);
            *log.counts.entry(event.id).or_insert(0) += 1;
        }

        log
    }

    /// Receive timestamp for `id`. A repeated id reports its last occurrence.
    pub fn timestamp(&self, id: u64) -> Option<i64> {
        self.timestamps.get(&id).copied()
    }

    /// Number of times `id` was received.
    pub fn count(&self, id: u64) -> u64 {
        self.counts.get(&id).copied().unwrap_or(0)
    }

    /// Unique received ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.timestamps.keys().copied()
    }

    /// Ids received more than once, ascending.
    pub fn repeated_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.counts
            .iter()
            .filter(|&(_, &count)| count > 1)
            .map(|(&id, _)| id)
    }

    /// Total receive events, repeats included.
    pub fn raw_count(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sent_log_repeats() {
        let log = SentLog::from_events([
            Event::new(3, 10),
            Event::new(1, 20),
            Event::new(3, 30),
        ]);

        assert_eq!(log.order(), &[3, 1, 3]);
        assert_eq!(log.first_seen(), &[3, 1]);
        assert_eq!(log.len(), 3);
        // Last occurrence wins for the lookup.
        assert_eq!(log.timestamp(3), Some(30));
        assert_eq!(log.timestamp(1), Some(20));
        assert_eq!(log.timestamp(2), None);
    }

    #[test]
    fn test_received_log_counts() {
        let log = ReceivedLog::from_events([
            Event::new(4, 500),
            Event::new(2, 140),
            Event::new(2, 145),
            Event::new(1, 180),
        ]);

        assert_eq!(log.raw_count(), 4);
        assert_eq!(log.count(2), 2);
        assert_eq!(log.count(9), 0);
        assert_eq!(log.timestamp(2), Some(145));
        assert_eq!(log.ids().collect::<Vec<_>>(), vec![1, 2, 4]);
        assert_eq!(log.repeated_ids().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_empty_logs() {
        let sent = SentLog::from_events(Vec::new());
        let received = ReceivedLog::from_events(Vec::new());
        assert!(sent.is_empty());
        assert!(received.is_empty());
        assert_eq!(received.raw_count(), 0);
    }
}
