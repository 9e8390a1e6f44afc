use serde::Serialize;

/// Tracks count, sum, min and max of integer millisecond samples.
/// Used for reception latency and inter-send intervals.
#[derive(Debug, Clone)]
pub struct SampleAggregate {
    sum: i128,
    count: u64,
    min: i64,
    max: i64,
}

impl SampleAggregate {
    /// Creates a new aggregate with min initialized to MAX and max to MIN.
    pub fn new() -> Self {
        Self {
            sum: 0,
            count: 0,
            min: i64::MAX,
            max: i64::MIN,
        }
    }

    /// Records a sample in milliseconds.
    pub fn record(&mut self, value_ms: i64) {
        self.sum += i128::from(value_ms);
        self.count += 1;
        self.min = self.min.min(value_ms);
        self.max = self.max.max(value_ms);
    }

    /// Returns the statistics, or `None` when nothing was recorded.
    pub fn snapshot(&self) -> Option<SampleStats> {
        if self.count == 0 {
            return None;
        }

        Some(SampleStats {
            count: self.count,
            mean: self.sum as f64 / self.count as f64,
            min: self.min,
            max: self.max,
        })
    }
}

impl Default for SampleAggregate {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<i64> for SampleAggregate {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        let mut agg = Self::new();
        for value in iter {
            agg.record(value);
        }
        agg
    }
}

/// Summary of a non-empty sample set, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SampleStats {
    pub count: u64,
    pub mean: f64,
    pub min: i64,
    pub max: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_has_no_snapshot() {
        assert_eq!(SampleAggregate::new().snapshot(), None);
    }

    #[test]
    fn test_record_and_snapshot() {
        let agg: SampleAggregate = [80, 20, 50].into_iter().collect();
        let stats = agg.snapshot().unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.min, 20);
        assert_eq!(stats.max, 80);
        assert!((stats.mean - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_single_sample() {
        let mut agg = SampleAggregate::new();
        agg.record(7);
        let stats = agg.snapshot().unwrap();
        assert_eq!((stats.min, stats.max, stats.count), (7, 7, 1));
        assert!((stats.mean - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sum_does_not_overflow() {
        let agg: SampleAggregate = [i64::MAX, i64::MAX].into_iter().collect();
        let stats = agg.snapshot().unwrap();
        assert_eq!(stats.max, i64::MAX);
        assert!(stats.mean > 9.0e18);
    }
}
