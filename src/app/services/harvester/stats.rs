//! Harvest statistics and result structures
//!
//! Counters collected while a harvester walks its input, plus the result
//! type returned to callers: the identifiers created or updated by the run.

use serde::Serialize;
use std::collections::BTreeSet;
use std::time::Duration;

/// Statistics for one harvest run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HarvestStats {
    /// Lines consumed from the harvested file, comments and header included
    pub lines_read: usize,
    /// Data rows handed to the normalizer
    pub rows_processed: usize,
    /// Objects created or updated
    pub objects_persisted: usize,
    /// Rows dropped by a filtering rule (not errors)
    pub rows_filtered: usize,
    /// Malformed rows skipped under the tolerant policy
    pub rows_skipped: usize,
    /// Messages for skipped rows
    pub warnings: Vec<String>,
    /// Wall-clock duration of the run
    #[serde(serialize_with = "serialize_duration_secs")]
    pub duration: Duration,
}

fn serialize_duration_secs<S: serde::Serializer>(
    duration: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

impl HarvestStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a skipped malformed row
    pub fn add_warning(&mut self, message: String) {
        self.rows_skipped += 1;
        self.warnings.push(message);
    }

    /// Objects per second over the run
    pub fn throughput(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            self.objects_persisted as f64 / secs
        } else {
            0.0
        }
    }

    /// One-line summary for logs
    pub fn summary(&self) -> String {
        format!(
            "Harvest Summary: {} rows -> {} objects | Filtered: {} | Skipped: {} | \
             Lines read: {} | Took {:.2}s ({:.1} objects/s)",
            self.rows_processed,
            self.objects_persisted,
            self.rows_filtered,
            self.rows_skipped,
            self.lines_read,
            self.duration.as_secs_f64(),
            self.throughput()
        )
    }
}

/// Result of a harvest run
#[derive(Debug, Clone, Default, Serialize)]
pub struct HarvestResult {
    /// Identifiers created or updated, without duplicates
    pub object_ids: BTreeSet<String>,
    pub stats: HarvestStats,
}

impl HarvestResult {
    pub fn len(&self) -> usize {
        self.object_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.object_ids.is_empty()
    }

    pub fn contains(&self, oid: &str) -> bool {
        self.object_ids.contains(oid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_warning_counts_skip() {
        let mut stats = HarvestStats::new();
        stats.add_warning("bad row".to_string());
        assert_eq!(stats.rows_skipped, 1);
        assert_eq!(stats.warnings, vec!["bad row"]);
    }

    #[test]
    fn test_summary_mentions_counts() {
        let stats = HarvestStats {
            rows_processed: 9,
            objects_persisted: 7,
            rows_filtered: 2,
            ..Default::default()
        };
        let summary = stats.summary();
        assert!(summary.contains("9 rows -> 7 objects"));
        assert!(summary.contains("Filtered: 2"));
    }

    #[test]
    fn test_throughput_with_zero_duration() {
        let stats = HarvestStats {
            objects_persisted: 5,
            ..Default::default()
        };
        assert_eq!(stats.throughput(), 0.0);
        assert!(stats.summary().contains("(0.0 objects/s)"));
    }

    #[test]
    fn test_result_deduplicates_ids() {
        let mut result = HarvestResult::default();
        result.object_ids.insert("abc".to_string());
        result.object_ids.insert("abc".to_string());
        assert_eq!(result.len(), 1);
        assert!(result.contains("abc"));
    }
}
