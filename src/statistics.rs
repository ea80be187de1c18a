//! Statistics module. Collects counters and timings for the oracle's pruning
//! passes and the edge-contraction driver's accept/reject decisions, in
//! place of the original's scattered `verbose=` print statements.
use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

/// Collects per-call statistics about a single `ratcatcher` invocation.
#[derive(Debug, Default)]
pub struct OracleStats {
    /// Fixed-point pruning passes run before the oracle converged.
    pub passes: usize,
    /// Total room-vertex entries pruned across all passes.
    pub rooms_pruned: usize,
    /// Passes in which at least one wall state was fully pruned.
    pub walls_pruned: usize,
    pub duration: Option<Duration>,
    start_time: Option<Instant>,
}

impl OracleStats {
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn finish(&mut self) {
        if let Some(start) = self.start_time {
            self.duration = Some(start.elapsed());
        }
    }
}

impl Display for OracleStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "oracle: {} passes, {} rooms pruned, {} passes with a wall pruned, {:?}",
            self.passes, self.rooms_pruned, self.walls_pruned, self.duration
        )
    }
}

/// Collects per-run statistics about the edge-contraction driver.
#[derive(Debug, Default)]
pub struct DriverStats {
    /// Candidate edges drawn from the eligible-edge list, across the whole
    /// run (every `|V(G)| > 3` iteration).
    pub edges_tried: usize,
    /// Candidates rejected because the resulting minor was not biconnected.
    pub edges_rejected_biconnectivity: usize,
    /// Candidates rejected because the oracle found the minor's carving
    /// width not below the target.
    pub edges_rejected_oracle: usize,
    pub duration: Option<Duration>,
    start_time: Option<Instant>,
}

impl DriverStats {
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn finish(&mut self) {
        if let Some(start) = self.start_time {
            self.duration = Some(start.elapsed());
        }
    }
}

impl Display for DriverStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "driver: {} edges tried, {} rejected (biconnectivity), {} rejected (oracle), {:?}",
            self.edges_tried,
            self.edges_rejected_biconnectivity,
            self.edges_rejected_oracle,
            self.duration
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oracle_stats_timer_records_a_duration() {
        let mut stats = OracleStats::default();
        stats.start_timer();
        stats.finish();
        assert!(stats.duration.is_some());
    }

    #[test]
    fn driver_stats_display_includes_all_counters() {
        let stats = DriverStats {
            edges_tried: 5,
            edges_rejected_biconnectivity: 2,
            edges_rejected_oracle: 1,
            ..Default::default()
        };
        let text = format!("{stats}");
        assert!(text.contains('5'));
        assert!(text.contains('2'));
        assert!(text.contains('1'));
    }
}
