//! Composes the carving-width search, the edge-contraction driver, the
//! contraction tree's memory-conscious ordering, and the replay evaluator
//! into one call: given a planar graph of real (tensor bond dimension)
//! weights, produce a contraction ordering and its verified arithmetic cost.
//!
//! The carving-width search and the driver both reason in log2 space (see
//! `carving_width.rs`); the replay evaluator, which accumulates the actual
//! arithmetic operation count, always runs on the original un-logged weights.
use log::info;

use crate::carving_width::{carving_width_bounds, log_binary_search};
use crate::constants::{VertexId, Weight, REPLAY_TOLERANCE, ZERO_EPSILON};
use crate::contractor::replay;
use crate::edge_contraction::{edge_contraction, DriverConfig};
use crate::error::{Error, Result};
use crate::graph::WeightedGraph;
use crate::numeric::{is_close, log2};

/// Orchestrator configuration: one struct bundling the run's seed and tuning
/// knobs, mirroring the rest of the pipeline's config structs.
#[derive(Debug, Clone, Copy)]
pub struct RatcatcherConfig {
    pub seed: u64,
    /// Number of independent driver runs; the lowest-cost ordering wins.
    pub num_edge_contractions: usize,
    pub zero_epsilon: Weight,
    /// Whether `ContractionTree::ordering` minimizes peak memory footprint
    /// (true) or just replays the tree's construction order (false).
    pub memory_conscious: bool,
}

impl RatcatcherConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            num_edge_contractions: 1,
            zero_epsilon: ZERO_EPSILON,
            memory_conscious: true,
        }
    }
}

/// The orchestrator's output: the graph's carving width (in log2 space),
/// a contraction ordering over original vertex ids, and its verified total
/// arithmetic cost.
#[derive(Debug, Clone)]
pub struct OrchestratorResult {
    pub carving_width: Weight,
    pub ordering: Vec<(VertexId, VertexId)>,
    pub total_cost: Weight,
}

/// Runs the full pipeline on `g`. Every edge weight of `g` must be strictly
/// greater than 1 (see `carving_width.rs`'s log-domain constraint).
pub fn run(g: &WeightedGraph, config: &RatcatcherConfig) -> Result<OrchestratorResult> {
    let g_log = g.apply_weights(log2);
    let (low, high) = carving_width_bounds(&g_log)?;
    let k = log_binary_search(&g_log, low, high)?;
    info!("carving width = {k}");

    let attempts = config.num_edge_contractions.max(1);
    let mut best: Option<(Weight, Vec<(VertexId, VertexId)>)> = None;

    for attempt in 0..attempts {
        let driver_config = DriverConfig {
            seed: config.seed.wrapping_add(attempt as u64),
            zero_epsilon: config.zero_epsilon,
        };
        let (tree, _root, _stats) = edge_contraction(&g_log, k, &driver_config)?;
        let ordering = tree.ordering(config.memory_conscious)?;
        let (cost, _) = replay(g, &ordering)?;

        let is_better = match &best {
            Some((best_cost, _)) => cost < *best_cost,
            None => true,
        };
        if is_better {
            best = Some((cost, ordering));
        }
    }

    let (total_cost, ordering) = best.ok_or_else(|| {
        Error::InvariantViolation("orchestrator ran with zero driver attempts".into())
    })?;

    // Replaying the chosen ordering again must reproduce the same cost —
    // the determinism invariant, caught at write time.
    let (confirmed_cost, _) = replay(g, &ordering)?;
    if !is_close(total_cost, confirmed_cost, REPLAY_TOLERANCE) {
        return Err(Error::ReplayMismatch {
            expected: total_cost,
            actual: confirmed_cost,
        });
    }

    Ok(OrchestratorResult {
        carving_width: k,
        ordering,
        total_cost,
    })
}
