//! Randomized eligible-edge contraction driver. Repeatedly picks a random
//! edge of the current minor, checks that contracting it keeps the minor
//! biconnected and under the target carving width, and accepts or discards
//! it; incrementally builds a `ContractionTree` alongside the graph minor.
use log::debug;

use crate::constants::{VertexId, Weight, ZERO_EPSILON};
use crate::contraction_tree::{Bag, ContractionTree};
use crate::error::{Error, Result};
use crate::graph::{ContractionMode, WeightedGraph};
use crate::numeric::Rng;
use crate::ratcatcher::ratcatcher;
use crate::statistics::DriverStats;

/// Driver configuration: seed and tuning knobs bundled into one struct.
#[derive(Debug, Clone, Copy)]
pub struct DriverConfig {
    pub seed: u64,
    /// How far above the target carving width `k` the oracle is probed when
    /// testing a candidate minor (`oracle(G', k + epsilon)`).
    pub zero_epsilon: Weight,
}

impl DriverConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            zero_epsilon: ZERO_EPSILON,
        }
    }
}

/// Finds an edge of `g` whose contraction keeps the minor biconnected and
/// under carving width `k`, trying random edges until one works or the
/// eligible list is exhausted.
fn find_eligible_edge(
    g: &WeightedGraph,
    k: Weight,
    zero_epsilon: Weight,
    rng: &mut Rng,
    stats: &mut DriverStats,
) -> Result<(VertexId, VertexId, WeightedGraph)> {
    let mut eligible: Vec<(VertexId, VertexId)> = g.edges().map(|(u, v, _)| (u, v)).collect();

    while !eligible.is_empty() {
        let idx = rng.gen_index(eligible.len());
        let (u, v) = eligible[idx];
        stats.edges_tried += 1;

        let candidate = g.contracted(u, v, ContractionMode::Sum)?;
        if !candidate.is_biconnected() {
            stats.edges_rejected_biconnectivity += 1;
            eligible.swap_remove(idx);
            continue;
        }
        if ratcatcher(&candidate, k + zero_epsilon)? {
            debug!("accepted edge ({u}, {v})");
            return Ok((u, v, candidate));
        }
        stats.edges_rejected_oracle += 1;
        eligible.swap_remove(idx);
    }

    Err(Error::NoContractibleEdge)
}

/// Runs the edge-contraction driver on `g`, assumed to have carving width
/// `k`. Builds a complete, unrooted contraction tree (re-rooted but not yet
/// BFS-assigned into parent/child form — call `set_tree` before
/// `ordering(true)`). Returns the tree's root bag alongside the tree itself.
pub fn edge_contraction<'g>(
    g: &'g WeightedGraph,
    k: Weight,
    config: &DriverConfig,
) -> Result<(ContractionTree<'g>, Bag, DriverStats)> {
    let mut rng = Rng::from_seed(config.seed);
    let mut stats = DriverStats::default();
    stats.start_timer();

    let mut tree = ContractionTree::new(g);
    let mut current = g.clone();

    while current.len() > 3 {
        let (u, v, minor) = find_eligible_edge(&current, k, config.zero_epsilon, &mut rng, &mut stats)?;
        current = minor;
        tree.contract(u, v)?;
    }

    tree.contract_remaining(&current)?;
    let root = tree.reroot()?;
    tree.set_tree(&root)?;

    stats.finish();
    Ok((tree, root, stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_log() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn triangle() -> WeightedGraph {
        let mut g = WeightedGraph::new();
        g.add_edge(1, 2, 1.0).unwrap();
        g.add_edge(2, 3, 1.0).unwrap();
        g.add_edge(3, 1, 1.0).unwrap();
        g
    }

    #[test]
    fn triangle_shortcuts_straight_to_contract_remaining() {
        // |V| = 3 already, so the while loop never runs; only
        // contract_remaining fires.
        init_log();
        let g = triangle();
        let config = DriverConfig::with_seed(1);
        let (tree, _root, stats) = edge_contraction(&g, 10.0, &config).unwrap();
        let order = tree.ordering(false).unwrap();
        assert_eq!(order.len(), 2);
        assert_eq!(stats.edges_tried, 0);
    }

    #[test]
    fn deterministic_given_a_fixed_seed() {
        use crate::util::test_graphs::petersen_like_g1;
        init_log();
        let g = petersen_like_g1();
        let config = DriverConfig::with_seed(7);
        let (tree_a, _, _) = edge_contraction(&g, 5.0, &config).unwrap();
        let (tree_b, _, _) = edge_contraction(&g, 5.0, &config).unwrap();
        assert_eq!(tree_a.ordering(false).unwrap(), tree_b.ordering(false).unwrap());
    }

    #[test]
    fn non_uniform_weights_drive_the_loop_through_several_real_contractions() {
        // G1's topology (10 vertices, 3-regular) but with distinct edge
        // weights, so the random eligible-edge walk has to actually run
        // (rather than sandwich's single contract-to-a-triangle shortcut),
        // exercising `contracted`'s rotation splicing across several
        // successive minors and `PlanarDual`'s weighted short-walk pruning.
        use crate::carving_width::{carving_width_bounds, log_binary_search};
        use crate::numeric::log2;
        use crate::util::test_graphs::petersen_like_g1_with_weights;

        init_log();
        let weights: [f64; 15] = [
            2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0,
        ];
        let g = petersen_like_g1_with_weights(weights);
        let g_log = g.apply_weights(log2);
        let (low, high) = carving_width_bounds(&g_log).unwrap();
        let k = log_binary_search(&g_log, low, high).unwrap();

        let config = DriverConfig::with_seed(13);
        let (tree, _root, stats) = edge_contraction(&g_log, k, &config).unwrap();

        // 10 vertices down to 1 bag is 9 merges; with 10 vertices the while
        // loop (len > 3) must run at least until |V| == 3, i.e. it actually
        // tries edges rather than shortcutting straight to contract_remaining.
        assert!(stats.edges_tried > 0);
        let order = tree.ordering(false).unwrap();
        assert_eq!(order.len(), 9);
    }
}
