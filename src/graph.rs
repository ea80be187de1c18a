//! Weighted planar graph module. The graph is undirected and simple, stored
//! as adjacency lists whose per-vertex order is taken to be the vertex's
//! rotation (cyclic incidence) order in some fixed planar embedding; fixing
//! up that order is pushed onto the caller (`set_rotation`) rather than
//! computed here.
use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::constants::{VertexId, Weight};
use crate::error::{Error, Result};

/// How two parallel edges are combined when their shared endpoint is
/// absorbed by a contraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractionMode {
    /// Multiply combined weights — the tensor-contraction arithmetic cost.
    Product,
    /// Add combined weights — the ratcatcher carving-width path.
    Sum,
}

fn canonical(u: VertexId, v: VertexId) -> (VertexId, VertexId) {
    if u <= v {
        (u, v)
    } else {
        (v, u)
    }
}

/// Splices `v`'s rotation into `u`'s rotation at the slot `v` occupies,
/// producing the rotation of the vertex merging `u` and `v` would leave
/// behind. `v`'s neighbors other than `u`, read starting from the one
/// immediately after `u` in `v`'s own rotation through to the one
/// immediately before it (i.e. in `v`'s own cyclic order, not reversed —
/// the rotation-system "vertex merge" rule), are inserted in place of `v`.
/// A simple biconnected plane graph's edge `(u, v)` has at most one common
/// neighbor per face it borders, and any such common neighbor is
/// necessarily `v`'s immediate rotation-neighbor at `u` and `u`'s immediate
/// rotation-neighbor at `v`; splicing lands it twice, adjacently, which is
/// collapsed back to a single slot.
fn splice_rotation(
    u_rotation: &[VertexId],
    v_rotation: &[VertexId],
    u: VertexId,
    v: VertexId,
) -> Vec<VertexId> {
    let iv = u_rotation
        .iter()
        .position(|&x| x == v)
        .expect("u must be adjacent to v");
    let iu = v_rotation
        .iter()
        .position(|&x| x == u)
        .expect("v must be adjacent to u");

    let n = v_rotation.len();
    let v_remainder: Vec<VertexId> = (1..n).map(|offset| v_rotation[(iu + offset) % n]).collect();

    let mut merged = Vec::with_capacity(u_rotation.len() - 1 + v_remainder.len());
    merged.extend_from_slice(&u_rotation[..iv]);
    merged.extend_from_slice(&v_remainder);
    merged.extend_from_slice(&u_rotation[iv + 1..]);

    dedupe_adjacent_cyclic(&mut merged);
    merged
}

/// Removes consecutive equal entries from `list`, treating it as cyclic
/// (the last and first entries are adjacent too).
fn dedupe_adjacent_cyclic(list: &mut Vec<VertexId>) {
    loop {
        let len = list.len();
        if len < 2 {
            return;
        }
        match (0..len).find(|&i| list[i] == list[(i + 1) % len]) {
            Some(i) => {
                list.remove((i + 1) % len);
            }
            None => return,
        }
    }
}

/// Renames every occurrence of `from` to `to` in `list`, then collapses the
/// adjacent duplicate this creates if `list` already mentioned `to` right
/// next to its `from` entry (the common-neighbor case `splice_rotation`
/// documents, viewed from that neighbor's own rotation).
fn rename_and_dedupe(list: &mut Vec<VertexId>, from: VertexId, to: VertexId) {
    for slot in list.iter_mut() {
        if *slot == from {
            *slot = to;
        }
    }
    dedupe_adjacent_cyclic(list);
}

/// An undirected, simple, edge-weighted planar graph.
///
/// Adjacency lists are stored in rotation order: the order in which edges
/// were added to a vertex is taken as that vertex's cyclic incidence order
/// around it in the (caller-supplied) planar embedding. `set_rotation` lets a
/// caller fix up that order explicitly once the embedding is known by other
/// means.
#[derive(Debug, Clone, Default)]
pub struct WeightedGraph {
    adjacency: FxHashMap<VertexId, Vec<VertexId>>,
    weights: FxHashMap<(VertexId, VertexId), Weight>,
    cutweight: FxHashMap<VertexId, Weight>,
}

impl WeightedGraph {
    pub fn new() -> Self {
        Self {
            adjacency: FxHashMap::default(),
            weights: FxHashMap::default(),
            cutweight: FxHashMap::default(),
        }
    }

    /// Registers a vertex with no incident edges, if it is not already
    /// present. `add_edge` does this implicitly for both endpoints.
    pub fn add_vertex(&mut self, v: VertexId) {
        self.adjacency.entry(v).or_default();
        self.cutweight.entry(v).or_insert(0.0);
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Iterator over vertex ids, in no particular order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.adjacency.keys().copied()
    }

    /// Neighbors of `v` in rotation order. Empty if `v` is unknown.
    pub fn neighbors(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.adjacency.get(&v).into_iter().flatten().copied()
    }

    pub fn degree(&self, v: VertexId) -> usize {
        self.adjacency.get(&v).map_or(0, |a| a.len())
    }

    /// Iterator over every edge exactly once, as `(u, v, weight)` with
    /// `u <= v`.
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId, Weight)> + '_ {
        self.weights.iter().map(|(&(u, v), &w)| (u, v, w))
    }

    pub fn num_edges(&self) -> usize {
        self.weights.len()
    }

    pub fn weight(&self, u: VertexId, v: VertexId) -> Option<Weight> {
        self.weights.get(&canonical(u, v)).copied()
    }

    pub fn has_edge(&self, u: VertexId, v: VertexId) -> bool {
        self.weights.contains_key(&canonical(u, v))
    }

    /// Inserts or replaces an edge `(u, v)` with `weight`. Appends `v` to
    /// `u`'s rotation order (and vice versa) if the edge is new; updates the
    /// weight in place otherwise. Invalidates (here: incrementally repairs)
    /// the cutweight cache for both endpoints.
    pub fn add_edge(&mut self, u: VertexId, v: VertexId, weight: Weight) -> Result<()> {
        if weight <= 0.0 {
            return Err(Error::NonPositiveWeight(u, v, weight));
        }
        if u == v {
            return Err(Error::InvariantViolation(format!(
                "self-loop at vertex {u} is forbidden"
            )));
        }

        self.add_vertex(u);
        self.add_vertex(v);

        let key = canonical(u, v);
        match self.weights.insert(key, weight) {
            Some(old_weight) => {
                let delta = weight - old_weight;
                *self.cutweight.get_mut(&u).unwrap() += delta;
                *self.cutweight.get_mut(&v).unwrap() += delta;
                debug!("updated edge ({u}, {v}) weight {old_weight} -> {weight}");
            }
            None => {
                self.adjacency.get_mut(&u).unwrap().push(v);
                self.adjacency.get_mut(&v).unwrap().push(u);
                *self.cutweight.get_mut(&u).unwrap() += weight;
                *self.cutweight.get_mut(&v).unwrap() += weight;
            }
        }
        Ok(())
    }

    /// Removes edge `(u, v)` if present, repairing the cutweight cache.
    pub fn remove_edge(&mut self, u: VertexId, v: VertexId) -> Result<()> {
        let key = canonical(u, v);
        let weight = self.weights.remove(&key).ok_or(Error::NoSuchEdge(u, v))?;

        if let Some(adj) = self.adjacency.get_mut(&u) {
            adj.retain(|&x| x != v);
        }
        if let Some(adj) = self.adjacency.get_mut(&v) {
            adj.retain(|&x| x != u);
        }
        if let Some(c) = self.cutweight.get_mut(&u) {
            *c -= weight;
        }
        if let Some(c) = self.cutweight.get_mut(&v) {
            *c -= weight;
        }
        Ok(())
    }

    /// Explicitly fixes the rotation order of `v`'s incident edges. `order`
    /// must be a permutation of `v`'s current neighbors.
    pub fn set_rotation(&mut self, v: VertexId, order: Vec<VertexId>) -> Result<()> {
        let current = self.adjacency.get(&v).ok_or(Error::UnknownVertex(v))?;
        let mut sorted_current = current.clone();
        let mut sorted_order = order.clone();
        sorted_current.sort_unstable();
        sorted_order.sort_unstable();
        if sorted_current != sorted_order {
            return Err(Error::InvariantViolation(format!(
                "set_rotation for {v}: order is not a permutation of its neighbors"
            )));
        }
        self.adjacency.insert(v, order);
        Ok(())
    }

    /// Cached sum of weights of edges incident to `v`.
    pub fn cutweight(&self, v: VertexId) -> Weight {
        self.cutweight.get(&v).copied().unwrap_or(0.0)
    }

    /// The maximum cutweight over all vertices — a lower bound on carving
    /// width.
    pub fn max_cutweight(&self) -> Weight {
        self.vertices()
            .map(|v| self.cutweight(v))
            .fold(0.0, f64::max)
    }

    /// Returns a new graph in which `v` is absorbed into `u`. For every
    /// common neighbor `w`, the two edge weights are combined per `mode`;
    /// `v`'s remaining neighbors become `u`'s neighbors with their weight
    /// preserved. The edge `(u, v)` itself is discarded.
    ///
    /// `u`'s rotation is not just `v`'s edges appended to `u`'s own — that
    /// would not generally be a valid planar rotation for the merged
    /// vertex. `v`'s rotation is spliced into `u`'s at the slot `v`
    /// occupied (`splice_rotation`), and any neighbor common to both `u`
    /// and `v` has its own rotation fixed up in place rather than gaining a
    /// second, stale mention of `v`.
    pub fn contracted(&self, u: VertexId, v: VertexId, mode: ContractionMode) -> Result<Self> {
        if !self.has_edge(u, v) {
            return Err(Error::NoSuchEdge(u, v));
        }

        let u_rotation = self.adjacency.get(&u).expect("u must have a rotation");
        let v_rotation = self.adjacency.get(&v).expect("v must have a rotation");
        let merged_rotation = splice_rotation(u_rotation, v_rotation, u, v);

        let mut g = self.clone();
        g.remove_edge(u, v)?;

        let v_neighbors: Vec<VertexId> = g.neighbors(v).collect();
        let mut touched: Vec<VertexId> = Vec::new();
        for w in v_neighbors {
            let vw_weight = g.weight(v, w).expect("neighbor edge must exist");
            // Not `remove_edge`: that also strips `v` out of `w`'s rotation
            // by position, losing exactly the slot `rename_and_dedupe` needs
            // to fix up in place below.
            g.weights.remove(&canonical(v, w));

            if w == u {
                continue;
            }

            let combined = match g.weight(u, w) {
                Some(uw_weight) => match mode {
                    ContractionMode::Product => uw_weight * vw_weight,
                    ContractionMode::Sum => uw_weight + vw_weight,
                },
                None => vw_weight,
            };
            g.weights.insert(canonical(u, w), combined);

            if let Some(rot) = g.adjacency.get_mut(&w) {
                rename_and_dedupe(rot, v, u);
            }
            touched.push(w);
        }

        g.adjacency.remove(&v);
        g.cutweight.remove(&v);
        g.adjacency.insert(u, merged_rotation);

        g.recompute_cutweight_for(u);
        for w in touched {
            g.recompute_cutweight_for(w);
        }

        Ok(g)
    }

    /// Recomputes `v`'s cutweight from scratch off its current adjacency and
    /// edge weights, for callers (like `contracted`) that edit both
    /// directly instead of through `add_edge`/`remove_edge`'s incremental
    /// bookkeeping.
    fn recompute_cutweight_for(&mut self, v: VertexId) {
        let neighbors = self.adjacency.get(&v).cloned().unwrap_or_default();
        let total: Weight = neighbors
            .iter()
            .map(|&n| *self.weights.get(&canonical(v, n)).unwrap_or(&0.0))
            .sum();
        self.cutweight.insert(v, total);
    }

    /// Returns a new graph with `w <- f(w)` applied to every edge weight.
    /// Used to rescale a graph into log2 space before the carving-width
    /// search.
    pub fn apply_weights(&self, f: impl Fn(Weight) -> Weight) -> Self {
        let mut g = Self::new();
        for v in self.vertices() {
            g.add_vertex(v);
        }
        // Re-add edges by rotation order so the embedding survives the remap.
        let mut seen: FxHashSet<(VertexId, VertexId)> = FxHashSet::default();
        for v in self.vertices() {
            for n in self.neighbors(v) {
                let key = canonical(v, n);
                if seen.insert(key) {
                    let w = self.weight(v, n).expect("adjacency/weights desync");
                    g.add_edge(v, n, f(w))
                        .expect("remap produced invalid weight");
                }
            }
        }
        g
    }

    /// True iff the graph has no articulation point (equivalently, removing
    /// any single vertex leaves it connected) — a precondition the
    /// edge-contraction driver checks on every candidate minor. A graph with
    /// fewer than 2 vertices is vacuously biconnected; a 2-vertex graph is
    /// biconnected iff its single edge exists.
    pub fn is_biconnected(&self) -> bool {
        let n = self.len();
        if n < 2 {
            return true;
        }
        if n == 2 {
            let mut it = self.vertices();
            let a = it.next().unwrap();
            let b = it.next().unwrap();
            return self.has_edge(a, b);
        }

        let mut disc: FxHashMap<VertexId, usize> = FxHashMap::default();
        let mut low: FxHashMap<VertexId, usize> = FxHashMap::default();
        let mut timer = 0usize;
        let mut has_articulation = false;
        let mut visited_count = 0usize;

        let root = match self.vertices().next() {
            Some(v) => v,
            None => return true,
        };

        // Iterative DFS to avoid recursion-depth limits on large graphs.
        let mut stack: Vec<(VertexId, Option<VertexId>, usize)> = vec![(root, None, 0)];
        let mut root_children = 0usize;

        while let Some(&mut (v, parent, ref mut idx)) = stack.last_mut() {
            if *idx == 0 {
                timer += 1;
                disc.insert(v, timer);
                low.insert(v, timer);
                visited_count += 1;
            }

            let neighbors: Vec<VertexId> = self.neighbors(v).collect();
            if *idx < neighbors.len() {
                let w = neighbors[*idx];
                *idx += 1;
                if Some(w) == parent {
                    // Skip exactly one copy of the edge back to the parent
                    // (guards against being fooled by a genuine parallel
                    // edge in callers that allow multigraphs upstream).
                    continue;
                }
                if let Some(&w_disc) = disc.get(&w) {
                    let low_v = *low.get(&v).unwrap();
                    low.insert(v, low_v.min(w_disc));
                } else {
                    if v == root {
                        root_children += 1;
                    }
                    stack.push((w, Some(v), 0));
                }
            } else {
                stack.pop();
                if let Some(&(parent_v, _, _)) = stack.last() {
                    let low_v = *low.get(&v).unwrap();
                    let low_p = *low.get(&parent_v).unwrap();
                    low.insert(parent_v, low_p.min(low_v));
                    if parent_v != root && low_v >= *disc.get(&parent_v).unwrap() {
                        has_articulation = true;
                    }
                }
            }
        }

        if root_children > 1 {
            has_articulation = true;
        }

        visited_count == n && !has_articulation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> WeightedGraph {
        let mut g = WeightedGraph::new();
        g.add_edge(1, 2, 1.0).unwrap();
        g.add_edge(2, 3, 1.0).unwrap();
        g.add_edge(3, 1, 1.0).unwrap();
        g
    }

    #[test]
    fn cutweight_tracks_incident_edges() {
        let g = triangle();
        assert_eq!(g.cutweight(1), 2.0);
        assert_eq!(g.cutweight(2), 2.0);
    }

    #[test]
    fn cutweight_updates_on_weight_change() {
        let mut g = triangle();
        g.add_edge(1, 2, 5.0).unwrap();
        assert_eq!(g.cutweight(1), 5.0 + 1.0);
    }

    #[test]
    fn cutweight_updates_on_remove() {
        let mut g = triangle();
        g.remove_edge(1, 2).unwrap();
        assert_eq!(g.cutweight(1), 1.0);
        assert_eq!(g.cutweight(2), 1.0);
    }

    #[test]
    fn contract_sum_mode_adds_common_neighbor_weights() {
        // u - w, v - w, u - v: contracting (u,v) with Sum combines the two
        // edges to w into one edge of weight 3.
        let mut g = WeightedGraph::new();
        g.add_edge(1, 2, 1.0).unwrap(); // u-v
        g.add_edge(1, 3, 1.0).unwrap(); // u-w
        g.add_edge(2, 3, 2.0).unwrap(); // v-w
        let minor = g.contracted(1, 2, ContractionMode::Sum).unwrap();
        assert_eq!(minor.weight(1, 3), Some(3.0));
        assert!(!minor.has_edge(2, 3));
        assert_eq!(minor.len(), 2);
    }

    #[test]
    fn contract_product_mode_multiplies_common_neighbor_weights() {
        let mut g = WeightedGraph::new();
        g.add_edge(1, 2, 1.0).unwrap();
        g.add_edge(1, 3, 2.0).unwrap();
        g.add_edge(2, 3, 4.0).unwrap();
        let minor = g.contracted(1, 2, ContractionMode::Product).unwrap();
        assert_eq!(minor.weight(1, 3), Some(8.0));
    }

    #[test]
    fn contract_preserves_non_common_neighbors() {
        let mut g = WeightedGraph::new();
        g.add_edge(1, 2, 1.0).unwrap();
        g.add_edge(2, 4, 3.0).unwrap();
        let minor = g.contracted(1, 2, ContractionMode::Sum).unwrap();
        assert_eq!(minor.weight(1, 4), Some(3.0));
    }

    #[test]
    fn contract_missing_edge_errors() {
        let g = triangle();
        assert!(matches!(
            g.contracted(1, 99, ContractionMode::Sum),
            Err(Error::NoSuchEdge(1, 99))
        ));
    }

    #[test]
    fn apply_weights_remaps_every_edge() {
        let g = triangle();
        let logged = g.apply_weights(|w| w * 2.0);
        assert_eq!(logged.weight(1, 2), Some(2.0));
    }

    #[test]
    fn triangle_is_biconnected() {
        assert!(triangle().is_biconnected());
    }

    #[test]
    fn path_graph_is_not_biconnected() {
        let mut g = WeightedGraph::new();
        g.add_edge(1, 2, 1.0).unwrap();
        g.add_edge(2, 3, 1.0).unwrap();
        assert!(!g.is_biconnected());
    }

    #[test]
    fn single_edge_is_biconnected() {
        let mut g = WeightedGraph::new();
        g.add_edge(1, 2, 1.0).unwrap();
        assert!(g.is_biconnected());
    }

    #[test]
    fn two_triangles_sharing_a_vertex_is_not_biconnected() {
        let mut g = WeightedGraph::new();
        g.add_edge(1, 2, 1.0).unwrap();
        g.add_edge(2, 3, 1.0).unwrap();
        g.add_edge(3, 1, 1.0).unwrap();
        g.add_edge(3, 4, 1.0).unwrap();
        g.add_edge(4, 5, 1.0).unwrap();
        g.add_edge(5, 3, 1.0).unwrap();
        assert!(!g.is_biconnected());
    }
}
