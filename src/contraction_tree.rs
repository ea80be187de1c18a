//! Incremental binary contraction tree.
//!
//! Each tree node is a *bag*: the set of original graph vertices merged so
//! far into one supernode. Leaves are singleton bags; `contract(u, v)` fuses
//! the bags currently representing `u` and `v` into their union and tracks
//! the symmetric difference of their incident-edge sets as the new bag's
//! cut — the set of original edges that would need to be resident in memory
//! to finish contracting that bag. The tree is built unrooted (as a
//! sequence of fusions) and then re-rooted at the bag with the smallest
//! accumulated cutweight, which locally minimizes the peak memory of the
//! resulting contraction order.
use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use crate::constants::{VertexId, Weight};
use crate::error::{Error, Result};
use crate::graph::WeightedGraph;

/// A tree node: the set of original vertices merged into one supernode. The
/// empty bag is reserved as the sentinel root created by `reroot` — no real
/// supernode is ever empty.
pub type Bag = BTreeSet<VertexId>;

fn singleton(v: VertexId) -> Bag {
    let mut b = Bag::new();
    b.insert(v);
    b
}

pub struct ContractionTree<'g> {
    graph: &'g WeightedGraph,
    tree_node_of: FxHashMap<VertexId, Bag>,
    edge_cuts: FxHashMap<Bag, BTreeSet<(VertexId, VertexId)>>,
    cs: FxHashMap<Bag, Weight>,
    history: FxHashMap<Bag, (VertexId, VertexId)>,
    tree_nodes: Vec<Bag>,
    adjacency: FxHashMap<Bag, Vec<Bag>>,
    argmin_node: Option<Bag>,
    argmin_cut: Weight,
    current_root: Option<Bag>,
    left_child: FxHashMap<Bag, Option<Bag>>,
    right_child: FxHashMap<Bag, Option<Bag>>,
    parent: FxHashMap<Bag, Bag>,
    root: Option<Bag>,
}

fn canonical(u: VertexId, v: VertexId) -> (VertexId, VertexId) {
    if u <= v {
        (u, v)
    } else {
        (v, u)
    }
}

impl<'g> ContractionTree<'g> {
    /// Initializes one leaf per vertex of `graph`, with its edge cut set to
    /// its full incident edge set and its cutweight to the graph's cached
    /// cutweight.
    pub fn new(graph: &'g WeightedGraph) -> Self {
        let mut tree_node_of = FxHashMap::default();
        let mut edge_cuts = FxHashMap::default();
        let mut cs = FxHashMap::default();
        let mut argmin_node = None;
        let mut argmin_cut = Weight::INFINITY;

        for v in graph.vertices() {
            let bag = singleton(v);
            let cut: BTreeSet<(VertexId, VertexId)> = graph
                .neighbors(v)
                .map(|n| canonical(v, n))
                .collect();
            let cutweight = graph.cutweight(v);

            if argmin_node.is_none() || cutweight < argmin_cut {
                argmin_node = Some(bag.clone());
                argmin_cut = cutweight;
            }

            tree_node_of.insert(v, bag.clone());
            edge_cuts.insert(bag.clone(), cut);
            cs.insert(bag, cutweight);
        }

        Self {
            graph,
            tree_node_of,
            edge_cuts,
            cs,
            history: FxHashMap::default(),
            tree_nodes: Vec::new(),
            adjacency: FxHashMap::default(),
            argmin_node,
            argmin_cut,
            current_root: None,
            left_child: FxHashMap::default(),
            right_child: FxHashMap::default(),
            parent: FxHashMap::default(),
            root: None,
        }
    }

    fn add_tree_edge(&mut self, a: Bag, b: Bag) {
        self.adjacency.entry(a.clone()).or_default().push(b.clone());
        self.adjacency.entry(b).or_default().push(a);
    }

    fn propagated_cut(&self, a: &Bag, b: &Bag) -> BTreeSet<(VertexId, VertexId)> {
        self.edge_cuts[a].symmetric_difference(&self.edge_cuts[b]).copied().collect()
    }

    /// Records the contraction of `u` and `v` in `graph`, fusing their
    /// current tree nodes into a new one.
    pub fn contract(&mut self, u: VertexId, v: VertexId) -> Result<()> {
        let node_u = self
            .tree_node_of
            .get(&u)
            .cloned()
            .ok_or(Error::UnknownVertex(u))?;
        let node_v = self
            .tree_node_of
            .get(&v)
            .cloned()
            .ok_or(Error::UnknownVertex(v))?;

        let new_node: Bag = node_u.union(&node_v).copied().collect();
        self.current_root = Some(new_node.clone());

        self.add_tree_edge(node_u.clone(), new_node.clone());
        self.add_tree_edge(node_v.clone(), new_node.clone());

        let cut = self.propagated_cut(&node_u, &node_v);
        let cutweight: Weight = cut
            .iter()
            .map(|&(a, b)| self.graph.weight(a, b).unwrap_or(0.0))
            .sum();
        self.edge_cuts.insert(new_node.clone(), cut);
        self.cs.insert(new_node.clone(), cutweight);

        if new_node.len() < self.graph.len()
            && (self.argmin_node.is_none() || cutweight < self.argmin_cut)
        {
            self.argmin_node = Some(new_node.clone());
            self.argmin_cut = cutweight;
        }

        self.tree_node_of.insert(u, new_node.clone());
        self.history.insert(new_node.clone(), (u, v));
        self.tree_nodes.push(new_node);

        Ok(())
    }

    /// Finishes the tree once `minor` has 3 or fewer vertices, contracting
    /// its remaining edges in descending weight order (ties broken by the
    /// order `minor.edges()` yields).
    pub fn contract_remaining(&mut self, minor: &WeightedGraph) -> Result<()> {
        debug_assert!(minor.len() <= 3);

        // Sort ascending by weight, then repeatedly pop the heaviest edge so
        // the final contraction order is descending by weight.
        let mut weighted: Vec<(VertexId, VertexId, Weight)> = minor.edges().collect();
        weighted.sort_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(std::cmp::Ordering::Equal));
        let mut ordered: Vec<(VertexId, VertexId)> =
            weighted.into_iter().map(|(u, v, _)| (u, v)).collect();

        let mut final_edges = Vec::new();
        while let Some((eu, ev)) = ordered.pop() {
            for edge in ordered.iter_mut() {
                if edge.0 == ev {
                    edge.0 = eu;
                }
                if edge.1 == ev {
                    edge.1 = eu;
                }
            }
            final_edges.push((eu, ev));
        }

        for (u, v) in final_edges {
            // A 3-vertex minor is necessarily the complete triangle (biconnectivity
            // forces all 3 edges), so the renaming pass above always yields one more
            // popped edge than real merges: the last pop's endpoints have already been
            // fused by an earlier one. Skip it, same as the replay step does for an
            // edge already collapsed by earlier merges (contractor.rs).
            if u == v {
                continue;
            }
            self.contract(u, v)?;
        }
        Ok(())
    }

    /// Re-roots the free contraction tree at the bag with the smallest
    /// cutweight seen during construction, which locally minimizes the
    /// memory footprint of the resulting contraction order. Returns the new
    /// root.
    pub fn reroot(&mut self) -> Result<Bag> {
        let argmin = self
            .argmin_node
            .clone()
            .ok_or_else(|| Error::InvariantViolation("no argmin tree node recorded".into()))?;
        let old_root = self
            .current_root
            .clone()
            .ok_or_else(|| Error::InvariantViolation("tree has no root yet".into()))?;

        let neighbors = self
            .adjacency
            .get(&argmin)
            .cloned()
            .ok_or_else(|| Error::InvariantViolation("argmin node has no tree edges".into()))?;
        // The parent is the largest incident bag — the one closer to
        // encompassing the whole graph.
        let parent = neighbors
            .into_iter()
            .max_by_key(|n| (n.len(), n.iter().next().copied()))
            .ok_or_else(|| Error::InvariantViolation("argmin node is isolated".into()))?;

        self.remove_tree_edge(&argmin, &parent);

        let root = Bag::new();
        self.add_tree_edge(root.clone(), parent.clone());
        self.add_tree_edge(root.clone(), argmin.clone());

        let cut = self.propagated_cut(&parent, &argmin);
        let cutweight: Weight = cut
            .iter()
            .map(|&(a, b)| self.graph.weight(a, b).unwrap_or(0.0))
            .sum();
        self.cs.insert(root.clone(), cutweight);

        self.unroot(&old_root)?;
        self.root = Some(root.clone());
        Ok(root)
    }

    fn remove_tree_edge(&mut self, a: &Bag, b: &Bag) {
        if let Some(adj) = self.adjacency.get_mut(a) {
            adj.retain(|x| x != b);
        }
        if let Some(adj) = self.adjacency.get_mut(b) {
            adj.retain(|x| x != a);
        }
    }

    fn unroot(&mut self, old_root: &Bag) -> Result<()> {
        let children = self
            .adjacency
            .remove(old_root)
            .ok_or_else(|| Error::InvariantViolation("old root has no tree edges".into()))?;
        if children.len() != 2 {
            return Err(Error::InvariantViolation(format!(
                "old root has {} children, expected 2",
                children.len()
            )));
        }
        let (left, right) = (children[0].clone(), children[1].clone());
        self.remove_tree_edge(&left, old_root);
        self.remove_tree_edge(&right, old_root);
        self.add_tree_edge(left, right);
        Ok(())
    }

    /// BFS from `root`, recording parent/child relationships for
    /// `ordering`'s recursive walk.
    pub fn set_tree(&mut self, root: &Bag) -> Result<()> {
        let mut queue = std::collections::VecDeque::new();
        let mut seen = BTreeSet::new();
        queue.push_back(root.clone());

        while let Some(node) = queue.pop_front() {
            seen.insert(node.clone());
            let neighbors = self.adjacency.get(&node).cloned().unwrap_or_default();
            let children: Vec<Bag> = neighbors.into_iter().filter(|n| !seen.contains(n)).collect();

            if children.len() == 2 {
                let (left, right) = (children[0].clone(), children[1].clone());
                queue.push_back(left.clone());
                queue.push_back(right.clone());
                self.left_child.insert(node.clone(), Some(left.clone()));
                self.right_child.insert(node.clone(), Some(right.clone()));
                self.parent.insert(left, node.clone());
                self.parent.insert(right, node.clone());
            } else if children.is_empty() {
                self.left_child.insert(node.clone(), None);
                self.right_child.insert(node.clone(), None);
            } else {
                return Err(Error::InvariantViolation(format!(
                    "tree node has {} children, expected 0 or 2",
                    children.len()
                )));
            }
        }

        self.root = Some(root.clone());
        Ok(())
    }

    /// Generates a contraction sequence. `memory_conscious` recursively
    /// orders each subtree to minimize peak memory footprint; otherwise the
    /// creation order of the tree nodes is used directly.
    pub fn ordering(&self, memory_conscious: bool) -> Result<Vec<(VertexId, VertexId)>> {
        if memory_conscious {
            let root = self
                .root
                .clone()
                .ok_or_else(|| Error::InvariantViolation("set_tree was not called".into()))?;
            let (_, _, order, _) = self.memory_ordering(&root)?;
            Ok(order)
        } else {
            self.tree_nodes
                .iter()
                .map(|node| {
                    self.history
                        .get(node)
                        .copied()
                        .ok_or_else(|| Error::InvariantViolation("tree node has no history".into()))
                })
                .collect()
        }
    }

    // TODO: convert to an explicit stack-based post-order walk if contraction
    // trees over graphs with > ~10k vertices start to hit the recursion
    // limit here.
    fn memory_ordering(
        &self,
        node: &Bag,
    ) -> Result<(Weight, Weight, Vec<(VertexId, VertexId)>, VertexId)> {
        let left = self.left_child.get(node).cloned().flatten();
        let right = self.right_child.get(node).cloned().flatten();

        match (left, right) {
            (None, None) => {
                let witness = *node.iter().next().ok_or_else(|| {
                    Error::InvariantViolation("leaf tree node has an empty bag".into())
                })?;
                let cs_self = self.cs[node];
                Ok((cs_self, cs_self, Vec::new(), witness))
            }
            (Some(left), Some(right)) => {
                let (left_cs, left_peak, left_order, u) = self.memory_ordering(&left)?;
                let (right_cs, right_peak, right_order, v) = self.memory_ordering(&right)?;

                let left_score = left_cs + right_peak;
                let right_score = right_cs + left_peak;
                let step = (u, v);
                let cs_self = self.cs[node];

                if left_score < right_score {
                    let mut order = left_order;
                    order.extend(right_order);
                    order.push(step);
                    Ok((cs_self, cs_self.max(left_score), order, u))
                } else {
                    let mut order = right_order;
                    order.extend(left_order);
                    order.push(step);
                    Ok((cs_self, cs_self.max(right_score), order, u))
                }
            }
            _ => Err(Error::InvariantViolation(
                "internal tree node has exactly one child".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_graph() -> WeightedGraph {
        let mut g = WeightedGraph::new();
        g.add_edge(1, 2, 1.0).unwrap();
        g.add_edge(2, 3, 1.0).unwrap();
        g.add_edge(3, 4, 1.0).unwrap();
        g
    }

    #[test]
    fn contract_down_to_single_bag_covers_every_vertex() {
        let g = path_graph();
        let mut tree = ContractionTree::new(&g);
        tree.contract(1, 2).unwrap();
        tree.contract(1, 3).unwrap();
        tree.contract(1, 4).unwrap();

        let full = tree.tree_node_of[&1].clone();
        assert_eq!(full, [1, 2, 3, 4].into_iter().collect::<Bag>());
    }

    #[test]
    fn ordering_without_memory_conscious_matches_contraction_order() {
        let g = path_graph();
        let mut tree = ContractionTree::new(&g);
        tree.contract(1, 2).unwrap();
        tree.contract(1, 3).unwrap();
        tree.contract(1, 4).unwrap();

        let order = tree.ordering(false).unwrap();
        assert_eq!(order, vec![(1, 2), (1, 3), (1, 4)]);
    }

    #[test]
    fn reroot_and_set_tree_then_memory_ordering_covers_every_vertex() {
        let g = path_graph();
        let mut tree = ContractionTree::new(&g);
        tree.contract(1, 2).unwrap();
        tree.contract(1, 3).unwrap();
        tree.contract(1, 4).unwrap();

        let root = tree.reroot().unwrap();
        tree.set_tree(&root).unwrap();
        let order = tree.ordering(true).unwrap();

        assert_eq!(order.len(), 3);
        let mut touched: BTreeSet<VertexId> = BTreeSet::new();
        for (a, b) in order {
            touched.insert(a);
            touched.insert(b);
        }
        assert_eq!(touched, [1, 2, 3, 4].into_iter().collect());
    }
}
