//! Face enumeration over a planar rotation system. Given a `WeightedGraph`
//! whose adjacency order is the vertex's cyclic incidence order (its
//! rotation), this walks every directed half-edge exactly once and groups
//! them into the faces of the embedding, including the outer face.
//!
//! Face tracing follows the usual DCEL rule: from half-edge `(u, v)`, the
//! next half-edge of the same face is `(v, w)` where `w` is the neighbor
//! immediately *before* `u` in `v`'s rotation (i.e. the next edge clockwise
//! after stepping back across the one just traversed), the same rule
//! `networkx.PlanarEmbedding.traverse_face` implements.
use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use crate::constants::VertexId;
use crate::error::{Error, Result};
use crate::graph::WeightedGraph;

/// One face of a planar embedding: the cyclic sequence of directed
/// half-edges bounding it, in traversal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    half_edges: Vec<(VertexId, VertexId)>,
}

impl Face {
    /// Number of edges bounding the face.
    pub fn len(&self) -> usize {
        self.half_edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.half_edges.is_empty()
    }

    /// The oriented half-edges in traversal order.
    pub fn half_edges(&self) -> &[(VertexId, VertexId)] {
        &self.half_edges
    }

    /// The vertices bounding the face, in traversal order (one entry per
    /// half-edge).
    pub fn vertices(&self) -> Vec<VertexId> {
        self.half_edges.iter().map(|&(u, _)| u).collect()
    }

    /// A hashable, orientation- and rotation-invariant representation: the
    /// set of undirected edges bounding the face, each canonicalized with
    /// its smaller endpoint first. Two faces that trace the same cycle in
    /// either direction, starting from any half-edge, compare equal.
    pub fn canonical_edges(&self) -> BTreeSet<(VertexId, VertexId)> {
        self.half_edges
            .iter()
            .map(|&(u, v)| if u <= v { (u, v) } else { (v, u) })
            .collect()
    }
}

/// Enumerates the faces of `g`'s embedding, including the outer face.
///
/// Precondition: `g`'s adjacency lists already hold a planar rotation
/// system. This is not verified directly — there is no cheap local check for
/// it — but a violation is caught by the Euler's-formula postcondition
/// below, which is why `NonPlanarGraph` is returned from here rather than
/// from `WeightedGraph`.
pub fn enumerate_faces(g: &WeightedGraph) -> Result<Vec<Face>> {
    if g.is_empty() {
        return Ok(Vec::new());
    }

    // position[(v, w)] = index of w within v's rotation list.
    let mut position: FxHashMap<(VertexId, VertexId), usize> = FxHashMap::default();
    let mut rotation: FxHashMap<VertexId, Vec<VertexId>> = FxHashMap::default();
    for v in g.vertices() {
        let order: Vec<VertexId> = g.neighbors(v).collect();
        for (i, &w) in order.iter().enumerate() {
            position.insert((v, w), i);
        }
        rotation.insert(v, order);
    }

    let mut traced: BTreeSet<(VertexId, VertexId)> = BTreeSet::new();
    let mut faces = Vec::new();

    for u in g.vertices() {
        for v in g.neighbors(u) {
            if traced.contains(&(u, v)) {
                continue;
            }

            let mut half_edges = Vec::new();
            let (mut a, mut b) = (u, v);
            loop {
                traced.insert((a, b));
                half_edges.push((a, b));

                let rot_b = rotation
                    .get(&b)
                    .ok_or_else(|| Error::InvariantViolation(format!("vertex {b} has no rotation")))?;
                let idx = *position.get(&(b, a)).ok_or_else(|| {
                    Error::NonPlanarGraph(format!("edge ({a}, {b}) not present in reverse rotation"))
                })?;
                let prev_idx = (idx + rot_b.len() - 1) % rot_b.len();
                let c = rot_b[prev_idx];

                let (na, nb) = (b, c);
                if (na, nb) == (u, v) {
                    break;
                }
                a = na;
                b = nb;
            }

            faces.push(Face { half_edges });
        }
    }

    let v = g.len() as i64;
    let e = g.num_edges() as i64;
    let f = faces.len() as i64;
    if v - e + f != 2 {
        return Err(Error::NonPlanarGraph(format!(
            "Euler's formula failed: V={v} E={e} F={f}, V - E + F = {} != 2",
            v - e + f
        )));
    }

    Ok(faces)
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
    fn triangle_has_two_faces() {
        let faces = enumerate_faces(&triangle()).unwrap();
        assert_eq!(faces.len(), 2);
        for face in &faces {
            assert_eq!(face.len(), 3);
        }
    }

    #[test]
    fn every_edge_appears_in_exactly_two_faces() {
        let g = triangle();
        let faces = enumerate_faces(&g).unwrap();
        let mut count: FxHashMap<(VertexId, VertexId), usize> = FxHashMap::default();
        for face in &faces {
            for edge in face.canonical_edges() {
                *count.entry(edge).or_insert(0) += 1;
            }
        }
        for (u, v, _) in g.edges() {
            let key = if u <= v { (u, v) } else { (v, u) };
            assert_eq!(count[&key], 2);
        }
    }

    #[test]
    fn satisfies_eulers_formula() {
        // square with a diagonal: 4 vertices, 5 edges -> 3 faces.
        let mut g = WeightedGraph::new();
        g.add_edge(1, 2, 1.0).unwrap();
        g.add_edge(2, 3, 1.0).unwrap();
        g.add_edge(3, 4, 1.0).unwrap();
        g.add_edge(4, 1, 1.0).unwrap();
        g.add_edge(1, 3, 1.0).unwrap();
        let faces = enumerate_faces(&g).unwrap();
        assert_eq!(g.len() as i64 - g.num_edges() as i64 + faces.len() as i64, 2);
    }

    #[test]
    fn canonical_edges_are_orientation_invariant() {
        let faces = enumerate_faces(&triangle()).unwrap();
        let a = faces[0].canonical_edges();
        let reversed_half_edges: Vec<(VertexId, VertexId)> = faces[0]
            .half_edges()
            .iter()
            .rev()
            .map(|&(x, y)| (y, x))
            .collect();
        let b = Face {
            half_edges: reversed_half_edges,
        }
        .canonical_edges();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_graph_has_no_faces() {
        assert_eq!(enumerate_faces(&WeightedGraph::new()).unwrap(), Vec::new());
    }
}
