//! Planar dual multigraph. One dual vertex per face of the primal embedding
//! (so `FaceId` doubles as a dual-vertex id); one dual edge per primal edge,
//! disambiguated from other dual edges between the same face pair by a
//! parallel-edge key.
use rustc_hash::FxHashMap;

use crate::constants::{VertexId, Weight};
use crate::error::{Error, Result};
use crate::face::{enumerate_faces, Face};
use crate::graph::WeightedGraph;

pub type FaceId = usize;

/// Identifies a dual edge: the two faces it joins (`lo <= hi`) and a
/// parallel-edge key distinguishing it from other primal edges shared by the
/// same pair of faces.
pub type DualEdgeId = (FaceId, FaceId, usize);

fn canonical(u: VertexId, v: VertexId) -> (VertexId, VertexId) {
    if u <= v {
        (u, v)
    } else {
        (v, u)
    }
}

/// The planar dual of a `WeightedGraph`, plus the cross-maps the ratcatcher
/// oracle needs between primal and dual structure.
pub struct PlanarDual {
    faces: Vec<Face>,
    adjacency: Vec<Vec<(FaceId, usize, Weight)>>,
    dual_weight: FxHashMap<DualEdgeId, Weight>,
    crossing: FxHashMap<(VertexId, VertexId), DualEdgeId>,
    primal_of: FxHashMap<DualEdgeId, (VertexId, VertexId)>,
    incident_faces: FxHashMap<(VertexId, VertexId), (FaceId, FaceId)>,
    /// For each primal vertex `v`, the cyclic sequence of `(face[i],
    /// weight of the edge leaving face[i] towards face[i + 1])` pairs in
    /// `v`'s rotation order, where `face[i]` is the corner between primal
    /// edges `i` and `i + 1`. This is exactly what the oracle's short-walk
    /// test needs and avoids reconstructing the "face-to-walk" ordering
    /// networkx computes separately, since the rotation order already
    /// carries it.
    room_arcs: FxHashMap<VertexId, Vec<(FaceId, Weight)>>,
}

impl PlanarDual {
    /// Builds the dual of `g` from its rotation-order embedding.
    pub fn build(g: &WeightedGraph) -> Result<Self> {
        let faces = enumerate_faces(g)?;

        let mut face_of_half_edge: FxHashMap<(VertexId, VertexId), FaceId> = FxHashMap::default();
        for (fid, face) in faces.iter().enumerate() {
            for &(u, v) in face.half_edges() {
                face_of_half_edge.insert((u, v), fid);
            }
        }

        let mut adjacency: Vec<Vec<(FaceId, usize, Weight)>> = vec![Vec::new(); faces.len()];
        let mut dual_weight = FxHashMap::default();
        let mut crossing = FxHashMap::default();
        let mut primal_of = FxHashMap::default();
        let mut incident_faces = FxHashMap::default();
        let mut parallel_count: FxHashMap<(FaceId, FaceId), usize> = FxHashMap::default();

        for (u, v, w) in g.edges() {
            let fa = *face_of_half_edge
                .get(&(u, v))
                .ok_or_else(|| Error::InvariantViolation(format!("no face for half-edge ({u}, {v})")))?;
            let fb = *face_of_half_edge
                .get(&(v, u))
                .ok_or_else(|| Error::InvariantViolation(format!("no face for half-edge ({v}, {u})")))?;

            if fa == fb {
                // A bridge: both sides of the edge bound the same face. This
                // cannot occur in a biconnected graph with >= 3 vertices,
                // which every caller of the dual already requires, so this is
                // a defensive skip rather than a reachable case.
                continue;
            }
            let (lo, hi) = if fa <= fb { (fa, fb) } else { (fb, fa) };
            let key = {
                let slot = parallel_count.entry((lo, hi)).or_insert(0);
                let k = *slot;
                *slot += 1;
                k
            };

            adjacency[lo].push((hi, key, w));
            adjacency[hi].push((lo, key, w));

            let id = (lo, hi, key);
            dual_weight.insert(id, w);
            let edge = canonical(u, v);
            crossing.insert(edge, id);
            primal_of.insert(id, edge);
            incident_faces.insert(edge, (fa, fb));
        }

        let mut room_arcs: FxHashMap<VertexId, Vec<(FaceId, Weight)>> = FxHashMap::default();
        for vtx in g.vertices() {
            let order: Vec<VertexId> = g.neighbors(vtx).collect();
            let d = order.len();
            let mut arcs = Vec::with_capacity(d);
            for i in 0..d {
                let next = order[(i + 1) % d];
                let face_before = *face_of_half_edge.get(&(next, vtx)).ok_or_else(|| {
                    Error::InvariantViolation(format!("no face for half-edge ({next}, {vtx})"))
                })?;
                let weight = g
                    .weight(vtx, order[(i + 1) % d])
                    .expect("adjacency/weights desync");
                arcs.push((face_before, weight));
            }
            room_arcs.insert(vtx, arcs);
        }

        Ok(Self {
            faces,
            adjacency,
            dual_weight,
            crossing,
            primal_of,
            incident_faces,
            room_arcs,
        })
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    pub fn face(&self, id: FaceId) -> &Face {
        &self.faces[id]
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn neighbors(&self, face: FaceId) -> impl Iterator<Item = (FaceId, usize, Weight)> + '_ {
        self.adjacency[face].iter().copied()
    }

    pub fn edge_weight(&self, edge: DualEdgeId) -> Weight {
        self.dual_weight.get(&edge).copied().unwrap_or(0.0)
    }

    pub fn dual_edge_for(&self, u: VertexId, v: VertexId) -> Option<DualEdgeId> {
        self.crossing.get(&canonical(u, v)).copied()
    }

    pub fn primal_edge_for(&self, edge: DualEdgeId) -> Option<(VertexId, VertexId)> {
        self.primal_of.get(&edge).copied()
    }

    pub fn incident_faces(&self, u: VertexId, v: VertexId) -> Option<(FaceId, FaceId)> {
        self.incident_faces.get(&canonical(u, v)).copied()
    }

    /// The cyclic `(face, weight)` arcs around primal vertex `v`, in
    /// rotation order. `arcs[i].0` is the face lying between primal edges
    /// `i` and `i + 1`; `arcs[i].1` is the weight of the edge separating
    /// `arcs[i].0` from `arcs[i + 1].0`, i.e. primal edge `i + 1`.
    pub fn room_arcs(&self, v: VertexId) -> &[(FaceId, Weight)] {
        self.room_arcs.get(&v).map_or(&[], |a| a.as_slice())
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
    fn triangle_dual_has_two_vertices_and_three_parallel_edges() {
        let g = triangle();
        let dual = PlanarDual::build(&g).unwrap();
        assert_eq!(dual.num_faces(), 2);
        assert_eq!(dual.neighbors(0).count(), 3);
        assert_eq!(dual.neighbors(1).count(), 3);
    }

    #[test]
    fn every_primal_edge_has_a_dual_edge() {
        let g = triangle();
        let dual = PlanarDual::build(&g).unwrap();
        for (u, v, _) in g.edges() {
            assert!(dual.dual_edge_for(u, v).is_some());
        }
    }

    #[test]
    fn room_arcs_cover_every_incident_edge() {
        let g = triangle();
        let dual = PlanarDual::build(&g).unwrap();
        for v in g.vertices() {
            assert_eq!(dual.room_arcs(v).len(), g.degree(v));
        }
    }

    #[test]
    fn incident_faces_are_the_two_faces_sharing_the_edge() {
        let g = triangle();
        let dual = PlanarDual::build(&g).unwrap();
        let (fa, fb) = dual.incident_faces(1, 2).unwrap();
        assert_ne!(fa, fb);
    }
}
