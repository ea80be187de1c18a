//! Fixed planar test graphs with known carving width, used across the
//! ratcatcher/carving-width test suites. Rotation orders are derived from an
//! explicit planar drawing of each graph (see DESIGN.md) and fixed up with
//! `set_rotation` after the edges are added, since insertion order alone
//! does not determine a valid embedding for these hand-specified graphs.
use crate::graph::WeightedGraph;

/// A 3-regular, 10-vertex planar graph: the pentagonal prism (outer pentagon
/// 1-2-3-4-5, inner pentagon 6-7-8-9-10, spokes i <-> i+5). Despite the
/// "Petersen-like" name (3-regular, 10 vertices, 15 edges), this is the
/// planar prism graph, not the (non-planar) Petersen graph itself — the
/// carving-width oracle requires a planar input. Carving width 4.
pub fn petersen_like_g1() -> WeightedGraph {
    let mut g = WeightedGraph::new();
    let edges = [
        (1, 2),
        (2, 3),
        (3, 4),
        (4, 5),
        (5, 1),
        (1, 6),
        (2, 7),
        (3, 8),
        (4, 9),
        (5, 10),
        (6, 7),
        (7, 8),
        (8, 9),
        (9, 10),
        (10, 6),
    ];
    for (u, v) in edges {
        g.add_edge(u, v, 1.0).unwrap();
    }

    let rotations: [(usize, [usize; 3]); 10] = [
        (1, [5, 6, 2]),
        (2, [7, 3, 1]),
        (3, [2, 8, 4]),
        (4, [3, 9, 5]),
        (5, [4, 10, 1]),
        (6, [10, 7, 1]),
        (7, [8, 2, 6]),
        (8, [3, 7, 9]),
        (9, [4, 8, 10]),
        (10, [9, 6, 5]),
    ];
    for (v, order) in rotations {
        g.set_rotation(v, order.to_vec()).unwrap();
    }

    g
}

/// [`petersen_like_g1`]'s topology with caller-supplied edge weights, in the
/// same order as that function's `edges` array. Used by the property-based
/// tests in `properties` to exercise the oracle/replay invariants over a
/// fixed planar topology with varying weights, rather than generating random
/// planar graphs from scratch.
pub fn petersen_like_g1_with_weights(weights: [f64; 15]) -> WeightedGraph {
    let mut g = WeightedGraph::new();
    let edges = [
        (1, 2),
        (2, 3),
        (3, 4),
        (4, 5),
        (5, 1),
        (1, 6),
        (2, 7),
        (3, 8),
        (4, 9),
        (5, 10),
        (6, 7),
        (7, 8),
        (8, 9),
        (9, 10),
        (10, 6),
    ];
    for ((u, v), w) in edges.into_iter().zip(weights) {
        g.add_edge(u, v, w).unwrap();
    }

    let rotations: [(usize, [usize; 3]); 10] = [
        (1, [5, 6, 2]),
        (2, [7, 3, 1]),
        (3, [2, 8, 4]),
        (4, [3, 9, 5]),
        (5, [4, 10, 1]),
        (6, [10, 7, 1]),
        (7, [8, 2, 6]),
        (8, [3, 7, 9]),
        (9, [4, 8, 10]),
        (10, [9, 6, 5]),
    ];
    for (v, order) in rotations {
        g.set_rotation(v, order.to_vec()).unwrap();
    }

    g
}

/// A 7-vertex asymmetric planar graph (`G2`): a
/// 5-cycle `3-4-5-7-6-3` with chord `4-7`, plus an external path `3-1-2-5`.
/// All weights 1. Carving width 4.
pub fn sandwich_g2() -> WeightedGraph {
    let mut g = WeightedGraph::new();
    let edges = [
        (1, 3),
        (1, 2),
        (5, 2),
        (4, 3),
        (6, 3),
        (4, 5),
        (4, 7),
        (6, 7),
        (5, 7),
    ];
    for (u, v) in edges {
        g.add_edge(u, v, 1.0).unwrap();
    }

    g.set_rotation(1, vec![2, 3]).unwrap();
    g.set_rotation(2, vec![5, 1]).unwrap();
    g.set_rotation(3, vec![6, 4, 1]).unwrap();
    g.set_rotation(4, vec![7, 5, 3]).unwrap();
    g.set_rotation(5, vec![2, 4, 7]).unwrap();
    g.set_rotation(6, vec![7, 3]).unwrap();
    g.set_rotation(7, vec![5, 4, 6]).unwrap();

    g
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::enumerate_faces;

    #[test]
    fn g1_satisfies_eulers_formula() {
        let g = petersen_like_g1();
        let faces = enumerate_faces(&g).unwrap();
        assert_eq!(g.len() as isize - g.num_edges() as isize + faces.len() as isize, 2);
    }

    #[test]
    fn g1_is_biconnected() {
        assert!(petersen_like_g1().is_biconnected());
    }

    #[test]
    fn g2_satisfies_eulers_formula() {
        let g = sandwich_g2();
        let faces = enumerate_faces(&g).unwrap();
        assert_eq!(g.len() as isize - g.num_edges() as isize + faces.len() as isize, 2);
    }

    #[test]
    fn g2_is_biconnected() {
        assert!(sandwich_g2().is_biconnected());
    }
}
