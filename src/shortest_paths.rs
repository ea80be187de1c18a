//! All-pairs shortest paths over the planar dual multigraph. Parallel edges
//! are handled implicitly: Dijkstra relaxes every parallel edge it meets, so
//! only the shortest of any pair of parallel edges ever survives a
//! relaxation.
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::constants::Weight;
use crate::dual::{FaceId, PlanarDual};

#[derive(Debug)]
struct Candidate {
    face: FaceId,
    dist: Weight,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.dist == other.dist
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so `BinaryHeap` (a max-heap) pops the smallest distance.
        other
            .dist
            .partial_cmp(&self.dist)
            .unwrap_or(Ordering::Equal)
    }
}

fn dijkstra_from(dual: &PlanarDual, source: FaceId) -> Vec<Weight> {
    let n = dual.num_faces();
    let mut dist = vec![Weight::INFINITY; n];
    dist[source] = 0.0;

    let mut queue = BinaryHeap::new();
    queue.push(Candidate {
        face: source,
        dist: 0.0,
    });

    while let Some(Candidate { face, dist: d }) = queue.pop() {
        if d > dist[face] {
            continue;
        }
        for (neighbor, _key, weight) in dual.neighbors(face) {
            let candidate_dist = d + weight;
            if candidate_dist < dist[neighbor] {
                dist[neighbor] = candidate_dist;
                queue.push(Candidate {
                    face: neighbor,
                    dist: candidate_dist,
                });
            }
        }
    }

    dist
}

/// Computes the full `num_faces x num_faces` distance matrix of `dual`. The
/// dual of a biconnected planar graph is itself connected, so every entry is
/// finite; this is not re-verified here.
pub fn all_pairs_shortest_paths(dual: &PlanarDual) -> Vec<Vec<Weight>> {
    (0..dual.num_faces())
        .map(|source| dijkstra_from(dual, source))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::WeightedGraph;

    #[test]
    fn triangle_dual_distances_are_symmetric_and_zero_on_diagonal() {
        use approx::assert_abs_diff_eq;

        let mut g = WeightedGraph::new();
        g.add_edge(1, 2, 2.0).unwrap();
        g.add_edge(2, 3, 3.0).unwrap();
        g.add_edge(3, 1, 4.0).unwrap();
        let dual = PlanarDual::build(&g).unwrap();
        let dists = all_pairs_shortest_paths(&dual);

        for i in 0..dual.num_faces() {
            assert_eq!(dists[i][i], 0.0);
        }
        for i in 0..dual.num_faces() {
            for j in 0..dual.num_faces() {
                assert_abs_diff_eq!(dists[i][j], dists[j][i], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn parallel_edges_use_the_shorter_one() {
        // Two faces connected by three parallel dual edges of weight 2,3,4;
        // the shortest distance between them must be 2.
        let mut g = WeightedGraph::new();
        g.add_edge(1, 2, 2.0).unwrap();
        g.add_edge(2, 3, 3.0).unwrap();
        g.add_edge(3, 1, 4.0).unwrap();
        let dual = PlanarDual::build(&g).unwrap();
        let dists = all_pairs_shortest_paths(&dual);
        assert_eq!(dists[0][1], 2.0);
    }
}
