//! The ratcatcher oracle: a two-player pursuit-game test of whether a
//! biconnected planar graph has carving width strictly less than `k`.
//!
//! The catcher occupies a face of the dual and can choose to patrol a wall
//! (an edge) instead; the rat occupies a vertex. A room state `(r, v)` means
//! "the rat can still safely be at vertex `v` while the catcher holds face
//! `r`"; a wall state `(e, C)` means "the catcher standing on edge `e` cannot
//! prevent the rat from reaching any vertex of component `C`". Both state
//! sets start optimistic and shrink to a fixed point by alternately pruning
//! states that no longer admit a rat escape; the graph's carving width is
//! `< k` iff either set empties out.
use rustc_hash::{FxHashMap, FxHashSet};

use crate::constants::{VertexId, Weight};
use crate::dual::{FaceId, PlanarDual};
use crate::error::Result;
use crate::graph::WeightedGraph;
use crate::shortest_paths::all_pairs_shortest_paths;
use crate::statistics::OracleStats;

fn canonical(u: VertexId, v: VertexId) -> (VertexId, VertexId) {
    if u <= v {
        (u, v)
    } else {
        (v, u)
    }
}

/// True iff the rat can reach vertex `v` from room `r` quickly enough
/// (strictly under `k`) going around the room's boundary in either
/// direction, which prunes state `(r, v)` from contention.
fn short_walk(
    k: Weight,
    dists: &[Vec<Weight>],
    room: FaceId,
    v: VertexId,
    cutweight: Weight,
    room_arcs: &[(FaceId, Weight)],
) -> bool {
    let n = room_arcs.len();
    debug_assert!(n >= 2);
    let walk_length = cutweight;

    for i in 0..n {
        let s_star = room_arcs[i].0;
        let dvs = dists[room][s_star];

        for j in 0..=i {
            let t_star = room_arcs[j].0;
            let dvt = dists[room][t_star];

            let mut lts = 0.0;
            let mut h = j;
            while h != i {
                lts += room_arcs[h].1;
                h = (h + 1) % n;
            }

            let walk_st = dvt + dvs + lts;
            let walk_ts = dvt + dvs + walk_length - lts;

            if walk_st < k && walk_ts < k {
                return true;
            }
        }
    }
    false
}

fn connected_components(
    adjacency: &FxHashMap<VertexId, Vec<VertexId>>,
) -> Vec<FxHashSet<VertexId>> {
    let mut seen: FxHashSet<VertexId> = FxHashSet::default();
    let mut components = Vec::new();

    for &start in adjacency.keys() {
        if seen.contains(&start) {
            continue;
        }
        let mut component = FxHashSet::default();
        let mut stack = vec![start];
        while let Some(u) = stack.pop() {
            if component.insert(u) {
                seen.insert(u);
                if let Some(neighbors) = adjacency.get(&u) {
                    for &w in neighbors {
                        if !component.contains(&w) {
                            stack.push(w);
                        }
                    }
                }
            }
        }
        components.push(component);
    }

    components
}

fn init_wall_states(
    g: &WeightedGraph,
    dual: &PlanarDual,
    k: Weight,
    dists: &[Vec<Weight>],
) -> FxHashMap<(VertexId, VertexId), Vec<Option<FxHashSet<VertexId>>>> {
    let mut states = FxHashMap::default();
    let all_edges: Vec<(VertexId, VertexId, Weight)> = g.edges().collect();

    for &(eu, ev, _) in &all_edges {
        let edge = canonical(eu, ev);
        let (u1, u2, _) = dual.dual_edge_for(edge.0, edge.1).expect("edge has a dual");
        let pe = g.weight(edge.0, edge.1).expect("edge weight");

        let mut adjacency: FxHashMap<VertexId, Vec<VertexId>> =
            g.vertices().map(|v| (v, Vec::new())).collect();

        for &(fu, fv, pf) in &all_edges {
            if fu == edge.0 || fu == edge.1 || fv == edge.0 || fv == edge.1 {
                continue;
            }
            let (v1, v2, _) = dual.dual_edge_for(fu, fv).expect("edge has a dual");

            if k > dists[u1][v1] + dists[u2][v2] + pf + pe {
                continue;
            }
            if k > dists[u1][v2] + dists[u2][v1] + pf + pe {
                continue;
            }

            adjacency.get_mut(&fu).unwrap().push(fv);
            adjacency.get_mut(&fv).unwrap().push(fu);
        }

        let components = connected_components(&adjacency);
        states.insert(
            edge,
            components.into_iter().map(Some).collect::<Vec<_>>(),
        );
    }

    states
}

/// One fixed-point pass: prunes wall states whose induced component has lost
/// every room state, and reports which room states those walls invalidate in
/// turn. Returns `(any_wall_pruned, rooms_to_delete)`.
fn prune_all_states(
    edge_states: &mut FxHashMap<(VertexId, VertexId), Vec<Option<FxHashSet<VertexId>>>>,
    room_states: &[FxHashSet<VertexId>],
    dual: &PlanarDual,
) -> (bool, FxHashMap<FaceId, FxHashSet<VertexId>>) {
    let mut rooms_to_delete: FxHashMap<FaceId, FxHashSet<VertexId>> = FxHashMap::default();
    let mut walls_pruned = false;

    for (room_id, room) in room_states.iter().enumerate() {
        for &(u, v) in dual.face(room_id).half_edges() {
            let edge = canonical(u, v);
            let (fa, fb) = match dual.incident_faces(u, v) {
                Some(f) => f,
                None => continue,
            };
            let r_inc = if room_id == fa { fb } else { fa };

            if let Some(components) = edge_states.get_mut(&edge) {
                for slot in components.iter_mut() {
                    let prune = match slot {
                        Some(component) => component.iter().all(|v| !room.contains(v)),
                        None => false,
                    };
                    if prune {
                        walls_pruned = true;
                        if let Some(component) = slot.take() {
                            rooms_to_delete.entry(r_inc).or_default().extend(component);
                        }
                    }
                }
            }
        }
    }

    (walls_pruned, rooms_to_delete)
}

/// Tests whether `g` (a biconnected planar graph) has carving width strictly
/// less than `k`. Returns `Err` only if `g`'s embedding fails to produce a
/// consistent dual (see `Error::NonPlanarGraph`/`InvariantViolation`).
pub fn ratcatcher(g: &WeightedGraph, k: Weight) -> Result<bool> {
    let mut stats = OracleStats::default();
    ratcatcher_with_stats(g, k, &mut stats)
}

/// As `ratcatcher`, also accumulating pruning-pass statistics into `stats`.
pub fn ratcatcher_with_stats(g: &WeightedGraph, k: Weight, stats: &mut OracleStats) -> Result<bool> {
    if g.max_cutweight() >= k {
        return Ok(false);
    }

    let dual = PlanarDual::build(g)?;
    if dual.num_faces() == 1 {
        return Ok(true);
    }

    let dists = all_pairs_shortest_paths(&dual);

    let mut room_states: Vec<FxHashSet<VertexId>> = vec![FxHashSet::default(); dual.num_faces()];
    for room_id in 0..dual.num_faces() {
        let boundary: FxHashSet<VertexId> = dual.face(room_id).vertices().into_iter().collect();
        let survivors: FxHashSet<VertexId> = g
            .vertices()
            .filter(|v| !boundary.contains(v))
            .filter(|&v| {
                !short_walk(k, &dists, room_id, v, g.cutweight(v), dual.room_arcs(v))
            })
            .collect();
        if survivors.is_empty() {
            return Ok(true);
        }
        room_states[room_id] = survivors;
    }

    let mut edge_states = init_wall_states(g, &dual, k, &dists);

    loop {
        let (walls_pruned, rooms_to_delete) = prune_all_states(&mut edge_states, &room_states, &dual);
        stats.passes += 1;
        if walls_pruned {
            stats.walls_pruned += 1;
        }

        if edge_states
            .values()
            .any(|cs| cs.iter().all(|c| c.is_none()))
        {
            return Ok(true);
        }

        if rooms_to_delete.is_empty() && !walls_pruned {
            break;
        }

        let mut any_room_emptied = false;
        for (face_id, verts) in rooms_to_delete {
            stats.rooms_pruned += verts.len();
            let room = &mut room_states[face_id];
            for v in verts {
                room.remove(&v);
            }
            if room.is_empty() {
                any_room_emptied = true;
            }
        }
        if any_room_emptied {
            return Ok(true);
        }
    }

    Ok(false)
}
