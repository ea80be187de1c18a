//! Binary search for the carving width of a weighted planar graph, built on
//! top of the `ratcatcher` oracle (`ratcatcher(g, k)` tests "carving width of
//! `g` is strictly less than `k`").
use crate::constants::Weight;
use crate::error::Result;
use crate::graph::WeightedGraph;
use crate::ratcatcher::ratcatcher;

/// Finds `(low, high)` such that the carving width of `g` lies in
/// `(low, high]`, seeding `low` at the max cutweight (a hard lower bound)
/// and doubling `high` until the oracle accepts it. Takes O(log cw) oracle
/// calls.
pub fn carving_width_bounds(g: &WeightedGraph) -> Result<(Weight, Weight)> {
    let low0 = g.max_cutweight();
    if ratcatcher(g, low0)? {
        return Ok((low0, low0));
    }

    let mut high = 2.0;
    while high <= low0 {
        high *= 2.0;
    }
    let mut low = low0;
    while !ratcatcher(g, high)? {
        low = high;
        high *= 2.0;
    }
    Ok((low, high))
}

/// `low < high` have converged to the same carving width in log2 space iff
/// `round(2^low) == round(2^high)`; returns that shared value's log2 when
/// they have.
fn carving_width_found(low: Weight, high: Weight) -> Option<Weight> {
    let upper = 2f64.powf(high).round();
    let lower = 2f64.powf(low).round();
    if (upper - lower).abs() < f64::EPSILON {
        Some(upper.log2())
    } else {
        None
    }
}

/// Binary search for the carving width of a graph whose weights have
/// already been rescaled into log2 space (see `carving_width` below).
/// Narrows `(low, high]` until `round(2^low) == round(2^high)`, then returns
/// that value's log2 — the carving width back in the original weight
/// domain.
pub fn log_binary_search(g: &WeightedGraph, mut low: Weight, mut high: Weight) -> Result<Weight> {
    loop {
        if let Some(k) = carving_width_found(low, high) {
            return Ok(k);
        }

        let mut mid = (low + high) / 2.0;
        if mid == low || mid == high {
            mid = high;
            low = high;
        }

        if ratcatcher(g, mid)? {
            high = mid;
        } else {
            low = mid;
        }
    }
}

/// Binary search for the exact integer carving width of `g`, without log
/// rescaling. `low`/`high` must bracket it, i.e. `ratcatcher(g, low)` false
/// and `ratcatcher(g, high)` true (see `carving_width_bounds`).
pub fn integer_binary_search(g: &WeightedGraph, mut low: u64, mut high: u64) -> Result<u64> {
    while high - low > 1 {
        let mid = (low + high) / 2;
        if ratcatcher(g, mid as Weight)? {
            high = mid;
        } else {
            low = mid;
        }
    }
    Ok(high - 1)
}

/// Computes the carving width of `g` via the log-domain search path: `g` is
/// rescaled by `log2` and the search runs over the rescaled graph, returning
/// a value already converted back to the original weight domain.
///
/// Requires every edge weight to be strictly greater than 1 (so its log2 is
/// strictly positive) — the natural case for tensor bond dimensions, which
/// this search path is built for. Plain unit-weight graphs (ordinary graph
/// carving width) should use `integer_binary_search` directly instead, or
/// call `ratcatcher` itself.
pub fn carving_width(g: &WeightedGraph) -> Result<Weight> {
    let g_log = g.apply_weights(crate::numeric::log2);
    let (low, high) = carving_width_bounds(&g_log)?;
    log_binary_search(&g_log, low, high)
}
