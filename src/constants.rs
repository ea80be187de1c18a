/// Edge weight type.
pub type Weight = f64;
/// Vertex identifier. Graphs are over plain integer vertex ids, not an opaque
/// index type — callers (graph I/O, sample generators) own id assignment.
pub type VertexId = usize;

/// Tolerance used when the edge-contraction driver probes the oracle just
/// above a known carving width `k` (spec: "zero_epsilon").
pub const ZERO_EPSILON: Weight = 1.0e-11;

/// Relative tolerance for the replay-cost confirmation the orchestrator runs
/// before returning a contraction sequence.
pub const REPLAY_TOLERANCE: Weight = 1.0e-13;
