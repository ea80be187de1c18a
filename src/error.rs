//! Error taxonomy for the contraction-ordering core.
//!
//! Every variant corresponds to a row of the error-handling table: precondition
//! violations are not recoverable by the caller, `NoContractibleEdge` may be
//! retried with a different seed, and the remaining variants signal assertion
//! failures — implementation bugs, not runtime conditions.
use thiserror::Error;

/// Errors produced by the contraction-ordering core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The graph failed Euler's formula after face enumeration, or two faces
    /// shared an edge in a way inconsistent with a planar embedding.
    #[error("graph is not planar: {0}")]
    NonPlanarGraph(String),

    /// An edge was given a weight that is not strictly positive.
    #[error("edge ({0}, {1}) has non-positive weight {2}")]
    NonPositiveWeight(usize, usize, f64),

    /// `add_edge`/`contracted` referenced a vertex that does not exist.
    #[error("vertex {0} does not exist")]
    UnknownVertex(usize),

    /// `contracted` was asked to collapse an edge that is not present.
    #[error("no edge between {0} and {1} to contract")]
    NoSuchEdge(usize, usize),

    /// The edge-contraction driver exhausted every eligible edge without
    /// finding one whose contraction keeps the minor biconnected and under
    /// the target carving width.
    #[error("NoContractibleEdge: a contractible edge was not found")]
    NoContractibleEdge,

    /// An internal invariant was violated: face ordering, the carving-width
    /// search bracket, or the tree cut property. Always a bug, never a
    /// reachable runtime condition for well-formed input.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// The replay evaluator's cost did not match the cost the orchestrator
    /// reported, outside the `1e-13` relative tolerance.
    #[error("replay cost mismatch: expected {expected}, got {actual}")]
    ReplayMismatch { expected: f64, actual: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;
