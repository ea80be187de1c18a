//! Re-exports of the most commonly used items in `ratcatcher`.
pub use crate::carving_width::{
    carving_width, carving_width_bounds, integer_binary_search, log_binary_search,
};
pub use crate::contraction_tree::{Bag, ContractionTree};
pub use crate::contractor::replay;
pub use crate::dual::{DualEdgeId, FaceId, PlanarDual};
pub use crate::edge_contraction::{edge_contraction, DriverConfig};
pub use crate::error::{Error, Result};
pub use crate::face::{enumerate_faces, Face};
pub use crate::graph::{ContractionMode, WeightedGraph};
pub use crate::orchestrator::{run, OrchestratorResult, RatcatcherConfig};
pub use crate::ratcatcher::{ratcatcher, ratcatcher_with_stats};
pub use crate::shortest_paths::all_pairs_shortest_paths;
pub use crate::util::test_graphs::{petersen_like_g1, sandwich_g2};
