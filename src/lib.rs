//! Carving-width-driven contraction ordering for weighted planar graphs.
//!
//! Given a planar graph whose edge weights represent tensor bond
//! dimensions, this crate finds a sequence of pairwise vertex contractions
//! — a contraction order — that keeps the intermediate tensors small, by
//! computing the graph's carving width and following a carving of (close
//! to) that width.
//!
//! # Basic usage
//! ```
//! use ratcatcher::graph::WeightedGraph;
//! use ratcatcher::orchestrator::{run, RatcatcherConfig};
//!
//! let mut g = WeightedGraph::new();
//! g.add_edge(1, 2, 4.0).unwrap();
//! g.add_edge(2, 3, 4.0).unwrap();
//! g.add_edge(3, 1, 4.0).unwrap();
//! g.add_edge(1, 4, 4.0).unwrap();
//! g.add_edge(4, 3, 4.0).unwrap();
//!
//! let config = RatcatcherConfig::with_seed(0);
//! let result = run(&g, &config).expect("carving-width pipeline failed");
//! println!("carving width = {}", result.carving_width);
//! println!("total cost = {}", result.total_cost);
//! ```
//! [`WeightedGraph`]: crate::graph::WeightedGraph
pub mod carving_width;
pub mod constants;
pub mod contraction_tree;
pub mod contractor;
pub mod dual;
pub mod edge_contraction;
pub mod error;
pub mod face;
pub mod graph;
pub mod numeric;
pub mod orchestrator;
pub mod prelude;
#[cfg(test)]
mod properties;
pub mod ratcatcher;
pub mod shortest_paths;
pub mod statistics;
pub mod util;
