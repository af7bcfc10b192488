//! Reference graph analysis.
//!
//! This module provides:
//! - Cycle detection over the modules of a compile call
//! - The reference graph of a whole library (dependencies, dependents)
//! - The dependency-graph view rooted at one module

mod cycle;
mod reference_graph;

pub use cycle::{Adjacency, adjacency_of, check_for_cycles, detect_cycle};
pub use reference_graph::{DependencyGraph, GraphNode, ReferenceGraph};
