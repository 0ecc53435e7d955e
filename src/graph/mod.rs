//! Graph module for package relationship modeling.
//!
//! This module provides the [`DirectedGraph`] struct, a directed and
//! unweighted graph keyed by vertex name, plus cycle reporting through
//! [`CycleInfo`].
//!
//! # Example
//!
//! ```rust
//! use pkgorder::graph::DirectedGraph;
//!
//! let mut graph = DirectedGraph::new();
//! graph.add_vertex("react");
//! graph.add_vertex("react-dom");
//! graph.add_edge("react", "react-dom");
//!
//! assert_eq!(graph.order(), 2);
//! assert_eq!(graph.size(), 1);
//! ```

mod directed_graph;

pub use directed_graph::{CycleInfo, DirectedGraph};
