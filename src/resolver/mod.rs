//! Dependency resolution on top of [`DirectedGraph`](crate::graph::DirectedGraph).
//!
//! [`DependencyResolver`] builds a graph from [`Package`] declarations and
//! answers installation-order questions: the order for one package, what is
//! left to install given another package is installed, a global order for
//! everything, and which package has the most transitive dependencies.
//!
//! # Example
//!
//! ```rust
//! use pkgorder::resolver::{DependencyResolver, Package};
//!
//! let resolver = DependencyResolver::from_packages(vec![
//!     Package::new("A", ["B", "C"]),
//!     Package::new("C", ["D"]),
//! ]);
//!
//! assert_eq!(resolver.to_install("A", "C").unwrap(), vec!["B", "A"]);
//! assert_eq!(resolver.package_with_max_dependencies().unwrap(), Some("A".to_string()));
//! ```

mod dependency_resolver;
mod error;
mod package;

pub use dependency_resolver::DependencyResolver;
pub use error::{ResolveError, Result};
pub use package::Package;
