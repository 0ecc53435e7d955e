//! Parser module for package manifests.
//!
//! Turns a JSON manifest into the [`Package`](crate::resolver::Package)
//! records the resolver consumes. Parse failures are reported as
//! [`ParseError`] and never mixed into resolver errors.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use pkgorder::parser;
//! use pkgorder::resolver::DependencyResolver;
//!
//! let packages = parser::load(Path::new("packages.json")).unwrap();
//! let resolver = DependencyResolver::from_packages(packages);
//!
//! println!("{:?}", resolver.installation_order_for_all());
//! ```

pub mod manifest;
pub mod types;

// Re-export commonly used types for convenience
pub use manifest::{load, parse_file, parse_str, validate, ParseError, ParseResult};

pub use types::Manifest;
