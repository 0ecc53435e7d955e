//! pkgorder - package dependency graph with installation ordering
//!
//! This crate models named packages and their dependency relationships as a
//! directed graph and answers ordering questions over it: the install order
//! for one package, what remains to install given another is installed, a
//! global install order, and which package has the most dependencies.

pub mod export;
pub mod graph;
pub mod parser;
pub mod resolver;
