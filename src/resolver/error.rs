//! Error types for dependency resolution queries.

use crate::graph::CycleInfo;

/// Errors returned by [`DependencyResolver`](super::DependencyResolver) queries.
///
/// Both kinds are terminal for the query that raised them; no partial
/// result is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// A referenced package is not part of the dependency graph.
    #[error("package not found: {0}")]
    PackageNotFound(String),

    /// A cycle blocks a well-defined installation order.
    #[error("cycle detected: {0}")]
    CycleDetected(CycleInfo),
}

/// Result type alias for resolver operations.
pub type Result<T> = std::result::Result<T, ResolveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let missing = ResolveError::PackageNotFound("ghost".to_string());
        assert_eq!(missing.to_string(), "package not found: ghost");

        let cycle = ResolveError::CycleDetected(CycleInfo {
            nodes: vec!["a".to_string(), "b".to_string()],
        });
        assert_eq!(cycle.to_string(), "cycle detected: a -> b -> a");
    }
}
