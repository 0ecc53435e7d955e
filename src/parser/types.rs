//! Shared types for manifest parsing.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::resolver::Package;

/// Represents the structure of a package manifest file.
///
/// ```json
/// {
///   "packages": [
///     { "name": "A", "dependencies": ["B", "C"] },
///     { "name": "B", "dependencies": [] }
///   ]
/// }
/// ```
///
/// Unknown fields are ignored and a missing `dependencies` array reads as
/// an empty one.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Manifest {
    /// Package declarations in file order.
    #[serde(default)]
    pub packages: Vec<Package>,
}

impl Manifest {
    /// Returns true if the manifest declares no packages.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Returns the number of declared packages.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Returns the total number of declared dependency entries.
    pub fn dependency_count(&self) -> usize {
        self.packages.iter().map(|p| p.dependencies.len()).sum()
    }

    /// Returns names referenced as dependencies but never declared.
    pub fn undeclared_dependencies(&self) -> Vec<&str> {
        let declared: HashSet<&str> = self.packages.iter().map(|p| p.name.as_str()).collect();
        let mut seen = HashSet::new();

        self.packages
            .iter()
            .flat_map(|p| p.dependencies.iter())
            .map(String::as_str)
            .filter(|name| !declared.contains(name) && seen.insert(*name))
            .collect()
    }

    /// Consumes the manifest, returning its packages.
    pub fn into_packages(self) -> Vec<Package> {
        self.packages
    }
}
