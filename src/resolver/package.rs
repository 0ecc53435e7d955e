//! The package record consumed by the resolver.

use serde::{Deserialize, Serialize};

/// A package declaration: a name plus the names it directly depends on.
///
/// This is the input contract of [`DependencyResolver::build`](super::DependencyResolver::build);
/// where the records come from (a manifest file, a literal) does not matter.
///
/// # Example
///
/// ```rust
/// use pkgorder::resolver::Package;
///
/// let pkg = Package::new("curl", ["openssl", "zlib"]);
/// assert_eq!(pkg.name, "curl");
/// assert_eq!(pkg.dependencies.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Package name
    pub name: String,
    /// Names of the packages this one requires, in declaration order
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl Package {
    /// Creates a new package declaration.
    pub fn new<I, S>(name: impl Into<String>, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            dependencies: dependencies.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a package with no dependencies.
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dependencies: Vec::new(),
        }
    }

    /// Returns true if the package declares any dependency.
    pub fn has_dependencies(&self) -> bool {
        !self.dependencies.is_empty()
    }
}
