//! Installation ordering over a package dependency graph.
//!
//! The resolver owns a [`DirectedGraph`] in which every edge points from a
//! dependency to its dependent (`dependency -> package`): the source of an
//! edge must be installed before its target.

use std::collections::{HashMap, HashSet, VecDeque};
use std::vec;

use tracing::{debug, trace, warn};

use super::error::{ResolveError, Result};
use super::package::Package;
use crate::graph::{CycleInfo, DirectedGraph};

/// Resolves installation orders for a set of packages.
///
/// Populate it with [`build`](Self::build), then query it any number of
/// times. Queries never mutate the resolver; per-query bookkeeping such as
/// visited sets and remaining dependency counts lives on the stack of the
/// query.
///
/// # Example
///
/// ```rust
/// use pkgorder::resolver::{DependencyResolver, Package};
///
/// let resolver = DependencyResolver::from_packages(vec![
///     Package::new("app", ["http", "json"]),
///     Package::new("http", ["tls"]),
///     Package::leaf("json"),
/// ]);
///
/// let order = resolver.installation_order("app").unwrap();
/// assert_eq!(order, vec!["tls", "http", "json", "app"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DependencyResolver {
    /// Edges point from a dependency to its dependent
    graph: DirectedGraph,
    /// Package names in build order: declared packages first, then those
    /// only ever seen as somebody's dependency
    packages: Vec<String>,
    /// Position of each package in `packages`
    positions: HashMap<String, usize>,
    /// Number of distinct direct dependencies declared per package
    dependency_counts: HashMap<String, usize>,
}

/// One level of the reverse traversal in [`DependencyResolver::installation_order`].
struct Frame<'a> {
    name: &'a str,
    pending: vec::IntoIter<&'a str>,
}

impl DependencyResolver {
    /// Creates an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver and builds it from `packages`.
    pub fn from_packages<I>(packages: I) -> Self
    where
        I: IntoIterator<Item = Package>,
    {
        let mut resolver = Self::new();
        resolver.build(packages);
        resolver
    }

    /// Adds every package and its dependency edges to the graph.
    ///
    /// For each package `p` with dependency `d` the edge `d -> p` is added.
    /// Names that only appear as dependencies become zero-dependency
    /// packages, registered after all declared packages in order of first
    /// appearance. Calling `build` again merges the new declarations into the
    /// existing graph. Empty names are skipped.
    pub fn build<I>(&mut self, packages: I)
    where
        I: IntoIterator<Item = Package>,
    {
        let mut discovered: Vec<String> = Vec::new();
        let mut declared = 0usize;

        for package in packages {
            if package.name.is_empty() {
                warn!("skipping package with an empty name");
                continue;
            }

            self.register(&package.name);
            self.graph.add_vertex(&package.name);

            for dependency in &package.dependencies {
                if dependency.is_empty() {
                    warn!(package = %package.name, "skipping empty dependency name");
                    continue;
                }
                self.graph.add_edge(dependency, &package.name);
                discovered.push(dependency.clone());
            }

            let count = self.graph.predecessors_of(&package.name).len();
            self.dependency_counts.insert(package.name, count);
            declared += 1;
        }

        for name in discovered {
            if !self.positions.contains_key(&name) {
                trace!(package = %name, "registering undeclared dependency");
                self.register(&name);
                self.dependency_counts.insert(name, 0);
            }
        }

        debug!(
            declared,
            packages = self.packages.len(),
            edges = self.graph.size(),
            "dependency graph built"
        );
    }

    /// Returns the names of all known packages.
    pub fn all_packages(&self) -> HashSet<&str> {
        self.graph.all_vertices()
    }

    /// Returns all package names in build order.
    pub fn packages(&self) -> &[String] {
        &self.packages
    }

    /// Returns the underlying graph.
    pub fn graph(&self) -> &DirectedGraph {
        &self.graph
    }

    /// Returns true if `name` is a known package.
    pub fn contains(&self, name: &str) -> bool {
        self.graph.contains(name)
    }

    /// Returns the number of known packages.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Returns true if no package is known.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Returns the number of direct dependencies `name` declared at build time.
    pub fn dependency_count(&self, name: &str) -> Option<usize> {
        self.dependency_counts.get(name).copied()
    }

    /// Returns true if following dependents from `name` leads back to `name`.
    pub fn cycle_exists_at(&self, name: &str) -> bool {
        self.graph.cycle_exists_at(name)
    }

    /// Returns every cycle in the dependency graph.
    pub fn cycles(&self) -> Vec<CycleInfo> {
        self.graph.cycles()
    }

    /// Returns `pkg` and all of its transitive dependencies in a valid
    /// installation order.
    ///
    /// Every dependency appears exactly once and before every package that
    /// needs it; `pkg` is always last.
    ///
    /// # Errors
    ///
    /// * [`ResolveError::PackageNotFound`] if `pkg` is unknown.
    /// * [`ResolveError::CycleDetected`] if a cycle is reachable from `pkg`
    ///   or one of its transitive dependencies sits on a cycle.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pkgorder::resolver::{DependencyResolver, Package, ResolveError};
    ///
    /// let resolver = DependencyResolver::from_packages(vec![
    ///     Package::new("a", ["b"]),
    ///     Package::new("b", ["a"]),
    ///     Package::leaf("c"),
    /// ]);
    ///
    /// assert!(matches!(
    ///     resolver.installation_order("a"),
    ///     Err(ResolveError::CycleDetected(_))
    /// ));
    /// assert_eq!(resolver.installation_order("c").unwrap(), vec!["c"]);
    /// ```
    pub fn installation_order(&self, pkg: &str) -> Result<Vec<String>> {
        if !self.graph.contains(pkg) {
            return Err(ResolveError::PackageNotFound(pkg.to_string()));
        }
        if let Some(cycle) = self.graph.cycle_at(pkg) {
            return Err(ResolveError::CycleDetected(cycle));
        }

        let order = self.reverse_post_order(pkg)?;
        debug!(package = pkg, len = order.len(), "installation order resolved");
        Ok(order)
    }

    /// Returns the packages still needed for `new_pkg` when `installed_pkg`
    /// and all of its dependencies are already installed.
    ///
    /// The result keeps the relative order of `installation_order(new_pkg)`.
    ///
    /// # Errors
    ///
    /// * [`ResolveError::PackageNotFound`] if either package is unknown.
    /// * [`ResolveError::CycleDetected`] if either installation order is
    ///   blocked by a cycle.
    pub fn to_install(&self, new_pkg: &str, installed_pkg: &str) -> Result<Vec<String>> {
        for name in [new_pkg, installed_pkg] {
            if !self.graph.contains(name) {
                return Err(ResolveError::PackageNotFound(name.to_string()));
            }
        }
        for name in [new_pkg, installed_pkg] {
            if let Some(cycle) = self.graph.cycle_at(name) {
                return Err(ResolveError::CycleDetected(cycle));
            }
        }

        let installed = self.installation_order(installed_pkg)?;
        let needed = self.installation_order(new_pkg)?;

        let installed: HashSet<&str> = installed.iter().map(String::as_str).collect();
        let remaining: Vec<String> = needed
            .into_iter()
            .filter(|name| !installed.contains(name.as_str()))
            .collect();

        debug!(
            new = new_pkg,
            installed = installed_pkg,
            remaining = remaining.len(),
            "computed packages left to install"
        );
        Ok(remaining)
    }

    /// Returns a valid installation order covering every package.
    ///
    /// Kahn's algorithm: packages whose declared dependency count is zero
    /// seed a FIFO queue in build order; each dequeued package releases its
    /// dependents, which are enqueued once all their dependencies are out.
    ///
    /// # Errors
    ///
    /// [`ResolveError::CycleDetected`] if any package is on a cycle.
    pub fn installation_order_for_all(&self) -> Result<Vec<String>> {
        if let Some(cycle) = self.first_cycle() {
            return Err(ResolveError::CycleDetected(cycle));
        }

        let mut remaining: HashMap<&str, usize> = self
            .packages
            .iter()
            .map(|name| {
                let count = self.dependency_counts.get(name).copied().unwrap_or(0);
                (name.as_str(), count)
            })
            .collect();

        let mut queue: VecDeque<&str> = self
            .packages
            .iter()
            .map(String::as_str)
            .filter(|name| remaining.get(name) == Some(&0))
            .collect();

        let mut order = Vec::with_capacity(self.packages.len());
        while let Some(name) = queue.pop_front() {
            order.push(name.to_string());

            for dependent in self.graph.successors_of(name) {
                if let Some(count) = remaining.get_mut(dependent) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        queue.push_back(dependent);
                    }
                }
            }
        }

        debug!(len = order.len(), "global installation order resolved");
        Ok(order)
    }

    /// Returns the number of distinct packages `pkg` needs before it can be
    /// installed.
    pub fn transitive_dependency_count(&self, pkg: &str) -> Result<usize> {
        Ok(self.installation_order(pkg)?.len().saturating_sub(1))
    }

    /// Returns the package with the largest transitive dependency set.
    ///
    /// Ties go to the package that comes first in build order. Returns
    /// `Ok(None)` when the resolver is empty.
    ///
    /// # Errors
    ///
    /// [`ResolveError::CycleDetected`] if any package is on a cycle.
    pub fn package_with_max_dependencies(&self) -> Result<Option<String>> {
        if let Some(cycle) = self.first_cycle() {
            return Err(ResolveError::CycleDetected(cycle));
        }

        let mut best: Option<(&str, usize)> = None;
        for name in &self.packages {
            let count = self.transitive_dependency_count(name)?;
            trace!(package = %name, count, "transitive dependency count");
            if best.map_or(true, |(_, max)| count > max) {
                best = Some((name.as_str(), count));
            }
        }

        Ok(best.map(|(name, _)| name.to_string()))
    }

    fn register(&mut self, name: &str) {
        if self.positions.contains_key(name) {
            return;
        }
        self.positions.insert(name.to_string(), self.packages.len());
        self.packages.push(name.to_string());
    }

    fn position(&self, name: &str) -> usize {
        self.positions.get(name).copied().unwrap_or(usize::MAX)
    }

    /// Direct dependencies of `name`, in build order.
    fn ordered_dependencies(&self, name: &str) -> Vec<&str> {
        let mut dependencies = self.graph.predecessors_of(name);
        dependencies.sort_by_key(|dep| self.position(dep));
        dependencies
    }

    /// First cycle found when checking every package in build order.
    fn first_cycle(&self) -> Option<CycleInfo> {
        if !self.graph.is_cyclic() {
            return None;
        }
        self.packages
            .iter()
            .find_map(|name| self.graph.cycle_at(name))
            .or_else(|| self.graph.cycles().into_iter().next())
    }

    /// Walks dependencies of `pkg` depth-first with an explicit stack and
    /// emits each package once all of its own dependencies are emitted.
    fn reverse_post_order<'a>(&'a self, pkg: &'a str) -> Result<Vec<String>> {
        let mut order: Vec<String> = Vec::new();
        let mut emitted: HashSet<&str> = HashSet::new();
        let mut on_path: HashSet<&str> = HashSet::from([pkg]);
        let mut stack = vec![Frame {
            name: pkg,
            pending: self.ordered_dependencies(pkg).into_iter(),
        }];

        while let Some(frame) = stack.last_mut() {
            match frame.pending.next() {
                Some(dependency) => {
                    if emitted.contains(dependency) {
                        continue;
                    }
                    if on_path.contains(dependency) {
                        return Err(ResolveError::CycleDetected(Self::cycle_on_path(
                            &stack, dependency,
                        )));
                    }
                    trace!(package = dependency, "visiting dependency");
                    on_path.insert(dependency);
                    stack.push(Frame {
                        name: dependency,
                        pending: self.ordered_dependencies(dependency).into_iter(),
                    });
                }
                None => {
                    let name = frame.name;
                    stack.pop();
                    on_path.remove(name);
                    emitted.insert(name);
                    order.push(name.to_string());
                }
            }
        }

        Ok(order)
    }

    /// Rebuilds the cycle closed by reaching `repeated` again while it is
    /// still on the traversal path.
    ///
    /// The path runs from dependents down to dependencies, so the cycle in
    /// edge direction is `repeated` followed by the rest of the path reversed.
    fn cycle_on_path(stack: &[Frame<'_>], repeated: &str) -> CycleInfo {
        let start = stack
            .iter()
            .position(|frame| frame.name == repeated)
            .unwrap_or(0);

        let mut nodes = vec![repeated.to_string()];
        nodes.extend(
            stack[start + 1..]
                .iter()
                .rev()
                .map(|frame| frame.name.to_string()),
        );
        CycleInfo { nodes }
    }
}
