//! Parser for JSON package manifests.
//!
//! This module reads manifest files into [`Manifest`] values and validates
//! them before their packages are handed to the resolver.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::debug;

use super::types::Manifest;
use crate::resolver::Package;

/// Errors that can occur while loading a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to read the file from disk.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse JSON content.
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The manifest is well-formed JSON but its content is unusable.
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),
}

/// Result type alias for parser operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a manifest file from a file path.
///
/// # Example
///
/// ```ignore
/// use std::path::Path;
/// use pkgorder::parser::parse_file;
///
/// let manifest = parse_file(Path::new("packages.json")).unwrap();
/// println!("{} packages", manifest.len());
/// ```
pub fn parse_file(path: &Path) -> ParseResult<Manifest> {
    let content = fs::read_to_string(path)?;
    parse_str(&content)
}

/// Parses a manifest from a string.
///
/// # Example
///
/// ```
/// use pkgorder::parser::parse_str;
///
/// let json = r#"{"packages": [{"name": "A", "dependencies": ["B"]}]}"#;
/// let manifest = parse_str(json).unwrap();
/// assert_eq!(manifest.packages[0].name, "A");
/// ```
pub fn parse_str(content: &str) -> ParseResult<Manifest> {
    let manifest: Manifest = serde_json::from_str(content)?;
    Ok(manifest)
}

/// Validates a parsed manifest.
///
/// Rejects empty package names, empty dependency names and packages
/// declared more than once.
pub fn validate(manifest: &Manifest) -> ParseResult<()> {
    let mut declared = HashSet::new();

    for (index, package) in manifest.packages.iter().enumerate() {
        if package.name.is_empty() {
            return Err(ParseError::InvalidManifest(format!(
                "package #{} has an empty name",
                index + 1
            )));
        }
        if !declared.insert(package.name.as_str()) {
            return Err(ParseError::InvalidManifest(format!(
                "package '{}' is declared more than once",
                package.name
            )));
        }
        if package.dependencies.iter().any(String::is_empty) {
            return Err(ParseError::InvalidManifest(format!(
                "package '{}' lists an empty dependency name",
                package.name
            )));
        }
    }

    Ok(())
}

/// Reads, parses and validates a manifest, returning its packages.
pub fn load(path: &Path) -> ParseResult<Vec<Package>> {
    let manifest = parse_file(path)?;
    validate(&manifest)?;

    debug!(
        path = %path.display(),
        packages = manifest.len(),
        dependencies = manifest.dependency_count(),
        "manifest loaded"
    );
    Ok(manifest.into_packages())
}
