//! Rendering of query results.
//!
//! This module provides exporters that write a [`Report`] either as plain
//! text, one package per line, or as JSON.

pub mod json;
pub mod text;

use crate::graph::{CycleInfo, DirectedGraph};
use serde::Serialize;
use std::io::{self, Write};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Plain text - one entry per line, easy to pipe
    #[default]
    Text,
    /// JSON format - machine-readable
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ExportFormat::Text),
            "json" => Ok(ExportFormat::Json),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: text, json",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Text => write!(f, "text"),
            ExportFormat::Json => write!(f, "json"),
        }
    }
}

/// One vertex of the graph dump with its direct dependents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Adjacency {
    /// Package name
    pub package: String,
    /// Packages that directly depend on `package`
    pub dependents: Vec<String>,
}

/// The result of one query, ready to be exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Report {
    /// Every known package
    Packages { packages: Vec<String> },
    /// Installation order for one package, or for all when `package` is `None`
    InstallOrder {
        #[serde(skip_serializing_if = "Option::is_none")]
        package: Option<String>,
        order: Vec<String>,
    },
    /// Packages left to install for `package` once `installed` is present
    ToInstall {
        package: String,
        installed: String,
        order: Vec<String>,
    },
    /// Package with the largest transitive dependency set
    MaxDependencies {
        package: Option<String>,
        dependencies: usize,
    },
    /// Every cycle in the graph
    Cycles { cycles: Vec<CycleInfo> },
    /// Adjacency dump of the graph
    Graph { vertices: Vec<Adjacency> },
}

impl Report {
    /// Builds a graph dump report, vertices sorted by name.
    pub fn graph(graph: &DirectedGraph) -> Self {
        let mut vertices: Vec<Adjacency> = graph
            .vertices()
            .map(|name| Adjacency {
                package: name.to_string(),
                dependents: graph
                    .successors_of(name)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            })
            .collect();
        vertices.sort_by(|a, b| a.package.cmp(&b.package));

        Report::Graph { vertices }
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the report to the given writer.
    fn export<W: Write>(&self, report: &Report, writer: &mut W) -> io::Result<()>;
}

/// Export a report in the specified format.
pub fn export<W: Write>(format: ExportFormat, report: &Report, writer: &mut W) -> io::Result<()> {
    match format {
        ExportFormat::Text => text::TextExporter.export(report, writer),
        ExportFormat::Json => json::JsonExporter.export(report, writer),
    }
}

/// Export a report to a string.
pub fn export_to_string(format: ExportFormat, report: &Report) -> io::Result<String> {
    let mut buffer = Vec::new();
    export(format, report, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
