//! Plain text export implementation.

use super::{Exporter, Report};
use std::io::{self, Write};

/// Plain text exporter implementation.
pub struct TextExporter;

impl Exporter for TextExporter {
    fn export<W: Write>(&self, report: &Report, writer: &mut W) -> io::Result<()> {
        match report {
            Report::Packages { packages } => write_lines(writer, packages),
            Report::InstallOrder { order, .. } => write_lines(writer, order),
            Report::ToInstall { order, .. } => write_lines(writer, order),
            Report::MaxDependencies {
                package: Some(package),
                dependencies,
            } => writeln!(writer, "{} ({} dependencies)", package, dependencies),
            Report::MaxDependencies { package: None, .. } => writeln!(writer, "(no packages)"),
            Report::Cycles { cycles } if cycles.is_empty() => writeln!(writer, "no cycles found"),
            Report::Cycles { cycles } => {
                for cycle in cycles {
                    writeln!(writer, "{}", cycle.cycle_path())?;
                }
                Ok(())
            }
            Report::Graph { vertices } => {
                for vertex in vertices {
                    if vertex.dependents.is_empty() {
                        writeln!(writer, "{} -> (none)", vertex.package)?;
                    } else {
                        writeln!(writer, "{} -> {}", vertex.package, vertex.dependents.join(", "))?;
                    }
                }
                Ok(())
            }
        }
    }
}

fn write_lines<W: Write>(writer: &mut W, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(writer, "{}", line)?;
    }
    Ok(())
}
