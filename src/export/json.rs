//! JSON export implementation.
//!
//! Writes a [`Report`] as pretty-printed JSON tagged with its `kind`.

use super::{Exporter, Report};
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, report: &Report, writer: &mut W) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *writer, report)?;
        writeln!(writer)?;
        Ok(())
    }
}
