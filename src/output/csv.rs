//! CSV exporter

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{InventoryError, Result};
use crate::inventory::ResourceRecord;

/// Fixed column order of the export
pub const HEADER: &[&str] = &[
    "name",
    "resourceGroup",
    "type",
    "subscriptionId",
    "created_at",
];

/// Write records to `path`, replacing any existing file
///
/// Parent directories are created as needed. Returns the path written.
pub fn write_csv(records: &[ResourceRecord], path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref().to_path_buf();
    let io_err = |source: io::Error| InventoryError::Io {
        path: path.clone(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let file = File::create(&path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    write_records(&mut writer, records).map_err(io_err)?;
    writer.flush().map_err(io_err)?;

    log::debug!("Wrote {} records to {}", records.len(), path.display());
    Ok(path)
}

/// Serialize header and records to any writer
fn write_records<W: Write>(writer: &mut W, records: &[ResourceRecord]) -> io::Result<()> {
    writeln!(writer, "{}", HEADER.join(","))?;

    for r in records {
        writeln!(
            writer,
            "{},{},{},{},{}",
            escape_csv(&r.name),
            escape_csv(&r.resource_group),
            escape_csv(&r.resource_type),
            escape_csv(&r.subscription_id),
            escape_csv(&r.created_at_rfc3339())
        )?;
    }
    Ok(())
}

/// Escape a value for CSV output
fn escape_csv(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
