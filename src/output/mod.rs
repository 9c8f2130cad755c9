//! Output module: JSONL export of the normalized research table
//!
//! One JSON object per line, lines in identifier order, UTF-8 with
//! non-ASCII characters preserved literally. The file is written only
//! after the whole pipeline has completed, so an interrupted run leaves
//! no partial output behind.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::records::TechRecord;
use crate::{Result, TrawlError};

/// Writes the normalized records to `path`, one JSON object per line,
/// sorted by identifier.
pub fn write_jsonl(records_by_id: &BTreeMap<String, TechRecord>, path: &Path) -> Result<()> {
    if path.is_dir() {
        return Err(TrawlError::OutputPathIsDirectory(path.to_path_buf()));
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    for record in records_by_id.values() {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }

    writer.flush()?;
    Ok(())
}
