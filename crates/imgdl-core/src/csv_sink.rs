//! URL listing export: `<name>_urls.csv` with an `image_url,extension` header.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::extract::ImageRecord;

pub const CSV_HEADER: &str = "image_url,extension";

/// Path of the listing for `name` inside `base_dir`.
pub fn csv_path(base_dir: &Path, name: &str) -> PathBuf {
    base_dir.join(format!("{}_urls.csv", name))
}

/// Writes the header and one row per record, in record order. Overwrites any existing file.
pub fn write_urls_csv(records: &[ImageRecord], base_dir: &Path, name: &str) -> Result<PathBuf> {
    let path = csv_path(base_dir, name);
    let file = File::create(&path).with_context(|| format!("create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    writeln!(out, "{}", CSV_HEADER)?;
    for record in records {
        writeln!(
            out,
            "{},{}",
            escape_field(&record.location),
            escape_field(&record.type_hint)
        )?;
    }
    out.flush()
        .with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}

/// RFC 4180 quoting: fields with `,`, `"`, or line breaks are quoted, quotes doubled.
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
