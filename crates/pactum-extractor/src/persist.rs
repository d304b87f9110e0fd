//! JSON and CSV serialization of extraction results
//!
//! The CSV form is transposed: one `field,value` row per field, no header.
//! Null becomes an empty cell; compound values are written as compact JSON.

use crate::error::PersistError;
use pactum_domain::ExtractionResult;
use std::path::Path;
use tracing::info;

/// Pretty-printed JSON, two-space indent, in result order
pub fn to_pretty_json(result: &ExtractionResult) -> Result<String, PersistError> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Transposed CSV text
pub fn to_csv_string(result: &ExtractionResult) -> Result<String, PersistError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    for (field, value) in result {
        writer.write_record([field.as_str(), value.to_string().as_str()])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| PersistError::Csv(csv::Error::from(e.into_error())))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Write the JSON form to `path`, replacing any existing file
pub fn write_json(result: &ExtractionResult, path: &Path) -> Result<(), PersistError> {
    let json = to_pretty_json(result)?;
    write_file(path, json.as_bytes())?;
    info!("JSON output saved to {}", path.display());
    Ok(())
}

/// Write the CSV form to `path`, replacing any existing file
pub fn write_csv(result: &ExtractionResult, path: &Path) -> Result<(), PersistError> {
    let csv = to_csv_string(result)?;
    write_file(path, csv.as_bytes())?;
    info!("Transposed CSV output saved to {}", path.display());
    Ok(())
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), PersistError> {
    std::fs::write(path, contents).map_err(|source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    })
}
