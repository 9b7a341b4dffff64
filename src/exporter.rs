use crate::extractor::JobRecord;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export: the batch is empty")]
    EmptyBatch,
    #[error("failed to serialize batch: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Render the batch as a pretty-printed (2-space indented) JSON array.
pub fn render(batch: &[JobRecord]) -> Result<String, ExportError> {
    if batch.is_empty() {
        return Err(ExportError::EmptyBatch);
    }
    Ok(serde_json::to_string_pretty(batch)?)
}

/// Serialize the batch to `path` as UTF-8 JSON. Refuses an empty batch so a
/// failed run never clobbers a previous export with `[]`.
pub fn export(batch: &[JobRecord], path: &Path) -> Result<(), ExportError> {
    let json = render(batch)?;
    fs::write(path, json).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Wrote {} records to {:?}", batch.len(), path);
    Ok(())
}
