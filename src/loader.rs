use crate::record::RequestRecord;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading a request log file
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read request log '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse request log '{path}' as a JSON array: {source}")]
    ParseArray {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to parse record at {path}:{line}: {source}")]
    ParseLine {
        path: String,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Load request records from a file holding either a JSON array of
/// records or one JSON record per line. Blank lines are skipped.
pub fn load_records(path: &Path) -> Result<Vec<RequestRecord>, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.display().to_string(),
        source,
    })?;

    if content.trim_start().starts_with('[') {
        return serde_json::from_str(&content).map_err(|source| LoadError::ParseArray {
            path: path.display().to_string(),
            source,
        });
    }

    let mut records = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(line).map_err(|source| LoadError::ParseLine {
            path: path.display().to_string(),
            line: index + 1,
            source,
        })?;
        records.push(record);
    }

    Ok(records)
}
