//! JSON Lines reading and writing.
//!
//! Scene files hold one compact JSON object per line. Blank lines are
//! tolerated on read; every written line ends with `\n`.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::errors::{DatasetError, Result};

/// Read every record of a JSON Lines file, in file order.
pub fn read_json_lines<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).map_err(|e| DatasetError::io(path, e))?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| DatasetError::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|source| DatasetError::Json {
            path: path.to_path_buf(),
            line: index + 1,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Write records as JSON Lines, replacing the file.
///
/// Missing parent directories are created.
pub fn write_json_lines<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| DatasetError::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| DatasetError::io(path, e))?;
    let mut writer = BufWriter::new(file);

    for (index, record) in records.iter().enumerate() {
        serde_json::to_writer(&mut writer, record).map_err(|source| DatasetError::Json {
            path: path.to_path_buf(),
            line: index + 1,
            source,
        })?;
        writer
            .write_all(b"\n")
            .map_err(|e| DatasetError::io(path, e))?;
    }
    writer.flush().map_err(|e| DatasetError::io(path, e))
}
