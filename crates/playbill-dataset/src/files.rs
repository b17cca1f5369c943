//! Directory listing and copying.
//!
//! All listings are sorted by path so every stage processes works and scenes
//! in a stable order.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::errors::{DatasetError, Result};

/// Every regular file under `dir` (recursively) whose name ends with
/// `extension`, sorted.
pub fn collect_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && has_extension(entry.path(), extension) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Regular files directly inside `dir` whose name ends with `extension`,
/// sorted.
pub fn list_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if entry.file_type().is_file() && has_extension(entry.path(), extension) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Subdirectories directly inside `dir`, sorted.
pub fn list_subdirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Recursively copy `src` into `dst`, creating directories as needed and
/// overwriting files that already exist.
pub fn copy_dir_all(src: &Path, dst: &Path) -> Result<usize> {
    let mut copied = 0;
    for entry in WalkDir::new(src) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|_| DatasetError::InvalidPath(entry.path().to_path_buf()))?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).map_err(|e| DatasetError::io(&target, e))?;
        } else if entry.file_type().is_file() {
            let _ = std::fs::copy(entry.path(), &target)
                .map_err(|e| DatasetError::io(&target, e))?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Remove `dir` with everything under it, then recreate it empty.
///
/// A missing `dir` is not an error.
pub fn reset_dir(dir: &Path) -> Result<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(DatasetError::io(dir, e)),
    }
    std::fs::create_dir_all(dir).map_err(|e| DatasetError::io(dir, e))
}

/// Final path component as UTF-8 (a work's title is its directory name).
pub fn path_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| DatasetError::InvalidPath(path.to_path_buf()))
}

/// File name without its final extension.
pub fn path_stem(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| DatasetError::InvalidPath(path.to_path_buf()))
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| name.ends_with(extension))
}
