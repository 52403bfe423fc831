// ABOUTME: Utility functions for the slidecraft application
// ABOUTME: Path validation and directory helpers shared by export and watch

use crate::errors::{Result, SlideError};
use std::path::{Path, PathBuf};

/// Validate that a file exists
pub fn validate_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(SlideError::PathNotFoundError(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(SlideError::ValidationError(format!(
            "Path is not a file: {:?}",
            path
        )));
    }
    Ok(())
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    } else if !path.is_dir() {
        return Err(SlideError::ValidationError(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    }
    Ok(())
}

/// Ensure a file's parent directory exists
pub fn ensure_parent_directory_exists(file_path: &Path) -> Result<()> {
    match file_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_directory_exists(parent),
        _ => Ok(()),
    }
}

pub fn get_absolute_path(path: &Path) -> Result<PathBuf> {
    std::fs::canonicalize(path).map_err(|e| {
        SlideError::ValidationError(format!("Failed to get absolute path for {:?}: {}", path, e))
    })
}
