// ABOUTME: Error types for the slidecraft application
// ABOUTME: Crate-level errors for I/O and export, plus user-facing edit refusals

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlideError {
    #[error("Failed to read or write file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to fetch remote resource: {0}")]
    FetchError(#[from] reqwest::Error),

    #[error("Invalid deck file: {0}")]
    DeckFormatError(#[from] serde_json::Error),

    #[error("Unknown theme: {0}")]
    UnknownTheme(String),

    #[error("Input validation error: {0}")]
    ValidationError(String),

    #[error("Path not found: {0}")]
    PathNotFoundError(PathBuf),

    #[error("Watch error: {0}")]
    WatchError(String),
}

pub type Result<T> = std::result::Result<T, SlideError>;

/// An edit that was rejected because it would break a deck invariant.
///
/// Refusals leave the deck untouched and carry a message meant to be shown
/// to the person editing.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    #[error("A column needs at least one bullet point.")]
    LastBullet,

    #[error("A presentation needs at least one slide.")]
    LastSlide,
}
