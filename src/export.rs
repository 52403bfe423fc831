// ABOUTME: Export and persistence for the slidecraft application
// ABOUTME: Writes rendered documents and loads or saves decks as JSON

use crate::errors::{Result, SlideError};
use crate::model::Deck;
use crate::utils;
use log::info;
use std::fs;
use std::path::Path;

/// File name offered when a deck is exported, derived from the deck name.
pub fn suggested_filename(deck: &Deck) -> String {
    let mut slug = String::new();
    for c in deck.name.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "presentation.html".to_string()
    } else {
        format!("{}.html", slug)
    }
}

/// Write a rendered document, creating parent directories as needed.
pub fn write_document(html_content: &str, output_path: &Path) -> Result<()> {
    info!("Writing HTML to file: {:?}", output_path);
    utils::ensure_parent_directory_exists(output_path)?;
    fs::write(output_path, html_content)?;
    Ok(())
}

pub fn load_deck(path: &Path) -> Result<Deck> {
    utils::validate_file_exists(path)?;
    let json = fs::read_to_string(path)?;
    let deck: Deck = serde_json::from_str(&json)?;
    if deck.is_empty() {
        return Err(SlideError::ValidationError(format!(
            "Deck {:?} has no slides",
            path
        )));
    }
    info!("Loaded deck '{}' ({} slides) from {:?}", deck.name, deck.len(), path);
    Ok(deck)
}

pub fn save_deck(deck: &Deck, path: &Path) -> Result<()> {
    utils::ensure_parent_directory_exists(path)?;
    let json = serde_json::to_string_pretty(deck)?;
    fs::write(path, json)?;
    info!("Saved deck '{}' to {:?}", deck.name, path);
    Ok(())
}
