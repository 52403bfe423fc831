// ABOUTME: Editing session for the slidecraft application
// ABOUTME: Owns the live deck and the current slide selection for one theme choice

use crate::edit::{Column, FieldPath};
use crate::errors::{Refusal, Result, SlideError};
use crate::model::{Deck, Slide, SlideKind};
use crate::themes::ThemeCatalog;
use log::info;
use uuid::Uuid;

/// State of one editing session.
///
/// A session is created when a theme is selected and is replaced wholesale
/// when another theme is selected. Nothing in it outlives the process.
#[derive(Debug, Clone)]
pub struct EditorSession {
    id: Uuid,
    theme_id: String,
    deck: Deck,
    current_slide: usize,
}

impl EditorSession {
    /// Start a session from a theme's default deck.
    pub fn start(catalog: &ThemeCatalog, theme_id: &str) -> Result<Self> {
        let theme = catalog
            .get(theme_id)
            .ok_or_else(|| SlideError::UnknownTheme(theme_id.to_string()))?;
        let session = Self::with_deck(theme_id, theme.default_deck.clone());
        info!(
            "Started session {} with theme '{}' ({} slides)",
            session.id,
            theme_id,
            session.deck.len()
        );
        Ok(session)
    }

    /// Start a session over an existing deck, e.g. one loaded from disk.
    pub fn with_deck(theme_id: &str, deck: Deck) -> Self {
        Self {
            id: Uuid::new_v4(),
            theme_id: theme_id.to_string(),
            deck,
            current_slide: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn theme_id(&self) -> &str {
        &self.theme_id
    }

    /// The live deck. All changes go through the session's edit methods.
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn current_slide(&self) -> usize {
        self.current_slide
    }

    pub fn current(&self) -> Option<&Slide> {
        self.deck.slides.get(self.current_slide)
    }

    /// Move the selection, clamped to the deck.
    pub fn select_slide(&mut self, index: usize) -> usize {
        self.current_slide = index.min(self.deck.len().saturating_sub(1));
        self.current_slide
    }

    /// Append a default slide of `kind` and select it.
    pub fn add_slide(&mut self, kind: SlideKind) -> usize {
        self.deck.slides.push(Slide::default_for(kind));
        self.current_slide = self.deck.len() - 1;
        info!("Added {} slide at {}", kind, self.current_slide);
        self.current_slide
    }

    /// Remove a slide. The last remaining slide cannot be removed.
    pub fn remove_slide(&mut self, index: usize) -> std::result::Result<bool, Refusal> {
        if index >= self.deck.len() {
            return Ok(false);
        }
        if self.deck.len() == 1 {
            return Err(Refusal::LastSlide);
        }
        self.deck.slides.remove(index);
        // Keep the same slide selected when an earlier one goes away.
        if index < self.current_slide {
            self.current_slide -= 1;
        }
        self.current_slide = self.current_slide.min(self.deck.len() - 1);
        info!("Removed slide {}", index);
        Ok(true)
    }

    /// Insert a copy of the slide right after it and select the copy.
    pub fn duplicate_slide(&mut self, index: usize) -> Option<usize> {
        let copy = self.deck.slides.get(index)?.clone();
        self.deck.slides.insert(index + 1, copy);
        self.current_slide = index + 1;
        Some(self.current_slide)
    }

    /// Move a slide to a new position; the selection follows it.
    pub fn move_slide(&mut self, from: usize, to: usize) -> bool {
        if from >= self.deck.len() || to >= self.deck.len() {
            return false;
        }
        let slide = self.deck.slides.remove(from);
        self.deck.slides.insert(to, slide);
        self.current_slide = to;
        true
    }

    pub fn change_slide_type(&mut self, index: usize, kind: SlideKind) -> bool {
        self.deck.change_slide_type(index, kind)
    }

    pub fn set_field(&mut self, slide: usize, path: &FieldPath, value: &str) -> bool {
        self.deck.set_field(slide, path, value)
    }

    pub fn field(&self, slide: usize, path: &FieldPath) -> Option<String> {
        self.deck.field(slide, path)
    }

    pub fn split_bullet_after(&mut self, slide: usize, column: Column, index: usize) -> Option<usize> {
        self.deck.split_bullet_after(slide, column, index)
    }

    pub fn delete_bullet(
        &mut self,
        slide: usize,
        column: Column,
        index: usize,
    ) -> std::result::Result<Option<usize>, Refusal> {
        self.deck.delete_bullet(slide, column, index)
    }

    pub fn add_bullet(&mut self, slide: usize) -> Option<usize> {
        self.deck.add_bullet(slide)
    }

    pub fn add_metric(&mut self, slide: usize) -> Option<usize> {
        self.deck.add_metric(slide)
    }

    pub fn remove_metric(&mut self, slide: usize, index: usize) -> bool {
        self.deck.remove_metric(slide, index)
    }

    pub fn add_table_row(&mut self, slide: usize) -> Option<usize> {
        self.deck.add_table_row(slide)
    }

    pub fn add_table_column(&mut self, slide: usize) -> Option<usize> {
        self.deck.add_table_column(slide)
    }
}
