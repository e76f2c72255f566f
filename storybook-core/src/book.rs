//! Storybook content model
//!
//! Tracks which page of the book is visible and extracts the readable
//! text for that page. The narrator consumes this through
//! [`ContentSource`]; the UI layer drives it through the open/flip/close
//! operations.

use crate::content::ContentSource;
use crate::error::{Error, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One page of the book: a heading plus its paragraphs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub paragraphs: Vec<String>,
}

impl Page {
    pub fn new(title: impl Into<String>, paragraphs: Vec<String>) -> Self {
        Self {
            title: title.into(),
            paragraphs,
        }
    }

    /// Title and paragraphs, trimmed, blanks dropped, joined with `".\n"`.
    pub fn readable_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(1 + self.paragraphs.len());
        let title = self.title.trim();
        if !title.is_empty() {
            parts.push(title);
        }
        parts.extend(
            self.paragraphs
                .iter()
                .map(|p| p.trim())
                .filter(|p| !p.is_empty()),
        );
        parts.join(".\n")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct BookFile {
    #[serde(default)]
    pages: Vec<Page>,
    #[serde(default)]
    back_cover: String,
}

/// Which readable unit is in front of the reader.
#[derive(Debug, Clone, Copy)]
struct ViewState {
    open: bool,
    /// Index of the next unflipped page; equal to the page count once
    /// every page has been flipped (back cover showing).
    current: usize,
}

/// A storybook with page-index tracking.
///
/// The view state sits behind a lock so the book can be shared between
/// the UI layer (flipping pages) and the narrator (reading text).
pub struct Storybook {
    pages: Vec<Page>,
    back_cover: String,
    view: RwLock<ViewState>,
}

impl Storybook {
    pub fn new(pages: Vec<Page>, back_cover: impl Into<String>) -> Self {
        Self {
            pages,
            back_cover: back_cover.into(),
            view: RwLock::new(ViewState {
                open: false,
                current: 0,
            }),
        }
    }

    /// Load a book from its JSON form: `{"pages": [...], "back_cover": "..."}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: BookFile = serde_json::from_str(json)
            .map_err(|e| Error::Serialization(format!("Invalid storybook JSON: {}", e)))?;
        if file.pages.is_empty() {
            return Err(Error::Content("Storybook has no pages".to_string()));
        }
        Ok(Self::new(file.pages, file.back_cover))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_open(&self) -> bool {
        self.view.read().open
    }

    /// Index of the currently visible page; `page_count()` once the book
    /// has been read through to the back cover.
    pub fn current_index(&self) -> usize {
        self.view.read().current
    }

    pub fn open(&self) {
        self.view.write().open = true;
    }

    /// Close the book and reset to the first page.
    pub fn close(&self) {
        let mut view = self.view.write();
        view.open = false;
        view.current = 0;
    }

    /// Flip the visible page over. Returns false when the book is closed
    /// or already showing the back cover.
    pub fn flip_forward(&self) -> bool {
        let mut view = self.view.write();
        if !view.open || view.current >= self.pages.len() {
            return false;
        }
        view.current += 1;
        true
    }

    /// Flip the most recently turned page back. Returns false at the
    /// front of the book or when closed.
    pub fn flip_back(&self) -> bool {
        let mut view = self.view.write();
        if !view.open || view.current == 0 {
            return false;
        }
        view.current -= 1;
        true
    }

    /// Readable text of whatever is visible: the current page, the back
    /// cover once all pages are flipped, or nothing when closed.
    pub fn readable_text(&self) -> String {
        let view = self.view.read();
        if !view.open {
            return String::new();
        }
        match self.pages.get(view.current) {
            Some(page) => page.readable_text(),
            None => self.back_cover.trim().to_string(),
        }
    }
}

impl ContentSource for Storybook {
    fn current_text(&self) -> String {
        self.readable_text()
    }
}
