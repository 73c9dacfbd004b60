//! Chapters nest under books through the `book` relation.

use crate::model::{Book, BookId};
use crate::storage::Db;
use async_trait::async_trait;
use roa_framework::{FormRecord, Params, ResourceRecord, RoaError, SlugState};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::OnceLock;

/// Type-safe identifier for chapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChapterId(pub u32);

impl From<u32> for ChapterId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for ChapterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A chapter of a book. Its links derive from the owning book's self link,
/// and access checks cascade into the book's rule.
#[derive(Debug, Clone)]
pub struct Chapter {
    pub id: Option<ChapterId>,
    pub book_id: Option<BookId>,
    pub title: String,
    db: Db,
    book: OnceLock<Book>,
    errors: Vec<(String, String)>,
    slug: SlugState,
}

impl Chapter {
    /// A blank record for the create flow.
    pub fn new(db: Db) -> Self {
        Self {
            id: None,
            book_id: None,
            title: String::new(),
            db,
            book: OnceLock::new(),
            errors: Vec::new(),
            slug: SlugState::new(),
        }
    }

    /// A record as loaded from storage.
    pub(crate) fn loaded(id: ChapterId, book_id: BookId, title: String, db: Db) -> Self {
        Self {
            id: Some(id),
            book_id: Some(book_id),
            title,
            db,
            book: OnceLock::new(),
            errors: Vec::new(),
            slug: SlugState::new(),
        }
    }
}

#[async_trait]
impl ResourceRecord for Chapter {
    fn resource_name(&self) -> &str {
        "chapters"
    }

    fn record_id(&self) -> String {
        self.id.map(|id| id.to_string()).unwrap_or_default()
    }

    fn base_link(&self) -> &str {
        "/api"
    }

    fn parent_relation(&self) -> Option<&str> {
        Some("book")
    }

    fn slug_state(&self) -> &SlugState {
        &self.slug
    }

    fn is_parent_loaded(&self) -> bool {
        self.book.get().is_some()
    }

    async fn fetch_parent(&self) -> Result<Option<Box<dyn ResourceRecord>>, RoaError> {
        if let Some(book) = self.book.get() {
            return Ok(Some(Box::new(book.clone())));
        }
        let Some(book_id) = self.book_id else {
            return Ok(None);
        };
        match self.db.find_book(book_id).await? {
            Some(book) => {
                let _ = self.book.set(book.clone());
                Ok(Some(Box::new(book)))
            }
            None => Ok(None),
        }
    }
}

impl FormRecord for Chapter {
    fn load(&mut self, params: &Params) {
        if let Some(book_id) = params.get("book_id").and_then(|raw| raw.parse().ok()) {
            self.book_id = Some(BookId(book_id));
        }
        if let Some(title) = params.get("title") {
            self.title = title.clone();
        }
    }

    fn add_error(&mut self, attribute: &str, message: &str) {
        self.errors.push((attribute.to_string(), message.to_string()));
    }

    fn validation_errors(&self) -> &[(String, String)] {
        &self.errors
    }
}
