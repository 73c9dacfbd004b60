//! The root resource of the catalog tree.

use roa_framework::{AccessRule, FormRecord, Params, ResourceRecord, RoaError, SlugState};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::Arc;

/// Type-safe identifier for books.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookId(pub u32);

impl From<u32> for BookId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A book: root-level, so its links derive straight from the API prefix.
///
/// Archived books carry an access rule requiring the `admin` role; through
/// the cascading check this also gates every chapter and page beneath them.
#[derive(Debug, Clone, Default)]
pub struct Book {
    pub id: Option<BookId>,
    pub title: String,
    pub archived: bool,
    errors: Vec<(String, String)>,
    slug: SlugState,
}

impl Book {
    /// A blank record for the create flow.
    pub fn new() -> Self {
        Self::default()
    }

    /// A record as loaded from storage.
    pub(crate) fn loaded(id: BookId, title: String, archived: bool) -> Self {
        Self {
            id: Some(id),
            title,
            archived,
            errors: Vec::new(),
            slug: SlugState::new(),
        }
    }
}

impl ResourceRecord for Book {
    fn resource_name(&self) -> &str {
        "books"
    }

    fn record_id(&self) -> String {
        self.id.map(|id| id.to_string()).unwrap_or_default()
    }

    fn base_link(&self) -> &str {
        "/api"
    }

    fn access_rule(&self) -> Option<AccessRule> {
        if !self.archived {
            return None;
        }
        Some(Arc::new(|params: &Params| {
            if params.get("role").map(String::as_str) == Some("admin") {
                Ok(())
            } else {
                Err(RoaError::denied("archived books are restricted to admins"))
            }
        }))
    }

    fn slug_state(&self) -> &SlugState {
        &self.slug
    }
}

impl FormRecord for Book {
    fn load(&mut self, params: &Params) {
        if let Some(title) = params.get("title") {
            self.title = title.clone();
        }
        if let Some(archived) = params.get("archived") {
            self.archived = archived == "true";
        }
    }

    fn add_error(&mut self, attribute: &str, message: &str) {
        self.errors.push((attribute.to_string(), message.to_string()));
    }

    fn validation_errors(&self) -> &[(String, String)] {
        &self.errors
    }
}
