//! Pages sit at the deepest level of the tree, under chapters.

use crate::model::{Chapter, ChapterId};
use crate::storage::Db;
use async_trait::async_trait;
use roa_framework::{FormRecord, Params, ResourceRecord, RoaError, SlugState};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::OnceLock;

/// Type-safe identifier for pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageId(pub u32);

impl From<u32> for PageId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A page of a chapter. Resolving its links walks chapter and book; an
/// access check consults every level of that chain.
#[derive(Debug, Clone)]
pub struct Page {
    pub id: Option<PageId>,
    pub chapter_id: Option<ChapterId>,
    pub body: String,
    db: Db,
    chapter: OnceLock<Chapter>,
    errors: Vec<(String, String)>,
    slug: SlugState,
}

impl Page {
    /// A blank record for the create flow.
    pub fn new(db: Db) -> Self {
        Self {
            id: None,
            chapter_id: None,
            body: String::new(),
            db,
            chapter: OnceLock::new(),
            errors: Vec::new(),
            slug: SlugState::new(),
        }
    }

    /// A record as loaded from storage.
    pub(crate) fn loaded(id: PageId, chapter_id: ChapterId, body: String, db: Db) -> Self {
        Self {
            id: Some(id),
            chapter_id: Some(chapter_id),
            body,
            db,
            chapter: OnceLock::new(),
            errors: Vec::new(),
            slug: SlugState::new(),
        }
    }
}

#[async_trait]
impl ResourceRecord for Page {
    fn resource_name(&self) -> &str {
        "pages"
    }

    fn record_id(&self) -> String {
        self.id.map(|id| id.to_string()).unwrap_or_default()
    }

    fn base_link(&self) -> &str {
        "/api"
    }

    fn parent_relation(&self) -> Option<&str> {
        Some("chapter")
    }

    fn slug_state(&self) -> &SlugState {
        &self.slug
    }

    fn is_parent_loaded(&self) -> bool {
        self.chapter.get().is_some()
    }

    async fn fetch_parent(&self) -> Result<Option<Box<dyn ResourceRecord>>, RoaError> {
        if let Some(chapter) = self.chapter.get() {
            return Ok(Some(Box::new(chapter.clone())));
        }
        let Some(chapter_id) = self.chapter_id else {
            return Ok(None);
        };
        match self.db.find_chapter(chapter_id).await? {
            Some(chapter) => {
                let _ = self.chapter.set(chapter.clone());
                Ok(Some(Box::new(chapter)))
            }
            None => Ok(None),
        }
    }
}

impl FormRecord for Page {
    fn load(&mut self, params: &Params) {
        if let Some(chapter_id) = params.get("chapter_id").and_then(|raw| raw.parse().ok()) {
            self.chapter_id = Some(ChapterId(chapter_id));
        }
        if let Some(body) = params.get("body") {
            self.body = body.clone();
        }
    }

    fn add_error(&mut self, attribute: &str, message: &str) {
        self.errors.push((attribute.to_string(), message.to_string()));
    }

    fn validation_errors(&self) -> &[(String, String)] {
        &self.errors
    }
}
