//! In-memory storage backing the sample catalog.
//!
//! `Db` is a cheap clonable handle over shared tables; the finders return
//! fully link-resolved records, and the [`RecordStore`] impls perform the
//! validation an ORM layer would before inserting a row.

use crate::model::{Book, BookId, Chapter, ChapterId, Page, PageId};
use async_trait::async_trait;
use roa_framework::{resolve_links, FormRecord, RecordStore, RoaError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

#[derive(Debug, Clone)]
struct BookRow {
    title: String,
    archived: bool,
}

#[derive(Debug, Clone)]
struct ChapterRow {
    book_id: BookId,
    title: String,
}

#[derive(Debug, Clone)]
struct PageRow {
    chapter_id: ChapterId,
    body: String,
}

#[derive(Debug, Default)]
struct Tables {
    books: HashMap<BookId, BookRow>,
    chapters: HashMap<ChapterId, ChapterRow>,
    pages: HashMap<PageId, PageRow>,
    next_book_id: u32,
    next_chapter_id: u32,
    next_page_id: u32,
}

/// Handle to the shared in-memory tables.
#[derive(Debug, Clone, Default)]
pub struct Db {
    inner: Arc<Mutex<Tables>>,
}

impl Db {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Looks up a book and resolves its links before handing it out.
    pub async fn find_book(&self, id: BookId) -> Result<Option<Book>, RoaError> {
        let row = match self.lock().books.get(&id) {
            Some(row) => row.clone(),
            None => return Ok(None),
        };
        let record = Book::loaded(id, row.title, row.archived);
        resolve_links(&record, true).await?;
        Ok(Some(record))
    }

    /// Looks up a chapter and resolves its links, fetching the owning book.
    pub async fn find_chapter(&self, id: ChapterId) -> Result<Option<Chapter>, RoaError> {
        let row = match self.lock().chapters.get(&id) {
            Some(row) => row.clone(),
            None => return Ok(None),
        };
        let record = Chapter::loaded(id, row.book_id, row.title, self.clone());
        resolve_links(&record, true).await?;
        Ok(Some(record))
    }

    /// Looks up a page and resolves its links, walking chapter and book.
    pub async fn find_page(&self, id: PageId) -> Result<Option<Page>, RoaError> {
        let row = match self.lock().pages.get(&id) {
            Some(row) => row.clone(),
            None => return Ok(None),
        };
        let record = Page::loaded(id, row.chapter_id, row.body, self.clone());
        resolve_links(&record, true).await?;
        Ok(Some(record))
    }
}

#[async_trait]
impl RecordStore<Book> for Db {
    async fn save(&self, record: &mut Book) -> Result<bool, RoaError> {
        if record.title.trim().is_empty() {
            record.add_error("title", "Title cannot be blank.");
            return Ok(false);
        }
        let id = {
            let mut tables = self.lock();
            tables.next_book_id += 1;
            let id = BookId(tables.next_book_id);
            tables.books.insert(
                id,
                BookRow {
                    title: record.title.clone(),
                    archived: record.archived,
                },
            );
            id
        };
        record.id = Some(id);
        resolve_links(&*record, true).await?;
        info!(book_id = %id, title = %record.title, "book saved");
        Ok(true)
    }
}

#[async_trait]
impl RecordStore<Chapter> for Db {
    async fn save(&self, record: &mut Chapter) -> Result<bool, RoaError> {
        if record.title.trim().is_empty() {
            record.add_error("title", "Title cannot be blank.");
        }
        match record.book_id {
            None => record.add_error("book_id", "Book cannot be blank."),
            Some(book_id) => {
                if !self.lock().books.contains_key(&book_id) {
                    record.add_error("book_id", "Book does not exist.");
                }
            }
        }
        if record.has_errors() {
            return Ok(false);
        }
        let Some(book_id) = record.book_id else {
            return Ok(false);
        };
        let id = {
            let mut tables = self.lock();
            tables.next_chapter_id += 1;
            let id = ChapterId(tables.next_chapter_id);
            tables.chapters.insert(
                id,
                ChapterRow {
                    book_id,
                    title: record.title.clone(),
                },
            );
            id
        };
        record.id = Some(id);
        resolve_links(&*record, true).await?;
        info!(chapter_id = %id, book_id = %book_id, "chapter saved");
        Ok(true)
    }
}

#[async_trait]
impl RecordStore<Page> for Db {
    async fn save(&self, record: &mut Page) -> Result<bool, RoaError> {
        if record.body.trim().is_empty() {
            record.add_error("body", "Body cannot be blank.");
        }
        match record.chapter_id {
            None => record.add_error("chapter_id", "Chapter cannot be blank."),
            Some(chapter_id) => {
                if !self.lock().chapters.contains_key(&chapter_id) {
                    record.add_error("chapter_id", "Chapter does not exist.");
                }
            }
        }
        if record.has_errors() {
            return Ok(false);
        }
        let Some(chapter_id) = record.chapter_id else {
            return Ok(false);
        };
        let id = {
            let mut tables = self.lock();
            tables.next_page_id += 1;
            let id = PageId(tables.next_page_id);
            tables.pages.insert(
                id,
                PageRow {
                    chapter_id,
                    body: record.body.clone(),
                },
            );
            id
        };
        record.id = Some(id);
        resolve_links(&*record, true).await?;
        info!(page_id = %id, chapter_id = %chapter_id, "page saved");
        Ok(true)
    }
}
