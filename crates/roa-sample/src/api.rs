//! Entry points mirroring the POST endpoints of the catalog API.

use crate::model::{Book, Chapter, Page};
use crate::storage::Db;
use roa_framework::{CreateAction, CreateOutcome, CreateRequest, RoaError};
use tracing::instrument;

/// `POST /api/books`
#[instrument(skip_all)]
pub async fn create_book(db: &Db, request: CreateRequest) -> Result<CreateOutcome<Book>, RoaError> {
    CreateAction::new(db.clone()).run(Book::new(), request).await
}

/// `POST /api/books/{book_id}/chapters`
#[instrument(skip_all)]
pub async fn create_chapter(
    db: &Db,
    request: CreateRequest,
) -> Result<CreateOutcome<Chapter>, RoaError> {
    CreateAction::new(db.clone())
        .run(Chapter::new(db.clone()), request)
        .await
}

/// `POST /api/books/{book_id}/chapters/{chapter_id}/pages`
#[instrument(skip_all)]
pub async fn create_page(db: &Db, request: CreateRequest) -> Result<CreateOutcome<Page>, RoaError> {
    CreateAction::new(db.clone())
        .run(Page::new(db.clone()), request)
        .await
}
