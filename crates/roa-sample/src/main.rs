//! Walkthrough of the catalog API: builds a book, a chapter, and a page,
//! prints the derived slug links, then shows the cascading access check
//! rejecting a chapter under an archived book.

use roa_framework::{slug_links, CreateOutcome, CreateRequest, Params, ResourceRecord, RoaError};
use roa_sample::api;
use roa_sample::storage::Db;
use tracing::{info, warn};

fn params(pairs: &[(&str, &str)]) -> Params {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

#[tokio::main]
async fn main() -> Result<(), RoaError> {
    roa_framework::tracing::setup_tracing();

    let db = Db::new();

    let request = CreateRequest {
        query: params(&[]),
        body: params(&[("title", "The Rust Programming Language")]),
    };
    let CreateOutcome::Created { record: book, location } =
        api::create_book(&db, request).await?
    else {
        return Err(RoaError::UnknownPersistenceFailure);
    };
    info!(location = %location, "created book");

    let book_id = book.record_id();
    let request = CreateRequest {
        query: params(&[("book_id", &book_id)]),
        body: params(&[("title", "Ownership")]),
    };
    let CreateOutcome::Created { record: chapter, location } =
        api::create_chapter(&db, request).await?
    else {
        return Err(RoaError::UnknownPersistenceFailure);
    };
    info!(location = %location, "created chapter");

    let chapter_id = chapter.record_id();
    let request = CreateRequest {
        query: params(&[("chapter_id", &chapter_id)]),
        body: params(&[("body", "Each value in Rust has an owner.")]),
    };
    let CreateOutcome::Created { record: page, location } =
        api::create_page(&db, request).await?
    else {
        return Err(RoaError::UnknownPersistenceFailure);
    };
    info!(location = %location, "created page");

    for (name, link) in slug_links(&page).await? {
        info!(name = %name, link = %link, "slug link");
    }

    let request = CreateRequest {
        query: params(&[]),
        body: params(&[("title", "Out of Print"), ("archived", "true")]),
    };
    let CreateOutcome::Created { record: archived, .. } =
        api::create_book(&db, request).await?
    else {
        return Err(RoaError::UnknownPersistenceFailure);
    };
    let archived_id = archived.record_id();

    let request = CreateRequest {
        query: params(&[("book_id", &archived_id)]),
        body: params(&[("title", "Lost Chapter")]),
    };
    if let Err(err) = api::create_chapter(&db, request).await {
        warn!(status = err.http_status(), %err, "chapter creation rejected");
    }

    let request = CreateRequest {
        query: params(&[("book_id", &archived_id), ("role", "admin")]),
        body: params(&[("title", "Lost Chapter")]),
    };
    let outcome = api::create_chapter(&db, request).await?;
    info!(status = outcome.status(), "admin retry");

    Ok(())
}
