//! Create flows against the in-memory store: hierarchical locations,
//! link resolution on load, and validation failures.

use roa_framework::mock::params;
use roa_framework::{self_link, slug_links, CreateOutcome, CreateRequest, ResourceRecord};
use roa_sample::api;
use roa_sample::model::{ChapterId, PageId};
use roa_sample::storage::Db;

async fn seed_book(db: &Db) -> String {
    let request = CreateRequest {
        query: params([]),
        body: params([("title", "The Rust Programming Language")]),
    };
    let outcome = api::create_book(db, request).await.unwrap();
    outcome.record().record_id()
}

async fn seed_chapter(db: &Db, book_id: &str) -> String {
    let request = CreateRequest {
        query: params([("book_id", book_id)]),
        body: params([("title", "Ownership")]),
    };
    let outcome = api::create_chapter(db, request).await.unwrap();
    outcome.record().record_id()
}

#[tokio::test]
async fn creating_a_book_yields_a_root_location() {
    let db = Db::new();

    let request = CreateRequest {
        query: params([]),
        body: params([("title", "The Rust Programming Language")]),
    };
    let outcome = api::create_book(&db, request).await.unwrap();

    assert_eq!(outcome.status(), 201);
    assert_eq!(outcome.location(), Some("/api/books/1"));
}

#[tokio::test]
async fn nested_creates_derive_locations_from_the_parent_chain() {
    let db = Db::new();
    let book_id = seed_book(&db).await;
    let chapter_id = seed_chapter(&db, &book_id).await;

    let request = CreateRequest {
        query: params([("chapter_id", &chapter_id)]),
        body: params([("body", "Each value in Rust has an owner.")]),
    };
    let outcome = api::create_page(&db, request).await.unwrap();

    assert_eq!(outcome.status(), 201);
    assert_eq!(outcome.location(), Some("/api/books/1/chapters/1/pages/1"));
}

#[tokio::test]
async fn finders_return_records_with_resolved_links() {
    let db = Db::new();
    let book_id = seed_book(&db).await;
    let chapter_id = seed_chapter(&db, &book_id).await;

    let chapter = db
        .find_chapter(ChapterId(chapter_id.parse().unwrap()))
        .await
        .unwrap()
        .unwrap();

    // No explicit resolution step needed after a find.
    assert_eq!(self_link(&chapter).unwrap(), "/api/books/1/chapters/1");
}

#[tokio::test]
async fn blank_title_is_rejected_with_validation_errors() {
    let db = Db::new();

    let request = CreateRequest {
        query: params([]),
        body: params([("title", "   ")]),
    };
    let outcome = api::create_book(&db, request).await.unwrap();

    assert_eq!(outcome.status(), 422);
    let CreateOutcome::Invalid { record } = outcome else {
        panic!("expected a validation failure");
    };
    assert_eq!(record.id, None);
}

#[tokio::test]
async fn chapter_under_unknown_book_is_rejected() {
    let db = Db::new();

    let request = CreateRequest {
        query: params([("book_id", "99")]),
        body: params([("title", "Ownership")]),
    };
    let err = api::create_chapter(&db, request).await.unwrap_err();

    assert_eq!(err.http_status(), 404);
}

#[tokio::test]
async fn page_links_span_the_whole_ancestor_chain() {
    let db = Db::new();
    let book_id = seed_book(&db).await;
    let chapter_id = seed_chapter(&db, &book_id).await;

    let request = CreateRequest {
        query: params([("chapter_id", &chapter_id)]),
        body: params([("body", "Each value in Rust has an owner.")]),
    };
    let outcome = api::create_page(&db, request).await.unwrap();
    let page = outcome.into_record();

    let links = slug_links(&page).await.unwrap();
    let keys: Vec<&str> = links.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        [
            "self",
            "pages_list",
            "parent_chapter",
            "chapters_list",
            "parent_book",
            "books_list",
        ]
    );
    assert_eq!(links["self"], "/api/books/1/chapters/1/pages/1");
    assert_eq!(links["pages_list"], "/api/books/1/chapters/1/pages");
    assert_eq!(links["parent_chapter"], "/api/books/1/chapters/1");
    assert_eq!(links["chapters_list"], "/api/books/1/chapters");
    assert_eq!(links["parent_book"], "/api/books/1");
    assert_eq!(links["books_list"], "/api/books");

    let page = db
        .find_page(PageId(1))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(self_link(&page).unwrap(), "/api/books/1/chapters/1/pages/1");
}
