//! # ROA Framework
//!
//! Building blocks for **Resource-Oriented Architecture (ROA)** glue: given
//! records arranged in a parent/child resource tree, this crate derives each
//! record's canonical REST links from its position in the tree, and cascades
//! access checks up the ancestor chain.
//!
//! ## The slug pattern
//!
//! A *slug* is the hierarchical path-building behavior that derives a child
//! resource link from its parent's. A record at `/api/books/5` with a child
//! collection `chapters` gives chapter 2 the self link
//! `/api/books/5/chapters/2` — and chapter 2's own children nest further.
//! Alongside the links, each level of the tree may carry an access rule;
//! a request is authorized only when the record's own rule *and* every
//! ancestor's rule grant it (a *cascading access check*).
//!
//! ## Core abstractions
//!
//! ### [`ResourceRecord`] - the tree contract
//!
//! Implemented by every addressable record: names the resource, renders the
//! identifier, points at the owning parent relation, and exposes the
//! per-resource access rule. Parent lookup is an async hook so each record
//! type decides how its relation is fetched.
//!
//! ### [`slug`] - the resolver
//!
//! Free functions over `&dyn ResourceRecord`: [`resolve_links`] (lazy,
//! cached, force-refreshable), [`self_link`] / [`resource_link`],
//! [`slug_links`] (the ordered link map: own links first, ancestors nearest
//! first), and [`check_access`] (the cascading check).
//!
//! ```rust
//! use roa_framework::mock::StubResource;
//! use roa_framework::{resolve_links, self_link, slug_links};
//!
//! #[tokio::main]
//! async fn main() {
//!     let book = StubResource::root("books", "/api", "5");
//!     let chapter = StubResource::child("chapters", "book", "2").with_parent(book);
//!
//!     resolve_links(&chapter, true).await.unwrap();
//!     assert_eq!(self_link(&chapter).unwrap(), "/api/books/5/chapters/2");
//!
//!     let links = slug_links(&chapter).await.unwrap();
//!     assert_eq!(links["chapters_list"], "/api/books/5/chapters");
//!     assert_eq!(links["parent_book"], "/api/books/5");
//! }
//! ```
//!
//! ### [`CreateAction`] - REST create glue
//!
//! Binds route/query parameters, runs the cascading access check, binds body
//! parameters, saves through a [`RecordStore`], and reports the created
//! record's location (HTTP 201 + `Location` at the transport boundary). The
//! check runs *between* the two binding rounds, so authorization can depend
//! on route parameters but nothing is persisted for a denied request.
//!
//! ## Execution model
//!
//! One resolver invocation serves one inbound operation; records and their
//! cached links are request-scoped and never shared across requests. The
//! only async boundary is the storage collaborator (parent fetch, save);
//! the resolver merely awaits it.
//!
//! ## Testing
//!
//! The [`mock`] module provides [`mock::StubResource`] for assembling
//! resource chains in tests and [`mock::MockStore`], an expectation-queue
//! store with a `verify()` step, so action and resolver logic can be tested
//! without any real storage.

pub mod create;
pub mod error;
pub mod mock;
pub mod resource;
pub mod slug;
pub mod store;
pub mod tracing;

// Re-export core types for convenience
pub use create::{CreateAction, CreateOutcome, CreateRequest};
pub use error::RoaError;
pub use resource::{AccessRule, Params, ResourceRecord};
pub use slug::{
    check_access, resolve_links, resource_link, self_link, slug_links, Slug, SlugLinks, SlugState,
};
pub use store::{FormRecord, RecordStore};
