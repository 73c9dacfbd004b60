//! # Mock & Test Utilities
//!
//! Two helpers for testing code built on the framework without a real
//! storage backend:
//!
//! - [`StubResource`]: a configurable in-memory [`ResourceRecord`] for
//!   assembling resource chains (root, child, pre-loaded parent, access
//!   rules) directly in tests.
//! - [`MockStore`]: an expectation-queue store in the spirit of a fluent
//!   mock. Queue save outcomes with [`MockStore::expect_save`], hand the
//!   [`MockStore::store`] handle to the code under test, then
//!   [`MockStore::verify`] that every expectation was consumed.
//!
//! ```rust
//! use roa_framework::mock::{params, StubResource};
//! use roa_framework::{self_link, slug_links, resolve_links};
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
//!     assert_eq!(links["parent_book"], "/api/books/5");
//! }
//! ```

use crate::error::RoaError;
use crate::resource::{AccessRule, Params, ResourceRecord};
use crate::slug::SlugState;
use crate::store::{FormRecord, RecordStore};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

/// Builds a [`Params`] map from string pairs.
pub fn params<const N: usize>(pairs: [(&str, &str); N]) -> Params {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// A configurable in-memory resource record for tests.
#[derive(Clone)]
pub struct StubResource {
    name: String,
    base_link: String,
    id: String,
    parent_relation: Option<String>,
    parent: Option<Arc<StubResource>>,
    preloaded: bool,
    rule: Option<AccessRule>,
    slug: SlugState,
}

impl StubResource {
    /// A root-level record: links derive from `base_link`.
    pub fn root(name: &str, base_link: &str, id: &str) -> Self {
        Self {
            name: name.to_string(),
            base_link: base_link.to_string(),
            id: id.to_string(),
            parent_relation: None,
            parent: None,
            preloaded: false,
            rule: None,
            slug: SlugState::new(),
        }
    }

    /// A child record with a named parent relation but no parent attached
    /// yet; a forced lookup will fail with `ParentNotFound` until
    /// [`with_parent`](Self::with_parent) is called.
    pub fn child(name: &str, relation: &str, id: &str) -> Self {
        Self {
            name: name.to_string(),
            base_link: String::new(),
            id: id.to_string(),
            parent_relation: Some(relation.to_string()),
            parent: None,
            preloaded: false,
            rule: None,
            slug: SlugState::new(),
        }
    }

    /// Attaches the parent record behind the relation.
    pub fn with_parent(mut self, parent: StubResource) -> Self {
        self.parent = Some(Arc::new(parent));
        self
    }

    /// Marks the parent relation as populated at load time, so unforced
    /// resolution proceeds without a fetch being "needed".
    pub fn preloaded(mut self) -> Self {
        self.preloaded = true;
        self
    }

    /// Configures this record's access rule.
    pub fn with_rule<F>(mut self, rule: F) -> Self
    where
        F: Fn(&Params) -> Result<(), RoaError> + Send + Sync + 'static,
    {
        self.rule = Some(Arc::new(rule));
        self
    }
}

#[async_trait]
impl ResourceRecord for StubResource {
    fn resource_name(&self) -> &str {
        &self.name
    }

    fn record_id(&self) -> String {
        self.id.clone()
    }

    fn base_link(&self) -> &str {
        &self.base_link
    }

    fn parent_relation(&self) -> Option<&str> {
        self.parent_relation.as_deref()
    }

    fn access_rule(&self) -> Option<AccessRule> {
        self.rule.clone()
    }

    fn slug_state(&self) -> &SlugState {
        &self.slug
    }

    fn is_parent_loaded(&self) -> bool {
        self.preloaded && self.parent.is_some()
    }

    async fn fetch_parent(&self) -> Result<Option<Box<dyn ResourceRecord>>, RoaError> {
        Ok(self
            .parent
            .as_deref()
            .map(|parent| Box::new(parent.clone()) as Box<dyn ResourceRecord>))
    }
}

/// One queued save outcome.
enum SaveExpectation {
    Saved,
    Invalid { attribute: String, message: String },
    Failed,
    Err(RoaError),
}

type ExpectationQueue = Arc<Mutex<VecDeque<SaveExpectation>>>;

/// An expectation-queue mock for [`RecordStore`].
///
/// # Example
/// ```ignore
/// let mut mock = MockStore::new();
/// mock.expect_save().return_saved();
/// mock.expect_save().return_invalid("title", "Title cannot be blank.");
///
/// let action = CreateAction::new(mock.store());
/// // drive the action...
/// mock.verify();
/// ```
#[derive(Default)]
pub struct MockStore {
    expectations: ExpectationQueue,
}

impl MockStore {
    /// Creates a mock with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    /// A cloneable store handle backed by this mock's expectation queue.
    pub fn store(&self) -> MockStoreHandle {
        MockStoreHandle {
            expectations: self.expectations.clone(),
        }
    }

    /// Queues the next save outcome.
    pub fn expect_save(&mut self) -> SaveExpectationBuilder {
        SaveExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    /// Panics when queued expectations were never consumed.
    pub fn verify(&self) {
        let expectations = lock(&self.expectations);
        assert!(
            expectations.is_empty(),
            "Not all expectations were met. {} remaining",
            expectations.len()
        );
    }
}

/// Builder for one queued save outcome.
pub struct SaveExpectationBuilder {
    expectations: ExpectationQueue,
}

impl SaveExpectationBuilder {
    /// The save succeeds.
    pub fn return_saved(self) {
        lock(&self.expectations).push_back(SaveExpectation::Saved);
    }

    /// The save is rejected by validation; the error is attached to the
    /// record.
    pub fn return_invalid(self, attribute: &str, message: &str) {
        lock(&self.expectations).push_back(SaveExpectation::Invalid {
            attribute: attribute.to_string(),
            message: message.to_string(),
        });
    }

    /// The save fails without attaching validation errors — the unknown
    /// persistence failure case.
    pub fn return_failed(self) {
        lock(&self.expectations).push_back(SaveExpectation::Failed);
    }

    /// The save fails with a storage-level error.
    pub fn return_err(self, error: RoaError) {
        lock(&self.expectations).push_back(SaveExpectation::Err(error));
    }
}

/// The store handle handed to code under test.
#[derive(Clone)]
pub struct MockStoreHandle {
    expectations: ExpectationQueue,
}

#[async_trait]
impl<T: FormRecord + Send> RecordStore<T> for MockStoreHandle {
    async fn save(&self, record: &mut T) -> Result<bool, RoaError> {
        let expectation = lock(&self.expectations).pop_front();
        match expectation {
            Some(SaveExpectation::Saved) => Ok(true),
            Some(SaveExpectation::Invalid { attribute, message }) => {
                record.add_error(&attribute, &message);
                Ok(false)
            }
            Some(SaveExpectation::Failed) => Ok(false),
            Some(SaveExpectation::Err(error)) => Err(error),
            None => panic!("MockStore received a save with no expectation queued"),
        }
    }
}

fn lock(queue: &ExpectationQueue) -> std::sync::MutexGuard<'_, VecDeque<SaveExpectation>> {
    queue.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct Note {
        errors: Vec<(String, String)>,
        slug: SlugState,
    }

    impl ResourceRecord for Note {
        fn resource_name(&self) -> &str {
            "notes"
        }

        fn record_id(&self) -> String {
            "1".to_string()
        }

        fn base_link(&self) -> &str {
            "/api"
        }

        fn slug_state(&self) -> &SlugState {
            &self.slug
        }
    }

    impl FormRecord for Note {
        fn load(&mut self, _params: &Params) {}

        fn add_error(&mut self, attribute: &str, message: &str) {
            self.errors.push((attribute.to_string(), message.to_string()));
        }

        fn validation_errors(&self) -> &[(String, String)] {
            &self.errors
        }
    }

    #[tokio::test]
    async fn expectations_are_consumed_in_order() {
        let mut mock = MockStore::new();
        mock.expect_save().return_saved();
        mock.expect_save().return_invalid("title", "blank");
        let store = mock.store();

        let mut note = Note::default();
        assert!(store.save(&mut note).await.unwrap());
        assert!(!store.save(&mut note).await.unwrap());
        assert_eq!(note.validation_errors(), [("title".into(), "blank".into())]);
        mock.verify();
    }

    #[tokio::test]
    async fn queued_errors_propagate() {
        let mut mock = MockStore::new();
        mock.expect_save()
            .return_err(RoaError::UnknownPersistenceFailure);
        let store = mock.store();

        let mut note = Note::default();
        let err = store.save(&mut note).await.unwrap_err();
        assert!(matches!(err, RoaError::UnknownPersistenceFailure));
        mock.verify();
    }

    #[tokio::test]
    #[should_panic(expected = "Not all expectations were met")]
    async fn verify_panics_on_unmet_expectations() {
        let mut mock = MockStore::new();
        mock.expect_save().return_saved();
        mock.verify();
    }
}
