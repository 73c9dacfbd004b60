//! # Create Action
//!
//! REST-style "create" glue: binds input in two rounds, checks access
//! between them, persists, and reports the created record's location.
//!
//! The sequencing is the externally observable contract: the access check
//! runs after the first (route/query) binding round and before the body
//! round, so authorization can depend on route parameters but never on body
//! content, and nothing is persisted for a denied request.

use crate::error::RoaError;
use crate::resource::Params;
use crate::slug::{check_access, self_link};
use crate::store::{FormRecord, RecordStore};
use std::marker::PhantomData;
use tracing::{debug, info, instrument, warn};

/// Input for one create invocation: route/query parameters and body
/// parameters, already decoded by the transport collaborator.
#[derive(Debug, Clone, Default)]
pub struct CreateRequest {
    pub query: Params,
    pub body: Params,
}

/// Result of a create invocation that reached the persistence step.
///
/// Access denials and unknown persistence failures are errors instead; see
/// [`RoaError`].
#[derive(Debug)]
pub enum CreateOutcome<T> {
    /// The record was persisted. Maps to HTTP 201 with a `Location` header.
    Created { record: T, location: String },
    /// Validation rejected the record; its errors are attached. Maps to
    /// HTTP 422 with the record serialized in the response body.
    Invalid { record: T },
}

impl<T> CreateOutcome<T> {
    /// The HTTP status this outcome maps to.
    pub fn status(&self) -> u16 {
        match self {
            Self::Created { .. } => 201,
            Self::Invalid { .. } => 422,
        }
    }

    /// The `Location` header value, present only when created.
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Created { location, .. } => Some(location),
            Self::Invalid { .. } => None,
        }
    }

    pub fn record(&self) -> &T {
        match self {
            Self::Created { record, .. } | Self::Invalid { record } => record,
        }
    }

    pub fn into_record(self) -> T {
        match self {
            Self::Created { record, .. } | Self::Invalid { record } => record,
        }
    }
}

/// The create action for one record type over one store.
pub struct CreateAction<T, S> {
    store: S,
    _record: PhantomData<fn() -> T>,
}

impl<T, S> CreateAction<T, S>
where
    T: FormRecord + Send,
    S: RecordStore<T>,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    /// Runs the create flow: bind query, check access, bind body, save.
    #[instrument(skip_all)]
    pub async fn run(
        &self,
        mut record: T,
        request: CreateRequest,
    ) -> Result<CreateOutcome<T>, RoaError> {
        debug!(resource = record.resource_name(), "binding query parameters");
        record.load(&request.query);
        check_access(&record, &request.query).await?;
        record.load(&request.body);

        if self.store.save(&mut record).await? {
            let location = self_link(&record)?;
            info!(
                resource = record.resource_name(),
                location = %location,
                "record created"
            );
            Ok(CreateOutcome::Created { record, location })
        } else if record.has_errors() {
            debug!(
                resource = record.resource_name(),
                "validation rejected the record"
            );
            Ok(CreateOutcome::Invalid { record })
        } else {
            warn!(
                resource = record.resource_name(),
                "save failed without validation errors"
            );
            Err(RoaError::UnknownPersistenceFailure)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{params, MockStore};
    use crate::resource::{AccessRule, ResourceRecord};
    use crate::slug::SlugState;
    use std::sync::{Arc, Mutex};

    /// Minimal root-level form record for exercising the action.
    #[derive(Clone, Debug, Default)]
    struct Draft {
        id: Option<u32>,
        title: String,
        bound: Arc<Mutex<Vec<String>>>,
        errors: Vec<(String, String)>,
        slug: SlugState,
    }

    impl ResourceRecord for Draft {
        fn resource_name(&self) -> &str {
            "drafts"
        }

        fn record_id(&self) -> String {
            self.id.map(|id| id.to_string()).unwrap_or_default()
        }

        fn base_link(&self) -> &str {
            "/api"
        }

        fn access_rule(&self) -> Option<AccessRule> {
            Some(Arc::new(|params: &Params| {
                if params.contains_key("token") {
                    Ok(())
                } else {
                    Err(RoaError::denied("missing token"))
                }
            }))
        }

        fn slug_state(&self) -> &SlugState {
            &self.slug
        }
    }

    impl FormRecord for Draft {
        fn load(&mut self, params: &Params) {
            let mut bound = self.bound.lock().unwrap();
            for key in params.keys() {
                bound.push(key.clone());
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

    #[tokio::test]
    async fn created_outcome_carries_the_self_link() {
        let mut mock = MockStore::new();
        mock.expect_save().return_saved();
        let action = CreateAction::new(mock.store());

        let mut record = Draft::default();
        record.id = Some(7);
        let request = CreateRequest {
            query: params([("token", "t")]),
            body: params([("title", "First post")]),
        };
        let outcome = action.run(record, request).await.unwrap();

        assert_eq!(outcome.status(), 201);
        assert_eq!(outcome.location(), Some("/api/drafts/7"));
        assert_eq!(outcome.record().title, "First post");
        mock.verify();
    }

    #[tokio::test]
    async fn validation_failure_returns_the_record_with_errors() {
        let mut mock = MockStore::new();
        mock.expect_save()
            .return_invalid("title", "Title cannot be blank.");
        let action = CreateAction::new(mock.store());

        let request = CreateRequest {
            query: params([("token", "t")]),
            body: params([]),
        };
        let outcome = action.run(Draft::default(), request).await.unwrap();

        assert_eq!(outcome.status(), 422);
        assert!(outcome.location().is_none());
        assert_eq!(
            outcome.record().validation_errors(),
            [("title".to_string(), "Title cannot be blank.".to_string())]
        );
        mock.verify();
    }

    #[tokio::test]
    async fn silent_save_failure_is_an_unknown_persistence_failure() {
        let mut mock = MockStore::new();
        mock.expect_save().return_failed();
        let action = CreateAction::new(mock.store());

        let request = CreateRequest {
            query: params([("token", "t")]),
            body: params([]),
        };
        let err = action.run(Draft::default(), request).await.unwrap_err();

        assert!(matches!(&err, RoaError::UnknownPersistenceFailure));
        assert_eq!(err.http_status(), 500);
        mock.verify();
    }

    #[tokio::test]
    async fn denied_access_aborts_before_body_binding_and_save() {
        let mock = MockStore::new();
        let action = CreateAction::new(mock.store());

        let record = Draft::default();
        let bound = record.bound.clone();
        let request = CreateRequest {
            query: params([("draft_kind", "note")]),
            body: params([("title", "never bound")]),
        };
        let err = action.run(record, request).await.unwrap_err();

        assert!(matches!(err, RoaError::AccessDenied { .. }));
        // Only the query round ran before the denial.
        assert_eq!(*bound.lock().unwrap(), ["draft_kind"]);
        mock.verify();
    }
}
