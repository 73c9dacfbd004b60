//! # ResourceRecord Trait
//!
//! The `ResourceRecord` trait defines the contract that every addressable
//! record (Book, Chapter, …) must implement so the slug resolver can place it
//! in a parent/child resource tree. It names the resource, renders the
//! record's identifier, points at the owning parent relation, and exposes the
//! per-resource access rule.
//!
//! # Architecture Note
//! The original behavior-mixin design attached this logic to an unrelated
//! base class at runtime. Here it is a plain trait plus composition: a record
//! holds a [`SlugState`](crate::slug::SlugState) and the resolver operates on
//! `&dyn ResourceRecord`. Parent lookup is an async hook on the record
//! itself, so each record type decides how its relation is fetched (through a
//! storage handle, from a pre-populated cache, …).

use crate::error::RoaError;
use crate::slug::SlugState;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Request parameters, route/query and body alike: a plain string mapping.
pub type Params = HashMap<String, String>;

/// Per-resource access predicate, invoked by the cascading access check at
/// each tree level with that level's own rule.
///
/// Returning `Ok(())` grants access; returning an error (usually
/// [`RoaError::AccessDenied`]) denies it and aborts the whole chain.
pub type AccessRule = Arc<dyn Fn(&Params) -> Result<(), RoaError> + Send + Sync>;

/// Contract for records that live in a hierarchical resource tree.
///
/// A root record (no [`parent_relation`](Self::parent_relation)) derives its
/// links from [`base_link`](Self::base_link); a child record derives them
/// from its parent's resolved self link.
#[async_trait]
pub trait ResourceRecord: Send + Sync {
    /// URL path segment naming this resource's collection (e.g. `"books"`).
    fn resource_name(&self) -> &str;

    /// The record identifier rendered as the trailing path segment.
    fn record_id(&self) -> String;

    /// Name of the attribute holding the identifier, for input binding.
    fn id_attribute(&self) -> &str {
        "id"
    }

    /// API root prefix used when the record has no parent relation
    /// (e.g. `"/api"`).
    fn base_link(&self) -> &str;

    /// Name of the relation pointing at the owning parent, if any.
    fn parent_relation(&self) -> Option<&str> {
        None
    }

    /// This resource type's access rule, if one is configured.
    fn access_rule(&self) -> Option<AccessRule> {
        None
    }

    /// The record's link cache. Each record owns exactly one.
    fn slug_state(&self) -> &SlugState;

    /// Whether the parent relation was populated when this record was
    /// loaded. Used to resolve links without a forced fetch.
    fn is_parent_loaded(&self) -> bool {
        false
    }

    /// Fetch the parent record through [`parent_relation`](Self::parent_relation).
    ///
    /// Implementations should serve a pre-populated parent without hitting
    /// storage again. `Ok(None)` means the relation holds no record.
    async fn fetch_parent(&self) -> Result<Option<Box<dyn ResourceRecord>>, RoaError> {
        Ok(None)
    }
}
