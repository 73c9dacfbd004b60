//! # Hierarchical Resource Link Resolver
//!
//! This module is the heart of the framework. It derives a record's canonical
//! links from its position in a parent/child resource tree, caches them, and
//! cascades access checks up the ancestor chain.
//!
//! # Link invariants
//!
//! - root record: `resource_link = base_link/resource_name`,
//!   `self_link = resource_link/id` (so `/api` + `books` + `5` gives
//!   `/api/books/5`).
//! - child record: `resource_link = parent_self_link/resource_name`,
//!   `self_link = resource_link/id`.
//!
//! # Resolution state machine
//!
//! A record starts `Unresolved` and moves to `Resolved` (as root, or as child
//! via its parent) only through [`resolve_links`]. The resolved state is
//! terminal until an explicit forced re-resolution; there is no automatic
//! invalidation. A child whose parent relation is set but whose parent is
//! neither pre-loaded nor force-fetched stays unresolved, and asking it for a
//! link fails with [`RoaError::UnresolvedLink`].

use crate::error::RoaError;
use crate::resource::{AccessRule, Params, ResourceRecord};
use indexmap::IndexMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Ordered mapping from link name (`self`, `books_list`, `parent_book`, …)
/// to link value. Own links always precede ancestor links; ancestors appear
/// nearest first.
pub type SlugLinks = IndexMap<String, String>;

/// A record's resolved link chain.
///
/// Each node owns its resource link, the identifier captured at resolution
/// time, its access rule, and an explicit optional owned reference to the
/// parent node's own resolved chain.
#[derive(Clone)]
pub struct Slug {
    resource_name: String,
    parent_relation: Option<String>,
    resource_link: String,
    record_id: String,
    access_rule: Option<AccessRule>,
    parent: Option<Box<Slug>>,
}

impl Slug {
    /// Link to the resource list this record belongs to.
    pub fn resource_link(&self) -> &str {
        &self.resource_link
    }

    /// Link to the record itself, using the identifier captured at
    /// resolution time.
    pub fn self_link(&self) -> String {
        format!("{}/{}", self.resource_link, self.record_id)
    }

    /// The parent node's resolved chain, when a parent exists.
    pub fn parent(&self) -> Option<&Slug> {
        self.parent.as_deref()
    }

    /// Appends this node's ancestor links to `links`, nearest first: each
    /// ancestor contributes its renamed self entry (`parent_{relation}`)
    /// followed by its `{resource_name}_list` entry. On a key collision the
    /// first (nearer) entry wins.
    fn collect_ancestor_links(&self, links: &mut SlugLinks) {
        if let (Some(parent), Some(relation)) =
            (self.parent.as_deref(), self.parent_relation.as_deref())
        {
            links
                .entry(format!("parent_{relation}"))
                .or_insert_with(|| parent.self_link());
            links
                .entry(format!("{}_list", parent.resource_name))
                .or_insert_with(|| parent.resource_link.clone());
            parent.collect_ancestor_links(links);
        }
    }

    /// Runs the access rules along the chain, own rule first, then each
    /// ancestor's, nearest first. Strict conjunction: the first denial
    /// aborts.
    fn check(&self, params: &Params) -> Result<(), RoaError> {
        if let Some(rule) = &self.access_rule {
            rule(params)?;
        }
        if let Some(parent) = &self.parent {
            parent.check(params)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slug")
            .field("resource_name", &self.resource_name)
            .field("parent_relation", &self.parent_relation)
            .field("resource_link", &self.resource_link)
            .field("record_id", &self.record_id)
            .field("has_access_rule", &self.access_rule.is_some())
            .field("parent", &self.parent)
            .finish()
    }
}

/// Per-record link cache, owned by exactly one record instance.
///
/// Interior mutability lets the resolver cache into a shared record without
/// requiring `&mut` access; records are request-scoped by convention, so
/// there is no concurrent mutation within a request.
#[derive(Debug, Default)]
pub struct SlugState {
    resolved: Mutex<Option<Slug>>,
}

impl SlugState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `resolve_links` has completed for the owning record.
    pub fn is_resolved(&self) -> bool {
        self.lock().is_some()
    }

    /// A copy of the resolved chain, if any.
    pub fn snapshot(&self) -> Option<Slug> {
        self.lock().clone()
    }

    fn store(&self, slug: Slug) {
        *self.lock() = Some(slug);
    }

    fn lock(&self) -> MutexGuard<'_, Option<Slug>> {
        self.resolved.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clone for SlugState {
    fn clone(&self) -> Self {
        Self {
            resolved: Mutex::new(self.snapshot()),
        }
    }
}

/// Resolves a record's links and caches them in its [`SlugState`].
///
/// - No parent relation: the record resolves as root.
/// - Parent relation set and `force` or the parent is pre-loaded: the parent
///   is fetched through the relation and the whole ancestor chain resolves.
/// - Parent relation set, not forced, parent not loaded: deferred no-op; the
///   record is not yet link-resolvable.
///
/// Idempotent: re-running with the same inputs yields the same links, and a
/// record that is already resolved is left alone unless `force` is set.
pub async fn resolve_links(record: &dyn ResourceRecord, force: bool) -> Result<(), RoaError> {
    if record.slug_state().is_resolved() && !force {
        return Ok(());
    }
    if record.parent_relation().is_some() && !force && !record.is_parent_loaded() {
        debug!(
            resource = record.resource_name(),
            "parent not loaded, deferring link resolution"
        );
        return Ok(());
    }
    resolve_chain(record).await?;
    Ok(())
}

/// Link to the resource list the record belongs to.
///
/// Fails with [`RoaError::UnresolvedLink`] before any successful resolution.
pub fn resource_link(record: &dyn ResourceRecord) -> Result<String, RoaError> {
    record
        .slug_state()
        .snapshot()
        .map(|slug| slug.resource_link().to_string())
        .ok_or(RoaError::UnresolvedLink)
}

/// Link to the record itself: `resource_link/record_id`.
///
/// Reads the live [`record_id`](ResourceRecord::record_id), so identifiers
/// assigned after resolution (e.g. at save time) are reflected. Fails with
/// [`RoaError::UnresolvedLink`] before any successful resolution.
pub fn self_link(record: &dyn ResourceRecord) -> Result<String, RoaError> {
    let slug = record
        .slug_state()
        .snapshot()
        .ok_or(RoaError::UnresolvedLink)?;
    Ok(format!("{}/{}", slug.resource_link(), record.record_id()))
}

/// Builds the record's full link map: its own `self` and
/// `{resource_name}_list` entries, then every ancestor's links, nearest
/// first. Forces resolution of the whole chain.
pub async fn slug_links(record: &dyn ResourceRecord) -> Result<SlugLinks, RoaError> {
    resolve_links(record, true).await?;
    let slug = record
        .slug_state()
        .snapshot()
        .ok_or(RoaError::UnresolvedLink)?;

    let mut links = SlugLinks::new();
    links.insert(
        "self".to_string(),
        format!("{}/{}", slug.resource_link(), record.record_id()),
    );
    links
        .entry(format!("{}_list", record.resource_name()))
        .or_insert_with(|| slug.resource_link().to_string());
    slug.collect_ancestor_links(&mut links);
    Ok(links)
}

/// Cascading access check: forces resolution, then runs the record's own
/// rule followed by each ancestor's own configured rule, nearest first.
///
/// Strict conjunction: any denial anywhere in the chain aborts the whole
/// call with the rule's error, regardless of nearer rules having passed.
pub async fn check_access(record: &dyn ResourceRecord, params: &Params) -> Result<(), RoaError> {
    resolve_links(record, true).await?;
    let slug = record
        .slug_state()
        .snapshot()
        .ok_or(RoaError::UnresolvedLink)?;
    slug.check(params)
}

/// Fully resolves a record and its ancestor chain, caching at every level.
///
/// Boxed because the recursion depth follows the resource tree.
fn resolve_chain<'a>(
    record: &'a dyn ResourceRecord,
) -> Pin<Box<dyn Future<Output = Result<Slug, RoaError>> + Send + 'a>> {
    Box::pin(async move {
        let slug = match record.parent_relation() {
            None => Slug {
                resource_name: record.resource_name().to_string(),
                parent_relation: None,
                resource_link: format!("{}/{}", record.base_link(), record.resource_name()),
                record_id: record.record_id(),
                access_rule: record.access_rule(),
                parent: None,
            },
            Some(relation) => {
                let parent =
                    record
                        .fetch_parent()
                        .await?
                        .ok_or_else(|| RoaError::ParentNotFound {
                            relation: relation.to_string(),
                        })?;
                let parent_slug = resolve_chain(parent.as_ref()).await?;
                let resource_link =
                    format!("{}/{}", parent_slug.self_link(), record.resource_name());
                Slug {
                    resource_name: record.resource_name().to_string(),
                    parent_relation: Some(relation.to_string()),
                    resource_link,
                    record_id: record.record_id(),
                    access_rule: record.access_rule(),
                    parent: Some(Box::new(parent_slug)),
                }
            }
        };
        debug!(
            resource = slug.resource_name,
            resource_link = slug.resource_link,
            "links resolved"
        );
        record.slug_state().store(slug.clone());
        Ok(slug)
    })
}
