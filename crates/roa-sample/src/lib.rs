//! Sample catalog built on `roa-framework`: a three-level resource tree
//! (`Book -> Chapter -> Page`) wired to an in-memory store.
//!
//! The interesting parts live in [`model`] (records composing slug state and
//! relation caches), [`storage`] (finders and stores that resolve links as
//! part of loading and saving), and [`api`] (the create endpoints).

pub mod api;
pub mod model;
pub mod storage;
