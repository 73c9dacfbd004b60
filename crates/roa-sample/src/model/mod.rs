//! Domain records of the sample catalog: a three-level resource tree
//! (`Book -> Chapter -> Page`) with typed identifiers.
//!
//! Each record composes a [`SlugState`](roa_framework::SlugState) and holds
//! a [`Db`](crate::storage::Db) handle where it needs to fetch its parent
//! relation; there is no shared base class and no runtime mixin.

pub mod book;
pub mod chapter;
pub mod page;

pub use book::{Book, BookId};
pub use chapter::{Chapter, ChapterId};
pub use page::{Page, PageId};
