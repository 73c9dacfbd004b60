//! # Storage Contracts
//!
//! Traits the storage/ORM collaborator must satisfy so the create action can
//! bind input, validate, and persist records without knowing anything about
//! the backing store.

use crate::error::RoaError;
use crate::resource::{Params, ResourceRecord};
use async_trait::async_trait;

/// A [`ResourceRecord`] that can be populated from request parameters and
/// carry validation errors.
pub trait FormRecord: ResourceRecord {
    /// Binds matching parameters onto the record's attributes. Unknown keys
    /// are ignored; repeated binding rounds are additive.
    fn load(&mut self, params: &Params);

    /// Attaches a validation error to an attribute.
    fn add_error(&mut self, attribute: &str, message: &str);

    /// Whether any validation errors are attached.
    fn has_errors(&self) -> bool {
        !self.validation_errors().is_empty()
    }

    /// The attached `(attribute, message)` validation errors.
    fn validation_errors(&self) -> &[(String, String)];
}

/// Persistence seam for one record type.
#[async_trait]
pub trait RecordStore<T: FormRecord>: Send + Sync {
    /// Validates and persists the record, assigning its identifier on
    /// success.
    ///
    /// Returns `Ok(true)` when saved, `Ok(false)` when validation rejected
    /// the record (errors attached via [`FormRecord::add_error`]), and `Err`
    /// for storage failures.
    async fn save(&self, record: &mut T) -> Result<bool, RoaError>;
}
