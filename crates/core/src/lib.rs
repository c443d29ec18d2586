//! `gstdesk-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the invoicing
//! engine and its collaborator boundary (no IO, no infrastructure concerns).

pub mod aggregate;
pub mod error;
pub mod id;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot};
pub use error::{DomainError, DomainResult, FieldViolation};
pub use id::InvoiceId;
pub use value_object::ValueObject;
