//! Collaborator boundary for the invoicing engine.
//!
//! The engine itself never talks to the network. This crate defines the
//! contracts it is driven through (invoice persistence, master-list lookup),
//! the error model those contracts report in, and in-memory implementations
//! used by tests and the CLI.

pub mod cache;
pub mod error;
pub mod filter;
pub mod gateway;
pub mod in_memory;
pub mod master_list;
pub mod submit;

pub use cache::{Clock, ManualClock, SystemClock, TtlCache};
pub use error::{ApiError, ApiErrorKind};
pub use filter::{FilterCondition, LogicalOperator, Predicate, matches_all};
pub use gateway::InvoiceGateway;
pub use in_memory::{InMemoryInvoiceGateway, InMemoryMasterList};
pub use master_list::{
    Autopopulate, AutopopulateData, DEFAULT_TTL_SECS, DropdownOption, MasterList, MasterListSource,
};
pub use submit::{SubmitError, SubmitOptions, submit_invoice};
