//! # Billing Core
//!
//! A billing-record management library providing customer and charge CRUD,
//! bank return-file reconciliation, and remittance batch processing.
//!
//! ## Features
//!
//! - **Customer management**: create, update, list, and restrict-on-delete
//! - **Charge management**: dated, decimal-amount charges with a settlement
//!   lifecycle (pending, paid, rejected)
//! - **Return-file reconciliation**: fixed-width bank file parsing and
//!   concurrent application of outcomes with per-line failure isolation
//! - **Remittance batches**: shipment sequence (NSA) stamping and
//!   archive-then-delete of completed charges
//! - **Singleton configuration**: lazily created sequence counter seed
//! - **Storage abstraction**: database-agnostic design with trait-based
//!   storage and archive backends
//!
//! ## Quick Start
//!
//! ```rust
//! use billing_core::utils::{MemoryArchive, MemoryStore};
//! use billing_core::{Billing, NewCustomer};
//!
//! // This example shows basic usage - production code implements the
//! // BillingStore and ArchiveStore traits over its own backends
//! // let billing = Billing::new(MemoryStore::new(), MemoryArchive::new());
//! ```

pub mod api;
pub mod reconciliation;
pub mod records;
pub mod remittance;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use reconciliation::*;
pub use records::*;
pub use remittance::*;
pub use traits::*;
pub use types::*;
