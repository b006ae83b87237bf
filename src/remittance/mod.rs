//! Remittance batch operations
//!
//! A remittance is an outbound batch of charges sent to the bank for
//! collection, tracked on each charge through its shipment status and
//! sequence number. When a remittance cycle completes, the charges are
//! archived to a JSON backup and removed from the live store.

pub mod batch;
pub mod fs_store;

pub use batch::*;
pub use fs_store::*;

pub(crate) const ARCHIVE_PREFIX: &str = "remessa_";
pub(crate) const ARCHIVE_SUFFIX: &str = ".json";

/// Archive file name for a shipment period
pub fn archive_file_name(period: &str) -> String {
    format!("{ARCHIVE_PREFIX}{period}{ARCHIVE_SUFFIX}")
}
