//! Traits for storage abstraction and extensibility

use async_trait::async_trait;
use bigdecimal::BigDecimal;

use crate::types::*;

/// Storage abstraction for the billing system
///
/// This trait allows the billing core to work with any relational backend
/// (PostgreSQL, MySQL, SQLite, in-memory, etc.) by implementing these methods.
/// Methods take `&self`: a single handle is shared by concurrently in-flight
/// operations, and the reconciliation engine fans out concurrent status
/// updates through it.
#[async_trait]
pub trait BillingStore: Send + Sync {
    /// Save a customer to storage
    async fn save_customer(&self, customer: &Customer) -> BillingResult<()>;

    /// Get a customer by ID
    async fn get_customer(&self, customer_id: &str) -> BillingResult<Option<Customer>>;

    /// List all customers, ordered by name ascending
    async fn list_customers(&self) -> BillingResult<Vec<Customer>>;

    /// Update a customer
    async fn update_customer(&self, customer: &Customer) -> BillingResult<()>;

    /// Delete a customer
    async fn delete_customer(&self, customer_id: &str) -> BillingResult<()>;

    /// Count the charges referencing a customer
    async fn count_customer_charges(&self, customer_id: &str) -> BillingResult<u64>;

    /// Save a charge to storage
    async fn save_charge(&self, charge: &Charge) -> BillingResult<()>;

    /// Get a charge by ID
    async fn get_charge(&self, charge_id: &str) -> BillingResult<Option<Charge>>;

    /// List all charges, ordered by due date descending
    async fn list_charges(&self) -> BillingResult<Vec<Charge>>;

    /// Update a charge
    async fn update_charge(&self, charge: &Charge) -> BillingResult<()>;

    /// Delete a charge
    async fn delete_charge(&self, charge_id: &str) -> BillingResult<()>;

    /// Delete a batch of charges in one logical operation.
    ///
    /// Rows for unknown identifiers are skipped, not errors. Returns the
    /// number of rows actually deleted.
    async fn delete_charges(&self, charge_ids: &[String]) -> BillingResult<u64>;

    /// Stamp a batch of charges with a shipment sequence in one logical
    /// operation.
    ///
    /// Every matching row gets `shipment_sequence` set to `sequence` and
    /// `shipment_status` set to the processed marker; unknown identifiers are
    /// skipped. Returns the number of rows actually updated.
    async fn mark_charges_shipped(
        &self,
        charge_ids: &[String],
        sequence: &str,
    ) -> BillingResult<u64>;

    /// Set the settlement status of one charge.
    ///
    /// Fails with [`BillingError::ChargeNotFound`] when the identifier is
    /// unknown.
    async fn set_charge_status(&self, charge_id: &str, status: &ChargeStatus) -> BillingResult<()>;

    /// Verify store connectivity
    async fn ping(&self) -> BillingResult<()>;

    /// Get the singleton configuration row, creating it with defaults if
    /// absent.
    ///
    /// Implementations must make the insert-if-absent-then-read atomic (e.g.
    /// a conditional insert guarded by the primary key) so concurrent first
    /// reads cannot create a duplicate row.
    async fn get_or_create_configuration(&self) -> BillingResult<Configuration>;

    /// Update the configuration row
    async fn update_configuration(&self, configuration: &Configuration) -> BillingResult<()>;
}

/// Storage abstraction for remittance archive documents
///
/// An archive is a convenience backup of charges removed from the live store,
/// one JSON document per shipment period.
#[async_trait]
pub trait ArchiveStore: Send + Sync {
    /// Append charge snapshots to the period's archive document.
    ///
    /// Read-merge-write: an existing document is parsed, extended, and
    /// rewritten whole so the archive always holds one well-formed JSON
    /// value. Concurrent appends to the same period are not serialized and
    /// can lose updates.
    async fn append(&self, period: &str, charges: &[Charge]) -> BillingResult<()>;

    /// Archive file names matching the naming convention, newest first
    async fn list(&self) -> BillingResult<Vec<String>>;

    /// Raw bytes of one archive file.
    ///
    /// Fails with [`BillingError::ArchiveNotFound`] when no such file exists.
    async fn read(&self, name: &str) -> BillingResult<Vec<u8>>;
}

/// Trait for implementing custom customer validation rules
pub trait CustomerValidator: Send + Sync {
    /// Validate a customer before saving
    fn validate_customer(&self, customer: &Customer) -> BillingResult<()>;
}

/// Trait for implementing custom charge validation rules
pub trait ChargeValidator: Send + Sync {
    /// Validate a charge before saving
    fn validate_charge(&self, charge: &Charge) -> BillingResult<()>;
}

/// Default customer validator with the required-field rules
pub struct DefaultCustomerValidator;

impl CustomerValidator for DefaultCustomerValidator {
    fn validate_customer(&self, customer: &Customer) -> BillingResult<()> {
        if customer.name.trim().is_empty() {
            return Err(BillingError::Validation(
                "Customer name cannot be empty".to_string(),
            ));
        }

        if customer.code.trim().is_empty() {
            return Err(BillingError::Validation(
                "Customer code cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Default charge validator with the required-field rules
pub struct DefaultChargeValidator;

impl ChargeValidator for DefaultChargeValidator {
    fn validate_charge(&self, charge: &Charge) -> BillingResult<()> {
        if charge.customer_id.trim().is_empty() {
            return Err(BillingError::Validation(
                "Charge customer cannot be empty".to_string(),
            ));
        }

        if charge.description.trim().is_empty() {
            return Err(BillingError::Validation(
                "Charge description cannot be empty".to_string(),
            ));
        }

        if charge.amount <= BigDecimal::from(0) {
            return Err(BillingError::Validation(
                "Charge amount must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
