//! Main billing orchestrator that coordinates records, reconciliation, and
//! remittance batches

use crate::reconciliation::{ReconciliationEngine, ReconciliationSummary};
use crate::records::{ChargeManager, ConfigurationManager, CustomerManager};
use crate::remittance::RemittanceManager;
use crate::traits::*;
use crate::types::*;

/// Main billing system that orchestrates all record and batch operations
pub struct Billing<S: BillingStore, A: ArchiveStore> {
    customer_manager: CustomerManager<S>,
    charge_manager: ChargeManager<S>,
    configuration_manager: ConfigurationManager<S>,
    reconciliation_engine: ReconciliationEngine<S>,
    remittance_manager: RemittanceManager<S, A>,
}

impl<S, A> Billing<S, A>
where
    S: BillingStore + Clone + 'static,
    A: ArchiveStore,
{
    /// Create a new billing system with the given storage and archive
    /// backends
    pub fn new(storage: S, archive: A) -> Self {
        Self {
            customer_manager: CustomerManager::new(storage.clone()),
            charge_manager: ChargeManager::new(storage.clone()),
            configuration_manager: ConfigurationManager::new(storage.clone()),
            reconciliation_engine: ReconciliationEngine::new(storage.clone()),
            remittance_manager: RemittanceManager::new(storage, archive),
        }
    }

    /// Create a new billing system with custom validators
    pub fn with_validators(
        storage: S,
        archive: A,
        customer_validator: Box<dyn CustomerValidator>,
        charge_validator: Box<dyn ChargeValidator>,
    ) -> Self {
        Self {
            customer_manager: CustomerManager::with_validator(
                storage.clone(),
                customer_validator,
            ),
            charge_manager: ChargeManager::with_validator(storage.clone(), charge_validator),
            configuration_manager: ConfigurationManager::new(storage.clone()),
            reconciliation_engine: ReconciliationEngine::new(storage.clone()),
            remittance_manager: RemittanceManager::new(storage, archive),
        }
    }

    // Customer operations
    /// Create a new customer
    pub async fn create_customer(&self, fields: NewCustomer) -> BillingResult<Customer> {
        self.customer_manager.create_customer(fields).await
    }

    /// Get a customer by ID
    pub async fn get_customer(&self, customer_id: &str) -> BillingResult<Option<Customer>> {
        self.customer_manager.get_customer(customer_id).await
    }

    /// List all customers, ordered by name ascending
    pub async fn list_customers(&self) -> BillingResult<Vec<Customer>> {
        self.customer_manager.list_customers().await
    }

    /// Update a customer
    pub async fn update_customer(
        &self,
        customer_id: &str,
        fields: NewCustomer,
    ) -> BillingResult<Customer> {
        self.customer_manager
            .update_customer(customer_id, fields)
            .await
    }

    /// Delete a customer; restricted while charges still reference it
    pub async fn delete_customer(&self, customer_id: &str) -> BillingResult<()> {
        self.customer_manager.delete_customer(customer_id).await
    }

    // Charge operations
    /// Create a new charge
    pub async fn create_charge(&self, fields: NewCharge) -> BillingResult<Charge> {
        self.charge_manager.create_charge(fields).await
    }

    /// Get a charge by ID
    pub async fn get_charge(&self, charge_id: &str) -> BillingResult<Option<Charge>> {
        self.charge_manager.get_charge(charge_id).await
    }

    /// List all charges, ordered by due date descending
    pub async fn list_charges(&self) -> BillingResult<Vec<Charge>> {
        self.charge_manager.list_charges().await
    }

    /// Update a charge; shipment fields are preserved
    pub async fn update_charge(&self, charge_id: &str, fields: NewCharge) -> BillingResult<Charge> {
        self.charge_manager.update_charge(charge_id, fields).await
    }

    /// Delete a charge
    pub async fn delete_charge(&self, charge_id: &str) -> BillingResult<()> {
        self.charge_manager.delete_charge(charge_id).await
    }

    // Configuration operations
    /// Get the configuration, creating it with defaults on first read
    pub async fn configuration(&self) -> BillingResult<Configuration> {
        self.configuration_manager.get_configuration().await
    }

    /// Set the sequence counter on the configuration row with the given ID
    pub async fn update_configuration_sequence(
        &self,
        configuration_id: &str,
        last_sequence_number: i64,
    ) -> BillingResult<Configuration> {
        self.configuration_manager
            .update_last_sequence(configuration_id, last_sequence_number)
            .await
    }

    /// Advance the counter and return the next shipment sequence value (NSA)
    pub async fn next_shipment_sequence(&self) -> BillingResult<String> {
        self.configuration_manager.next_sequence().await
    }

    /// Liveness check: verify the storage backend is reachable
    pub async fn health(&self) -> BillingResult<()> {
        self.customer_manager.storage.ping().await
    }

    // Reconciliation operations
    /// Parse a bank return file and apply its outcomes to the charges
    pub async fn process_return_file(
        &self,
        content: &[u8],
    ) -> BillingResult<ReconciliationSummary> {
        self.reconciliation_engine.process(content).await
    }

    // Remittance operations
    /// Mark a batch of charges as shipped under a sequence number
    pub async fn mark_charges_shipped(
        &self,
        charge_ids: &[String],
        sequence: &str,
    ) -> BillingResult<u64> {
        self.remittance_manager
            .mark_shipped(charge_ids, sequence)
            .await
    }

    /// Archive charge snapshots for a period and delete the live rows
    pub async fn archive_charges(&self, charges: &[Charge], period: &str) -> BillingResult<u64> {
        self.remittance_manager
            .archive_charges(charges, period)
            .await
    }

    /// Archive file names, newest first
    pub async fn list_archives(&self) -> BillingResult<Vec<String>> {
        self.remittance_manager.list_archives().await
    }

    /// Raw bytes of one archive file
    pub async fn read_archive(&self, name: &str) -> BillingResult<Vec<u8>> {
        self.remittance_manager.read_archive(name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::memory_storage::{MemoryArchive, MemoryStore};
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    fn billing() -> Billing<MemoryStore, MemoryArchive> {
        Billing::new(MemoryStore::new(), MemoryArchive::new())
    }

    #[tokio::test]
    async fn basic_billing_workflow() {
        let billing = billing();

        let customer = billing
            .create_customer(NewCustomer {
                name: "Ana".to_string(),
                email: Some("ana@example.com".to_string()),
                phone: None,
                code: "C01".to_string(),
                bank_account: Some("12345-6".to_string()),
            })
            .await
            .unwrap();

        let charge = billing
            .create_charge(NewCharge {
                customer_id: customer.id.clone(),
                description: "Mensalidade janeiro".to_string(),
                amount: BigDecimal::from(450),
                due_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
                status: None,
            })
            .await
            .unwrap();

        assert_eq!(charge.status, ChargeStatus::Pending);

        // Ship the charge under a generated sequence
        let sequence = billing.next_shipment_sequence().await.unwrap();
        assert_eq!(sequence, "04000001");

        let updated = billing
            .mark_charges_shipped(&[charge.id.clone()], &sequence)
            .await
            .unwrap();
        assert_eq!(updated, 1);

        // The bank confirms payment
        let content = format!("T{:<16}00", charge.id);
        let summary = billing.process_return_file(content.as_bytes()).await.unwrap();
        assert_eq!(summary.processed, 1);
        assert_eq!(summary.paid, 1);
        assert_eq!(summary.update_failures, 0);

        // Close the cycle: archive and remove the settled charge
        let settled = billing.get_charge(&charge.id).await.unwrap().unwrap();
        assert_eq!(settled.status, ChargeStatus::Paid);

        let deleted = billing.archive_charges(&[settled], "2025-01").await.unwrap();
        assert_eq!(deleted, 1);
        assert!(billing.list_charges().await.unwrap().is_empty());
        assert_eq!(
            billing.list_archives().await.unwrap(),
            vec!["remessa_2025-01.json".to_string()]
        );
    }

    #[tokio::test]
    async fn configuration_singleton_survives_concurrent_first_reads() {
        let billing = billing();

        let (first, second) = tokio::join!(billing.configuration(), billing.configuration());
        let first = first.unwrap();
        let second = second.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.id, CONFIGURATION_ID);
        assert_eq!(first.last_sequence_number, 0);
    }

    #[tokio::test]
    async fn custom_validators_are_applied() {
        let billing = Billing::with_validators(
            MemoryStore::new(),
            MemoryArchive::new(),
            Box::new(crate::utils::validation::EnhancedCustomerValidator),
            Box::new(crate::utils::validation::EnhancedChargeValidator),
        );

        let result = billing
            .create_customer(NewCustomer {
                name: "Ana".to_string(),
                email: None,
                phone: None,
                code: "bad code".to_string(),
                bank_account: None,
            })
            .await;
        assert!(matches!(result, Err(BillingError::Validation(_))));
    }
}
