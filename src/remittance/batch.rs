//! Mark-as-shipped and archive batch operations

use crate::traits::{ArchiveStore, BillingStore};
use crate::types::{BillingError, BillingResult, Charge};
use crate::utils::validation::validate_period_label;

/// Coordinates shipment batches and the archive-then-delete flow
pub struct RemittanceManager<S: BillingStore, A: ArchiveStore> {
    storage: S,
    archive: A,
}

impl<S: BillingStore, A: ArchiveStore> RemittanceManager<S, A> {
    /// Create a new remittance manager
    pub fn new(storage: S, archive: A) -> Self {
        Self { storage, archive }
    }

    /// Stamp a batch of charges with a shipment sequence number.
    ///
    /// Every existing charge in the set gets the sequence and the processed
    /// marker in one logical batch; unknown identifiers are skipped silently.
    /// Returns the number of charges actually updated.
    pub async fn mark_shipped(&self, charge_ids: &[String], sequence: &str) -> BillingResult<u64> {
        if charge_ids.is_empty() {
            return Err(BillingError::Validation(
                "No charge identifiers to mark as shipped".to_string(),
            ));
        }

        if sequence.trim().is_empty() {
            return Err(BillingError::Validation(
                "Shipment sequence value is required".to_string(),
            ));
        }

        let updated = self
            .storage
            .mark_charges_shipped(charge_ids, sequence)
            .await?;

        tracing::debug!(sequence, updated, "charges marked as shipped");
        Ok(updated)
    }

    /// Archive charge snapshots for a period, then delete the live rows.
    ///
    /// The archive write is best-effort: a failure is logged and deletion
    /// still runs, because the store is the system of record. A deletion
    /// failure fails the whole operation and names the targeted identifiers.
    /// The two steps run sequentially, never concurrently. Returns the
    /// number of deleted charges.
    pub async fn archive_charges(&self, charges: &[Charge], period: &str) -> BillingResult<u64> {
        if charges.is_empty() {
            return Err(BillingError::Validation(
                "No charges to archive".to_string(),
            ));
        }

        validate_period_label(period)?;

        if let Err(error) = self.archive.append(period, charges).await {
            tracing::warn!(period, %error, "archive write failed, proceeding with deletion");
        }

        let charge_ids: Vec<String> = charges.iter().map(|charge| charge.id.clone()).collect();
        match self.storage.delete_charges(&charge_ids).await {
            Ok(deleted) => Ok(deleted),
            Err(error) => Err(BillingError::Storage(format!(
                "Failed to delete archived charges [{}]: {error}",
                charge_ids.join(", ")
            ))),
        }
    }

    /// Archive file names, newest first
    pub async fn list_archives(&self) -> BillingResult<Vec<String>> {
        self.archive.list().await
    }

    /// Raw bytes of one archive file
    pub async fn read_archive(&self, name: &str) -> BillingResult<Vec<u8>> {
        self.archive.read(name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ArchiveStore;
    use crate::types::{ChargeStatus, NewCharge, NewCustomer, SHIPMENT_PROCESSED};
    use crate::types::{Customer, SHIPMENT_PENDING};
    use crate::utils::memory_storage::{MemoryArchive, MemoryStore};
    use async_trait::async_trait;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    /// Archive store whose writes always fail
    struct BrokenArchive;

    #[async_trait]
    impl ArchiveStore for BrokenArchive {
        async fn append(&self, _period: &str, _charges: &[Charge]) -> BillingResult<()> {
            Err(BillingError::Storage("disk full".to_string()))
        }

        async fn list(&self) -> BillingResult<Vec<String>> {
            Ok(Vec::new())
        }

        async fn read(&self, name: &str) -> BillingResult<Vec<u8>> {
            Err(BillingError::ArchiveNotFound(name.to_string()))
        }
    }

    async fn seeded_charges(storage: &MemoryStore, count: usize) -> Vec<Charge> {
        let customer = Customer::new(NewCustomer {
            name: "Ana".to_string(),
            email: None,
            phone: None,
            code: "C01".to_string(),
            bank_account: None,
        });
        storage.save_customer(&customer).await.unwrap();

        let mut charges = Vec::with_capacity(count);
        for index in 0..count {
            let charge = crate::types::Charge::new(NewCharge {
                customer_id: customer.id.clone(),
                description: format!("Mensalidade {index}"),
                amount: BigDecimal::from(100 + index as i64),
                due_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
                status: Some(ChargeStatus::Paid),
            });
            storage.save_charge(&charge).await.unwrap();
            charges.push(charge);
        }
        charges
    }

    #[tokio::test]
    async fn mark_shipped_validates_its_input() {
        let manager = RemittanceManager::new(MemoryStore::new(), MemoryArchive::new());

        let empty_set = manager.mark_shipped(&[], "04000001").await;
        assert!(matches!(empty_set, Err(BillingError::Validation(_))));

        let blank_sequence = manager.mark_shipped(&["c1".to_string()], "  ").await;
        assert!(matches!(blank_sequence, Err(BillingError::Validation(_))));
    }

    #[tokio::test]
    async fn mark_shipped_skips_unknown_identifiers_and_reports_the_count() {
        let storage = MemoryStore::new();
        let charges = seeded_charges(&storage, 2).await;
        let manager = RemittanceManager::new(storage.clone(), MemoryArchive::new());

        let ids = vec![
            charges[0].id.clone(),
            "ffffffffffffffff".to_string(),
            charges[1].id.clone(),
        ];
        let updated = manager.mark_shipped(&ids, "007").await.unwrap();
        assert_eq!(updated, 2);

        for charge in &charges {
            let stored = storage.get_charge(&charge.id).await.unwrap().unwrap();
            assert_eq!(stored.shipment_sequence.as_deref(), Some("007"));
            assert_eq!(stored.shipment_status, SHIPMENT_PROCESSED);
        }
    }

    #[tokio::test]
    async fn archive_validates_the_period_label() {
        let storage = MemoryStore::new();
        let charges = seeded_charges(&storage, 1).await;
        let manager = RemittanceManager::new(storage, MemoryArchive::new());

        let traversal = manager.archive_charges(&charges, "../etc").await;
        assert!(matches!(traversal, Err(BillingError::Validation(_))));

        let blank = manager.archive_charges(&charges, "  ").await;
        assert!(matches!(blank, Err(BillingError::Validation(_))));
    }

    #[tokio::test]
    async fn archive_writes_the_backup_and_deletes_the_rows() {
        let storage = MemoryStore::new();
        let charges = seeded_charges(&storage, 2).await;
        let archive = MemoryArchive::new();
        let manager = RemittanceManager::new(storage.clone(), archive);

        let deleted = manager.archive_charges(&charges, "2025-01").await.unwrap();
        assert_eq!(deleted, 2);

        let names = manager.list_archives().await.unwrap();
        assert_eq!(names, vec!["remessa_2025-01.json".to_string()]);

        for charge in &charges {
            assert!(storage.get_charge(&charge.id).await.unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn a_failed_archive_write_does_not_block_deletion() {
        let storage = MemoryStore::new();
        let charges = seeded_charges(&storage, 1).await;
        let manager = RemittanceManager::new(storage.clone(), BrokenArchive);

        let deleted = manager.archive_charges(&charges, "2025-01").await.unwrap();
        assert_eq!(deleted, 1);
        assert!(storage.get_charge(&charges[0].id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unshipped_charges_keep_the_pending_marker() {
        let storage = MemoryStore::new();
        let charges = seeded_charges(&storage, 1).await;
        assert_eq!(charges[0].shipment_status, SHIPMENT_PENDING);
    }
}
