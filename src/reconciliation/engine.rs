//! Concurrent application of return-file outcomes against the charge store

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::reconciliation::parser::parse_return_file;
use crate::traits::BillingStore;
use crate::types::{BillingError, BillingResult, ChargeStatus};

/// Tally of one reconciliation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationSummary {
    /// Well-formed transaction records seen
    pub processed: u64,
    /// Records resolved to paid
    pub paid: u64,
    /// Records resolved to rejected
    pub rejected: u64,
    /// Updates that failed (unknown identifier or storage error)
    pub update_failures: u64,
    /// Transaction records missing their identifier or occurrence code
    pub malformed: u64,
}

/// Applies parsed return-file outcomes to the charge store
pub struct ReconciliationEngine<S: BillingStore> {
    storage: S,
}

impl<S: BillingStore + Clone + 'static> ReconciliationEngine<S> {
    /// Create a new reconciliation engine
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Process a whole return file and report the aggregate tally.
    ///
    /// One update task runs per unique well-formed identifier; when a file
    /// lists the same identifier more than once, the last record in file
    /// order wins. The engine waits for every update before reporting.
    /// Individual update failures are counted, never escalated; the
    /// operation as a whole only fails when joining the update tasks fails.
    pub async fn process(&self, content: &[u8]) -> BillingResult<ReconciliationSummary> {
        let mut summary = ReconciliationSummary::default();
        let mut updates: HashMap<String, ChargeStatus> = HashMap::new();

        for outcome in parse_return_file(content) {
            match outcome.resolved_status() {
                Some(status) => {
                    summary.processed += 1;
                    match &status {
                        ChargeStatus::Paid => summary.paid += 1,
                        ChargeStatus::Rejected(_) => summary.rejected += 1,
                        ChargeStatus::Pending => {}
                    }
                    updates.insert(outcome.charge_id, status);
                }
                None => summary.malformed += 1,
            }
        }

        let mut tasks = Vec::with_capacity(updates.len());
        for (charge_id, status) in updates {
            let storage = self.storage.clone();
            tasks.push(tokio::spawn(async move {
                storage.set_charge_status(&charge_id, &status).await
            }));
        }

        for task in tasks {
            match task.await {
                Ok(Ok(())) => {}
                Ok(Err(error)) => {
                    tracing::debug!(%error, "return-file update failed");
                    summary.update_failures += 1;
                }
                Err(error) => {
                    return Err(BillingError::Storage(format!(
                        "Reconciliation update task failed: {error}"
                    )));
                }
            }
        }

        tracing::debug!(
            processed = summary.processed,
            paid = summary.paid,
            rejected = summary.rejected,
            update_failures = summary.update_failures,
            malformed = summary.malformed,
            "return file reconciled"
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Charge, NewCharge, NewCustomer};
    use crate::types::{ChargeStatus, Customer};
    use crate::utils::memory_storage::MemoryStore;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    fn record(charge_id: &str, occurrence_code: &str) -> String {
        format!("T{charge_id:<16}{occurrence_code}")
    }

    async fn seeded_charge(storage: &MemoryStore) -> Charge {
        let customer = Customer::new(NewCustomer {
            name: "Ana".to_string(),
            email: None,
            phone: None,
            code: "C01".to_string(),
            bank_account: None,
        });
        storage.save_customer(&customer).await.unwrap();

        let charge = Charge::new(NewCharge {
            customer_id: customer.id.clone(),
            description: "Mensalidade".to_string(),
            amount: BigDecimal::from(100),
            due_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            status: None,
        });
        storage.save_charge(&charge).await.unwrap();
        charge
    }

    #[tokio::test]
    async fn counts_failures_for_unknown_identifiers_without_aborting() {
        let storage = MemoryStore::new();
        let known = seeded_charge(&storage).await;
        let engine = ReconciliationEngine::new(storage.clone());

        let content = format!(
            "{}\n{}\n{}\n",
            record(&known.id, "00"),
            record("ffffffffffffffff", "07"),
            record("eeeeeeeeeeeeeeee", "00"),
        );

        let summary = engine.process(content.as_bytes()).await.unwrap();
        assert_eq!(summary.processed, 3);
        assert_eq!(summary.paid, 2);
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.update_failures, 2);
        assert_eq!(summary.malformed, 0);

        let updated = storage.get_charge(&known.id).await.unwrap().unwrap();
        assert_eq!(updated.status, ChargeStatus::Paid);
    }

    #[tokio::test]
    async fn malformed_records_are_counted_and_never_applied() {
        let storage = MemoryStore::new();
        let known = seeded_charge(&storage).await;
        let engine = ReconciliationEngine::new(storage.clone());

        let content = format!("Tshort\n{}\n", record(&known.id, "02"));

        let summary = engine.process(content.as_bytes()).await.unwrap();
        assert_eq!(summary.processed, 1);
        assert_eq!(summary.malformed, 1);
        assert_eq!(summary.update_failures, 0);

        let updated = storage.get_charge(&known.id).await.unwrap().unwrap();
        assert_eq!(updated.status, ChargeStatus::Rejected("02".to_string()));
    }

    #[tokio::test]
    async fn last_record_wins_for_a_duplicated_identifier() {
        let storage = MemoryStore::new();
        let known = seeded_charge(&storage).await;
        let engine = ReconciliationEngine::new(storage.clone());

        let content = format!("{}\n{}\n", record(&known.id, "00"), record(&known.id, "07"));

        let summary = engine.process(content.as_bytes()).await.unwrap();
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.paid, 1);
        assert_eq!(summary.rejected, 1);

        let updated = storage.get_charge(&known.id).await.unwrap().unwrap();
        assert_eq!(updated.status, ChargeStatus::Rejected("07".to_string()));
    }

    #[tokio::test]
    async fn reprocessing_the_same_file_is_idempotent() {
        let storage = MemoryStore::new();
        let known = seeded_charge(&storage).await;
        let engine = ReconciliationEngine::new(storage.clone());

        let content = record(&known.id, "00");

        let first = engine.process(content.as_bytes()).await.unwrap();
        let second = engine.process(content.as_bytes()).await.unwrap();
        assert_eq!(first, second);

        let updated = storage.get_charge(&known.id).await.unwrap().unwrap();
        assert_eq!(updated.status, ChargeStatus::Paid);
    }
}
