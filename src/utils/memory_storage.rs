//! In-memory storage implementations for testing

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use crate::api::wire::ArchiveDocument;
use crate::remittance::archive_file_name;
use crate::traits::*;
use crate::types::*;

/// In-memory billing store for testing and development
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    customers: Arc<RwLock<HashMap<String, Customer>>>,
    charges: Arc<RwLock<HashMap<String, Charge>>>,
    configuration: Arc<RwLock<Option<Configuration>>>,
}

impl MemoryStore {
    /// Create a new memory store instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        self.customers.write().unwrap().clear();
        self.charges.write().unwrap().clear();
        *self.configuration.write().unwrap() = None;
    }
}

#[async_trait]
impl BillingStore for MemoryStore {
    async fn save_customer(&self, customer: &Customer) -> BillingResult<()> {
        self.customers
            .write()
            .unwrap()
            .insert(customer.id.clone(), customer.clone());
        Ok(())
    }

    async fn get_customer(&self, customer_id: &str) -> BillingResult<Option<Customer>> {
        Ok(self.customers.read().unwrap().get(customer_id).cloned())
    }

    async fn list_customers(&self) -> BillingResult<Vec<Customer>> {
        let mut customers: Vec<Customer> =
            self.customers.read().unwrap().values().cloned().collect();
        customers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(customers)
    }

    async fn update_customer(&self, customer: &Customer) -> BillingResult<()> {
        let mut customers = self.customers.write().unwrap();
        if customers.contains_key(&customer.id) {
            customers.insert(customer.id.clone(), customer.clone());
            Ok(())
        } else {
            Err(BillingError::CustomerNotFound(customer.id.clone()))
        }
    }

    async fn delete_customer(&self, customer_id: &str) -> BillingResult<()> {
        if self.customers.write().unwrap().remove(customer_id).is_some() {
            Ok(())
        } else {
            Err(BillingError::CustomerNotFound(customer_id.to_string()))
        }
    }

    async fn count_customer_charges(&self, customer_id: &str) -> BillingResult<u64> {
        let count = self
            .charges
            .read()
            .unwrap()
            .values()
            .filter(|charge| charge.customer_id == customer_id)
            .count();
        Ok(count as u64)
    }

    async fn save_charge(&self, charge: &Charge) -> BillingResult<()> {
        self.charges
            .write()
            .unwrap()
            .insert(charge.id.clone(), charge.clone());
        Ok(())
    }

    async fn get_charge(&self, charge_id: &str) -> BillingResult<Option<Charge>> {
        Ok(self.charges.read().unwrap().get(charge_id).cloned())
    }

    async fn list_charges(&self) -> BillingResult<Vec<Charge>> {
        let mut charges: Vec<Charge> = self.charges.read().unwrap().values().cloned().collect();
        charges.sort_by(|a, b| b.due_date.cmp(&a.due_date));
        Ok(charges)
    }

    async fn update_charge(&self, charge: &Charge) -> BillingResult<()> {
        let mut charges = self.charges.write().unwrap();
        if charges.contains_key(&charge.id) {
            charges.insert(charge.id.clone(), charge.clone());
            Ok(())
        } else {
            Err(BillingError::ChargeNotFound(charge.id.clone()))
        }
    }

    async fn delete_charge(&self, charge_id: &str) -> BillingResult<()> {
        if self.charges.write().unwrap().remove(charge_id).is_some() {
            Ok(())
        } else {
            Err(BillingError::ChargeNotFound(charge_id.to_string()))
        }
    }

    async fn delete_charges(&self, charge_ids: &[String]) -> BillingResult<u64> {
        let mut charges = self.charges.write().unwrap();
        let mut deleted = 0;
        for charge_id in charge_ids {
            if charges.remove(charge_id).is_some() {
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    async fn mark_charges_shipped(
        &self,
        charge_ids: &[String],
        sequence: &str,
    ) -> BillingResult<u64> {
        let mut charges = self.charges.write().unwrap();
        let mut updated = 0;
        for charge_id in charge_ids {
            if let Some(charge) = charges.get_mut(charge_id) {
                charge.mark_shipped(sequence);
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn set_charge_status(&self, charge_id: &str, status: &ChargeStatus) -> BillingResult<()> {
        let mut charges = self.charges.write().unwrap();
        match charges.get_mut(charge_id) {
            Some(charge) => {
                charge.status = status.clone();
                charge.updated_at = chrono::Utc::now().naive_utc();
                Ok(())
            }
            None => Err(BillingError::ChargeNotFound(charge_id.to_string())),
        }
    }

    async fn ping(&self) -> BillingResult<()> {
        Ok(())
    }

    async fn get_or_create_configuration(&self) -> BillingResult<Configuration> {
        // The write lock spans the whole insert-if-absent-then-read, so
        // concurrent first reads cannot create a duplicate row
        let mut configuration = self.configuration.write().unwrap();
        Ok(configuration
            .get_or_insert_with(Configuration::default)
            .clone())
    }

    async fn update_configuration(&self, configuration: &Configuration) -> BillingResult<()> {
        let mut slot = self.configuration.write().unwrap();
        match slot.as_ref() {
            Some(current) if current.id == configuration.id => {
                *slot = Some(configuration.clone());
                Ok(())
            }
            _ => Err(BillingError::ConfigurationNotFound(
                configuration.id.clone(),
            )),
        }
    }
}

/// In-memory archive store for testing and development
#[derive(Debug, Clone, Default)]
pub struct MemoryArchive {
    files: Arc<RwLock<BTreeMap<String, Vec<Charge>>>>,
}

impl MemoryArchive {
    /// Create a new memory archive instance
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ArchiveStore for MemoryArchive {
    async fn append(&self, period: &str, charges: &[Charge]) -> BillingResult<()> {
        self.files
            .write()
            .unwrap()
            .entry(archive_file_name(period))
            .or_default()
            .extend(charges.iter().cloned());
        Ok(())
    }

    async fn list(&self) -> BillingResult<Vec<String>> {
        // Keys are sorted ascending; newest first means reversed
        Ok(self.files.read().unwrap().keys().rev().cloned().collect())
    }

    async fn read(&self, name: &str) -> BillingResult<Vec<u8>> {
        let files = self.files.read().unwrap();
        let charges = files
            .get(name)
            .ok_or_else(|| BillingError::ArchiveNotFound(name.to_string()))?;

        let document = ArchiveDocument {
            cobrancas: charges.iter().cloned().map(Into::into).collect(),
        };
        serde_json::to_vec_pretty(&document)
            .map_err(|error| BillingError::Storage(error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    fn customer(name: &str, code: &str) -> Customer {
        Customer::new(NewCustomer {
            name: name.to_string(),
            email: None,
            phone: None,
            code: code.to_string(),
            bank_account: None,
        })
    }

    fn charge(customer_id: &str, due: NaiveDate) -> Charge {
        Charge::new(NewCharge {
            customer_id: customer_id.to_string(),
            description: "Mensalidade".to_string(),
            amount: BigDecimal::from(100),
            due_date: due,
            status: None,
        })
    }

    #[tokio::test]
    async fn customers_list_ordered_by_name() {
        let store = MemoryStore::new();
        store.save_customer(&customer("Carla", "C3")).await.unwrap();
        store.save_customer(&customer("Ana", "C1")).await.unwrap();
        store.save_customer(&customer("Bruno", "C2")).await.unwrap();

        let names: Vec<String> = store
            .list_customers()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Ana", "Bruno", "Carla"]);
    }

    #[tokio::test]
    async fn charges_list_ordered_by_due_date_descending() {
        let store = MemoryStore::new();
        let old = charge("c1", NaiveDate::from_ymd_opt(2025, 1, 5).unwrap());
        let recent = charge("c1", NaiveDate::from_ymd_opt(2025, 3, 5).unwrap());
        store.save_charge(&old).await.unwrap();
        store.save_charge(&recent).await.unwrap();

        let listed = store.list_charges().await.unwrap();
        assert_eq!(listed[0].id, recent.id);
        assert_eq!(listed[1].id, old.id);
    }

    #[tokio::test]
    async fn set_charge_status_fails_for_unknown_identifiers() {
        let store = MemoryStore::new();
        let result = store
            .set_charge_status("ffffffffffffffff", &ChargeStatus::Paid)
            .await;
        assert!(matches!(result, Err(BillingError::ChargeNotFound(_))));
    }

    #[tokio::test]
    async fn configuration_is_created_once() {
        let store = MemoryStore::new();
        let first = store.get_or_create_configuration().await.unwrap();
        let second = store.get_or_create_configuration().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.last_sequence_number, 0);
    }

    #[tokio::test]
    async fn memory_archive_appends_and_lists_newest_first() {
        let archive = MemoryArchive::new();
        let sample = charge("c1", NaiveDate::from_ymd_opt(2025, 1, 5).unwrap());

        archive.append("2024-12", &[sample.clone()]).await.unwrap();
        archive.append("2025-01", &[sample.clone()]).await.unwrap();
        archive.append("2025-01", &[sample]).await.unwrap();

        let names = archive.list().await.unwrap();
        assert_eq!(
            names,
            vec![
                "remessa_2025-01.json".to_string(),
                "remessa_2024-12.json".to_string(),
            ]
        );

        let bytes = archive.read("remessa_2025-01.json").await.unwrap();
        let document: ArchiveDocument = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(document.cobrancas.len(), 2);
    }
}
