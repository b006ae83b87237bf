//! Customer management functionality

use crate::traits::*;
use crate::types::*;

/// Customer manager for handling customer record operations
pub struct CustomerManager<S: BillingStore> {
    pub(crate) storage: S,
    validator: Box<dyn CustomerValidator>,
}

impl<S: BillingStore> CustomerManager<S> {
    /// Create a new customer manager
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            validator: Box::new(DefaultCustomerValidator),
        }
    }

    /// Create a new customer manager with a custom validator
    pub fn with_validator(storage: S, validator: Box<dyn CustomerValidator>) -> Self {
        Self { storage, validator }
    }

    /// Create a new customer and return the persisted record
    pub async fn create_customer(&self, fields: NewCustomer) -> BillingResult<Customer> {
        let customer = Customer::new(fields);

        // Validate the customer
        self.validator.validate_customer(&customer)?;

        // Save the customer
        self.storage.save_customer(&customer).await?;

        Ok(customer)
    }

    /// Get a customer by ID
    pub async fn get_customer(&self, customer_id: &str) -> BillingResult<Option<Customer>> {
        self.storage.get_customer(customer_id).await
    }

    /// Get a customer by ID, returning an error if not found
    pub async fn get_customer_required(&self, customer_id: &str) -> BillingResult<Customer> {
        self.storage
            .get_customer(customer_id)
            .await?
            .ok_or_else(|| BillingError::CustomerNotFound(customer_id.to_string()))
    }

    /// List all customers, ordered by name ascending
    pub async fn list_customers(&self) -> BillingResult<Vec<Customer>> {
        self.storage.list_customers().await
    }

    /// Update a customer and return the persisted record
    pub async fn update_customer(
        &self,
        customer_id: &str,
        fields: NewCustomer,
    ) -> BillingResult<Customer> {
        let mut customer = self.get_customer_required(customer_id).await?;
        customer.apply(fields);

        // Validate the updated customer
        self.validator.validate_customer(&customer)?;

        self.storage.update_customer(&customer).await?;

        Ok(customer)
    }

    /// Delete a customer.
    ///
    /// Deletion is restricted while any charge still references the customer.
    pub async fn delete_customer(&self, customer_id: &str) -> BillingResult<()> {
        let customer = self.get_customer_required(customer_id).await?;

        let referenced = self.storage.count_customer_charges(&customer.id).await?;
        if referenced > 0 {
            return Err(BillingError::Validation(format!(
                "Customer '{}' still has {} charge(s) and cannot be deleted",
                customer.id, referenced
            )));
        }

        self.storage.delete_customer(&customer.id).await
    }
}
