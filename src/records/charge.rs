//! Charge management functionality

use crate::traits::*;
use crate::types::*;

/// Charge manager for handling charge record operations
pub struct ChargeManager<S: BillingStore> {
    storage: S,
    validator: Box<dyn ChargeValidator>,
}

impl<S: BillingStore> ChargeManager<S> {
    /// Create a new charge manager
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            validator: Box::new(DefaultChargeValidator),
        }
    }

    /// Create a new charge manager with a custom validator
    pub fn with_validator(storage: S, validator: Box<dyn ChargeValidator>) -> Self {
        Self { storage, validator }
    }

    /// Create a new charge and return the persisted record.
    ///
    /// The referenced customer must exist; status defaults to
    /// [`ChargeStatus::Pending`] when omitted.
    pub async fn create_charge(&self, fields: NewCharge) -> BillingResult<Charge> {
        // Verify the referenced customer exists
        if self.storage.get_customer(&fields.customer_id).await?.is_none() {
            return Err(BillingError::CustomerNotFound(fields.customer_id));
        }

        let charge = Charge::new(fields);

        // Validate the charge
        self.validator.validate_charge(&charge)?;

        // Save the charge
        self.storage.save_charge(&charge).await?;

        Ok(charge)
    }

    /// Get a charge by ID
    pub async fn get_charge(&self, charge_id: &str) -> BillingResult<Option<Charge>> {
        self.storage.get_charge(charge_id).await
    }

    /// Get a charge by ID, returning an error if not found
    pub async fn get_charge_required(&self, charge_id: &str) -> BillingResult<Charge> {
        self.storage
            .get_charge(charge_id)
            .await?
            .ok_or_else(|| BillingError::ChargeNotFound(charge_id.to_string()))
    }

    /// List all charges, ordered by due date descending
    pub async fn list_charges(&self) -> BillingResult<Vec<Charge>> {
        self.storage.list_charges().await
    }

    /// Update a charge and return the persisted record.
    ///
    /// Core fields are replaced; shipment fields are preserved so an assigned
    /// shipment sequence is never cleared by an update.
    pub async fn update_charge(&self, charge_id: &str, fields: NewCharge) -> BillingResult<Charge> {
        let mut charge = self.get_charge_required(charge_id).await?;

        // Verify the referenced customer exists
        if self.storage.get_customer(&fields.customer_id).await?.is_none() {
            return Err(BillingError::CustomerNotFound(fields.customer_id));
        }

        charge.apply(fields);

        // Validate the updated charge
        self.validator.validate_charge(&charge)?;

        self.storage.update_charge(&charge).await?;

        Ok(charge)
    }

    /// Delete a charge
    pub async fn delete_charge(&self, charge_id: &str) -> BillingResult<()> {
        // Ensure the charge exists
        if self.storage.get_charge(charge_id).await?.is_none() {
            return Err(BillingError::ChargeNotFound(charge_id.to_string()));
        }

        self.storage.delete_charge(charge_id).await
    }
}
