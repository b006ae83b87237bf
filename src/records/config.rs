//! Configuration management functionality

use crate::traits::*;
use crate::types::*;

/// Manager for the singleton configuration record
pub struct ConfigurationManager<S: BillingStore> {
    storage: S,
}

impl<S: BillingStore> ConfigurationManager<S> {
    /// Create a new configuration manager
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Get the configuration, creating it with defaults on first read
    pub async fn get_configuration(&self) -> BillingResult<Configuration> {
        self.storage.get_or_create_configuration().await
    }

    /// Set the sequence counter on the configuration row with the given ID
    /// and return the persisted record.
    pub async fn update_last_sequence(
        &self,
        configuration_id: &str,
        last_sequence_number: i64,
    ) -> BillingResult<Configuration> {
        let mut configuration = self.storage.get_or_create_configuration().await?;

        if configuration.id != configuration_id {
            return Err(BillingError::ConfigurationNotFound(
                configuration_id.to_string(),
            ));
        }

        configuration.last_sequence_number = last_sequence_number;
        self.storage.update_configuration(&configuration).await?;

        Ok(configuration)
    }

    /// Advance the sequence counter and return the formatted shipment
    /// sequence value (NSA) for the new batch.
    pub async fn next_sequence(&self) -> BillingResult<String> {
        let mut configuration = self.storage.get_or_create_configuration().await?;

        configuration.last_sequence_number += 1;
        self.storage.update_configuration(&configuration).await?;

        Ok(configuration.formatted_sequence())
    }
}
