//! Validation utilities

use crate::traits::*;
use crate::types::*;
use bigdecimal::BigDecimal;

/// Validate that an amount is positive
pub fn validate_positive_amount(amount: &BigDecimal) -> BillingResult<()> {
    if *amount <= BigDecimal::from(0) {
        Err(BillingError::Validation(
            "Amount must be positive".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Validate that a required text field is present
pub fn validate_required_text(field: &str, value: &str) -> BillingResult<()> {
    if value.trim().is_empty() {
        return Err(BillingError::Validation(format!(
            "{field} cannot be empty"
        )));
    }

    Ok(())
}

/// Validate a customer business code (alphanumeric, dashes, underscores)
pub fn validate_customer_code(code: &str) -> BillingResult<()> {
    validate_required_text("Customer code", code)?;

    if code.len() > 50 {
        return Err(BillingError::Validation(
            "Customer code cannot exceed 50 characters".to_string(),
        ));
    }

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(BillingError::Validation(
            "Customer code can only contain alphanumeric characters, dashes, and underscores"
                .to_string(),
        ));
    }

    Ok(())
}

/// Validate a shipment period label.
///
/// The label becomes part of the archive file name, so it is restricted to
/// characters that cannot escape the archive directory.
pub fn validate_period_label(period: &str) -> BillingResult<()> {
    if period.trim().is_empty() {
        return Err(BillingError::Validation(
            "Shipment period label cannot be empty".to_string(),
        ));
    }

    if !period
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(BillingError::Validation(
            "Shipment period label can only contain alphanumeric characters, dashes, and underscores"
                .to_string(),
        ));
    }

    Ok(())
}

/// Enhanced customer validator with detailed checks
pub struct EnhancedCustomerValidator;

impl CustomerValidator for EnhancedCustomerValidator {
    fn validate_customer(&self, customer: &Customer) -> BillingResult<()> {
        // Basic validation
        DefaultCustomerValidator.validate_customer(customer)?;

        validate_customer_code(&customer.code)?;

        if customer.name.len() > 100 {
            return Err(BillingError::Validation(
                "Customer name cannot exceed 100 characters".to_string(),
            ));
        }

        Ok(())
    }
}

/// Enhanced charge validator with detailed checks
pub struct EnhancedChargeValidator;

impl ChargeValidator for EnhancedChargeValidator {
    fn validate_charge(&self, charge: &Charge) -> BillingResult<()> {
        // Basic validation
        DefaultChargeValidator.validate_charge(charge)?;

        validate_positive_amount(&charge.amount)?;

        if charge.description.len() > 500 {
            return Err(BillingError::Validation(
                "Charge description cannot exceed 500 characters".to_string(),
            ));
        }

        Ok(())
    }
}
