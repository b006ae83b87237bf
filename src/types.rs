//! Core types and data structures for the billing system

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed identifier of the singleton configuration record
pub const CONFIGURATION_ID: &str = "1";

/// Default fixed component of generated shipment sequence numbers
pub const DEFAULT_SEQUENCE_PREFIX: &str = "04";

/// Shipment marker of a charge that has not been batched yet
pub const SHIPMENT_PENDING: &str = "N/A";

/// Shipment marker set when a charge is included in a remittance batch
pub const SHIPMENT_PROCESSED: &str = "Processed";

/// Width of server-generated record identifiers.
///
/// Identifiers are 16 characters so a charge id exactly fills the fixed-width
/// identifier field of a bank return-file transaction record.
pub const RECORD_ID_LENGTH: usize = 16;

/// Generate a new record identifier
pub(crate) fn generate_record_id() -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    hex[..RECORD_ID_LENGTH].to_string()
}

/// Status of a charge through its collection lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChargeStatus {
    /// Awaiting settlement
    #[default]
    Pending,
    /// Settled by the bank
    Paid,
    /// Refused by the bank, with the occurrence code it reported
    Rejected(String),
}

impl fmt::Display for ChargeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChargeStatus::Pending => f.write_str("Pendente"),
            ChargeStatus::Paid => f.write_str("Pago"),
            ChargeStatus::Rejected(code) => write!(f, "Rejeitado ({code})"),
        }
    }
}

impl FromStr for ChargeStatus {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "Pendente" => Ok(ChargeStatus::Pending),
            "Pago" => Ok(ChargeStatus::Paid),
            _ => {
                if let Some(rest) = s.strip_prefix("Rejeitado") {
                    let code = rest
                        .trim()
                        .trim_start_matches('(')
                        .trim_end_matches(')')
                        .trim();
                    if !code.is_empty() {
                        return Ok(ChargeStatus::Rejected(code.to_string()));
                    }
                }
                Err(BillingError::Validation(format!(
                    "Unknown charge status: '{s}'"
                )))
            }
        }
    }
}

impl Serialize for ChargeStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ChargeStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// Core customer record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Unique identifier, generated server-side
    pub id: String,
    /// Customer name
    pub name: String,
    /// Contact email
    pub email: Option<String>,
    /// Contact phone number
    pub phone: Option<String>,
    /// Business identifier, distinct from `id`
    pub code: String,
    /// Bank account used for collection
    pub bank_account: Option<String>,
    /// When the customer was created
    pub created_at: NaiveDateTime,
    /// When the customer was last updated
    pub updated_at: NaiveDateTime,
}

impl Customer {
    /// Create a new customer record with a generated identifier
    pub fn new(fields: NewCustomer) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: generate_record_id(),
            name: fields.name,
            email: fields.email,
            phone: fields.phone,
            code: fields.code,
            bank_account: fields.bank_account,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the mutable fields, keeping identifier and creation time
    pub fn apply(&mut self, fields: NewCustomer) {
        self.name = fields.name;
        self.email = fields.email;
        self.phone = fields.phone;
        self.code = fields.code;
        self.bank_account = fields.bank_account;
        self.updated_at = chrono::Utc::now().naive_utc();
    }
}

/// Fields for creating or updating a customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCustomer {
    /// Customer name (required)
    pub name: String,
    /// Contact email
    pub email: Option<String>,
    /// Contact phone number
    pub phone: Option<String>,
    /// Business identifier (required)
    pub code: String,
    /// Bank account used for collection
    pub bank_account: Option<String>,
}

/// Core charge record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Charge {
    /// Unique identifier, generated server-side
    pub id: String,
    /// Customer the charge bills
    pub customer_id: String,
    /// What the charge is for
    pub description: String,
    /// Amount due, always positive
    pub amount: BigDecimal,
    /// Calendar date the charge falls due
    pub due_date: NaiveDate,
    /// Settlement status
    pub status: ChargeStatus,
    /// Remittance marker, [`SHIPMENT_PENDING`] until batched
    pub shipment_status: String,
    /// Shipment sequence number (NSA) assigned at batching time.
    /// Once set it is never cleared by normal flows.
    pub shipment_sequence: Option<String>,
    /// When the charge was created
    pub created_at: NaiveDateTime,
    /// When the charge was last updated
    pub updated_at: NaiveDateTime,
}

impl Charge {
    /// Create a new charge record with a generated identifier
    pub fn new(fields: NewCharge) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: generate_record_id(),
            customer_id: fields.customer_id,
            description: fields.description,
            amount: fields.amount,
            due_date: fields.due_date,
            status: fields.status.unwrap_or_default(),
            shipment_status: SHIPMENT_PENDING.to_string(),
            shipment_sequence: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the core fields. Shipment fields are preserved; a `None`
    /// status keeps the current one.
    pub fn apply(&mut self, fields: NewCharge) {
        self.customer_id = fields.customer_id;
        self.description = fields.description;
        self.amount = fields.amount;
        self.due_date = fields.due_date;
        if let Some(status) = fields.status {
            self.status = status;
        }
        self.updated_at = chrono::Utc::now().naive_utc();
    }

    /// Stamp the charge with a shipment sequence and the processed marker
    pub fn mark_shipped(&mut self, sequence: &str) {
        self.shipment_sequence = Some(sequence.to_string());
        self.shipment_status = SHIPMENT_PROCESSED.to_string();
        self.updated_at = chrono::Utc::now().naive_utc();
    }
}

/// Fields for creating or updating a charge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCharge {
    /// Customer the charge bills (required)
    pub customer_id: String,
    /// What the charge is for (required)
    pub description: String,
    /// Amount due (required, positive)
    pub amount: BigDecimal,
    /// Calendar date the charge falls due (required)
    pub due_date: NaiveDate,
    /// Settlement status; defaults to [`ChargeStatus::Pending`] on creation
    pub status: Option<ChargeStatus>,
}

/// Singleton configuration record seeding shipment sequence generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Fixed identifier of the singleton row
    pub id: String,
    /// Monotonic counter seed for NSA generation
    pub last_sequence_number: i64,
    /// Stable string component of generated NSAs
    pub fixed_sequence_prefix: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            id: CONFIGURATION_ID.to_string(),
            last_sequence_number: 0,
            fixed_sequence_prefix: DEFAULT_SEQUENCE_PREFIX.to_string(),
        }
    }
}

impl Configuration {
    /// Shipment sequence value for the current counter, e.g. `"04000001"`
    pub fn formatted_sequence(&self) -> String {
        format!(
            "{}{:06}",
            self.fixed_sequence_prefix, self.last_sequence_number
        )
    }
}

/// Errors that can occur in the billing system
#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),
    #[error("Charge not found: {0}")]
    ChargeNotFound(String),
    #[error("Configuration not found: {0}")]
    ConfigurationNotFound(String),
    #[error("Archive not found: {0}")]
    ArchiveNotFound(String),
}

/// Result type for billing operations
pub type BillingResult<T> = Result<T, BillingError>;
