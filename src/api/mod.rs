//! Client-facing wire contract
//!
//! The HTTP edge is an external collaborator; this module fixes the JSON
//! shapes it exchanges and the status code each error maps to, so every
//! transport binds to the same contract. The return-file upload reaches the
//! edge as multipart form data under the field name `arquivoRetorno`; the
//! reconciliation engine consumes the raw bytes.

pub mod wire;

pub use wire::*;

use serde::{Deserialize, Serialize};

use crate::reconciliation::ReconciliationSummary;
use crate::types::BillingError;

/// HTTP status the edge should answer with for a given error
pub fn http_status(error: &BillingError) -> u16 {
    match error {
        BillingError::Validation(_) => 400,
        BillingError::CustomerNotFound(_)
        | BillingError::ChargeNotFound(_)
        | BillingError::ConfigurationNotFound(_)
        | BillingError::ArchiveNotFound(_) => 404,
        BillingError::Storage(_) => 500,
    }
}

/// Body of a successful batch operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

/// Body of every error response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl From<&BillingError> for ErrorBody {
    fn from(error: &BillingError) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}

/// Body answering a processed return file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnSummaryBody {
    pub detalhes: ReconciliationSummary,
}
