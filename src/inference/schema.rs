use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::decision::{Decision, RiskScore};

/// Value assigned to optional categorical fields that were absent or blank.
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// One payment event, as accepted at the boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub transaction_id: String,
    pub user_id: String,
    pub amount: f64,
    pub currency: String,
    pub country: String,
    pub merchant_category: String,
    pub device_type: String,
}

/// A validated inference request. Construct through [`super::validation::validate_request`].
///
/// `request_id` keeps the caller's spelling so responses echo it unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictRequest {
    pub request_id: String,
    pub event_time: DateTime<Utc>,
    pub transaction: Transaction,
}

/// Result returned to the caller for a scored request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub request_id: String,
    pub decision: Decision,
    pub risk_score: RiskScore,
    pub model_version: String,
    pub processed_at: DateTime<Utc>,
}
