use super::schema::{PredictRequest, Transaction, UNKNOWN_CATEGORY};

/// Canonicalize the string fields of a validated request.
///
/// Returns a new request; identifiers are trimmed, ISO codes upper-cased and
/// categorical fields lower-cased with blanks folded to `"unknown"`.
pub fn normalize_request(request: &PredictRequest) -> PredictRequest {
    let txn = &request.transaction;
    PredictRequest {
        request_id: request.request_id.clone(),
        event_time: request.event_time,
        transaction: Transaction {
            transaction_id: txn.transaction_id.trim().to_string(),
            user_id: txn.user_id.trim().to_string(),
            amount: txn.amount,
            currency: txn.currency.trim().to_uppercase(),
            country: txn.country.trim().to_uppercase(),
            merchant_category: normalize_category(&txn.merchant_category),
            device_type: normalize_category(&txn.device_type),
        },
    }
}

fn normalize_category(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        UNKNOWN_CATEGORY.to_string()
    } else {
        trimmed.to_lowercase()
    }
}
