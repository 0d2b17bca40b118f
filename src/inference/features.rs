use serde::Serialize;

use super::schema::PredictRequest;

/// Column order every scorer is trained against.
pub const FEATURE_COLUMNS: [&str; 5] = [
    "amount",
    "currency",
    "country",
    "merchant_category",
    "device_type",
];

/// Flat, fixed-schema scorer input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRecord {
    pub amount: f64,
    pub currency: String,
    pub country: String,
    pub merchant_category: String,
    pub device_type: String,
}

/// Project a normalized request onto the scorer schema.
pub fn build_features(request: &PredictRequest) -> FeatureRecord {
    let txn = &request.transaction;
    FeatureRecord {
        amount: txn.amount,
        currency: txn.currency.clone(),
        country: txn.country.clone(),
        merchant_category: txn.merchant_category.clone(),
        device_type: txn.device_type.clone(),
    }
}
