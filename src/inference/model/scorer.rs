use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::inference::features::FeatureRecord;

/// Capability every concrete model must provide: one feature record in, one
/// risk probability out.
pub trait Scorer: Send + Sync {
    fn score(&self, features: &FeatureRecord) -> Result<f64, ScorerError>;
}

/// Failure raised from inside a scorer implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("scorer failed: {0}")]
pub struct ScorerError(pub String);

/// Scorer definition as stored in a model artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScorerSpec {
    Constant {
        score: f64,
    },
    Logistic {
        intercept: f64,
        amount_weight: f64,
        #[serde(default)]
        currency: HashMap<String, f64>,
        #[serde(default)]
        country: HashMap<String, f64>,
        #[serde(default)]
        merchant_category: HashMap<String, f64>,
        #[serde(default)]
        device_type: HashMap<String, f64>,
    },
}

impl ScorerSpec {
    /// Instantiate the scorer, rejecting parameters that can never produce a usable score.
    pub fn build(self) -> Result<Box<dyn Scorer>, String> {
        match self {
            ScorerSpec::Constant { score } => {
                if !(0.0..=1.0).contains(&score) {
                    return Err(format!("constant score {score} is outside [0, 1]"));
                }
                Ok(Box::new(ConstantScorer { score }))
            }
            ScorerSpec::Logistic {
                intercept,
                amount_weight,
                currency,
                country,
                merchant_category,
                device_type,
            } => {
                let weights = [intercept, amount_weight]
                    .into_iter()
                    .chain(currency.values().copied())
                    .chain(country.values().copied())
                    .chain(merchant_category.values().copied())
                    .chain(device_type.values().copied());
                for weight in weights {
                    if !weight.is_finite() {
                        return Err("logistic weights must be finite".to_string());
                    }
                }
                Ok(Box::new(LogisticScorer {
                    intercept,
                    amount_weight,
                    currency,
                    country,
                    merchant_category,
                    device_type,
                }))
            }
        }
    }
}

/// Returns the same probability for every input.
#[derive(Debug, Clone)]
pub struct ConstantScorer {
    score: f64,
}

impl ConstantScorer {
    pub fn new(score: f64) -> Self {
        Self { score }
    }
}

impl Scorer for ConstantScorer {
    fn score(&self, _features: &FeatureRecord) -> Result<f64, ScorerError> {
        Ok(self.score)
    }
}

/// Logistic model over `ln(1 + amount)` with additive offsets per categorical value.
///
/// Values missing from an offset table contribute nothing.
#[derive(Debug, Clone)]
pub struct LogisticScorer {
    intercept: f64,
    amount_weight: f64,
    currency: HashMap<String, f64>,
    country: HashMap<String, f64>,
    merchant_category: HashMap<String, f64>,
    device_type: HashMap<String, f64>,
}

impl Scorer for LogisticScorer {
    fn score(&self, features: &FeatureRecord) -> Result<f64, ScorerError> {
        if !(features.amount.is_finite() && features.amount >= 0.0) {
            return Err(ScorerError(format!(
                "amount {} cannot be scored",
                features.amount
            )));
        }

        let offset =
            |table: &HashMap<String, f64>, key: &str| table.get(key).copied().unwrap_or(0.0);
        let logit = self.intercept
            + self.amount_weight * features.amount.ln_1p()
            + offset(&self.currency, &features.currency)
            + offset(&self.country, &features.country)
            + offset(&self.merchant_category, &features.merchant_category)
            + offset(&self.device_type, &features.device_type);

        Ok(1.0 / (1.0 + (-logit).exp()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(amount: f64, merchant_category: &str) -> FeatureRecord {
        FeatureRecord {
            amount,
            currency: "USD".to_string(),
            country: "US".to_string(),
            merchant_category: merchant_category.to_string(),
            device_type: "mobile".to_string(),
        }
    }

    #[test]
    fn constant_scorer_ignores_features() {
        let scorer = ScorerSpec::Constant { score: 0.5 }
            .build()
            .expect("valid constant");
        assert_eq!(scorer.score(&features(10.0, "grocery")), Ok(0.5));
        assert_eq!(scorer.score(&features(9_000.0, "gift_cards")), Ok(0.5));
    }

    #[test]
    fn constant_outside_unit_interval_is_rejected() {
        assert!(ScorerSpec::Constant { score: 1.2 }.build().is_err());
    }

    #[test]
    fn logistic_scorer_rises_with_amount_and_risky_categories() {
        let spec: ScorerSpec = serde_json::from_value(serde_json::json!({
            "kind": "logistic",
            "intercept": -4.0,
            "amount_weight": 0.5,
            "merchant_category": { "gift_cards": 1.5 }
        }))
        .expect("spec parses");
        let scorer = spec.build().expect("valid logistic");

        let small = scorer.score(&features(10.0, "grocery")).expect("scores");
        let large = scorer.score(&features(5_000.0, "grocery")).expect("scores");
        let risky = scorer.score(&features(5_000.0, "gift_cards")).expect("scores");

        assert!(small < large);
        assert!(large < risky);
        assert!((0.0..=1.0).contains(&risky));
    }

    #[test]
    fn logistic_scorer_refuses_non_finite_amounts() {
        let scorer = ScorerSpec::Logistic {
            intercept: 0.0,
            amount_weight: 1.0,
            currency: HashMap::new(),
            country: HashMap::new(),
            merchant_category: HashMap::new(),
            device_type: HashMap::new(),
        }
        .build()
        .expect("valid logistic");

        assert!(scorer.score(&features(f64::NAN, "grocery")).is_err());
    }
}
