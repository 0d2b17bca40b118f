use serde::{Deserialize, Deserializer, Serialize};

/// Scores strictly below this threshold are approved.
pub const REVIEW_THRESHOLD: f64 = 0.3;
/// Scores at or above this threshold are declined.
pub const DECLINE_THRESHOLD: f64 = 0.7;

/// Categorical outcome derived from a risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approve,
    Review,
    Decline,
}

impl Decision {
    pub fn label(&self) -> &'static str {
        match self {
            Decision::Approve => "approve",
            Decision::Review => "review",
            Decision::Decline => "decline",
        }
    }
}

/// Raised when a score falls outside `[0.0, 1.0]` or is not a number.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("risk score must be between 0.0 and 1.0, got {0}")]
pub struct InvalidScore(pub f64);

/// A probability in the closed interval `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct RiskScore(f64);

impl RiskScore {
    pub fn new(value: f64) -> Result<Self, InvalidScore> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidScore(value))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl<'de> Deserialize<'de> for RiskScore {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = f64::deserialize(deserializer)?;
        RiskScore::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Map a raw score onto approve / review / decline bands.
pub fn map_decision(risk_score: f64) -> Result<Decision, InvalidScore> {
    let score = RiskScore::new(risk_score)?;
    Ok(decide(score))
}

/// Infallible mapping for scores that are already range-checked.
pub fn decide(score: RiskScore) -> Decision {
    let value = score.value();
    if value < REVIEW_THRESHOLD {
        Decision::Approve
    } else if value < DECLINE_THRESHOLD {
        Decision::Review
    } else {
        Decision::Decline
    }
}
