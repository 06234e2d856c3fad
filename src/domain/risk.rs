use serde::{Deserialize, Serialize};

/// Risk tier derived by thresholding the positive-class probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// Fixed thresholds: `< 0.33` Low, `[0.33, 0.66)` Medium, `>= 0.66` High.
    pub fn from_probability(p: f64) -> Self {
        if p < 0.33 {
            Self::Low
        } else if p < 0.66 {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries_are_inclusive() {
        assert_eq!(RiskTier::from_probability(0.0), RiskTier::Low);
        assert_eq!(RiskTier::from_probability(0.3299), RiskTier::Low);
        assert_eq!(RiskTier::from_probability(0.33), RiskTier::Medium);
        assert_eq!(RiskTier::from_probability(0.6599), RiskTier::Medium);
        assert_eq!(RiskTier::from_probability(0.66), RiskTier::High);
        assert_eq!(RiskTier::from_probability(1.0), RiskTier::High);
    }
}
