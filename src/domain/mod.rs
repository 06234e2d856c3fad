pub mod features;
pub mod patient;
pub mod risk;

pub use features::{AgeUnit, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use patient::PatientRecord;
pub use risk::RiskTier;
