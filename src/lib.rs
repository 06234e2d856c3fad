pub mod api;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod explain;
pub mod ml;

pub use config::AppConfig;
pub use domain::{AgeUnit, FeatureVector, PatientRecord, RiskTier, FEATURE_COUNT, FEATURE_NAMES};
pub use error::{CardioError, Result};
pub use explain::{narrate, FactorLists, FeatureAttributions, NarrationTables};
pub use ml::{ModelArtifacts, Prediction};
