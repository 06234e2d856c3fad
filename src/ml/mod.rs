//! Lightweight ML pipeline (deploy-safe inference).
//!
//! Intentionally dependency-light: a z-score scaler and a logistic
//! classifier, both serialized as plain JSON, deterministic end to end.

pub mod artifacts;
pub mod model;
pub mod scaler;
pub mod trainer;

pub use artifacts::{ModelArtifacts, Prediction};
pub use model::{FitOptions, LogisticModel};
pub use scaler::StandardScaler;
pub use trainer::TrainingOutcome;
