//! Load-or-train lifecycle for the persisted model artifacts.
//!
//! The bundle is constructed once at startup and never mutated afterwards;
//! handlers receive it behind an `Arc` via `api::AppState`.

use std::path::Path;
use tracing::info;

use crate::config::{ModelConfig, TrainingConfig};
use crate::domain::{AgeUnit, FeatureVector, PatientRecord, RiskTier, FEATURE_NAMES};
use crate::error::{CardioError, Result};
use crate::ml::model::LogisticModel;
use crate::ml::scaler::StandardScaler;
use crate::ml::trainer;

/// Immutable serving bundle: classifier, scaler and held-out accuracy.
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    pub model: LogisticModel,
    pub scaler: StandardScaler,
    pub accuracy: f64,
}

/// One prediction plus its per-feature attribution scores.
#[derive(Debug, Clone)]
pub struct Prediction {
    pub probability: f64,
    pub tier: RiskTier,
    /// One scalar per schema feature, positive class.
    pub attributions: Vec<f64>,
}

impl ModelArtifacts {
    /// Load persisted artifacts if all three are present, otherwise train
    /// synchronously and persist before returning. Training failure is fatal
    /// to the caller (startup).
    pub fn load_or_train(
        model_cfg: &ModelConfig,
        training_cfg: &TrainingConfig,
        dataset_path: &Path,
    ) -> Result<Self> {
        let classifier_path = model_cfg.classifier_path();
        let scaler_path = model_cfg.scaler_path();
        let accuracy_path = model_cfg.accuracy_path();

        if classifier_path.exists() && scaler_path.exists() && accuracy_path.exists() {
            info!(dir = %model_cfg.dir.display(), "loading persisted model artifacts");
            return Self::load(&classifier_path, &scaler_path, &accuracy_path);
        }

        info!("model artifacts missing, training from dataset");
        let outcome = trainer::train_from_csv(dataset_path, training_cfg)?;
        outcome.persist(model_cfg)?;
        Ok(Self {
            model: outcome.model,
            scaler: outcome.scaler,
            accuracy: outcome.accuracy,
        })
    }

    pub fn load(classifier: &Path, scaler: &Path, accuracy: &Path) -> Result<Self> {
        let model = LogisticModel::from_file(classifier)?;
        let scaler = StandardScaler::from_file(scaler)?;
        let accuracy: f64 = serde_json::from_str(&std::fs::read_to_string(accuracy)?)?;
        if !(0.0..=1.0).contains(&accuracy) {
            return Err(CardioError::Validation(format!(
                "persisted accuracy {accuracy} outside [0, 1]"
            )));
        }

        let artifacts = Self {
            model,
            scaler,
            accuracy,
        };
        artifacts.check_schemas()?;
        Ok(artifacts)
    }

    /// Scaler, classifier and the compiled-in schema must agree exactly.
    fn check_schemas(&self) -> Result<()> {
        let expected: Vec<String> = FEATURE_NAMES.iter().map(|s| s.to_string()).collect();
        if self.scaler.feature_names != expected {
            return Err(CardioError::Schema(format!(
                "scaler artifact schema {:?} disagrees with the serving schema",
                self.scaler.feature_names
            )));
        }
        if self.model.feature_names != expected {
            return Err(CardioError::Schema(format!(
                "classifier artifact schema {:?} disagrees with the serving schema",
                self.model.feature_names
            )));
        }
        Ok(())
    }

    /// Run the full inference pipeline for one patient record (age in
    /// years): engineer, scale, predict, attribute.
    pub fn predict(&self, record: &PatientRecord) -> Result<Prediction> {
        let features = FeatureVector::engineer(record, AgeUnit::Years);
        let scaled = self.scaler.transform(&FEATURE_NAMES, features.values())?;
        let probability = self.model.predict_proba(&scaled)?;
        let attributions = self.model.attributions(&scaled)?;
        Ok(Prediction {
            probability,
            tier: RiskTier::from_probability(probability),
            attributions,
        })
    }
}
