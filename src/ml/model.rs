//! Logistic-regression classifier (CPU-only, deterministic).
//!
//! Small enough to train at process startup and serialized as plain JSON so
//! artifacts stay inspectable. Shape validation is explicit: a feature-count
//! disagreement fails fast rather than being reshaped away.
//!
//! The model doubles as the attribution source: in standardized feature
//! space the training mean is the zero vector, so `w_i * x_i` is the exact
//! signed contribution of feature `i` toward the positive (risk) class for
//! one prediction.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CardioError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticModel {
    /// Feature schema at fit time, in order.
    pub feature_names: Vec<String>,
    /// One weight per feature.
    pub weights: Vec<f64>,
    pub bias: f64,
    /// Optional free-form metadata (training info, seed, etc).
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// Gradient-descent hyperparameters. All fixed up front; no randomness.
#[derive(Debug, Clone, Copy)]
pub struct FitOptions {
    pub epochs: usize,
    pub learning_rate: f64,
    /// L2 penalty on the weights (bias excluded).
    pub l2: f64,
}

impl LogisticModel {
    /// Fit by full-batch gradient descent with zero initialization.
    ///
    /// Inputs are expected to be standardized already (see
    /// `ml::scaler::StandardScaler`); with zero init and a fixed epoch count
    /// the result is fully deterministic.
    pub fn fit(
        feature_names: &[&str],
        rows: &[Vec<f64>],
        labels: &[u8],
        opts: &FitOptions,
    ) -> Result<Self> {
        let dim = feature_names.len();
        if rows.is_empty() {
            return Err(CardioError::Training(
                "cannot fit classifier on an empty dataset".to_string(),
            ));
        }
        if rows.len() != labels.len() {
            return Err(CardioError::Training(format!(
                "{} rows but {} labels",
                rows.len(),
                labels.len()
            )));
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != dim {
                return Err(CardioError::Schema(format!(
                    "row {i} has {} values, expected {dim}",
                    row.len()
                )));
            }
        }

        let n = rows.len() as f64;
        let mut weights = vec![0.0_f64; dim];
        let mut bias = 0.0_f64;

        for _ in 0..opts.epochs {
            let mut grad_w = vec![0.0_f64; dim];
            let mut grad_b = 0.0_f64;

            for (row, &label) in rows.iter().zip(labels) {
                let z = dot(&weights, row) + bias;
                let residual = sigmoid(z) - f64::from(label);
                for (g, x) in grad_w.iter_mut().zip(row) {
                    *g += residual * x;
                }
                grad_b += residual;
            }

            for (w, g) in weights.iter_mut().zip(&grad_w) {
                *w -= opts.learning_rate * (g / n + opts.l2 * *w);
            }
            bias -= opts.learning_rate * grad_b / n;
        }

        Ok(Self {
            feature_names: feature_names.iter().map(|s| s.to_string()).collect(),
            weights,
            bias,
            metadata: serde_json::json!({}),
        })
    }

    /// Positive-class probability for one scaled feature vector.
    pub fn predict_proba(&self, scaled: &[f64]) -> Result<f64> {
        self.check_dim(scaled)?;
        Ok(sigmoid(dot(&self.weights, scaled) + self.bias))
    }

    /// Per-feature contribution toward the positive class, one scalar per
    /// feature, relative to the training-mean baseline.
    pub fn attributions(&self, scaled: &[f64]) -> Result<Vec<f64>> {
        self.check_dim(scaled)?;
        Ok(self
            .weights
            .iter()
            .zip(scaled)
            .map(|(w, x)| w * x)
            .collect())
    }

    fn check_dim(&self, scaled: &[f64]) -> Result<()> {
        if scaled.len() != self.weights.len() {
            return Err(CardioError::Schema(format!(
                "classifier input dim mismatch: got {}, expected {}",
                scaled.len(),
                self.weights.len()
            )));
        }
        Ok(())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        let model: Self = serde_json::from_str(&content)?;
        model.validate()?;
        Ok(model)
    }

    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.feature_names.is_empty() {
            return Err(CardioError::Validation(
                "classifier has an empty feature schema".to_string(),
            ));
        }
        if self.weights.len() != self.feature_names.len() {
            return Err(CardioError::Validation(format!(
                "classifier has {} weights for {} features",
                self.weights.len(),
                self.feature_names.len()
            )));
        }
        if !self.bias.is_finite() || self.weights.iter().any(|w| !w.is_finite()) {
            return Err(CardioError::Validation(
                "classifier parameters contain non-finite values".to_string(),
            ));
        }
        Ok(())
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn sigmoid(x: f64) -> f64 {
    // Numerically-stable sigmoid.
    if x >= 0.0 {
        let z = (-x).exp();
        1.0 / (1.0 + z)
    } else {
        let z = x.exp();
        z / (1.0 + z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMES: [&str; 2] = ["x0", "x1"];

    fn opts() -> FitOptions {
        FitOptions {
            epochs: 500,
            learning_rate: 0.5,
            l2: 0.0,
        }
    }

    fn separable_data() -> (Vec<Vec<f64>>, Vec<u8>) {
        let rows = vec![
            vec![-2.0, -1.5],
            vec![-1.5, -2.0],
            vec![-1.0, -1.0],
            vec![1.0, 1.5],
            vec![1.5, 1.0],
            vec![2.0, 2.0],
        ];
        let labels = vec![0, 0, 0, 1, 1, 1];
        (rows, labels)
    }

    #[test]
    fn learns_a_separable_problem() {
        let (rows, labels) = separable_data();
        let model = LogisticModel::fit(&NAMES, &rows, &labels, &opts()).unwrap();
        for (row, &label) in rows.iter().zip(&labels) {
            let p = model.predict_proba(row).unwrap();
            assert_eq!(u8::from(p >= 0.5), label, "misclassified {row:?}");
        }
    }

    #[test]
    fn probability_stays_in_unit_interval() {
        let (rows, labels) = separable_data();
        let model = LogisticModel::fit(&NAMES, &rows, &labels, &opts()).unwrap();
        for x in [-1e6, -1.0, 0.0, 1.0, 1e6] {
            let p = model.predict_proba(&[x, x]).unwrap();
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn fit_is_deterministic() {
        let (rows, labels) = separable_data();
        let a = LogisticModel::fit(&NAMES, &rows, &labels, &opts()).unwrap();
        let b = LogisticModel::fit(&NAMES, &rows, &labels, &opts()).unwrap();
        assert_eq!(a.weights, b.weights);
        assert_eq!(a.bias, b.bias);
    }

    #[test]
    fn dimension_mismatch_fails_loudly() {
        let (rows, labels) = separable_data();
        let model = LogisticModel::fit(&NAMES, &rows, &labels, &opts()).unwrap();
        assert!(matches!(
            model.predict_proba(&[1.0]).unwrap_err(),
            CardioError::Schema(_)
        ));
        assert!(matches!(
            model.attributions(&[1.0, 2.0, 3.0]).unwrap_err(),
            CardioError::Schema(_)
        ));
    }

    #[test]
    fn attributions_are_weight_times_value() {
        let model = LogisticModel {
            feature_names: NAMES.iter().map(|s| s.to_string()).collect(),
            weights: vec![0.5, -2.0],
            bias: 0.0,
            metadata: serde_json::json!({}),
        };
        let attr = model.attributions(&[4.0, 3.0]).unwrap();
        assert_eq!(attr, vec![2.0, -6.0]);
    }

    #[test]
    fn validates_weight_schema_agreement() {
        let bad = LogisticModel {
            feature_names: vec!["a".to_string()],
            weights: vec![1.0, 2.0],
            bias: 0.0,
            metadata: serde_json::json!({}),
        };
        assert!(bad.validate().is_err());
    }
}
