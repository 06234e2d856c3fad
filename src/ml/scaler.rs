//! Standard (z-score) feature scaler.
//!
//! The scaler remembers the feature-name schema it was fitted on and refuses
//! to transform anything else: a count or ordering disagreement is a hard
//! error, never a silent truncation or reshape.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CardioError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Feature schema at fit time, in order.
    pub feature_names: Vec<String>,
    /// Per-feature mean.
    pub mean: Vec<f64>,
    /// Per-feature standard deviation (population).
    pub std: Vec<f64>,
}

impl StandardScaler {
    /// Fit per-feature mean and standard deviation over the given rows.
    pub fn fit(feature_names: &[&str], rows: &[Vec<f64>]) -> Result<Self> {
        if rows.is_empty() {
            return Err(CardioError::Training(
                "cannot fit scaler on an empty dataset".to_string(),
            ));
        }
        let dim = feature_names.len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != dim {
                return Err(CardioError::Schema(format!(
                    "row {i} has {} values, expected {dim}",
                    row.len()
                )));
            }
        }

        let n = rows.len() as f64;
        let mut mean = vec![0.0_f64; dim];
        for row in rows {
            for (m, v) in mean.iter_mut().zip(row) {
                *m += v;
            }
        }
        for m in &mut mean {
            *m /= n;
        }

        let mut var = vec![0.0_f64; dim];
        for row in rows {
            for ((s, v), m) in var.iter_mut().zip(row).zip(&mean) {
                let d = v - m;
                *s += d * d;
            }
        }
        let std = var.into_iter().map(|s| (s / n).sqrt()).collect();

        Ok(Self {
            feature_names: feature_names.iter().map(|s| s.to_string()).collect(),
            mean,
            std,
        })
    }

    /// Scale one feature vector, validating the caller's schema against the
    /// fit-time schema (names and order, not just count).
    pub fn transform(&self, feature_names: &[&str], values: &[f64]) -> Result<Vec<f64>> {
        if feature_names.len() != self.feature_names.len() {
            return Err(CardioError::Schema(format!(
                "scaler was fitted on {} features, got {}",
                self.feature_names.len(),
                feature_names.len()
            )));
        }
        for (i, (got, fitted)) in feature_names.iter().zip(&self.feature_names).enumerate() {
            if got != fitted {
                return Err(CardioError::Schema(format!(
                    "feature {i} is '{got}', scaler was fitted on '{fitted}'"
                )));
            }
        }
        if values.len() != self.feature_names.len() {
            return Err(CardioError::Schema(format!(
                "got {} values for {} features",
                values.len(),
                self.feature_names.len()
            )));
        }

        Ok(values
            .iter()
            .zip(self.mean.iter().zip(&self.std))
            .map(|(v, (m, s))| (v - m) / s.max(1e-12))
            .collect())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        let scaler: Self = serde_json::from_str(&content)?;
        scaler.validate()?;
        Ok(scaler)
    }

    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.feature_names.is_empty() {
            return Err(CardioError::Validation(
                "scaler has an empty feature schema".to_string(),
            ));
        }
        if self.mean.len() != self.feature_names.len() || self.std.len() != self.feature_names.len()
        {
            return Err(CardioError::Validation(format!(
                "scaler mean/std lengths ({}, {}) != schema length {}",
                self.mean.len(),
                self.std.len(),
                self.feature_names.len()
            )));
        }
        if self.mean.iter().chain(&self.std).any(|v| !v.is_finite()) {
            return Err(CardioError::Validation(
                "scaler parameters contain non-finite values".to_string(),
            ));
        }
        Ok(())
    }
}
