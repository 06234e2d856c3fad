//! Attribution boundary contract.
//!
//! The narrator consumes exactly one scalar per schema feature, attributed
//! to the positive (risk) class. Any attribution source that produces a
//! per-class column layout must be reduced through
//! [`FeatureAttributions::from_class_columns`] with an explicit
//! positive-class index; the shape is validated here, never sniffed
//! downstream.

use crate::domain::FEATURE_COUNT;
use crate::error::{CardioError, Result};

/// One positive-class attribution score per schema feature, in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureAttributions {
    values: Vec<f64>,
}

impl FeatureAttributions {
    /// Wrap a per-feature scalar list; the length must match the schema.
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if values.len() != FEATURE_COUNT {
            return Err(CardioError::Validation(format!(
                "expected {FEATURE_COUNT} attribution scores, got {}",
                values.len()
            )));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(CardioError::Validation(
                "attribution scores contain non-finite values".to_string(),
            ));
        }
        Ok(Self { values })
    }

    /// Reduce a per-class layout (one row per feature, one column per class)
    /// to the designated positive-class scalar per feature.
    pub fn from_class_columns(columns: &[Vec<f64>], positive_class: usize) -> Result<Self> {
        let mut values = Vec::with_capacity(columns.len());
        for (i, per_class) in columns.iter().enumerate() {
            let value = per_class.get(positive_class).ok_or_else(|| {
                CardioError::Validation(format!(
                    "feature {i} has {} class columns, positive class {positive_class} out of range",
                    per_class.len()
                ))
            })?;
            values.push(*value);
        }
        Self::new(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Score for the feature at the given schema index.
    pub fn score(&self, index: usize) -> f64 {
        self.values[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_exactly_one_scalar_per_feature() {
        let attr = FeatureAttributions::new(vec![0.1; FEATURE_COUNT]).unwrap();
        assert_eq!(attr.as_slice().len(), FEATURE_COUNT);
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(FeatureAttributions::new(vec![0.1; FEATURE_COUNT - 1]).is_err());
        assert!(FeatureAttributions::new(vec![0.1; FEATURE_COUNT + 1]).is_err());
    }

    #[test]
    fn rejects_non_finite_scores() {
        let mut values = vec![0.0; FEATURE_COUNT];
        values[3] = f64::NAN;
        assert!(FeatureAttributions::new(values).is_err());
    }

    #[test]
    fn class_column_reduction_selects_positive_class() {
        let columns: Vec<Vec<f64>> = (0..FEATURE_COUNT)
            .map(|i| vec![-(i as f64), i as f64])
            .collect();
        let attr = FeatureAttributions::from_class_columns(&columns, 1).unwrap();
        assert_eq!(attr.score(5), 5.0);

        let negated = FeatureAttributions::from_class_columns(&columns, 0).unwrap();
        assert_eq!(negated.score(5), -5.0);
    }

    #[test]
    fn class_column_reduction_rejects_missing_class() {
        let columns: Vec<Vec<f64>> = (0..FEATURE_COUNT).map(|_| vec![0.5]).collect();
        assert!(FeatureAttributions::from_class_columns(&columns, 1).is_err());
    }
}
