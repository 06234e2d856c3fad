//! One-shot training pipeline.
//!
//! Mirrors the serving-side feature engineering exactly (same schema
//! constant, same derivation), the only difference being the age unit of the
//! source CSV (days). Everything downstream of the CSV parse is
//! deterministic for a fixed seed, so repeated runs reproduce the same
//! held-out accuracy.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::io::BufRead;
use std::path::Path;
use tracing::info;

use crate::config::{ModelConfig, TrainingConfig};
use crate::domain::{AgeUnit, FeatureVector, PatientRecord, FEATURE_NAMES};
use crate::error::{CardioError, Result};
use crate::ml::model::{FitOptions, LogisticModel};
use crate::ml::scaler::StandardScaler;

/// Expected CSV delimiter and columns (resolved by header name; `id` is
/// present in the source dataset but ignored).
const DELIMITER: char = ';';
const LABEL_COLUMN: &str = "cardio";
const RECORD_COLUMNS: [&str; 11] = [
    "age", "gender", "height", "weight", "ap_hi", "ap_lo", "cholesterol", "gluc", "smoke", "alco",
    "active",
];

/// Everything the trainer produces.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub model: LogisticModel,
    pub scaler: StandardScaler,
    pub accuracy: f64,
}

impl TrainingOutcome {
    /// Persist all three artifacts under the configured model directory.
    pub fn persist(&self, model_cfg: &ModelConfig) -> Result<()> {
        std::fs::create_dir_all(&model_cfg.dir)?;
        self.model.to_file(model_cfg.classifier_path())?;
        self.scaler.to_file(model_cfg.scaler_path())?;
        std::fs::write(
            model_cfg.accuracy_path(),
            serde_json::to_string(&self.accuracy)?,
        )?;
        Ok(())
    }
}

/// Train scaler and classifier from the semicolon-delimited dataset CSV.
pub fn train_from_csv(dataset_path: &Path, cfg: &TrainingConfig) -> Result<TrainingOutcome> {
    let file = std::fs::File::open(dataset_path).map_err(|e| {
        CardioError::Dataset(format!("cannot open {}: {e}", dataset_path.display()))
    })?;
    let labeled = parse_dataset(std::io::BufReader::new(file))?;
    info!(rows = labeled.len(), path = %dataset_path.display(), "parsed training dataset");
    train(&labeled, cfg)
}

/// Train on already-parsed records (age in days, per the source dataset).
pub fn train(labeled: &[(PatientRecord, u8)], cfg: &TrainingConfig) -> Result<TrainingOutcome> {
    if labeled.is_empty() {
        return Err(CardioError::Training("training dataset is empty".to_string()));
    }

    let rows: Vec<Vec<f64>> = labeled
        .iter()
        .map(|(record, _)| FeatureVector::engineer(record, AgeUnit::Days).values().to_vec())
        .collect();
    let labels: Vec<u8> = labeled.iter().map(|(_, y)| *y).collect();

    let scaler = StandardScaler::fit(&FEATURE_NAMES, &rows)?;
    let scaled: Vec<Vec<f64>> = rows
        .iter()
        .map(|row| scaler.transform(&FEATURE_NAMES, row))
        .collect::<Result<_>>()?;

    let (train_idx, test_idx) = stratified_split(&labels, cfg.test_fraction, cfg.seed)?;

    let train_rows: Vec<Vec<f64>> = train_idx.iter().map(|&i| scaled[i].clone()).collect();
    let train_labels: Vec<u8> = train_idx.iter().map(|&i| labels[i]).collect();

    let model = LogisticModel::fit(
        &FEATURE_NAMES,
        &train_rows,
        &train_labels,
        &FitOptions {
            epochs: cfg.epochs,
            learning_rate: cfg.learning_rate,
            l2: cfg.l2,
        },
    )?;

    let mut correct = 0usize;
    for &i in &test_idx {
        let p = model.predict_proba(&scaled[i])?;
        if u8::from(p >= 0.5) == labels[i] {
            correct += 1;
        }
    }
    let accuracy = correct as f64 / test_idx.len() as f64;
    info!("model trained | accuracy: {accuracy:.4}");

    Ok(TrainingOutcome {
        model,
        scaler,
        accuracy,
    })
}

/// Parse the semicolon-delimited CSV, resolving columns by header name.
/// Malformed rows (missing or unparseable fields) are an error, not skipped.
pub fn parse_dataset<R: BufRead>(reader: R) -> Result<Vec<(PatientRecord, u8)>> {
    let mut lines = reader.lines();
    let header = lines
        .next()
        .ok_or_else(|| CardioError::Dataset("dataset CSV is empty".to_string()))??;
    let columns: Vec<&str> = header.trim().split(DELIMITER).map(str::trim).collect();

    let index_of = |name: &str| -> Result<usize> {
        columns
            .iter()
            .position(|c| *c == name)
            .ok_or_else(|| CardioError::Dataset(format!("missing column '{name}' in CSV header")))
    };
    let record_idx: Vec<usize> = RECORD_COLUMNS
        .iter()
        .map(|&name| index_of(name))
        .collect::<Result<_>>()?;
    let label_idx = index_of(LABEL_COLUMN)?;

    let mut out = Vec::new();
    for (line_no, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.trim().split(DELIMITER).map(str::trim).collect();
        if fields.len() != columns.len() {
            return Err(CardioError::Dataset(format!(
                "line {}: {} fields, expected {}",
                line_no + 2,
                fields.len(),
                columns.len()
            )));
        }

        let field = |idx: usize| -> Result<f64> {
            fields[idx].parse::<f64>().map_err(|_| {
                CardioError::Dataset(format!(
                    "line {}: cannot parse '{}' in column '{}'",
                    line_no + 2,
                    fields[idx],
                    columns[idx]
                ))
            })
        };

        let record = PatientRecord {
            age: field(record_idx[0])?,
            gender: field(record_idx[1])? as i64,
            height: field(record_idx[2])?,
            weight: field(record_idx[3])?,
            ap_hi: field(record_idx[4])? as i64,
            ap_lo: field(record_idx[5])? as i64,
            cholesterol: field(record_idx[6])? as i64,
            gluc: field(record_idx[7])? as i64,
            smoke: field(record_idx[8])? as i64,
            alco: field(record_idx[9])? as i64,
            active: field(record_idx[10])? as i64,
        };
        let label = field(label_idx)? as u8;
        out.push((record, label));
    }
    Ok(out)
}

/// Per-class seeded shuffle, then `test_fraction` of each class to the test
/// set (keeps class balance, like a stratified split).
fn stratified_split(
    labels: &[u8],
    test_fraction: f64,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>)> {
    if !(0.0..1.0).contains(&test_fraction) {
        return Err(CardioError::Training(format!(
            "test_fraction must be in [0, 1), got {test_fraction}"
        )));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for class in [0u8, 1u8] {
        let mut idx: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, &y)| y == class)
            .map(|(i, _)| i)
            .collect();
        idx.shuffle(&mut rng);
        let n_test = (idx.len() as f64 * test_fraction).round() as usize;
        test.extend_from_slice(&idx[..n_test]);
        train.extend_from_slice(&idx[n_test..]);
    }

    if test.is_empty() || train.is_empty() {
        return Err(CardioError::Training(
            "dataset too small for the requested train/test split".to_string(),
        ));
    }
    Ok((train, test))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "id;age;gender;height;weight;ap_hi;ap_lo;cholesterol;gluc;smoke;alco;active;cardio";

    /// Synthetic dataset where high blood pressure and age drive the label.
    fn synthetic_csv(rows: usize) -> String {
        let mut csv = String::from(HEADER);
        csv.push('\n');
        for i in 0..rows {
            let sick = i % 2;
            let age_days = 365 * if sick == 1 { 60 + i % 10 } else { 35 + i % 10 };
            let ap_hi = if sick == 1 { 150 + (i % 20) } else { 110 + (i % 10) };
            let ap_lo = if sick == 1 { 95 + (i % 10) } else { 70 + (i % 8) };
            let weight = if sick == 1 { 90 + i % 15 } else { 62 + i % 10 };
            csv.push_str(&format!(
                "{i};{age_days};{};{};{weight};{ap_hi};{ap_lo};{};1;0;0;{};{sick}\n",
                1 + i % 2,
                160 + i % 25,
                1 + (sick * 2 * (i % 2)),
                1 - sick,
            ));
        }
        csv
    }

    #[test]
    fn parses_header_resolved_rows() {
        let csv = format!("{HEADER}\n0;18250;1;170;70;120;80;1;1;0;0;1;0\n");
        let parsed = parse_dataset(Cursor::new(csv)).unwrap();
        assert_eq!(parsed.len(), 1);
        let (record, label) = &parsed[0];
        assert_eq!(record.age, 18250.0);
        assert_eq!(record.ap_hi, 120);
        assert_eq!(*label, 0);
    }

    #[test]
    fn ignores_column_position_uses_names() {
        let csv = "cardio;age;gender;height;weight;ap_hi;ap_lo;cholesterol;gluc;smoke;alco;active\n1;18250;2;160;80;140;90;2;1;1;0;0\n";
        let parsed = parse_dataset(Cursor::new(csv)).unwrap();
        assert_eq!(parsed[0].1, 1);
        assert_eq!(parsed[0].0.gender, 2);
    }

    #[test]
    fn malformed_row_is_fatal() {
        let csv = format!("{HEADER}\n0;notanumber;1;170;70;120;80;1;1;0;0;1;0\n");
        assert!(matches!(
            parse_dataset(Cursor::new(csv)).unwrap_err(),
            CardioError::Dataset(_)
        ));
    }

    #[test]
    fn missing_column_is_fatal() {
        let csv = "id;age;gender\n0;18250;1\n";
        assert!(matches!(
            parse_dataset(Cursor::new(csv)).unwrap_err(),
            CardioError::Dataset(_)
        ));
    }

    #[test]
    fn split_is_stratified_and_seeded() {
        let labels: Vec<u8> = (0..100).map(|i| (i % 2) as u8).collect();
        let (train_a, test_a) = stratified_split(&labels, 0.2, 42).unwrap();
        let (train_b, test_b) = stratified_split(&labels, 0.2, 42).unwrap();
        assert_eq!(train_a, train_b);
        assert_eq!(test_a, test_b);

        assert_eq!(test_a.len(), 20);
        let positives = test_a.iter().filter(|&&i| labels[i] == 1).count();
        assert_eq!(positives, 10);
    }

    #[test]
    fn training_twice_reproduces_accuracy() {
        let csv = synthetic_csv(200);
        let labeled = parse_dataset(Cursor::new(csv)).unwrap();
        let cfg = TrainingConfig::default();
        let a = train(&labeled, &cfg).unwrap();
        let b = train(&labeled, &cfg).unwrap();
        assert_eq!(a.accuracy, b.accuracy);
        assert_eq!(a.model.weights, b.model.weights);
    }

    #[test]
    fn learns_the_synthetic_signal() {
        let labeled = parse_dataset(Cursor::new(synthetic_csv(200))).unwrap();
        let outcome = train(&labeled, &TrainingConfig::default()).unwrap();
        assert!(
            outcome.accuracy > 0.8,
            "accuracy {} too low for a separable dataset",
            outcome.accuracy
        );
    }
}
