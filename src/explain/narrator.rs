//! Factor narration policy.
//!
//! Converts per-feature attribution scores into healthy/unhealthy factor
//! lists. Three binary features are classified by their raw value instead of
//! the attribution sign: smoking and alcohol are always adverse when
//! present (attribution sign on a rare-event binary feature is too noisy to
//! override domain knowledge), and physical activity is the inverse.

use serde::{Deserialize, Serialize};

use crate::domain::{PatientRecord, FEATURE_NAMES};
use crate::explain::attribution::FeatureAttributions;
use crate::explain::tables::NarrationTables;

/// Demographic features never shown as factors, whatever their attribution.
const SKIPPED_FEATURES: [&str; 4] = ["gender", "height", "weight", "age_years"];

/// One narrated factor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Factor {
    pub factor: String,
    pub description: String,
}

/// Healthy and unhealthy factors, each in schema order.
#[derive(Debug, Clone, Default)]
pub struct FactorLists {
    pub healthy: Vec<Factor>,
    pub unhealthy: Vec<Factor>,
}

/// Apply the narration policy over every schema feature.
pub fn narrate(
    record: &PatientRecord,
    attributions: &FeatureAttributions,
    tables: &NarrationTables,
) -> FactorLists {
    let mut lists = FactorLists::default();

    for (index, feature) in FEATURE_NAMES.iter().enumerate() {
        if SKIPPED_FEATURES.contains(feature) {
            continue;
        }
        let display = tables.display_name(feature);

        let adverse = match *feature {
            // Always adverse when present, healthy when absent.
            "smoke" => record.smoke == 1,
            "alco" => record.alco == 1,
            // Inverse: presence is protective.
            "active" => record.active != 1,
            // Everything else follows the attribution sign.
            _ => attributions.score(index) > 0.0,
        };

        // Physical activity carries its fixed description on both sides;
        // the rest get the generic healthy-range text when non-adverse.
        let description = if adverse || *feature == "active" {
            tables.risk_text(display)
        } else {
            tables.healthy_range_text(display)
        };

        let factor = Factor {
            factor: display.to_string(),
            description,
        };
        if adverse {
            lists.unhealthy.push(factor);
        } else {
            lists.healthy.push(factor);
        }
    }

    lists
}
