use serde::{Deserialize, Serialize};

/// Raw patient vitals as submitted to the API (and as stored per-row in the
/// training CSV, where `age` is in days instead of years).
///
/// Value codes follow the cardiovascular-disease dataset: gender 1=male
/// 2=female; cholesterol/glucose 1..3 ordinal; smoke/alco/active 0|1.
/// No range validation beyond types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub age: f64,
    pub gender: i64,
    pub height: f64,
    pub weight: f64,
    pub ap_hi: i64,
    pub ap_lo: i64,
    pub cholesterol: i64,
    pub gluc: i64,
    pub smoke: i64,
    pub alco: i64,
    pub active: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_fields() {
        let err = serde_json::from_str::<PatientRecord>(r#"{"age": 50}"#);
        assert!(err.is_err());
    }

    #[test]
    fn parses_full_payload() {
        let record: PatientRecord = serde_json::from_str(
            r#"{"age":50,"gender":1,"height":170,"weight":70,"ap_hi":120,"ap_lo":80,
                "cholesterol":1,"gluc":1,"smoke":0,"alco":0,"active":1}"#,
        )
        .unwrap();
        assert_eq!(record.gender, 1);
        assert_eq!(record.ap_hi, 120);
    }
}
