//! Survey-record ingestion contract.
//!
//! Raw survey exports are JSON arrays of per-student records with nested
//! cognitive-profile scores, two course grades, an attendance percentage,
//! the dropout label, and identity metadata. Identity fields (`nombre`,
//! `paralelo`) are dropped before feature construction and must never reach
//! a model.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::dataset::Dataset;
use super::normalize::{NormalizeError, Normalizer};

/// Ingestion error.
#[derive(Debug, thiserror::Error)]
pub enum SurveyError {
    #[error("failed to open survey file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse survey JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

/// Nested cognitive-profile scores.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileScores {
    pub visual: f64,
    pub activo: f64,
}

/// One raw survey record as exported upstream.
#[derive(Debug, Clone, Deserialize)]
pub struct SurveyRecord {
    pub scores: ProfileScores,
    pub nota1: f64,
    pub nota2: f64,
    pub asistencia: f64,
    #[serde(deserialize_with = "deserialize_label")]
    pub deserto: u8,
    // Identity metadata: carried through ingestion, never into features.
    pub nombre: String,
    pub paralelo: String,
}

impl SurveyRecord {
    /// Raw feature values in the survey normalizer's field order.
    fn raw_features(&self) -> Vec<f64> {
        vec![
            self.scores.visual,
            self.scores.activo,
            self.nota1,
            self.nota2,
            self.asistencia,
        ]
    }
}

/// Accept the label as either a JSON bool or a 0/1 number.
fn deserialize_label<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Label {
        Bool(bool),
        Number(f64),
    }

    match Label::deserialize(deserializer)? {
        Label::Bool(b) => Ok(b as u8),
        Label::Number(n) if n == 0.0 => Ok(0),
        Label::Number(n) if n == 1.0 => Ok(1),
        Label::Number(n) => Err(serde::de::Error::custom(format!(
            "deserto must be 0, 1, or a bool, got {n}"
        ))),
    }
}

/// Build a normalized, labeled dataset from raw survey records.
///
/// Uses [`Normalizer::survey`] divisors; identity fields are discarded.
pub fn dataset_from_records(records: &[SurveyRecord]) -> Result<Dataset, SurveyError> {
    let normalizer = Normalizer::survey();
    let rows: Vec<Vec<f64>> = records.iter().map(SurveyRecord::raw_features).collect();
    let labels: Vec<u8> = records.iter().map(|r| r.deserto).collect();
    Ok(normalizer.normalize(&rows, Some(labels))?)
}

/// Load raw survey records from a JSON file.
pub fn load_survey(path: impl AsRef<Path>) -> Result<Vec<SurveyRecord>, SurveyError> {
    let file = File::open(path)?;
    let records = serde_json::from_reader(BufReader::new(file))?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {
            "scores": { "visual": 8.0, "activo": 3.0 },
            "nota1": 6.5, "nota2": 7.0, "asistencia": 85.0,
            "deserto": 0, "nombre": "Ana", "paralelo": "A"
        },
        {
            "scores": { "visual": 2.0, "activo": 9.0 },
            "nota1": 3.0, "nota2": 2.5, "asistencia": 40.0,
            "deserto": true, "nombre": "Luis", "paralelo": "B"
        }
    ]"#;

    #[test]
    fn parses_bool_and_numeric_labels() {
        let records: Vec<SurveyRecord> = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(records[0].deserto, 0);
        assert_eq!(records[1].deserto, 1);
    }

    #[test]
    fn rejects_non_binary_label() {
        let bad = r#"[{
            "scores": { "visual": 1.0, "activo": 1.0 },
            "nota1": 1.0, "nota2": 1.0, "asistencia": 50.0,
            "deserto": 2, "nombre": "X", "paralelo": "A"
        }]"#;
        assert!(serde_json::from_str::<Vec<SurveyRecord>>(bad).is_err());
    }

    #[test]
    fn dataset_drops_identity_fields() {
        let records: Vec<SurveyRecord> = serde_json::from_str(SAMPLE).unwrap();
        let ds = dataset_from_records(&records).unwrap();
        assert_eq!(ds.n_features(), 5);
        assert_eq!(
            ds.schema().names(),
            &["visual_score", "activo_score", "nota1", "nota2", "asistencia"]
        );
        assert_eq!(ds.labels(), Some(&[0u8, 1][..]));
        // visual 8/11, asistencia 85/100
        assert!((ds.row(0)[0] - 8.0 / 11.0).abs() < 1e-12);
        assert!((ds.row(0)[4] - 0.85).abs() < 1e-12);
    }
}
