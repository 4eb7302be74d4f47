//! Feature normalization.
//!
//! Maps raw heterogeneous measurements (bounded counts, grades, percentages)
//! onto comparable `[0, 1]` scales using fixed per-feature divisors. Values
//! that land outside the valid range are rejected rather than clamped:
//! out-of-range raw data signals upstream corruption, and silently clamping
//! it would corrupt risk scores without detection.

use ndarray::Array2;

use super::dataset::{Dataset, DatasetError};
use super::schema::{FeatureSchema, SchemaError};

/// Normalization error with enough context to find the offending value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NormalizeError {
    /// A normalized value fell outside `[0, 1]` beyond tolerance.
    #[error("feature `{feature}` at record {record}: normalized value {value} outside [0, 1]")]
    OutOfRange {
        feature: String,
        record: usize,
        value: f64,
    },

    /// Row width doesn't match the configured fields.
    #[error("record {record} has {actual} values, expected {expected}")]
    WidthMismatch {
        record: usize,
        actual: usize,
        expected: usize,
    },

    /// Invalid field configuration.
    #[error("field `{0}` has a non-positive divisor")]
    InvalidDivisor(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

/// Per-feature normalization rule: divide the raw value by `divisor`.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub divisor: f64,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, divisor: f64) -> Self {
        Self { name: name.into(), divisor }
    }
}

/// Pure normalizer configured with per-feature divisors.
#[derive(Debug, Clone)]
pub struct Normalizer {
    fields: Vec<FieldSpec>,
    schema: FeatureSchema,
    tolerance: f64,
}

impl Normalizer {
    /// Default tolerance for the `[0, 1]` range check.
    pub const DEFAULT_TOLERANCE: f64 = 1e-9;

    /// Build a normalizer from field specs.
    ///
    /// # Errors
    /// Fails on a non-positive divisor or an invalid schema (empty,
    /// duplicate names).
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self, NormalizeError> {
        for field in &fields {
            if !(field.divisor > 0.0) {
                return Err(NormalizeError::InvalidDivisor(field.name.clone()));
            }
        }
        let schema = FeatureSchema::new(fields.iter().map(|f| f.name.clone()).collect())?;
        Ok(Self { fields, schema, tolerance: Self::DEFAULT_TOLERANCE })
    }

    /// Preset for the dropout survey: cognitive-profile scores out of 11,
    /// grades out of 10, attendance as a percentage.
    pub fn survey() -> Self {
        Self::new(vec![
            FieldSpec::new("visual_score", 11.0),
            FieldSpec::new("activo_score", 11.0),
            FieldSpec::new("nota1", 10.0),
            FieldSpec::new("nota2", 10.0),
            FieldSpec::new("asistencia", 100.0),
        ])
        .expect("survey preset is valid")
    }

    /// Override the range-check tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// The schema this normalizer produces.
    #[inline]
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Normalize one raw record, values in field order.
    ///
    /// `record` is the row index reported in errors.
    pub fn normalize_row(&self, raw: &[f64], record: usize) -> Result<Vec<f64>, NormalizeError> {
        if raw.len() != self.fields.len() {
            return Err(NormalizeError::WidthMismatch {
                record,
                actual: raw.len(),
                expected: self.fields.len(),
            });
        }
        raw.iter()
            .zip(&self.fields)
            .map(|(&value, field)| {
                let scaled = value / field.divisor;
                if scaled < -self.tolerance || scaled > 1.0 + self.tolerance {
                    return Err(NormalizeError::OutOfRange {
                        feature: field.name.clone(),
                        record,
                        value: scaled,
                    });
                }
                Ok(scaled)
            })
            .collect()
    }

    /// Normalize a batch of raw rows into a labeled [`Dataset`].
    pub fn normalize(
        &self,
        raw_rows: &[Vec<f64>],
        labels: Option<Vec<u8>>,
    ) -> Result<Dataset, NormalizeError> {
        let n_features = self.fields.len();
        let mut data = Vec::with_capacity(raw_rows.len() * n_features);
        for (record, row) in raw_rows.iter().enumerate() {
            data.extend(self.normalize_row(row, record)?);
        }
        let features = Array2::from_shape_vec((raw_rows.len(), n_features), data)
            .expect("row-major layout matches shape");
        Ok(Dataset::new(self.schema.clone(), features, labels)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn survey_divisors() {
        let norm = Normalizer::survey();
        let row = norm.normalize_row(&[11.0, 5.5, 10.0, 7.5, 80.0], 0).unwrap();
        assert_eq!(row, vec![1.0, 0.5, 1.0, 0.75, 0.8]);
    }

    #[test]
    fn rejects_out_of_range() {
        let norm = Normalizer::survey();
        let err = norm.normalize_row(&[12.0, 5.0, 9.0, 9.0, 90.0], 3).unwrap_err();
        match err {
            NormalizeError::OutOfRange { feature, record, value } => {
                assert_eq!(feature, "visual_score");
                assert_eq!(record, 3);
                assert!(value > 1.0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_negative() {
        let norm = Normalizer::new(vec![FieldSpec::new("x", 10.0)]).unwrap();
        assert!(matches!(
            norm.normalize_row(&[-0.5], 0),
            Err(NormalizeError::OutOfRange { .. })
        ));
    }

    #[test]
    fn tolerance_admits_boundary_noise() {
        let norm = Normalizer::new(vec![FieldSpec::new("x", 1.0)])
            .unwrap()
            .with_tolerance(1e-6);
        assert!(norm.normalize_row(&[1.0 + 1e-7], 0).is_ok());
        assert!(norm.normalize_row(&[1.0 + 1e-3], 0).is_err());
    }

    #[test]
    fn rejects_width_mismatch() {
        let norm = Normalizer::survey();
        assert!(matches!(
            norm.normalize_row(&[1.0, 2.0], 0),
            Err(NormalizeError::WidthMismatch { expected: 5, actual: 2, .. })
        ));
    }

    #[test]
    fn rejects_zero_divisor() {
        let err = Normalizer::new(vec![FieldSpec::new("x", 0.0)]).unwrap_err();
        assert_eq!(err, NormalizeError::InvalidDivisor("x".into()));
    }

    #[test]
    fn batch_produces_dataset() {
        let norm = Normalizer::survey();
        let rows = vec![
            vec![5.0, 6.0, 8.0, 7.0, 90.0],
            vec![2.0, 9.0, 4.0, 5.0, 60.0],
        ];
        let ds = norm.normalize(&rows, Some(vec![0, 1])).unwrap();
        assert_eq!(ds.n_samples(), 2);
        assert_eq!(ds.n_features(), 5);
        assert_eq!(ds.labels(), Some(&[0u8, 1][..]));
    }
}
