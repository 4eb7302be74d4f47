//! Dataset and background-set containers.
//!
//! A [`Dataset`] couples a feature matrix with its schema and optional
//! binary labels. A [`BackgroundSet`] is the reference distribution used by
//! the attribution engine to represent "feature value unknown".

use ndarray::{Array2, ArrayView1, ArrayView2};

use super::schema::FeatureSchema;

/// Dataset construction error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatasetError {
    /// Matrix width doesn't match the schema.
    #[error("feature matrix has {actual} columns but schema names {expected} features")]
    WidthMismatch { actual: usize, expected: usize },

    /// Label vector length doesn't match the number of rows.
    #[error("got {labels} labels for {rows} rows")]
    LabelCountMismatch { labels: usize, rows: usize },

    /// Labels must be 0 or 1.
    #[error("label at row {row} is {value}, expected 0 or 1")]
    InvalidLabel { row: usize, value: u8 },

    /// A background set needs at least one record.
    #[error("background set must contain at least one record")]
    EmptyBackground,
}

/// Immutable feature matrix with schema and optional binary labels.
///
/// Rows are samples, columns follow the schema order. Built once by the
/// ingestion side; every downstream consumer only reads.
#[derive(Debug, Clone)]
pub struct Dataset {
    schema: FeatureSchema,
    features: Array2<f64>,
    labels: Option<Vec<u8>>,
}

impl Dataset {
    /// Create a dataset from a feature matrix and optional labels.
    ///
    /// # Errors
    /// Fails when matrix width, label count, or label values are inconsistent.
    pub fn new(
        schema: FeatureSchema,
        features: Array2<f64>,
        labels: Option<Vec<u8>>,
    ) -> Result<Self, DatasetError> {
        if features.ncols() != schema.len() {
            return Err(DatasetError::WidthMismatch {
                actual: features.ncols(),
                expected: schema.len(),
            });
        }
        if let Some(ref labels) = labels {
            if labels.len() != features.nrows() {
                return Err(DatasetError::LabelCountMismatch {
                    labels: labels.len(),
                    rows: features.nrows(),
                });
            }
            for (row, &value) in labels.iter().enumerate() {
                if value > 1 {
                    return Err(DatasetError::InvalidLabel { row, value });
                }
            }
        }
        Ok(Self { schema, features, labels })
    }

    /// Number of samples.
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    /// Number of features.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    /// The feature schema.
    #[inline]
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Feature matrix view, shape `[n_samples, n_features]`.
    #[inline]
    pub fn features(&self) -> ArrayView2<'_, f64> {
        self.features.view()
    }

    /// One sample's feature values.
    #[inline]
    pub fn row(&self, index: usize) -> ArrayView1<'_, f64> {
        self.features.row(index)
    }

    /// Binary labels, if this dataset carries them.
    #[inline]
    pub fn labels(&self) -> Option<&[u8]> {
        self.labels.as_deref()
    }
}

/// Non-empty reference distribution for attribution.
///
/// Wraps a feature matrix sharing the schema of the instance being
/// explained. The attribution engine draws "unknown" feature values from
/// these records.
#[derive(Debug, Clone)]
pub struct BackgroundSet {
    schema: FeatureSchema,
    records: Array2<f64>,
}

impl BackgroundSet {
    /// Create a background set from a feature matrix.
    ///
    /// # Errors
    /// Fails on an empty matrix or a schema/width mismatch.
    pub fn new(schema: FeatureSchema, records: Array2<f64>) -> Result<Self, DatasetError> {
        if records.nrows() == 0 {
            return Err(DatasetError::EmptyBackground);
        }
        if records.ncols() != schema.len() {
            return Err(DatasetError::WidthMismatch {
                actual: records.ncols(),
                expected: schema.len(),
            });
        }
        Ok(Self { schema, records })
    }

    /// Use a dataset's feature rows as the background distribution.
    pub fn from_dataset(dataset: &Dataset) -> Result<Self, DatasetError> {
        Self::new(dataset.schema().clone(), dataset.features().to_owned())
    }

    /// Number of background records.
    #[inline]
    pub fn n_records(&self) -> usize {
        self.records.nrows()
    }

    /// The feature schema.
    #[inline]
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// One background record.
    #[inline]
    pub fn record(&self, index: usize) -> ArrayView1<'_, f64> {
        self.records.row(index)
    }

    /// All background records, shape `[n_records, n_features]`.
    #[inline]
    pub fn records(&self) -> ArrayView2<'_, f64> {
        self.records.view()
    }

    /// Per-feature mean over the background records.
    pub fn feature_means(&self) -> Vec<f64> {
        let n = self.records.nrows() as f64;
        (0..self.records.ncols())
            .map(|col| self.records.column(col).sum() / n)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    fn schema() -> FeatureSchema {
        FeatureSchema::from_names(&["a", "b"]).unwrap()
    }

    #[test]
    fn rejects_width_mismatch() {
        let err = Dataset::new(schema(), array![[1.0, 2.0, 3.0]], None).unwrap_err();
        assert_eq!(err, DatasetError::WidthMismatch { actual: 3, expected: 2 });
    }

    #[test]
    fn rejects_bad_labels() {
        let err = Dataset::new(schema(), array![[0.1, 0.2]], Some(vec![2])).unwrap_err();
        assert_eq!(err, DatasetError::InvalidLabel { row: 0, value: 2 });

        let err = Dataset::new(schema(), array![[0.1, 0.2]], Some(vec![0, 1])).unwrap_err();
        assert_eq!(err, DatasetError::LabelCountMismatch { labels: 2, rows: 1 });
    }

    #[test]
    fn rejects_empty_background() {
        let empty = Array2::<f64>::zeros((0, 2));
        let err = BackgroundSet::new(schema(), empty).unwrap_err();
        assert_eq!(err, DatasetError::EmptyBackground);
    }

    #[test]
    fn background_means() {
        let bg = BackgroundSet::new(schema(), array![[0.0, 1.0], [1.0, 3.0]]).unwrap();
        assert_eq!(bg.feature_means(), vec![0.5, 2.0]);
    }

    #[test]
    fn background_from_dataset_shares_schema() {
        let ds = Dataset::new(schema(), array![[0.1, 0.2], [0.3, 0.4]], Some(vec![0, 1])).unwrap();
        let bg = BackgroundSet::from_dataset(&ds).unwrap();
        assert_eq!(bg.n_records(), 2);
        assert_eq!(bg.schema(), ds.schema());
    }
}
