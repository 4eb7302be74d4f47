//! Model artifact serialization.
//!
//! The artifact is the only state that crosses the process boundary: a
//! compact, versioned JSON document carrying the fitted parameters and the
//! ordered feature-name list. It is self-describing so a consumer reads
//! `feature_names` for evaluation order instead of hard-coding it.
//!
//! Schema types are separate from runtime types so the wire format can
//! evolve independently and be validated during import. `BTreeMap` keeps
//! the JSON output deterministic.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::{FeatureSchema, SchemaError};
use crate::model::LogisticModel;

/// The schema version written by this crate.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Schema versions this crate can import.
pub const SUPPORTED_SCHEMA_VERSIONS: &[u32] = &[1];

/// Artifact error.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    /// The artifact was written by an unknown format revision.
    #[error("unsupported schema_version {0}, supported: {SUPPORTED_SCHEMA_VERSIONS:?}")]
    UnsupportedSchemaVersion(u32),

    /// Feature-name and coefficient counts disagree.
    #[error("artifact names {names} features but carries {coefficients} coefficients")]
    FeatureCountMismatch { names: usize, coefficients: usize },

    /// A named feature has no coefficient entry.
    #[error("artifact has no coefficient for feature `{0}`")]
    MissingCoefficient(String),

    /// The feature-name list itself is invalid.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("artifact I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("artifact JSON invalid: {0}")]
    Json(#[from] serde_json::Error),
}

/// Portable form of a fitted model.
///
/// Wire layout:
///
/// ```json
/// {
///   "schema_version": 1,
///   "feature_names": ["visual_score", "..."],
///   "intercept": -1.2,
///   "coefficients": { "visual_score": 0.4 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub schema_version: u32,
    /// Evaluation order for consumers; coefficients are keyed by name.
    pub feature_names: Vec<String>,
    pub intercept: f64,
    pub coefficients: BTreeMap<String, f64>,
}

impl ModelArtifact {
    /// Serialize fitted parameters with their feature schema.
    pub fn export(model: &LogisticModel, schema: &FeatureSchema) -> Self {
        let coefficients = schema
            .names()
            .iter()
            .cloned()
            .zip(model.coefficients().iter().copied())
            .collect();
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            feature_names: schema.names().to_vec(),
            intercept: model.intercept(),
            coefficients,
        }
    }

    /// Reconstruct the model and schema, validating the artifact.
    ///
    /// # Errors
    /// - [`ArtifactError::UnsupportedSchemaVersion`] for unknown versions
    /// - [`ArtifactError::FeatureCountMismatch`] /
    ///   [`ArtifactError::MissingCoefficient`] for malformed payloads
    pub fn import(&self) -> Result<(LogisticModel, FeatureSchema), ArtifactError> {
        if !SUPPORTED_SCHEMA_VERSIONS.contains(&self.schema_version) {
            return Err(ArtifactError::UnsupportedSchemaVersion(self.schema_version));
        }
        if self.feature_names.len() != self.coefficients.len() {
            return Err(ArtifactError::FeatureCountMismatch {
                names: self.feature_names.len(),
                coefficients: self.coefficients.len(),
            });
        }

        let schema = FeatureSchema::new(self.feature_names.clone())?;
        let coefficients = self
            .feature_names
            .iter()
            .map(|name| {
                self.coefficients
                    .get(name)
                    .copied()
                    .ok_or_else(|| ArtifactError::MissingCoefficient(name.clone()))
            })
            .collect::<Result<Vec<f64>, _>>()?;

        Ok((LogisticModel::new(self.intercept, coefficients), schema))
    }

    /// Write the artifact as JSON to a file.
    ///
    /// The handle is scoped to this call; it closes on every exit path.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ArtifactError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Read an artifact from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let file = File::open(path)?;
        let artifact = serde_json::from_reader(BufReader::new(file))?;
        Ok(artifact)
    }
}
