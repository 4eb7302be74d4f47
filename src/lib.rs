//! attrition: dropout-risk modeling and feature attribution.
//!
//! Estimates a student's dropout risk from survey-derived cognitive-profile
//! scores and academic metrics, trains an interpretable logistic classifier,
//! and explains each prediction with Shapley-value feature attributions that
//! satisfy exact additivity. A versioned JSON artifact carries the fitted
//! model to lightweight consumers with no access to the training stack.
//!
//! # Key Types
//!
//! - [`Normalizer`] / [`Dataset`] - Feature preparation
//! - [`Trainer`] / [`LogisticModel`] - Fitting and prediction
//! - [`SamplingExplainer`] / [`LinearExplainer`] - Attribution
//! - [`ModelArtifact`] - Portable model exchange
//!
//! # Pipeline
//!
//! ```no_run
//! use attrition::{
//!     compute_auc, dataset_from_records, load_survey, BackgroundSet, ModelArtifact,
//!     SamplingExplainer, Trainer,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let records = load_survey("data/encuesta.json")?;
//! let dataset = dataset_from_records(&records)?;
//!
//! let model = Trainer::default().fit(&dataset)?;
//! let probs: Vec<f64> = (0..dataset.n_samples())
//!     .map(|i| model.predict_row(dataset.row(i)))
//!     .collect::<Result<_, _>>()?;
//! let auc = compute_auc(dataset.labels().unwrap(), &probs)?;
//! println!("AUC = {auc:.3}");
//!
//! let background = BackgroundSet::from_dataset(&dataset)?;
//! let attribution = SamplingExplainer::default()
//!     .explain(&model.scorer(), &background, &dataset.row(0).to_vec())?;
//! println!("{}", serde_json::to_string_pretty(&attribution.report())?);
//!
//! ModelArtifact::export(&model, dataset.schema()).save("data/model.json")?;
//! # Ok(())
//! # }
//! ```

pub mod data;
pub mod explainability;
pub mod model;
pub mod persist;
pub mod training;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use data::{
    dataset_from_records, load_survey, BackgroundSet, Dataset, DatasetError, FeatureSchema,
    FieldSpec, NormalizeError, Normalizer, SchemaError, SurveyError, SurveyRecord,
};
pub use explainability::{
    Attribution, AttributionReport, ExplainError, LinearExplainer, SamplingExplainer, Score,
};
pub use model::{sigmoid, LogisticModel, ModelError, ModelScorer};
pub use persist::{ArtifactError, ModelArtifact, CURRENT_SCHEMA_VERSION};
pub use training::{compute_auc, log_loss, MetricError, TrainError, TrainParams, Trainer};
pub use utils::Parallelism;
