//! Data handling: schema, datasets, normalization, and survey ingestion.

mod dataset;
mod normalize;
mod schema;
pub mod survey;

pub use dataset::{BackgroundSet, Dataset, DatasetError};
pub use normalize::{FieldSpec, NormalizeError, Normalizer};
pub use schema::{FeatureSchema, SchemaError};
pub use survey::{dataset_from_records, load_survey, SurveyError, SurveyRecord};
