//! Feature attribution.
//!
//! Decomposes a prediction into per-feature contributions with an exact
//! additivity guarantee. The sampling explainer works against any scoring
//! black box; the linear explainer is a closed-form fast path for the
//! logistic model.

mod attribution;
mod linear;
mod sampling;

pub use attribution::{Attribution, AttributionReport};
pub use linear::LinearExplainer;
pub use sampling::SamplingExplainer;

use crate::model::{ModelError, ModelScorer};

/// Attribution error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExplainError {
    /// Instance, background, and model must agree on feature count.
    #[error("feature width {actual} doesn't match the expected width {expected}")]
    SchemaMismatch { actual: usize, expected: usize },

    /// The sampling budget must be positive.
    #[error("n_iterations must be > 0")]
    ZeroIterations,

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Black-box scoring function over a feature vector.
///
/// Implementations may assume the input width matches the schema: explainers
/// validate widths before the sampling loop runs.
pub trait Score: Sync {
    fn score(&self, features: &[f64]) -> f64;

    /// Feature width this scorer expects, when it knows one.
    ///
    /// Explainers check it against their schema before scoring anything;
    /// `None` (the closure default) skips the check.
    fn n_features(&self) -> Option<usize> {
        None
    }
}

impl<F> Score for F
where
    F: Fn(&[f64]) -> f64 + Sync,
{
    #[inline]
    fn score(&self, features: &[f64]) -> f64 {
        self(features)
    }
}

impl Score for ModelScorer<'_> {
    #[inline]
    fn score(&self, features: &[f64]) -> f64 {
        ModelScorer::score(self, features)
    }

    #[inline]
    fn n_features(&self) -> Option<usize> {
        Some(ModelScorer::n_features(self))
    }
}
