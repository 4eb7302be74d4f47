//! Linear risk model.
//!
//! A fitted logistic classifier: an intercept plus one coefficient per
//! feature, in schema order. Coefficient order is part of the contract —
//! a reordered coefficient vector silently corrupts predictions, so every
//! seam that combines a model with data validates lengths.

use ndarray::ArrayView1;

/// Model/input shape error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Input width doesn't match the coefficient vector.
    #[error("input has {actual} features but model has {expected} coefficients")]
    FeatureCountMismatch { actual: usize, expected: usize },
}

/// Fitted logistic-regression parameters.
///
/// Immutable after fitting; consumed by the evaluator, the attribution
/// engine, and the artifact exporter.
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticModel {
    intercept: f64,
    coefficients: Vec<f64>,
}

impl LogisticModel {
    /// Create a model from an intercept and coefficients in schema order.
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> Self {
        Self { intercept, coefficients }
    }

    /// Number of input features.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    /// The intercept term.
    #[inline]
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Coefficients in schema order.
    #[inline]
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Raw margin (log-odds): `intercept + coefficients · features`.
    ///
    /// # Errors
    /// Fails if the input width doesn't match the model.
    pub fn predict_margin(&self, features: &[f64]) -> Result<f64, ModelError> {
        if features.len() != self.coefficients.len() {
            return Err(ModelError::FeatureCountMismatch {
                actual: features.len(),
                expected: self.coefficients.len(),
            });
        }
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(features)
            .map(|(c, x)| c * x)
            .sum();
        Ok(self.intercept + dot)
    }

    /// Dropout probability in `(0, 1)`: sigmoid of the margin.
    pub fn predict_probability(&self, features: &[f64]) -> Result<f64, ModelError> {
        Ok(sigmoid(self.predict_margin(features)?))
    }

    /// Probability-space scoring adapter for the attribution engine.
    ///
    /// Unlike a bare closure, the adapter carries the model's feature
    /// width, so explainers can reject a mismatched background or instance
    /// before any scoring happens.
    pub fn scorer(&self) -> ModelScorer<'_> {
        ModelScorer { model: self }
    }

    /// Probability for an `ndarray` row view.
    pub fn predict_row(&self, features: ArrayView1<'_, f64>) -> Result<f64, ModelError> {
        if features.len() != self.coefficients.len() {
            return Err(ModelError::FeatureCountMismatch {
                actual: features.len(),
                expected: self.coefficients.len(),
            });
        }
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(features.iter())
            .map(|(c, x)| c * x)
            .sum();
        Ok(sigmoid(self.intercept + dot))
    }
}

/// Width-aware scoring adapter over a [`LogisticModel`].
///
/// Produced by [`LogisticModel::scorer`]; explainers read the feature
/// width and validate it against their schema up front.
#[derive(Debug, Clone, Copy)]
pub struct ModelScorer<'a> {
    model: &'a LogisticModel,
}

impl ModelScorer<'_> {
    /// Feature width the underlying model expects.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.model.n_features()
    }

    /// Dropout probability for a width-validated feature vector.
    #[inline]
    pub fn score(&self, features: &[f64]) -> f64 {
        debug_assert_eq!(features.len(), self.model.coefficients.len());
        let dot: f64 = self
            .model
            .coefficients
            .iter()
            .zip(features)
            .map(|(c, x)| c * x)
            .sum();
        sigmoid(self.model.intercept + dot)
    }
}

/// Numerically plain logistic sigmoid.
#[inline]
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    use super::*;

    #[test]
    fn margin_and_probability() {
        let model = LogisticModel::new(0.5, vec![2.0, -1.0]);
        let margin = model.predict_margin(&[1.0, 0.5]).unwrap();
        assert_abs_diff_eq!(margin, 2.0, epsilon = 1e-12);

        let p = model.predict_probability(&[1.0, 0.5]).unwrap();
        assert_abs_diff_eq!(p, sigmoid(2.0), epsilon = 1e-12);
        assert!(p > 0.0 && p < 1.0);
    }

    #[test]
    fn rejects_width_mismatch() {
        let model = LogisticModel::new(0.0, vec![1.0, 2.0]);
        let err = model.predict_probability(&[1.0]).unwrap_err();
        assert_eq!(err, ModelError::FeatureCountMismatch { actual: 1, expected: 2 });
    }

    #[test]
    fn row_view_matches_slice() {
        let model = LogisticModel::new(-0.2, vec![0.3, 0.7, -0.4]);
        let x = [0.1, 0.9, 0.5];
        let from_slice = model.predict_probability(&x).unwrap();
        let from_view = model.predict_row(array![0.1, 0.9, 0.5].view()).unwrap();
        assert_eq!(from_slice, from_view);
    }

    #[test]
    fn scorer_matches_predict_probability() {
        let model = LogisticModel::new(0.3, vec![1.0, -2.0]);
        let x = [0.4, 0.6];
        assert_eq!(
            model.scorer().score(&x),
            model.predict_probability(&x).unwrap()
        );
        assert_eq!(model.scorer().n_features(), 2);
    }

    #[test]
    fn sigmoid_symmetry() {
        assert_abs_diff_eq!(sigmoid(0.0), 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(sigmoid(3.0) + sigmoid(-3.0), 1.0, epsilon = 1e-12);
    }
}
