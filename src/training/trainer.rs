//! Logistic-regression trainer.
//!
//! Full-batch gradient descent on the cross-entropy loss. Training stops
//! when an iteration improves the loss by less than tolerance without
//! raising it; hitting the iteration budget while the loss is still moving
//! in either direction is reported as an error rather than silently
//! returning a poor fit.

use ndarray::{Array1, ArrayView2};

use crate::data::Dataset;
use crate::model::{sigmoid, LogisticModel};

use super::metrics::log_loss;

/// Training error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrainError {
    /// Both classes must be present; a single-class fit is meaningless.
    #[error("degenerate labels: {n_positive} positive and {n_negative} negative")]
    DegenerateLabels { n_positive: usize, n_negative: usize },

    /// The iteration budget ran out while the loss was still moving.
    #[error(
        "did not converge after {iterations} iterations (last improvement {last_improvement:.3e})"
    )]
    NotConverged { iterations: usize, last_improvement: f64 },

    /// The dataset carries no labels.
    #[error("dataset has no labels; training requires labeled records")]
    MissingLabels,

    /// learning_rate must be > 0.
    #[error("learning_rate must be > 0, got {0}")]
    InvalidLearningRate(f64),

    /// l2 must be >= 0.
    #[error("l2 must be >= 0, got {0}")]
    InvalidL2(f64),

    /// tolerance must be > 0.
    #[error("tolerance must be > 0, got {0}")]
    InvalidTolerance(f64),

    /// max_iter must be > 0.
    #[error("max_iter must be > 0")]
    InvalidMaxIter,
}

/// Parameters for logistic training.
#[derive(Debug, Clone)]
pub struct TrainParams {
    /// Gradient-descent step size.
    pub learning_rate: f64,

    /// L2 regularization strength. Applied to coefficients, not the
    /// intercept.
    pub l2: f64,

    /// Iteration budget.
    pub max_iter: usize,

    /// Stop when the loss improvement between iterations drops below this.
    pub tolerance: f64,
}

impl Default for TrainParams {
    fn default() -> Self {
        Self {
            learning_rate: 0.5,
            l2: 0.0,
            max_iter: 1000,
            tolerance: 1e-6,
        }
    }
}

impl TrainParams {
    fn validate(&self) -> Result<(), TrainError> {
        if !(self.learning_rate > 0.0) {
            return Err(TrainError::InvalidLearningRate(self.learning_rate));
        }
        if self.l2 < 0.0 {
            return Err(TrainError::InvalidL2(self.l2));
        }
        if !(self.tolerance > 0.0) {
            return Err(TrainError::InvalidTolerance(self.tolerance));
        }
        if self.max_iter == 0 {
            return Err(TrainError::InvalidMaxIter);
        }
        Ok(())
    }
}

/// A run whose final step still moves the loss by more than
/// `MEANINGFUL_CHANGE_FACTOR * tolerance` in either direction is reported
/// as non-converged; below that the loss is considered settled and the
/// current parameters are returned. The check is on the magnitude, not the
/// sign: an oscillating step size raises the loss as often as it lowers
/// it, and both are non-convergence. On separable data the cross-entropy
/// creeps down indefinitely (the optimum is at infinity), so the factor
/// sits well above that asymptotic tail.
const MEANINGFUL_CHANGE_FACTOR: f64 = 1000.0;

/// Logistic-regression trainer.
#[derive(Debug, Clone, Default)]
pub struct Trainer {
    params: TrainParams,
}

impl Trainer {
    pub fn new(params: TrainParams) -> Self {
        Self { params }
    }

    /// Fit a logistic model on a labeled dataset.
    ///
    /// # Errors
    /// - [`TrainError::MissingLabels`] if the dataset is unlabeled
    /// - [`TrainError::DegenerateLabels`] unless both classes are present
    /// - [`TrainError::NotConverged`] when the budget is exhausted while the
    ///   loss is still moving meaningfully in either direction; a settled
    ///   loss returns the current parameters instead
    pub fn fit(&self, dataset: &Dataset) -> Result<LogisticModel, TrainError> {
        self.params.validate()?;

        let labels = dataset.labels().ok_or(TrainError::MissingLabels)?;
        let n_pos = labels.iter().filter(|&&l| l == 1).count();
        let n_neg = labels.len() - n_pos;
        if n_pos == 0 || n_neg == 0 {
            return Err(TrainError::DegenerateLabels {
                n_positive: n_pos,
                n_negative: n_neg,
            });
        }

        let features = dataset.features();
        let n_samples = dataset.n_samples();
        let n_features = dataset.n_features();

        let targets: Array1<f64> = labels.iter().map(|&l| l as f64).collect();
        let mut coefficients = Array1::<f64>::zeros(n_features);
        let mut intercept = 0.0f64;

        let mut prev_loss = self.loss(features, &coefficients, intercept, labels);

        for iteration in 0..self.params.max_iter {
            // p - y for the current parameters
            let margins = features.dot(&coefficients) + intercept;
            let residuals = margins.mapv(sigmoid) - &targets;

            let mut grad = features.t().dot(&residuals) / n_samples as f64;
            if self.params.l2 > 0.0 {
                grad = grad + &(self.params.l2 / n_samples as f64 * &coefficients);
            }
            let grad_intercept = residuals.sum() / n_samples as f64;

            coefficients = coefficients - self.params.learning_rate * &grad;
            intercept -= self.params.learning_rate * grad_intercept;

            let loss = self.loss(features, &coefficients, intercept, labels);
            let last_improvement = prev_loss - loss;
            prev_loss = loss;

            // Converged only on a genuine (non-negative) improvement below
            // tolerance; a step that raised the loss is never convergence.
            if last_improvement >= 0.0 && last_improvement < self.params.tolerance {
                return Ok(LogisticModel::new(intercept, coefficients.to_vec()));
            }

            // Final iteration: decide between plateau and genuine
            // non-convergence by the magnitude of the last loss change.
            if iteration + 1 == self.params.max_iter
                && last_improvement.abs() > MEANINGFUL_CHANGE_FACTOR * self.params.tolerance
            {
                return Err(TrainError::NotConverged {
                    iterations: self.params.max_iter,
                    last_improvement,
                });
            }
        }

        Ok(LogisticModel::new(intercept, coefficients.to_vec()))
    }

    fn loss(
        &self,
        features: ArrayView2<'_, f64>,
        coefficients: &Array1<f64>,
        intercept: f64,
        labels: &[u8],
    ) -> f64 {
        let probs: Vec<f64> = (features.dot(coefficients) + intercept)
            .mapv(sigmoid)
            .to_vec();
        let mut loss = log_loss(labels, &probs).expect("lengths match by construction");
        if self.params.l2 > 0.0 {
            let penalty: f64 = coefficients.iter().map(|c| c * c).sum();
            loss += self.params.l2 * penalty / (2.0 * labels.len() as f64);
        }
        loss
    }
}
