//! Model training and evaluation.

mod metrics;
mod trainer;

pub use metrics::{compute_auc, log_loss, MetricError};
pub use trainer::{TrainError, TrainParams, Trainer};
