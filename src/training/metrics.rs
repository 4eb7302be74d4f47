//! Evaluation metrics for binary classifiers.
//!
//! AUC is computed from the Mann–Whitney U statistic via a single sort with
//! tie handling, so it costs O(n log n) rather than iterating all
//! positive/negative pairs.

/// Metric computation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetricError {
    /// AUC is undefined without both classes present.
    #[error("AUC undefined: {n_positive} positive and {n_negative} negative labels")]
    InsufficientData { n_positive: usize, n_negative: usize },

    /// Labels and predictions must be the same length.
    #[error("got {labels} labels but {predictions} predictions")]
    LengthMismatch { labels: usize, predictions: usize },
}

/// Area under the ROC curve.
///
/// Equals the probability that a randomly chosen positive is ranked above a
/// randomly chosen negative; ties contribute one half.
///
/// # Errors
/// Fails with [`MetricError::InsufficientData`] when either class is absent,
/// and [`MetricError::LengthMismatch`] on inconsistent input lengths.
pub fn compute_auc(labels: &[u8], predictions: &[f64]) -> Result<f64, MetricError> {
    if labels.len() != predictions.len() {
        return Err(MetricError::LengthMismatch {
            labels: labels.len(),
            predictions: predictions.len(),
        });
    }
    let n = labels.len();
    let n_pos = labels.iter().filter(|&&l| l == 1).count();
    let n_neg = n - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Err(MetricError::InsufficientData {
            n_positive: n_pos,
            n_negative: n_neg,
        });
    }

    let mut indices: Vec<usize> = (0..n).collect();
    indices.sort_by(|&a, &b| {
        predictions[a]
            .partial_cmp(&predictions[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // Walk tie groups in ascending order, assigning the average rank to
    // every member of a group.
    let mut rank_sum_pos = 0.0f64;
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && (predictions[indices[i]] - predictions[indices[j]]).abs() < 1e-12 {
            j += 1;
        }

        let avg_rank = (i + 1 + j) as f64 / 2.0;
        for &idx in indices.iter().take(j).skip(i) {
            if labels[idx] == 1 {
                rank_sum_pos += avg_rank;
            }
        }

        i = j;
    }

    let n_pos_f = n_pos as f64;
    let n_neg_f = n_neg as f64;
    Ok((rank_sum_pos - n_pos_f * (n_pos_f + 1.0) / 2.0) / (n_pos_f * n_neg_f))
}

/// Binary cross-entropy: `-mean(y*ln(p) + (1-y)*ln(1-p))`.
///
/// Probabilities are clamped away from 0 and 1 to keep the logs finite.
pub fn log_loss(labels: &[u8], predictions: &[f64]) -> Result<f64, MetricError> {
    if labels.len() != predictions.len() {
        return Err(MetricError::LengthMismatch {
            labels: labels.len(),
            predictions: predictions.len(),
        });
    }
    if labels.is_empty() {
        return Ok(0.0);
    }

    const EPS: f64 = 1e-15;
    let sum: f64 = labels
        .iter()
        .zip(predictions)
        .map(|(&l, &p)| {
            let p = p.clamp(EPS, 1.0 - EPS);
            let l = l as f64;
            -(l * p.ln() + (1.0 - l) * (1.0 - p).ln())
        })
        .sum();
    Ok(sum / labels.len() as f64)
}
