//! Attribution container.
//!
//! One instance's explanation: a base value plus one contribution per
//! feature, with verification of the efficiency property
//! `base_value + sum(contributions) == prediction`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::FeatureSchema;

/// Per-feature contributions for one explained instance.
#[derive(Debug, Clone)]
pub struct Attribution {
    schema: FeatureSchema,
    base_value: f64,
    contributions: Vec<f64>,
    prediction: f64,
}

impl Attribution {
    pub(crate) fn new(
        schema: FeatureSchema,
        base_value: f64,
        contributions: Vec<f64>,
        prediction: f64,
    ) -> Self {
        debug_assert_eq!(schema.len(), contributions.len());
        Self { schema, base_value, contributions, prediction }
    }

    /// The model's average output over the background set.
    #[inline]
    pub fn base_value(&self) -> f64 {
        self.base_value
    }

    /// Contributions in schema order.
    #[inline]
    pub fn contributions(&self) -> &[f64] {
        &self.contributions
    }

    /// Contribution of a feature by name.
    pub fn contribution(&self, name: &str) -> Option<f64> {
        self.schema.index_of(name).map(|i| self.contributions[i])
    }

    /// The model output for the explained instance.
    #[inline]
    pub fn prediction(&self) -> f64 {
        self.prediction
    }

    /// The schema these contributions are aligned with.
    #[inline]
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Check the efficiency property within `tolerance`.
    pub fn verify(&self, tolerance: f64) -> bool {
        let sum: f64 = self.contributions.iter().sum();
        (self.base_value + sum - self.prediction).abs() <= tolerance
    }

    /// Serializable form with named contributions, for display consumers.
    pub fn report(&self) -> AttributionReport {
        let contributions = self
            .schema
            .names()
            .iter()
            .cloned()
            .zip(self.contributions.iter().copied())
            .collect();
        AttributionReport {
            base_value: self.base_value,
            contributions,
            prediction: self.prediction,
        }
    }
}

/// Wire form of an attribution: named contributions keyed by feature.
///
/// `BTreeMap` keeps the JSON output deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributionReport {
    pub base_value: f64,
    pub contributions: BTreeMap<String, f64>,
    pub prediction: f64,
}

/// Adjust contributions so they sum exactly to `target_sum`.
///
/// The sampling estimate carries Monte Carlo noise; downstream consumers
/// rely on exact additivity for display, so the residual is folded back in,
/// proportionally to each contribution's magnitude (equal split when all
/// contributions are zero).
pub(crate) fn normalize_contributions(contributions: &mut [f64], target_sum: f64) {
    if contributions.is_empty() {
        return;
    }
    let sum: f64 = contributions.iter().sum();
    let residual = target_sum - sum;
    if residual == 0.0 {
        return;
    }
    let total_abs: f64 = contributions.iter().map(|c| c.abs()).sum();
    if total_abs > 0.0 {
        for c in contributions.iter_mut() {
            *c += residual * c.abs() / total_abs;
        }
    } else {
        let share = residual / contributions.len() as f64;
        for c in contributions.iter_mut() {
            *c += share;
        }
    }
    // Floating-point rounding can leave a tail; pin it on the largest term.
    let sum: f64 = contributions.iter().sum();
    let tail = target_sum - sum;
    if tail != 0.0 {
        if let Some(largest) = contributions
            .iter_mut()
            .max_by(|a, b| a.abs().partial_cmp(&b.abs()).unwrap_or(std::cmp::Ordering::Equal))
        {
            *largest += tail;
        }
    }
}
