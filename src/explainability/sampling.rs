//! Monte Carlo Shapley-value explainer.
//!
//! Model-agnostic: works against any [`Score`] black box, so it explains
//! the logistic model and any future model the same way. Each sampling
//! iteration draws a random feature permutation and a random background
//! record, walks the permutation switching features from "background" to
//! "instance" one at a time, and records the marginal score change per
//! feature. Averaged over iterations this converges to the exact Shapley
//! value; a final residual correction makes the efficiency property hold
//! exactly rather than approximately.
//!
//! Iterations are independent, so they are distributed over fixed-size
//! chunks with per-chunk RNG seeds. Chunk results are summed in chunk
//! order, which makes serial and parallel runs bit-identical for the same
//! seed.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;

use crate::data::BackgroundSet;
use crate::utils::Parallelism;

use super::attribution::{normalize_contributions, Attribution};
use super::{ExplainError, Score};

/// Iterations per work chunk.
///
/// Fixed regardless of execution mode so the chunk decomposition (and with
/// it the random stream per chunk) never depends on thread count.
const CHUNK_SIZE: usize = 32;

/// Sampling-based Shapley explainer.
#[derive(Debug, Clone)]
pub struct SamplingExplainer {
    n_iterations: usize,
    seed: u64,
    parallelism: Parallelism,
}

impl Default for SamplingExplainer {
    fn default() -> Self {
        Self {
            n_iterations: 256,
            seed: 42,
            parallelism: Parallelism::Sequential,
        }
    }
}

impl SamplingExplainer {
    pub fn new(n_iterations: usize, seed: u64) -> Self {
        Self { n_iterations, seed, ..Self::default() }
    }

    /// Set the sampling budget. More iterations, tighter estimates; runtime
    /// is O(iterations x features) score evaluations.
    pub fn with_iterations(mut self, n_iterations: usize) -> Self {
        self.n_iterations = n_iterations;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Allow distributing sampling chunks across rayon workers.
    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// Explain one instance against a background distribution.
    ///
    /// # Errors
    /// Fails when the instance width doesn't match the background schema or
    /// the iteration budget is zero.
    pub fn explain<S: Score>(
        &self,
        score: &S,
        background: &BackgroundSet,
        instance: &[f64],
    ) -> Result<Attribution, ExplainError> {
        let n_features = background.schema().len();
        if instance.len() != n_features {
            return Err(ExplainError::SchemaMismatch {
                actual: instance.len(),
                expected: n_features,
            });
        }
        // Width-aware scorers are checked before anything is scored; a
        // mismatched model/background pairing must not reach the loop.
        if let Some(expected) = score.n_features() {
            if expected != n_features {
                return Err(ExplainError::SchemaMismatch {
                    actual: n_features,
                    expected,
                });
            }
        }
        if self.n_iterations == 0 {
            return Err(ExplainError::ZeroIterations);
        }

        let base_value = self.mean_background_score(score, background);
        let prediction = score.score(instance);

        let n_chunks = self.n_iterations.div_ceil(CHUNK_SIZE);
        let chunk_totals: Vec<Vec<f64>> = if self.parallelism.is_parallel() {
            (0..n_chunks)
                .into_par_iter()
                .map(|chunk| self.run_chunk(score, background, instance, chunk))
                .collect()
        } else {
            (0..n_chunks)
                .map(|chunk| self.run_chunk(score, background, instance, chunk))
                .collect()
        };

        // Chunk-ordered summation: identical result for serial and parallel.
        let mut contributions = vec![0.0f64; n_features];
        for totals in &chunk_totals {
            for (acc, &t) in contributions.iter_mut().zip(totals) {
                *acc += t;
            }
        }
        for c in contributions.iter_mut() {
            *c /= self.n_iterations as f64;
        }

        normalize_contributions(&mut contributions, prediction - base_value);

        Ok(Attribution::new(
            background.schema().clone(),
            base_value,
            contributions,
            prediction,
        ))
    }

    fn mean_background_score<S: Score>(&self, score: &S, background: &BackgroundSet) -> f64 {
        let mut buffer = vec![0.0f64; background.schema().len()];
        let sum: f64 = (0..background.n_records())
            .map(|i| {
                copy_record(background, i, &mut buffer);
                score.score(&buffer)
            })
            .sum();
        sum / background.n_records() as f64
    }

    /// Run one chunk of sampling iterations, returning summed (not yet
    /// averaged) marginal contributions per feature.
    fn run_chunk<S: Score>(
        &self,
        score: &S,
        background: &BackgroundSet,
        instance: &[f64],
        chunk: usize,
    ) -> Vec<f64> {
        let n_features = instance.len();
        let start = chunk * CHUNK_SIZE;
        let len = CHUNK_SIZE.min(self.n_iterations - start);

        // Stream separation per chunk; the odd constant is the splitmix64
        // increment, which keeps nearby chunk indices uncorrelated.
        let chunk_seed = self
            .seed
            .wrapping_add((chunk as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(chunk_seed);

        let mut totals = vec![0.0f64; n_features];
        let mut permutation: Vec<usize> = (0..n_features).collect();
        let mut hybrid = vec![0.0f64; n_features];

        for _ in 0..len {
            permutation.shuffle(&mut rng);
            let bg_index = rng.gen_range(0..background.n_records());
            copy_record(background, bg_index, &mut hybrid);

            // Walk the permutation, flipping one feature at a time from the
            // background value to the instance value. The score delta at
            // each flip is that feature's marginal contribution under this
            // permutation and background draw.
            let mut prev_score = score.score(&hybrid);
            for &feature in &permutation {
                hybrid[feature] = instance[feature];
                let with_score = score.score(&hybrid);
                totals[feature] += with_score - prev_score;
                prev_score = with_score;
            }
        }

        totals
    }
}

fn copy_record(background: &BackgroundSet, index: usize, buffer: &mut [f64]) {
    for (dst, &src) in buffer.iter_mut().zip(background.record(index).iter()) {
        *dst = src;
    }
}
