use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::preferences::RatingSample;

/// Outcome of fitting with a held-out portion. Diagnostic only; downstream
/// logic never reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalReport {
    pub train_size: usize,
    pub holdout_size: usize,
    /// Root-mean-squared error over the held-out samples, or `None` when
    /// nothing was held out.
    pub rmse: Option<f64>,
}

/// Splits the samples into a training and held-out portion.
///
/// The shuffle is seeded so identical inputs always produce the identical
/// partition. The training portion is never left empty as long as at least
/// one sample was supplied.
pub fn split_samples(
    samples: &[RatingSample],
    holdout_ratio: f64,
    seed: u64,
) -> (Vec<RatingSample>, Vec<RatingSample>) {
    let mut shuffled = samples.to_vec();
    let mut rng = StdRng::seed_from_u64(seed);
    shuffled.shuffle(&mut rng);

    let holdout_len = ((shuffled.len() as f64) * holdout_ratio).round() as usize;
    let holdout_len = holdout_len.min(shuffled.len().saturating_sub(1));
    let holdout = shuffled.split_off(shuffled.len() - holdout_len);
    (shuffled, holdout)
}

/// Root-mean-squared error over (estimate, actual) pairs. `None` for an empty
/// slice.
pub fn rmse(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.is_empty() {
        return None;
    }
    let sum_sq: f64 = pairs
        .iter()
        .map(|(estimate, actual)| (estimate - actual).powi(2))
        .sum();
    Some((sum_sq / pairs.len() as f64).sqrt())
}
