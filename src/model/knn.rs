//! Neighborhood-based collaborative filtering over the preference samples.
//!
//! The estimator is user-based: two users are similar when the mean squared
//! difference between their ratings over co-rated products is small
//! (`sim = 1 / (msd + 1)`), and a prediction is the similarity-weighted mean
//! of the ratings the most similar users gave the product. Pairs never seen
//! during fit fall back to the global mean of the training ratings rather
//! than failing.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::error::{AssistantError, AssistantResult};
use crate::model::eval::{rmse, split_samples, EvalReport};
use crate::preferences::RatingSample;

/// Tunables for the estimator. Defaults mirror a conventional neighborhood
/// setup: up to 40 neighbors, at least 1 contributing neighbor, similarity
/// counted from a single co-rated product, ratings on the 1..=5 scale.
#[derive(Debug, Clone)]
pub struct KnnConfig {
    pub k: usize,
    pub min_k: usize,
    pub min_support: usize,
    pub rating_min: f64,
    pub rating_max: f64,
}

impl Default for KnnConfig {
    fn default() -> Self {
        Self {
            k: 40,
            min_k: 1,
            min_support: 1,
            rating_min: 1.0,
            rating_max: 5.0,
        }
    }
}

impl KnnConfig {
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn with_min_k(mut self, min_k: usize) -> Self {
        self.min_k = min_k;
        self
    }

    pub fn with_min_support(mut self, min_support: usize) -> Self {
        self.min_support = min_support;
        self
    }
}

/// State produced by a successful fit. Index maps are built from sorted id
/// lists and the per-product rating lists are kept in user-index order, so a
/// refit on identical samples reproduces every estimate exactly.
struct Fitted {
    user_index: HashMap<String, usize>,
    item_index: HashMap<String, usize>,
    /// Per item, (user index, rating) sorted by user index.
    ratings_by_item: Vec<Vec<(usize, f64)>>,
    /// Symmetric user-user similarity matrix, zero on the diagonal.
    sim: Vec<Vec<f64>>,
    global_mean: f64,
}

pub struct KnnModel {
    config: KnnConfig,
    fitted: Option<Fitted>,
}

impl KnnModel {
    pub fn new(config: KnnConfig) -> Self {
        Self {
            config,
            fitted: None,
        }
    }

    pub fn is_fit(&self) -> bool {
        self.fitted.is_some()
    }

    /// Fits the estimator on the full sample set. A repeated fit replaces the
    /// previous state wholesale.
    pub fn fit(&mut self, samples: &[RatingSample]) -> AssistantResult<()> {
        if samples.is_empty() {
            return Err(AssistantError::Validation(
                "cannot fit the rating model on an empty sample set".to_string(),
            ));
        }
        for sample in samples {
            let rating = f64::from(sample.rating);
            if rating < self.config.rating_min || rating > self.config.rating_max {
                return Err(AssistantError::Validation(format!(
                    "rating {} for user '{}' on product '{}' is outside the {}..={} scale",
                    sample.rating,
                    sample.user_id,
                    sample.product_id,
                    self.config.rating_min,
                    self.config.rating_max
                )));
            }
        }

        let mut user_ids: Vec<&str> = samples.iter().map(|s| s.user_id.as_str()).collect();
        user_ids.sort_unstable();
        user_ids.dedup();
        let mut item_ids: Vec<&str> = samples.iter().map(|s| s.product_id.as_str()).collect();
        item_ids.sort_unstable();
        item_ids.dedup();

        let user_index: HashMap<String, usize> = user_ids
            .iter()
            .enumerate()
            .map(|(idx, id)| (id.to_string(), idx))
            .collect();
        let item_index: HashMap<String, usize> = item_ids
            .iter()
            .enumerate()
            .map(|(idx, id)| (id.to_string(), idx))
            .collect();

        // Duplicate (user, product) observations collapse to the last one.
        let mut cells: BTreeMap<(usize, usize), f64> = BTreeMap::new();
        for sample in samples {
            let u = user_index[sample.user_id.as_str()];
            let i = item_index[sample.product_id.as_str()];
            cells.insert((u, i), f64::from(sample.rating));
        }

        let mut ratings_by_user: Vec<Vec<(usize, f64)>> = vec![Vec::new(); user_ids.len()];
        let mut ratings_by_item: Vec<Vec<(usize, f64)>> = vec![Vec::new(); item_ids.len()];
        let mut rating_sum = 0.0;
        for (&(u, i), &rating) in &cells {
            ratings_by_user[u].push((i, rating));
            ratings_by_item[i].push((u, rating));
            rating_sum += rating;
        }
        let global_mean = rating_sum / cells.len() as f64;

        let n_users = user_ids.len();
        let mut sim = vec![vec![0.0; n_users]; n_users];
        for u in 0..n_users {
            for v in (u + 1)..n_users {
                let (msd, support) = msd_support(&ratings_by_user[u], &ratings_by_user[v]);
                if support >= self.config.min_support {
                    let similarity = 1.0 / (msd + 1.0);
                    sim[u][v] = similarity;
                    sim[v][u] = similarity;
                }
            }
        }

        self.fitted = Some(Fitted {
            user_index,
            item_index,
            ratings_by_item,
            sim,
            global_mean,
        });
        Ok(())
    }

    /// Fits on the training portion of a deterministic split and scores the
    /// held-out portion, for the one-time accuracy report at startup.
    pub fn fit_with_holdout(
        &mut self,
        samples: &[RatingSample],
        holdout_ratio: f64,
        seed: u64,
    ) -> AssistantResult<EvalReport> {
        if !(0.0..1.0).contains(&holdout_ratio) {
            return Err(AssistantError::Validation(format!(
                "holdout ratio {} must be within 0.0..1.0",
                holdout_ratio
            )));
        }

        let (train, holdout) = split_samples(samples, holdout_ratio, seed);
        self.fit(&train)?;

        let mut pairs = Vec::with_capacity(holdout.len());
        for sample in &holdout {
            let estimate = self.predict(&sample.user_id, &sample.product_id)?;
            pairs.push((estimate, f64::from(sample.rating)));
        }

        Ok(EvalReport {
            train_size: train.len(),
            holdout_size: holdout.len(),
            rmse: rmse(&pairs),
        })
    }

    /// Estimates the rating `user_id` would give `product_id`.
    ///
    /// Unknown users or products, and neighborhoods with fewer than `min_k`
    /// contributing users, degrade to the global mean of the training
    /// ratings. Calling this before `fit` is a logic error and fails fast.
    pub fn predict(&self, user_id: &str, product_id: &str) -> AssistantResult<f64> {
        let fitted = self
            .fitted
            .as_ref()
            .ok_or(AssistantError::InvalidState("predict called before fit"))?;

        let (Some(&u), Some(&i)) = (
            fitted.user_index.get(user_id),
            fitted.item_index.get(product_id),
        ) else {
            return Ok(fitted.global_mean);
        };

        let mut neighbors: Vec<(f64, usize, f64)> = fitted.ratings_by_item[i]
            .iter()
            .filter(|&&(v, _)| v != u)
            .map(|&(v, rating)| (fitted.sim[u][v], v, rating))
            .filter(|&(similarity, _, _)| similarity > 0.0)
            .collect();
        neighbors.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        neighbors.truncate(self.config.k);

        if neighbors.len() < self.config.min_k {
            return Ok(fitted.global_mean);
        }

        let mut weighted_sum = 0.0;
        let mut weight_total = 0.0;
        for (similarity, _, rating) in neighbors {
            weighted_sum += similarity * rating;
            weight_total += similarity;
        }
        if weight_total <= 0.0 {
            return Ok(fitted.global_mean);
        }

        let estimate = weighted_sum / weight_total;
        Ok(estimate.clamp(self.config.rating_min, self.config.rating_max))
    }
}

/// Mean squared difference and co-rating count between two users' sorted
/// rating lists, via a merge join on item index.
fn msd_support(a: &[(usize, f64)], b: &[(usize, f64)]) -> (f64, usize) {
    let mut ai = 0;
    let mut bi = 0;
    let mut sum_sq = 0.0;
    let mut count = 0usize;
    while ai < a.len() && bi < b.len() {
        match a[ai].0.cmp(&b[bi].0) {
            Ordering::Less => ai += 1,
            Ordering::Greater => bi += 1,
            Ordering::Equal => {
                let diff = a[ai].1 - b[bi].1;
                sum_sq += diff * diff;
                count += 1;
                ai += 1;
                bi += 1;
            }
        }
    }
    let msd = if count > 0 { sum_sq / count as f64 } else { 0.0 };
    (msd, count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::seed_preferences;

    fn three_user_samples() -> Vec<RatingSample> {
        vec![
            RatingSample::new("u1", "a", 5),
            RatingSample::new("u1", "b", 3),
            RatingSample::new("u2", "a", 5),
            RatingSample::new("u2", "c", 4),
            RatingSample::new("u3", "a", 1),
            RatingSample::new("u3", "c", 2),
        ]
    }

    #[test]
    fn test_predict_before_fit_fails_fast() {
        let model = KnnModel::new(KnnConfig::default());
        let result = model.predict("1", "101");
        assert!(matches!(result, Err(AssistantError::InvalidState(_))));
    }

    #[test]
    fn test_fit_on_empty_samples_is_rejected() {
        let mut model = KnnModel::new(KnnConfig::default());
        let result = model.fit(&[]);
        assert!(matches!(result, Err(AssistantError::Validation(_))));
        assert!(!model.is_fit());
    }

    #[test]
    fn test_fit_rejects_out_of_scale_ratings() {
        let mut model = KnnModel::new(KnnConfig::default());
        let samples = vec![RatingSample::new("u1", "a", 9)];
        assert!(matches!(
            model.fit(&samples),
            Err(AssistantError::Validation(_))
        ));
    }

    #[test]
    fn test_predict_weighs_neighbors_by_similarity() {
        // u2 agrees with u1 on product a exactly (sim 1), u3 disagrees by 4
        // (sim 1/17). Both rated c, so the estimate for (u1, c) is
        // (1 * 4 + 1/17 * 2) / (1 + 1/17) = 70/18.
        let mut model = KnnModel::new(KnnConfig::default());
        model.fit(&three_user_samples()).unwrap();

        let estimate = model.predict("u1", "c").unwrap();
        assert!((estimate - 70.0 / 18.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_user_falls_back_to_global_mean() {
        let mut model = KnnModel::new(KnnConfig::default());
        model.fit(&three_user_samples()).unwrap();

        // global mean of 5, 3, 5, 4, 1, 2
        let expected = 20.0 / 6.0;
        assert!((model.predict("stranger", "a").unwrap() - expected).abs() < 1e-9);
        assert!((model.predict("u1", "unknown-product").unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_starved_neighborhood_falls_back_to_global_mean() {
        // Nobody but u1 rated b, so (u1, b) has no usable neighbors.
        let mut model = KnnModel::new(KnnConfig::default());
        model.fit(&three_user_samples()).unwrap();

        let expected = 20.0 / 6.0;
        assert!((model.predict("u1", "b").unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_k_limits_neighborhood_size() {
        // With k = 1 only the closest neighbor (u2, sim 1) contributes to
        // (u1, c), so the estimate is exactly u2's rating of c.
        let mut model = KnnModel::new(KnnConfig::default().with_k(1));
        model.fit(&three_user_samples()).unwrap();

        let estimate = model.predict("u1", "c").unwrap();
        assert!((estimate - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_min_support_zeroes_thin_similarities() {
        // u1 and u2 share only product a; requiring two co-rated products
        // removes u2 from u1's neighborhood and (u1, c) degrades to the
        // global mean.
        let mut model = KnnModel::new(KnnConfig::default().with_min_support(2));
        model.fit(&three_user_samples()).unwrap();

        let expected = 20.0 / 6.0;
        assert!((model.predict("u1", "c").unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_refit_on_identical_samples_is_deterministic() {
        let samples = seed_preferences();

        let mut first = KnnModel::new(KnnConfig::default());
        first.fit(&samples).unwrap();
        let mut second = KnnModel::new(KnnConfig::default());
        second.fit(&samples).unwrap();

        for sample in &samples {
            let a = first.predict(&sample.user_id, &sample.product_id).unwrap();
            let b = second.predict(&sample.user_id, &sample.product_id).unwrap();
            assert_eq!(a, b);
        }
        assert_eq!(
            first.predict("1", "105").unwrap(),
            second.predict("1", "105").unwrap()
        );
    }

    #[test]
    fn test_fit_with_holdout_reports_deterministically() {
        let samples = seed_preferences();

        let mut first = KnnModel::new(KnnConfig::default());
        let report_a = first.fit_with_holdout(&samples, 0.3, 42).unwrap();
        let mut second = KnnModel::new(KnnConfig::default());
        let report_b = second.fit_with_holdout(&samples, 0.3, 42).unwrap();

        assert_eq!(report_a, report_b);
        assert_eq!(report_a.train_size, 6);
        assert_eq!(report_a.holdout_size, 3);
        assert!(report_a.rmse.is_some());
    }

    #[test]
    fn test_fit_with_holdout_rejects_bad_ratio() {
        let mut model = KnnModel::new(KnnConfig::default());
        let samples = seed_preferences();
        assert!(matches!(
            model.fit_with_holdout(&samples, 1.5, 42),
            Err(AssistantError::Validation(_))
        ));
    }

    #[test]
    fn test_estimates_stay_within_rating_scale() {
        let mut model = KnnModel::new(KnnConfig::default());
        model.fit(&seed_preferences()).unwrap();

        for user in ["1", "2", "3", "nobody"] {
            for product in ["101", "104", "108", "999"] {
                let estimate = model.predict(user, product).unwrap();
                assert!((1.0..=5.0).contains(&estimate));
            }
        }
    }
}
