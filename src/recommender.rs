use crate::catalog::Product;
use crate::error::AssistantResult;
use crate::model::KnnModel;

/// Maximum number of products in a meal plan.
pub const PLAN_SIZE: usize = 3;

/// Scores every candidate through the fitted model and returns the names of
/// the top `min(3, candidates)` products, best estimate first.
///
/// The sort is stable, so candidates with equal estimates keep the order the
/// filter produced. Pure over its inputs; model errors (notably predicting
/// on an unfit model) propagate untouched.
pub fn recommend(
    model: &KnnModel,
    user_id: &str,
    candidates: &[&Product],
) -> AssistantResult<Vec<String>> {
    let mut scored: Vec<(&Product, f64)> = Vec::with_capacity(candidates.len());
    for product in candidates {
        let estimate = model.predict(user_id, &product.code)?;
        scored.push((product, estimate));
    }

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    Ok(scored
        .into_iter()
        .take(PLAN_SIZE)
        .map(|(product, _)| product.name.clone())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AssistantError;
    use crate::model::{KnnConfig, KnnModel};
    use crate::preferences::RatingSample;

    fn product(code: &str, name: &str) -> Product {
        Product {
            code: code.to_string(),
            name: name.to_string(),
            category: "Meat".to_string(),
            ingredients: "meat".to_string(),
            energy_100g: Some(100.0),
        }
    }

    /// Two users who agree on product x, so user 2's ratings drive user 1's
    /// estimates for a, b, and c.
    fn fitted_model() -> KnnModel {
        let samples = vec![
            RatingSample::new("1", "x", 5),
            RatingSample::new("2", "x", 5),
            RatingSample::new("2", "a", 2),
            RatingSample::new("2", "b", 5),
            RatingSample::new("2", "c", 4),
            RatingSample::new("2", "d", 3),
        ];
        let mut model = KnnModel::new(KnnConfig::default());
        model.fit(&samples).unwrap();
        model
    }

    #[test]
    fn test_recommend_orders_by_estimate_descending() {
        let model = fitted_model();
        let products = [
            product("a", "Product A"),
            product("b", "Product B"),
            product("c", "Product C"),
            product("d", "Product D"),
        ];
        let candidates: Vec<&Product> = products.iter().collect();

        let plan = recommend(&model, "1", &candidates).unwrap();
        assert_eq!(plan, vec!["Product B", "Product C", "Product D"]);
    }

    #[test]
    fn test_recommend_short_candidate_list() {
        let model = fitted_model();
        let products = [product("a", "Product A"), product("b", "Product B")];
        let candidates: Vec<&Product> = products.iter().collect();

        let plan = recommend(&model, "1", &candidates).unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan, vec!["Product B", "Product A"]);
    }

    #[test]
    fn test_recommend_empty_candidates_is_empty_plan() {
        let model = fitted_model();
        let plan = recommend(&model, "1", &[]).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_recommend_empty_candidates_never_touches_the_model() {
        // An unfit model with nothing to score is a valid no-match outcome.
        let model = KnnModel::new(KnnConfig::default());
        let plan = recommend(&model, "1", &[]).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_recommend_on_unfit_model_propagates_invalid_state() {
        let model = KnnModel::new(KnnConfig::default());
        let products = [product("a", "Product A")];
        let candidates: Vec<&Product> = products.iter().collect();

        let result = recommend(&model, "1", &candidates);
        assert!(matches!(result, Err(AssistantError::InvalidState(_))));
    }

    #[test]
    fn test_recommend_ties_keep_candidate_order() {
        // Every unknown product gets the global-mean fallback, so all three
        // estimates tie and the candidate order survives.
        let model = fitted_model();
        let products = [
            product("p", "First"),
            product("q", "Second"),
            product("r", "Third"),
        ];
        let candidates: Vec<&Product> = products.iter().collect();

        let plan = recommend(&model, "1", &candidates).unwrap();
        assert_eq!(plan, vec!["First", "Second", "Third"]);
    }
}
