use std::cmp::Ordering;

use crate::catalog::Product;
use crate::constraints::{HealthGoal, UserConstraints};

/// Narrows the catalog to the products compatible with the user's
/// constraints.
///
/// Products survive when their category contains the dietary preference's
/// label (case-insensitive) and their ingredients text contains none of the
/// allergy or intolerance terms. The health goal then orders the survivors by
/// energy: ascending to lose weight, descending to gain, untouched to
/// maintain. Products without an energy value sort last either way. The
/// returned order is the tie-break order the recommender preserves for equal
/// estimates.
pub fn filter_candidates<'a>(
    catalog: &'a [Product],
    constraints: &UserConstraints,
) -> Vec<&'a Product> {
    let label = constraints.dietary_preference.category_label().to_lowercase();
    let mut candidates: Vec<&Product> = catalog
        .iter()
        .filter(|product| product.category.to_lowercase().contains(&label))
        .collect();

    exclude_by_ingredient(&mut candidates, &constraints.allergies);
    exclude_by_ingredient(&mut candidates, &constraints.intolerances);

    match constraints.health_goal {
        HealthGoal::LoseWeight => candidates.sort_by(|a, b| energy_order(a, b, true)),
        HealthGoal::GainWeight => candidates.sort_by(|a, b| energy_order(a, b, false)),
        HealthGoal::MaintainWeight => {}
    }

    candidates
}

fn exclude_by_ingredient(candidates: &mut Vec<&Product>, terms: &[String]) {
    for term in terms {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            continue;
        }
        candidates.retain(|product| !product.ingredients.to_lowercase().contains(&term));
    }
}

fn energy_order(a: &Product, b: &Product, ascending: bool) -> Ordering {
    match (a.energy_100g, b.energy_100g) {
        (Some(x), Some(y)) => {
            if ascending {
                x.total_cmp(&y)
            } else {
                y.total_cmp(&x)
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
