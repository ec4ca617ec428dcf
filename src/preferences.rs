use serde::{Deserialize, Serialize};

/// One (user, product, rating) observation used to fit the rating model.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RatingSample {
    pub user_id: String,
    pub product_id: String,
    /// Rating on the 1..=5 scale.
    pub rating: u8,
}

impl RatingSample {
    pub fn new(user_id: &str, product_id: &str, rating: u8) -> Self {
        Self {
            user_id: user_id.to_string(),
            product_id: product_id.to_string(),
            rating,
        }
    }
}

/// The fixed preference sample the model is fit on at startup. Not updated by
/// user interaction; tests fit the model on their own synthetic sets instead
/// of this one.
pub fn seed_preferences() -> Vec<RatingSample> {
    const SEED: &[(&str, &str, u8)] = &[
        ("1", "101", 5),
        ("1", "102", 4),
        ("1", "103", 2),
        ("2", "101", 1),
        ("2", "104", 5),
        ("2", "105", 3),
        ("3", "106", 5),
        ("3", "107", 3),
        ("3", "108", 2),
    ];
    SEED.iter()
        .map(|&(user_id, product_id, rating)| RatingSample::new(user_id, product_id, rating))
        .collect()
}
