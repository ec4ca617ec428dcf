use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{AssistantError, AssistantResult};

// Required column headers in the product catalog TSV.
const CODE_COL: &str = "code";
const NAME_COL: &str = "product_name";
const CATEGORY_COL: &str = "main_category";
const INGREDIENTS_COL: &str = "ingredients_text";
const ENERGY_COL: &str = "energy_100g";

/// One product row from the catalog. Loaded once at startup and immutable
/// thereafter.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Product {
    pub code: String,
    pub name: String,
    pub category: String,
    pub ingredients: String,
    /// Energy proxy used only for health-goal ordering; absent or
    /// unparseable values do not disqualify the row.
    pub energy_100g: Option<f32>,
}

fn parse_optional_f32(s: &str) -> Option<f32> {
    s.trim().parse::<f32>().ok()
}

/// Loads the tab-separated product catalog into a collection of `Product`
/// records.
///
/// Rows whose `product_name`, `main_category`, or `ingredients_text` is
/// missing or empty are discarded entirely. A missing or unreadable file is a
/// `FileAccess` error; an absent required column is a `Schema` error. This is
/// a one-shot startup load with no retries.
pub fn load_catalog(path: &Path) -> AssistantResult<Vec<Product>> {
    let file = std::fs::File::open(path).map_err(|source| AssistantError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    let mut rdr = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers = rdr.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| AssistantError::Schema(format!("column '{}' not found", name)))
    };
    let code_idx = column(CODE_COL)?;
    let name_idx = column(NAME_COL)?;
    let category_idx = column(CATEGORY_COL)?;
    let ingredients_idx = column(INGREDIENTS_COL)?;
    let energy_idx = column(ENERGY_COL)?;

    let mut products = Vec::new();
    for result in rdr.records() {
        let record = result?;

        let required = |idx: usize| {
            record
                .get(idx)
                .map(str::trim)
                .filter(|field| !field.is_empty())
        };
        let (name, category, ingredients) = match (
            required(name_idx),
            required(category_idx),
            required(ingredients_idx),
        ) {
            (Some(n), Some(c), Some(i)) => (n, c, i),
            // Incomplete rows are dropped, not repaired.
            _ => continue,
        };

        products.push(Product {
            code: record.get(code_idx).unwrap_or_default().trim().to_string(),
            name: name.to_string(),
            category: category.to_string(),
            ingredients: ingredients.to_string(),
            energy_100g: record.get(energy_idx).and_then(|s| parse_optional_f32(s)),
        });
    }

    Ok(products)
}
