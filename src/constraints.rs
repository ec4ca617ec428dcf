use serde::{Deserialize, Serialize};

use crate::error::{AssistantError, AssistantResult};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Moderate,
    Active,
}

impl ActivityLevel {
    pub const LABELS: &'static [&'static str] = &["sedentary", "moderate", "active"];

    pub fn parse(input: &str) -> AssistantResult<Self> {
        match input.trim().to_lowercase().as_str() {
            "sedentary" => Ok(Self::Sedentary),
            "moderate" => Ok(Self::Moderate),
            "active" => Ok(Self::Active),
            other => Err(AssistantError::Validation(format!(
                "unknown activity level '{}', expected one of: {}",
                other,
                Self::LABELS.join(", ")
            ))),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DietaryPreference {
    Vegan,
    Vegetarian,
    NonVegetarian,
}

impl DietaryPreference {
    pub const LABELS: &'static [&'static str] = &["vegan", "vegetarian", "non_vegetarian"];

    pub fn parse(input: &str) -> AssistantResult<Self> {
        match input.trim().to_lowercase().as_str() {
            "vegan" => Ok(Self::Vegan),
            "vegetarian" => Ok(Self::Vegetarian),
            "non_vegetarian" => Ok(Self::NonVegetarian),
            other => Err(AssistantError::Validation(format!(
                "unknown dietary preference '{}', expected one of: {}",
                other,
                Self::LABELS.join(", ")
            ))),
        }
    }

    /// The catalog category label this preference selects. Matching is a
    /// case-insensitive substring test against `main_category`.
    pub fn category_label(&self) -> &'static str {
        match self {
            Self::Vegan => "Plant-based foods and beverages",
            Self::Vegetarian => "Vegetarian",
            Self::NonVegetarian => "Meat",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HealthGoal {
    LoseWeight,
    MaintainWeight,
    GainWeight,
}

impl HealthGoal {
    pub const LABELS: &'static [&'static str] =
        &["lose weight", "maintain weight", "gain weight"];

    pub fn parse(input: &str) -> AssistantResult<Self> {
        match input.trim().to_lowercase().as_str() {
            "lose weight" => Ok(Self::LoseWeight),
            "maintain weight" => Ok(Self::MaintainWeight),
            "gain weight" => Ok(Self::GainWeight),
            other => Err(AssistantError::Validation(format!(
                "unknown health goal '{}', expected one of: {}",
                other,
                Self::LABELS.join(", ")
            ))),
        }
    }
}

/// Daily macro-nutrient targets in grams. Collected and validated but not
/// consulted by filtering or ranking in this version.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct MacroTargets {
    pub protein_g: u32,
    pub carbs_g: u32,
    pub fat_g: u32,
}

impl MacroTargets {
    /// Parses the "protein,carbs,fat" form, three non-negative integers.
    pub fn parse(input: &str) -> AssistantResult<Self> {
        let parts: Vec<&str> = input.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(AssistantError::Validation(
                "macronutrient goals must be three values in the format 'protein,carbs,fat'"
                    .to_string(),
            ));
        }
        let grams = |part: &str| {
            part.parse::<u32>().map_err(|_| {
                AssistantError::Validation(format!(
                    "macronutrient goal '{}' is not a non-negative whole number",
                    part
                ))
            })
        };
        Ok(Self {
            protein_g: grams(parts[0])?,
            carbs_g: grams(parts[1])?,
            fat_g: grams(parts[2])?,
        })
    }
}

/// Everything one interaction collects about the user. Created per request,
/// never persisted.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UserConstraints {
    pub age: u32,
    pub weight_kg: f32,
    pub activity_level: ActivityLevel,
    pub dietary_preference: DietaryPreference,
    pub health_goal: HealthGoal,
    pub allergies: Vec<String>,
    pub intolerances: Vec<String>,
    pub macro_targets: MacroTargets,
}

pub fn parse_age(input: &str) -> AssistantResult<u32> {
    input.trim().parse::<u32>().map_err(|_| {
        AssistantError::Validation(format!(
            "age '{}' must be a non-negative whole number",
            input.trim()
        ))
    })
}

pub fn parse_weight(input: &str) -> AssistantResult<f32> {
    let weight = input.trim().parse::<f32>().map_err(|_| {
        AssistantError::Validation(format!("weight '{}' must be a number", input.trim()))
    })?;
    if !weight.is_finite() || weight < 0.0 {
        return Err(AssistantError::Validation(format!(
            "weight {} must be non-negative",
            weight
        )));
    }
    Ok(weight)
}

/// Splits a comma-separated list into trimmed, lower-cased terms. Empty terms
/// are dropped here so the filter never has to second-guess them.
pub fn parse_term_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|term| term.trim().to_lowercase())
        .filter(|term| !term.is_empty())
        .collect()
}
