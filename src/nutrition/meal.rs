use serde::{Deserialize, Serialize};

use super::{ratio, Macros, RecipeMacros};

/// Recipe figures a meal was scaled against, kept for traceability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecipeInfo {
    pub total_raw_weight: f64,
    pub cooked_weight: Option<f64>,
    pub base_weight: f64,
    /// Portion as a percentage of one full recipe batch. Not clamped.
    pub portion_percentage: f64,
}

/// Realised macros of one portioned meal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MealMacros {
    pub portion_ratio: f64,
    pub macros: Macros,
    pub recipe_info: RecipeInfo,
}

/// `portion_size / base_weight`. Values above 1.0 mean the portion is larger
/// than one batch and are kept as-is.
pub fn portion_ratio(portion_size: f64, recipe: &RecipeMacros) -> f64 {
    ratio(portion_size, recipe.base_weight)
}

pub fn scale_meal(portion_size: f64, recipe: &RecipeMacros) -> MealMacros {
    let portion_ratio = portion_ratio(portion_size, recipe);
    MealMacros {
        portion_ratio,
        macros: recipe.totals * portion_ratio,
        recipe_info: RecipeInfo {
            total_raw_weight: recipe.total_raw_weight,
            cooked_weight: recipe.cooked_weight,
            base_weight: recipe.base_weight,
            portion_percentage: portion_ratio * 100.0,
        },
    }
}
