use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo_types::{Recipe, RecipeUsage};
use crate::error::AppError;
use crate::nutrition::{Macros, RecipeMacros};
use crate::validate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RecipeIngredientRequest {
    pub ingredient_id: Uuid,
    pub weight: f64,
}

#[derive(Debug, Deserialize)]
pub struct RecipeRequest {
    pub name: String,
    pub description: Option<String>,
    pub cooked_weight: Option<f64>,
    pub ingredients: Vec<RecipeIngredientRequest>,
}

/// Validated form of [`RecipeRequest`]. Row order is kept as given.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeInput {
    pub name: String,
    pub description: Option<String>,
    pub cooked_weight: Option<f64>,
    pub ingredients: Vec<RecipeIngredientRequest>,
}

impl RecipeRequest {
    pub fn validate(self) -> Result<RecipeInput, AppError> {
        let name = validate::name(&self.name)?;
        let cooked_weight = self
            .cooked_weight
            .map(|w| validate::non_negative(w, "Cooked weight"))
            .transpose()?;
        if self.ingredients.is_empty() {
            return Err(AppError::Validation(
                "At least one ingredient is required".into(),
            ));
        }
        for row in &self.ingredients {
            validate::grams(row.weight, "Weight")?;
        }
        Ok(RecipeInput {
            name,
            description: validate::description(self.description),
            cooked_weight,
            ingredients: self.ingredients,
        })
    }
}

/// Unsaved recipe form state. No validation: an empty list previews as zero.
#[derive(Debug, Deserialize)]
pub struct RecipePreviewRequest {
    pub cooked_weight: Option<f64>,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredientRequest>,
}

#[derive(Debug, Deserialize)]
pub struct CookedWeightRequest {
    /// `null` clears the cooked weight.
    pub cooked_weight: Option<f64>,
}

impl CookedWeightRequest {
    pub fn validate(self) -> Result<Option<f64>, AppError> {
        self.cooked_weight
            .map(|w| validate::non_negative(w, "Cooked weight"))
            .transpose()
    }
}

#[derive(Debug, Serialize)]
pub struct RecipeListItem {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub ingredient_count: usize,
    pub meal_count: i64,
    pub macros: RecipeMacros,
}

#[derive(Debug, Serialize)]
pub struct RecipeIngredientView {
    pub ingredient_id: Uuid,
    pub name: String,
    pub weight: f64,
    pub per_100g: Macros,
    /// What this row adds to the recipe totals.
    pub contribution: Macros,
}

#[derive(Debug, Serialize)]
pub struct RecipeDetails {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub ingredients: Vec<RecipeIngredientView>,
    pub macros: RecipeMacros,
    /// Cooked per-100 g when a cooked weight is known, raw otherwise.
    pub per_100g: Macros,
    pub used_in: Vec<RecipeUsage>,
}
