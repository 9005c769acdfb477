use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::nutrition::{Macros, RecipeLine};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub cooked_weight: Option<f64>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub struct RecipeWithUsage {
    #[sqlx(flatten)]
    pub recipe: Recipe,
    /// Number of meals referencing this recipe.
    pub meal_count: i64,
}

/// A recipe ingredient row joined with its ingredient's per-100 g values.
#[derive(Debug, Clone, FromRow)]
pub struct RecipeIngredientRow {
    pub recipe_id: Uuid,
    pub ingredient_id: Uuid,
    pub ingredient_name: String,
    pub weight: f64,
    pub position: i32,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub kcal: f64,
}

impl RecipeIngredientRow {
    pub fn line(&self) -> RecipeLine {
        RecipeLine {
            ingredient_id: self.ingredient_id,
            weight: self.weight,
            per_100g: Macros::new(self.protein, self.fat, self.carbs, self.kcal),
        }
    }
}

/// A meal that uses a recipe, with the day plan it belongs to.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RecipeUsage {
    pub meal_id: Uuid,
    pub day_plan_id: Uuid,
    pub day_plan_name: String,
    pub portion_size: f64,
}
