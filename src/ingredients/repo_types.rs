use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Ingredient row. Macro columns are per 100 g raw.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ingredient {
    pub id: Uuid,
    pub name: String,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub kcal: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct IngredientWithUsage {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub ingredient: Ingredient,
    /// Number of recipe rows referencing this ingredient.
    pub recipe_count: i64,
}

#[derive(Debug, Clone, Copy, FromRow)]
pub struct BasisRow {
    pub id: Uuid,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub kcal: f64,
}
