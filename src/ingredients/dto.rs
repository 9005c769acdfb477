use serde::Deserialize;

use crate::error::AppError;
use crate::validate;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

/// Create/update body. Macro values are per 100 g raw.
#[derive(Debug, Deserialize)]
pub struct IngredientRequest {
    pub name: String,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub kcal: f64,
}

/// Validated form of [`IngredientRequest`].
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientInput {
    pub name: String,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub kcal: f64,
}

impl IngredientRequest {
    pub fn validate(self) -> Result<IngredientInput, AppError> {
        Ok(IngredientInput {
            name: validate::name(&self.name)?,
            protein: validate::non_negative(self.protein, "Protein")?,
            fat: validate::non_negative(self.fat, "Fat")?,
            carbs: validate::non_negative(self.carbs, "Carbs")?,
            kcal: validate::non_negative(self.kcal, "Calories")?,
        })
    }
}
