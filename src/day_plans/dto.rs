use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo_types::DayPlan;
use crate::error::AppError;
use crate::nutrition::{MacroBreakdown, Macros, PlannedMeal, PlannedMealMacros};
use crate::validate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MealRequest {
    pub recipe_id: Uuid,
    pub portion_size: f64,
}

#[derive(Debug, Deserialize)]
pub struct DayPlanRequest {
    pub name: String,
    pub description: Option<String>,
    pub meals: Vec<MealRequest>,
}

/// Validated form of [`DayPlanRequest`]. Meal order is the list order.
#[derive(Debug, Clone, PartialEq)]
pub struct DayPlanInput {
    pub name: String,
    pub description: Option<String>,
    pub meals: Vec<MealRequest>,
}

impl DayPlanRequest {
    pub fn validate(self) -> Result<DayPlanInput, AppError> {
        let name = validate::name(&self.name)?;
        if self.meals.is_empty() {
            return Err(AppError::Validation("At least one meal is required".into()));
        }
        for meal in &self.meals {
            validate::grams(meal.portion_size, "Portion size")?;
        }
        Ok(DayPlanInput {
            name,
            description: validate::description(self.description),
            meals: self.meals,
        })
    }
}

/// Unsaved plan form state. Not validated.
#[derive(Debug, Default, Deserialize)]
pub struct DayPlanPreviewRequest {
    #[serde(default)]
    pub meals: Vec<MealRequest>,
}

impl DayPlanPreviewRequest {
    pub fn planned(&self) -> Vec<PlannedMeal> {
        planned(&self.meals)
    }
}

/// Meals as the aggregator sees them, ordered by position in `meals`.
pub fn planned(meals: &[MealRequest]) -> Vec<PlannedMeal> {
    meals
        .iter()
        .enumerate()
        .map(|(i, m)| PlannedMeal {
            id: None,
            recipe_id: m.recipe_id,
            portion_size: m.portion_size,
            order: i as i32,
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct MealView {
    #[serde(flatten)]
    pub meal: PlannedMealMacros,
    pub recipe_name: String,
}

#[derive(Debug, Serialize)]
pub struct DayPlanDetails {
    #[serde(flatten)]
    pub plan: DayPlan,
    pub meals: Vec<MealView>,
    pub totals: Macros,
    pub breakdown: MacroBreakdown,
}

#[derive(Debug, Serialize)]
pub struct DayPlanListItem {
    #[serde(flatten)]
    pub plan: DayPlan,
    pub meal_count: usize,
    pub totals: Macros,
    pub breakdown: MacroBreakdown,
}
