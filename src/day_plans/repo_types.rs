use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::nutrition::PlannedMeal;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DayPlan {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A stored meal joined with its recipe name.
#[derive(Debug, Clone, FromRow)]
pub struct MealRow {
    pub id: Uuid,
    pub day_plan_id: Uuid,
    pub recipe_id: Uuid,
    pub recipe_name: String,
    pub portion_size: f64,
    #[sqlx(rename = "sort_order")]
    pub order: i32,
}

impl MealRow {
    pub fn planned(&self) -> PlannedMeal {
        PlannedMeal {
            id: Some(self.id),
            recipe_id: self.recipe_id,
            portion_size: self.portion_size,
            order: self.order,
        }
    }
}
