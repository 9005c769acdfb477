use std::collections::{HashMap, HashSet};

use sqlx::PgPool;
use uuid::Uuid;

use super::dto::{DayPlanDetails, DayPlanListItem, MealView};
use super::repo;
use super::repo_types::{DayPlan, MealRow};
use crate::error::AppError;
use crate::nutrition::{self, DayPlanMacros, NutritionError, PlannedMeal, RecipeMacros};
use crate::recipes;

/// Recipe aggregates for every recipe the meals reference.
pub async fn recipe_aggregates(
    db: &PgPool,
    meals: &[PlannedMeal],
) -> anyhow::Result<HashMap<Uuid, RecipeMacros>> {
    let ids: Vec<Uuid> = meals
        .iter()
        .map(|m| m.recipe_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    recipes::services::aggregates_by_id(db, &ids).await
}

/// Aggregate an unsaved plan form. Unknown recipes are a client error.
pub async fn preview(db: &PgPool, meals: &[PlannedMeal]) -> Result<DayPlanMacros, AppError> {
    let aggregates = recipe_aggregates(db, meals).await?;
    nutrition::aggregate_day_plan(meals, &aggregates).map_err(|e| {
        tracing::warn!(error = %e, "preview references unknown recipe");
        AppError::Validation(super::UNKNOWN_RECIPE_MSG.into())
    })
}

pub fn details(
    plan: DayPlan,
    rows: &[MealRow],
    aggregates: &HashMap<Uuid, RecipeMacros>,
) -> Result<DayPlanDetails, NutritionError> {
    let planned: Vec<PlannedMeal> = rows.iter().map(MealRow::planned).collect();
    let macros = nutrition::aggregate_day_plan(&planned, aggregates)?;
    let names: HashMap<Uuid, &str> = rows
        .iter()
        .map(|r| (r.id, r.recipe_name.as_str()))
        .collect();

    let meals = macros
        .meals
        .into_iter()
        .map(|meal| MealView {
            recipe_name: meal
                .meal
                .id
                .and_then(|id| names.get(&id))
                .map(|n| n.to_string())
                .unwrap_or_default(),
            meal,
        })
        .collect();

    Ok(DayPlanDetails {
        plan,
        meals,
        totals: macros.totals,
        breakdown: macros.breakdown,
    })
}

pub async fn load_details(db: &PgPool, id: Uuid) -> Result<Option<DayPlanDetails>, AppError> {
    let Some(plan) = repo::get(db, id).await? else {
        return Ok(None);
    };
    let rows = repo::meals_for(db, &[id]).await?;
    let planned: Vec<PlannedMeal> = rows.iter().map(MealRow::planned).collect();
    let aggregates = recipe_aggregates(db, &planned).await?;
    Ok(Some(details(plan, &rows, &aggregates)?))
}

/// List entries with per-plan totals, keeping the order of `plans`.
pub fn list_items(
    plans: Vec<DayPlan>,
    rows: Vec<MealRow>,
    aggregates: &HashMap<Uuid, RecipeMacros>,
) -> Result<Vec<DayPlanListItem>, NutritionError> {
    let mut by_plan: HashMap<Uuid, Vec<PlannedMeal>> = HashMap::new();
    for row in &rows {
        by_plan.entry(row.day_plan_id).or_default().push(row.planned());
    }

    plans
        .into_iter()
        .map(|plan| {
            let meals = by_plan.remove(&plan.id).unwrap_or_default();
            let macros = nutrition::aggregate_day_plan(&meals, aggregates)?;
            Ok(DayPlanListItem {
                plan,
                meal_count: meals.len(),
                totals: macros.totals,
                breakdown: macros.breakdown,
            })
        })
        .collect()
}

pub async fn load_list(db: &PgPool, plans: Vec<DayPlan>) -> Result<Vec<DayPlanListItem>, AppError> {
    let ids: Vec<Uuid> = plans.iter().map(|p| p.id).collect();
    let rows = repo::meals_for(db, &ids).await?;
    let planned: Vec<PlannedMeal> = rows.iter().map(MealRow::planned).collect();
    let aggregates = recipe_aggregates(db, &planned).await?;
    Ok(list_items(plans, rows, &aggregates)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::day_plans::copy_name;
    use crate::nutrition::{aggregate_recipe, Macros, RecipeLine};
    use time::OffsetDateTime;

    fn plan(name: &str) -> DayPlan {
        DayPlan {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    fn chicken() -> (Uuid, RecipeMacros) {
        let id = Uuid::new_v4();
        let line = RecipeLine {
            ingredient_id: Uuid::new_v4(),
            weight: 200.0,
            per_100g: Macros::new(31.0, 3.6, 0.0, 165.0),
        };
        (id, aggregate_recipe(Some(170.0), &[line]))
    }

    fn row(plan_id: Uuid, recipe_id: Uuid, order: i32, portion_size: f64) -> MealRow {
        MealRow {
            id: Uuid::new_v4(),
            day_plan_id: plan_id,
            recipe_id,
            recipe_name: "Chicken".into(),
            portion_size,
            order,
        }
    }

    #[test]
    fn details_carry_recipe_names_in_meal_order() {
        let (recipe_id, recipe) = chicken();
        let aggregates = HashMap::from([(recipe_id, recipe)]);
        let p = plan("Cut");
        let rows = vec![row(p.id, recipe_id, 1, 85.0), row(p.id, recipe_id, 0, 85.0)];

        let d = details(p, &rows, &aggregates).unwrap();
        assert_eq!(d.meals.len(), 2);
        assert_eq!(d.meals[0].meal.meal.order, 0);
        assert_eq!(d.meals[0].recipe_name, "Chicken");
        assert!((d.totals.kcal - 330.0).abs() < 1e-9);
    }

    #[test]
    fn duplicated_plan_has_same_macros_and_meal_order() {
        let (chicken_id, chicken_macros) = chicken();
        let rice_id = Uuid::new_v4();
        let rice = aggregate_recipe(
            None,
            &[RecipeLine {
                ingredient_id: Uuid::new_v4(),
                weight: 300.0,
                per_100g: Macros::new(2.7, 0.3, 28.0, 130.0),
            }],
        );
        let aggregates = HashMap::from([(chicken_id, chicken_macros), (rice_id, rice)]);

        let source = plan("Cut");
        let source_rows = vec![
            row(source.id, rice_id, 1, 150.0),
            row(source.id, chicken_id, 0, 85.0),
            row(source.id, chicken_id, 2, 120.0),
        ];
        let copy = plan(&copy_name(&source.name));
        let copy_rows: Vec<MealRow> = source_rows
            .iter()
            .map(|r| row(copy.id, r.recipe_id, r.order, r.portion_size))
            .collect();

        let a = details(source, &source_rows, &aggregates).unwrap();
        let b = details(copy, &copy_rows, &aggregates).unwrap();

        assert_eq!(b.plan.name, "Cut (Copy)");
        assert_ne!(a.plan.id, b.plan.id);
        assert_eq!(a.totals, b.totals);
        assert_eq!(a.breakdown, b.breakdown);
        let order = |d: &DayPlanDetails| -> Vec<(Uuid, i32, f64)> {
            d.meals
                .iter()
                .map(|m| (m.meal.meal.recipe_id, m.meal.meal.order, m.meal.meal.portion_size))
                .collect()
        };
        assert_eq!(order(&a), order(&b));
        assert!(a
            .meals
            .iter()
            .zip(&b.meals)
            .all(|(x, y)| x.meal.meal.id != y.meal.meal.id));
    }

    #[test]
    fn copy_name_appends_suffix() {
        assert_eq!(copy_name("Cut"), "Cut (Copy)");
        assert_eq!(copy_name("Cut (Copy)"), "Cut (Copy) (Copy)");
    }

    #[test]
    fn list_items_group_meals_per_plan() {
        let (recipe_id, recipe) = chicken();
        let aggregates = HashMap::from([(recipe_id, recipe)]);
        let a = plan("A");
        let b = plan("B");
        let rows = vec![row(a.id, recipe_id, 0, 170.0)];

        let items = list_items(vec![a, b], rows, &aggregates).unwrap();
        assert_eq!(items[0].meal_count, 1);
        assert!((items[0].totals.kcal - 330.0).abs() < 1e-9);
        assert_eq!(items[1].meal_count, 0);
        assert_eq!(items[1].totals, Macros::ZERO);
    }

    #[test]
    fn missing_recipe_aggregate_is_reported() {
        let p = plan("Broken");
        let rows = vec![row(p.id, Uuid::new_v4(), 0, 100.0)];
        let err = details(p, &rows, &HashMap::new()).unwrap_err();
        assert!(matches!(err, NutritionError::MissingRecipe(_)));
    }

    #[tokio::test]
    async fn empty_preview_skips_queries() {
        let state = crate::state::AppState::fake();
        let macros = preview(&state.db, &[]).await.unwrap();
        assert!(macros.meals.is_empty());
        assert_eq!(macros.totals, Macros::ZERO);
    }
}
