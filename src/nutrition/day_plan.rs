use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{scale_meal, MacroBreakdown, Macros, MealMacros, NutritionError, RecipeMacros};

/// A meal slot of a day plan. `id` is absent for unsaved form state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlannedMeal {
    pub id: Option<Uuid>,
    pub recipe_id: Uuid,
    pub portion_size: f64,
    pub order: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlannedMealMacros {
    #[serde(flatten)]
    pub meal: PlannedMeal,
    #[serde(flatten)]
    pub scaled: MealMacros,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlanMacros {
    /// Meals in ascending `order`.
    pub meals: Vec<PlannedMealMacros>,
    pub totals: Macros,
    pub breakdown: MacroBreakdown,
}

/// Sum already-scaled meals. Order does not matter.
pub fn sum_meals<'a, I>(meals: I) -> Macros
where
    I: IntoIterator<Item = &'a MealMacros>,
{
    meals.into_iter().map(|m| m.macros).sum()
}

/// Scale every meal against its recipe aggregate and total the day.
///
/// `recipes` must hold an aggregate for every referenced recipe; a missing
/// one is reported instead of being skipped. Zero meals give zero totals.
pub fn aggregate_day_plan(
    meals: &[PlannedMeal],
    recipes: &HashMap<Uuid, RecipeMacros>,
) -> Result<DayPlanMacros, NutritionError> {
    let mut ordered: Vec<&PlannedMeal> = meals.iter().collect();
    ordered.sort_by_key(|m| m.order);

    let meals = ordered
        .into_iter()
        .map(|meal| {
            let recipe = recipes
                .get(&meal.recipe_id)
                .ok_or(NutritionError::MissingRecipe(meal.recipe_id))?;
            Ok(PlannedMealMacros {
                meal: *meal,
                scaled: scale_meal(meal.portion_size, recipe),
            })
        })
        .collect::<Result<Vec<_>, NutritionError>>()?;

    let totals = sum_meals(meals.iter().map(|m| &m.scaled));
    Ok(DayPlanMacros {
        meals,
        totals,
        breakdown: MacroBreakdown::from_totals(&totals),
    })
}

#[cfg(test)]
mod tests {
    use super::super::test_support::assert_close;
    use super::super::{aggregate_recipe, RecipeLine};
    use super::*;

    fn chicken_recipe() -> (Uuid, RecipeMacros) {
        let id = Uuid::new_v4();
        let r = aggregate_recipe(
            Some(170.0),
            &[RecipeLine {
                ingredient_id: Uuid::new_v4(),
                weight: 200.0,
                per_100g: Macros::new(31.0, 3.6, 0.0, 165.0),
            }],
        );
        (id, r)
    }

    fn oats_recipe() -> (Uuid, RecipeMacros) {
        let id = Uuid::new_v4();
        let r = aggregate_recipe(
            None,
            &[
                RecipeLine {
                    ingredient_id: Uuid::new_v4(),
                    weight: 80.0,
                    per_100g: Macros::new(13.0, 7.0, 60.0, 380.0),
                },
                RecipeLine {
                    ingredient_id: Uuid::new_v4(),
                    weight: 250.0,
                    per_100g: Macros::new(3.4, 1.5, 4.8, 46.0),
                },
            ],
        );
        (id, r)
    }

    fn meal(recipe_id: Uuid, portion_size: f64, order: i32) -> PlannedMeal {
        PlannedMeal {
            id: Some(Uuid::new_v4()),
            recipe_id,
            portion_size,
            order,
        }
    }

    #[test]
    fn two_half_portions_of_cooked_chicken() {
        let (id, recipe) = chicken_recipe();
        let recipes = HashMap::from([(id, recipe)]);
        let plan =
            aggregate_day_plan(&[meal(id, 85.0, 0), meal(id, 85.0, 1)], &recipes).unwrap();
        assert_close(plan.totals.kcal, 330.0);
        assert_close(plan.totals.protein, 62.0);
        assert_close(plan.breakdown.protein_pct, (plan.totals.protein * 4.0 / 330.0) * 100.0);
        assert_close(plan.breakdown.fat_pct, (plan.totals.fat * 9.0 / 330.0) * 100.0);
    }

    #[test]
    fn totals_equal_sum_of_meal_macros() {
        let (c, chicken) = chicken_recipe();
        let (o, oats) = oats_recipe();
        let recipes = HashMap::from([(c, chicken), (o, oats)]);
        let plan = aggregate_day_plan(
            &[meal(o, 200.0, 0), meal(c, 120.0, 1), meal(o, 95.5, 2)],
            &recipes,
        )
        .unwrap();
        let summed: Macros = plan.meals.iter().map(|m| m.scaled.macros).sum();
        assert_close(plan.totals.kcal, summed.kcal);
        assert_close(plan.totals.fat, summed.fat);
        assert_close(plan.totals.carbs, summed.carbs);
    }

    #[test]
    fn reordering_meals_keeps_totals_and_presents_by_order() {
        let (c, chicken) = chicken_recipe();
        let (o, oats) = oats_recipe();
        let recipes = HashMap::from([(c, chicken), (o, oats)]);
        let first = meal(c, 150.0, 1);
        let second = meal(o, 210.0, 0);

        let a = aggregate_day_plan(&[first, second], &recipes).unwrap();
        let b = aggregate_day_plan(&[second, first], &recipes).unwrap();

        assert_close(a.totals.kcal, b.totals.kcal);
        assert_close(a.totals.protein, b.totals.protein);
        assert_eq!(a.meals[0].meal.recipe_id, o);
        assert_eq!(b.meals[0].meal.recipe_id, o);
        assert_eq!(a.meals[1].meal.order, 1);
    }

    #[test]
    fn zero_meals_give_zero_totals() {
        let plan = aggregate_day_plan(&[], &HashMap::new()).unwrap();
        assert!(plan.meals.is_empty());
        assert_eq!(plan.totals, Macros::ZERO);
        assert_eq!(plan.breakdown, MacroBreakdown::default());
    }

    #[test]
    fn missing_recipe_fails_fast() {
        let ghost = Uuid::new_v4();
        let err = aggregate_day_plan(&[meal(ghost, 100.0, 0)], &HashMap::new()).unwrap_err();
        assert_eq!(err, NutritionError::MissingRecipe(ghost));
    }

    #[test]
    fn serializes_meal_fields_flat() {
        let (id, recipe) = chicken_recipe();
        let recipes = HashMap::from([(id, recipe)]);
        let plan = aggregate_day_plan(&[meal(id, 85.0, 0)], &recipes).unwrap();
        let json = serde_json::to_value(&plan).unwrap();
        let first = &json["meals"][0];
        assert_eq!(first["portion_size"], 85.0);
        assert!(first["macros"]["kcal"].is_number());
        assert_eq!(first["recipe_info"]["base_weight"], 170.0);
    }
}
