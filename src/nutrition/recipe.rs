use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Macros, NutritionError};

/// One weighted ingredient row of a recipe, carrying the ingredient's
/// per-100 g macro values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecipeLine {
    pub ingredient_id: Uuid,
    /// Raw grams used in the recipe.
    pub weight: f64,
    pub per_100g: Macros,
}

impl RecipeLine {
    /// Absolute macros this row adds to the recipe.
    pub fn contribution(&self) -> Macros {
        self.per_100g.for_weight(self.weight)
    }
}

/// Aggregate for a whole recipe batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecipeMacros {
    pub total_raw_weight: f64,
    pub cooked_weight: Option<f64>,
    /// Denominator for portions: cooked weight when known, else raw weight.
    pub base_weight: f64,
    /// Totals for the full batch.
    #[serde(flatten)]
    pub totals: Macros,
    pub per_100g_raw: Macros,
    /// Only present when a positive cooked weight was recorded.
    pub per_100g_cooked: Option<Macros>,
}

impl RecipeMacros {
    /// Per-100 g figures on the basis portions are measured against.
    pub fn per_100g_base(&self) -> Macros {
        self.per_100g_cooked.unwrap_or(self.per_100g_raw)
    }
}

/// Sum ingredient contributions and derive the per-100 g views.
///
/// A cooked weight of zero (or below) is treated as absent, so it neither
/// becomes the base weight nor produces a cooked per-100 g figure.
pub fn aggregate_recipe(cooked_weight: Option<f64>, lines: &[RecipeLine]) -> RecipeMacros {
    let mut total_raw_weight = 0.0;
    let mut totals = Macros::ZERO;
    for line in lines {
        total_raw_weight += line.weight;
        totals += line.contribution();
    }

    let cooked = cooked_weight.filter(|w| *w > 0.0);
    let base_weight = cooked.unwrap_or(total_raw_weight);

    RecipeMacros {
        total_raw_weight,
        cooked_weight,
        base_weight,
        totals,
        per_100g_raw: totals.per_100g_of(total_raw_weight),
        per_100g_cooked: cooked.map(|w| totals.per_100g_of(w)),
    }
}

/// Attach per-100 g values to `(ingredient_id, weight)` rows.
pub fn resolve_lines(
    rows: &[(Uuid, f64)],
    ingredients: &HashMap<Uuid, Macros>,
) -> Result<Vec<RecipeLine>, NutritionError> {
    rows.iter()
        .map(|&(ingredient_id, weight)| {
            let per_100g = ingredients
                .get(&ingredient_id)
                .copied()
                .ok_or(NutritionError::MissingIngredient(ingredient_id))?;
            Ok(RecipeLine {
                ingredient_id,
                weight,
                per_100g,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::test_support::assert_close;
    use super::*;

    fn chicken(weight: f64) -> RecipeLine {
        RecipeLine {
            ingredient_id: Uuid::new_v4(),
            weight,
            per_100g: Macros::new(31.0, 3.6, 0.0, 165.0),
        }
    }

    fn rice(weight: f64) -> RecipeLine {
        RecipeLine {
            ingredient_id: Uuid::new_v4(),
            weight,
            per_100g: Macros::new(7.1, 0.7, 78.0, 360.0),
        }
    }

    #[test]
    fn single_raw_ingredient_without_cooked_weight() {
        let r = aggregate_recipe(None, &[chicken(200.0)]);
        assert_close(r.totals.protein, 62.0);
        assert_close(r.totals.fat, 7.2);
        assert_close(r.totals.carbs, 0.0);
        assert_close(r.totals.kcal, 330.0);
        assert_close(r.total_raw_weight, 200.0);
        assert_close(r.base_weight, 200.0);
        assert_close(r.per_100g_raw.kcal, 165.0);
        assert!(r.per_100g_cooked.is_none());
    }

    #[test]
    fn cooked_weight_changes_base_and_cooked_view_only() {
        let r = aggregate_recipe(Some(170.0), &[chicken(200.0)]);
        assert_close(r.base_weight, 170.0);
        let cooked = r.per_100g_cooked.expect("cooked view");
        assert_close(cooked.kcal, 330.0 / 170.0 * 100.0);
        assert!((cooked.kcal - 194.1).abs() < 0.05);
        assert_close(r.per_100g_raw.kcal, 165.0);
        assert_eq!(r.per_100g_base(), cooked);
    }

    #[test]
    fn zero_cooked_weight_behaves_as_absent() {
        let r = aggregate_recipe(Some(0.0), &[chicken(200.0)]);
        assert_close(r.base_weight, 200.0);
        assert!(r.per_100g_cooked.is_none());
        assert_eq!(r.cooked_weight, Some(0.0));
    }

    #[test]
    fn totals_equal_sum_of_contributions() {
        let lines = [chicken(180.0), rice(75.5), chicken(12.25)];
        let r = aggregate_recipe(None, &lines);
        let summed: Macros = lines.iter().map(RecipeLine::contribution).sum();
        assert_close(r.totals.protein, summed.protein);
        assert_close(r.totals.fat, summed.fat);
        assert_close(r.totals.carbs, summed.carbs);
        assert_close(r.totals.kcal, summed.kcal);
        assert_close(r.total_raw_weight, 267.75);
    }

    #[test]
    fn per_100g_raw_is_total_over_raw_weight() {
        let r = aggregate_recipe(Some(300.0), &[chicken(150.0), rice(100.0)]);
        assert_eq!(
            r.per_100g_raw.protein,
            (r.totals.protein / r.total_raw_weight) * 100.0
        );
    }

    #[test]
    fn row_order_does_not_change_totals() {
        let a = aggregate_recipe(None, &[chicken(120.0), rice(80.0)]);
        let b = aggregate_recipe(None, &[rice(80.0), chicken(120.0)]);
        assert_close(a.totals.kcal, b.totals.kcal);
        assert_close(a.totals.protein, b.totals.protein);
    }

    #[test]
    fn empty_recipe_yields_zero_sentinel() {
        let r = aggregate_recipe(None, &[]);
        assert_eq!(r.total_raw_weight, 0.0);
        assert_eq!(r.base_weight, 0.0);
        assert_eq!(r.per_100g_raw, Macros::ZERO);
        assert!(r.per_100g_raw.kcal.is_finite());
    }

    #[test]
    fn zero_weight_rows_yield_zero_sentinel() {
        let r = aggregate_recipe(None, &[chicken(0.0)]);
        assert_eq!(r.per_100g_raw, Macros::ZERO);
    }

    #[test]
    fn resolve_lines_attaches_basis_and_reports_missing() {
        let known = Uuid::new_v4();
        let ingredients = HashMap::from([(known, Macros::new(31.0, 3.6, 0.0, 165.0))]);

        let lines = resolve_lines(&[(known, 150.0)], &ingredients).unwrap();
        assert_eq!(lines.len(), 1);
        assert_close(lines[0].contribution().kcal, 247.5);

        let ghost = Uuid::new_v4();
        let err = resolve_lines(&[(known, 10.0), (ghost, 20.0)], &ingredients).unwrap_err();
        assert_eq!(err, NutritionError::MissingIngredient(ghost));
    }

    #[test]
    fn serializes_totals_flat() {
        let r = aggregate_recipe(None, &[chicken(100.0)]);
        let json = serde_json::to_value(r).unwrap();
        assert_close(json["kcal"].as_f64().unwrap(), 165.0);
        assert_eq!(json["total_raw_weight"], 100.0);
        assert!(json["per_100g_raw"].is_object());
        assert!(json["per_100g_cooked"].is_null());
    }
}
