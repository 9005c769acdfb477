//! Macro calculation core.
//!
//! Everything that turns ingredient weights, recipe composition and portion
//! sizes into protein/fat/carbs/kcal figures lives here. The module is pure:
//! callers fetch a consistent snapshot from storage first and hand it over by
//! reference. List pages, detail pages, form previews and the dashboard all go
//! through these functions so the numbers can never drift between views.
//!
//! Ratios with a non-positive denominator evaluate to `0.0` (see [`ratio`]).

use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

mod breakdown;
mod day_plan;
mod meal;
mod recipe;

pub use breakdown::MacroBreakdown;
pub use day_plan::{aggregate_day_plan, sum_meals, DayPlanMacros, PlannedMeal, PlannedMealMacros};
pub use meal::{portion_ratio, scale_meal, MealMacros, RecipeInfo};
pub use recipe::{aggregate_recipe, resolve_lines, RecipeLine, RecipeMacros};

/// Ingredient macro values are stored per this many grams.
pub const GRAMS_PER_BASIS: f64 = 100.0;

/// Atwater energy factor for protein (kcal per gram).
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
/// Atwater energy factor for fat (kcal per gram).
pub const KCAL_PER_G_FAT: f64 = 9.0;
/// Atwater energy factor for carbohydrates (kcal per gram).
pub const KCAL_PER_G_CARBS: f64 = 4.0;

/// Raised when a snapshot references an entity it does not contain.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NutritionError {
    #[error("recipe {0} missing from snapshot")]
    MissingRecipe(Uuid),

    #[error("ingredient {0} missing from snapshot")]
    MissingIngredient(Uuid),
}

/// The four tracked macro figures. Depending on context these are absolute
/// grams/kcal or values per 100 g.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub kcal: f64,
}

impl Macros {
    pub const ZERO: Macros = Macros {
        protein: 0.0,
        fat: 0.0,
        carbs: 0.0,
        kcal: 0.0,
    };

    pub fn new(protein: f64, fat: f64, carbs: f64, kcal: f64) -> Self {
        Self {
            protein,
            fat,
            carbs,
            kcal,
        }
    }

    /// Multiply every field by `factor`.
    pub fn scale(self, factor: f64) -> Self {
        Self {
            protein: self.protein * factor,
            fat: self.fat * factor,
            carbs: self.carbs * factor,
            kcal: self.kcal * factor,
        }
    }

    /// Absolute macros contained in `grams` of something described per 100 g.
    pub fn for_weight(self, grams: f64) -> Self {
        Self {
            protein: (self.protein / GRAMS_PER_BASIS) * grams,
            fat: (self.fat / GRAMS_PER_BASIS) * grams,
            carbs: (self.carbs / GRAMS_PER_BASIS) * grams,
            kcal: (self.kcal / GRAMS_PER_BASIS) * grams,
        }
    }

    /// Re-express absolute totals as values per 100 g of `grams`.
    pub fn per_100g_of(self, grams: f64) -> Self {
        Self {
            protein: ratio(self.protein, grams) * GRAMS_PER_BASIS,
            fat: ratio(self.fat, grams) * GRAMS_PER_BASIS,
            carbs: ratio(self.carbs, grams) * GRAMS_PER_BASIS,
            kcal: ratio(self.kcal, grams) * GRAMS_PER_BASIS,
        }
    }
}

impl Add for Macros {
    type Output = Macros;

    fn add(self, rhs: Macros) -> Macros {
        Macros {
            protein: self.protein + rhs.protein,
            fat: self.fat + rhs.fat,
            carbs: self.carbs + rhs.carbs,
            kcal: self.kcal + rhs.kcal,
        }
    }
}

impl AddAssign for Macros {
    fn add_assign(&mut self, rhs: Macros) {
        *self = *self + rhs;
    }
}

impl Mul<f64> for Macros {
    type Output = Macros;

    fn mul(self, factor: f64) -> Macros {
        self.scale(factor)
    }
}

impl Sum for Macros {
    fn sum<I: Iterator<Item = Macros>>(iter: I) -> Macros {
        iter.fold(Macros::ZERO, Add::add)
    }
}

/// `numerator / denominator`, or `0.0` when the denominator is not strictly
/// positive (zero, negative or NaN).
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    pub fn assert_close(actual: f64, expected: f64) {
        let tolerance = 1e-9 * expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected}, got {actual}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::assert_close;
    use super::*;

    #[test]
    fn for_weight_scales_per_100g_basis() {
        let chicken = Macros::new(31.0, 3.6, 0.0, 165.0);
        let m = chicken.for_weight(200.0);
        assert_close(m.protein, 62.0);
        assert_close(m.fat, 7.2);
        assert_close(m.carbs, 0.0);
        assert_close(m.kcal, 330.0);
    }

    #[test]
    fn per_100g_of_zero_weight_is_zero() {
        let m = Macros::new(10.0, 5.0, 2.0, 100.0).per_100g_of(0.0);
        assert_eq!(m, Macros::ZERO);
    }

    #[test]
    fn ratio_guards_degenerate_denominators() {
        assert_eq!(ratio(5.0, 0.0), 0.0);
        assert_eq!(ratio(5.0, -1.0), 0.0);
        assert_eq!(ratio(5.0, f64::NAN), 0.0);
        assert_close(ratio(5.0, 2.0), 2.5);
    }

    #[test]
    fn sum_of_empty_iterator_is_zero() {
        let total: Macros = Vec::<Macros>::new().into_iter().sum();
        assert_eq!(total, Macros::ZERO);
    }

    #[test]
    fn add_assign_accumulates_fieldwise() {
        let mut acc = Macros::new(1.0, 2.0, 3.0, 4.0);
        acc += Macros::new(0.5, 0.5, 0.5, 0.5);
        assert_eq!(acc, Macros::new(1.5, 2.5, 3.5, 4.5));
    }
}
