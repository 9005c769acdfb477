use serde::{Deserialize, Serialize};

use super::{ratio, Macros, KCAL_PER_G_CARBS, KCAL_PER_G_FAT, KCAL_PER_G_PROTEIN};

/// Share of total energy coming from each macro, in percent.
///
/// All three are `0.0` when the totals carry no energy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroBreakdown {
    pub protein_pct: f64,
    pub fat_pct: f64,
    pub carbs_pct: f64,
}

impl MacroBreakdown {
    pub fn from_totals(totals: &Macros) -> Self {
        Self {
            protein_pct: ratio(totals.protein * KCAL_PER_G_PROTEIN, totals.kcal) * 100.0,
            fat_pct: ratio(totals.fat * KCAL_PER_G_FAT, totals.kcal) * 100.0,
            carbs_pct: ratio(totals.carbs * KCAL_PER_G_CARBS, totals.kcal) * 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::assert_close;
    use super::*;

    #[test]
    fn atwater_shares() {
        let b = MacroBreakdown::from_totals(&Macros::new(62.0, 7.2, 0.0, 330.0));
        assert_close(b.protein_pct, 62.0 * 4.0 / 330.0 * 100.0);
        assert_close(b.fat_pct, 7.2 * 9.0 / 330.0 * 100.0);
        assert_close(b.carbs_pct, 0.0);
    }

    #[test]
    fn zero_kcal_reports_zero_shares() {
        let b = MacroBreakdown::from_totals(&Macros::new(5.0, 1.0, 2.0, 0.0));
        assert_eq!(b, MacroBreakdown::default());
        assert!(b.protein_pct.is_finite());
    }
}
