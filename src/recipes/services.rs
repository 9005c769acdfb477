use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use super::dto::{RecipeDetails, RecipeIngredientRequest, RecipeIngredientView, RecipeListItem};
use super::repo;
use super::repo_types::{Recipe, RecipeIngredientRow, RecipeUsage, RecipeWithUsage};
use crate::ingredients;
use crate::nutrition::{self, RecipeLine, RecipeMacros};

/// A recipe with its resolved ingredient rows.
#[derive(Debug, Clone)]
pub struct RecipeSnapshot {
    pub recipe: Recipe,
    pub rows: Vec<RecipeIngredientRow>,
}

impl RecipeSnapshot {
    pub fn lines(&self) -> Vec<RecipeLine> {
        self.rows.iter().map(RecipeIngredientRow::line).collect()
    }

    pub fn macros(&self) -> RecipeMacros {
        nutrition::aggregate_recipe(self.recipe.cooked_weight, &self.lines())
    }

    pub fn ingredient_views(&self) -> Vec<RecipeIngredientView> {
        self.rows
            .iter()
            .map(|row| {
                let line = row.line();
                RecipeIngredientView {
                    ingredient_id: row.ingredient_id,
                    name: row.ingredient_name.clone(),
                    weight: row.weight,
                    per_100g: line.per_100g,
                    contribution: line.contribution(),
                }
            })
            .collect()
    }
}

/// Pair each recipe with its rows, keeping the order of `recipes`.
pub fn assemble(recipes: Vec<Recipe>, rows: Vec<RecipeIngredientRow>) -> Vec<RecipeSnapshot> {
    let mut by_recipe: HashMap<Uuid, Vec<RecipeIngredientRow>> = HashMap::new();
    for row in rows {
        by_recipe.entry(row.recipe_id).or_default().push(row);
    }
    recipes
        .into_iter()
        .map(|recipe| {
            let mut rows = by_recipe.remove(&recipe.id).unwrap_or_default();
            rows.sort_by_key(|r| r.position);
            RecipeSnapshot { recipe, rows }
        })
        .collect()
}

pub async fn load_snapshots(db: &PgPool, recipes: Vec<Recipe>) -> anyhow::Result<Vec<RecipeSnapshot>> {
    let ids: Vec<Uuid> = recipes.iter().map(|r| r.id).collect();
    let rows = repo::lines_for(db, &ids).await?;
    Ok(assemble(recipes, rows))
}

pub async fn load_snapshot(db: &PgPool, id: Uuid) -> anyhow::Result<Option<RecipeSnapshot>> {
    let Some(recipe) = repo::get(db, id).await? else {
        return Ok(None);
    };
    Ok(load_snapshots(db, vec![recipe]).await?.pop())
}

/// Aggregates for the given recipes, keyed by id. Ids that do not exist
/// are absent from the map.
pub async fn aggregates_by_id(
    db: &PgPool,
    ids: &[Uuid],
) -> anyhow::Result<HashMap<Uuid, RecipeMacros>> {
    let recipes = repo::get_many(db, ids).await?;
    Ok(load_snapshots(db, recipes)
        .await?
        .iter()
        .map(|s| (s.recipe.id, s.macros()))
        .collect())
}

pub fn list_item(snapshot: RecipeSnapshot, meal_count: i64) -> RecipeListItem {
    let macros = snapshot.macros();
    RecipeListItem {
        ingredient_count: snapshot.rows.len(),
        recipe: snapshot.recipe,
        meal_count,
        macros,
    }
}

/// List items for recipes that already carry their meal count, in the
/// order given.
pub fn list_items(
    recipes: Vec<RecipeWithUsage>,
    rows: Vec<RecipeIngredientRow>,
) -> Vec<RecipeListItem> {
    let (recipes, counts): (Vec<_>, Vec<_>) =
        recipes.into_iter().map(|r| (r.recipe, r.meal_count)).unzip();
    assemble(recipes, rows)
        .into_iter()
        .zip(counts)
        .map(|(s, meal_count)| list_item(s, meal_count))
        .collect()
}

pub async fn load_list(
    db: &PgPool,
    recipes: Vec<RecipeWithUsage>,
) -> anyhow::Result<Vec<RecipeListItem>> {
    let ids: Vec<Uuid> = recipes.iter().map(|r| r.recipe.id).collect();
    let rows = repo::lines_for(db, &ids).await?;
    Ok(list_items(recipes, rows))
}

pub fn details(snapshot: RecipeSnapshot, used_in: Vec<RecipeUsage>) -> RecipeDetails {
    let macros = snapshot.macros();
    RecipeDetails {
        ingredients: snapshot.ingredient_views(),
        per_100g: macros.per_100g_base(),
        macros,
        recipe: snapshot.recipe,
        used_in,
    }
}

/// Aggregate an unsaved recipe form against current ingredient data.
pub async fn preview(
    db: &PgPool,
    cooked_weight: Option<f64>,
    rows: &[RecipeIngredientRequest],
) -> Result<RecipeMacros, crate::error::AppError> {
    let ids: Vec<Uuid> = rows.iter().map(|r| r.ingredient_id).collect();
    let basis = if ids.is_empty() {
        HashMap::new()
    } else {
        ingredients::repo::basis_by_ids(db, &ids).await?
    };
    let pairs: Vec<(Uuid, f64)> = rows.iter().map(|r| (r.ingredient_id, r.weight)).collect();
    let lines = nutrition::resolve_lines(&pairs, &basis).map_err(|e| {
        tracing::warn!(error = %e, "preview references unknown ingredient");
        crate::error::AppError::Validation(super::UNKNOWN_INGREDIENT_MSG.into())
    })?;
    Ok(nutrition::aggregate_recipe(cooked_weight, &lines))
}
