use std::collections::HashMap;

use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::dto::IngredientInput;
use super::repo_types::{BasisRow, Ingredient, IngredientWithUsage};
use crate::nutrition::Macros;

pub async fn list(db: &PgPool, pattern: Option<&str>) -> anyhow::Result<Vec<IngredientWithUsage>> {
    let rows = sqlx::query_as::<_, IngredientWithUsage>(
        r#"
        SELECT i.id, i.name, i.protein, i.fat, i.carbs, i.kcal, i.created_at, i.updated_at,
               COUNT(ri.id) AS recipe_count
          FROM ingredients i
          LEFT JOIN recipe_ingredients ri ON ri.ingredient_id = i.id
         WHERE $1::text IS NULL OR i.name ILIKE $1
         GROUP BY i.id
         ORDER BY i.name ASC
        "#,
    )
    .bind(pattern)
    .fetch_all(db)
    .await
    .context("list ingredients")?;
    Ok(rows)
}

pub async fn get(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Ingredient>> {
    let row = sqlx::query_as::<_, Ingredient>(
        r#"
        SELECT id, name, protein, fat, carbs, kcal, created_at, updated_at
          FROM ingredients
         WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
    .context("get ingredient")?;
    Ok(row)
}

pub async fn create(db: &PgPool, input: &IngredientInput) -> anyhow::Result<Ingredient> {
    let row = sqlx::query_as::<_, Ingredient>(
        r#"
        INSERT INTO ingredients (name, protein, fat, carbs, kcal)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, protein, fat, carbs, kcal, created_at, updated_at
        "#,
    )
    .bind(&input.name)
    .bind(input.protein)
    .bind(input.fat)
    .bind(input.carbs)
    .bind(input.kcal)
    .fetch_one(db)
    .await
    .context("insert ingredient")?;
    Ok(row)
}

pub async fn update(
    db: &PgPool,
    id: Uuid,
    input: &IngredientInput,
) -> anyhow::Result<Option<Ingredient>> {
    let row = sqlx::query_as::<_, Ingredient>(
        r#"
        UPDATE ingredients
           SET name = $2, protein = $3, fat = $4, carbs = $5, kcal = $6, updated_at = now()
         WHERE id = $1
        RETURNING id, name, protein, fat, carbs, kcal, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(&input.name)
    .bind(input.protein)
    .bind(input.fat)
    .bind(input.carbs)
    .bind(input.kcal)
    .fetch_optional(db)
    .await
    .context("update ingredient")?;
    Ok(row)
}

/// Number of recipe rows referencing the ingredient.
pub async fn usage_count(db: &PgPool, id: Uuid) -> anyhow::Result<i64> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM recipe_ingredients WHERE ingredient_id = $1")
            .bind(id)
            .fetch_one(db)
            .await
            .context("count ingredient usage")?;
    Ok(count)
}

/// Returns `false` when nothing was deleted.
pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM ingredients WHERE id = $1")
        .bind(id)
        .execute(db)
        .await
        .context("delete ingredient")?;
    Ok(res.rows_affected() > 0)
}

pub async fn count(db: &PgPool) -> anyhow::Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM ingredients")
        .fetch_one(db)
        .await
        .context("count ingredients")?;
    Ok(count)
}

/// Per-100 g basis for the given ingredient ids. Unknown ids are simply
/// absent from the map.
pub async fn basis_by_ids(db: &PgPool, ids: &[Uuid]) -> anyhow::Result<HashMap<Uuid, Macros>> {
    let rows = sqlx::query_as::<_, BasisRow>(
        r#"
        SELECT id, protein, fat, carbs, kcal
          FROM ingredients
         WHERE id = ANY($1)
        "#,
    )
    .bind(ids)
    .fetch_all(db)
    .await
    .context("load ingredient basis")?;
    Ok(rows
        .into_iter()
        .map(|r| (r.id, Macros::new(r.protein, r.fat, r.carbs, r.kcal)))
        .collect())
}
