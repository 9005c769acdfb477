use anyhow::Context;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::dto::{RecipeIngredientRequest, RecipeInput};
use super::repo_types::{Recipe, RecipeIngredientRow, RecipeUsage, RecipeWithUsage};

pub async fn list(db: &PgPool, pattern: Option<&str>) -> anyhow::Result<Vec<RecipeWithUsage>> {
    let rows = sqlx::query_as::<_, RecipeWithUsage>(
        r#"
        SELECT r.id, r.name, r.description, r.cooked_weight, r.created_at, r.updated_at,
               COUNT(m.id) AS meal_count
          FROM recipes r
          LEFT JOIN meals m ON m.recipe_id = r.id
         WHERE $1::text IS NULL OR r.name ILIKE $1
         GROUP BY r.id
         ORDER BY r.name ASC
        "#,
    )
    .bind(pattern)
    .fetch_all(db)
    .await
    .context("list recipes")?;
    Ok(rows)
}

pub async fn recent(db: &PgPool, limit: i64) -> anyhow::Result<Vec<RecipeWithUsage>> {
    let rows = sqlx::query_as::<_, RecipeWithUsage>(
        r#"
        SELECT r.id, r.name, r.description, r.cooked_weight, r.created_at, r.updated_at,
               COUNT(m.id) AS meal_count
          FROM recipes r
          LEFT JOIN meals m ON m.recipe_id = r.id
         GROUP BY r.id
         ORDER BY r.updated_at DESC
         LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(db)
    .await
    .context("list recent recipes")?;
    Ok(rows)
}

pub async fn get(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Recipe>> {
    let row = sqlx::query_as::<_, Recipe>(
        r#"
        SELECT id, name, description, cooked_weight, created_at, updated_at
          FROM recipes
         WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
    .context("get recipe")?;
    Ok(row)
}

pub async fn get_many(db: &PgPool, ids: &[Uuid]) -> anyhow::Result<Vec<Recipe>> {
    let rows = sqlx::query_as::<_, Recipe>(
        r#"
        SELECT id, name, description, cooked_weight, created_at, updated_at
          FROM recipes
         WHERE id = ANY($1)
        "#,
    )
    .bind(ids)
    .fetch_all(db)
    .await
    .context("get recipes by id")?;
    Ok(rows)
}

/// Ingredient rows of the given recipes, each recipe's rows in insertion
/// order.
pub async fn lines_for(db: &PgPool, recipe_ids: &[Uuid]) -> anyhow::Result<Vec<RecipeIngredientRow>> {
    let rows = sqlx::query_as::<_, RecipeIngredientRow>(
        r#"
        SELECT ri.recipe_id, ri.ingredient_id, i.name AS ingredient_name, ri.weight, ri.position,
               i.protein, i.fat, i.carbs, i.kcal
          FROM recipe_ingredients ri
          JOIN ingredients i ON i.id = ri.ingredient_id
         WHERE ri.recipe_id = ANY($1)
         ORDER BY ri.recipe_id, ri.position ASC
        "#,
    )
    .bind(recipe_ids)
    .fetch_all(db)
    .await
    .context("load recipe ingredients")?;
    Ok(rows)
}

pub async fn usages(db: &PgPool, recipe_id: Uuid) -> anyhow::Result<Vec<RecipeUsage>> {
    let rows = sqlx::query_as::<_, RecipeUsage>(
        r#"
        SELECT m.id AS meal_id, d.id AS day_plan_id, d.name AS day_plan_name, m.portion_size
          FROM meals m
          JOIN day_plans d ON d.id = m.day_plan_id
         WHERE m.recipe_id = $1
         ORDER BY d.name ASC, m.sort_order ASC
        "#,
    )
    .bind(recipe_id)
    .fetch_all(db)
    .await
    .context("list recipe usages")?;
    Ok(rows)
}

async fn insert_lines_tx(
    tx: &mut Transaction<'_, Postgres>,
    recipe_id: Uuid,
    rows: &[RecipeIngredientRequest],
) -> anyhow::Result<()> {
    for (position, row) in rows.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO recipe_ingredients (recipe_id, ingredient_id, weight, position)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(recipe_id)
        .bind(row.ingredient_id)
        .bind(row.weight)
        .bind(position as i32)
        .execute(&mut **tx)
        .await
        .context("insert recipe ingredient")?;
    }
    Ok(())
}

pub async fn create(db: &PgPool, input: &RecipeInput) -> anyhow::Result<Recipe> {
    let mut tx = db.begin().await.context("begin tx")?;
    let recipe = sqlx::query_as::<_, Recipe>(
        r#"
        INSERT INTO recipes (name, description, cooked_weight)
        VALUES ($1, $2, $3)
        RETURNING id, name, description, cooked_weight, created_at, updated_at
        "#,
    )
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.cooked_weight)
    .fetch_one(&mut *tx)
    .await
    .context("insert recipe")?;

    insert_lines_tx(&mut tx, recipe.id, &input.ingredients).await?;
    tx.commit().await.context("commit tx")?;
    Ok(recipe)
}

/// Update the recipe and replace all of its ingredient rows.
pub async fn replace(db: &PgPool, id: Uuid, input: &RecipeInput) -> anyhow::Result<Option<Recipe>> {
    let mut tx = db.begin().await.context("begin tx")?;
    let recipe = sqlx::query_as::<_, Recipe>(
        r#"
        UPDATE recipes
           SET name = $2, description = $3, cooked_weight = $4, updated_at = now()
         WHERE id = $1
        RETURNING id, name, description, cooked_weight, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.cooked_weight)
    .fetch_optional(&mut *tx)
    .await
    .context("update recipe")?;

    let Some(recipe) = recipe else {
        return Ok(None);
    };

    sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("clear recipe ingredients")?;
    insert_lines_tx(&mut tx, id, &input.ingredients).await?;
    tx.commit().await.context("commit tx")?;
    Ok(Some(recipe))
}

pub async fn set_cooked_weight(
    db: &PgPool,
    id: Uuid,
    cooked_weight: Option<f64>,
) -> anyhow::Result<Option<Recipe>> {
    let row = sqlx::query_as::<_, Recipe>(
        r#"
        UPDATE recipes
           SET cooked_weight = $2, updated_at = now()
         WHERE id = $1
        RETURNING id, name, description, cooked_weight, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(cooked_weight)
    .fetch_optional(db)
    .await
    .context("update cooked weight")?;
    Ok(row)
}

pub async fn meal_count(db: &PgPool, id: Uuid) -> anyhow::Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM meals WHERE recipe_id = $1")
        .bind(id)
        .fetch_one(db)
        .await
        .context("count recipe usage")?;
    Ok(count)
}

/// Returns `false` when nothing was deleted. Ingredient rows cascade.
pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM recipes WHERE id = $1")
        .bind(id)
        .execute(db)
        .await
        .context("delete recipe")?;
    Ok(res.rows_affected() > 0)
}

pub async fn count(db: &PgPool) -> anyhow::Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM recipes")
        .fetch_one(db)
        .await
        .context("count recipes")?;
    Ok(count)
}
