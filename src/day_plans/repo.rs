use anyhow::Context;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::dto::{DayPlanInput, MealRequest};
use super::repo_types::{DayPlan, MealRow};
use super::copy_name;

pub async fn list(db: &PgPool, pattern: Option<&str>) -> anyhow::Result<Vec<DayPlan>> {
    let rows = sqlx::query_as::<_, DayPlan>(
        r#"
        SELECT id, name, description, created_at, updated_at
          FROM day_plans
         WHERE $1::text IS NULL OR name ILIKE $1
         ORDER BY name ASC
        "#,
    )
    .bind(pattern)
    .fetch_all(db)
    .await
    .context("list day plans")?;
    Ok(rows)
}

pub async fn get(db: &PgPool, id: Uuid) -> anyhow::Result<Option<DayPlan>> {
    let row = sqlx::query_as::<_, DayPlan>(
        r#"
        SELECT id, name, description, created_at, updated_at
          FROM day_plans
         WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
    .context("get day plan")?;
    Ok(row)
}

/// Meals of the given plans, each plan's meals in ascending order.
pub async fn meals_for(db: &PgPool, plan_ids: &[Uuid]) -> anyhow::Result<Vec<MealRow>> {
    let rows = sqlx::query_as::<_, MealRow>(
        r#"
        SELECT m.id, m.day_plan_id, m.recipe_id, r.name AS recipe_name, m.portion_size, m.sort_order
          FROM meals m
          JOIN recipes r ON r.id = m.recipe_id
         WHERE m.day_plan_id = ANY($1)
         ORDER BY m.day_plan_id, m.sort_order ASC
        "#,
    )
    .bind(plan_ids)
    .fetch_all(db)
    .await
    .context("load meals")?;
    Ok(rows)
}

async fn insert_meals_tx(
    tx: &mut Transaction<'_, Postgres>,
    plan_id: Uuid,
    meals: &[MealRequest],
) -> anyhow::Result<()> {
    for (order, meal) in meals.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO meals (day_plan_id, recipe_id, portion_size, sort_order)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(plan_id)
        .bind(meal.recipe_id)
        .bind(meal.portion_size)
        .bind(order as i32)
        .execute(&mut **tx)
        .await
        .context("insert meal")?;
    }
    Ok(())
}

pub async fn create(db: &PgPool, input: &DayPlanInput) -> anyhow::Result<DayPlan> {
    let mut tx = db.begin().await.context("begin tx")?;
    let plan = sqlx::query_as::<_, DayPlan>(
        r#"
        INSERT INTO day_plans (name, description)
        VALUES ($1, $2)
        RETURNING id, name, description, created_at, updated_at
        "#,
    )
    .bind(&input.name)
    .bind(&input.description)
    .fetch_one(&mut *tx)
    .await
    .context("insert day plan")?;

    insert_meals_tx(&mut tx, plan.id, &input.meals).await?;
    tx.commit().await.context("commit tx")?;
    Ok(plan)
}

/// Update the plan and replace all of its meals.
pub async fn replace(db: &PgPool, id: Uuid, input: &DayPlanInput) -> anyhow::Result<Option<DayPlan>> {
    let mut tx = db.begin().await.context("begin tx")?;
    let plan = sqlx::query_as::<_, DayPlan>(
        r#"
        UPDATE day_plans
           SET name = $2, description = $3, updated_at = now()
         WHERE id = $1
        RETURNING id, name, description, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(&input.name)
    .bind(&input.description)
    .fetch_optional(&mut *tx)
    .await
    .context("update day plan")?;

    let Some(plan) = plan else {
        return Ok(None);
    };

    sqlx::query("DELETE FROM meals WHERE day_plan_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("clear meals")?;
    insert_meals_tx(&mut tx, id, &input.meals).await?;
    tx.commit().await.context("commit tx")?;
    Ok(Some(plan))
}

/// Copy a plan and all of its meals under `"<name> (Copy)"`. Returns `None`
/// when the source plan does not exist.
pub async fn duplicate(db: &PgPool, id: Uuid) -> anyhow::Result<Option<DayPlan>> {
    let mut tx = db.begin().await.context("begin tx")?;
    let source = sqlx::query_as::<_, DayPlan>(
        r#"
        SELECT id, name, description, created_at, updated_at
          FROM day_plans
         WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await
    .context("load day plan to copy")?;

    let Some(source) = source else {
        return Ok(None);
    };

    let copy = sqlx::query_as::<_, DayPlan>(
        r#"
        INSERT INTO day_plans (name, description)
        VALUES ($1, $2)
        RETURNING id, name, description, created_at, updated_at
        "#,
    )
    .bind(copy_name(&source.name))
    .bind(&source.description)
    .fetch_one(&mut *tx)
    .await
    .context("copy day plan")?;

    sqlx::query(
        r#"
        INSERT INTO meals (day_plan_id, recipe_id, portion_size, sort_order)
        SELECT $2, recipe_id, portion_size, sort_order
          FROM meals
         WHERE day_plan_id = $1
        "#,
    )
    .bind(id)
    .bind(copy.id)
    .execute(&mut *tx)
    .await
    .context("copy meals")?;

    tx.commit().await.context("commit tx")?;
    Ok(Some(copy))
}

/// Returns `false` when nothing was deleted. Meals cascade.
pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM day_plans WHERE id = $1")
        .bind(id)
        .execute(db)
        .await
        .context("delete day plan")?;
    Ok(res.rows_affected() > 0)
}

pub async fn count(db: &PgPool) -> anyhow::Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM day_plans")
        .fetch_one(db)
        .await
        .context("count day plans")?;
    Ok(count)
}
