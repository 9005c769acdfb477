use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{IngredientRequest, SearchQuery},
    repo,
    repo_types::{Ingredient, IngredientWithUsage},
    CONFLICT_MSG, IN_USE_MSG,
};
use crate::{auth::AuthUser, db::contains_pattern, error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ingredients", get(list_ingredients).post(create_ingredient))
        .route(
            "/ingredients/:id",
            get(get_ingredient)
                .put(update_ingredient)
                .delete(delete_ingredient),
        )
}

fn db_err(e: anyhow::Error) -> AppError {
    AppError::from_db(e, CONFLICT_MSG, IN_USE_MSG)
}

#[instrument(skip(state))]
pub async fn list_ingredients(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Query(q): Query<SearchQuery>,
) -> Result<Json<Vec<IngredientWithUsage>>, (StatusCode, String)> {
    let pattern = contains_pattern(q.search.as_deref());
    let rows = repo::list(&state.db, pattern.as_deref())
        .await
        .map_err(AppError::from)?;
    Ok(Json(rows))
}

#[instrument(skip(state))]
pub async fn get_ingredient(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Ingredient>, (StatusCode, String)> {
    let row = repo::get(&state.db, id)
        .await
        .map_err(AppError::from)?
        .ok_or(AppError::NotFound("Ingredient"))?;
    Ok(Json(row))
}

#[instrument(skip(state, body))]
pub async fn create_ingredient(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<IngredientRequest>,
) -> Result<(StatusCode, Json<Ingredient>), (StatusCode, String)> {
    let input = body.validate()?;
    let row = repo::create(&state.db, &input).await.map_err(db_err)?;
    info!(%user_id, ingredient_id = %row.id, name = %row.name, "ingredient created");
    Ok((StatusCode::CREATED, Json(row)))
}

#[instrument(skip(state, body))]
pub async fn update_ingredient(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<IngredientRequest>,
) -> Result<Json<Ingredient>, (StatusCode, String)> {
    let input = body.validate()?;
    let row = repo::update(&state.db, id, &input)
        .await
        .map_err(db_err)?
        .ok_or(AppError::NotFound("Ingredient"))?;
    info!(%user_id, ingredient_id = %id, "ingredient updated");
    Ok(Json(row))
}

#[instrument(skip(state))]
pub async fn delete_ingredient(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    let used_by = repo::usage_count(&state.db, id)
        .await
        .map_err(AppError::from)?;
    if used_by > 0 {
        warn!(ingredient_id = %id, used_by, "delete blocked, ingredient in use");
        return Err(AppError::InUse(IN_USE_MSG.into()).into());
    }

    // The FK on recipe_ingredients still guards against a concurrent insert.
    let deleted = repo::delete(&state.db, id).await.map_err(db_err)?;
    if !deleted {
        return Err(AppError::NotFound("Ingredient").into());
    }
    info!(%user_id, ingredient_id = %id, "ingredient deleted");
    Ok(StatusCode::NO_CONTENT)
}
