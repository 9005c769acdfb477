use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{CookedWeightRequest, RecipeDetails, RecipeListItem, RecipePreviewRequest, RecipeRequest},
    repo, services, CONFLICT_MSG, IN_USE_MSG, UNKNOWN_INGREDIENT_MSG,
};
use crate::{
    auth::AuthUser,
    db::contains_pattern,
    error::{db_violation, AppError, Violation},
    ingredients::dto::SearchQuery,
    nutrition::RecipeMacros,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list_recipes).post(create_recipe))
        .route("/recipes/preview", post(preview_recipe))
        .route(
            "/recipes/:id",
            get(get_recipe).put(update_recipe).delete(delete_recipe),
        )
        .route("/recipes/:id/cooked-weight", put(set_cooked_weight))
}

/// On writes a FK failure means a row pointed at an ingredient that does
/// not exist.
fn write_err(e: anyhow::Error) -> AppError {
    match db_violation(&e) {
        Some(Violation::Unique) => AppError::Conflict(CONFLICT_MSG.into()),
        Some(Violation::ForeignKey) => AppError::Validation(UNKNOWN_INGREDIENT_MSG.into()),
        None => AppError::Internal(e),
    }
}

async fn details(state: &AppState, id: Uuid) -> Result<RecipeDetails, AppError> {
    let snapshot = services::load_snapshot(&state.db, id)
        .await?
        .ok_or(AppError::NotFound("Recipe"))?;
    let used_in = repo::usages(&state.db, id).await?;
    Ok(services::details(snapshot, used_in))
}

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Query(q): Query<SearchQuery>,
) -> Result<Json<Vec<RecipeListItem>>, (StatusCode, String)> {
    let pattern = contains_pattern(q.search.as_deref());
    let rows = repo::list(&state.db, pattern.as_deref())
        .await
        .map_err(AppError::from)?;
    let items = services::load_list(&state.db, rows)
        .await
        .map_err(AppError::from)?;
    Ok(Json(items))
}

#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<RecipeDetails>, (StatusCode, String)> {
    Ok(Json(details(&state, id).await?))
}

#[instrument(skip(state, body))]
pub async fn preview_recipe(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Json(body): Json<RecipePreviewRequest>,
) -> Result<Json<RecipeMacros>, (StatusCode, String)> {
    let macros = services::preview(&state.db, body.cooked_weight, &body.ingredients).await?;
    Ok(Json(macros))
}

#[instrument(skip(state, body))]
pub async fn create_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<RecipeRequest>,
) -> Result<(StatusCode, Json<RecipeDetails>), (StatusCode, String)> {
    let input = body.validate()?;
    let recipe = repo::create(&state.db, &input).await.map_err(write_err)?;
    info!(
        %user_id,
        recipe_id = %recipe.id,
        rows = input.ingredients.len(),
        "recipe created"
    );
    Ok((StatusCode::CREATED, Json(details(&state, recipe.id).await?)))
}

#[instrument(skip(state, body))]
pub async fn update_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<RecipeRequest>,
) -> Result<Json<RecipeDetails>, (StatusCode, String)> {
    let input = body.validate()?;
    repo::replace(&state.db, id, &input)
        .await
        .map_err(write_err)?
        .ok_or(AppError::NotFound("Recipe"))?;
    info!(%user_id, recipe_id = %id, rows = input.ingredients.len(), "recipe updated");
    Ok(Json(details(&state, id).await?))
}

#[instrument(skip(state, body))]
pub async fn set_cooked_weight(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<CookedWeightRequest>,
) -> Result<Json<RecipeDetails>, (StatusCode, String)> {
    let cooked_weight = body.validate()?;
    repo::set_cooked_weight(&state.db, id, cooked_weight)
        .await
        .map_err(AppError::from)?
        .ok_or(AppError::NotFound("Recipe"))?;
    info!(%user_id, recipe_id = %id, ?cooked_weight, "cooked weight set");
    Ok(Json(details(&state, id).await?))
}

#[instrument(skip(state))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    let used_by = repo::meal_count(&state.db, id)
        .await
        .map_err(AppError::from)?;
    if used_by > 0 {
        warn!(recipe_id = %id, used_by, "delete blocked, recipe in use");
        return Err(AppError::InUse(IN_USE_MSG.into()).into());
    }

    let deleted = repo::delete(&state.db, id)
        .await
        .map_err(|e| AppError::from_db(e, CONFLICT_MSG, IN_USE_MSG))?;
    if !deleted {
        return Err(AppError::NotFound("Recipe").into());
    }
    info!(%user_id, recipe_id = %id, "recipe deleted");
    Ok(StatusCode::NO_CONTENT)
}
