use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{DayPlanDetails, DayPlanListItem, DayPlanPreviewRequest, DayPlanRequest},
    repo, services, CONFLICT_MSG, UNKNOWN_RECIPE_MSG,
};
use crate::{
    auth::AuthUser,
    db::contains_pattern,
    error::{db_violation, AppError, Violation},
    ingredients::dto::SearchQuery,
    nutrition::DayPlanMacros,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/day-plans", get(list_day_plans).post(create_day_plan))
        .route("/day-plans/preview", post(preview_day_plan))
        .route(
            "/day-plans/:id",
            get(get_day_plan)
                .put(update_day_plan)
                .delete(delete_day_plan),
        )
        .route("/day-plans/:id/duplicate", post(duplicate_day_plan))
}

/// On writes a FK failure means a meal pointed at a recipe that does not
/// exist.
fn write_err(e: anyhow::Error) -> AppError {
    match db_violation(&e) {
        Some(Violation::Unique) => AppError::Conflict(CONFLICT_MSG.into()),
        Some(Violation::ForeignKey) => AppError::Validation(UNKNOWN_RECIPE_MSG.into()),
        None => AppError::Internal(e),
    }
}

async fn details(state: &AppState, id: Uuid) -> Result<DayPlanDetails, AppError> {
    services::load_details(&state.db, id)
        .await?
        .ok_or(AppError::NotFound("Day plan"))
}

#[instrument(skip(state))]
pub async fn list_day_plans(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Query(q): Query<SearchQuery>,
) -> Result<Json<Vec<DayPlanListItem>>, (StatusCode, String)> {
    let pattern = contains_pattern(q.search.as_deref());
    let plans = repo::list(&state.db, pattern.as_deref())
        .await
        .map_err(AppError::from)?;
    Ok(Json(services::load_list(&state.db, plans).await?))
}

#[instrument(skip(state))]
pub async fn get_day_plan(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DayPlanDetails>, (StatusCode, String)> {
    Ok(Json(details(&state, id).await?))
}

#[instrument(skip(state, body))]
pub async fn preview_day_plan(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Json(body): Json<DayPlanPreviewRequest>,
) -> Result<Json<DayPlanMacros>, (StatusCode, String)> {
    Ok(Json(services::preview(&state.db, &body.planned()).await?))
}

#[instrument(skip(state, body))]
pub async fn create_day_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<DayPlanRequest>,
) -> Result<(StatusCode, Json<DayPlanDetails>), (StatusCode, String)> {
    let input = body.validate()?;
    let plan = repo::create(&state.db, &input).await.map_err(write_err)?;
    info!(%user_id, day_plan_id = %plan.id, meals = input.meals.len(), "day plan created");
    Ok((StatusCode::CREATED, Json(details(&state, plan.id).await?)))
}

#[instrument(skip(state, body))]
pub async fn update_day_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<DayPlanRequest>,
) -> Result<Json<DayPlanDetails>, (StatusCode, String)> {
    let input = body.validate()?;
    repo::replace(&state.db, id, &input)
        .await
        .map_err(write_err)?
        .ok_or(AppError::NotFound("Day plan"))?;
    info!(%user_id, day_plan_id = %id, meals = input.meals.len(), "day plan updated");
    Ok(Json(details(&state, id).await?))
}

#[instrument(skip(state))]
pub async fn duplicate_day_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<DayPlanDetails>), (StatusCode, String)> {
    let copy = repo::duplicate(&state.db, id)
        .await
        .map_err(write_err)?
        .ok_or(AppError::NotFound("Day plan"))?;
    info!(%user_id, source_id = %id, day_plan_id = %copy.id, name = %copy.name, "day plan duplicated");
    Ok((StatusCode::CREATED, Json(details(&state, copy.id).await?)))
}

#[instrument(skip(state))]
pub async fn delete_day_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    let deleted = repo::delete(&state.db, id)
        .await
        .map_err(AppError::from)?;
    if !deleted {
        return Err(AppError::NotFound("Day plan").into());
    }
    info!(%user_id, day_plan_id = %id, "day plan deleted");
    Ok(StatusCode::NO_CONTENT)
}
