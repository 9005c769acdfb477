use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use tracing::instrument;

use super::RECENT_RECIPES;
use crate::{
    auth::AuthUser,
    day_plans,
    error::AppError,
    ingredients,
    recipes::{self, dto::RecipeListItem},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct Counts {
    pub ingredients: i64,
    pub recipes: i64,
    pub day_plans: i64,
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub counts: Counts,
    pub recent_recipes: Vec<RecipeListItem>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(get_dashboard))
}

async fn load(state: &AppState) -> anyhow::Result<Dashboard> {
    let (ingredients, recipes, day_plans) = tokio::try_join!(
        ingredients::repo::count(&state.db),
        recipes::repo::count(&state.db),
        day_plans::repo::count(&state.db),
    )?;

    let recent = recipes::repo::recent(&state.db, RECENT_RECIPES).await?;
    let recent_recipes = recipes::services::load_list(&state.db, recent).await?;

    Ok(Dashboard {
        counts: Counts {
            ingredients,
            recipes,
            day_plans,
        },
        recent_recipes,
    })
}

#[instrument(skip(state))]
pub async fn get_dashboard(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> Result<Json<Dashboard>, (StatusCode, String)> {
    let dashboard = load(&state).await.map_err(AppError::from)?;
    Ok(Json(dashboard))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    #[tokio::test]
    async fn dashboard_requires_authentication() {
        let app = routes().with_state(AppState::fake());
        let res = app
            .oneshot(
                Request::builder()
                    .uri("/dashboard")
                    .header("authorization", "Bearer not-a-jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn dashboard_serializes_counts() {
        let d = Dashboard {
            counts: Counts {
                ingredients: 3,
                recipes: 2,
                day_plans: 1,
            },
            recent_recipes: vec![],
        };
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["counts"]["day_plans"], 1);
        assert!(json["recent_recipes"].as_array().unwrap().is_empty());
    }
}
