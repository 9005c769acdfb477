use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::{
    dto::{AuthResponse, LoginRequest, PublicUser, RefreshRequest},
    extract::AuthUser,
    password::{is_valid_email, normalize_email, verify_password, MIN_PASSWORD_LEN},
    repo_types::User,
    tokens::{JwtKeys, TokenKind},
};
use crate::{error::AppError, state::AppState};

const BAD_CREDENTIALS: &str = "Invalid email or password";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

fn respond(state: &AppState, user: User) -> Result<AuthResponse, AppError> {
    let tokens = JwtKeys::from_ref(state)
        .issue_pair(user.id)
        .map_err(anyhow::Error::from)?;
    Ok(AuthResponse {
        tokens,
        user: user.into(),
    })
}

fn unauthorized(msg: &str) -> (StatusCode, String) {
    (StatusCode::UNAUTHORIZED, msg.to_string())
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    let email = normalize_email(&payload.email);
    if !is_valid_email(&email) {
        return Err(AppError::Validation("Invalid email address".into()).into());
    }
    if payload.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        ))
        .into());
    }

    let Some(user) = User::find_by_email(&state.db, &email)
        .await
        .map_err(AppError::from)?
    else {
        warn!(%email, "login for unknown email");
        return Err(unauthorized(BAD_CREDENTIALS));
    };

    if !verify_password(&payload.password, &user.password_hash).map_err(AppError::from)? {
        warn!(user_id = %user.id, "login with wrong password");
        return Err(unauthorized(BAD_CREDENTIALS));
    }

    info!(user_id = %user.id, "user logged in");
    Ok(Json(respond(&state, user)?))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    let claims = JwtKeys::from_ref(&state)
        .decode(&payload.refresh_token, TokenKind::Refresh)
        .map_err(|e| {
            warn!(error = %e, "refresh rejected");
            unauthorized("Invalid or expired token")
        })?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| unauthorized("User not found"))?;

    Ok(Json(respond(&state, user)?))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, (StatusCode, String)> {
    let user = User::find_by_id(&state.db, user_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| unauthorized("User not found"))?;
    Ok(Json(user.into()))
}
