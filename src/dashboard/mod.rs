pub mod handlers;

use crate::state::AppState;
use axum::Router;

/// How many recently updated recipes the dashboard shows.
pub const RECENT_RECIPES: i64 = 5;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
