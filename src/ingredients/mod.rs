pub mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;

use crate::state::AppState;
use axum::Router;

pub const CONFLICT_MSG: &str = "An ingredient with this name already exists";
pub const IN_USE_MSG: &str = "Cannot delete ingredient that is used in recipes";

pub fn router() -> Router<AppState> {
    handlers::routes()
}
