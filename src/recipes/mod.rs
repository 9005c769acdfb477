pub mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub const CONFLICT_MSG: &str = "A recipe with this name already exists";
pub const IN_USE_MSG: &str = "Cannot delete recipe that is used in day plans";
pub const UNKNOWN_INGREDIENT_MSG: &str = "Recipe references an unknown ingredient";

pub fn router() -> Router<AppState> {
    handlers::routes()
}
