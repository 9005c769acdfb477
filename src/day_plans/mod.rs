pub mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub const CONFLICT_MSG: &str = "A day plan with this name already exists";
pub const UNKNOWN_RECIPE_MSG: &str = "Day plan references an unknown recipe";

/// Suffix appended to the name of a duplicated plan.
pub const COPY_SUFFIX: &str = " (Copy)";

pub fn copy_name(name: &str) -> String {
    format!("{}{}", name, COPY_SUFFIX)
}

pub fn router() -> Router<AppState> {
    handlers::routes()
}
