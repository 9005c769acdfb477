//! Bearer-token authentication. Accounts come from the `create-user` binary.

use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod tokens;

pub use extract::AuthUser;
pub use tokens::{Claims, JwtKeys, TokenKind, TokenPair};

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::auth_routes())
        .merge(handlers::me_routes())
}
