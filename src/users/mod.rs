use crate::state::AppState;
use axum::Router;

pub mod extractors;
pub mod forms;
pub mod handlers;
pub mod password;
pub mod redirect;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::account_routes())
        .merge(handlers::session_routes())
}
