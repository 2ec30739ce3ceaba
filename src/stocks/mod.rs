use crate::state::AppState;
use axum::Router;

pub mod forms;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::page_routes())
        .merge(handlers::portfolio_routes())
}
