pub mod routes;
pub mod state;

use axum::{routing::{get, post}, Router};
use crate::adapters::http::state::HttpState;

pub fn router(state: HttpState) -> Router {
    Router::new()
        .route("/detect", post(routes::detect))
        .route("/api/result", get(routes::get_result))
        .with_state(state)
}
