//! Survey Response API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/surveys/{id}/responses",
            get(handler::list_by_survey).post(handler::submit),
        )
        .nest("/api/responses", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/analytics", get(handler::analytics))
}
