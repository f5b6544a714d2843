//! Bot routes

use std::sync::Arc;

use axum::{
    routing::{delete, get},
    Router,
};

use crate::features::bots::handlers;
use crate::features::bots::services::BotService;

/// Create routes for the bots feature
pub fn routes(service: Arc<BotService>) -> Router {
    Router::new()
        .route(
            "/api/register-bot",
            get(handlers::register_bot_via_query).post(handlers::register_bot),
        )
        .route("/api/get-bot", get(handlers::get_bot))
        .route("/api/list-bots", get(handlers::list_bots))
        .route("/api/delete-bot/{id}", delete(handlers::delete_bot))
        .with_state(service)
}
