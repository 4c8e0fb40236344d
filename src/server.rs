use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::SharedState;

pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/health", get(crate::routes::health::health))
        // Dashboard data
        .route("/dashboard", get(crate::routes::dashboard::snapshot))
        .route(
            "/dashboard/refresh",
            post(crate::routes::dashboard::refresh),
        )
        .route("/dashboard/stream", get(crate::routes::dashboard::stream))
        .route("/campaigns", get(crate::routes::campaigns::list))
        // AI insights
        .route("/insights", get(crate::routes::insights::list))
        .route(
            "/insights/{widget}",
            post(crate::routes::insights::generate),
        )
        // Chat
        .route("/chat", post(crate::routes::chat::create))
        .route(
            "/chat/{id}",
            get(crate::routes::chat::history).delete(crate::routes::chat::close),
        )
        .route(
            "/chat/{id}/messages",
            post(crate::routes::chat::post_message),
        )
        // Activity
        .route("/activity", get(crate::routes::activity::history))
        .route("/activity/stream", get(crate::routes::activity::stream))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
