//! Axum router construction.

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::context::AppContext;
use crate::middleware::identity::identity_middleware;
use crate::middleware::request_id::request_id_middleware;
use crate::routes;

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Every per-user route goes through identity verification.
    let api = Router::new()
        .route(
            "/activeUserImage/{user_id}",
            get(routes::active::active_user_image),
        )
        .route(
            "/activeUserImage/{user_id}/cursor",
            post(routes::active::update_cursor),
        )
        .route(
            "/activeUserItem/{user_id}",
            get(routes::active::active_user_item),
        )
        .route_layer(middleware::from_fn_with_state(
            ctx.clone(),
            identity_middleware,
        ));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
